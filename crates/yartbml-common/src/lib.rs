//! Shared types for the YARTBML interpreter pipeline.
//!
//! This crate holds the token vocabulary consumed by both the lexer and
//! the parser. It has no dependency on either, so both can depend on it
//! without creating a cycle.

pub mod token;

pub use token::{keyword_from_str, Token, TokenKind};
