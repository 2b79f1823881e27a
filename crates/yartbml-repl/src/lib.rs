//! REPL session driver for YARTBML.
//!
//! This crate owns the read-eval-print loop's *state* (§6.1's "a
//! persistent `Environment` is retained across REPL iterations"); it has
//! no opinion on where input lines come from. `yartbmlc` wires a
//! `rustyline` editor up to [`ReplSession::eval_line`].

pub mod session;

pub use session::ReplSession;
