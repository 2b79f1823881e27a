//! Abstract syntax tree for YARTBML.
//!
//! Nodes are plain, immutable, owned data -- no source locations are
//! tracked (per the language's contract, errors identify tokens by their
//! literal and kind, not position). The parser is the only producer of
//! these types; the evaluator treats them as read-only.
//!
//! Every node implements `Display`, reconstructing source text with
//! explicit parenthesization around every prefix/infix application. This
//! drives the parser's own tests (precedence is otherwise invisible) and
//! the `fn(params) { body }` display form of function values.

use std::fmt;

/// An ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{s}"),
            Statement::Return(s) => write!(f, "{s}"),
            Statement::Expression(s) => write!(f, "{s}"),
        }
    }
}

/// `let <name> = <value>;`
///
/// Invariant: `name` is always a well-formed identifier -- the parser
/// never constructs a `LetStatement` without one.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: String,
    pub value: Expr,
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "let {} = {};", self.name, self.value)
    }
}

/// `return <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expr,
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "return {};", self.value)
    }
}

/// A bare expression used as a statement, e.g. a REPL line like `5 + 5`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Expr,
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// A brace-delimited sequence of statements. Unlike `Program`, a block
/// never unwraps a `return`/error sentinel during evaluation -- it
/// propagates them unchanged so they can escape arbitrarily nested
/// blocks. See the evaluator's block-vs-program distinction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

/// A single `fn` parameter or identifier expression. Carries no type
/// annotation -- YARTBML is dynamically typed.
pub type Identifier = String;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expr>),
    /// Insertion order is preserved for iteration, but key *equality* at
    /// evaluation time is by evaluated value, not by this node's order.
    HashLiteral(Vec<(Expr, Expr)>),
    FunctionLiteral {
        params: Vec<Identifier>,
        body: BlockStatement,
    },
    Prefix {
        operator: String,
        right: Box<Expr>,
    },
    Infix {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::IntegerLiteral(v) => write!(f, "{v}"),
            Expr::BooleanLiteral(v) => write!(f, "{v}"),
            Expr::StringLiteral(s) => write!(f, "\"{s}\""),
            Expr::ArrayLiteral(elements) => {
                write!(f, "[")?;
                write_comma_separated(f, elements)?;
                write!(f, "]")
            }
            Expr::HashLiteral(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                write!(f, "}}")
            }
            Expr::FunctionLiteral { params, body } => {
                write!(f, "fn({}) {{ {} }}", params.join(", "), body)
            }
            Expr::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Expr::Infix {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {{ {consequence} }}")?;
                if let Some(alt) = alternative {
                    write!(f, " else {{ {alt} }}")?;
                }
                Ok(())
            }
            Expr::Call {
                function,
                arguments,
            } => {
                write!(f, "{function}(")?;
                write_comma_separated(f, arguments)?;
                write!(f, ")")
            }
            Expr::Index { left, index } => write!(f, "({left}[{index}])"),
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reconstructs_let_statement() {
        let program = Program {
            statements: vec![Statement::Let(LetStatement {
                name: "myVar".to_string(),
                value: Expr::Identifier("anotherVar".to_string()),
            })],
        };
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn display_parenthesizes_infix_and_prefix() {
        let expr = Expr::Infix {
            operator: "+".to_string(),
            left: Box::new(Expr::Prefix {
                operator: "-".to_string(),
                right: Box::new(Expr::IntegerLiteral(1)),
            }),
            right: Box::new(Expr::IntegerLiteral(2)),
        };
        assert_eq!(expr.to_string(), "((-1) + 2)");
    }
}
