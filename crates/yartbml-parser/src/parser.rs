//! Pratt (top-down operator-precedence) parser for YARTBML.
//!
//! The parser keeps exactly one token of lookahead (`cur`, `peek`) and
//! dispatches on token kind to a prefix or infix parsing rule. It never
//! panics or unwinds on malformed input: every failure is recorded as a
//! string in `errors` and the parser attempts to resynchronize at the
//! next statement boundary so later statements still get a chance to
//! parse cleanly.

use yartbml_common::token::{Token, TokenKind};
use yartbml_lexer::Lexer;

use crate::ast::{
    BlockStatement, Expr, ExpressionStatement, LetStatement, Program, ReturnStatement, Statement,
};

/// Operator-precedence levels, ascending. Comparing two variants compares
/// their declaration order, so `Precedence::Sum < Precedence::Product`
/// holds exactly as the derived `PartialOrd` says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // > <
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(...)
    Index,       // a[i]
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Parse a complete program, draining tokens until `Eof`.
///
/// Never panics. Check `errors()` on the returned parser (or use
/// [`parse`]) before handing the program to the evaluator: a non-empty
/// error list means the program is incomplete or malformed.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
}

/// Parse `source` into a program and its parse errors in one call.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    (program, parser.errors)
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next().unwrap_or(Token::new(TokenKind::Eof, ""));
        let peek = lexer.next().unwrap_or(Token::new(TokenKind::Eof, ""));
        Self {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.cur, &mut self.peek);
        self.peek = self
            .lexer
            .next()
            .unwrap_or(Token::new(TokenKind::Eof, ""));
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// If the peek token has the expected kind, advance onto it and
    /// return `true`. Otherwise record an error and return `false`
    /// without moving the cursor.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek.kind
            ));
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur.kind)
    }

    // ── Program / statements ───────────────────────────────────────────

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }
        Program { statements }
    }

    /// Skip tokens until the next statement boundary (`;`, `}`, or `Eof`)
    /// so a single malformed statement doesn't derail the rest of the
    /// program. Mirrors the recovery strategy described for the parser:
    /// errors accumulate but parsing always makes forward progress.
    fn synchronize(&mut self) {
        while self.cur.kind != TokenKind::Semicolon
            && self.cur.kind != TokenKind::RBrace
            && self.cur.kind != TokenKind::Eof
        {
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur.literal.clone();

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        // Trailing semicolon is optional, supporting REPL input.
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let(LetStatement { name, value }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return(ReturnStatement { value }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression(ExpressionStatement { expr }))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.next_token(); // consume '{'

        while self.cur.kind != TokenKind::RBrace && self.cur.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }

        BlockStatement { statements }
    }

    // ── Expressions (Pratt core) ───────────────────────────────────────

    fn parse_expression(&mut self, min_prec: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && min_prec < self.peek_precedence() {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                TokenKind::LParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                TokenKind::LBracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                _ => return Some(left),
            };
        }

        Some(left)
    }

    /// Dispatch on `cur.kind` to a prefix parsing rule. Records
    /// `"no prefix parse function for <KIND> found"` and returns `None`
    /// if no rule applies -- the canonical parse failure for an
    /// expression that starts with a token that can never begin one.
    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur.kind {
            TokenKind::Ident => Some(Expr::Identifier(self.cur.literal.clone())),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::String => Some(Expr::StringLiteral(self.cur.literal.clone())),
            TokenKind::True => Some(Expr::BooleanLiteral(true)),
            TokenKind::False => Some(Expr::BooleanLiteral(false)),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Fn => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            other => {
                self.errors
                    .push(format!("no prefix parse function for {other} found"));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        match self.cur.literal.parse::<i64>() {
            Ok(value) => Some(Expr::IntegerLiteral(value)),
            Err(_) => {
                self.errors
                    .push(format!("could not parse \"{}\" as integer", self.cur.literal));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let operator = self.cur.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let operator = self.cur.literal.clone();
        // Left-associativity comes from recursing at the operator's own
        // precedence, not precedence - 1.
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expr::FunctionLiteral { params, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }

        self.next_token();
        if self.cur.kind != TokenKind::Ident {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                TokenKind::Ident,
                self.cur.kind
            ));
            return None;
        }
        params.push(self.cur.literal.clone());

        while self.peek_is(TokenKind::Comma) {
            self.next_token(); // ','
            self.next_token();
            if self.cur.kind != TokenKind::Ident {
                self.errors.push(format!(
                    "expected next token to be {}, got {} instead",
                    TokenKind::Ident,
                    self.cur.kind
                ));
                return None;
            }
            params.push(self.cur.literal.clone());
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(params)
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::ArrayLiteral(elements))
    }

    /// Shared by call arguments and array elements: zero or more
    /// comma-separated expressions terminated by `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let mut pairs = Vec::new();

        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expr::HashLiteral(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Program {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        program
    }

    #[test]
    fn let_statements() {
        let program = parse_ok("let x = 5;\nlet y = true;\nlet foobar = y;");
        assert_eq!(program.statements.len(), 3);
        match &program.statements[0] {
            Statement::Let(s) => {
                assert_eq!(s.name, "x");
                assert_eq!(s.value, Expr::IntegerLiteral(5));
            }
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn return_statements() {
        let program = parse_ok("return 5;\nreturn 10;\nreturn 993322;");
        assert_eq!(program.statements.len(), 3);
        for stmt in &program.statements {
            assert!(matches!(stmt, Statement::Return(_)));
        }
    }

    #[test]
    fn operator_precedence_round_trips_through_display() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (input, expected) in cases {
            let program = parse_ok(input);
            assert_eq!(program.to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn if_else_expression() {
        let program = parse_ok("if (x < y) { x } else { y }");
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::If { alternative, .. },
            }) => assert!(alternative.is_some()),
            other => panic!("expected if expression, got {other:?}"),
        }
    }

    #[test]
    fn function_literal_parameters() {
        let cases = [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];
        for (input, expected) in cases {
            let program = parse_ok(input);
            match &program.statements[0] {
                Statement::Expression(ExpressionStatement {
                    expr: Expr::FunctionLiteral { params, .. },
                }) => assert_eq!(params, &expected),
                other => panic!("expected fn literal, got {other:?}"),
            }
        }
    }

    #[test]
    fn call_expression_arguments() {
        let program = parse_ok("add(1, 2 * 3, 4 + 5);");
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::Call { arguments, .. },
            }) => assert_eq!(arguments.len(), 3),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn string_literal_expression() {
        let program = parse_ok(r#""hello world";"#);
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::StringLiteral(s),
            }) => assert_eq!(s, "hello world"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_expression() {
        let program = parse_ok("[1, 2 * 2, 3 + 3]");
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::ArrayLiteral(elements),
            }) => assert_eq!(elements.len(), 3),
            other => panic!("expected array literal, got {other:?}"),
        }
    }

    #[test]
    fn index_expression() {
        let program = parse_ok("myArray[1 + 1]");
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::Index { .. },
            }) => {}
            other => panic!("expected index expression, got {other:?}"),
        }
    }

    #[test]
    fn hash_literal_string_keys() {
        let program = parse_ok(r#"{"one": 1, "two": 2, "three": 3}"#);
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::HashLiteral(pairs),
            }) => assert_eq!(pairs.len(), 3),
            other => panic!("expected hash literal, got {other:?}"),
        }
    }

    #[test]
    fn empty_hash_literal() {
        let program = parse_ok("{}");
        match &program.statements[0] {
            Statement::Expression(ExpressionStatement {
                expr: Expr::HashLiteral(pairs),
            }) => assert!(pairs.is_empty()),
            other => panic!("expected empty hash literal, got {other:?}"),
        }
    }

    #[test]
    fn missing_closing_paren_is_an_error() {
        let (_, errors) = parse("(1 + 2");
        assert!(!errors.is_empty());
        assert!(errors[0].contains("expected next token to be )"));
    }

    #[test]
    fn unknown_integer_literal_is_an_error() {
        let (_, errors) = parse("let x = 99999999999999999999;");
        assert!(errors
            .iter()
            .any(|e| e.contains("could not parse \"99999999999999999999\" as integer")));
    }

    #[test]
    fn no_prefix_parse_function_error() {
        let (_, errors) = parse("*5;");
        assert!(errors
            .iter()
            .any(|e| e.contains("no prefix parse function for")));
    }

    #[test]
    fn error_recovery_keeps_parsing_later_statements() {
        // The first statement is malformed (missing identifier after `let`);
        // the parser should still find the second, well-formed statement.
        let (program, errors) = parse("let = 5;\nlet y = 10;");
        assert!(!errors.is_empty());
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Statement::Let(l) if l.name == "y")));
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        let program = parse_ok("5 + 5");
        assert_eq!(program.statements.len(), 1);
    }
}
