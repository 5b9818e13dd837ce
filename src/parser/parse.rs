//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach organized as follows:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: Parsing structs, prototypes and function definitions
//! - `statements`: Parsing statements (declarations, if, while, return, ...)
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn new(
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program (top-level struct and function definitions)
    pub fn parse_program(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut unit = TranslationUnit::new();

        while !self.is_at_end() {
            let item = self.parse_top_level_declaration()?;
            unit.items.push(item);
        }

        Ok(unit)
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            Token::Int(_) | Token::Char(_) | Token::Void(_) | Token::Struct(_)
        )
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn check_ahead(&self, n: usize, token: &Token) -> bool {
        self.peek_ahead(n).is_some_and(|t| {
            std::mem::discriminant(t) == std::mem::discriminant(token)
        })
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}, found {}", message, self.peek()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_lparen(
        &mut self,
        ctx: &str,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(
        &mut self,
        ctx: &str,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(
        &mut self,
        ctx: &str,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(
        &mut self,
        ctx: &str,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_semicolon(
        &mut self,
        ctx: &str,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            &format!("Expected ';' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::new(
                format!("Expected identifier, found {}", self.peek()),
                self.current_location(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TranslationUnit {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::new(source) {
            Ok(mut parser) => parser.parse_program().unwrap_err(),
            Err(err) => err,
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let unit = parse("int main() { return 0; }");

        assert_eq!(unit.items.len(), 1);
        match &unit.items[0] {
            Item::FunctionDef {
                name,
                params,
                return_type,
                body,
                ..
            } => {
                assert_eq!(name, "main");
                assert_eq!(params.len(), 0);
                assert_eq!(*return_type, Type::Int);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_parse_precedence() {
        let unit = parse("int main() { return 1 + 2 * 3 == 7 || 0; }");
        let Item::FunctionDef { body, .. } = &unit.items[0] else {
            panic!("Expected function definition");
        };
        let Stmt::Return { expr: Some(expr), .. } = &body[0] else {
            panic!("Expected return");
        };

        // ((1 + (2 * 3)) == 7) || 0
        let Expr::BinaryOp { op: BinOp::Or, left, .. } = expr else {
            panic!("Expected || at the root, got {:?}", expr);
        };
        let Expr::BinaryOp { op: BinOp::Eq, left, .. } = left.as_ref() else {
            panic!("Expected == under ||");
        };
        let Expr::BinaryOp { op: BinOp::Add, right, .. } = left.as_ref() else {
            panic!("Expected + under ==");
        };
        assert!(matches!(
            right.as_ref(),
            Expr::BinaryOp { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_parse_if_else() {
        let unit =
            parse("int main() { if (x == 0) return 1; else { return 0; } }");
        let Item::FunctionDef { body, .. } = &unit.items[0] else {
            panic!("Expected function definition");
        };
        match &body[0] {
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_struct() {
        let unit = parse("struct Point { int x; char tag; };");

        assert_eq!(unit.items.len(), 1);
        match &unit.items[0] {
            Item::StructDef { name, fields, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].field_type, Type::Char);
            }
            _ => panic!("Expected struct definition"),
        }
    }

    #[test]
    fn test_parse_struct_return_type() {
        let unit = parse(
            "struct P { int x; };\n\
             struct P make(int v) { return (struct P){ .x = v }; }",
        );

        assert_eq!(unit.items.len(), 2);
        assert!(matches!(
            &unit.items[1],
            Item::FunctionDef { return_type: Type::Struct(name), .. }
                if name == "P"
        ));
    }

    #[test]
    fn test_parse_compound_literal_with_designators() {
        let unit = parse(
            "int main() {\n\
                 struct A a = (struct A){ .a = 1, .nested = { .c = 5 }, 7 };\n\
                 return 0;\n\
             }",
        );
        let Item::FunctionDef { body, .. } = &unit.items[0] else {
            panic!("Expected function definition");
        };
        let Stmt::VarDecl { init: Some(init), .. } = &body[0] else {
            panic!("Expected declaration with initializer");
        };
        let Expr::CompoundLiteral {
            struct_name,
            initializers,
            ..
        } = init
        else {
            panic!("Expected compound literal, got {:?}", init);
        };

        assert_eq!(struct_name, "A");
        assert_eq!(initializers.len(), 3);
        assert_eq!(initializers[0].designator.as_deref(), Some("a"));
        assert!(matches!(initializers[1].value, Expr::InitList { .. }));
        assert_eq!(initializers[2].designator, None);
    }

    #[test]
    fn test_parse_assignment_to_field_chain() {
        let unit = parse("int main() { a.nested.c = 3; return 0; }");
        let Item::FunctionDef { body, .. } = &unit.items[0] else {
            panic!("Expected function definition");
        };
        let Stmt::Assignment { target, .. } = &body[0] else {
            panic!("Expected assignment");
        };
        let (root, path) = target.member_path();
        assert!(matches!(root, Expr::Variable(name, _) if name == "a"));
        assert_eq!(path, vec!["nested", "c"]);
    }

    #[test]
    fn test_parse_prototype() {
        let unit = parse("int add(int a, char);\nvoid reset(void);");

        assert_eq!(unit.items.len(), 2);
        match &unit.items[0] {
            Item::FunctionDecl {
                name,
                params,
                return_type,
                location,
            } => {
                assert_eq!(name, "add");
                assert_eq!(*return_type, Type::Int);
                assert_eq!(params[0].name, "a");
                // Unnamed prototype parameter
                assert_eq!(params[1].name, "");
                assert_eq!(params[1].param_type, Type::Char);
                assert_eq!(location.line, 1);
            }
            other => panic!("Expected prototype, got {:?}", other),
        }
        assert!(matches!(
            &unit.items[1],
            Item::FunctionDecl { params, .. } if params.is_empty()
        ));
    }

    #[test]
    fn test_parse_forward_struct_declaration() {
        let unit = parse("struct S;\nstruct S { int x; };\nstruct S f();");

        assert_eq!(unit.items.len(), 3);
        assert!(matches!(
            &unit.items[0],
            Item::StructDecl { name, .. } if name == "S"
        ));
        assert!(matches!(&unit.items[1], Item::StructDef { .. }));
        assert!(matches!(
            &unit.items[2],
            Item::FunctionDecl { return_type: Type::Struct(name), .. }
                if name == "S"
        ));
    }

    #[test]
    fn test_definition_requires_parameter_names() {
        let err = parse_err("int f(int) { return 0; }");
        assert!(err.message.contains("needs a name"));
        assert_eq!(err.location.column, 7);
    }

    #[test]
    fn test_rejects_pointers_and_globals() {
        assert!(parse_err("int *f() { return 0; }")
            .message
            .contains("pointer"));
        assert!(parse_err("int counter = 0;")
            .message
            .contains("Global variables"));
        assert!(parse_err("int main() { return (int)5; }")
            .message
            .contains("Casts"));
    }

    #[test]
    fn test_int_min_literal() {
        let unit = parse("int main() { return -2147483648; }");
        let Item::FunctionDef { body, .. } = &unit.items[0] else {
            panic!("Expected function definition");
        };
        assert!(matches!(
            &body[0],
            Stmt::Return { expr: Some(Expr::IntLiteral(i32::MIN, _)), .. }
        ));

        // Without the minus sign the magnitude does not fit in int
        let err = parse_err("int main() { return 2147483648; }");
        assert!(err.message.contains("does not fit in int"));
    }

    #[test]
    fn test_error_location_points_at_token() {
        let err = parse_err("int main() {\n  return 0\n}");
        assert_eq!(err.location.line, 3);
        assert!(err.message.starts_with("Expected ';'"));
    }
}
