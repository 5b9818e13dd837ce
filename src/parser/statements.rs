//! Statement parsing implementation
//!
//! This module handles parsing of the supported C statement types:
//!
//! - Variable declarations: `int x = 42;`, `struct A a = { .x = 1 };`
//! - Assignments: `x = 1;`, `a.nested.c = 2;`
//! - Control flow: `if`/`else`, `while`
//! - `return`, blocks and expression statements
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | return_stmt
//!             | block | assignment | expr_stmt
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(
        &mut self,
    ) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location()))
            && !self.is_at_end()
        {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement();
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement();
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement();
        }

        if self.match_token(&Token::LBrace(loc)) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            return Ok(Stmt::Block {
                statements,
                location: loc,
            });
        }

        if self.is_type_keyword() {
            return self.parse_variable_declaration();
        }

        let expr = self.parse_expression()?;

        if self.match_token(&Token::Eq(self.current_location())) {
            let assign_loc = self.previous_location();
            let value = self.parse_expression()?;
            self.expect_semicolon("after assignment")?;
            return Ok(Stmt::Assignment {
                target: expr,
                value,
                location: assign_loc,
            });
        }

        self.expect_semicolon("after expression")?;
        Ok(Stmt::Expression {
            expr,
            location: loc,
        })
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        let expr = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_semicolon("after return")?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_statement_or_block()?;

        let else_loc = self.current_location();
        let else_branch = if self.match_token(&Token::Else(else_loc)) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.previous_location();

        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse variable declaration: type name [= initializer];
    pub(crate) fn parse_variable_declaration(
        &mut self,
    ) -> Result<Stmt, ParseError> {
        let var_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(self.parse_initializer()?)
        } else {
            None
        };

        if self.check(&Token::Comma(self.current_location())) {
            return Err(ParseError::new(
                "Declaring several variables in one statement is not supported",
                self.current_location(),
            ));
        }
        self.expect_semicolon("after variable declaration")?;

        Ok(Stmt::VarDecl {
            name,
            var_type,
            init,
            location: loc,
        })
    }

    /// Parse statement or block (for if/while bodies)
    ///
    /// A braced body is returned as its statement list; the executor opens a
    /// scope for it either way.
    pub(crate) fn parse_statement_or_block(
        &mut self,
    ) -> Result<Vec<Stmt>, ParseError> {
        if self.match_token(&Token::LBrace(self.current_location())) {
            let statements = self.parse_block_statements()?;
            self.expect_rbrace("after block")?;
            Ok(statements)
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}
