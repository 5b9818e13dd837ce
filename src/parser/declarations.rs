//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations in C programs:
//!
//! - Struct definitions: `struct Name { ... };`
//! - Forward struct declarations: `struct Name;`
//! - Function definitions: `type name(params) { ... }`
//! - Prototypes: `type name(params);` (parameter names optional)
//! - Type names and function parameters
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= struct_decl | struct_def | function
//! struct_decl  ::= "struct" identifier ";"
//! struct_def   ::= "struct" identifier "{" (type identifier ";")* "}" ";"
//! function     ::= type identifier "(" params ")" (";" | "{" stmts "}")
//! type         ::= "int" | "char" | "void" | "struct" identifier
//! ```
//!
//! Pointer declarators and global variables are rejected.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a top-level declaration (function or struct)
    pub(crate) fn parse_top_level_declaration(
        &mut self,
    ) -> Result<Item, ParseError> {
        // struct Name { ... };           <- struct definition
        // struct Name;                   <- forward declaration
        // struct Name func_name(...) ... <- function with struct return type
        if self.check(&Token::Struct(self.current_location())) {
            if self.check_ahead(2, &Token::LBrace(self.current_location())) {
                self.advance(); // consume 'struct'
                return self.parse_struct_definition();
            }
            let semicolon = Token::Semicolon(self.current_location());
            if self.check_ahead(2, &semicolon) {
                let location = self.current_location();
                self.advance(); // consume 'struct'
                let name = self.expect_identifier()?;
                self.advance(); // consume ';'
                return Ok(Item::StructDecl { name, location });
            }
        }

        self.parse_function_definition()
    }

    /// Parse struct definition: struct Name { fields };
    pub(crate) fn parse_struct_definition(
        &mut self,
    ) -> Result<Item, ParseError> {
        let loc = self.previous_location();

        let name = self.expect_identifier()?;

        self.expect_lbrace("after struct name")?;

        let mut fields = Vec::new();
        while !self.check(&Token::RBrace(self.current_location()))
            && !self.is_at_end()
        {
            let field_type = self.parse_type()?;
            let field_name = self.expect_identifier()?;
            let field_loc = self.previous_location();
            self.expect_semicolon("after struct field")?;

            fields.push(Field {
                name: field_name,
                field_type,
                location: field_loc,
            });
        }

        self.expect_rbrace("after struct fields")?;
        self.expect_semicolon("after struct definition")?;

        Ok(Item::StructDef {
            name,
            fields,
            location: loc,
        })
    }

    /// Parse function definition or prototype: type name(params) { body } | ;
    pub(crate) fn parse_function_definition(
        &mut self,
    ) -> Result<Item, ParseError> {
        let return_type = self.parse_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        if !self.check(&Token::LParen(self.current_location())) {
            return Err(ParseError::new(
                format!(
                    "Global variables are not supported (found '{}')",
                    name
                ),
                loc,
            ));
        }
        self.expect_lparen("after function name")?;

        let params = self.parse_parameter_list()?;

        self.expect_rparen("after parameters")?;

        if self.match_token(&Token::Semicolon(self.current_location())) {
            return Ok(Item::FunctionDecl {
                name,
                params,
                return_type,
                location: loc,
            });
        }

        if let Some(unnamed) = params.iter().find(|p| p.name.is_empty()) {
            return Err(ParseError::new(
                format!("Parameter of '{}' needs a name in a definition", name),
                unnamed.location,
            ));
        }
        self.expect_lbrace("before function body")?;

        let body = self.parse_block_statements()?;

        self.expect_rbrace("after function body")?;

        Ok(Item::FunctionDef {
            name,
            params,
            return_type,
            body,
            location: loc,
        })
    }

    /// Parse parameter list: (type name, type name, ...)
    ///
    /// Names may be left out; only prototypes accept that.
    pub(crate) fn parse_parameter_list(
        &mut self,
    ) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        // Special case: (void) means no parameters in C
        if self.check(&Token::Void(self.current_location()))
            && self.check_ahead(1, &Token::RParen(self.current_location()))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            let location = self.current_location();
            let param_type = self.parse_type()?;
            let name = match self.peek_token() {
                Token::Ident(name, _) => {
                    self.advance();
                    name
                }
                _ => String::new(),
            };
            params.push(Param {
                name,
                param_type,
                location,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse type: int | char | void | struct Name
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let ty = if self.match_token(&Token::Int(self.current_location())) {
            Type::Int
        } else if self.match_token(&Token::Char(self.current_location())) {
            Type::Char
        } else if self.match_token(&Token::Void(self.current_location())) {
            Type::Void
        } else if self.match_token(&Token::Struct(self.current_location())) {
            let name = self.expect_identifier()?;
            Type::Struct(name)
        } else {
            return Err(ParseError::new(
                format!("Expected type, found {}", self.peek()),
                self.current_location(),
            ));
        };

        if self.check(&Token::Star(self.current_location())) {
            return Err(ParseError::new(
                format!("pointer types are not supported ('{}*')", ty),
                self.current_location(),
            ));
        }

        Ok(ty)
    }
}
