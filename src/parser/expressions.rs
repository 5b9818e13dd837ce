//! Expression parsing implementation
//!
//! One method per precedence level, lowest first:
//!
//! ```text
//! ||  &&  == !=  < <= > >=  + -  * / %  unary(- !)  postfix(. call)  primary
//! ```
//!
//! Primary expressions are literals, identifiers, parenthesised expressions,
//! `sizeof(type)` and compound literals. Compound literals accept both the
//! C99 form `(struct A){ ... }` and the shorter `struct A{ ... }`; their
//! entries are designated (`.field = value`) or positional, and nested braces
//! without a type name are kept as [`Expr::InitList`] for the evaluator to
//! type.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical_or()
    }

    /// Parse an initializer: a braced list or an ordinary expression
    pub(crate) fn parse_initializer(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::LBrace(loc)) {
            let initializers = self.parse_initializer_list()?;
            return Ok(Expr::InitList {
                initializers,
                location: loc,
            });
        }
        self.parse_expression()
    }

    /// Parse the entries of `{ ... }` after the opening brace, consuming the
    /// closing one
    fn parse_initializer_list(
        &mut self,
    ) -> Result<Vec<Initializer>, ParseError> {
        let mut initializers = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) {
            let loc = self.current_location();
            let designator = if self.match_token(&Token::Dot(loc)) {
                let field = self.expect_identifier()?;
                self.expect_token(
                    &Token::Eq(self.current_location()),
                    "Expected '=' after designator",
                )?;
                Some(field)
            } else {
                None
            };

            let value = self.parse_initializer()?;
            initializers.push(Initializer {
                designator,
                value,
                location: loc,
            });

            // Trailing comma is allowed
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_rbrace("after initializer list")?;
        Ok(initializers)
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_logical_and()?);
            left = Expr::BinaryOp {
                op: BinOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_equality()?);
            left = Expr::BinaryOp {
                op: BinOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::EqEq(loc)) {
                BinOp::Eq
            } else if self.match_token(&Token::NotEq(loc)) {
                BinOp::Ne
            } else {
                break;
            };

            let right = Box::new(self.parse_relational()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Lt(loc)) {
                BinOp::Lt
            } else if self.match_token(&Token::Le(loc)) {
                BinOp::Le
            } else if self.match_token(&Token::Gt(loc)) {
                BinOp::Gt
            } else if self.match_token(&Token::Ge(loc)) {
                BinOp::Ge
            } else {
                break;
            };

            let right = Box::new(self.parse_additive()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinOp::Sub
            } else {
                break;
            };

            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinOp::Div
            } else if self.match_token(&Token::Percent(loc)) {
                BinOp::Mod
            } else {
                break;
            };

            let right = Box::new(self.parse_unary()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse unary (- !)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = if self.match_token(&Token::Minus(loc)) {
            // Fold `-N` so that i32::MIN can be written as a literal
            if let Token::IntLiteral(n, _) = self.peek_token() {
                self.advance();
                return Ok(Expr::IntLiteral((-n) as i32, loc));
            }
            UnOp::Neg
        } else if self.match_token(&Token::Bang(loc)) {
            UnOp::Not
        } else if self.match_token(&Token::Plus(loc)) {
            // Unary plus is a no-op on integers
            return self.parse_unary();
        } else if self.check(&Token::Star(loc)) {
            return Err(ParseError::new(
                "pointer dereference is not supported",
                loc,
            ));
        } else {
            return self.parse_postfix();
        };

        let operand = Box::new(self.parse_unary()?);
        Ok(Expr::UnaryOp {
            op,
            operand,
            location: loc,
        })
    }

    /// Parse postfix: member access and calls
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&Token::Dot(loc)) {
                let member = self.expect_identifier()?;
                expr = Expr::MemberAccess {
                    object: Box::new(expr),
                    member,
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let args = self.parse_argument_list()?;
                self.expect_rparen("after function arguments")?;

                let name = if let Expr::Variable(n, _) = expr {
                    n
                } else {
                    return Err(ParseError::new(
                        "Function call must be on identifier",
                        loc,
                    ));
                };

                expr = Expr::FunctionCall {
                    name,
                    args,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...)
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, variables, parenthesized expressions,
    /// compound literals)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, loc) => {
                let value = i32::try_from(n).map_err(|_| {
                    ParseError::new(
                        format!("Integer literal {} does not fit in int", n),
                        loc,
                    )
                })?;
                self.advance();
                return Ok(Expr::IntLiteral(value, loc));
            }
            Token::CharLiteral(c, loc) => {
                self.advance();
                return Ok(Expr::CharLiteral(c, loc));
            }
            Token::Ident(name, loc) => {
                self.advance();
                return Ok(Expr::Variable(name, loc));
            }
            _ => {}
        }

        if self.match_token(&Token::Sizeof(loc)) {
            self.expect_lparen("after 'sizeof'")?;
            if !self.is_type_keyword() {
                return Err(ParseError::new(
                    "sizeof is only supported on type names",
                    self.current_location(),
                ));
            }
            let target_type = self.parse_type()?;
            self.expect_rparen("after sizeof type")?;
            return Ok(Expr::SizeofType {
                target_type,
                location: loc,
            });
        }

        // struct Name{ ... }
        if self.check(&Token::Struct(loc)) {
            let target_type = self.parse_type()?;
            return self.parse_compound_literal_body(target_type, loc);
        }

        if self.match_token(&Token::LParen(loc)) {
            // (struct Name){ ... }
            if self.is_type_keyword() {
                let target_type = self.parse_type()?;
                self.expect_rparen("after compound literal type")?;
                if !self.check(&Token::LBrace(self.current_location())) {
                    return Err(ParseError::new("Casts are not supported", loc));
                }
                return self.parse_compound_literal_body(target_type, loc);
            }

            let expr = self.parse_expression()?;
            self.expect_rparen("after expression")?;
            return Ok(expr);
        }

        if self.check(&Token::LBrace(loc)) {
            return Err(ParseError::new(
                "A braced initializer list needs a type; \
                 write (struct Name){ ... }",
                loc,
            ));
        }

        Err(ParseError::new(
            format!("Unexpected token: {}", self.peek()),
            loc,
        ))
    }

    fn parse_compound_literal_body(
        &mut self,
        target_type: Type,
        loc: SourceLocation,
    ) -> Result<Expr, ParseError> {
        let Type::Struct(struct_name) = target_type else {
            return Err(ParseError::new(
                format!(
                    "Compound literals require a struct type, found '{}'",
                    target_type
                ),
                loc,
            ));
        };

        self.expect_lbrace("to open compound literal")?;
        let initializers = self.parse_initializer_list()?;

        Ok(Expr::CompoundLiteral {
            struct_name,
            initializers,
            location: loc,
        })
    }
}
