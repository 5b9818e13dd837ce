//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. `#include` and other preprocessor directives are silently skipped
//! rather than parsed. Constructs outside the supported subset (string
//! literals, pointers, arrays, loops other than `while`, ...) are rejected
//! here with a [`LexError`] so the user gets a precise location instead of a
//! confusing parse error.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can
/// report an accurate line and column without a separate token→location
/// table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Decimal magnitude; `2147483648` is only valid as the operand of `-`
    IntLiteral(i64, SourceLocation),
    CharLiteral(i8, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Int(SourceLocation),
    Char(SourceLocation),
    Void(SourceLocation),
    Struct(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Return(SourceLocation),
    Sizeof(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Logical
    AndAnd(SourceLocation), // &&
    OrOr(SourceLocation),   // ||
    Bang(SourceLocation),   // !

    // Assignment
    Eq(SourceLocation), // =

    // Member access / designators
    Dot(SourceLocation), // .

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

/// Largest magnitude an integer literal may have
pub const MAX_INT_LITERAL: i64 = i32::MAX as i64 + 1;

/// C keywords that are recognised only to be rejected.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "for", "do", "switch", "case", "default", "break", "continue", "goto",
    "typedef", "union", "enum", "float", "double", "long", "short",
    "unsigned", "signed", "const", "static", "extern",
];

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::CharLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Int(loc)
            | Token::Char(loc)
            | Token::Void(loc)
            | Token::Struct(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Return(loc)
            | Token::Sizeof(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::Bang(loc)
            | Token::Eq(loc)
            | Token::Dot(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::CharLiteral(c, _) => {
                let byte = *c as u8;
                if byte.is_ascii_graphic() || byte == b' ' {
                    write!(f, "char literal '{}'", byte as char)
                } else {
                    write!(f, "char literal '\\x{:02x}'", byte)
                }
            }
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Int(_) => write!(f, "'int'"),
            Token::Char(_) => write!(f, "'char'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Struct(_) => write!(f, "'struct'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::Sizeof(_) => write!(f, "'sizeof'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::OrOr(_) => write!(f, "'||'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            if self.peek() == Some('#') {
                self.skip_preprocessor_directive();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '\'' => self.char_literal(),

            '0'..='9' => self.number_literal(ch),

            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),

            '+' => Ok(Token::Plus(loc)),
            '-' => {
                if self.peek() == Some('>') {
                    Err(unsupported(
                        "'->' (pointers are not supported)",
                        loc,
                    ))
                } else {
                    Ok(Token::Minus(loc))
                }
            }
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Ok(Token::Bang(loc))
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Le(loc))
                } else {
                    Ok(Token::Lt(loc))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::Ge(loc))
                } else {
                    Ok(Token::Gt(loc))
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Ok(Token::AndAnd(loc))
                } else {
                    Err(unsupported(
                        "'&' (only '&&' is supported)",
                        loc,
                    ))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Ok(Token::OrOr(loc))
                } else {
                    Err(unsupported(
                        "'|' (bitwise operators are not supported)",
                        loc,
                    ))
                }
            }
            '.' => Ok(Token::Dot(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            '"' => Err(unsupported("string literals", loc)),
            '[' | ']' => Err(unsupported("arrays", loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse character literal
    fn char_literal(&mut self) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);

        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file in character literal"
                .to_string(),
            location: self.current_location(),
        })?;

        let value = if ch == '\\' {
            let escaped = self.advance().ok_or_else(|| LexError {
                message: "Unexpected end of file in character literal"
                    .to_string(),
                location: self.current_location(),
            })?;

            match escaped {
                'n' => '\n' as i8,
                't' => '\t' as i8,
                'r' => '\r' as i8,
                '\\' => '\\' as i8,
                '\'' => '\'' as i8,
                '0' => 0,
                'x' => {
                    // Hex escape: \xHH
                    let hex1 = self.advance().ok_or_else(|| LexError {
                        message: "Incomplete hex escape sequence".to_string(),
                        location: self.current_location(),
                    })?;
                    let hex2 = self.advance().ok_or_else(|| LexError {
                        message: "Incomplete hex escape sequence".to_string(),
                        location: self.current_location(),
                    })?;

                    let hex_str = format!("{}{}", hex1, hex2);
                    u8::from_str_radix(&hex_str, 16)
                        .map(|v| v as i8)
                        .map_err(|_| LexError {
                            message: format!(
                                "Invalid hex escape sequence: \\x{}",
                                hex_str
                            ),
                            location: self.current_location(),
                        })?
                }
                _ => {
                    return Err(LexError {
                        message: format!(
                            "Unknown escape sequence: \\{}",
                            escaped
                        ),
                        location: self.current_location(),
                    });
                }
            }
        } else if ch.is_ascii() {
            ch as u8 as i8
        } else {
            return Err(LexError {
                message: format!("Non-ASCII character literal: '{}'", ch),
                location: loc,
            });
        };

        if self.advance() != Some('\'') {
            return Err(LexError {
                message: "Expected closing quote in character literal"
                    .to_string(),
                location: self.current_location(),
            });
        }

        Ok(Token::CharLiteral(value, loc))
    }

    /// Parse numeric literal (decimal integers only)
    fn number_literal(&mut self, first_digit: char) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // One past i32::MAX so that `-2147483648` can be written
        let value = num_str
            .parse::<i64>()
            .ok()
            .filter(|n| *n <= MAX_INT_LITERAL)
            .ok_or_else(|| LexError {
                message: format!("Integer literal out of range: {}", num_str),
                location: loc,
            })?;

        Ok(Token::IntLiteral(value, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(
        &mut self,
        first_char: char,
    ) -> Result<Token, LexError> {
        let loc = SourceLocation::new(self.line, self.column - 1);
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let token = match ident.as_str() {
            "int" => Token::Int(loc),
            "char" => Token::Char(loc),
            "void" => Token::Void(loc),
            "struct" => Token::Struct(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "return" => Token::Return(loc),
            "sizeof" => Token::Sizeof(loc),
            kw if UNSUPPORTED_KEYWORDS.contains(&kw) => {
                return Err(unsupported(
                    &format!("keyword '{}'", kw),
                    loc,
                ));
            }
            _ => Token::Ident(ident, loc),
        };

        Ok(token)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Skip preprocessor directive (#include, etc.)
    fn skip_preprocessor_directive(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn unsupported(what: &str, location: SourceLocation) -> LexError {
    LexError {
        message: format!("Unsupported construct: {}", what),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int main() { return 0; }");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[2], Token::LParen(_)));
        assert!(matches!(tokens[3], Token::RParen(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Return(_)));
        assert!(matches!(tokens[6], Token::IntLiteral(0, _)));
        assert!(matches!(tokens[7], Token::Semicolon(_)));
        assert!(matches!(tokens[8], Token::RBrace(_)));
        assert!(matches!(tokens[9], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("== != && || <= >= = !");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::EqEq(_)));
        assert!(matches!(tokens[1], Token::NotEq(_)));
        assert!(matches!(tokens[2], Token::AndAnd(_)));
        assert!(matches!(tokens[3], Token::OrOr(_)));
        assert!(matches!(tokens[4], Token::Le(_)));
        assert!(matches!(tokens[5], Token::Ge(_)));
        assert!(matches!(tokens[6], Token::Eq(_)));
        assert!(matches!(tokens[7], Token::Bang(_)));
    }

    #[test]
    fn test_designated_initializer_tokens() {
        let mut lexer = Lexer::new("(struct A){ .c = 'b' }");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::LParen(_)));
        assert!(matches!(tokens[1], Token::Struct(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "A"));
        assert!(matches!(tokens[3], Token::RParen(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Dot(_)));
        assert!(matches!(tokens[6], Token::Ident(ref s, _) if s == "c"));
        assert!(matches!(tokens[7], Token::Eq(_)));
        assert!(matches!(tokens[8], Token::CharLiteral(98, _)));
        assert!(matches!(tokens[9], Token::RBrace(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer =
            Lexer::new("int x; // comment\nint y; /* block\ncomment */ int z;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Int(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Int(_)));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "z"));
    }

    #[test]
    fn test_char_escapes() {
        let mut lexer = Lexer::new(r"'\n' '\x41' '\0'");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::CharLiteral(10, _)));
        assert!(matches!(tokens[1], Token::CharLiteral(65, _)));
        assert!(matches!(tokens[2], Token::CharLiteral(0, _)));
    }

    #[test]
    fn test_preprocessor_skip() {
        let mut lexer = Lexer::new("#include <stdio.h>\nint x;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
    }

    #[test]
    fn test_unsupported_constructs_rejected() {
        let sources = [
            "char *s = \"hi\";",
            "for (;;) {}",
            "int a[3];",
            "p->x",
            "x & y",
        ];
        for source in sources {
            let err = Lexer::new(source).tokenize().unwrap_err();
            assert!(
                err.message.starts_with("Unsupported construct"),
                "{}: {}",
                source,
                err.message
            );
        }
    }

    #[test]
    fn test_int_literal_range() {
        let tokens = Lexer::new("2147483648").tokenize().unwrap();
        assert!(matches!(tokens[0], Token::IntLiteral(2_147_483_648, _)));

        let err = Lexer::new("2147483649").tokenize().unwrap_err();
        assert_eq!(err.message, "Integer literal out of range: 2147483649");
        assert!(Lexer::new("99999999999999999999").tokenize().is_err());
    }

    #[test]
    fn test_locations_track_lines() {
        let mut lexer = Lexer::new("int\n  x");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location(), SourceLocation::new(2, 3));
    }
}
