//! Hand-rolled lexer for the grits language.
//!
//! Produces a flat token stream terminated by [`Token::Eof`]. Line and
//! block comments are skipped. Numeric literals split into integer and
//! double tokens at the lexer so the parser never re-inspects digits.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Integer(i64),
    Double(f64),
    Extern,
    Return,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    EqEq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eof,
}

/// A lexical error with the byte offset of the offending character.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: usize,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos: usize = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        // Line comments run to end of line.
        if c == '/' && chars.get(pos + 1) == Some(&'/') {
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            continue;
        }

        // Block comments must close before end of input.
        if c == '/' && chars.get(pos + 1) == Some(&'*') {
            let start = pos;
            pos += 2;
            while pos + 1 < chars.len() && !(chars[pos] == '*' && chars[pos + 1] == '/') {
                pos += 1;
            }
            if pos + 1 >= chars.len() {
                return Err(LexError {
                    message: "unterminated block comment".to_string(),
                    position: start,
                });
            }
            pos += 2;
            continue;
        }

        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            // A dot only continues the literal when a digit follows it.
            let mut is_double = false;
            if pos < chars.len()
                && chars[pos] == '.'
                && chars.get(pos + 1).is_some_and(|d| d.is_ascii_digit())
            {
                is_double = true;
                pos += 1;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let text: String = chars[start..pos].iter().collect();
            if is_double {
                let value = text.parse::<f64>().map_err(|_| LexError {
                    message: format!("malformed double literal `{}`", text),
                    position: start,
                })?;
                tokens.push(Token::Double(value));
            } else {
                let value = text.parse::<i64>().map_err(|_| LexError {
                    message: format!("integer literal out of range `{}`", text),
                    position: start,
                })?;
                tokens.push(Token::Integer(value));
            }
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            tokens.push(match word.as_str() {
                "extern" => Token::Extern,
                "return" => Token::Return,
                _ => Token::Ident(word),
            });
            continue;
        }

        let next = chars.get(pos + 1).copied();
        let (token, width) = match (c, next) {
            ('=', Some('=')) => (Token::EqEq, 2),
            ('!', Some('=')) => (Token::NotEq, 2),
            ('<', Some('=')) => (Token::LessEq, 2),
            ('>', Some('=')) => (Token::GreaterEq, 2),
            ('=', _) => (Token::Assign, 1),
            ('<', _) => (Token::Less, 1),
            ('>', _) => (Token::Greater, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            ('{', _) => (Token::LBrace, 1),
            ('}', _) => (Token::RBrace, 1),
            (',', _) => (Token::Comma, 1),
            (';', _) => (Token::Semicolon, 1),
            (other, _) => {
                return Err(LexError {
                    message: format!("unexpected character `{}`", other),
                    position: pos,
                });
            }
        };
        tokens.push(token);
        pos += width;
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}
