//! Recursive-descent parser for the grits language.
//!
//! Grammar sketch:
//!
//! ```text
//! program   := stmt* EOF
//! stmt      := extern | return | decl | expr ";"
//! extern    := "extern" ident ident "(" params ")" ";"
//! decl      := ident ident ( "(" params ")" "{" stmt* "}"
//!                          | "=" expr ";"
//!                          | ";" )
//! return    := "return" expr ";"
//! expr      := assign
//! assign    := ident "=" assign | compare
//! compare   := term (("==" | "!=" | "<" | "<=" | ">" | ">=") term)*
//! term      := factor (("+" | "-") factor)*
//! factor    := unary (("*" | "/") unary)*
//! unary     := "-" unary | primary
//! primary   := integer | double | ident ["(" args ")"] | "(" expr ")"
//! ```
//!
//! Function and extern declarations are statements, so they appear in
//! the top-level block the same way the lowering pass expects them.

use crate::ast::{BinaryOp, Block, Expr, ExternDecl, FunctionDecl, Param, Stmt};
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Eof,
    Unexpected {
        found: Token,
        expected: &'static str,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Eof => write!(f, "unexpected end of input"),
            ParseError::Unexpected { found, expected } => {
                write!(f, "expected {}, found {:?}", expected, found)
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    // Token utility methods. The lexer always terminates the stream with
    // Eof, so peeking past the end just keeps returning it.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn peek_ahead(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !matches!(token, Token::Eof) {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ParseError> {
        if self.match_token(token) {
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                found: self.peek().clone(),
                expected,
            })
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(name) => Ok(name),
            Token::Eof => Err(ParseError::Eof),
            found => Err(ParseError::Unexpected { found, expected }),
        }
    }

    pub fn parse_program(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), Token::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(Block { stmts })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Token::Extern => self.parse_extern(),
            Token::Return => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::Semicolon, "`;` after return statement")?;
                Ok(Stmt::Return(expr))
            }
            // Two identifiers in a row start a declaration: `int x`.
            Token::Ident(_) if matches!(self.peek_ahead(1), Token::Ident(_)) => self.parse_decl(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&Token::Semicolon, "`;` after expression statement")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    // `type name;`, `type name = expr;`, or `type name(params) { body }`.
    fn parse_decl(&mut self) -> Result<Stmt, ParseError> {
        let ty = self.expect_ident("a type name")?;
        let name = self.expect_ident("an identifier")?;
        match self.peek() {
            Token::LParen => {
                let params = self.parse_params()?;
                self.expect(&Token::LBrace, "`{` to open function body")?;
                let body = self.parse_block()?;
                Ok(Stmt::Function(FunctionDecl {
                    ret_ty: ty,
                    name,
                    params,
                    body,
                }))
            }
            Token::Assign => {
                self.advance();
                let init = self.parse_expr()?;
                self.expect(&Token::Semicolon, "`;` after variable declaration")?;
                Ok(Stmt::VarDecl {
                    ty,
                    name,
                    init: Some(init),
                })
            }
            _ => {
                self.expect(&Token::Semicolon, "`;` after variable declaration")?;
                Ok(Stmt::VarDecl {
                    ty,
                    name,
                    init: None,
                })
            }
        }
    }

    fn parse_extern(&mut self) -> Result<Stmt, ParseError> {
        self.expect(&Token::Extern, "`extern`")?;
        let ret_ty = self.expect_ident("a type name")?;
        let name = self.expect_ident("an identifier")?;
        let params = self.parse_params()?;
        self.expect(&Token::Semicolon, "`;` after extern declaration")?;
        Ok(Stmt::Extern(ExternDecl {
            ret_ty,
            name,
            params,
        }))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&Token::LParen, "`(`")?;
        let mut params = Vec::new();
        if !matches!(self.peek(), Token::RParen) {
            loop {
                let ty = self.expect_ident("a parameter type")?;
                let name = self.expect_ident("a parameter name")?;
                params.push(Param { ty, name });
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(&Token::RParen, "`)` to close parameter list")?;
        Ok(params)
    }

    // The opening brace has already been consumed.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), Token::RBrace | Token::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace, "`}` to close block")?;
        Ok(Block { stmts })
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assign()
    }

    // Right-associative: `x = y = 1` assigns through.
    fn parse_assign(&mut self) -> Result<Expr, ParseError> {
        if let Token::Ident(name) = self.peek()
            && matches!(self.peek_ahead(1), Token::Assign)
        {
            let target = name.clone();
            self.advance();
            self.advance();
            let value = self.parse_assign()?;
            return Ok(Expr::Assign {
                target,
                value: Box::new(value),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_term()?;
        while let Some(op) = self.match_comparison() {
            let rhs = self.parse_term()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn match_comparison(&mut self) -> Option<BinaryOp> {
        let op = match self.peek() {
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::Ne,
            Token::Less => BinaryOp::Lt,
            Token::LessEq => BinaryOp::Le,
            Token::Greater => BinaryOp::Gt,
            Token::GreaterEq => BinaryOp::Ge,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = if self.match_token(&Token::Plus) {
                BinaryOp::Add
            } else if self.match_token(&Token::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_factor()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.match_token(&Token::Star) {
                BinaryOp::Mul
            } else if self.match_token(&Token::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&Token::Minus) {
            let operand = self.parse_unary()?;
            // Fold negation into literals; everything else negates at
            // run time, once the operand's type is known.
            return Ok(match operand {
                Expr::Integer(v) => Expr::Integer(-v),
                Expr::Double(v) => Expr::Double(-v),
                other => Expr::Neg(Box::new(other)),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Token::Integer(v) => Ok(Expr::Integer(v)),
            Token::Double(v) => Ok(Expr::Double(v)),
            Token::Ident(name) => {
                if self.match_token(&Token::LParen) {
                    let mut args = Vec::new();
                    if !matches!(self.peek(), Token::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.match_token(&Token::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(&Token::RParen, "`)` to close argument list")?;
                    Ok(Expr::Call { callee: name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Token::LParen => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen, "`)` to close grouping")?;
                Ok(expr)
            }
            Token::Eof => Err(ParseError::Eof),
            found => Err(ParseError::Unexpected {
                found,
                expected: "an expression",
            }),
        }
    }
}
