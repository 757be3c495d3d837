//! AST node types for the grits language.
//!
//! Nodes are produced by the parser and are read-only during lowering;
//! they outlive the whole pass. A [`Block`] owns an ordered statement
//! sequence, and a [`FunctionDecl`] owns its parameter list plus one
//! body block. Function declarations only appear at the top level, so
//! scope nesting never exceeds one function body.

/// Binary operator tokens carried on [`Expr::Binary`].
///
/// The comparison operators are part of the grammar but are not lowered
/// yet; see `codegen::expr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64),
    Double(f64),
    Ident(String),
    /// Unary negation. Literal operands fold in the parser, so this node
    /// only carries operands whose value exists at run time.
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    /// Assignment is an expression; its value is the stored right-hand side.
    Assign {
        target: String,
        value: Box<Expr>,
    },
}

/// One declared parameter: a source type name and a binding name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub ret_ty: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

/// A signature-only declaration with external linkage and no body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternDecl {
    pub ret_ty: String,
    pub name: String,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    VarDecl {
        ty: String,
        name: String,
        init: Option<Expr>,
    },
    Return(Expr),
    Function(FunctionDecl),
    Extern(ExternDecl),
}

/// An ordered statement sequence. The whole program is one top-level block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}
