//! Expression AST nodes.
//!
//! Expressions are flat right-leaning chains: `a + b * c` is `a + (b * c)`.
//! There are no precedence levels.

use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// An expression chain, optionally negated as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub negated: bool,
    pub first: Term,
    pub rest: Option<(Operator, Box<Expr>)>,
}

impl Expr {
    /// Position of the first term.
    pub fn span(&self) -> Span {
        self.first.span()
    }
}

/// A binary operator together with its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator {
    pub op: BinaryOp,
    pub span: Span,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Subtract),
            TokenKind::Star => Some(Self::Multiply),
            TokenKind::Slash => Some(Self::Divide),
            TokenKind::And => Some(Self::And),
            TokenKind::Or => Some(Self::Or),
            TokenKind::EqualEqual => Some(Self::Equal),
            TokenKind::BangEqual => Some(Self::NotEqual),
            TokenKind::Less => Some(Self::Less),
            TokenKind::LessEqual => Some(Self::LessEqual),
            TokenKind::Greater => Some(Self::Greater),
            TokenKind::GreaterEqual => Some(Self::GreaterEqual),
            _ => None,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual
        )
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::And => "and",
            Self::Or => "or",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
        };
        f.write_str(s)
    }
}

/// A term in an expression chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Simple(RValue),
    /// A parenthesized sub-expression.
    Complex(Box<Expr>),
}

impl Term {
    pub fn span(&self) -> Span {
        match self {
            Term::Simple(rvalue) => rvalue.span(),
            Term::Complex(expr) => expr.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    /// A literal token: int, double, char, string, bool or null.
    Simple(Token),
    New(NewRValue),
    /// A dotted/indexed variable path such as `a.b[i].c`.
    Var(Vec<VarRef>),
    Call(CallExpr),
}

impl RValue {
    pub fn span(&self) -> Span {
        match self {
            RValue::Simple(token) => token.span,
            RValue::New(new) => new.type_name.span,
            RValue::Var(path) => path.first().map(|v| v.var_name.span).unwrap_or_default(),
            RValue::Call(call) => call.fun_name.span,
        }
    }
}

/// `new T` (struct) or `new T[len]` (array).
#[derive(Debug, Clone, PartialEq)]
pub struct NewRValue {
    pub type_name: Token,
    pub array_expr: Option<Box<Expr>>,
}

/// One segment of a variable path; indexed when `array_expr` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    pub var_name: Token,
    pub array_expr: Option<Box<Expr>>,
}

impl VarRef {
    pub fn name(&self) -> &str {
        &self.var_name.lexeme
    }

    pub fn is_indexed(&self) -> bool {
        self.array_expr.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub fun_name: Token,
    pub args: Vec<Expr>,
}

impl CallExpr {
    pub fn name(&self) -> &str {
        &self.fun_name.lexeme
    }
}
