//! Error types for all pipeline stages.

use std::fmt;

use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("expecting '!=' at {0}")]
    LoneBang(Span),

    #[error("unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("{message} at {span}")]
    InvalidChar { message: String, span: Span },

    #[error("{message} '{lexeme}' at {span}")]
    InvalidNumber {
        message: String,
        lexeme: String,
        span: Span,
    },
}

impl LexerError {
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::UnexpectedChar(c, span)
    }

    pub fn invalid_char(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidChar {
            message: message.into(),
            span,
        }
    }

    pub fn invalid_number(message: impl Into<String>, lexeme: impl Into<String>, span: Span) -> Self {
        Self::InvalidNumber {
            message: message.into(),
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::LoneBang(span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidChar { span, .. } => *span,
            Self::InvalidNumber { span, .. } => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of file at {0}")]
    UnexpectedEof(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn unexpected_eof(span: Span) -> Self {
        Self::UnexpectedEof(span)
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Semantic checker errors.
#[derive(Debug, Error)]
pub enum StaticError {
    #[error("type mismatch: expected {expected}, found {found} at {span}")]
    Mismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("undefined variable '{0}' at {1}")]
    UndefinedVariable(String, Span),

    #[error("undefined type '{0}' at {1}")]
    UndefinedType(String, Span),

    #[error("undefined function '{0}' at {1}")]
    UndefinedFunction(String, Span),

    #[error("wrong number of arguments to '{name}': expected {expected}, got {got} at {span}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("type '{type_name}' has no field '{field}' at {span}")]
    NoSuchField {
        type_name: String,
        field: String,
        span: Span,
    },

    #[error("multiple definitions of '{0}' at {1}")]
    Duplicate(String, Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },

    #[error("{0}")]
    Program(String),
}

impl StaticError {
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    /// The source position, if the error is tied to one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Mismatch { span, .. } => Some(*span),
            Self::UndefinedVariable(_, span) => Some(*span),
            Self::UndefinedType(_, span) => Some(*span),
            Self::UndefinedFunction(_, span) => Some(*span),
            Self::WrongArity { span, .. } => Some(*span),
            Self::NoSuchField { span, .. } => Some(*span),
            Self::Duplicate(_, span) => Some(*span),
            Self::General { span, .. } => Some(*span),
            Self::Program(_) => None,
        }
    }
}

/// Bytecode lowering errors. The checker rejects everything that could
/// trigger these, so they indicate an unchecked or malformed tree.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::General { span, .. } => *span,
        }
    }
}

/// Where in the bytecode a runtime error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub function: String,
    pub pc: usize,
    pub instr: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in {} at {}: {}", self.function, self.pc, self.instr)
    }
}

/// VM errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no 'main' function")]
    MissingMain,

    #[error("division by zero ({0})")]
    DivisionByZero(Location),

    #[error("null reference ({0})")]
    NullReference(Location),

    #[error("out-of-bounds {kind} index {index} ({location})")]
    IndexOutOfBounds {
        kind: &'static str,
        index: i64,
        location: Location,
    },

    #[error("cannot convert '{value}' to {target} ({location})")]
    Conversion {
        value: String,
        target: &'static str,
        location: Location,
    },

    #[error("unknown function '{name}' ({location})")]
    UnknownFunction { name: String, location: Location },

    #[error("expected {expected}, found {found} ({location})")]
    TypeMismatch {
        expected: String,
        found: String,
        location: Location,
    },

    #[error("{message} ({location})")]
    General { message: String, location: Location },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::MissingMain => None,
            Self::DivisionByZero(location) => Some(location),
            Self::NullReference(location) => Some(location),
            Self::IndexOutOfBounds { location, .. } => Some(location),
            Self::Conversion { location, .. } => Some(location),
            Self::UnknownFunction { location, .. } => Some(location),
            Self::TypeMismatch { location, .. } => Some(location),
            Self::General { location, .. } => Some(location),
        }
    }
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum MyplError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("static error: {0}")]
    Static(#[from] StaticError),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
