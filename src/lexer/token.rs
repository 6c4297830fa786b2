//! Token definitions for the MyPL lexer.

use crate::span::Span;

/// All token types in MyPL. Literal text lives in [`Token::lexeme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    Dot,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Not,

    // Literals
    IntLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    BoolLiteral,
    Null,

    // Type keywords
    Int,
    Double,
    Char,
    String,
    Bool,
    Void,
    List,
    Array,

    // Keywords
    Struct,
    New,
    If,
    Elseif,
    Else,
    While,
    For,
    Return,

    Identifier,
    Eof,
}

impl TokenKind {
    /// Get the keyword token for an identifier, if it is one.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "struct" => Some(TokenKind::Struct),
            "list" => Some(TokenKind::List),
            "array" => Some(TokenKind::Array),
            "for" => Some(TokenKind::For),
            "while" => Some(TokenKind::While),
            "if" => Some(TokenKind::If),
            "elseif" => Some(TokenKind::Elseif),
            "else" => Some(TokenKind::Else),
            "new" => Some(TokenKind::New),
            "return" => Some(TokenKind::Return),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            "int" => Some(TokenKind::Int),
            "double" => Some(TokenKind::Double),
            "char" => Some(TokenKind::Char),
            "string" => Some(TokenKind::String),
            "bool" => Some(TokenKind::Bool),
            "void" => Some(TokenKind::Void),
            "true" | "false" => Some(TokenKind::BoolLiteral),
            "null" => Some(TokenKind::Null),
            _ => None,
        }
    }

    /// One of the five base type keywords.
    pub fn is_base_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Double | TokenKind::Char | TokenKind::String | TokenKind::Bool
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::BoolLiteral
                | TokenKind::Null
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "TIMES",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EqualEqual => "EQUAL",
            TokenKind::BangEqual => "NOT_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQ",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQ",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::IntLiteral => "INT_VAL",
            TokenKind::DoubleLiteral => "DOUBLE_VAL",
            TokenKind::CharLiteral => "CHAR_VAL",
            TokenKind::StringLiteral => "STRING_VAL",
            TokenKind::BoolLiteral => "BOOL_VAL",
            TokenKind::Null => "NULL_VAL",
            TokenKind::Int => "INT_TYPE",
            TokenKind::Double => "DOUBLE_TYPE",
            TokenKind::Char => "CHAR_TYPE",
            TokenKind::String => "STRING_TYPE",
            TokenKind::Bool => "BOOL_TYPE",
            TokenKind::Void => "VOID_TYPE",
            TokenKind::List => "LIST",
            TokenKind::Array => "ARRAY",
            TokenKind::Struct => "STRUCT",
            TokenKind::New => "NEW",
            TokenKind::If => "IF",
            TokenKind::Elseif => "ELSEIF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Return => "RETURN",
            TokenKind::Identifier => "ID",
            TokenKind::Eof => "EOS",
        };
        f.write_str(name)
    }
}

/// A token with its kind, source text, and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::new(line, column),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}: {} '{}'",
            self.span.line, self.span.column, self.kind, self.lexeme
        )
    }
}
