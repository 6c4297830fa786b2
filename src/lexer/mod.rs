//! Lexer module: token definitions and the on-demand scanner.

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
