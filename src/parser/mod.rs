//! Recursive-descent parser for MyPL.

mod core;
mod declarations;
mod expressions;
mod statements;

#[cfg(test)]
mod tests;

pub use self::core::{ParseResult, Parser};
