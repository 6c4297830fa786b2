//! Static semantics: symbol tables, built-in signatures and the checker.

pub mod builtins;
pub mod checker;
pub mod environment;

pub use checker::TypeChecker;
pub use environment::{FunctionSig, TypeEnvironment};
