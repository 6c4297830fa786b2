//! MyPL: a small statically-typed language with structs, arrays and a
//! built-in list type, compiled to bytecode for a stack-based VM.
//!
//! The pipeline is lex → parse → check → compile → run; each stage is
//! exposed here as a function over source text.

#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::new_without_default)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod span;
pub mod types;
pub mod vm;

use error::MyplError;

/// Scan source code into tokens, ending with the end-of-stream token.
pub fn lex(source: &str) -> Result<Vec<lexer::Token>, MyplError> {
    Ok(lexer::Scanner::new(source).scan_tokens()?)
}

/// Parse source code into an AST without checking it.
pub fn parse(source: &str) -> Result<ast::Program, MyplError> {
    let tokens = lexer::Scanner::new(source).scan_tokens()?;
    let program = parser::Parser::new(tokens).parse()?;
    Ok(program)
}

/// Parse and type check source code, returning the annotated AST.
pub fn check(source: &str) -> Result<ast::Program, MyplError> {
    let mut program = parse(source)?;
    types::TypeChecker::new().check(&mut program)?;
    Ok(program)
}

/// Compile source code into a VM ready to run.
pub fn compile(source: &str) -> Result<vm::Vm, MyplError> {
    let program = check(source)?;
    Ok(vm::generate(&program)?)
}

/// Compile and run a program, writing to stdout and reading stdin.
pub fn run(source: &str) -> Result<(), MyplError> {
    let mut vm = compile(source)?;
    vm.run()?;
    Ok(())
}

/// Bytecode listing of a compiled program.
pub fn dump_ir(vm: &vm::Vm) -> String {
    vm.dump_ir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_lex_ends_with_eof() {
        let tokens = lex("int x = 1").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_stage_errors_are_tagged() {
        let err = lex("int x = !1").unwrap_err();
        assert!(matches!(err, MyplError::Lexer(_)));
        assert!(err.to_string().starts_with("lexer error: "), "{}", err);

        let err = parse("void main( {").unwrap_err();
        assert!(matches!(err, MyplError::Parser(_)));

        let err = check("void main() { int x = true }").unwrap_err();
        assert!(matches!(err, MyplError::Static(_)));
        assert!(err.to_string().contains("expected int, found bool"), "{}", err);

        let mut vm = compile("void main() { int x = 1 / 0 }").unwrap();
        let err: MyplError = vm.run().unwrap_err().into();
        assert!(matches!(err, MyplError::Runtime(_)));
    }

    #[test]
    fn test_compile_and_capture() {
        let mut vm = compile("void main() { print(concat(\"a\", \"b\")) }").unwrap();
        vm.capture_output();
        vm.run().unwrap();
        assert_eq!(vm.output(), "ab");
        assert!(dump_ir(&vm).contains("Frame 'main'"));
    }
}
