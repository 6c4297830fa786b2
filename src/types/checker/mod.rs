//! Semantic checker for MyPL.
//!
//! A fail-fast pass over the program: the first violation is returned.
//! The checker also rewrites `length` calls on arrays so the code
//! generator can pick the right instruction.

mod declarations;
mod expressions;
mod statements;

use crate::ast::*;
use crate::error::StaticError;
use crate::span::Span;
use crate::types::environment::TypeEnvironment;

pub(crate) type TypeResult<T> = Result<T, StaticError>;

/// The type checker verifies the static semantics of MyPL programs.
pub struct TypeChecker {
    pub(crate) env: TypeEnvironment,
    /// Declared return type of the function being checked.
    pub(crate) current_return: Option<DataType>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            env: TypeEnvironment::new(),
            current_return: None,
        }
    }

    /// Check a complete program, annotating it in place.
    pub fn check(&mut self, program: &mut Program) -> TypeResult<()> {
        for def in &program.struct_defs {
            self.declare_struct(def)?;
        }
        for def in &program.fun_defs {
            self.declare_function(def)?;
        }
        if self.env.get_function("main").is_none() {
            return Err(StaticError::Program(
                "program missing main function".to_string(),
            ));
        }

        for def in &program.struct_defs {
            self.check_struct_def(def)?;
        }
        for def in &mut program.fun_defs {
            self.check_fun_def(def)?;
        }
        Ok(())
    }

    /// Declared types must name a base type, `list`, a struct, or
    /// (for return types only) `void`.
    pub(crate) fn check_declared_type(
        &self,
        ty: &DataType,
        allow_void: bool,
        span: Span,
    ) -> TypeResult<()> {
        let name = ty.type_name.as_str();
        let valid = ty.is_base()
            || (name == "list" && !ty.is_array)
            || (name == "void" && allow_void && !ty.is_array)
            || self.env.get_struct(name).is_some();
        if valid {
            Ok(())
        } else {
            Err(StaticError::UndefinedType(ty.to_string(), span))
        }
    }

    /// Assignability: equal types, or a `null` (void) value.
    pub(crate) fn accepts(expected: &DataType, actual: &DataType) -> bool {
        actual.is_void() || expected == actual
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::types::builtins::ARRAY_LENGTH;

    fn check(source: &str) -> TypeResult<Program> {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let mut program = Parser::new(tokens).parse().unwrap();
        TypeChecker::new().check(&mut program)?;
        Ok(program)
    }

    fn check_main(body: &str) -> TypeResult<Program> {
        check(&format!("void main() {{ {} }}", body))
    }

    fn assert_ok(source: &str) {
        if let Err(e) = check(source) {
            panic!("expected {:?} to check, got: {}", source, e);
        }
    }

    fn assert_err(source: &str, needle: &str) {
        match check(source) {
            Ok(_) => panic!("expected {:?} to fail", source),
            Err(e) => assert!(
                e.to_string().contains(needle),
                "error {:?} does not mention {:?}",
                e.to_string(),
                needle
            ),
        }
    }

    fn main_err(body: &str, needle: &str) {
        assert_err(&format!("void main() {{ {} }}", body), needle);
    }

    const POINT: &str = "struct P { int x, int y, array int zs, P next }";

    #[test]
    fn test_minimal_program() {
        assert_ok("void main() { }");
    }

    #[test]
    fn test_main_rules() {
        assert_err("void f() { }", "program missing main function");
        assert_err("int main() { return 0 }", "main function must have void type");
        assert_err(
            "void main(int x) { }",
            "main function cannot have parameters",
        );
        assert_err("void main() { } void main() { }", "multiple definitions of 'main'");
    }

    #[test]
    fn test_definitions_are_unique() {
        assert_err(
            "struct A { } struct A { } void main() { }",
            "multiple definitions of 'A'",
        );
        assert_err("struct A { int x, int x } void main() { }", "multiple definitions of 'x'");
        assert_err("void f(int a, int a) { } void main() { }", "multiple definitions of 'a'");
        assert_err("void print(int x) { } void main() { }", "redefining built-in function 'print'");
    }

    #[test]
    fn test_declared_types_must_exist() {
        assert_err("struct A { B b } void main() { }", "undefined type 'B'");
        assert_err("void f(void x) { } void main() { }", "undefined type 'void'");
        assert_err("Q f() { return null } void main() { }", "undefined type 'Q'");
        assert_ok("struct A { A next, list items } list f(A a) { return null } void main() { }");
    }

    #[test]
    fn test_var_decl_types() {
        assert!(check_main("int x = 1 double d = 1.5 string s = \"a\" char c = 'c' bool b = true").is_ok());
        assert!(check_main("int x = null").is_ok());
        main_err("int x = 1.5", "expected int, found double");
        main_err("array int xs = new double[2]", "expected array int, found array double");
        main_err("int x = 1 int x = 2", "multiple definitions of 'x'");
        main_err("int x = y", "undefined variable 'y'");
    }

    #[test]
    fn test_shadowing_in_nested_block() {
        assert!(check_main("int x = 1 while (true) { string x = \"a\" }").is_ok());
        main_err("while (true) { int y = 1 } int z = y", "undefined variable 'y'");
    }

    #[test]
    fn test_operators() {
        assert!(check_main("int x = 1 + 2 double d = 2.0 / 4.0 bool b = 1 < 2").is_ok());
        assert!(check_main("bool b = \"a\" <= \"b\" bool c = 'a' > 'b'").is_ok());
        assert!(check_main("bool b = true and false bool c = not b").is_ok());
        assert!(check_main("string s = null bool b = s == null bool c = null != s").is_ok());
        main_err("int x = 1 + 2.0", "invalid operand types");
        main_err("string s = \"a\" + \"b\"", "invalid operand types");
        main_err("bool b = true < false", "invalid operand types");
        main_err("bool b = 1 == 1.0", "invalid operand types");
        main_err("bool b = 1 and true", "invalid operand types");
        main_err("bool b = not 1", "expected bool, found int");
    }

    #[test]
    fn test_conditions_must_be_bool() {
        main_err("if (1) { }", "expected bool, found int");
        main_err("if (true) { } elseif (\"s\") { }", "expected bool, found string");
        main_err("while (null) { }", "expected bool, found void");
        main_err("for (int i = 0; i; i = i + 1) { }", "expected bool, found int");
    }

    #[test]
    fn test_for_loop_rules() {
        assert!(check_main("for (int i = 0; i < 3; i = i + 1) { print(i) }").is_ok());
        main_err("for (double i = 0.0; true; i = i + 1.0) { }", "expected int, found double");
        main_err("for (int i = 0; i < 3; i = i + 1) { } print(i)", "undefined variable 'i'");
    }

    #[test]
    fn test_struct_paths() {
        let ok = format!(
            "{} void main() {{ P p = new P p.x = 1 p.next = new P p.next.y = p.x \
             p.zs = new int[3] p.zs[0] = 4 int z = p.next.zs[1] array P ps = new P[2] ps[0].x = 1 }}",
            POINT
        );
        assert_ok(&ok);
        assert_err(
            &format!("{} void main() {{ P p = new P p.w = 1 }}", POINT),
            "type 'P' has no field 'w'",
        );
        assert_err(
            &format!("{} void main() {{ int x = 1 x.y = 2 }}", POINT),
            "cannot access field 'y' of non-struct type 'int'",
        );
        assert_err(
            &format!("{} void main() {{ P p = new P p.x[0] = 1 }}", POINT),
            "'x' is not an array",
        );
        assert_err(
            &format!("{} void main() {{ P p = new P p.zs[true] = 1 }}", POINT),
            "expected int, found bool",
        );
        assert_err(
            &format!("{} void main() {{ P p = new P p.x = \"s\" }}", POINT),
            "expected int, found string",
        );
    }

    #[test]
    fn test_new_rules() {
        main_err("int x = new Q", "undefined type 'Q'");
        main_err("array int xs = new int[1.0]", "expected int, found double");
    }

    #[test]
    fn test_builtin_signatures() {
        assert!(check_main(
            "print(1) string s = input() string t = to_string(1.5) int i = to_int(\"4\") \
             double d = to_double(3) int n = length(s) char c = get(0, s) string u = concat(s, t)"
        )
        .is_ok());
        main_err("print(1, 2)", "expected 1, got 2");
        main_err("print(new int[2])", "expected base type, found array int");
        main_err("string s = to_string(true)", "expected non-bool base type, found bool");
        main_err("int i = to_int(1)", "expected non-int base type, found int");
        main_err("double d = to_double(1.0)", "expected non-double base type, found double");
        main_err("int n = length(1)", "expected string or array, found int");
        main_err("char c = get(\"s\", 0)", "expected int, found string");
        main_err("string s = concat(\"a\", 1)", "expected string, found int");
    }

    #[test]
    fn test_length_of_array_is_rewritten() {
        let program = check_main("array int xs = new int[3] int n = length(xs)").unwrap();
        match &program.fun_defs[0].stmts[1] {
            Stmt::VarDecl(decl) => match &decl.expr.first {
                Term::Simple(RValue::Call(call)) => assert_eq!(call.name(), ARRAY_LENGTH),
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_list_builtins() {
        assert!(check_main(
            "list l = list_create() list_add(l, 1) list_add(l, \"two\") int a = list_numi(l) \
             int b = list_numd(l) int c = list_nums(l) int d = list_numb(l) list_rmb(l) \
             int e = list_avgi(l) double f = list_avgd(l) list_change(l, 0, 3.5) \
             int g = list_size(l) int h = list<int>retrieve(l, 0) string s = list<string>retrieve(l, 1)"
        )
        .is_ok());
        main_err("int x = 1 list_add(x, 1)", "expected list, found int");
        main_err("list l = list_create() list_change(l, \"0\", 1)", "expected int, found string");
        main_err("list l = list_create() string s = list<int>retrieve(l, 0)", "expected string, found int");
        main_err("list l = list_create() int x = list<Q>retrieve(l, 0)", "undefined type 'Q'");
        main_err("list l = list_create() int x = list_size(l, 1)", "expected 1, got 2");
    }

    #[test]
    fn test_user_calls() {
        assert_ok("int add(int a, int b) { return a + b } void main() { int x = add(1, 2) }");
        assert_ok("struct N { } void f(N n) { } void main() { f(null) }");
        assert_err("void main() { g() }", "undefined function 'g'");
        assert_err(
            "int add(int a, int b) { return a + b } void main() { int x = add(1) }",
            "expected 2, got 1",
        );
        assert_err(
            "int add(int a, int b) { return a + b } void main() { int x = add(1, 2.0) }",
            "expected int, found double",
        );
        assert_err(
            "string f() { return \"s\" } void main() { int x = f() }",
            "expected int, found string",
        );
    }

    #[test]
    fn test_return_types() {
        assert_ok("int f() { return 1 } void g() { return null } void main() { }");
        assert_ok("array int f() { return new int[1] } void main() { }");
        assert_err("int f() { return true } void main() { }", "expected int, found bool");
        assert_err("void f() { return 1 } void main() { }", "expected void, found int");
        assert_err("array int f() { return 1 } void main() { }", "expected array int, found int");
    }

    /// Changing any single type in a valid program must be rejected.
    #[test]
    fn test_single_type_mutations_are_rejected() {
        let template = "struct S { {0} v } {1} f({2} a) { {3} b = a S s = new S s.v = b return s.v } \
                        void main() { {4} r = f({5}) }";
        let valid = ["int", "int", "int", "int", "int", "7"];
        let fill = |parts: &[&str]| {
            let mut source = template.to_string();
            for (i, part) in parts.iter().enumerate() {
                source = source.replace(&format!("{{{}}}", i), part);
            }
            source
        };
        assert_ok(&fill(&valid[..]));

        for i in 0..valid.len() {
            let mut mutated = valid;
            mutated[i] = if i == 5 { "7.5" } else { "double" };
            assert!(
                check(&fill(&mutated[..])).is_err(),
                "mutation {} should be rejected: {}",
                i,
                fill(&mutated[..])
            );
        }
    }
}
