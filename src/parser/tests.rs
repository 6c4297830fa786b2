//! Parser tests.

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::{Scanner, TokenKind};
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_err(source: &str) -> String {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap_err().to_string()
    }

    fn main_body(source: &str) -> Vec<Stmt> {
        let program = parse(&format!("void main() {{ {} }}", source));
        program.fun_defs.into_iter().next().unwrap().stmts
    }

    fn decl_expr(source: &str) -> Expr {
        match main_body(source).into_iter().next().unwrap() {
            Stmt::VarDecl(decl) => decl.expr,
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    fn ops(expr: &Expr) -> Vec<BinaryOp> {
        let mut result = Vec::new();
        let mut current = expr;
        while let Some((op, rest)) = &current.rest {
            result.push(op.op);
            current = rest;
        }
        result
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse(""), Program::new());
    }

    #[test]
    fn test_struct_definition() {
        let program = parse("struct Node { int val, Node next, array double ws }");
        let node = &program.struct_defs[0];
        assert_eq!(node.name(), "Node");
        let fields: Vec<(&str, String)> = node
            .fields
            .iter()
            .map(|f| (f.name(), f.data_type.to_string()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("val", "int".to_string()),
                ("next", "Node".to_string()),
                ("ws", "array double".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_struct() {
        let program = parse("struct Empty {}");
        assert!(program.struct_defs[0].fields.is_empty());
    }

    #[test]
    fn test_function_signature() {
        let program = parse("array int f(int x, list l, Node n) { return null }");
        let f = &program.fun_defs[0];
        assert_eq!(f.return_type, DataType::new("int", true));
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.params[1].data_type, DataType::scalar("list"));
        assert_eq!(f.params[2].data_type, DataType::scalar("Node"));
    }

    #[test]
    fn test_statement_disambiguation() {
        let stmts = main_body("Node n = new Node n.val = 1 f(n) x = 2 a[0] = 3 int y = 4");
        assert!(matches!(stmts[0], Stmt::VarDecl(_)));
        assert!(matches!(stmts[1], Stmt::Assign(_)));
        assert!(matches!(stmts[2], Stmt::Call(_)));
        assert!(matches!(stmts[3], Stmt::Assign(_)));
        assert!(matches!(stmts[4], Stmt::Assign(_)));
        assert!(matches!(stmts[5], Stmt::VarDecl(_)));
    }

    #[test]
    fn test_flat_right_chain() {
        let expr = decl_expr("int x = 1 * 2 + 3");
        assert_eq!(ops(&expr), vec![BinaryOp::Multiply, BinaryOp::Add]);
        // No precedence: the right side is the chain `2 + 3`.
        let (_, rest) = expr.rest.as_ref().unwrap();
        assert!(matches!(rest.first, Term::Simple(RValue::Simple(_))));
        assert_eq!(ops(rest), vec![BinaryOp::Add]);
    }

    #[test]
    fn test_logical_ops_share_level() {
        let expr = decl_expr("bool b = x < 1 and y");
        assert_eq!(ops(&expr), vec![BinaryOp::Less, BinaryOp::And]);
    }

    #[test]
    fn test_parenthesized_term() {
        let expr = decl_expr("int x = (1 + 2) * 3");
        assert!(matches!(expr.first, Term::Complex(_)));
        assert_eq!(ops(&expr), vec![BinaryOp::Multiply]);
    }

    #[test]
    fn test_not_negates_whole_chain() {
        let expr = decl_expr("bool b = not x and y");
        assert!(expr.negated);
        assert_eq!(ops(&expr), vec![BinaryOp::And]);
    }

    #[test]
    fn test_double_negation_nests() {
        let expr = decl_expr("bool b = not not x");
        assert!(expr.negated);
        match expr.first {
            Term::Complex(inner) => assert!(inner.negated),
            other => panic!("Expected nested expression, got {:?}", other),
        }
    }

    #[test]
    fn test_new_values() {
        let stmts = main_body("P p = new P array P ps = new P[3] array int xs = new int[n]");
        let news: Vec<(String, bool)> = stmts
            .iter()
            .map(|s| match s {
                Stmt::VarDecl(VarDeclStmt {
                    expr:
                        Expr {
                            first: Term::Simple(RValue::New(new)),
                            ..
                        },
                    ..
                }) => (new.type_name.lexeme.clone(), new.array_expr.is_some()),
                other => panic!("Expected new, got {:?}", other),
            })
            .collect();
        assert_eq!(
            news,
            vec![
                ("P".to_string(), false),
                ("P".to_string(), true),
                ("int".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_var_path() {
        let stmts = main_body("a[i].b.c[0] = 1");
        match &stmts[0] {
            Stmt::Assign(assign) => {
                let shape: Vec<(&str, bool)> = assign
                    .lvalue
                    .iter()
                    .map(|v| (v.name(), v.is_indexed()))
                    .collect();
                assert_eq!(shape, vec![("a", true), ("b", false), ("c", true)]);
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_call_arguments() {
        let expr = decl_expr("int x = f(1, g(), h.k[2])");
        match expr.first {
            Term::Simple(RValue::Call(call)) => {
                assert_eq!(call.name(), "f");
                assert_eq!(call.args.len(), 3);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_list_retrieve_call() {
        let expr = decl_expr("int x = list<int>retrieve(l, 0)");
        match expr.first {
            Term::Simple(RValue::Call(call)) => assert_eq!(call.name(), "list<int>retrieve"),
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_if_elseif_else() {
        let stmts = main_body(
            "if (a) { x = 1 } elseif (b) { x = 2 } elseif (c) { } else { x = 3 x = 4 }",
        );
        match &stmts[0] {
            Stmt::If(s) => {
                assert_eq!(s.if_part.stmts.len(), 1);
                assert_eq!(s.else_ifs.len(), 2);
                assert!(s.else_ifs[1].stmts.is_empty());
                assert_eq!(s.else_stmts.len(), 2);
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop() {
        let stmts = main_body("for (int i = 0; i < 10; i = i + 1) { print(i) }");
        match &stmts[0] {
            Stmt::For(f) => {
                assert_eq!(f.var_decl.var_def.name(), "i");
                assert_eq!(f.assign_stmt.lvalue[0].name(), "i");
                assert_eq!(f.stmts.len(), 1);
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_while_and_return() {
        let program = parse("int f() { while (true) { return 1 } return 0 }");
        let stmts = &program.fun_defs[0].stmts;
        assert!(matches!(stmts[0], Stmt::While(_)));
        assert!(matches!(stmts[1], Stmt::Return(_)));
    }

    #[test]
    fn test_literal_tokens() {
        let expr = decl_expr("string s = \"hi\"");
        match expr.first {
            Term::Simple(RValue::Simple(token)) => {
                assert_eq!(token.kind, TokenKind::StringLiteral);
                assert_eq!(token.lexeme, "hi");
            }
            other => panic!("Expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_err("void main() { int = 1 }"),
            "unexpected token '=', expected identifier at line 1, column 19"
        );
        assert!(parse_err("void main() { x + 1 }").contains("expected declaration"));
        assert!(parse_err("void main() { int x = }").contains("expected value"));
        assert!(parse_err("void main() {").contains("unexpected end of file"));
        assert!(parse_err("struct S { int x, }").contains("expected data type"));
        assert!(parse_err("void main() { x = new 3 }").contains("type name after 'new'"));
    }

    #[test]
    fn test_long_chain_within_limit() {
        let terms = vec!["1"; 200].join(" + ");
        let expr = decl_expr(&format!("int x = {}", terms));
        assert_eq!(ops(&expr), vec![BinaryOp::Add; 199]);
    }

    #[test]
    fn test_nesting_limit() {
        let terms = vec!["1"; 1000].join(" + ");
        assert!(parse_err(&format!("void main() {{ int x = {} }}", terms))
            .contains("expression nested too deeply"));

        let parens = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert!(parse_err(&format!("void main() {{ int x = {} }}", parens))
            .contains("expression nested too deeply"));

        let indexes = format!("{}0{}", "xs[".repeat(1000), "]".repeat(1000));
        assert!(parse_err(&format!("void main() {{ int x = {} }}", indexes))
            .contains("expression nested too deeply"));
    }
}
