//! Pretty-printer: renders a program back to canonical MyPL source.

use crate::ast::*;
use crate::lexer::TokenKind;

const INDENT: &str = "  ";

/// Render a program with two-space indentation, one statement per line.
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::default();
    printer.program(program);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn program(&mut self, program: &Program) {
        let mut first = true;
        for def in &program.struct_defs {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.struct_def(def);
        }
        for def in &program.fun_defs {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.fun_def(def);
        }
    }

    fn struct_def(&mut self, def: &StructDef) {
        self.out.push_str(&format!("struct {} {{\n", def.name()));
        self.depth += 1;
        for (i, field) in def.fields.iter().enumerate() {
            self.pad();
            self.var_def(field);
            if i + 1 < def.fields.len() {
                self.out.push(',');
            }
            self.out.push('\n');
        }
        self.depth -= 1;
        self.out.push_str("}\n");
    }

    fn fun_def(&mut self, def: &FunDef) {
        self.out
            .push_str(&format!("{} {}(", def.return_type, def.name()));
        for (i, param) in def.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.var_def(param);
        }
        self.out.push_str(") ");
        self.block(&def.stmts);
        self.out.push('\n');
    }

    fn var_def(&mut self, def: &VarDef) {
        self.out
            .push_str(&format!("{} {}", def.data_type, def.name()));
    }

    /// `{`, the indented statements, then `}` at the current depth.
    fn block(&mut self, stmts: &[Stmt]) {
        self.out.push_str("{\n");
        self.depth += 1;
        for stmt in stmts {
            self.pad();
            self.stmt(stmt);
            self.out.push('\n');
        }
        self.depth -= 1;
        self.pad();
        self.out.push('}');
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.var_decl(decl),
            Stmt::Assign(assign) => self.assign(assign),
            Stmt::If(stmt) => {
                self.out.push_str("if ");
                self.basic_if(&stmt.if_part);
                for part in &stmt.else_ifs {
                    self.out.push('\n');
                    self.pad();
                    self.out.push_str("elseif ");
                    self.basic_if(part);
                }
                if !stmt.else_stmts.is_empty() {
                    self.out.push('\n');
                    self.pad();
                    self.out.push_str("else ");
                    self.block(&stmt.else_stmts);
                }
            }
            Stmt::While(stmt) => {
                self.out.push_str("while (");
                self.expr(&stmt.condition);
                self.out.push_str(") ");
                self.block(&stmt.stmts);
            }
            Stmt::For(stmt) => {
                self.out.push_str("for (");
                self.var_decl(&stmt.var_decl);
                self.out.push_str("; ");
                self.expr(&stmt.condition);
                self.out.push_str("; ");
                self.assign(&stmt.assign_stmt);
                self.out.push_str(") ");
                self.block(&stmt.stmts);
            }
            Stmt::Return(ret) => {
                self.out.push_str("return ");
                self.expr(&ret.expr);
            }
            Stmt::Call(call) => self.call(call),
        }
    }

    fn basic_if(&mut self, part: &BasicIf) {
        self.out.push('(');
        self.expr(&part.condition);
        self.out.push_str(") ");
        self.block(&part.stmts);
    }

    fn var_decl(&mut self, decl: &VarDeclStmt) {
        self.var_def(&decl.var_def);
        self.out.push_str(" = ");
        self.expr(&decl.expr);
    }

    fn assign(&mut self, assign: &AssignStmt) {
        self.var_path(&assign.lvalue);
        self.out.push_str(" = ");
        self.expr(&assign.expr);
    }

    fn expr(&mut self, expr: &Expr) {
        if expr.negated {
            self.out.push_str("not ");
        }
        self.term(&expr.first);
        if let Some((op, rest)) = &expr.rest {
            self.out.push_str(&format!(" {} ", op.op));
            self.expr(rest);
        }
    }

    fn term(&mut self, term: &Term) {
        match term {
            Term::Simple(rvalue) => self.rvalue(rvalue),
            Term::Complex(expr) => {
                self.out.push('(');
                self.expr(expr);
                self.out.push(')');
            }
        }
    }

    fn rvalue(&mut self, rvalue: &RValue) {
        match rvalue {
            RValue::Simple(token) => match token.kind {
                TokenKind::StringLiteral => self.out.push_str(&format!("\"{}\"", token.lexeme)),
                TokenKind::CharLiteral => self.out.push_str(&format!("'{}'", token.lexeme)),
                _ => self.out.push_str(&token.lexeme),
            },
            RValue::New(new) => {
                self.out.push_str("new ");
                self.out.push_str(&new.type_name.lexeme);
                if let Some(length) = &new.array_expr {
                    self.out.push('[');
                    self.expr(length);
                    self.out.push(']');
                }
            }
            RValue::Var(path) => self.var_path(path),
            RValue::Call(call) => self.call(call),
        }
    }

    fn var_path(&mut self, path: &[VarRef]) {
        for (i, var_ref) in path.iter().enumerate() {
            if i > 0 {
                self.out.push('.');
            }
            self.out.push_str(var_ref.name());
            if let Some(index) = &var_ref.array_expr {
                self.out.push('[');
                self.expr(index);
                self.out.push(']');
            }
        }
    }

    fn call(&mut self, call: &CallExpr) {
        self.out.push_str(call.name());
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }

    fn pad(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    #[test]
    fn test_canonical_layout() {
        let source = "struct P { int x, array P ps } \
                      int f(P p, list l) { if (p == null) { return 0 } elseif (not p.x < 2) { return 1 } \
                      else { p.ps[0].x = (1 + 2) * 3 } return p.x } \
                      void main() { for (int i = 0; i < 3; i = i + 1) { print(f(new P, list_create())) } \
                      while (true) { char c = 'a' string s = \"b\\n\" } }";
        let expected = "\
struct P {
  int x,
  array P ps
}

int f(P p, list l) {
  if (p == null) {
    return 0
  }
  elseif (not p.x < 2) {
    return 1
  }
  else {
    p.ps[0].x = (1 + 2) * 3
  }
  return p.x
}

void main() {
  for (int i = 0; i < 3; i = i + 1) {
    print(f(new P, list_create()))
  }
  while (true) {
    char c = 'a'
    string s = \"b\\n\"
  }
}
";
        assert_eq!(print_program(&parse(source)), expected);
    }

    #[test]
    fn test_reprint_is_a_fixpoint() {
        let source = "struct N { int v, N next } \
                      void main() { N n = new N n.next = new N array int xs = new int[n.v] \
                      bool b = not not true int z = list<int>retrieve(list_create(), 0) }";
        let printed = print_program(&parse(source));
        assert_eq!(print_program(&parse(&printed)), printed);
    }

    /// Debug form of a program with every `Span { .. }` removed.
    fn shape(program: &Program) -> String {
        let debug = format!("{:?}", program);
        let mut out = String::new();
        let mut rest = debug.as_str();
        while let Some(start) = rest.find("Span {") {
            out.push_str(&rest[..start]);
            let end = rest[start..].find('}').map_or(rest.len(), |i| start + i + 1);
            rest = &rest[end..];
        }
        out.push_str(rest);
        out
    }

    #[test]
    fn test_reparse_gives_same_tree() {
        let source = "struct N { int v, N next }
void main() { N n = new N n.next = new N array int xs = new int[n.v]
  bool b = not not true bool c = not 1 < 2 and (false or true)
  int z = list<int>retrieve(list_create(), 0) xs[0] = 1 - (2 - 3)
  if (b) { print(\"x\\n\") } elseif (c) { print('y') } else { n.v = 0 }
  while (z < 3) { z = z + 1 }
  for (int i = 0; i < 2; i = i + 1) { list_add(list_create(), 1.50) }
}
int f(int a, N b) { return a }";
        let original = parse(source);
        let reparsed = parse(&print_program(&original));
        assert_eq!(shape(&reparsed), shape(&original));
        assert!(!shape(&original).contains("line:"));
    }

    #[test]
    fn test_print_nested_terms() {
        let printed = print_program(&parse("void main() { int x = 1 - (2 - 3) }"));
        assert!(printed.contains("int x = 1 - (2 - 3)\n"));
    }
}
