//! Benchmarks for the compile and run stages of the bytecode VM.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mypl::lexer::Scanner;
use mypl::parser::Parser;
use mypl::types::TypeChecker;
use mypl::vm::{generate, Compiler};

const LOOP_SUM: &str = r#"
void main() {
  int sum = 0
  for (int i = 0; i < 10000; i = i + 1) {
    sum = sum + i
  }
}
"#;

const LIST_FILL: &str = r#"
void main() {
  list l = list_create()
  for (int i = 0; i < 2000; i = i + 1) {
    list_add(l, i)
  }
  int avg = list_avgi(l)
}
"#;

fn fib_source(n: u32) -> String {
    format!(
        r#"
int fib(int n) {{
  if (n <= 1) {{
    return n
  }}
  return fib(n - 1) + fib(n - 2)
}}
void main() {{
  int result = fib({})
}}
"#,
        n
    )
}

/// Parse and check source into an annotated AST.
fn check(source: &str) -> mypl::ast::Program {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    let mut program = Parser::new(tokens).parse().expect("parser error");
    TypeChecker::new()
        .check(&mut program)
        .expect("static error");
    program
}

/// Compile and execute a checked program.
fn run_vm(program: &mypl::ast::Program) {
    let mut vm = generate(program).expect("compile error");
    vm.capture_output();
    vm.run().expect("vm runtime error");
}

fn fib_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_recursive");

    for n in [10, 15, 20].iter() {
        let program = check(&fib_source(*n));
        group.bench_with_input(BenchmarkId::new("vm", n), &program, |b, program| {
            b.iter(|| run_vm(black_box(program)))
        });
    }

    group.finish();
}

fn loops(c: &mut Criterion) {
    let mut group = c.benchmark_group("loops");

    let program = check(LOOP_SUM);
    group.bench_function("loop_sum", |b| b.iter(|| run_vm(black_box(&program))));

    let program = check(LIST_FILL);
    group.bench_function("list_fill", |b| b.iter(|| run_vm(black_box(&program))));

    group.finish();
}

/// Benchmark compilation time alone (not execution).
fn compilation_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation_overhead");

    let program = check(&fib_source(20));
    group.bench_function("compile_fib", |b| {
        b.iter(|| Compiler::compile(black_box(&program)).unwrap())
    });

    let program = check(LOOP_SUM);
    group.bench_function("compile_loop", |b| {
        b.iter(|| Compiler::compile(black_box(&program)).unwrap())
    });

    group.bench_function("front_end_loop", |b| b.iter(|| check(black_box(LOOP_SUM))));

    group.finish();
}

criterion_group!(benches, fib_scaling, loops, compilation_overhead);

criterion_main!(benches);
