//! MyPL CLI: lex, parse, print, check, dump or run a program.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use colored::Colorize;

use mypl::error::MyplError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the driver does with the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Print one token per line
    Lex,
    /// Syntax check only
    Parse,
    /// Pretty-print the program
    Print,
    /// Parse and type check
    Check,
    /// Dump the generated bytecode
    Ir,
    /// Compile and execute
    Run,
}

/// CLI options parsed from arguments.
#[derive(Debug, PartialEq)]
struct Options {
    mode: Mode,
    trace: bool,
    /// Script file; stdin when absent.
    path: Option<String>,
    help: bool,
}

impl Options {
    fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options {
            mode: Mode::Run,
            trace: false,
            path: None,
            help: false,
        };
        let mut mode_set = false;

        for arg in args {
            let mode = match arg.as_str() {
                "--lex" => Some(Mode::Lex),
                "--parse" => Some(Mode::Parse),
                "--print" => Some(Mode::Print),
                "--check" => Some(Mode::Check),
                "--ir" => Some(Mode::Ir),
                "--trace" => {
                    options.trace = true;
                    None
                }
                "--help" | "-h" => {
                    options.help = true;
                    None
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option '{}'", flag));
                }
                _ => {
                    if options.path.is_some() {
                        return Err(format!("unexpected argument '{}'", arg));
                    }
                    options.path = Some(arg.clone());
                    None
                }
            };

            if let Some(mode) = mode {
                if mode_set {
                    return Err("only one mode may be given".to_string());
                }
                options.mode = mode;
                mode_set = true;
            }
        }

        Ok(options)
    }
}

fn print_usage() {
    eprintln!("MyPL {}", VERSION);
    eprintln!();
    eprintln!("Usage: mypl [mode] [--trace] [script.mypl]");
    eprintln!();
    eprintln!("Reads the program from the script file, or stdin when none is given.");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  --lex      Print the token stream");
    eprintln!("  --parse    Check syntax only");
    eprintln!("  --print    Pretty-print the program");
    eprintln!("  --check    Parse and type check");
    eprintln!("  --ir       Print the generated bytecode");
    eprintln!("  (none)     Compile and run");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --trace    Trace every executed instruction to stderr");
    eprintln!("  --help, -h Show this help message");
}

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            report(&message);
            print_usage();
            process::exit(64);
        }
    };

    if options.help {
        print_usage();
        process::exit(0);
    }

    let source = match read_source(options.path.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            report(&e.to_string());
            process::exit(74);
        }
    };

    if let Err(e) = execute(&options, &source) {
        report(&e.to_string());
        process::exit(exit_code(&e));
    }
}

fn read_source(path: Option<&str>) -> Result<String, MyplError> {
    let source = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };
    Ok(source)
}

fn execute(options: &Options, source: &str) -> Result<(), MyplError> {
    match options.mode {
        Mode::Lex => {
            for token in mypl::lex(source)? {
                println!("{}", token);
            }
        }
        Mode::Parse => {
            mypl::parse(source)?;
        }
        Mode::Print => {
            let program = mypl::parse(source)?;
            print!("{}", mypl::printer::print_program(&program));
        }
        Mode::Check => {
            mypl::check(source)?;
        }
        Mode::Ir => {
            let vm = mypl::compile(source)?;
            print!("{}", mypl::dump_ir(&vm));
        }
        Mode::Run => {
            let mut vm = mypl::compile(source)?;
            vm.set_trace(options.trace);
            vm.run()?;
        }
    }
    Ok(())
}

fn exit_code(error: &MyplError) -> i32 {
    match error {
        MyplError::Lexer(_) | MyplError::Parser(_) | MyplError::Static(_) => 65,
        MyplError::Compile(_) | MyplError::Runtime(_) => 70,
        MyplError::Io(_) => 74,
    }
}

fn report(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_default_is_run_from_stdin() {
        let options = parse(&[]).unwrap();
        assert_eq!(options.mode, Mode::Run);
        assert_eq!(options.path, None);
        assert!(!options.trace);
    }

    #[test]
    fn test_mode_and_file() {
        let options = parse(&["--ir", "prog.mypl"]).unwrap();
        assert_eq!(options.mode, Mode::Ir);
        assert_eq!(options.path.as_deref(), Some("prog.mypl"));

        let options = parse(&["--trace", "x.mypl"]).unwrap();
        assert!(options.trace);
        assert_eq!(options.mode, Mode::Run);
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse(&["--lex", "--ir"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["a.mypl", "b.mypl"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let err = mypl::check("void main() { int x = 1.5 }").unwrap_err();
        assert_eq!(exit_code(&err), 65);
        let err = mypl::run("void main() { int z = 0 int x = 1 / z }").unwrap_err();
        assert_eq!(exit_code(&err), 70);
    }
}
