//! Command-line driver.
//!
//! With a file argument, runs it through the tree-walking pipeline
//! (macro passes, then evaluation). With no file, starts the REPL;
//! `--vm` selects the bytecode back-end for the session.

use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

use marmoset::repl::{self, Engine};
use marmoset::{Environment, Evaluator, Object, StdPrint, define_macros, expand_macros, parse};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let engine = if args.iter().any(|arg| arg == "--vm") {
        Engine::Vm
    } else {
        Engine::Eval
    };

    match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => run_file(path),
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            match repl::start(stdin.lock(), stdout.lock(), engine) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut program = match parse(&source) {
        Ok(program) => program,
        Err(errors) => {
            eprintln!("parse errors:");
            for error in errors {
                eprintln!("\t{error}");
            }
            return ExitCode::FAILURE;
        }
    };

    let env = Environment::new();
    let macro_env = Environment::new();
    if let Err(error) = define_macros(&mut program, &macro_env) {
        eprintln!("error: {error}");
        return ExitCode::FAILURE;
    }
    let program = match expand_macros(program, &macro_env, &mut StdPrint) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    let result = Evaluator::new(&mut StdPrint).eval_program(&program, &env);
    match &*result {
        Object::Error(_) => {
            eprintln!("{result}");
            ExitCode::FAILURE
        }
        Object::Null => ExitCode::SUCCESS,
        _ => {
            println!("{result}");
            ExitCode::SUCCESS
        }
    }
}
