//! The read-eval-print loop.
//!
//! Reads one line per iteration and runs it through the selected
//! back-end. The tree-walking engine keeps one value environment and one
//! macro environment alive across lines, so definitions persist; the VM
//! engine compiles and executes each line from scratch. All errors are
//! printed and the loop continues; only end of input exits.

use std::io::{self, BufRead, Write};

use crate::ast::Program;
use crate::bytecode::{Compiler, Vm};
use crate::environment::{Env, Environment};
use crate::evaluator::{Evaluator, define_macros, expand_macros};
use crate::io::WritePrint;
use crate::parser::parse;

pub const PROMPT: &str = ">> ";

/// Which back-end executes REPL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// Tree-walking evaluator with macro expansion; covers the whole
    /// language.
    #[default]
    Eval,
    /// Bytecode compiler + VM; covers the expression subset.
    Vm,
}

/// Runs the loop until `input` is exhausted.
pub fn start(mut input: impl BufRead, mut output: impl Write, engine: Engine) -> io::Result<()> {
    let env = Environment::new();
    let macro_env = Environment::new();
    let mut line = String::new();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let program = match parse(&line) {
            Ok(program) => program,
            Err(errors) => {
                writeln!(output, "Woops! We ran into some errors here!")?;
                for error in errors {
                    writeln!(output, "\t{error}")?;
                }
                continue;
            }
        };

        match engine {
            Engine::Eval => run_eval_line(program, &env, &macro_env, &mut output)?,
            Engine::Vm => run_vm_line(&program, &mut output)?,
        }
    }
}

fn run_eval_line(mut program: Program, env: &Env, macro_env: &Env, output: &mut impl Write) -> io::Result<()> {
    if let Err(error) = define_macros(&mut program, macro_env) {
        return writeln!(output, "{error}");
    }
    let expanded = {
        let mut print = WritePrint(&mut *output);
        expand_macros(program, macro_env, &mut print)
    };
    let expanded = match expanded {
        Ok(program) => program,
        Err(error) => return writeln!(output, "{error}"),
    };
    // Blank lines and lines holding only macro definitions produce no
    // statements and print nothing.
    if expanded.statements.is_empty() {
        return Ok(());
    }

    let result = {
        let mut print = WritePrint(&mut *output);
        Evaluator::new(&mut print).eval_program(&expanded, env)
    };
    writeln!(output, "{result}")
}

fn run_vm_line(program: &Program, output: &mut impl Write) -> io::Result<()> {
    let mut compiler = Compiler::new();
    if let Err(error) = compiler.compile(program) {
        return writeln!(output, "Woops! Compilation failed:\n {error}");
    }

    let mut vm = Vm::new(compiler.bytecode());
    if let Err(error) = vm.run() {
        return writeln!(output, "Woops! Executing bytecode failed:\n {error}");
    }

    if let Some(result) = vm.last_popped_stack_elem() {
        writeln!(output, "{result}")?;
    }
    Ok(())
}
