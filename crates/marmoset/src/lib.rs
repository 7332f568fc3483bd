#![doc = include_str!("../../../README.md")]
pub mod ast;
pub mod builtins;
pub mod bytecode;
pub mod environment;
pub mod evaluator;
pub mod io;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod token;

pub use crate::{
    builtins::Builtin,
    bytecode::{Bytecode, CompileError, Compiler, Instructions, Opcode, Vm, VmError},
    environment::{Env, Environment},
    evaluator::{EvalResult, Evaluator, MacroError, RuntimeError, define_macros, eval, expand_macros},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint, WritePrint},
    object::{HashKey, HashPair, Object, ObjectType},
    parser::parse,
    repl::Engine,
};
