//! Tree-walking evaluator over the parsed AST.
//!
//! Evaluation dispatches on node variant and produces shared
//! [`Object`]s. In-language errors travel as [`RuntimeError`] through
//! `Result` and surface as [`Object::Error`] values at the program
//! boundary; they are never host panics. `return` travels as the
//! [`Object::ReturnValue`] wrapper and is unwrapped at function-call and
//! program boundaries.

mod macro_expansion;
mod quote;

pub use macro_expansion::{MacroError, define_macros, expand_macros};

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::builtins::Builtin;
use crate::environment::{Env, Environment};
use crate::io::{PrintWriter, StdPrint};
use crate::object::{Function, HashPair, Object};

/// An in-language error: the message is the user-visible surface, and the
/// exact strings are part of the language contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result of evaluating a node.
pub type EvalResult = Result<Rc<Object>, RuntimeError>;

/// Formats and returns an `Err(RuntimeError)`.
macro_rules! runtime_err {
    ($($arg:tt)*) => {
        Err($crate::evaluator::RuntimeError::new(format!($($arg)*)))
    };
}
pub(crate) use runtime_err;

/// Evaluates a program with output going to stdout.
///
/// Convenience wrapper over [`Evaluator`] for drivers that do not need to
/// capture `puts` output.
pub fn eval(program: &Program, env: &Env) -> Rc<Object> {
    Evaluator::new(&mut StdPrint).eval_program(program, env)
}

/// The tree-walking evaluator.
///
/// Holds the [`PrintWriter`] that `puts` output is routed through; all
/// other state lives in the environments threaded through the calls.
#[derive(Debug)]
pub struct Evaluator<'a, P: PrintWriter> {
    print: &'a mut P,
}

impl<'a, P: PrintWriter> Evaluator<'a, P> {
    pub fn new(print: &'a mut P) -> Self {
        Self { print }
    }

    /// Evaluates a whole program.
    ///
    /// This is the external boundary: `return` values are unwrapped and
    /// runtime errors become [`Object::Error`] results.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Rc<Object> {
        match self.eval_statements(&program.statements, env) {
            Ok(result) => unwrap_return_value(result),
            Err(error) => Rc::new(Object::Error(error.into_message())),
        }
    }

    fn eval_statements(&mut self, statements: &[Statement], env: &Env) -> EvalResult {
        let mut result = Object::null();
        for statement in statements {
            result = self.eval_statement(statement, env)?;
            // A return value stops the block but stays wrapped; only the
            // function-call or program boundary unwraps it.
            if matches!(&*result, Object::ReturnValue(_)) {
                break;
            }
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Env) -> EvalResult {
        match statement {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.borrow_mut().set(name.clone(), value);
                Ok(Object::null())
            }
            Statement::Return(value) => {
                let value = self.eval_expression(value, env)?;
                Ok(Rc::new(Object::ReturnValue(value)))
            }
            Statement::Expression(expression) => self.eval_expression(expression, env),
        }
    }

    pub(crate) fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> EvalResult {
        self.eval_statements(&block.statements, env)
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Env) -> EvalResult {
        match expression {
            Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
            Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
            Expression::StringLiteral(value) => Ok(Rc::new(Object::Str(value.clone()))),
            Expression::Identifier(name) => eval_identifier(name, env),
            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix_expression(*operator, &right)
            }
            Expression::Infix { left, operator, right } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix_expression(*operator, &left, &right)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition, env)?;
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(Object::null())
                }
            }
            Expression::ArrayLiteral(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Rc::new(Object::Array(elements)))
            }
            Expression::HashLiteral(pairs) => self.eval_hash_literal(pairs, env),
            Expression::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                eval_index_expression(&left, &index)
            }
            Expression::FunctionLiteral { parameters, body } => Ok(Rc::new(Object::Function(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            }))),
            Expression::Call { function, arguments } => {
                // `quote` is a special form: its argument must not be
                // evaluated, so it is intercepted before the callee is.
                if matches!(&**function, Expression::Identifier(name) if name == "quote") {
                    return self.eval_quote_call(arguments, env);
                }
                let function = self.eval_expression(function, env)?;
                let arguments = self.eval_expressions(arguments, env)?;
                self.apply_function(&function, &arguments)
            }
            Expression::MacroLiteral { .. } => {
                runtime_err!("macro literals are only allowed in top-level let statements")
            }
        }
    }

    /// Evaluates expressions left to right, stopping at the first error.
    fn eval_expressions(&mut self, expressions: &[Expression], env: &Env) -> Result<Vec<Rc<Object>>, RuntimeError> {
        expressions
            .iter()
            .map(|expression| self.eval_expression(expression, env))
            .collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Env) -> EvalResult {
        let mut hash = IndexMap::new();
        for (key_expression, value_expression) in pairs {
            let key = self.eval_expression(key_expression, env)?;
            let Some(hash_key) = key.hash_key() else {
                return runtime_err!("unusable as hash key: {}", key.object_type());
            };
            let value = self.eval_expression(value_expression, env)?;
            hash.insert(hash_key, HashPair { key, value });
        }
        Ok(Rc::new(Object::Hash(hash)))
    }

    fn apply_function(&mut self, function: &Rc<Object>, arguments: &[Rc<Object>]) -> EvalResult {
        match &**function {
            Object::Function(function) => {
                if arguments.len() != function.parameters.len() {
                    return runtime_err!(
                        "wrong number of arguments: want={} got={}",
                        function.parameters.len(),
                        arguments.len()
                    );
                }
                let env = Environment::new_enclosed(&function.env);
                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    env.borrow_mut().set(parameter.clone(), Rc::clone(argument));
                }
                let result = self.eval_block(&function.body, &env)?;
                Ok(unwrap_return_value(result))
            }
            Object::Builtin(builtin) => builtin.call(arguments, self.print),
            other => runtime_err!("not a function: {}", other.object_type()),
        }
    }
}

fn eval_identifier(name: &str, env: &Env) -> EvalResult {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }
    if let Some(builtin) = Builtin::lookup(name) {
        return Ok(Rc::new(Object::Builtin(builtin)));
    }
    runtime_err!("identifier not found: {name}")
}

fn eval_prefix_expression(operator: PrefixOperator, right: &Rc<Object>) -> EvalResult {
    match operator {
        PrefixOperator::Bang => Ok(Object::boolean(!right.is_truthy())),
        PrefixOperator::Minus => match &**right {
            Object::Integer(value) => Ok(Object::integer(value.wrapping_neg())),
            other => runtime_err!("unknown operator: -{}", other.object_type()),
        },
    }
}

fn eval_infix_expression(operator: InfixOperator, left: &Rc<Object>, right: &Rc<Object>) -> EvalResult {
    match (&**left, &**right) {
        (Object::Integer(left), Object::Integer(right)) => eval_integer_infix_expression(operator, *left, *right),
        (Object::Str(left), Object::Str(right)) => match operator {
            InfixOperator::Plus => Ok(Rc::new(Object::Str(format!("{left}{right}")))),
            _ => runtime_err!("unknown operator: STRING {operator} STRING"),
        },
        (Object::Boolean(left), Object::Boolean(right)) => match operator {
            InfixOperator::Eq => Ok(Object::boolean(left == right)),
            InfixOperator::NotEq => Ok(Object::boolean(left != right)),
            _ => runtime_err!("unknown operator: BOOLEAN {operator} BOOLEAN"),
        },
        (left, right) if left.object_type() != right.object_type() => {
            runtime_err!(
                "type mismatch: {} {operator} {}",
                left.object_type(),
                right.object_type()
            )
        }
        (left, right) => runtime_err!(
            "unknown operator: {} {operator} {}",
            left.object_type(),
            right.object_type()
        ),
    }
}

fn eval_integer_infix_expression(operator: InfixOperator, left: i64, right: i64) -> EvalResult {
    let result = match operator {
        InfixOperator::Plus => left.wrapping_add(right),
        InfixOperator::Minus => left.wrapping_sub(right),
        InfixOperator::Asterisk => left.wrapping_mul(right),
        InfixOperator::Slash => {
            if right == 0 {
                return runtime_err!("division by zero");
            }
            left.wrapping_div(right)
        }
        InfixOperator::Lt => return Ok(Object::boolean(left < right)),
        InfixOperator::Gt => return Ok(Object::boolean(left > right)),
        InfixOperator::Eq => return Ok(Object::boolean(left == right)),
        InfixOperator::NotEq => return Ok(Object::boolean(left != right)),
    };
    Ok(Object::integer(result))
}

fn eval_index_expression(left: &Rc<Object>, index: &Rc<Object>) -> EvalResult {
    match (&**left, &**index) {
        (Object::Array(elements), Object::Integer(index)) => {
            // Negative and out-of-range indexes both read as null.
            let element = usize::try_from(*index).ok().and_then(|index| elements.get(index));
            Ok(element.map_or_else(Object::null, Rc::clone))
        }
        (Object::Hash(pairs), _) => {
            let Some(key) = index.hash_key() else {
                return runtime_err!("unusable as hash key: {}", index.object_type());
            };
            Ok(pairs.get(&key).map_or_else(Object::null, |pair| Rc::clone(&pair.value)))
        }
        _ => runtime_err!("index operator not supported: {}", left.object_type()),
    }
}

fn unwrap_return_value(value: Rc<Object>) -> Rc<Object> {
    match &*value {
        Object::ReturnValue(inner) => Rc::clone(inner),
        _ => value,
    }
}
