//! Macro definition and expansion passes.
//!
//! Macros run between parsing and execution. [`define_macros`] pulls
//! `let name = macro(...) { ... }` statements out of the program and
//! binds them in the macro environment; [`expand_macros`] then rewrites
//! the remaining AST, replacing each macro call site with the AST the
//! macro body returns. Macro bodies receive their arguments unevaluated,
//! wrapped in `Quote` objects, and must themselves return a `Quote`.

use std::fmt;
use std::rc::Rc;

use super::{Evaluator, RuntimeError};
use crate::ast::{self, BlockStatement, Expression, Program, Statement};
use crate::environment::{Env, Environment};
use crate::io::PrintWriter;
use crate::object::{Macro, Object};

/// A hard error from the macro passes. Unlike runtime errors, these halt
/// expansion before any execution happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroError {
    message: String,
}

impl MacroError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MacroError {}

impl From<RuntimeError> for MacroError {
    fn from(error: RuntimeError) -> Self {
        Self::new(error.into_message())
    }
}

/// Extracts top-level macro definitions from the program into `env`.
///
/// Each `let name = macro(...) { ... }` statement is removed from the
/// program and bound as a [`Macro`] object. Non-macro statements keep
/// their original order. Macros are not first-class: a macro literal
/// anywhere else in the program is an error.
pub fn define_macros(program: &mut Program, env: &Env) -> Result<(), MacroError> {
    let statements = std::mem::take(&mut program.statements);
    for statement in statements {
        match statement {
            Statement::Let {
                name,
                value: Expression::MacroLiteral { parameters, body },
            } => {
                let macro_object = Macro {
                    parameters,
                    body,
                    env: Rc::clone(env),
                };
                env.borrow_mut().set(name, Rc::new(Object::Macro(macro_object)));
            }
            other => program.statements.push(other),
        }
    }

    for statement in &program.statements {
        if statement_contains_macro_literal(statement) {
            return Err(MacroError::new(
                "macro literals are only allowed in top-level let statements",
            ));
        }
    }
    Ok(())
}

/// Rewrites the program, expanding every call to a macro bound in `env`.
///
/// The traversal is post-order, so macro calls inside macro arguments are
/// expanded before the enclosing call. A macro body that does not
/// evaluate to a `Quote` halts expansion.
pub fn expand_macros(program: Program, env: &Env, print: &mut impl PrintWriter) -> Result<Program, MacroError> {
    let mut first_error: Option<MacroError> = None;

    let expanded = ast::modify_program(program, &mut |expression| {
        if first_error.is_some() {
            return expression;
        }
        let Some((macro_object, arguments)) = macro_call(&expression, env) else {
            return expression;
        };
        if arguments.len() != macro_object.parameters.len() {
            first_error = Some(MacroError::new(format!(
                "wrong number of arguments: want={} got={}",
                macro_object.parameters.len(),
                arguments.len()
            )));
            return expression;
        }

        // Bind each argument AST, unevaluated, as a Quote object.
        let macro_env = Environment::new_enclosed(&macro_object.env);
        for (parameter, argument) in macro_object.parameters.iter().zip(&arguments) {
            macro_env
                .borrow_mut()
                .set(parameter.clone(), Rc::new(Object::Quote(argument.clone())));
        }

        let mut evaluator = Evaluator::new(&mut *print);
        match evaluator.eval_block(&macro_object.body, &macro_env) {
            Ok(result) => match &*result {
                Object::Quote(node) => node.clone(),
                _ => {
                    first_error = Some(MacroError::new("we only support returning AST-nodes from macros"));
                    expression
                }
            },
            Err(error) => {
                first_error = Some(error.into());
                expression
            }
        }
    });

    match first_error {
        Some(error) => Err(error),
        None => Ok(expanded),
    }
}

/// Returns the macro and argument list if `expression` is a call to an
/// identifier bound to a macro in `env`.
fn macro_call(expression: &Expression, env: &Env) -> Option<(Macro, Vec<Expression>)> {
    let Expression::Call { function, arguments } = expression else {
        return None;
    };
    let Expression::Identifier(name) = &**function else {
        return None;
    };
    let object = env.borrow().get(name)?;
    let Object::Macro(macro_object) = &*object else {
        return None;
    };
    Some((macro_object.clone(), arguments.clone()))
}

fn statement_contains_macro_literal(statement: &Statement) -> bool {
    match statement {
        Statement::Let { value, .. } | Statement::Return(value) | Statement::Expression(value) => {
            expression_contains_macro_literal(value)
        }
    }
}

fn block_contains_macro_literal(block: &BlockStatement) -> bool {
    block.statements.iter().any(statement_contains_macro_literal)
}

fn expression_contains_macro_literal(expression: &Expression) -> bool {
    match expression {
        Expression::MacroLiteral { .. } => true,
        Expression::Prefix { right, .. } => expression_contains_macro_literal(right),
        Expression::Infix { left, right, .. } => {
            expression_contains_macro_literal(left) || expression_contains_macro_literal(right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            expression_contains_macro_literal(condition)
                || block_contains_macro_literal(consequence)
                || alternative.as_ref().is_some_and(block_contains_macro_literal)
        }
        Expression::ArrayLiteral(elements) => elements.iter().any(expression_contains_macro_literal),
        Expression::HashLiteral(pairs) => pairs
            .iter()
            .any(|(key, value)| expression_contains_macro_literal(key) || expression_contains_macro_literal(value)),
        Expression::Index { left, index } => {
            expression_contains_macro_literal(left) || expression_contains_macro_literal(index)
        }
        Expression::Call { function, arguments } => {
            expression_contains_macro_literal(function) || arguments.iter().any(expression_contains_macro_literal)
        }
        Expression::FunctionLiteral { body, .. } => block_contains_macro_literal(body),
        Expression::Identifier(_)
        | Expression::IntegerLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::StringLiteral(_) => false,
    }
}
