//! The `quote`/`unquote` special forms.
//!
//! `quote(node)` wraps its argument's AST unevaluated, except that every
//! `unquote(x)` call inside it is replaced by the AST form of `x`'s
//! evaluated value. This selective evaluation is what macro bodies use to
//! splice computed pieces into the trees they return.

use std::rc::Rc;

use super::{EvalResult, Evaluator, RuntimeError, runtime_err};
use crate::ast::{self, Expression};
use crate::environment::Env;
use crate::io::PrintWriter;
use crate::object::Object;

impl<P: PrintWriter> Evaluator<'_, P> {
    /// Evaluates a `quote(...)` call. The argument is not evaluated.
    pub(crate) fn eval_quote_call(&mut self, arguments: &[Expression], env: &Env) -> EvalResult {
        if arguments.len() != 1 {
            return runtime_err!("wrong number of arguments. got={}, want=1", arguments.len());
        }
        let node = self.eval_unquote_calls(arguments[0].clone(), env)?;
        Ok(Rc::new(Object::Quote(node)))
    }

    /// Replaces every `unquote(x)` inside `node` with the AST form of the
    /// evaluated `x`.
    fn eval_unquote_calls(&mut self, node: Expression, env: &Env) -> Result<Expression, RuntimeError> {
        // `modify` transformers are infallible, so the first evaluation
        // error is parked here and re-raised after the traversal.
        let mut first_error: Option<RuntimeError> = None;

        let rewritten = ast::modify_expression(node, &mut |expression| {
            if first_error.is_some() {
                return expression;
            }
            let Some(argument) = unquote_call_argument(&expression) else {
                return expression;
            };
            match self.eval_expression(argument, env) {
                Ok(object) => convert_object_to_ast(&object).unwrap_or(expression),
                Err(error) => {
                    first_error = Some(error);
                    expression
                }
            }
        });

        match first_error {
            Some(error) => Err(error),
            None => Ok(rewritten),
        }
    }
}

/// Returns the argument of a single-argument `unquote(...)` call, or
/// `None` for any other expression.
fn unquote_call_argument(expression: &Expression) -> Option<&Expression> {
    let Expression::Call { function, arguments } = expression else {
        return None;
    };
    if matches!(&**function, Expression::Identifier(name) if name == "unquote") && arguments.len() == 1 {
        Some(&arguments[0])
    } else {
        None
    }
}

/// Converts an evaluated object back into an AST node.
///
/// Integers, booleans, and quotes convert; any other object kind returns
/// `None` and the `unquote` call site is left untouched.
fn convert_object_to_ast(object: &Rc<Object>) -> Option<Expression> {
    match &**object {
        Object::Integer(value) => Some(Expression::IntegerLiteral(*value)),
        Object::Boolean(value) => Some(Expression::BooleanLiteral(*value)),
        Object::Quote(node) => Some(node.clone()),
        _ => None,
    }
}
