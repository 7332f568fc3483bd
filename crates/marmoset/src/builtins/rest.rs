//! Implementation of the `rest` builtin.

use std::rc::Rc;

use super::expect_args;
use crate::evaluator::{EvalResult, runtime_err};
use crate::object::Object;

/// Returns a new array with the head removed, or `null` if the array is
/// empty. The argument is never mutated.
pub(super) fn builtin_rest(args: &[Rc<Object>]) -> EvalResult {
    expect_args(args, 1)?;
    match &*args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                Ok(Object::null())
            } else {
                Ok(Rc::new(Object::Array(elements[1..].to_vec())))
            }
        }
        other => runtime_err!("argument to `rest` must be ARRAY, got {}", other.object_type()),
    }
}
