//! Implementation of the `last` builtin.

use std::rc::Rc;

use super::expect_args;
use crate::evaluator::{EvalResult, runtime_err};
use crate::object::Object;

/// Returns the last element of an array, or `null` if it is empty.
pub(super) fn builtin_last(args: &[Rc<Object>]) -> EvalResult {
    expect_args(args, 1)?;
    match &*args[0] {
        Object::Array(elements) => Ok(elements.last().map_or_else(Object::null, Rc::clone)),
        other => runtime_err!("argument to `last` must be ARRAY, got {}", other.object_type()),
    }
}
