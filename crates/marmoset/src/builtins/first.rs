//! Implementation of the `first` builtin.

use std::rc::Rc;

use super::expect_args;
use crate::evaluator::{EvalResult, runtime_err};
use crate::object::Object;

/// Returns the first element of an array, or `null` if it is empty.
pub(super) fn builtin_first(args: &[Rc<Object>]) -> EvalResult {
    expect_args(args, 1)?;
    match &*args[0] {
        Object::Array(elements) => Ok(elements.first().map_or_else(Object::null, Rc::clone)),
        other => runtime_err!("argument to `first` must be ARRAY, got {}", other.object_type()),
    }
}
