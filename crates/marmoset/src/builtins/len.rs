//! Implementation of the `len` builtin.

use std::rc::Rc;

use super::expect_args;
use crate::evaluator::{EvalResult, runtime_err};
use crate::object::Object;

/// Returns the byte length of a string or the element count of an array.
pub(super) fn builtin_len(args: &[Rc<Object>]) -> EvalResult {
    expect_args(args, 1)?;
    match &*args[0] {
        Object::Str(value) => Ok(Object::integer(value.len() as i64)),
        Object::Array(elements) => Ok(Object::integer(elements.len() as i64)),
        other => runtime_err!("argument to `len` not supported, got {}", other.object_type()),
    }
}
