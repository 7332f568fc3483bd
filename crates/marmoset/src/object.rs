//! Runtime value types shared by the evaluator and the VM.
//!
//! [`Object`] is the tagged sum of every runtime value. Values are shared
//! as `Rc<Object>` so arrays, hashes, and environments reference rather
//! than copy. The `Display` impl renders the user-facing inspection form
//! the REPL prints.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use strum::Display;

use crate::ast::{BlockStatement, Expression};
use crate::builtins::Builtin;
use crate::bytecode::Instructions;
use crate::environment::Env;

/// Runtime type tags. The `Display` strings are part of the error message
/// contract ("type mismatch: INTEGER + BOOLEAN").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
    Quote,
    Macro,
    CompiledFunction,
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    /// Immutable byte string; length semantics are byte-based.
    Str(String),
    Array(Vec<Rc<Object>>),
    /// Pairs keyed by [`HashKey`]; insertion order is preserved so the
    /// display form is deterministic within a run.
    Hash(IndexMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    /// Wraps the value of a `return` statement while it unwinds to the
    /// nearest function boundary. Never escapes a top-level program.
    ReturnValue(Rc<Object>),
    Error(String),
    /// An unevaluated AST node produced by the `quote` special form.
    Quote(Expression),
    Macro(Macro),
    /// Compiled instruction bytes (VM back-end only).
    CompiledFunction(Instructions),
}

/// A user-defined function together with its captured environment.
#[derive(Debug, Clone)]
pub struct Function {
    pub parameters: Vec<String>,
    pub body: BlockStatement,
    pub env: Env,
}

/// Same shape as [`Function`], but bound during the macro definition pass
/// and called with unevaluated (quoted) arguments.
#[derive(Debug, Clone)]
pub struct Macro {
    pub parameters: Vec<String>,
    pub body: BlockStatement,
    pub env: Env,
}

thread_local! {
    static TRUE_OBJ: Rc<Object> = Rc::new(Object::Boolean(true));
    static FALSE_OBJ: Rc<Object> = Rc::new(Object::Boolean(false));
    static NULL_OBJ: Rc<Object> = Rc::new(Object::Null);
}

impl Object {
    /// Returns the shared `true`/`false` singleton.
    pub fn boolean(value: bool) -> Rc<Self> {
        if value {
            TRUE_OBJ.with(Rc::clone)
        } else {
            FALSE_OBJ.with(Rc::clone)
        }
    }

    /// Returns the shared `null` singleton.
    pub fn null() -> Rc<Self> {
        NULL_OBJ.with(Rc::clone)
    }

    pub fn integer(value: i64) -> Rc<Self> {
        Rc::new(Self::Integer(value))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Integer(_) => ObjectType::Integer,
            Self::Boolean(_) => ObjectType::Boolean,
            Self::Null => ObjectType::Null,
            Self::Str(_) => ObjectType::String,
            Self::Array(_) => ObjectType::Array,
            Self::Hash(_) => ObjectType::Hash,
            Self::Function(_) => ObjectType::Function,
            Self::Builtin(_) => ObjectType::Builtin,
            Self::ReturnValue(_) => ObjectType::ReturnValue,
            Self::Error(_) => ObjectType::Error,
            Self::Quote(_) => ObjectType::Quote,
            Self::Macro(_) => ObjectType::Macro,
            Self::CompiledFunction(_) => ObjectType::CompiledFunction,
        }
    }

    /// Truthiness rule: only `false` and `null` are falsy. Zero and empty
    /// containers are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// Returns the hash key for this value, or `None` if the type is not
    /// hashable. Only integers, booleans, and strings are hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Self::Integer(value) => *value as u64,
            Self::Boolean(value) => u64::from(*value),
            Self::Str(value) => fnv1a(value.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            kind: self.object_type(),
            value,
        })
    }
}

/// The user-facing inspection form printed by the REPL.
impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
            Self::Str(value) => f.write_str(value),
            Self::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Self::Function(function) => {
                write!(f, "fn({}) {{\n{}\n}}", function.parameters.join(", "), function.body)
            }
            Self::Builtin(_) => f.write_str("builtin function"),
            Self::ReturnValue(value) => write!(f, "{value}"),
            Self::Error(message) => write!(f, "ERROR: {message}"),
            Self::Quote(node) => write!(f, "QUOTE({node})"),
            Self::Macro(macro_object) => {
                write!(
                    f,
                    "macro({}) {{\n{}\n}}",
                    macro_object.parameters.join(", "),
                    macro_object.body
                )
            }
            Self::CompiledFunction(instructions) => {
                write!(f, "CompiledFunction[{} bytes]", instructions.len())
            }
        }
    }
}

/// Identity of a hashable value: its type tag plus a 64-bit key.
///
/// Two hashable objects are the same hash key exactly when their domain
/// values are equal. String keys hash with FNV-1a, stable within a
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    kind: ObjectType,
    value: u64,
}

/// A key/value entry of a hash. The original key object is kept so the
/// display form can show it.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Rc<Object>,
    pub value: Rc<Object>,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_keys_follow_content() {
        let hello1 = Object::Str("hello".to_owned());
        let hello2 = Object::Str("hello".to_owned());
        let diff1 = Object::Str("diff".to_owned());
        let diff2 = Object::Str("diff".to_owned());

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_eq!(diff1.hash_key(), diff2.hash_key());
        assert_ne!(hello1.hash_key(), diff1.hash_key());
    }

    #[test]
    fn test_integer_and_boolean_hash_keys() {
        assert_eq!(Object::Integer(7).hash_key(), Object::Integer(7).hash_key());
        assert_ne!(Object::Integer(7).hash_key(), Object::Integer(8).hash_key());
        // Negative values map through two's complement, still value-stable.
        assert_eq!(Object::Integer(-1).hash_key(), Object::Integer(-1).hash_key());

        assert_eq!(Object::Boolean(true).hash_key(), Object::Boolean(true).hash_key());
        assert_ne!(Object::Boolean(true).hash_key(), Object::Boolean(false).hash_key());
        // The tag keeps equal raw keys of different types distinct.
        assert_ne!(Object::Integer(1).hash_key(), Object::Boolean(true).hash_key());
    }

    #[test]
    fn test_unhashable_types() {
        assert_eq!(Object::Array(Vec::new()).hash_key(), None);
        assert_eq!(Object::Null.hash_key(), None);
    }

    #[test]
    fn test_singletons_are_shared() {
        assert!(Rc::ptr_eq(&Object::boolean(true), &Object::boolean(true)));
        assert!(Rc::ptr_eq(&Object::boolean(false), &Object::boolean(false)));
        assert!(Rc::ptr_eq(&Object::null(), &Object::null()));
        assert!(!Rc::ptr_eq(&Object::boolean(true), &Object::boolean(false)));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Object::Integer(5).to_string(), "5");
        assert_eq!(Object::Boolean(true).to_string(), "true");
        assert_eq!(Object::Null.to_string(), "null");
        assert_eq!(Object::Str("raw bytes".to_owned()).to_string(), "raw bytes");
        assert_eq!(Object::Error("boom".to_owned()).to_string(), "ERROR: boom");

        let array = Object::Array(vec![Object::integer(1), Object::boolean(true)]);
        assert_eq!(array.to_string(), "[1, true]");
    }
}
