//! This module defines the two core tree types of the interpreter:
//! [`Expression`], the parsed but not-yet-evaluated syntax tree produced by
//! the reader, and [`Value`], the result of evaluation. `Value` covers the
//! same shapes as `Expression` (numbers, symbols, lists) plus the kinds that
//! only evaluation can produce: booleans from predicate built-ins, built-in
//! procedures, user-defined closures, and the unspecified result of
//! `define`. Ergonomic helper functions such as [`val`], [`sym`], and
//! [`nil`] are provided for convenient construction in tests, together with
//! conversion traits from common Rust types. Equality and display logic are
//! customized to match the language semantics: structural equality for data,
//! identity for procedures, and a canonical parenthesized rendering.

use crate::builtinops::BuiltinOp;
use crate::evaluator::Environment;

/// Type alias for number values in the interpreter
pub(crate) type NumberType = f64;

/// Parsed syntax tree: the output of the reader, the input of the evaluator.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeric literal
    Number(NumberType),
    /// Identifier
    Symbol(String),
    /// Parenthesized sequence of sub-expressions (empty list included)
    List(Vec<Expression>),
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{n}"),
            Expression::Symbol(s) => write!(f, "{s}"),
            Expression::List(elements) => {
                write!(f, "(")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Result of evaluating an [`Expression`] in an environment.
#[derive(Clone)]
pub enum Value {
    /// Numbers
    Number(NumberType),
    /// Symbols (returned by `quote`, never produced by ordinary evaluation)
    Symbol(String),
    /// Booleans, produced only by comparison and predicate built-ins.
    /// `Bool(false)` is the single falsy value of the language.
    Bool(bool),
    /// Lists (the empty list represents nil)
    List(Vec<Value>),
    /// Built-in procedures: references into the fixed registry in
    /// [`crate::builtinops`]
    Builtin(&'static BuiltinOp),
    /// User-defined procedures (params, unevaluated body, captured defining
    /// environment)
    Closure {
        params: Vec<String>,
        body: Box<Expression>,
        env: Environment,
    },
    /// Unspecified values (e.g., return value of `define` and `print`).
    /// These values never equal themselves or any other value.
    Unspecified,
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::List(list) => {
                write!(f, "List(")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v:?}")?;
                }
                write!(f, ")")
            }
            Value::Builtin(op) => write!(f, "Builtin({})", op.name),
            // The captured environment is omitted: a closure bound in the
            // frame it captured would otherwise print itself forever.
            Value::Closure { params, body, .. } => {
                write!(f, "Closure(params={params:?}, body={body:?})")
            }
            Value::Unspecified => write!(f, "Unspecified"),
        }
    }
}

// From trait implementations for Value - enables .into() conversion

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($num_type:ty) => {
        impl From<$num_type> for Value {
            fn from(n: $num_type) -> Self {
                Value::Number(n as NumberType)
            }
        }
    };
}

// Generate From implementations for the numeric types used in tests
impl_from_number!(i32);
impl_from_number!(i64);
impl_from_number!(u32);
impl_from_number!(NumberType); // Special case - no narrowing

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(arr: [T; N]) -> Self {
        Value::List(arr.into_iter().map(|x| x.into()).collect())
    }
}

/// Verbatim conversion of parsed syntax into data, used by `quote`
impl From<&Expression> for Value {
    fn from(expr: &Expression) -> Self {
        match expr {
            Expression::Number(n) => Value::Number(*n),
            Expression::Symbol(s) => Value::Symbol(s.clone()),
            Expression::List(elements) => {
                Value::List(elements.iter().map(Value::from).collect())
            }
        }
    }
}

/// Helper function for creating symbols - works great in mixed lists!
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::Symbol(name.as_ref().to_owned())
}

/// Helper function for creating Values - works great in mixed lists!
/// Accepts any type that can be converted to Value
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn val<T: Into<Value>>(value: T) -> Value {
    value.into()
}

/// Helper function for creating empty lists (nil) - follows Lisp conventions
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn nil() -> Value {
    Value::List(vec![])
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Value::List(elements) => {
                write!(f, "(")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
            Value::Builtin(op) => write!(f, "#<builtin:{}>", op.name),
            Value::Closure { .. } => write!(f, "#<closure>"),
            Value::Unspecified => write!(f, "#<unspecified>"),
        }
    }
}

impl Value {
    /// Check if a value represents nil (empty list)
    pub(crate) fn is_nil(&self) -> bool {
        matches!(self, Value::List(list) if list.is_empty())
    }

    /// Truthiness for `if` and `not`: boolean false is the only falsy
    /// value. Everything else is truthy, `0` and the empty list included.
    pub(crate) fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Registry entries are unique per name, so name equality is
            // identity for built-ins
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (
                Value::Closure {
                    params: p1,
                    body: b1,
                    env: e1,
                },
                Value::Closure {
                    params: p2,
                    body: b2,
                    env: e2,
                },
            ) => p1 == p2 && b1 == b2 && Environment::ptr_eq(e1, e2),
            (Value::Unspecified, _) | (_, Value::Unspecified) => false,
            _ => false, // Different variants are never equal
        }
    }
}
