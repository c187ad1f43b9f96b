//! Built-in operations registry.
//!
//! This module provides the fixed table of built-in procedures bound into
//! the root environment by `create_global_env`. The set is not
//! user-extensible: `Builtin` values are references into this registry.
//!
//! ## Functions vs higher-order operations
//!
//! - **Functions**: operate only on their already-evaluated arguments
//!   (e.g., `+`, `car`, `not`)
//! - **Higher-order operations**: `apply` and `map` invoke one of their
//!   arguments as a procedure, so they re-enter procedure application and
//!   thread the current evaluation depth
//!
//! Special forms (`quote`, `if`, `define`, `lambda`) control the evaluation
//! of their arguments; they are handled directly by the evaluator and are
//! not in this registry.
//!
//! ## Error handling
//!
//! - Arity is validated at call time against each entry's [`Arity`]
//! - Type checking is internal to each builtin; mismatches surface as
//!   `EvalError` with an operation-specific message
//! - Division by zero is reported as `EvalError("division by zero")`
//!   rather than producing a silent infinity

use crate::Error;
use crate::ast::{NumberType, Value};
use crate::evaluator::apply_procedure;

/// Expected number of arguments for a built-in operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arity {
    /// Exactly this many arguments
    Exact(usize),
    /// At least this many arguments
    AtLeast(usize),
    /// Any number of arguments
    Any,
}

impl Arity {
    /// Check if the given number of arguments is valid
    pub(crate) fn validate(&self, got: usize) -> Result<(), Error> {
        match *self {
            Arity::Exact(expected) if got != expected => Err(Error::arity_error(expected, got)),
            Arity::AtLeast(expected) if got < expected => Err(Error::arity_error(expected, got)),
            _ => Ok(()),
        }
    }
}

/// Represents the implementation of a built-in operation
#[derive(Clone, Copy)]
pub enum OpKind {
    /// Regular function over already-evaluated arguments
    Function(fn(&[Value]) -> Result<Value, Error>),
    /// Operation that re-enters procedure application and therefore
    /// receives the current evaluation depth
    HigherOrder(fn(&[Value], usize) -> Result<Value, Error>),
}

impl std::fmt::Debug for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Function(_) => write!(f, "Function(<fn>)"),
            OpKind::HigherOrder(_) => write!(f, "HigherOrder(<fn>)"),
        }
    }
}

/// Definition of a built-in operation
#[derive(Debug)]
pub struct BuiltinOp {
    /// The identifier this operation is bound to in the global environment
    pub name: &'static str,
    /// The implementation of this operation
    pub kind: OpKind,
    /// Expected number of arguments, validated at call time
    pub arity: Arity,
}

//
// Argument extraction helpers
//

fn expect_number(value: &Value, op: &'static str) -> Result<NumberType, Error> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(Error::EvalError(format!("{op} requires numbers, got {value}"))),
    }
}

fn expect_list<'a>(value: &'a Value, op: &'static str) -> Result<&'a [Value], Error> {
    match value {
        Value::List(elements) => Ok(elements),
        _ => Err(Error::EvalError(format!("{op} requires a list, got {value}"))),
    }
}

//
// Builtin function implementations
//

fn builtin_add(args: &[Value]) -> Result<Value, Error> {
    let mut sum = 0.0;
    for arg in args {
        sum += expect_number(arg, "+")?;
    }
    Ok(Value::Number(sum))
}

fn builtin_sub(args: &[Value]) -> Result<Value, Error> {
    let first = expect_number(&args[0], "-")?;
    if args.len() == 1 {
        return Ok(Value::Number(-first)); // Unary negation
    }
    let mut result = first;
    for arg in &args[1..] {
        result -= expect_number(arg, "-")?;
    }
    Ok(Value::Number(result))
}

fn builtin_mul(args: &[Value]) -> Result<Value, Error> {
    let mut product = 1.0;
    for arg in args {
        product *= expect_number(arg, "*")?;
    }
    Ok(Value::Number(product))
}

fn builtin_div(args: &[Value]) -> Result<Value, Error> {
    let mut result = expect_number(&args[0], "/")?;
    for arg in &args[1..] {
        let divisor = expect_number(arg, "/")?;
        if divisor == 0.0 {
            return Err(Error::EvalError("division by zero".to_owned()));
        }
        result /= divisor;
    }
    Ok(Value::Number(result))
}

// Macro to generate the binary numeric comparison functions
macro_rules! numeric_comparison {
    ($name:ident, $op:tt, $op_str:expr) => {
        fn $name(args: &[Value]) -> Result<Value, Error> {
            let a = expect_number(&args[0], $op_str)?;
            let b = expect_number(&args[1], $op_str)?;
            Ok(Value::Bool(a $op b))
        }
    };
}

numeric_comparison!(builtin_gt, >, ">");
numeric_comparison!(builtin_lt, <, "<");
numeric_comparison!(builtin_ge, >=, ">=");
numeric_comparison!(builtin_le, <=, "<=");
numeric_comparison!(builtin_num_eq, ==, "=");

fn builtin_abs(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Number(expect_number(&args[0], "abs")?.abs()))
}

fn builtin_round(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Number(expect_number(&args[0], "round")?.round()))
}

fn builtin_min(args: &[Value]) -> Result<Value, Error> {
    let mut result = expect_number(&args[0], "min")?;
    for arg in &args[1..] {
        result = result.min(expect_number(arg, "min")?);
    }
    Ok(Value::Number(result))
}

fn builtin_max(args: &[Value]) -> Result<Value, Error> {
    let mut result = expect_number(&args[0], "max")?;
    for arg in &args[1..] {
        result = result.max(expect_number(arg, "max")?);
    }
    Ok(Value::Number(result))
}

fn builtin_append(args: &[Value]) -> Result<Value, Error> {
    let mut result = Vec::new();
    for arg in args {
        result.extend_from_slice(expect_list(arg, "append")?);
    }
    Ok(Value::List(result))
}

fn builtin_car(args: &[Value]) -> Result<Value, Error> {
    let list = expect_list(&args[0], "car")?;
    match list.first() {
        Some(first) => Ok(first.clone()),
        None => Err(Error::EvalError("car of empty list".to_owned())),
    }
}

fn builtin_cdr(args: &[Value]) -> Result<Value, Error> {
    let list = expect_list(&args[0], "cdr")?;
    match list.split_first() {
        Some((_, rest)) => Ok(Value::List(rest.to_vec())),
        None => Err(Error::EvalError("cdr of empty list".to_owned())),
    }
}

fn builtin_cons(args: &[Value]) -> Result<Value, Error> {
    let tail = expect_list(&args[1], "cons")?;
    let mut result = Vec::with_capacity(tail.len() + 1);
    result.push(args[0].clone());
    result.extend_from_slice(tail);
    Ok(Value::List(result))
}

fn builtin_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::List(args.to_vec()))
}

fn builtin_length(args: &[Value]) -> Result<Value, Error> {
    let list = expect_list(&args[0], "length")?;
    Ok(Value::Number(list.len() as NumberType))
}

/// Equality for both `eq?` and `equal?`: structural for data, identity for
/// procedures. Lists have no stable address in this value model, so the
/// two predicates coincide.
fn builtin_equal(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(args[0] == args[1]))
}

fn builtin_is_list(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

fn builtin_is_null(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(args[0].is_nil()))
}

fn builtin_is_number(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(matches!(args[0], Value::Number(_))))
}

fn builtin_is_procedure(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(matches!(
        args[0],
        Value::Builtin(_) | Value::Closure { .. }
    )))
}

fn builtin_is_symbol(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(matches!(args[0], Value::Symbol(_))))
}

fn builtin_not(args: &[Value]) -> Result<Value, Error> {
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn builtin_begin(args: &[Value]) -> Result<Value, Error> {
    // Sequencing falls out of argument evaluation order: every argument
    // was already evaluated left to right before this runs
    match args.last() {
        Some(last) => Ok(last.clone()),
        None => Err(Error::arity_error(1, 0)),
    }
}

fn builtin_print(args: &[Value]) -> Result<Value, Error> {
    let rendered: Vec<String> = args.iter().map(|value| value.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Unspecified)
}

fn builtin_apply(args: &[Value], depth: usize) -> Result<Value, Error> {
    let call_args = expect_list(&args[1], "apply")?;
    apply_procedure(&args[0], call_args, depth + 1)
}

fn builtin_map(args: &[Value], depth: usize) -> Result<Value, Error> {
    let elements = expect_list(&args[1], "map")?;
    let mut result = Vec::with_capacity(elements.len());
    for element in elements {
        result.push(apply_procedure(
            &args[0],
            std::slice::from_ref(element),
            depth + 1,
        )?);
    }
    Ok(Value::List(result))
}

/// Fixed registry of all built-in operations
static BUILTIN_OPS: &[BuiltinOp] = &[
    // Arithmetic
    BuiltinOp {
        name: "+",
        kind: OpKind::Function(builtin_add),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "-",
        kind: OpKind::Function(builtin_sub),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "*",
        kind: OpKind::Function(builtin_mul),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "/",
        kind: OpKind::Function(builtin_div),
        arity: Arity::AtLeast(1),
    },
    // Comparison
    BuiltinOp {
        name: ">",
        kind: OpKind::Function(builtin_gt),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "<",
        kind: OpKind::Function(builtin_lt),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: ">=",
        kind: OpKind::Function(builtin_ge),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "<=",
        kind: OpKind::Function(builtin_le),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "=",
        kind: OpKind::Function(builtin_num_eq),
        arity: Arity::Exact(2),
    },
    // Numeric
    BuiltinOp {
        name: "abs",
        kind: OpKind::Function(builtin_abs),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "round",
        kind: OpKind::Function(builtin_round),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "min",
        kind: OpKind::Function(builtin_min),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "max",
        kind: OpKind::Function(builtin_max),
        arity: Arity::AtLeast(1),
    },
    // List operations
    BuiltinOp {
        name: "append",
        kind: OpKind::Function(builtin_append),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "car",
        kind: OpKind::Function(builtin_car),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "cdr",
        kind: OpKind::Function(builtin_cdr),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "cons",
        kind: OpKind::Function(builtin_cons),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "list",
        kind: OpKind::Function(builtin_list),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "length",
        kind: OpKind::Function(builtin_length),
        arity: Arity::Exact(1),
    },
    // Equality
    BuiltinOp {
        name: "eq?",
        kind: OpKind::Function(builtin_equal),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "equal?",
        kind: OpKind::Function(builtin_equal),
        arity: Arity::Exact(2),
    },
    // Type predicates
    BuiltinOp {
        name: "list?",
        kind: OpKind::Function(builtin_is_list),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "null?",
        kind: OpKind::Function(builtin_is_null),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "number?",
        kind: OpKind::Function(builtin_is_number),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "procedure?",
        kind: OpKind::Function(builtin_is_procedure),
        arity: Arity::Exact(1),
    },
    BuiltinOp {
        name: "symbol?",
        kind: OpKind::Function(builtin_is_symbol),
        arity: Arity::Exact(1),
    },
    // Logic
    BuiltinOp {
        name: "not",
        kind: OpKind::Function(builtin_not),
        arity: Arity::Exact(1),
    },
    // Sequencing
    BuiltinOp {
        name: "begin",
        kind: OpKind::Function(builtin_begin),
        arity: Arity::AtLeast(1),
    },
    // Higher-order operations
    BuiltinOp {
        name: "apply",
        kind: OpKind::HigherOrder(builtin_apply),
        arity: Arity::Exact(2),
    },
    BuiltinOp {
        name: "map",
        kind: OpKind::HigherOrder(builtin_map),
        arity: Arity::Exact(2),
    },
    // Output
    BuiltinOp {
        name: "print",
        kind: OpKind::Function(builtin_print),
        arity: Arity::Any,
    },
];

/// Get all builtin operations (used to populate the global environment)
pub(crate) fn get_builtin_ops() -> &'static [BuiltinOp] {
    BUILTIN_OPS
}

/// Look up a built-in operation by name
pub fn find_op(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_OPS.iter().find(|op| op.name == name)
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::ast::{nil, sym, val};

    /// Micro-helper for success cases
    fn success<T: Into<Value>>(value: T) -> Option<Value> {
        Some(val(value))
    }

    /// Invoke a builtin through the registry the way the evaluator would:
    /// arity first, then the implementation.
    fn call_builtin(name: &str, args: &[Value]) -> Result<Value, Error> {
        let op = find_op(name).expect("builtin not found");
        op.arity.validate(args.len())?;
        match op.kind {
            OpKind::Function(func) => func(args),
            OpKind::HigherOrder(func) => func(args, 0),
        }
    }

    fn builtin_value(name: &str) -> Value {
        Value::Builtin(find_op(name).expect("builtin not found"))
    }

    #[test]
    fn test_registry_lookup() {
        let car_op = find_op("car").unwrap();
        assert_eq!(car_op.name, "car");
        assert_eq!(car_op.arity, Arity::Exact(1));

        let add_op = find_op("+").unwrap();
        assert_eq!(add_op.arity, Arity::Any);

        assert!(find_op("unknown").is_none());
        assert!(find_op("lambda").is_none()); // special forms are not builtins

        // Every registered name is unique
        for op in get_builtin_ops() {
            assert!(std::ptr::eq(find_op(op.name).unwrap(), op));
        }
    }

    /// Macro to create test cases, invoking builtins via the registry.
    macro_rules! test {
        ($name:expr, $args:expr, $expected:expr) => {
            ($name, call_builtin($name, $args), $expected)
        };
    }

    #[test]
    #[expect(clippy::too_many_lines)] // Comprehensive test coverage is intentionally thorough
    fn test_builtin_function_implementations() {
        type TestCase = (&'static str, Result<Value, Error>, Option<Value>);

        let int_list = val([1, 2, 3]);
        let mixed = val(vec![val(1), sym("two"), nil()]);

        let test_cases: Vec<TestCase> = vec![
            // Addition
            test!("+", &[], success(0)),
            test!("+", &[val(5)], success(5)),
            test!("+", &[val(1), val(2), val(3)], success(6)),
            test!("+", &[val(-5), val(10)], success(5)),
            test!("+", &[val(0.5), val(0.25)], success(0.75)),
            test!("+", &[sym("a")], None),
            test!("+", &[val(1), val(true)], None),
            // Subtraction
            test!("-", &[val(5)], success(-5)),
            test!("-", &[val(-5)], success(5)),
            test!("-", &[val(10), val(3), val(2)], success(5)),
            test!("-", &[], None),
            test!("-", &[sym("a")], None),
            // Multiplication
            test!("*", &[], success(1)),
            test!("*", &[val(5)], success(5)),
            test!("*", &[val(2), val(3), val(4)], success(24)),
            test!("*", &[val(2), nil()], None),
            // Division
            test!("/", &[val(10), val(4)], success(2.5)),
            test!("/", &[val(8), val(2), val(2)], success(2)),
            test!("/", &[val(5)], success(5)),
            test!("/", &[], None),
            test!("/", &[val(1), val(0)], None),
            test!("/", &[val(0), val(5)], success(0)),
            // Comparisons (binary)
            test!(">", &[val(7), val(3)], success(true)),
            test!(">", &[val(3), val(8)], success(false)),
            test!(">", &[val(4), val(4)], success(false)),
            test!("<", &[val(2), val(9)], success(true)),
            test!("<", &[val(8), val(4)], success(false)),
            test!(">=", &[val(7), val(7)], success(true)),
            test!(">=", &[val(2), val(6)], success(false)),
            test!("<=", &[val(3), val(3)], success(true)),
            test!("<=", &[val(8), val(2)], success(false)),
            test!("=", &[val(12), val(12)], success(true)),
            test!("=", &[val(8), val(3)], success(false)),
            test!("=", &[val(1.5), val(1.5)], success(true)),
            test!(">", &[val(5)], None),                   // Too few args
            test!(">", &[val(1), val(2), val(3)], None),   // Too many args
            test!(">", &[sym("a"), val(3)], None),         // Wrong type
            // abs / round
            test!("abs", &[val(-7)], success(7)),
            test!("abs", &[val(7)], success(7)),
            test!("abs", &[val(-2.5)], success(2.5)),
            test!("round", &[val(2.4)], success(2)),
            test!("round", &[val(2.5)], success(3)),
            test!("round", &[val(-0.5)], success(-1)),
            test!("abs", &[], None),
            test!("round", &[sym("a")], None),
            // min / max
            test!("max", &[val(5)], success(5)),
            test!("max", &[val(1), val(2), val(3)], success(3)),
            test!("max", &[val(-5), val(-1), val(-10)], success(-1)),
            test!("min", &[val(5)], success(5)),
            test!("min", &[val(3), val(1), val(2)], success(1)),
            test!("min", &[val(-5), val(-1), val(-10)], success(-10)),
            test!("max", &[], None),
            test!("min", &[val(1), sym("a")], None),
            // append
            test!("append", &[], Some(nil())),
            test!("append", &[val([1, 2])], success([1, 2])),
            test!(
                "append",
                &[val([1, 2]), val([3]), val([4, 5])],
                success([1, 2, 3, 4, 5])
            ),
            test!("append", &[val([1]), val(2)], None),
            // car / cdr / cons
            test!("car", &[val([1, 2, 3])], success(1)),
            test!("car", &[mixed.clone()], success(1)),
            test!("car", &[nil()], None),
            test!("car", &[val(42)], None),
            test!("car", &[int_list.clone(), int_list.clone()], None),
            test!("cdr", &[val([1, 2, 3])], success([2, 3])),
            test!("cdr", &[val([1])], Some(nil())),
            test!("cdr", &[nil()], None),
            test!("cons", &[val(0), val([1, 2])], success([0, 1, 2])),
            test!("cons", &[val(1), nil()], success([1])),
            test!(
                "cons",
                &[nil(), val([1])],
                Some(val(vec![nil(), val(1)]))
            ),
            test!("cons", &[val(1), val(2)], None),
            test!("cons", &[val(1)], None),
            // list / length
            test!("list", &[], Some(nil())),
            test!("list", &[val(1)], success([1])),
            test!(
                "list",
                &[val(1), sym("a"), nil()],
                Some(val(vec![val(1), sym("a"), nil()]))
            ),
            test!("length", &[val([1, 2, 3])], success(3)),
            test!("length", &[nil()], success(0)),
            test!("length", &[val(42)], None),
            // Equality
            test!("equal?", &[val(11), val(11)], success(true)),
            test!("equal?", &[val(15), val(3)], success(false)),
            test!("equal?", &[sym("a"), sym("a")], success(true)),
            test!("equal?", &[sym("a"), sym("b")], success(false)),
            test!("equal?", &[val([1, 2]), val([1, 2])], success(true)),
            test!("equal?", &[val([1, 2]), val([1, 3])], success(false)),
            test!("equal?", &[val(5), sym("five")], success(false)),
            test!("equal?", &[nil(), nil()], success(true)),
            test!("eq?", &[val(5), val(5)], success(true)),
            test!("eq?", &[val(5)], None),
            test!("eq?", &[val(5), val(5), val(5)], None),
            // Predicates
            test!("list?", &[nil()], success(true)),
            test!("list?", &[val([1])], success(true)),
            test!("list?", &[val(1)], success(false)),
            test!("null?", &[nil()], success(true)),
            test!("null?", &[val([1])], success(false)),
            test!("null?", &[val(0)], success(false)),
            test!("number?", &[val(1.5)], success(true)),
            test!("number?", &[sym("a")], success(false)),
            test!("symbol?", &[sym("a")], success(true)),
            test!("symbol?", &[val(1)], success(false)),
            test!("number?", &[], None),
            // not: boolean false is the only falsy value
            test!("not", &[val(false)], success(true)),
            test!("not", &[val(true)], success(false)),
            test!("not", &[val(0)], success(false)),
            test!("not", &[nil()], success(false)),
            test!("not", &[sym("a")], success(false)),
            test!("not", &[], None),
            // begin
            test!("begin", &[val(1), val(2), val(3)], success(3)),
            test!("begin", &[val(7)], success(7)),
            test!("begin", &[], None),
            // print
            test!("print", &[val(1), sym("two")], Some(Value::Unspecified)),
        ];

        for (test_expr, result, expected) in test_cases {
            match (result, expected) {
                (Ok(actual), Some(expected_val)) => {
                    // Unspecified matches on kind only
                    match (&actual, &expected_val) {
                        (Value::Unspecified, Value::Unspecified) => {}
                        _ => assert_eq!(actual, expected_val, "Failed for test case: {test_expr}"),
                    }
                }
                (Err(_), None) => {} // Expected error
                (actual, expected) => panic!(
                    "Unexpected result for test case: {}\nGot ok: {:?}, Expected ok: {:?}",
                    test_expr,
                    actual.is_ok(),
                    expected.is_some()
                ),
            }
        }
    }

    #[test]
    fn test_higher_order_builtins_with_builtin_procedures() {
        // apply: procedure + argument list
        let result = call_builtin("apply", &[builtin_value("+"), val([1, 2, 3])]).unwrap();
        assert_eq!(result, val(6));

        let result = call_builtin("apply", &[builtin_value("car"), val(vec![val([5, 6])])]).unwrap();
        assert_eq!(result, val(5));

        // map: procedure applied elementwise
        let result = call_builtin("map", &[builtin_value("abs"), val([-1, 2, -3])]).unwrap();
        assert_eq!(result, val([1, 2, 3]));

        let result = call_builtin("map", &[builtin_value("abs"), nil()]).unwrap();
        assert_eq!(result, nil());

        // Type and arity failures
        call_builtin("apply", &[builtin_value("+"), val(3)]).unwrap_err();
        call_builtin("apply", &[val(3), nil()]).unwrap_err();
        call_builtin("map", &[builtin_value("abs")]).unwrap_err();
    }

    #[test]
    fn test_procedure_equality_and_predicates() {
        let car = builtin_value("car");
        let cdr = builtin_value("cdr");

        assert_eq!(
            call_builtin("eq?", &[car.clone(), car.clone()]).unwrap(),
            val(true)
        );
        assert_eq!(
            call_builtin("eq?", &[car.clone(), cdr]).unwrap(),
            val(false)
        );
        assert_eq!(call_builtin("procedure?", &[car]).unwrap(), val(true));
        assert_eq!(call_builtin("procedure?", &[val(1)]).unwrap(), val(false));
    }

    #[test]
    fn test_arity_validation() {
        use Arity::*;

        // Exact validation
        Exact(2).validate(2).unwrap();
        Exact(2).validate(1).unwrap_err();
        Exact(2).validate(3).unwrap_err();

        // AtLeast validation
        AtLeast(1).validate(1).unwrap();
        AtLeast(1).validate(2).unwrap();
        AtLeast(1).validate(0).unwrap_err();

        // Any validation
        Any.validate(0).unwrap();
        Any.validate(100).unwrap();

        // Error contents
        match Exact(2).validate(1).unwrap_err() {
            Error::ArityError { expected, got } => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("Expected ArityError, got {other:?}"),
        }
    }

    #[test]
    fn test_division_by_zero_message() {
        match call_builtin("/", &[val(1), val(0)]).unwrap_err() {
            Error::EvalError(msg) => assert_eq!(msg, "division by zero"),
            other => panic!("Expected EvalError, got {other:?}"),
        }
    }
}
