use crate::Error;
use crate::MAX_EVAL_DEPTH;
use crate::ast::{Expression, Value};
use crate::builtinops::{OpKind, get_builtin_ops};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environment for variable bindings: one frame of symbol-to-value bindings
/// plus an optional reference to the enclosing frame.
///
/// Frames are shared, reference-counted handles. A closure keeps its
/// defining frame alive, and a binding added to a captured frame is visible
/// to every holder of that frame, so `(define fact (lambda (n) ... (fact ...)))`
/// resolves its own name at call time. The outer link is fixed at
/// construction and the chain is acyclic; only the binding table mutates.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<Frame>,
}

struct Frame {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Environment>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Shallow on purpose: a frame can hold closures that capture it
        write!(
            f,
            "Environment({} bindings{})",
            self.frame.bindings.borrow().len(),
            if self.frame.outer.is_some() {
                ", outer"
            } else {
                ""
            }
        )
    }
}

impl Environment {
    pub(crate) fn new() -> Self {
        Environment {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                outer: None,
            }),
        }
    }

    /// New empty frame whose lookups fall through to `outer`
    pub(crate) fn with_outer(outer: &Environment) -> Self {
        Environment {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                outer: Some(outer.clone()),
            }),
        }
    }

    /// Insert or overwrite a binding in this frame only; outer frames are
    /// never written through.
    pub(crate) fn define(&self, name: String, value: Value) {
        self.frame.bindings.borrow_mut().insert(name, value);
    }

    /// Look a symbol up in this frame, then along the outer chain.
    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.frame.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.frame.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Frame identity: whether two handles share the same frame
    pub(crate) fn ptr_eq(a: &Environment, b: &Environment) -> bool {
        Rc::ptr_eq(&a.frame, &b.frame)
    }

    /// Get all bindings visible from this environment and its outer chain.
    /// Returns a Vec of (name, value) pairs sorted by name; inner bindings
    /// shadow outer ones.
    pub fn get_all_bindings(&self) -> Vec<(String, Value)> {
        let mut bindings = HashMap::new();

        // Start with outer bindings (so they can be overridden by local bindings)
        if let Some(outer) = &self.frame.outer {
            for (name, value) in outer.get_all_bindings() {
                bindings.insert(name, value);
            }
        }

        // Add/override with local bindings
        for (name, value) in self.frame.bindings.borrow().iter() {
            bindings.insert(name.clone(), value.clone());
        }

        // Convert to sorted vector
        let mut result: Vec<_> = bindings.into_iter().collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

/// Evaluate an expression in an environment (public API)
pub fn eval(expr: &Expression, env: &Environment) -> Result<Value, Error> {
    eval_with_depth_tracking(expr, env, 0)
}

/// Evaluate with depth tracking so runaway recursion surfaces as
/// [`Error::StackOverflow`] before the native call stack is exhausted
fn eval_with_depth_tracking(
    expr: &Expression,
    env: &Environment,
    depth: usize,
) -> Result<Value, Error> {
    if depth >= MAX_EVAL_DEPTH {
        return Err(Error::StackOverflow);
    }
    match expr {
        // Numbers evaluate to themselves
        Expression::Number(n) => Ok(Value::Number(*n)),

        // Variable lookup
        Expression::Symbol(name) => env
            .get(name)
            .ok_or_else(|| Error::UnboundSymbol(name.clone())),

        // Special forms and procedure application
        Expression::List(elements) => {
            eval_list(elements, env, depth).map_err(|err| add_context(err, expr))
        }
    }
}

/// Helper function to add expression context to errors
fn add_context(error: Error, expr: &Expression) -> Error {
    match error {
        Error::EvalError(msg) => {
            Error::EvalError(format!("{msg}\n  while evaluating: {expr}"))
        }
        // Parse errors, unbound symbols, arity errors and stack overflow
        // carry their own context
        other => other,
    }
}

/// Helper function to evaluate a sequence of argument expressions
/// left to right with depth tracking
fn eval_args(args: &[Expression], env: &Environment, depth: usize) -> Result<Vec<Value>, Error> {
    args.iter()
        .map(|arg| eval_with_depth_tracking(arg, env, depth + 1))
        .collect()
}

/// Evaluate a list expression: special forms first, then application.
///
/// Special forms are matched by their literal head symbol before the head
/// is evaluated; they are not values and cannot be shadowed. Anything else
/// falls through to the general application rule.
fn eval_list(elements: &[Expression], env: &Environment, depth: usize) -> Result<Value, Error> {
    match elements {
        [] => Err(Error::EvalError("cannot evaluate empty list".to_owned())),

        [Expression::Symbol(head), args @ ..] => match head.as_str() {
            "quote" => eval_quote(args, env, depth),
            "if" => eval_if(args, env, depth),
            "define" => eval_define(args, env, depth),
            "lambda" => eval_lambda(args, env, depth),
            _ => eval_application(elements, env, depth),
        },

        _ => eval_application(elements, env, depth),
    }
}

/// General application: evaluate the head to obtain a procedure, evaluate
/// the remaining elements left to right, then apply
fn eval_application(
    elements: &[Expression],
    env: &Environment,
    depth: usize,
) -> Result<Value, Error> {
    let [proc_expr, arg_exprs @ ..] = elements else {
        return Err(Error::EvalError("cannot evaluate empty list".to_owned()));
    };

    let procedure = eval_with_depth_tracking(proc_expr, env, depth + 1)?;
    let args = eval_args(arg_exprs, env, depth)?;
    apply_procedure(&procedure, &args, depth)
}

/// Apply a procedure value to already-evaluated arguments. Shared by the
/// evaluator and the higher-order built-ins (`apply`, `map`).
pub(crate) fn apply_procedure(
    procedure: &Value,
    args: &[Value],
    depth: usize,
) -> Result<Value, Error> {
    match procedure {
        Value::Builtin(op) => {
            op.arity.validate(args.len())?;
            match op.kind {
                OpKind::Function(func) => func(args),
                OpKind::HigherOrder(func) => func(args, depth),
            }
        }
        Value::Closure {
            params,
            body,
            env: closure_env,
        } => {
            if params.len() != args.len() {
                return Err(Error::arity_error(params.len(), args.len()));
            }

            // The call frame chains to the closure's captured environment,
            // not the caller's: lexical, not dynamic, scoping
            let call_env = Environment::with_outer(closure_env);
            for (param, arg) in params.iter().zip(args.iter()) {
                call_env.define(param.clone(), arg.clone());
            }

            eval_with_depth_tracking(body, &call_env, depth + 1)
        }
        _ => Err(Error::EvalError(format!("not callable: {procedure}"))),
    }
}

/// Evaluate quote special form: return the argument as data, unevaluated
fn eval_quote(args: &[Expression], _env: &Environment, _depth: usize) -> Result<Value, Error> {
    match args {
        [expr] => Ok(Value::from(expr)),
        _ => Err(Error::arity_error(1, args.len())),
    }
}

/// Evaluate if special form. Boolean false is the only falsy value, so any
/// other test result selects the consequent. Only the chosen branch is
/// evaluated; the other may be ill-typed or divergent.
fn eval_if(args: &[Expression], env: &Environment, depth: usize) -> Result<Value, Error> {
    match args {
        [test_expr, conseq_expr, alt_expr] => {
            let test = eval_with_depth_tracking(test_expr, env, depth + 1)?;
            if test.is_truthy() {
                eval_with_depth_tracking(conseq_expr, env, depth + 1)
            } else {
                eval_with_depth_tracking(alt_expr, env, depth + 1)
            }
        }
        _ => Err(Error::arity_error(3, args.len())),
    }
}

/// Evaluate define special form: bind in the current frame, never an outer
/// one. The result carries no output for the read loop.
fn eval_define(args: &[Expression], env: &Environment, depth: usize) -> Result<Value, Error> {
    match args {
        [Expression::Symbol(name), value_expr] => {
            let value = eval_with_depth_tracking(value_expr, env, depth + 1)?;
            env.define(name.clone(), value);
            Ok(Value::Unspecified)
        }
        [_, _] => Err(Error::EvalError("define requires a symbol".to_owned())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Evaluate lambda special form: capture the parameter list, the
/// unevaluated body, and the defining environment
fn eval_lambda(args: &[Expression], env: &Environment, _depth: usize) -> Result<Value, Error> {
    match args {
        [Expression::List(param_list), body] => {
            let mut params = Vec::new();
            for param in param_list {
                match param {
                    Expression::Symbol(name) => {
                        if params.contains(name) {
                            return Err(Error::EvalError(format!(
                                "duplicate parameter name: {name}"
                            )));
                        }
                        params.push(name.clone());
                    }
                    _ => {
                        return Err(Error::EvalError(
                            "lambda parameters must be symbols".to_owned(),
                        ));
                    }
                }
            }

            Ok(Value::Closure {
                params,
                body: Box::new(body.clone()),
                env: env.clone(),
            })
        }
        [_, _] => Err(Error::EvalError("lambda parameters must be a list".to_owned())),
        _ => Err(Error::arity_error(2, args.len())),
    }
}

/// Create the root environment pre-populated with the built-in procedure
/// table. Called once per interpreter session; top-level `define`s land in
/// this frame.
pub fn create_global_env() -> Environment {
    let env = Environment::new();
    for op in get_builtin_ops() {
        env.define(op.name.to_owned(), Value::Builtin(op));
    }
    env
}
