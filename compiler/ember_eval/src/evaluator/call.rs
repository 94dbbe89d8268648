//! Call sites: argument evaluation and entry-point selection.

use smallvec::SmallVec;
use std::sync::Arc;

use ember_ir::{ExprId, ExprKind};
use ember_value::{EvalError, EvalResult, Value, Var};

use super::Evaluator;
use crate::{ArgMode, Callable, Environment, RefArgs, MAX_FIXED_ARITY};

/// Evaluated arguments; inline up to the fixed-arity limit.
type Args = SmallVec<[Value; MAX_FIXED_ARITY]>;

impl Evaluator<'_> {
    pub(super) fn call(
        &self,
        env: &mut Environment,
        callee: &Arc<dyn Callable>,
        args: &[ExprId],
    ) -> EvalResult {
        let (values, refs) = self.eval_args(env, callee.as_ref(), args)?;
        if self.passes_variables(args) {
            env.with_ref_args(refs, |env| invoke(env, callee.as_ref(), values))
        } else {
            invoke(env, callee.as_ref(), values)
        }
    }

    pub(super) fn call_ref(
        &self,
        env: &mut Environment,
        callee: &Arc<dyn Callable>,
        args: &[ExprId],
    ) -> Result<Var, EvalError> {
        let (values, refs) = self.eval_args(env, callee.as_ref(), args)?;
        if self.passes_variables(args) {
            env.with_ref_args(refs, |env| invoke_ref(env, callee.as_ref(), values))
        } else {
            invoke_ref(env, callee.as_ref(), values)
        }
    }

    /// Calls with a variable argument run under their own `RefArgs`, in
    /// both backends, whatever modes the callee declares.
    fn passes_variables(&self, args: &[ExprId]) -> bool {
        args.iter()
            .any(|&arg| matches!(self.arena.kind(arg), ExprKind::Var(_)))
    }

    /// Arguments left to right, each in the mode the callee declares for
    /// its position. Variables passed in `ArgMode::Ref` also hand over
    /// their cells.
    fn eval_args(
        &self,
        env: &mut Environment,
        callee: &dyn Callable,
        args: &[ExprId],
    ) -> Result<(Args, RefArgs), EvalError> {
        let mut values = Args::with_capacity(args.len());
        let mut refs = RefArgs::new();
        for (index, &arg) in args.iter().enumerate() {
            let mode = callee.arg_mode(index);
            let value = match self.arena.kind(arg) {
                ExprKind::Var(name) if mode == ArgMode::Ref => {
                    let cell = env.get_var(name);
                    let value = cell.get();
                    refs.bind(index, cell);
                    value
                }
                _ => self.eval_arg_in_mode(env, mode, arg)?,
            };
            values.push(value);
        }
        Ok((values, refs))
    }

    /// Non-storage arguments are plain values whatever the mode.
    pub fn eval_arg_in_mode(&self, env: &mut Environment, mode: ArgMode, arg: ExprId) -> EvalResult {
        if !self.arena.kind(arg).is_storage() {
            return self.eval(env, arg);
        }
        match mode {
            ArgMode::Value => self.eval_copy(env, arg),
            ArgMode::Ref => self.eval_arg(env, arg),
            ArgMode::ArrayRef => self.eval_arg_array(env, arg),
            ArgMode::ObjectRef => self.eval_arg_object(env, arg),
        }
    }
}

fn trace_call(callee: &dyn Callable, arity: usize) {
    tracing::trace!(
        function = callee.name(),
        arity,
        packed = arity > MAX_FIXED_ARITY,
        "call"
    );
}

/// Fixed-arity entry point for up to five arguments, the slice-taking one
/// above that.
fn invoke(env: &mut Environment, callee: &dyn Callable, args: Args) -> EvalResult {
    let arity = args.len();
    trace_call(callee, arity);
    if arity > MAX_FIXED_ARITY {
        return callee.call_args(env, &args);
    }
    let mut it = args.into_iter();
    let mut next = || it.next().unwrap_or_default();
    match arity {
        0 => callee.call0(env),
        1 => callee.call1(env, next()),
        2 => callee.call2(env, next(), next()),
        3 => callee.call3(env, next(), next(), next()),
        4 => callee.call4(env, next(), next(), next(), next()),
        _ => callee.call5(env, next(), next(), next(), next(), next()),
    }
}

fn invoke_ref(env: &mut Environment, callee: &dyn Callable, args: Args) -> Result<Var, EvalError> {
    let arity = args.len();
    trace_call(callee, arity);
    if arity > MAX_FIXED_ARITY {
        return callee.call_ref_args(env, &args);
    }
    let mut it = args.into_iter();
    let mut next = || it.next().unwrap_or_default();
    match arity {
        0 => callee.call_ref0(env),
        1 => callee.call_ref1(env, next()),
        2 => callee.call_ref2(env, next(), next()),
        3 => callee.call_ref3(env, next(), next(), next()),
        4 => callee.call_ref4(env, next(), next(), next(), next()),
        _ => callee.call_ref5(env, next(), next(), next(), next(), next()),
    }
}
