//! Call sites.
//!
//! The callee is resolved first, then arguments left to right. A storage
//! argument's passing mode is only known once the callee is, so its code is
//! emitted once per `ArgMode` inside a `match` on `arg_mode(i)`. The entry
//! point is chosen from the static argument count with the same threshold
//! the evaluator uses.
//!
//! A call with a variable argument collects the cells of variables passed
//! in `ArgMode::Ref` into a `RefArgs` and runs under
//! `env.with_ref_args`, matching the evaluator.

use ember_ir::{ExprId, ExprKind, Name};

use super::{Compiler, GenResult};
use crate::emitter::TempKind;
use crate::CodegenError;

/// Largest argument count passed through `call0..call5`.
pub const MAX_FIXED_ARITY: usize = 5;

impl Compiler<'_> {
    /// `let _f = env.function_by_name(..)?;`
    pub(super) fn resolve_static(&mut self, name: Name) -> String {
        let name = self.name(name);
        self.bind(TempKind::Callee, &format!("env.function_by_name({name})?"))
    }

    /// Name expression first, then `env.function(&name)?`.
    pub(super) fn resolve_dynamic(&mut self, name: ExprId) -> GenResult {
        let name = self.generate(name)?;
        Ok(self.bind(TempKind::Callee, &format!("env.function(&{name})?")))
    }

    pub(super) fn generate_call(
        &mut self,
        callee: &str,
        args: &[ExprId],
        by_ref: bool,
    ) -> GenResult {
        let passes_variables = args
            .iter()
            .any(|&arg| matches!(self.arena.kind(arg), ExprKind::Var(_)));
        let refs = passes_variables.then(|| {
            let refs = self.emitter.declare_temp(TempKind::RefArgs);
            self.line(&format!("let mut {refs} = RefArgs::new();"));
            refs
        });
        let mut values = Vec::with_capacity(args.len());
        for (index, &arg) in args.iter().enumerate() {
            values.push(self.generate_call_arg(callee, index, arg, refs.as_deref())?);
        }
        let values: Vec<&str> = values.iter().map(String::as_str).collect();

        let (kind, prefix) = if by_ref {
            (TempKind::Ref, "call_ref")
        } else {
            (TempKind::Value, "call")
        };
        let call = if values.len() > MAX_FIXED_ARITY {
            let packed = format!("&[{}]", values.join(", "));
            self.emitter
                .emit_call(callee, &format!("{prefix}_args"), &["env", &packed])
        } else {
            let mut call_args = Vec::with_capacity(values.len() + 1);
            call_args.push("env");
            call_args.extend_from_slice(&values);
            self.emitter
                .emit_call(callee, &format!("{prefix}{}", values.len()), &call_args)
        };
        tracing::trace!(arity = values.len(), packed = values.len() > MAX_FIXED_ARITY, "call site");
        let call = match refs {
            Some(refs) => format!("env.with_ref_args({refs}, |env| {call})?"),
            None => format!("{call}?"),
        };
        Ok(self.bind(kind, &call))
    }

    /// One argument, in the mode the runtime callee declares.
    fn generate_call_arg(
        &mut self,
        callee: &str,
        index: usize,
        arg: ExprId,
        refs: Option<&str>,
    ) -> GenResult {
        if !self.node(arg)?.is_storage() {
            return self.generate(arg);
        }
        let result = self.emitter.declare_temp(TempKind::Value);
        self.line(&format!("let {result} = match {callee}.arg_mode({index}) {{"));
        self.emitter.indent();
        self.generate_arm("ArgMode::Value", |c| c.generate_copy(arg))?;
        self.generate_arm("ArgMode::Ref", |c| c.generate_arg(arg, refs.map(|r| (r, index))))?;
        self.generate_arm("ArgMode::ArrayRef", |c| c.generate_arg_array(arg))?;
        self.generate_arm("ArgMode::ObjectRef", |c| c.generate_arg_object(arg))?;
        self.emitter.dedent();
        self.line("};");
        Ok(result)
    }

    fn generate_arm(
        &mut self,
        pattern: &str,
        generate: impl FnOnce(&mut Self) -> GenResult,
    ) -> Result<(), CodegenError> {
        self.emitter.open_block(&format!("{pattern} =>"));
        let value = generate(self)?;
        self.line(&value);
        self.emitter.close_block();
        Ok(())
    }
}
