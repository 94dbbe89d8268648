//! Rust source generation from analyzed trees.
//!
//! Every `generate*` method mirrors the `Evaluator` method of the same
//! context: executing the emitted text against an equivalent environment
//! produces the same value, primitive or side effect, in the same order.
//!
//! Generated code is a flat sequence of `let` bindings. Each generator
//! returns an *operand*: either a temporary or a side-effect-free literal,
//! valid for exactly one use. Binding every intermediate result keeps
//! operand order explicit, since Rust would otherwise evaluate a method's
//! receiver before operands emitted ahead of it.

use ember_analyze::{Analysis, ScopeMode, StaticType};
use ember_ir::{ExprArena, ExprId, ExprKind, Name, Statement, StatementKind};
use ember_stack::ensure_sufficient_stack;

use crate::emitter::{Emitter, TempKind};
use crate::errors::{not_analyzed, CodegenError};

mod arith;
mod call;
mod context;
mod lvalue;
mod primitive;
mod rebuild;

pub use call::MAX_FIXED_ARITY;

/// Result of one generator: the operand text.
pub type GenResult = Result<String, CodegenError>;

/// Compiles nodes of one analyzed arena to Rust source.
pub struct Compiler<'a> {
    arena: &'a ExprArena,
    analysis: &'a Analysis,
    emitter: Emitter,
}

impl<'a> Compiler<'a> {
    pub fn new(arena: &'a ExprArena, analysis: &'a Analysis) -> Self {
        Compiler {
            arena,
            analysis,
            emitter: Emitter::with_indent(1),
        }
    }

    pub fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    /// Compile a unit to `pub fn {name}(env: &mut Environment) -> Result<(), EvalError>`.
    #[tracing::instrument(level = "debug", skip_all, fields(unit = name, statements = statements.len()))]
    pub fn compile_unit(mut self, name: &str, statements: &[Statement]) -> GenResult {
        for statement in statements {
            self.generate_statement(statement)?;
        }
        let body = self.emitter.take_output();
        let source = self.wrap(
            &format!("pub fn {name}(env: &mut Environment) -> Result<(), EvalError>"),
            "env",
            &body,
            "Ok(())",
        );
        tracing::debug!(bytes = source.len(), "unit compiled");
        Ok(source)
    }

    /// Compile one expression to `pub fn {name}(env: &mut Environment) -> Result<Value, EvalError>`.
    #[tracing::instrument(level = "debug", skip_all, fields(function = name))]
    pub fn compile_value(mut self, name: &str, id: ExprId) -> GenResult {
        let result = self.generate_value(id)?;
        let body = self.emitter.take_output();
        Ok(self.wrap(
            &format!("pub fn {name}(env: &mut Environment) -> Result<Value, EvalError>"),
            "env",
            &body,
            &format!("Ok({result})"),
        ))
    }

    /// Compile code that rebuilds `id` into a fresh arena:
    /// `pub fn {name}(arena: &mut ExprArena) -> Result<ExprId, RoleError>`.
    #[tracing::instrument(level = "debug", skip_all, fields(function = name))]
    pub fn compile_expr(mut self, name: &str, id: ExprId) -> GenResult {
        let result = self.generate_expr(id)?;
        let body = self.emitter.take_output();
        Ok(self.wrap(
            &format!("pub fn {name}(arena: &mut ExprArena) -> Result<ExprId, RoleError>"),
            "arena",
            &body,
            &format!("Ok({result})"),
        ))
    }

    /// Function header, name bindings interned through `interner`, body,
    /// tail expression.
    fn wrap(&self, header: &str, interner: &str, body: &str, tail: &str) -> String {
        let mut out = Emitter::new();
        out.writeln("#[allow(unreachable_code, unused_mut, unused_variables)]");
        out.open_block(header);
        for (ident, text) in self.emitter.names() {
            out.writeln(&format!("let {ident} = {interner}.intern({text:?});"));
        }
        out.emit_raw(body);
        out.writeln(tail);
        out.close_block();
        out.take_output()
    }

    // ===== Helpers =====

    /// Kind of an analyzed node.
    fn node(&self, id: ExprId) -> Result<ExprKind, CodegenError> {
        if self.analysis.is_analyzed(id) {
            Ok(self.arena.kind(id))
        } else {
            Err(not_analyzed(id))
        }
    }

    fn hint(&self, id: ExprId) -> Option<StaticType> {
        self.analysis.hint(id)
    }

    /// `let {temp} = {expr};`, returning the temporary.
    fn bind(&mut self, kind: TempKind, expr: &str) -> String {
        let temp = self.emitter.declare_temp(kind);
        self.emitter.writeln(&format!("let {temp} = {expr};"));
        temp
    }

    fn line(&mut self, line: &str) {
        self.emitter.writeln(line);
    }

    /// Identifier of an interned name.
    fn name(&mut self, name: Name) -> String {
        let text = self.arena.interner().lookup(name);
        self.emitter.declare_name(name, text)
    }

    fn str_text(&self, name: Name) -> String {
        format!("{:?}", self.arena.interner().lookup(name))
    }

    /// Whether the read at `id` certainly finds no value in a fresh scope.
    fn statically_unset(&self, id: ExprId) -> bool {
        self.analysis.mode() == ScopeMode::Function
            && self.analysis.var_state_at(id).is_some_and(|s| s.is_unset())
    }

    // ===== Statements =====

    /// A statement and its terminator.
    pub fn generate_statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match statement.kind {
            StatementKind::Expr => self.generate_top(statement.expr),
            StatementKind::Echo => self.generate_print(statement.expr),
        }
    }

    /// Statement context: side effects only.
    pub fn generate_top(&mut self, id: ExprId) -> Result<(), CodegenError> {
        match self.node(id)? {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Long(_)
            | ExprKind::Double(_)
            | ExprKind::String(_)
            | ExprKind::Var(_) => Ok(()),
            ExprKind::ArrayGet { .. }
            | ExprKind::ArrayTail { .. }
            | ExprKind::FieldGet { .. }
            | ExprKind::ArrayLiteral { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Cast { .. }
            | ExprKind::Assign { .. }
            | ExprKind::AssignRef { .. }
            | ExprKind::UnsetVar(_)
            | ExprKind::UnsetArray { .. }
            | ExprKind::UnsetField { .. }
            | ExprKind::IssetVar(_)
            | ExprKind::IssetArray { .. }
            | ExprKind::IssetField { .. }
            | ExprKind::Call { .. }
            | ExprKind::CallVar { .. } => self.generate(id).map(drop),
        }
    }

    // ===== Values =====

    /// The value of `id`.
    pub fn generate(&mut self, id: ExprId) -> GenResult {
        ensure_sufficient_stack(|| self.generate_inner(id))
    }

    fn generate_inner(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::Null => Ok("Value::Null".to_owned()),
            ExprKind::Bool(b) => Ok(format!("Value::Bool({b})")),
            ExprKind::Long(n) => Ok(format!("Value::Long({})", long_literal(n))),
            ExprKind::Double(bits) => Ok(format!(
                "Value::Double({})",
                double_literal(f64::from_bits(bits))
            )),
            ExprKind::String(s) => Ok(format!("Value::string({})", self.str_text(s))),

            ExprKind::Var(name) => {
                if self.statically_unset(id) {
                    return Ok("Value::Null".to_owned());
                }
                let name = self.name(name);
                Ok(self.bind(TempKind::Value, &format!("env.get_variable({name})")))
            }
            ExprKind::ArrayGet { base, index } => {
                let container = self.generate(base)?;
                let index = self.generate(index)?;
                Ok(self.bind(TempKind::Value, &format!("{container}.get(&{index})")))
            }
            ExprKind::ArrayTail { .. } => Ok(self.bind(
                TempKind::Value,
                "fail::<Value>(EvalError::ArrayTailRead)?",
            )),
            ExprKind::FieldGet { base, field } => {
                let object = self.generate(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Value, &format!("{object}.get_field({field})")))
            }
            ExprKind::ArrayLiteral { entries } => self.generate_array_literal(entries),

            ExprKind::Unary { op, operand } => match op {
                ember_ir::UnaryOp::Neg => {
                    let value = self.generate(operand)?;
                    Ok(self.bind(TempKind::Value, &format!("{value}.neg()")))
                }
                ember_ir::UnaryOp::Not => {
                    let b = self.generate_boolean(operand)?;
                    Ok(self.bind(TempKind::Value, &format!("Value::Bool(!{b})")))
                }
            },
            ExprKind::Binary { op, left, right } => self.generate_binary(op, left, right),
            ExprKind::Cast { ty, operand } => self.generate_cast(ty, operand),

            ExprKind::Assign { target, value } => self.generate_assign(target, value),
            ExprKind::AssignRef { target, source } => {
                let var = self.generate_ref(source)?;
                let target = self.name(target);
                self.line(&format!("env.bind_var({target}, {var}.clone());"));
                Ok(self.bind(TempKind::Value, &format!("{var}.get()")))
            }

            ExprKind::UnsetVar(name) => {
                let name = self.name(name);
                self.line(&format!("env.remove_variable({name});"));
                Ok("Value::Null".to_owned())
            }
            ExprKind::UnsetArray { base, index } => self.generate_unset_element(base, index),
            ExprKind::UnsetField { base, field } => {
                let object = self.generate(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Value, &format!("{object}.remove_field({field})?")))
            }
            ExprKind::IssetVar(name) => {
                let name = self.name(name);
                Ok(self.bind(
                    TempKind::Value,
                    &format!("Value::Bool(env.isset_variable({name}))"),
                ))
            }
            ExprKind::IssetArray { base, index } => {
                let container = self.generate(base)?;
                let index = self.generate(index)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("Value::Bool({container}.isset_index(&{index}))"),
                ))
            }
            ExprKind::IssetField { base, field } => {
                let object = self.generate(base)?;
                let field = self.name(field);
                Ok(self.bind(
                    TempKind::Value,
                    &format!("Value::Bool({object}.isset_field({field}))"),
                ))
            }

            ExprKind::Call { name, args } => {
                let arena = self.arena;
                let callee = self.resolve_static(name);
                self.generate_call(&callee, arena.get_expr_list(args), false)
            }
            ExprKind::CallVar { name, args } => {
                let arena = self.arena;
                let callee = self.resolve_dynamic(name)?;
                self.generate_call(&callee, arena.get_expr_list(args), false)
            }
        }
    }

    /// The value with the internal missing-element marker turned into
    /// `Null`, as handed back to a host.
    pub fn generate_value(&mut self, id: ExprId) -> GenResult {
        let value = self.generate(id)?;
        Ok(self.bind(
            TempKind::Value,
            &format!("match {value} {{ Value::Unset => Value::Null, v => v }}"),
        ))
    }

    fn generate_array_literal(&mut self, entries: ember_ir::EntryRange) -> GenResult {
        let arena = self.arena;
        let list = arena.get_entries(entries);
        let array = self.emitter.declare_temp(TempKind::Array);
        let binding = if list.is_empty() { "let" } else { "let mut" };
        self.line(&format!("{binding} {array} = ArrayValue::new();"));
        for entry in list {
            match entry.key {
                Some(key) => {
                    let key = self.generate(key)?;
                    let key = self.bind(TempKind::Key, &format!("ArrayKey::from_value(&{key})?"));
                    let value = self.generate_copy(entry.value)?;
                    self.line(&format!("{array}.insert({key}, {value});"));
                }
                None => {
                    let value = self.generate_copy(entry.value)?;
                    self.line(&format!("{array}.push({value})?;"));
                }
            }
        }
        Ok(self.bind(TempKind::Value, &format!("Value::from_array({array})")))
    }
}

/// `i64` literal text.
pub(crate) fn long_literal(n: i64) -> String {
    if n == i64::MIN {
        "i64::MIN".to_owned()
    } else {
        n.to_string()
    }
}

/// `f64` literal text that parses back to the same bits.
pub(crate) fn double_literal(d: f64) -> String {
    if d.is_nan() {
        "f64::NAN".to_owned()
    } else if d == f64::INFINITY {
        "f64::INFINITY".to_owned()
    } else if d == f64::NEG_INFINITY {
        "f64::NEG_INFINITY".to_owned()
    } else {
        format!("{d:?}")
    }
}
