//! Single-pass analysis of a unit.
//!
//! Walks every statement once, in evaluation order, threading an
//! `AnalyzeInfo` through the tree. For each node it records the static type
//! hint; for each variable read it records the `VarState` at that point.
//! The results are immutable side tables indexed by `ExprId`.

use ember_ir::{BinaryOp, ExprArena, ExprId, ExprKind, ExprRange, Name, Statement, UnaryOp};
use ember_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::{AnalyzeInfo, ScopeMode, StaticType, VarFlags, VarState};

/// Per-node analysis result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct NodeInfo {
    analyzed: bool,
    hint: Option<StaticType>,
    var_state: Option<VarState>,
}

/// Results of analyzing one unit.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    mode: ScopeMode,
    nodes: Vec<NodeInfo>,
    vars: FxHashMap<Name, VarFlags>,
}

impl Analysis {
    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Whether `id` was reached by the analysis.
    pub fn is_analyzed(&self, id: ExprId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.analyzed)
    }

    /// Static type hint of `id`; `None` when only known at run time.
    pub fn hint(&self, id: ExprId) -> Option<StaticType> {
        self.nodes.get(id.index()).and_then(|n| n.hint)
    }

    /// `VarState` of a variable read at `id`, if `id` is a read.
    pub fn var_state_at(&self, id: ExprId) -> Option<VarState> {
        self.nodes.get(id.index()).and_then(|n| n.var_state)
    }

    /// Usage flags of `name` (empty if never mentioned).
    pub fn var_flags(&self, name: Name) -> VarFlags {
        self.vars.get(&name).copied().unwrap_or_default()
    }

    /// Every variable mentioned by the unit.
    pub fn vars(&self) -> impl Iterator<Item = (Name, VarFlags)> + '_ {
        self.vars.iter().map(|(&name, &flags)| (name, flags))
    }
}

/// Analyze `statements` in order.
#[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
pub fn analyze(arena: &ExprArena, statements: &[Statement], mode: ScopeMode) -> Analysis {
    let mut analyzer = Analyzer::new(arena, mode);
    for statement in statements {
        analyzer.analyze_expr(statement.expr);
    }
    let analysis = analyzer.finish();
    tracing::debug!(
        nodes = analysis.nodes.iter().filter(|n| n.analyzed).count(),
        vars = analysis.vars.len(),
        "analysis complete"
    );
    analysis
}

/// Walks expressions and fills the side tables.
pub struct Analyzer<'a> {
    arena: &'a ExprArena,
    info: AnalyzeInfo,
    nodes: Vec<NodeInfo>,
    vars: FxHashMap<Name, VarFlags>,
}

impl<'a> Analyzer<'a> {
    pub fn new(arena: &'a ExprArena, mode: ScopeMode) -> Self {
        Analyzer {
            arena,
            info: AnalyzeInfo::new(mode),
            nodes: vec![NodeInfo::default(); arena.len()],
            vars: FxHashMap::default(),
        }
    }

    pub fn info(&self) -> &AnalyzeInfo {
        &self.info
    }

    pub fn finish(self) -> Analysis {
        Analysis {
            mode: self.info.mode(),
            nodes: self.nodes,
            vars: self.vars,
        }
    }

    fn record(&mut self, id: ExprId, hint: Option<StaticType>) -> Option<StaticType> {
        let node = &mut self.nodes[id.index()];
        node.analyzed = true;
        node.hint = hint;
        hint
    }

    fn flag(&mut self, name: Name, flags: VarFlags) {
        *self.vars.entry(name).or_default() |= flags;
    }

    /// Record a read of `name` at `id`.
    fn read_var(&mut self, id: ExprId, name: Name) {
        self.nodes[id.index()].var_state = Some(self.info.get(name));
        self.flag(name, VarFlags::READ);
        self.record(id, None);
    }

    /// Analyze `id` as a value, returning its hint.
    pub fn analyze_expr(&mut self, id: ExprId) -> Option<StaticType> {
        ensure_sufficient_stack(|| self.analyze_kind(id))
    }

    fn analyze_kind(&mut self, id: ExprId) -> Option<StaticType> {
        let arena = self.arena;
        let hint = match arena.kind(id) {
            ExprKind::Null => None,
            ExprKind::Bool(_) => Some(StaticType::Boolean),
            ExprKind::Long(_) => Some(StaticType::Long),
            ExprKind::Double(_) => Some(StaticType::Double),
            ExprKind::String(_) => Some(StaticType::String),
            ExprKind::Var(name) => {
                self.read_var(id, name);
                None
            }
            ExprKind::ArrayGet { base, index } => {
                self.analyze_expr(base);
                self.analyze_expr(index);
                None
            }
            ExprKind::ArrayTail { base } | ExprKind::FieldGet { base, .. } => {
                self.analyze_expr(base);
                None
            }
            ExprKind::ArrayLiteral { entries } => {
                for entry in arena.get_entries(entries) {
                    if let Some(key) = entry.key {
                        self.analyze_expr(key);
                    }
                    self.analyze_expr(entry.value);
                }
                None
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.analyze_expr(operand);
                match op {
                    UnaryOp::Not => Some(StaticType::Boolean),
                    UnaryOp::Neg => operand.filter(|&t| t == StaticType::Double),
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.analyze_expr(left);
                let right = self.analyze_expr(right);
                binary_hint(op, left, right)
            }
            ExprKind::Cast { ty, operand } => {
                self.analyze_expr(operand);
                Some(StaticType::of_cast(ty))
            }
            ExprKind::Assign { target, value } => self.analyze_assign(target, value),
            ExprKind::AssignRef { target, source } => {
                self.analyze_ref(source);
                self.info.set(target, VarState::Valid);
                self.flag(target, VarFlags::ASSIGNED | VarFlags::REFERENCED);
                None
            }
            ExprKind::UnsetVar(name) => {
                self.info.set(name, VarState::Unset);
                self.flag(name, VarFlags::UNSET);
                None
            }
            ExprKind::UnsetArray { base, index } => {
                self.analyze_expr(base);
                self.analyze_expr(index);
                self.flag_root(base, VarFlags::ARRAY_MODIFIED);
                None
            }
            ExprKind::UnsetField { base, .. } => {
                self.analyze_expr(base);
                self.flag_root(base, VarFlags::OBJECT_MODIFIED);
                None
            }
            ExprKind::IssetVar(name) => {
                self.flag(name, VarFlags::READ);
                Some(StaticType::Boolean)
            }
            ExprKind::IssetArray { base, index } => {
                self.analyze_expr(base);
                self.analyze_expr(index);
                Some(StaticType::Boolean)
            }
            ExprKind::IssetField { base, .. } => {
                self.analyze_expr(base);
                Some(StaticType::Boolean)
            }
            ExprKind::Call { args, .. } => {
                self.analyze_args(args);
                self.info.clobber_all();
                None
            }
            ExprKind::CallVar { name, args } => {
                self.analyze_expr(name);
                self.analyze_args(args);
                self.info.clobber_all();
                None
            }
        };
        self.record(id, hint)
    }

    /// `target = value`, in evaluation order: container path, then value.
    fn analyze_assign(&mut self, target: ExprId, value: ExprId) -> Option<StaticType> {
        match self.arena.kind(target) {
            ExprKind::Var(name) => {
                let hint = self.analyze_expr(value);
                self.record(target, None);
                self.info.set(name, VarState::Valid);
                self.flag(name, VarFlags::ASSIGNED);
                hint
            }
            ExprKind::ArrayGet { base, index } => {
                self.analyze_array_base(base);
                self.analyze_expr(index);
                self.record(target, None);
                self.analyze_expr(value)
            }
            ExprKind::ArrayTail { base } => {
                self.analyze_array_base(base);
                self.record(target, None);
                self.analyze_expr(value)
            }
            ExprKind::FieldGet { base, .. } => {
                self.analyze_object_base(base);
                self.record(target, None);
                self.analyze_expr(value)
            }
            // Rejected by the builder; analyze as a plain read so later
            // passes report the role error at this node.
            _ => {
                self.analyze_expr(target);
                self.analyze_expr(value)
            }
        }
    }

    /// Container evaluated in array-autovivifying context.
    fn analyze_array_base(&mut self, base: ExprId) {
        ensure_sufficient_stack(|| match self.arena.kind(base) {
            ExprKind::Var(name) => self.vivify_var(base, name, VarFlags::ARRAY_MODIFIED),
            ExprKind::ArrayGet { base: inner, index } => {
                self.analyze_array_base(inner);
                self.analyze_expr(index);
                self.record(base, None);
            }
            ExprKind::ArrayTail { base: inner } => {
                self.analyze_array_base(inner);
                self.record(base, None);
            }
            ExprKind::FieldGet { base: inner, .. } => {
                self.analyze_object_base(inner);
                self.record(base, None);
            }
            _ => {
                self.analyze_expr(base);
            }
        });
    }

    /// Container evaluated in object-autovivifying context.
    fn analyze_object_base(&mut self, base: ExprId) {
        ensure_sufficient_stack(|| match self.arena.kind(base) {
            ExprKind::Var(name) => self.vivify_var(base, name, VarFlags::OBJECT_MODIFIED),
            ExprKind::ArrayGet { base: inner, index } => {
                self.analyze_array_base(inner);
                self.analyze_expr(index);
                self.record(base, None);
            }
            ExprKind::ArrayTail { base: inner } => {
                self.analyze_array_base(inner);
                self.record(base, None);
            }
            ExprKind::FieldGet { base: inner, .. } => {
                self.analyze_object_base(inner);
                self.record(base, None);
            }
            _ => {
                self.analyze_expr(base);
            }
        });
    }

    fn vivify_var(&mut self, id: ExprId, name: Name, flags: VarFlags) {
        self.nodes[id.index()].var_state = Some(self.info.get(name));
        self.record(id, None);
        self.flag(name, VarFlags::READ | flags);
        self.info.set(name, VarState::Valid);
    }

    /// Source of `$x = &source`.
    fn analyze_ref(&mut self, source: ExprId) {
        match self.arena.kind(source) {
            ExprKind::Var(name) => {
                self.nodes[source.index()].var_state = Some(self.info.get(name));
                self.record(source, None);
                self.flag(name, VarFlags::REFERENCED);
                self.info.set(name, VarState::Valid);
            }
            ExprKind::ArrayGet { .. } | ExprKind::FieldGet { .. } => {
                self.analyze_expr(source);
                self.flag_root(source, VarFlags::REFERENCED);
            }
            _ => {
                self.analyze_expr(source);
            }
        }
    }

    /// Call arguments, left to right. Storage arguments may be taken by
    /// reference, which is only known at run time.
    fn analyze_args(&mut self, args: ExprRange) {
        let arena = self.arena;
        for &arg in arena.get_expr_list(args) {
            match arena.kind(arg) {
                ExprKind::Var(name) => {
                    self.read_var(arg, name);
                    self.flag(name, VarFlags::REFERENCED);
                    self.info.set(name, VarState::Valid);
                }
                ExprKind::ArrayGet { .. } | ExprKind::FieldGet { .. } => {
                    self.analyze_expr(arg);
                    self.flag_root(arg, VarFlags::REFERENCED);
                }
                _ => {
                    self.analyze_expr(arg);
                }
            }
        }
    }

    /// Flag the variable at the root of a storage path.
    fn flag_root(&mut self, id: ExprId, flags: VarFlags) {
        let mut current = id;
        loop {
            match self.arena.kind(current) {
                ExprKind::Var(name) => {
                    self.flag(name, flags);
                    return;
                }
                ExprKind::ArrayGet { base, .. }
                | ExprKind::ArrayTail { base }
                | ExprKind::FieldGet { base, .. } => current = base,
                _ => return,
            }
        }
    }
}

/// Hint of a binary node from its operand hints.
pub fn binary_hint(
    op: BinaryOp,
    left: Option<StaticType>,
    right: Option<StaticType>,
) -> Option<StaticType> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
            if StaticType::is_double(left) || StaticType::is_double(right) {
                Some(StaticType::Double)
            } else {
                None
            }
        }
        BinaryOp::Div => Some(StaticType::Double),
        BinaryOp::Mod => Some(StaticType::Long),
        BinaryOp::Concat => Some(StaticType::String),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => Some(StaticType::Boolean),
    }
}
