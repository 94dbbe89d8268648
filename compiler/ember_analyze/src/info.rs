//! Flow state threaded through the analysis.

use ember_ir::Name;
use rustc_hash::FxHashMap;

use crate::VarState;

/// How names not yet seen in the unit are treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ScopeMode {
    /// Top-level script: the host may have populated globals, so unseen
    /// names are `Unknown`.
    #[default]
    Script,
    /// Fresh function scope: unseen names are `Unset`.
    Function,
}

/// Current `VarState` of every variable, updated left to right.
#[derive(Clone, Debug)]
pub struct AnalyzeInfo {
    mode: ScopeMode,
    states: FxHashMap<Name, VarState>,
    /// State of names with no entry in `states`.
    unseen: VarState,
}

impl Default for AnalyzeInfo {
    fn default() -> Self {
        AnalyzeInfo::new(ScopeMode::default())
    }
}

impl AnalyzeInfo {
    pub fn new(mode: ScopeMode) -> Self {
        AnalyzeInfo {
            mode,
            states: FxHashMap::default(),
            unseen: match mode {
                ScopeMode::Script => VarState::Unknown,
                ScopeMode::Function => VarState::Unset,
            },
        }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    pub fn get(&self, name: Name) -> VarState {
        self.states.get(&name).copied().unwrap_or(self.unseen)
    }

    pub fn set(&mut self, name: Name, state: VarState) {
        self.states.insert(name, state);
    }

    /// Forget everything: a callee receives the environment and may set or
    /// unset any variable, including ones this unit never mentions.
    pub fn clobber_all(&mut self) {
        self.states.clear();
        self.unseen = VarState::Unknown;
    }
}
