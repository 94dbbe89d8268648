//! Ember static analysis.
//!
//! One pass over a unit computes, per node, a static type hint and, per
//! variable read, its definedness (`VarState`). Both backends consume the
//! results; only the compiler specializes on them.

mod analyzer;
mod flags;
mod fold;
mod hint;
mod info;
mod var_state;

pub use analyzer::{analyze, binary_hint, Analysis, Analyzer};
pub use flags::VarFlags;
pub use fold::{combine_binary_var_state, fold_children, is_var_assigned, var_state};
pub use hint::StaticType;
pub use info::{AnalyzeInfo, ScopeMode};
pub use var_state::VarState;
