//! Definedness lattice for variables.

use std::fmt;

/// What is statically known about whether a variable holds a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarState {
    /// Known to have been unset (or never assigned in a fresh scope).
    Unset,
    /// Known to be undefined at this point.
    Undefined,
    /// Known to hold a value.
    Valid,
    /// Nothing is known.
    Unknown,
}

impl VarState {
    /// Combine the states of two sub-expressions.
    ///
    /// The left operand is checked first, so the merge is not commutative:
    /// `Unset.merge(Undefined)` is `Unset`, `Undefined.merge(Unset)` is
    /// `Undefined`.
    #[must_use]
    pub fn merge(self, other: VarState) -> VarState {
        if matches!(self, VarState::Unset | VarState::Undefined) {
            return self;
        }
        if matches!(other, VarState::Unset | VarState::Undefined) {
            return other;
        }
        if self == VarState::Valid || other == VarState::Valid {
            return VarState::Valid;
        }
        VarState::Unknown
    }

    /// Whether a read of the variable certainly finds no value.
    pub fn is_unset(self) -> bool {
        matches!(self, VarState::Unset | VarState::Undefined)
    }
}

impl fmt::Display for VarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VarState::Unset => "UNSET",
            VarState::Undefined => "UNDEFINED",
            VarState::Valid => "VALID",
            VarState::Unknown => "UNKNOWN",
        })
    }
}
