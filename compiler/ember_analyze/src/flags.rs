//! Per-variable usage flags.

use bitflags::bitflags;

bitflags! {
    /// How a variable is used across the analyzed unit.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct VarFlags: u8 {
        /// Read as a value.
        const READ = 1 << 0;
        /// Target of an assignment.
        const ASSIGNED = 1 << 1;
        /// Target of `unset`.
        const UNSET = 1 << 2;
        /// Bound by reference, or passed to a call that may take it by
        /// reference.
        const REFERENCED = 1 << 3;
        /// Autovivified or modified through `$v[..] = ..`.
        const ARRAY_MODIFIED = 1 << 4;
        /// Autovivified or modified through `$v->f = ..`.
        const OBJECT_MODIFIED = 1 << 5;
    }
}
