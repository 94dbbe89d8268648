//! Stack growth for deeply nested expressions.
//!
//! Analysis, evaluation and code generation all recurse once per nesting
//! level of the tree. Each recursive entry point runs its body through
//! [`ensure_sufficient_stack`], which moves onto a freshly allocated stack
//! segment when less than the red zone remains.

/// Grow when less than this much stack remains (100 KiB).
pub const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1 MiB).
pub const GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: u32) -> u32 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    #[test]
    fn test_passes_result_through() {
        let result: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_survives_deep_nesting() {
        assert_eq!(nest(200_000), 200_000);
    }
}
