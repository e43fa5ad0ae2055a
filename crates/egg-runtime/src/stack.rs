//! Stack growth for the recursive parser and evaluator
//!
//! Nesting depth and call depth are bounded separately; this only makes sure the native
//! stack never runs out before those bounds are reached, whatever thread the runtime is on.

/// Minimum stack space to keep available before recursing (128KB)
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB)
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if less than [`RED_ZONE`] remains
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: usize) -> usize {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn test_deep_recursion_on_small_thread() {
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| depth(100_000))
            .unwrap();
        assert_eq!(handle.join().unwrap(), 100_000);
    }
}
