//! Debug-only reentrancy check for the structural store.
//!
//! Lookups run user strategy code (`equals`, and `Eq` on stored keys) while
//! the store is mid-probe. If that code reaches back into the same store,
//! debug builds panic instead of observing a half-updated table. Release
//! builds compile the check away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-store busy flag. Guard each entry point with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // !Send + !Sync, matching the single-threaded map.
    _nosend: PhantomData<*mut ()>,
}

impl ReentrancyCheck {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _nosend: PhantomData,
        }
    }

    /// Mark the store busy until the returned guard drops.
    #[inline]
    pub fn enter(&self) -> BusyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant call into the comparator map store from strategy code"
            );
            BusyGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            BusyGuard { _z: PhantomData }
        }
    }
}

impl Default for ReentrancyCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `ReentrancyCheck::enter`.
pub struct BusyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for BusyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::ReentrancyCheck;

    #[test]
    fn sequential_entries_are_fine() {
        let r = ReentrancyCheck::new();
        {
            let _g = r.enter();
        }
        let _g = r.enter();
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let r = ReentrancyCheck::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter();
            let _inner = r.enter();
        }));
        assert!(res.is_err(), "expected nested entry to panic in debug builds");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let r = ReentrancyCheck::new();
        let _outer = r.enter();
        let _inner = r.enter();
    }
}
