// ── Ticker registry ───────────────────────────────────────────────────────────
//
// Components that need per-frame work (smooth scrolling, cursor blink,
// animations) register a ticker instead of owning a private timer.  Tickers
// run once per refresh cycle in registration order; see
// `AppContext::run_tickers` for the cycle driver.
//
// Removal is identity-based: an entry is matched by (function, token), the
// token being an opaque context value chosen by the registrant.  Removal is
// legal at any time, including from inside a running ticker; a removed entry
// is never invoked again, and removing never disturbs iteration of the
// remaining entries (the cycle runs over a snapshot and consults the
// suppression lists before each call).

use crate::app::AppContext;
use crate::window::WindowId;

/// A per-frame callback.  The token is the value passed to `add`.
pub(crate) type TickerFn = fn(&mut AppContext, u64);

/// One registered ticker.
#[derive(Clone, Copy)]
pub(crate) struct TickerEntry {
    pub(crate) func: TickerFn,
    pub(crate) token: u64,
    /// Owning window, if any; `remove_scope` drops these when it closes.
    pub(crate) scope: Option<WindowId>,
}

impl TickerEntry {
    fn matches(&self, func: TickerFn, token: u64) -> bool {
        self.func == func && self.token == token
    }
}

/// Registry of active tickers, owned by the `AppContext`.
#[derive(Default)]
pub(crate) struct TickerRegistry {
    entries: Vec<TickerEntry>,
    /// (function, token) pairs removed while a cycle is running; consulted to
    /// suppress snapshot entries that have not run yet.
    removed_in_cycle: Vec<(TickerFn, u64)>,
    /// Scopes removed while a cycle is running.
    removed_scopes: Vec<WindowId>,
    in_cycle: bool,
}

impl TickerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register an unscoped ticker.  Duplicate (function, token) pairs are
    /// collapsed: re-adding an already-registered ticker is a no-op, so a
    /// component may call `add` every time it needs another frame.
    pub(crate) fn add(&mut self, func: TickerFn, token: u64) {
        self.add_scoped(func, token, None);
    }

    /// Register a ticker owned by a window; removed when the window closes.
    pub(crate) fn add_scoped(&mut self, func: TickerFn, token: u64, scope: Option<WindowId>) {
        if self.entries.iter().any(|e| e.matches(func, token)) {
            return;
        }
        self.entries.push(TickerEntry { func, token, scope });
    }

    /// Remove the ticker matching (function, token).  Safe to call from
    /// inside a running ticker, including self-removal.
    pub(crate) fn remove(&mut self, func: TickerFn, token: u64) {
        self.entries.retain(|e| !e.matches(func, token));
        if self.in_cycle {
            self.removed_in_cycle.push((func, token));
        }
    }

    /// Remove every ticker owned by `scope` (window closing).
    pub(crate) fn remove_scope(&mut self, scope: WindowId) {
        self.entries.retain(|e| e.scope != Some(scope));
        if self.in_cycle {
            self.removed_scopes.push(scope);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    // ── Cycle protocol (used by AppContext::run_tickers) ─────────────────────

    /// Start a cycle: take a snapshot of the current entries.  Entries added
    /// while the cycle runs accumulate in `entries` and first run next cycle.
    pub(crate) fn begin_cycle(&mut self) -> Vec<TickerEntry> {
        self.in_cycle = true;
        std::mem::take(&mut self.entries)
    }

    /// Whether a snapshot entry was removed after the cycle began.
    pub(crate) fn is_suppressed(&self, e: &TickerEntry) -> bool {
        self.removed_in_cycle
            .iter()
            .any(|&(f, t)| e.matches(f, t))
            || e.scope.is_some_and(|s| self.removed_scopes.contains(&s))
    }

    /// Finish a cycle: surviving snapshot entries keep their order, followed
    /// by anything registered during the cycle.
    pub(crate) fn end_cycle(&mut self, snapshot: Vec<TickerEntry>) {
        let added = std::mem::take(&mut self.entries);
        let survivors: Vec<TickerEntry> = snapshot
            .into_iter()
            .filter(|e| !self.is_suppressed(e))
            .collect();
        self.entries = survivors;
        // A ticker re-added during the cycle after being removed must win.
        for e in added {
            self.add_scoped(e.func, e.token, e.scope);
        }
        self.removed_in_cycle.clear();
        self.removed_scopes.clear();
        self.in_cycle = false;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Full run-cycle behavior (self-removal, removal of a later entry) is tested
// through `AppContext::run_tickers` in `app.rs`; these cover the registry's
// own bookkeeping.

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut AppContext, _: u64) {}
    fn noop2(_: &mut AppContext, _: u64) {}

    #[test]
    fn add_and_remove_by_identity() {
        let mut reg = TickerRegistry::new();
        reg.add(noop, 1);
        reg.add(noop, 2);
        reg.add(noop2, 1);
        assert_eq!(reg.len(), 3);
        reg.remove(noop, 1);
        assert_eq!(reg.len(), 2);
        // Only the exact (function, token) pair was removed.
        reg.remove(noop, 1);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_add_is_noop() {
        let mut reg = TickerRegistry::new();
        reg.add(noop, 7);
        reg.add(noop, 7);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_scope_drops_owned_entries() {
        let mut reg = TickerRegistry::new();
        reg.add_scoped(noop, 1, Some(WindowId(1)));
        reg.add_scoped(noop, 2, Some(WindowId(2)));
        reg.add(noop2, 3);
        reg.remove_scope(WindowId(1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn removal_during_cycle_suppresses_snapshot_entry() {
        let mut reg = TickerRegistry::new();
        reg.add(noop, 1);
        reg.add(noop2, 2);
        let snapshot = reg.begin_cycle();
        reg.remove(noop2, 2);
        assert!(!reg.is_suppressed(&snapshot[0]));
        assert!(reg.is_suppressed(&snapshot[1]));
        reg.end_cycle(snapshot);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn additions_during_cycle_survive() {
        let mut reg = TickerRegistry::new();
        reg.add(noop, 1);
        let snapshot = reg.begin_cycle();
        reg.add(noop2, 9);
        reg.end_cycle(snapshot);
        assert_eq!(reg.len(), 2);
    }
}
