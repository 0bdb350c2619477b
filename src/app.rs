// ── Application state & dispatch ──────────────────────────────────────────────
//
// A single `App` is created on startup and driven by the platform shell's
// event pump.  All mutations happen on the main thread — the command/ticker
// registries are fields of an explicit `AppContext` rather than process
// globals, passed by reference to whatever needs to post or register.
//
// The one cross-thread mechanism is the release queue: worker threads hand
// objects back via a `ReleaseHandle` and the main loop drops them each pass.

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::command::{Command, CommandBus, Scope};
use crate::ticker::TickerRegistry;
use crate::window::{Size, Snap, Window, WindowId};

// ── Event modes ───────────────────────────────────────────────────────────────

/// How the pump waits for work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventMode {
    /// Block until an event arrives — the power-saving default.
    WaitForNewEvents,
    /// Drain already-posted events without blocking — used while an
    /// animation or drag is in progress.
    PostedEventsOnly,
}

// ── Cross-thread release queue ────────────────────────────────────────────────

type ReleaseQueue = Arc<Mutex<Vec<Box<dyn Any + Send>>>>;

/// Cloneable handle a worker thread uses to send an object back to the main
/// thread for destruction.  The object is dropped on the next pump pass.
#[derive(Clone)]
pub(crate) struct ReleaseHandle {
    queue: ReleaseQueue,
}

impl ReleaseHandle {
    pub(crate) fn release(&self, object: Box<dyn Any + Send>) {
        // A poisoned lock means a worker panicked mid-push; the objects in
        // the queue are still droppable, so keep going.
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).push(object);
    }
}

// ── AppContext ────────────────────────────────────────────────────────────────

/// The services subsystems need from the application: command posting,
/// ticker registration, refresh timing, cross-thread release.
pub(crate) struct AppContext {
    pub(crate) bus: CommandBus,
    pub(crate) tickers: TickerRegistry,
    last_ticker_at: Instant,
    released: ReleaseQueue,
}

impl AppContext {
    pub(crate) fn new() -> Self {
        Self {
            bus: CommandBus::new(),
            tickers: TickerRegistry::new(),
            last_ticker_at: Instant::now(),
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run one ticker cycle: every entry registered before the cycle began,
    /// in registration order, skipping entries removed mid-cycle.
    pub(crate) fn run_tickers(&mut self) {
        let snapshot = self.tickers.begin_cycle();
        for entry in &snapshot {
            if self.tickers.is_suppressed(entry) {
                continue;
            }
            (entry.func)(self, entry.token);
        }
        self.tickers.end_cycle(snapshot);
        self.last_ticker_at = Instant::now();
    }

    /// Time since the last ticker cycle, for frame-rate-independent motion.
    pub(crate) fn elapsed_since_last_ticker(&self) -> Duration {
        self.last_ticker_at.elapsed()
    }

    /// Handle for worker threads; see `ReleaseHandle`.
    pub(crate) fn release_handle(&self) -> ReleaseHandle {
        ReleaseHandle {
            queue: Arc::clone(&self.released),
        }
    }

    /// Drop every object worker threads handed back since the last pass.
    /// Returns how many were released.
    pub(crate) fn drain_released(&mut self) -> usize {
        let objects: Vec<_> = std::mem::take(
            &mut *self.released.lock().unwrap_or_else(|e| e.into_inner()),
        );
        objects.len()
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state: the context plus the window list.
///
/// The platform shell owns the OS handles and calls into `App` from its
/// event pump; everything here is host-independent.
pub(crate) struct App {
    pub(crate) ctx: AppContext,
    windows: Vec<Window>,
    active: Option<WindowId>,
    next_window_id: u32,
    running: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            ctx: AppContext::new(),
            windows: Vec::new(),
            active: None,
            next_window_id: 1,
            running: true,
        }
    }

    // ── Window registry ──────────────────────────────────────────────────────

    pub(crate) fn create_window(&mut self, size: Size) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push(Window::new(id, size));
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    /// Remove a window and everything scoped to it.  Quits once the last
    /// window is gone.
    pub(crate) fn close_window(&mut self, id: WindowId) {
        self.windows.retain(|w| w.id() != id);
        self.ctx.tickers.remove_scope(id);
        if self.active == Some(id) {
            self.active = self.windows.first().map(Window::id);
        }
        if self.windows.is_empty() {
            self.running = false;
        }
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    pub(crate) fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    /// Borrow a window and the context at the same time (disjoint fields);
    /// needed when feeding both into an interceptor.
    pub(crate) fn window_with_ctx(
        &mut self,
        id: WindowId,
    ) -> Option<(&mut Window, &mut AppContext)> {
        let window = self.windows.iter_mut().find(|w| w.id() == id)?;
        Some((window, &mut self.ctx))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    // ── Command dispatch ─────────────────────────────────────────────────────

    /// Dispatch the batch of commands queued up to this point.  Commands
    /// posted from inside a handler stay on the bus for the next pass —
    /// dispatch is never re-entrant.  Returns how many commands were handled.
    pub(crate) fn dispatch_commands(&mut self) -> usize {
        let batch = self.ctx.bus.take_pending();
        let mut handled = 0;
        for cmd in &batch {
            if self.handle_command(cmd) {
                handled += 1;
            } else {
                log::debug!("unhandled command: {:?}", cmd.text());
            }
        }
        handled
    }

    fn handle_command(&mut self, cmd: &Command) -> bool {
        match cmd.scope() {
            // Scoped commands go only to their window; app-level verbs are
            // never a fallback for them.
            Scope::Window(id) => self
                .window_mut(id)
                .map_or(false, |window| Self::handle_window_command(window, cmd)),
            // Global commands try the active window first, then app verbs.
            Scope::Global => {
                if let Some(id) = self.active {
                    if let Some(window) = self.window_mut(id) {
                        if Self::handle_window_command(window, cmd) {
                            return true;
                        }
                    }
                }
                match cmd.verb() {
                    "quit" => {
                        self.running = false;
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn handle_window_command(window: &mut Window, cmd: &Command) -> bool {
        match cmd.verb() {
            "window.maximize" => {
                let snap = if cmd.flag("toggle") && window.snap() == Snap::Maximized {
                    Snap::Unsnapped
                } else {
                    Snap::Maximized
                };
                window.set_snap(snap);
                true
            }
            "window.restore" => {
                window.set_snap(Snap::Unsnapped);
                true
            }
            "window.minimize" => {
                window.request_minimize();
                true
            }
            _ => false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_window() -> (App, WindowId) {
        let mut app = App::new();
        let id = app.create_window(Size { width: 800, height: 600 });
        (app, id)
    }

    // ── Command dispatch ─────────────────────────────────────────────────────

    #[test]
    fn maximize_toggle_cycles() {
        let (mut app, id) = app_with_window();
        app.ctx.bus.post("window.maximize toggle:1");
        app.dispatch_commands();
        assert_eq!(app.window(id).unwrap().snap(), Snap::Maximized);

        app.ctx.bus.post("window.maximize toggle:1");
        app.dispatch_commands();
        assert_eq!(app.window(id).unwrap().snap(), Snap::Unsnapped);
    }

    #[test]
    fn maximize_without_toggle_always_maximizes() {
        let (mut app, id) = app_with_window();
        app.ctx.bus.post("window.maximize");
        app.dispatch_commands();
        app.ctx.bus.post("window.maximize");
        app.dispatch_commands();
        assert_eq!(app.window(id).unwrap().snap(), Snap::Maximized);
    }

    #[test]
    fn restore_unsnaps() {
        let (mut app, id) = app_with_window();
        app.window_mut(id).unwrap().set_snap(Snap::LeftTop);
        app.ctx.bus.post("window.restore");
        app.dispatch_commands();
        assert_eq!(app.window(id).unwrap().snap(), Snap::Unsnapped);
    }

    #[test]
    fn minimize_requests_without_touching_snap() {
        let (mut app, id) = app_with_window();
        app.window_mut(id).unwrap().set_snap(Snap::Right);
        app.ctx.bus.post("window.minimize");
        app.dispatch_commands();
        let w = app.window_mut(id).unwrap();
        assert!(w.take_minimize_requested());
        assert_eq!(w.snap(), Snap::Right);
    }

    #[test]
    fn scoped_command_targets_named_window() {
        let (mut app, first) = app_with_window();
        let second = app.create_window(Size { width: 400, height: 300 });
        app.ctx
            .bus
            .post_to(Scope::Window(second), "window.maximize");
        app.dispatch_commands();
        assert_eq!(app.window(first).unwrap().snap(), Snap::Unsnapped);
        assert_eq!(app.window(second).unwrap().snap(), Snap::Maximized);
    }

    #[test]
    fn scoped_command_never_reaches_app_verbs() {
        // `quit` addressed to one window must not shut down the application;
        // only a global `quit` carries that meaning.
        let (mut app, id) = app_with_window();
        app.ctx.bus.post_to(Scope::Window(id), "quit");
        assert_eq!(app.dispatch_commands(), 0);
        assert!(app.is_running());
    }

    #[test]
    fn quit_stops_the_app() {
        let (mut app, _) = app_with_window();
        assert!(app.is_running());
        app.ctx.bus.post("quit");
        app.dispatch_commands();
        assert!(!app.is_running());
    }

    #[test]
    fn unhandled_commands_are_counted_out() {
        let (mut app, _) = app_with_window();
        app.ctx.bus.post("document.reload");
        assert_eq!(app.dispatch_commands(), 0);
    }

    #[test]
    fn closing_last_window_quits() {
        let (mut app, id) = app_with_window();
        app.close_window(id);
        assert!(!app.is_running());
    }

    // ── Ticker cycles ────────────────────────────────────────────────────────
    //
    // Tickers observe their invocations by posting marker commands; the bus
    // doubles as the recorder.

    fn mark(ctx: &mut AppContext, token: u64) {
        ctx.bus.post(format!("tick id:{token}"));
    }

    fn mark_once(ctx: &mut AppContext, token: u64) {
        ctx.bus.post(format!("once id:{token}"));
        ctx.tickers.remove(mark_once, token);
    }

    fn remove_peer(ctx: &mut AppContext, token: u64) {
        ctx.tickers.remove(mark, token);
    }

    fn posted(ctx: &mut AppContext) -> Vec<String> {
        ctx.bus
            .take_pending()
            .into_iter()
            .map(|c| c.text().to_owned())
            .collect()
    }

    #[test]
    fn tickers_run_in_registration_order() {
        let mut ctx = AppContext::new();
        ctx.tickers.add(mark, 1);
        ctx.tickers.add(mark, 2);
        ctx.run_tickers();
        assert_eq!(posted(&mut ctx), vec!["tick id:1", "tick id:2"]);
    }

    #[test]
    fn self_removing_ticker_runs_exactly_once() {
        let mut ctx = AppContext::new();
        ctx.tickers.add(mark_once, 1);
        ctx.run_tickers();
        ctx.run_tickers();
        assert_eq!(posted(&mut ctx), vec!["once id:1"]);
        assert!(ctx.tickers.is_empty());
    }

    #[test]
    fn ticker_removed_mid_cycle_is_not_invoked() {
        let mut ctx = AppContext::new();
        // remove_peer runs first and removes `mark` before its turn.
        ctx.tickers.add(remove_peer, 5);
        ctx.tickers.add(mark, 5);
        ctx.run_tickers();
        ctx.run_tickers();
        assert!(posted(&mut ctx).is_empty());
    }

    #[test]
    fn ticker_added_mid_cycle_runs_next_cycle() {
        fn adder(ctx: &mut AppContext, _: u64) {
            ctx.tickers.add(mark, 9);
        }
        let mut ctx = AppContext::new();
        ctx.tickers.add(adder, 0);
        ctx.run_tickers();
        // `mark` was registered mid-cycle: nothing posted yet.
        assert!(posted(&mut ctx).is_empty());
        ctx.run_tickers();
        assert_eq!(posted(&mut ctx), vec!["tick id:9"]);
    }

    #[test]
    fn elapsed_resets_after_cycle() {
        let mut ctx = AppContext::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(ctx.elapsed_since_last_ticker() >= Duration::from_millis(5));
        ctx.run_tickers();
        assert!(ctx.elapsed_since_last_ticker() < Duration::from_millis(5));
    }

    // ── Release queue ────────────────────────────────────────────────────────

    #[test]
    fn worker_objects_are_dropped_on_drain() {
        struct Tracked(Arc<Mutex<bool>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                *self.0.lock().unwrap() = true;
            }
        }

        let mut ctx = AppContext::new();
        let dropped = Arc::new(Mutex::new(false));
        let handle = ctx.release_handle();
        let flag = Arc::clone(&dropped);
        std::thread::spawn(move || {
            handle.release(Box::new(Tracked(flag)));
        })
        .join()
        .unwrap();

        assert!(!*dropped.lock().unwrap());
        assert_eq!(ctx.drain_released(), 1);
        assert!(*dropped.lock().unwrap());
    }
}
