// ── Command bus ───────────────────────────────────────────────────────────────
//
// Text commands are the seam between event sources (the native interceptor,
// UI widgets) and consumers (window logic, collaborators).  Format:
//
//     verb[.subverb] [key:value ...]
//
// e.g. `window.maximize toggle:1`.  Posting never dispatches inline; commands
// queue on the bus until the next event-loop pass, so a handler that posts
// from within dispatch can never re-enter itself.

use std::collections::VecDeque;
use std::fmt;

use crate::window::WindowId;

// ── Scope ─────────────────────────────────────────────────────────────────────

/// Delivery target of a posted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Routed to the active window, then to app-level verbs.
    Global,
    /// Routed only to the named window.
    Window(WindowId),
}

// ── Command ───────────────────────────────────────────────────────────────────

/// An immutable posted command.  Consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    text: String,
    scope: Scope,
}

impl Command {
    pub(crate) fn new(text: impl Into<String>, scope: Scope) -> Self {
        Self {
            text: text.into(),
            scope,
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn scope(&self) -> Scope {
        self.scope
    }

    /// The leading verb, e.g. `"window.maximize"`.
    pub(crate) fn verb(&self) -> &str {
        self.text.split_ascii_whitespace().next().unwrap_or("")
    }

    /// The value of a `key:value` token, if present.
    pub(crate) fn arg(&self, key: &str) -> Option<&str> {
        self.text.split_ascii_whitespace().skip(1).find_map(|tok| {
            let (k, v) = tok.split_once(':')?;
            (k == key).then_some(v)
        })
    }

    /// The value of a `key:value` token parsed as an integer.
    pub(crate) fn int_arg(&self, key: &str) -> Option<i64> {
        self.arg(key)?.parse().ok()
    }

    /// `true` when `key:<nonzero>` is present.
    pub(crate) fn flag(&self, key: &str) -> bool {
        self.int_arg(key).unwrap_or(0) != 0
    }
}

// ── Bus ───────────────────────────────────────────────────────────────────────

/// Process-wide command queue, owned by the `AppContext` (no hidden globals).
///
/// Single FIFO queue: global ordering implies per-scope ordering.
#[derive(Debug, Default)]
pub(crate) struct CommandBus {
    queue: VecDeque<Command>,
}

impl CommandBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Post an unscoped command.
    pub(crate) fn post(&mut self, text: impl Into<String>) {
        self.post_to(Scope::Global, text);
    }

    /// Post a command scoped to one window.
    pub(crate) fn post_to(&mut self, scope: Scope, text: impl Into<String>) {
        let cmd = Command::new(text, scope);
        log::debug!("post: {:?} {:?}", cmd.scope(), cmd.text());
        self.queue.push_back(cmd);
    }

    /// Post a pre-formatted command; used by the `postf!` macro.
    pub(crate) fn post_format(&mut self, scope: Scope, args: fmt::Arguments<'_>) {
        self.post_to(scope, args.to_string());
    }

    /// Take the currently queued batch.  Commands posted while the batch is
    /// being handled land on the (now empty) queue for the next pass.
    pub(crate) fn take_pending(&mut self) -> VecDeque<Command> {
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Post a printf-style command: `postf!(bus, "window.{} toggle:{}", verb, 1)`.
///
/// An optional leading `scope =>` routes to one window:
/// `postf!(bus, scope => "window.restore")`.
macro_rules! postf {
    ($bus:expr, $scope:expr => $($arg:tt)*) => {
        $bus.post_format($scope, format_args!($($arg)*))
    };
    ($bus:expr, $($arg:tt)*) => {
        $bus.post_format($crate::command::Scope::Global, format_args!($($arg)*))
    };
}
pub(crate) use postf;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_is_first_token() {
        let cmd = Command::new("window.maximize toggle:1", Scope::Global);
        assert_eq!(cmd.verb(), "window.maximize");
    }

    #[test]
    fn args_parse_key_value_tokens() {
        let cmd = Command::new("tab.open url:about newtab:1 index:3", Scope::Global);
        assert_eq!(cmd.arg("url"), Some("about"));
        assert_eq!(cmd.int_arg("index"), Some(3));
        assert!(cmd.flag("newtab"));
        assert!(!cmd.flag("background"));
        assert_eq!(cmd.arg("missing"), None);
    }

    #[test]
    fn empty_command_has_empty_verb() {
        assert_eq!(Command::new("", Scope::Global).verb(), "");
    }

    #[test]
    fn fifo_order_preserved() {
        let mut bus = CommandBus::new();
        bus.post("first");
        bus.post_to(Scope::Window(WindowId(2)), "second");
        bus.post("third");
        let batch: Vec<_> = bus.take_pending().into_iter().collect();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].text(), "first");
        assert_eq!(batch[1].text(), "second");
        assert_eq!(batch[1].scope(), Scope::Window(WindowId(2)));
        assert_eq!(batch[2].text(), "third");
    }

    #[test]
    fn take_pending_leaves_queue_empty() {
        let mut bus = CommandBus::new();
        bus.post("a");
        let _ = bus.take_pending();
        assert!(bus.is_empty());
    }

    #[test]
    fn postf_formats_arguments() {
        let mut bus = CommandBus::new();
        postf!(bus, "window.{} toggle:{}", "maximize", 1);
        postf!(bus, Scope::Window(WindowId(7)) => "window.restore");
        let batch: Vec<_> = bus.take_pending().into_iter().collect();
        assert_eq!(batch[0].text(), "window.maximize toggle:1");
        assert_eq!(batch[0].scope(), Scope::Global);
        assert_eq!(batch[1].scope(), Scope::Window(WindowId(7)));
    }
}
