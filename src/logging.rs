// ── Logging backend ───────────────────────────────────────────────────────────
//
// The crate logs through the `log` facade; this module is the backend.
// Level comes from the `LANTERN_LOG` environment variable (`error`, `warn`,
// `info`, `debug`, `trace`, `off`); unset means `debug` in debug builds and
// `warn` in release builds.  Output goes to stderr — visible in debug builds,
// discarded by the GUI subsystem in release builds unless the user attaches
// a console.

use log::{LevelFilter, Log, Metadata, Record};

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[lantern] {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Install the logger.  Called once from `main` before anything can log;
/// a second call (e.g. from tests) is a no-op.
pub(crate) fn init() {
    let level = std::env::var("LANTERN_LOG")
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(default_level());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" TRACE "), Some(LevelFilter::Trace));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("verbose"), None);
    }
}
