// ── Error type ────────────────────────────────────────────────────────────────
//
// Lantern degrades instead of failing wherever it can: a DPI query falls
// back to the 96-DPI baseline, a bad placement file is ignored, a failed
// snap repositioning is dropped.  What cannot degrade is bringing the shell
// up (window class, window, message pump) and writing the placement file;
// those two surfaces return `error::Result` and end in `main`'s fatal
// dialog or a warning log respectively.

use std::fmt;
use std::io;

#[derive(Debug)]
pub(crate) enum LanternError {
    /// A Win32 call failed while bringing up or pumping the window shell.
    Shell {
        /// The failing API, e.g. `"RegisterClassExW"`.
        api: &'static str,
        /// `GetLastError` value or HRESULT bits, shown to the user as-is.
        code: u32,
    },

    /// The window-placement file could not be written.
    Placement(io::Error),
}

impl LanternError {
    /// Wrap a `windows`-crate error from the named API.
    #[cfg(windows)]
    pub(crate) fn win32(api: &'static str, e: windows::core::Error) -> Self {
        Self::Shell {
            api,
            code: e.code().0 as u32,
        }
    }
}

impl fmt::Display for LanternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell { api, code } => {
                write!(f, "the window shell could not start: {api} returned {code:#010x}")
            }
            Self::Placement(e) => write!(f, "window placement was not saved: {e}"),
        }
    }
}

impl std::error::Error for LanternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placement(e) => Some(e),
            Self::Shell { .. } => None,
        }
    }
}

impl From<io::Error> for LanternError {
    fn from(e: io::Error) -> Self {
        Self::Placement(e)
    }
}

pub(crate) type Result<T> = std::result::Result<T, LanternError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_failures_name_the_api_and_code() {
        let e = LanternError::Shell {
            api: "RegisterClassExW",
            code: 0x8007_0057,
        };
        let text = e.to_string();
        assert!(text.contains("RegisterClassExW"));
        assert!(text.contains("0x80070057"));
    }

    #[test]
    fn placement_failures_keep_their_source() {
        use std::error::Error as _;
        let e = LanternError::from(io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"));
        assert!(e.to_string().contains("placement"));
        assert!(e.source().is_some());
    }
}
