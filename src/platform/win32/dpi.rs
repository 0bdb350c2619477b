// ── Per-monitor DPI ───────────────────────────────────────────────────────────
//
// The emulated frame is hit-tested in physical pixels, so the 96-DPI frame
// metrics (title height, border thickness) have to be rescaled whenever the
// window lands on a different monitor.  `Dpi` wraps one monitor's dots-per-
// inch value together with the scaling arithmetic; every constructor falls
// back to the 96-DPI baseline instead of erroring, because a mis-scaled
// frame still works while a propagated failure would kill startup.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::HWND,
    UI::HiDpi::{
        GetDpiForSystem, GetDpiForWindow, SetProcessDpiAwarenessContext,
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    },
};

/// Dots-per-inch of one monitor, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dpi(u32);

impl Dpi {
    /// The DPI the frame metrics are authored at.
    const BASELINE: u32 = 96;

    /// Opt the process into Per-Monitor v2 awareness.  Must run before the
    /// first window is created, otherwise WM_DPICHANGED never arrives and
    /// the frame stays at its startup scale.
    pub(crate) fn init_awareness() {
        // SAFETY: takes no pointers; a failure (pre-Win10 or already set by
        // a manifest) simply leaves the process at its previous awareness.
        unsafe {
            let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        }
    }

    /// DPI of the monitor hosting `hwnd`.
    pub(crate) fn of_window(hwnd: HWND) -> Self {
        // SAFETY: hwnd is a window handle owned by the caller; an invalid
        // handle makes GetDpiForWindow return 0, which `checked` absorbs.
        Self::checked(unsafe { GetDpiForWindow(hwnd) })
    }

    /// System DPI, used to size the window before it exists.
    pub(crate) fn system() -> Self {
        // SAFETY: GetDpiForSystem takes no parameters.
        Self::checked(unsafe { GetDpiForSystem() })
    }

    /// The DPI carried in a WM_DPICHANGED wParam (low word).
    pub(crate) fn from_wparam(wparam: usize) -> Self {
        Self::checked((wparam & 0xFFFF) as u32)
    }

    fn checked(raw: u32) -> Self {
        Self(if raw == 0 { Self::BASELINE } else { raw })
    }

    /// Scale a pixel metric authored at the 96-DPI baseline.
    pub(crate) fn scale_px(self, px: i32) -> i32 {
        px * self.0 as i32 / Self::BASELINE as i32
    }

    /// Scale ratio relative to the baseline, for log output.
    pub(crate) fn factor(self) -> f32 {
        self.0 as f32 / Self::BASELINE as f32
    }

    /// The raw dots-per-inch value, for `FrameMetrics::scaled`.
    pub(crate) fn raw(self) -> u32 {
        self.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_query_result_becomes_baseline() {
        assert_eq!(Dpi::checked(0), Dpi(Dpi::BASELINE));
        assert_eq!(Dpi::checked(0).factor(), 1.0);
    }

    #[test]
    fn wparam_low_word_carries_the_dpi() {
        // WM_DPICHANGED packs identical X/Y DPI into both words.
        let dpi = Dpi::from_wparam((144 << 16) | 144);
        assert_eq!(dpi.raw(), 144);
        assert_eq!(dpi.scale_px(30), 45);
    }

    #[test]
    fn baseline_scaling_is_identity() {
        let dpi = Dpi::checked(96);
        assert_eq!(dpi.scale_px(30), 30);
        assert_eq!(dpi.scale_px(6), 6);
    }
}
