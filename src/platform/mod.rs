// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the boundary between the host-independent application
// core and the OS.  No `unsafe` lives here; all Win32 FFI is confined to the
// `win32` sub-module and never leaks outward.
//
// Native window-system messages cross the boundary as `NativeMessage` records
// — raw numeric code / wParam / lParam — so interceptor logic can run (and be
// tested) on any host.  An interceptor is the per-platform capability that
// translates those records into snap-state transitions or command posts; only
// the Windows variant exists, because only the custom-frame Windows build has
// to re-implement what the OS frame would otherwise provide.

use crate::app::AppContext;
use crate::window::Window;

pub(crate) mod win32;

/// A raw window-system message, decoupled from the OS's own struct types.
/// For Win32 this is (message, wParam, lParam); the owning HWND stays with
/// the shell, which already knows which `Window` the message belongs to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NativeMessage {
    pub(crate) code: u32,
    pub(crate) wparam: usize,
    pub(crate) lparam: isize,
}

impl NativeMessage {
    pub(crate) fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }

    /// The signed point packed into lParam (screen coordinates for
    /// non-client mouse messages).
    pub(crate) fn point(&self) -> crate::window::Point {
        // GET_X_LPARAM / GET_Y_LPARAM: low/high 16 bits, sign-extended.
        let x = (self.lparam & 0xFFFF) as u16 as i16 as i32;
        let y = ((self.lparam >> 16) & 0xFFFF) as u16 as i16 as i32;
        crate::window::Point::new(x, y)
    }
}

/// Per-platform translation of native messages into core actions.
///
/// Implementations react to a known subset of messages and must leave
/// everything else untouched; returning `false` tells the shell to continue
/// with default OS processing (which it does for handled messages too — the
/// interceptor augments the OS, it never replaces it).
pub(crate) trait NativeEventInterceptor {
    fn intercept(&mut self, msg: &NativeMessage, window: &mut Window, ctx: &mut AppContext)
        -> bool;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Point;

    #[test]
    fn lparam_point_unpacks_negative_coordinates() {
        // A point on a monitor left of the primary: x = -200, y = 35.
        let lparam = ((35i32 as u16 as isize) << 16) | (-200i32 as u16 as isize);
        let msg = NativeMessage::new(0, 0, lparam);
        assert_eq!(msg.point(), Point::new(-200, 35));
    }

    #[test]
    fn lparam_point_unpacks_positive_coordinates() {
        let lparam = (600isize << 16) | 1024;
        let msg = NativeMessage::new(0, 0, lparam);
        assert_eq!(msg.point(), Point::new(1024, 600));
    }
}
