// ── Native event interceptor (Windows snap emulation) ─────────────────────────
//
// The main window draws its own frame, so Windows no longer provides
// Win+arrow snapping or double-click-to-maximize on the title bar.  This
// interceptor watches the raw message stream and re-derives both: key chords
// drive the snap state machine in `window::snap`, non-client double-clicks
// are hit-tested against the emulated frame and become command posts.
//
// Everything here is plain message-code arithmetic — no FFI — so the module
// builds and tests on any host.  The message and virtual-key constants below
// mirror WinUser.h.

use crate::app::AppContext;
use crate::platform::{NativeEventInterceptor, NativeMessage};
use crate::window::{HitTest, Snap, SnapAction, SnapKey, Window};

// ── Message codes ─────────────────────────────────────────────────────────────

pub(crate) const WM_ACTIVATE: u32 = 0x0006;
pub(crate) const WM_KEYDOWN: u32 = 0x0100;
pub(crate) const WM_KEYUP: u32 = 0x0101;
pub(crate) const WM_NCLBUTTONDBLCLK: u32 = 0x00A3;

// ── Virtual keys ──────────────────────────────────────────────────────────────

const VK_LEFT: usize = 0x25;
const VK_UP: usize = 0x26;
const VK_RIGHT: usize = 0x27;
const VK_DOWN: usize = 0x28;
const VK_LWIN: usize = 0x5B;
const VK_RWIN: usize = 0x5C;

// ── Interceptor ───────────────────────────────────────────────────────────────

/// Windows variant of the native-event capability.  One per main window.
#[derive(Debug, Default)]
pub(crate) struct SnapInterceptor {
    /// Left / right OS-key currently held.  Reset on every activation change
    /// — a key-up can be swallowed while focus moves, and a stuck flag would
    /// turn every later arrow release into a snap.
    win_down: [bool; 2],
}

impl SnapInterceptor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn arrow_key(wparam: usize) -> Option<SnapKey> {
        match wparam {
            VK_LEFT => Some(SnapKey::Left),
            VK_RIGHT => Some(SnapKey::Right),
            VK_UP => Some(SnapKey::Up),
            VK_DOWN => Some(SnapKey::Down),
            _ => None,
        }
    }

    fn on_key_up(&mut self, wparam: usize, window: &mut Window, ctx: &mut AppContext) -> bool {
        let mut acted = false;
        if self.win_down.iter().any(|&d| d) {
            // Emulate the default window snapping behavior.
            if let Some(key) = Self::arrow_key(wparam) {
                match window.snap().apply(key) {
                    SnapAction::SetSnap(snap) => {
                        log::debug!("snap chord {key:?}: {:?} -> {snap:?}", window.snap());
                        window.set_snap(snap);
                    }
                    SnapAction::Post(command) => ctx.bus.post(command),
                    SnapAction::None => {}
                }
                acted = true;
            }
        }
        if wparam == VK_LWIN {
            self.win_down[0] = false;
            acted = true;
        }
        if wparam == VK_RWIN {
            self.win_down[1] = false;
            acted = true;
        }
        acted
    }

    fn on_nc_double_click(
        &self,
        msg: &NativeMessage,
        window: &mut Window,
        ctx: &mut AppContext,
    ) -> bool {
        let local = window.screen_to_client(msg.point());
        match window.hit_test(local) {
            HitTest::Drag => {
                // Avoid hitting something inside the window with the click
                // that follows the double-click.
                window.set_ignore_click();
                let verb = if window.snap().is_snapped() {
                    "restore"
                } else {
                    "maximize toggle:1"
                };
                crate::command::postf!(ctx.bus, "window.{verb}");
                true
            }
            HitTest::ResizeTop | HitTest::ResizeBottom => {
                window.set_ignore_click();
                window.set_snap(Snap::MaximizedVertical);
                true
            }
            _ => false,
        }
    }
}

impl NativeEventInterceptor for SnapInterceptor {
    /// React to the known message subset; everything else is left untouched
    /// for default OS processing.
    fn intercept(
        &mut self,
        msg: &NativeMessage,
        window: &mut Window,
        ctx: &mut AppContext,
    ) -> bool {
        match msg.code {
            WM_ACTIVATE => {
                // A key-up may have been swallowed during the focus change.
                self.win_down = [false, false];
                true
            }
            WM_KEYDOWN => match msg.wparam {
                VK_LWIN => {
                    self.win_down[0] = true;
                    true
                }
                VK_RWIN => {
                    self.win_down[1] = true;
                    true
                }
                _ => false,
            },
            WM_KEYUP => self.on_key_up(msg.wparam, window, ctx),
            WM_NCLBUTTONDBLCLK => self.on_nc_double_click(msg, window, ctx),
            _ => false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Point, Size, WindowId};

    fn fixture() -> (SnapInterceptor, Window, AppContext) {
        // 800×600 client area at the screen origin, default frame metrics
        // (30 px title region, 6 px resize border).
        (
            SnapInterceptor::new(),
            Window::new(WindowId(1), Size { width: 800, height: 600 }),
            AppContext::new(),
        )
    }

    fn key_down(vk: usize) -> NativeMessage {
        NativeMessage::new(WM_KEYDOWN, vk, 0)
    }

    fn key_up(vk: usize) -> NativeMessage {
        NativeMessage::new(WM_KEYUP, vk, 0)
    }

    fn activate() -> NativeMessage {
        NativeMessage::new(WM_ACTIVATE, 1, 0)
    }

    fn dbl_click(x: isize, y: isize) -> NativeMessage {
        NativeMessage::new(WM_NCLBUTTONDBLCLK, 0, (y << 16) | (x & 0xFFFF))
    }

    /// Hold the OS key, release an arrow, release the OS key.
    fn chord(
        it: &mut SnapInterceptor,
        w: &mut Window,
        ctx: &mut AppContext,
        modifier: usize,
        arrow: usize,
    ) {
        it.intercept(&key_down(modifier), w, ctx);
        it.intercept(&key_up(arrow), w, ctx);
        it.intercept(&key_up(modifier), w, ctx);
    }

    fn posted(ctx: &mut AppContext) -> Vec<String> {
        ctx.bus
            .take_pending()
            .into_iter()
            .map(|c| c.text().to_owned())
            .collect()
    }

    #[test]
    fn win_left_snaps_left() {
        let (mut it, mut w, mut ctx) = fixture();
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_LEFT);
        assert_eq!(w.snap(), Snap::Left);
        assert!(w.take_snap_dirty());
    }

    #[test]
    fn win_left_twice_toggles_off() {
        let (mut it, mut w, mut ctx) = fixture();
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_LEFT);
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_LEFT);
        assert_eq!(w.snap(), Snap::Unsnapped);
    }

    #[test]
    fn right_os_key_works_too() {
        let (mut it, mut w, mut ctx) = fixture();
        chord(&mut it, &mut w, &mut ctx, VK_RWIN, VK_RIGHT);
        assert_eq!(w.snap(), Snap::Right);
    }

    #[test]
    fn up_from_left_reaches_corner() {
        let (mut it, mut w, mut ctx) = fixture();
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_LEFT);
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_UP);
        assert_eq!(w.snap(), Snap::LeftTop);
    }

    #[test]
    fn up_from_corner_posts_maximize() {
        let (mut it, mut w, mut ctx) = fixture();
        w.set_snap(Snap::LeftTop);
        let _ = w.take_snap_dirty();
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_UP);
        // Command posted, state untouched.
        assert_eq!(posted(&mut ctx), vec!["window.maximize"]);
        assert_eq!(w.snap(), Snap::LeftTop);
        assert!(!w.take_snap_dirty());
    }

    #[test]
    fn down_from_unsnapped_posts_minimize() {
        let (mut it, mut w, mut ctx) = fixture();
        chord(&mut it, &mut w, &mut ctx, VK_LWIN, VK_DOWN);
        assert_eq!(posted(&mut ctx), vec!["window.minimize"]);
        assert_eq!(w.snap(), Snap::Unsnapped);
    }

    #[test]
    fn arrows_without_modifier_do_nothing() {
        let (mut it, mut w, mut ctx) = fixture();
        assert!(!it.intercept(&key_up(VK_LEFT), &mut w, &mut ctx));
        assert_eq!(w.snap(), Snap::Unsnapped);
        assert!(ctx.bus.is_empty());
    }

    #[test]
    fn releasing_modifier_ends_the_chord() {
        let (mut it, mut w, mut ctx) = fixture();
        it.intercept(&key_down(VK_LWIN), &mut w, &mut ctx);
        it.intercept(&key_up(VK_LWIN), &mut w, &mut ctx);
        // OS key is up: later arrow releases are ordinary key events.
        it.intercept(&key_up(VK_LEFT), &mut w, &mut ctx);
        assert_eq!(w.snap(), Snap::Unsnapped);
    }

    #[test]
    fn activation_change_resets_modifier_state() {
        let (mut it, mut w, mut ctx) = fixture();
        it.intercept(&key_down(VK_LWIN), &mut w, &mut ctx);
        it.intercept(&key_down(VK_RWIN), &mut w, &mut ctx);
        // Focus moved away and back; the key-ups were swallowed meanwhile.
        it.intercept(&activate(), &mut w, &mut ctx);
        it.intercept(&key_up(VK_LEFT), &mut w, &mut ctx);
        assert_eq!(w.snap(), Snap::Unsnapped);
        assert!(ctx.bus.is_empty());
    }

    #[test]
    fn title_double_click_unsnapped_posts_maximize_toggle() {
        let (mut it, mut w, mut ctx) = fixture();
        assert!(it.intercept(&dbl_click(400, 15), &mut w, &mut ctx));
        assert_eq!(posted(&mut ctx), vec!["window.maximize toggle:1"]);
        assert!(w.take_ignore_click());
    }

    #[test]
    fn title_double_click_snapped_posts_restore() {
        let (mut it, mut w, mut ctx) = fixture();
        w.set_snap(Snap::Left);
        it.intercept(&dbl_click(400, 15), &mut w, &mut ctx);
        assert_eq!(posted(&mut ctx), vec!["window.restore"]);
        assert!(w.take_ignore_click());
    }

    #[test]
    fn resize_edge_double_click_maximizes_vertically() {
        let (mut it, mut w, mut ctx) = fixture();
        it.intercept(&dbl_click(400, 2), &mut w, &mut ctx);
        assert_eq!(w.snap(), Snap::MaximizedVertical);
        assert!(w.take_ignore_click());
        assert!(ctx.bus.is_empty());

        it.intercept(&dbl_click(400, 598), &mut w, &mut ctx);
        assert_eq!(w.snap(), Snap::MaximizedVertical);
    }

    #[test]
    fn double_click_maps_screen_to_window_coordinates() {
        let (mut it, mut w, mut ctx) = fixture();
        w.set_client_origin(Point::new(1000, 200));
        // Screen (1400, 215) → local (400, 15): the title region.
        it.intercept(&dbl_click(1400, 215), &mut w, &mut ctx);
        assert_eq!(posted(&mut ctx), vec!["window.maximize toggle:1"]);
    }

    #[test]
    fn content_double_click_is_ignored() {
        let (mut it, mut w, mut ctx) = fixture();
        assert!(!it.intercept(&dbl_click(400, 300), &mut w, &mut ctx));
        assert!(!w.take_ignore_click());
        assert!(ctx.bus.is_empty());
    }

    #[test]
    fn unknown_messages_pass_through() {
        let (mut it, mut w, mut ctx) = fixture();
        // WM_PAINT and friends are none of the interceptor's business.
        assert!(!it.intercept(&NativeMessage::new(0x000F, 0, 0), &mut w, &mut ctx));
        assert!(ctx.bus.is_empty());
    }

    /// Property: no chord sequence can reach a state pairing opposite edges;
    /// structurally guaranteed by the enum, exercised here end to end.
    #[test]
    fn long_chord_sequences_stay_valid() {
        let (mut it, mut w, mut ctx) = fixture();
        let arrows = [VK_LEFT, VK_UP, VK_RIGHT, VK_DOWN];
        for round in 0..128usize {
            let arrow = arrows[(round * 5 + 1) % arrows.len()];
            chord(&mut it, &mut w, &mut ctx, VK_LWIN, arrow);
            // Any queued maximize/minimize posts would be consumed by the
            // dispatcher; drain them so the queue check stays meaningful.
            let _ = ctx.bus.take_pending();
        }
    }
}
