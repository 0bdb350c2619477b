// ── Window state ──────────────────────────────────────────────────────────────
//
// Pure Rust state for one top-level window.  The OS handle is owned by the
// platform shell (`platform::win32::window`), never stored here; this module
// holds the snap state, the transient ignore-click flag, and the frame
// geometry the hit test is answered from.

pub(crate) mod snap;

pub(crate) use snap::{Snap, SnapAction, SnapKey};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A point in pixels.  Whether it is screen- or window-local depends on
/// context; `Window::screen_to_client` converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Point {
    pub(crate) fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel size of the client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Size {
    pub(crate) width: i32,
    pub(crate) height: i32,
}

// ── Hit testing ───────────────────────────────────────────────────────────────

/// Result of hit-testing a window-local point against the custom frame.
///
/// The interceptor only acts on `Drag`, `ResizeTop`, and `ResizeBottom`;
/// the remaining variants exist for the shell's WM_NCHITTEST answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HitTest {
    /// The draggable title region of the emulated frame.
    Drag,
    ResizeTop,
    ResizeBottom,
    ResizeLeft,
    ResizeRight,
    /// Regular window content; ignored by the interceptor.
    Content,
}

/// Geometry of the emulated frame, in physical pixels (already DPI-scaled by
/// the shell when it creates or rescales the window).
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameMetrics {
    /// Height of the draggable title region measured from the top edge.
    pub(crate) title_height: i32,
    /// Thickness of the resize border on each edge.
    pub(crate) border: i32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        // 96-DPI defaults; the shell rescales via `scaled`.
        Self {
            title_height: 30,
            border: 6,
        }
    }
}

impl FrameMetrics {
    /// Metrics scaled from 96-DPI values to the given DPI.
    pub(crate) fn scaled(self, dpi: u32) -> Self {
        let s = |px: i32| px * dpi as i32 / 96;
        Self {
            title_height: s(self.title_height),
            border: s(self.border),
        }
    }
}

// ── Window ────────────────────────────────────────────────────────────────────

/// Identifies a window within the application for command scoping and
/// ticker ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WindowId(pub(crate) u32);

/// State for one top-level window with an emulated frame.
#[derive(Debug)]
pub(crate) struct Window {
    id: WindowId,
    snap: Snap,
    /// Set when a non-client double-click was translated into a command, so
    /// the click that follows does not also activate something inside the
    /// window.  Consumed by the next mouse-press pass.
    ignore_click: bool,
    /// Set on every snap transition; the shell consumes it and re-applies
    /// window geometry.
    snap_dirty: bool,
    /// Set by the `window.minimize` handler; the shell consumes it and calls
    /// the OS minimize.  Snap state is left untouched, matching native
    /// behavior (restoring from the taskbar brings the snap back).
    minimize_requested: bool,
    /// Screen coordinates of the client area's top-left corner, maintained by
    /// the shell on WM_MOVE.
    client_origin: Point,
    size: Size,
    frame: FrameMetrics,
}

impl Window {
    pub(crate) fn new(id: WindowId, size: Size) -> Self {
        Self {
            id,
            snap: Snap::Unsnapped,
            ignore_click: false,
            snap_dirty: false,
            minimize_requested: false,
            client_origin: Point::default(),
            size,
            frame: FrameMetrics::default(),
        }
    }

    pub(crate) fn id(&self) -> WindowId {
        self.id
    }

    pub(crate) fn snap(&self) -> Snap {
        self.snap
    }

    /// Transition the snap state.  Marks the window dirty even when the
    /// state is unchanged: re-snapping to the same edge re-applies geometry
    /// (the user may have dragged the window since).
    pub(crate) fn set_snap(&mut self, snap: Snap) {
        self.snap = snap;
        self.snap_dirty = true;
    }

    /// Consume the pending-geometry flag set by `set_snap`.
    pub(crate) fn take_snap_dirty(&mut self) -> bool {
        std::mem::take(&mut self.snap_dirty)
    }

    pub(crate) fn set_ignore_click(&mut self) {
        self.ignore_click = true;
    }

    /// Consume the ignore-click flag.  Returns `true` exactly once per
    /// `set_ignore_click` call; the shell swallows one mouse press when so.
    pub(crate) fn take_ignore_click(&mut self) -> bool {
        std::mem::take(&mut self.ignore_click)
    }

    pub(crate) fn request_minimize(&mut self) {
        self.minimize_requested = true;
    }

    /// Consume the pending-minimize flag set by the command handler.
    pub(crate) fn take_minimize_requested(&mut self) -> bool {
        std::mem::take(&mut self.minimize_requested)
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn set_client_origin(&mut self, origin: Point) {
        self.client_origin = origin;
    }

    pub(crate) fn set_frame(&mut self, frame: FrameMetrics) {
        self.frame = frame;
    }

    /// Map a screen-space point into window-local coordinates.
    pub(crate) fn screen_to_client(&self, p: Point) -> Point {
        Point::new(p.x - self.client_origin.x, p.y - self.client_origin.y)
    }

    /// Hit-test a window-local point against the emulated frame.
    ///
    /// Border strips win over the title region so the top resize edge stays
    /// reachable; corners resolve to the horizontal edge (the shell refines
    /// corner cursors itself, the interceptor does not care).
    pub(crate) fn hit_test(&self, p: Point) -> HitTest {
        let Size { width, height } = self.size;
        if p.x < 0 || p.y < 0 || p.x >= width || p.y >= height {
            return HitTest::Content;
        }
        let b = self.frame.border;
        if p.x < b {
            return HitTest::ResizeLeft;
        }
        if p.x >= width - b {
            return HitTest::ResizeRight;
        }
        if p.y < b {
            return HitTest::ResizeTop;
        }
        if p.y >= height - b {
            return HitTest::ResizeBottom;
        }
        if p.y < self.frame.title_height {
            return HitTest::Drag;
        }
        HitTest::Content
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        // 800×600 client area, default frame (30px title, 6px border).
        Window::new(WindowId(1), Size { width: 800, height: 600 })
    }

    #[test]
    fn hit_test_title_region() {
        let w = window();
        assert_eq!(w.hit_test(Point::new(400, 15)), HitTest::Drag);
        assert_eq!(w.hit_test(Point::new(10, 29)), HitTest::Drag);
    }

    #[test]
    fn hit_test_resize_edges() {
        let w = window();
        assert_eq!(w.hit_test(Point::new(400, 2)), HitTest::ResizeTop);
        assert_eq!(w.hit_test(Point::new(400, 597)), HitTest::ResizeBottom);
        assert_eq!(w.hit_test(Point::new(2, 300)), HitTest::ResizeLeft);
        assert_eq!(w.hit_test(Point::new(797, 300)), HitTest::ResizeRight);
    }

    #[test]
    fn hit_test_content_and_outside() {
        let w = window();
        assert_eq!(w.hit_test(Point::new(400, 300)), HitTest::Content);
        assert_eq!(w.hit_test(Point::new(-5, 10)), HitTest::Content);
        assert_eq!(w.hit_test(Point::new(400, 900)), HitTest::Content);
    }

    #[test]
    fn screen_to_client_subtracts_origin() {
        let mut w = window();
        w.set_client_origin(Point::new(100, 50));
        assert_eq!(w.screen_to_client(Point::new(140, 65)), Point::new(40, 15));
    }

    #[test]
    fn ignore_click_is_consumed_once() {
        let mut w = window();
        assert!(!w.take_ignore_click());
        w.set_ignore_click();
        assert!(w.take_ignore_click());
        assert!(!w.take_ignore_click());
    }

    #[test]
    fn snap_dirty_set_on_transition() {
        let mut w = window();
        assert!(!w.take_snap_dirty());
        w.set_snap(Snap::Left);
        assert_eq!(w.snap(), Snap::Left);
        assert!(w.take_snap_dirty());
        assert!(!w.take_snap_dirty());
    }

    #[test]
    fn frame_metrics_scale_with_dpi() {
        let f = FrameMetrics::default().scaled(144); // 150 %
        assert_eq!(f.title_height, 45);
        assert_eq!(f.border, 9);
    }
}
