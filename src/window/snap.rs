// ── Window snap state machine ─────────────────────────────────────────────────
//
// With a custom (non-OS-drawn) frame, Windows no longer provides Win+arrow
// snapping or double-click-to-maximize; the interceptor re-implements them and
// this module owns the state machine it drives.
//
// The state is a tagged enum rather than a bitmask: left+right and top+bottom
// can never coexist by construction, and `Maximized` / `MaximizedVertical`
// are distinct variants exclusive of the directional ones.

/// Docking state of a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Snap {
    /// Free-floating; no docking applied.
    #[default]
    Unsnapped,
    /// Left half of the monitor work area.
    Left,
    /// Right half of the monitor work area.
    Right,
    /// Top half.  Not reachable from the key chords, but a collaborator
    /// (e.g. a drag gesture) may set it; the transition table covers it.
    Top,
    /// Bottom half.  Same reachability note as `Top`.
    Bottom,
    /// Top-left quadrant.
    LeftTop,
    /// Bottom-left quadrant.
    LeftBottom,
    /// Top-right quadrant.
    RightTop,
    /// Bottom-right quadrant.
    RightBottom,
    /// Fills the monitor work area.
    Maximized,
    /// Full work-area height, current width and horizontal position kept.
    MaximizedVertical,
}

/// Arrow released while an OS ("Win") modifier key was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnapKey {
    Left,
    Right,
    Up,
    Down,
}

/// What a snap chord asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnapAction {
    /// Transition the window's snap state (the shell re-applies geometry).
    SetSnap(Snap),
    /// Post a command instead of changing the state directly.
    Post(&'static str),
    /// The chord has no effect in this state.
    None,
}

impl Snap {
    /// `true` for every state except `Unsnapped`.
    pub(crate) fn is_snapped(self) -> bool {
        self != Snap::Unsnapped
    }

    /// Stable label used by the placement file.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Snap::Unsnapped => "none",
            Snap::Left => "left",
            Snap::Right => "right",
            Snap::Top => "top",
            Snap::Bottom => "bottom",
            Snap::LeftTop => "left-top",
            Snap::LeftBottom => "left-bottom",
            Snap::RightTop => "right-top",
            Snap::RightBottom => "right-bottom",
            Snap::Maximized => "maximized",
            Snap::MaximizedVertical => "maximized-vertical",
        }
    }

    /// Inverse of `as_str`; unknown labels (from a newer or edited placement
    /// file) fall back to `Unsnapped`.
    pub(crate) fn from_label(label: &str) -> Self {
        match label {
            "left" => Snap::Left,
            "right" => Snap::Right,
            "top" => Snap::Top,
            "bottom" => Snap::Bottom,
            "left-top" => Snap::LeftTop,
            "left-bottom" => Snap::LeftBottom,
            "right-top" => Snap::RightTop,
            "right-bottom" => Snap::RightBottom,
            "maximized" => Snap::Maximized,
            "maximized-vertical" => Snap::MaximizedVertical,
            _ => Snap::Unsnapped,
        }
    }

    /// Resolve a snap chord against the current state.
    ///
    /// This mirrors conventional OS snap-assist behavior: horizontal keys
    /// toggle between a side and unsnapped, vertical keys cycle a side
    /// through its quadrants, and "up past the top" / "down past the bottom"
    /// become maximize / minimize command posts.
    pub(crate) fn apply(self, key: SnapKey) -> SnapAction {
        use Snap::*;
        use SnapAction::*;
        match key {
            // Left discards any vertical component first; pressing it from a
            // right-side state lands on unsnapped, from anywhere else on Left.
            SnapKey::Left => match self {
                Right | RightTop | RightBottom => SetSnap(Unsnapped),
                Left => SetSnap(Unsnapped),
                _ => SetSnap(Left),
            },
            SnapKey::Right => match self {
                Left | LeftTop | LeftBottom => SetSnap(Unsnapped),
                Right => SetSnap(Unsnapped),
                _ => SetSnap(Right),
            },
            // Up from a top-snapped state means "keep going": maximize.
            SnapKey::Up => match self {
                LeftTop | RightTop | Top => Post("window.maximize"),
                LeftBottom => SetSnap(Left),
                RightBottom => SetSnap(Right),
                Bottom => SetSnap(Unsnapped),
                Left => SetSnap(LeftTop),
                Right => SetSnap(RightTop),
                Unsnapped | MaximizedVertical => SetSnap(Maximized),
                // Already filling the work area: explicitly nothing, rather
                // than a redundant re-maximize.
                Maximized => None,
            },
            // Down from the floor means minimize; otherwise walk back down
            // through the cycle.
            SnapKey::Down => match self {
                Unsnapped | Bottom | LeftBottom | RightBottom => Post("window.minimize"),
                Maximized | MaximizedVertical | Top => SetSnap(Unsnapped),
                LeftTop => SetSnap(Left),
                RightTop => SetSnap(Right),
                Left => SetSnap(LeftBottom),
                Right => SetSnap(RightBottom),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
