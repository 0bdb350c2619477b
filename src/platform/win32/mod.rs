// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the codebase where `unsafe` code is permitted, and only
// in the Windows-only sub-modules (`window`, `dpi`).  Every `unsafe` block
// MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// `intercept` holds the snap-emulation logic itself.  It works on raw
// numeric message codes and has no FFI, so it compiles — and its tests run —
// on every host; only the shell around it needs Windows.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod intercept; // snap emulation for the custom frame

#[cfg(windows)]
pub(crate) mod window; // main window, custom frame, WndProc, message pump

#[cfg(windows)]
pub(crate) mod dpi; // per-monitor DPI v2 helpers
