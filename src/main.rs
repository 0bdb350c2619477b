// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 / WinAPI FFI
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that eprintln! timing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod command;
mod error;
mod logging;
mod platform;
mod session;
mod ticker;
mod window;

#[cfg(windows)]
fn main() {
    logging::init();
    if let Err(e) = platform::win32::window::run() {
        // Startup failed before or during the message loop.
        // Show a modal error dialog — the only safe output path in a GUI app.
        log::error!("fatal: {e}");
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    logging::init();
    // The application core (commands, tickers, snap state) is host-independent
    // and fully testable here; the window shell itself is Windows-only.
    eprintln!("lantern: the window shell requires Windows; run `cargo test` instead.");
    std::process::exit(1);
}
