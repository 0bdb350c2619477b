// ── Main window shell ─────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class and create the custom-frame window
//     (WM_NCCALCSIZE removes the OS frame; WM_NCHITTEST answers from the
//     emulated frame so dragging and OS resizing keep working).
//   • Run the message pump in both event modes (blocking / drain-only).
//   • Route the intercepted message subset through the SnapInterceptor, then
//     each pass: drain the release queue, dispatch commands, run tickers.
//   • Apply snap geometry on the monitor work area when the state changes.
//   • Restore/save window placement across runs.
//   • Expose a safe error-dialog helper for use by main().

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{
            GetMonitorInfoW, GetStockObject, MonitorFromWindow, BLACK_BRUSH, HBRUSH,
            MONITORINFO, MONITOR_DEFAULTTONEAREST,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
            GetWindowLongPtrW, GetWindowRect, LoadCursorW, LoadIconW, MessageBoxW, PeekMessageW,
            PostQuitMessage, RegisterClassExW, SetWindowLongPtrW, SetWindowPos, ShowWindow,
            TranslateMessage, UpdateWindow, CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW,
            CW_USEDEFAULT, GWLP_USERDATA, HMENU, HTBOTTOM, HTCAPTION, HTCLIENT, HTLEFT,
            HTRIGHT, HTTOP, IDC_ARROW, IDI_APPLICATION, MB_ICONERROR, MB_OK, MSG, PM_REMOVE,
            SWP_NOACTIVATE, SWP_NOZORDER, SW_MINIMIZE, SW_RESTORE, SW_SHOW, WINDOW_EX_STYLE,
            WM_CLOSE, WM_CREATE, WM_DESTROY, WM_DPICHANGED, WM_LBUTTONDOWN, WM_MOVE,
            WM_NCCALCSIZE, WM_NCCREATE, WM_NCHITTEST, WM_NCLBUTTONDBLCLK, WM_QUIT, WM_SIZE,
            WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::app::{App, EventMode};
use crate::error::{LanternError, Result};
use crate::platform::win32::dpi::Dpi;
use crate::platform::win32::intercept::{SnapInterceptor, WM_ACTIVATE, WM_KEYDOWN, WM_KEYUP};
use crate::platform::{NativeEventInterceptor, NativeMessage};
use crate::session;
use crate::window::{FrameMetrics, HitTest, Size, Snap, WindowId};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("LanternMainWindow");

/// Title bar text (shown in the taskbar; the frame itself is ours).
const APP_TITLE: PCWSTR = w!("Lantern");

/// Default client width in 96-DPI pixels (scaled at creation).
const DEFAULT_WIDTH: i32 = 960;

/// Default client height in 96-DPI pixels.
const DEFAULT_HEIGHT: i32 = 640;

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Everything the pump and WndProc share: the host-independent `App` plus the
/// handles the OS owns.
struct Shell {
    app: App,
    interceptor: SnapInterceptor,
    hwnd: HWND,
    main_id: WindowId,
    /// Window rect remembered when leaving the free-floating state, restored
    /// on unsnap so the window lands where the user left it.
    floating: Option<RECT>,
}

impl Shell {
    fn new() -> Self {
        let mut app = App::new();
        let dpi = Dpi::system();
        let main_id = app.create_window(Size {
            width: dpi.scale_px(DEFAULT_WIDTH),
            height: dpi.scale_px(DEFAULT_HEIGHT),
        });
        Self {
            app,
            interceptor: SnapInterceptor::new(),
            hwnd: HWND::default(),
            main_id,
            floating: None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the window class, create the custom-frame window, and drive the
/// event loop until the application quits.
pub(crate) fn run() -> Result<()> {
    // DPI awareness must precede window creation.
    Dpi::init_awareness();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule =
        unsafe { GetModuleHandleW(None) }.map_err(|e| LanternError::win32("GetModuleHandleW", e))?;

    // HINSTANCE and HMODULE represent the same underlying value on Windows
    // (guaranteed by the Win32 ABI).
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;

    // The shell outlives the window; WndProc reaches it through the pointer
    // stashed in GWLP_USERDATA at WM_NCCREATE.
    let shell: *mut Shell = Box::into_raw(Box::new(Shell::new()));
    let result = start(hinstance, shell);

    // SAFETY: the pointer was produced by Box::into_raw above and the event
    // loop has exited, so no WndProc can still be reading it.
    drop(unsafe { Box::from_raw(shell) });
    result
}

fn start(hinstance: HINSTANCE, shell: *mut Shell) -> Result<()> {
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    let hwnd = create_window(hinstance, shell)?;

    // SAFETY: shell came from Box::into_raw in `run` and no dispatch is in
    // flight; this is the only live reference.
    unsafe {
        (*shell).hwnd = hwnd;
        restore_placement(&mut *shell);
        // ShowWindow returns the previous visibility state; UpdateWindow
        // returns a success BOOL — both are intentionally ignored here.
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    // Startup milestone — window is now visible on screen.
    #[cfg(debug_assertions)]
    eprintln!(
        "[lantern] window visible in {:.1} ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );

    event_loop(shell)
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: msg_wide is a valid null-terminated UTF-16 string that remains
    // allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            w!("Lantern — Fatal Error"),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon =
        unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(|e| LanternError::win32("LoadIconW", e))?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor =
        unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(|e| LanternError::win32("LoadCursorW", e))?;

    // SAFETY: GetStockObject with BLACK_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(BLACK_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE, shell: *mut Shell) -> Result<HWND> {
    // SAFETY: shell is the only live reference (no dispatch running);
    // reading the initial size cannot alias.
    let size = {
        let shell = unsafe { &*shell };
        shell
            .app
            .window(shell.main_id)
            .map(|w| w.size())
            .unwrap_or(Size {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
            })
    };

    // WS_OVERLAPPEDWINDOW keeps native resizing and minimize plumbing alive;
    // WM_NCCALCSIZE below removes the drawn frame.
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // The shell pointer rides in lpParam and is stashed at WM_NCCREATE; it
    // outlives the window (freed by `run` after the loop exits).
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            APP_TITLE,
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            size.width,
            size.height,
            HWND::default(),
            HMENU::default(),
            hinstance,
            Some(shell.cast_const().cast()),
        )
    }
    .map_err(|e| LanternError::win32("CreateWindowExW", e))?;

    Ok(hwnd)
}

// ── Event loop ────────────────────────────────────────────────────────────────

/// Pump messages until WM_QUIT.  Between pumps no dispatch is in flight, so
/// the shell pointer can be dereferenced for the per-pass work.
fn event_loop(shell: *mut Shell) -> Result<()> {
    loop {
        // Animation in progress (live tickers) must not block on GetMessage.
        // SAFETY: between dispatches; sole live reference.
        let mode = if unsafe { (*shell).app.ctx.tickers.is_empty() } {
            EventMode::WaitForNewEvents
        } else {
            EventMode::PostedEventsOnly
        };

        if !pump(mode)? {
            return Ok(()); // WM_QUIT retrieved
        }

        // SAFETY: the pump has returned; no WndProc frame is live.
        let shell = unsafe { &mut *shell };
        let released = shell.app.ctx.drain_released();
        if released > 0 {
            log::debug!("released {released} worker-thread object(s)");
        }
        shell.app.dispatch_commands();
        shell.app.ctx.run_tickers();
        apply_window_effects(shell);

        if !shell.app.is_running() {
            // A `quit` command tears the window down without WM_CLOSE ever
            // firing, so placement must be persisted here too (writing it
            // twice on the WM_CLOSE path is harmless).
            save_placement(shell);
            // SAFETY: hwnd is our own window; DestroyWindow posts WM_DESTROY
            // which in turn posts WM_QUIT, ending the next pump.
            unsafe {
                let _ = DestroyWindow(shell.hwnd);
            }
        }
    }
}

/// Retrieve and dispatch messages according to `mode`.
/// Returns `false` once WM_QUIT is seen.
fn pump(mode: EventMode) -> Result<bool> {
    let mut msg = MSG::default();

    if mode == EventMode::WaitForNewEvents {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved — exit the loop cleanly.
            0 => return Ok(false),
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }

    // Drain whatever else is already queued, without blocking.
    // SAFETY: same invariants as above; PM_REMOVE pops each message.
    while unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) }.as_bool() {
        if msg.message == WM_QUIT {
            return Ok(false);
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            let _ = DispatchMessageW(&msg);
        }
    }

    Ok(true)
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; the shell pointer in GWLP_USERDATA stays valid until
// `run` drops the box, which happens only after the loop has exited.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        // Stash the shell pointer carried in CREATESTRUCTW so every later
        // message can reach application state.
        let create = lparam.0 as *const CREATESTRUCTW;
        let shell = (*create).lpCreateParams as *mut Shell;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, shell as isize);
        (*shell).hwnd = hwnd;
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let shell = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut Shell;
    if shell.is_null() {
        // Messages that arrive before WM_NCCREATE (e.g. WM_GETMINMAXINFO).
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    // The pump is single-threaded and no shell borrow is ever held across
    // DispatchMessageW, so this is the only live reference.
    match handle_message(&mut *shell, hwnd, msg, wparam, lparam) {
        Some(result) => result,
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Process one message.  `Some(lresult)` consumes it; `None` falls through to
/// `DefWindowProcW` — the interceptor must never block default processing of
/// messages it merely observes.
fn handle_message(
    shell: &mut Shell,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> Option<LRESULT> {
    match msg {
        WM_CREATE => {
            let dpi = Dpi::of_window(hwnd);
            if let Some(window) = shell.app.window_mut(shell.main_id) {
                window.set_frame(FrameMetrics::default().scaled(dpi.raw()));
            }
            log::info!("main window created (scale {:.2})", dpi.factor());
            Some(LRESULT(0))
        }

        // ── Custom frame ─────────────────────────────────────────────────────
        WM_NCCALCSIZE if wparam.0 != 0 => {
            // Returning 0 with untouched NCCALCSIZE_PARAMS makes the client
            // area fill the window rect: no OS-drawn frame.
            Some(LRESULT(0))
        }

        WM_NCHITTEST => {
            let window = shell.app.window(shell.main_id)?;
            let screen = native_message(msg, wparam, lparam).point();
            let code = match window.hit_test(window.screen_to_client(screen)) {
                HitTest::Drag => HTCAPTION,
                HitTest::ResizeTop => HTTOP,
                HitTest::ResizeBottom => HTBOTTOM,
                HitTest::ResizeLeft => HTLEFT,
                HitTest::ResizeRight => HTRIGHT,
                HitTest::Content => HTCLIENT,
            };
            Some(LRESULT(code as isize))
        }

        // ── Interceptor subset ───────────────────────────────────────────────
        WM_ACTIVATE | WM_KEYDOWN | WM_KEYUP | WM_NCLBUTTONDBLCLK => {
            let native = native_message(msg, wparam, lparam);
            let (window, ctx) = shell.app.window_with_ctx(shell.main_id)?;
            let acted = shell.interceptor.intercept(&native, window, ctx);
            // A handled double-click must not also reach DefWindowProcW,
            // which would re-maximize natively on HTCAPTION; everything else
            // falls through.
            (acted && msg == WM_NCLBUTTONDBLCLK).then_some(LRESULT(0))
        }

        // ── Geometry bookkeeping ─────────────────────────────────────────────
        WM_MOVE => {
            // lParam carries the client area's screen position; with the
            // custom frame this is also the window origin.
            let origin = native_message(msg, wparam, lparam).point();
            if let Some(window) = shell.app.window_mut(shell.main_id) {
                window.set_client_origin(origin);
            }
            Some(LRESULT(0))
        }

        WM_SIZE => {
            // lParam low word = new client width, high word = new height.
            let size = Size {
                width: (lparam.0 & 0xFFFF) as i32,
                height: ((lparam.0 >> 16) & 0xFFFF) as i32,
            };
            if let Some(window) = shell.app.window_mut(shell.main_id) {
                window.set_size(size);
            }
            Some(LRESULT(0))
        }

        WM_DPICHANGED => {
            // wParam carries the new DPI; lParam points at the rect Windows
            // suggests for the new monitor.
            let dpi = Dpi::from_wparam(wparam.0);
            if let Some(window) = shell.app.window_mut(shell.main_id) {
                window.set_frame(FrameMetrics::default().scaled(dpi.raw()));
            }
            // SAFETY: for WM_DPICHANGED Windows guarantees lParam points at a
            // valid RECT for the duration of the message.
            let suggested = unsafe { *(lparam.0 as *const RECT) };
            set_window_rect(hwnd, suggested);
            Some(LRESULT(0))
        }

        // ── Input filtering ──────────────────────────────────────────────────
        WM_LBUTTONDOWN => {
            let window = shell.app.window_mut(shell.main_id)?;
            // Swallow the click that follows a non-client double-click.
            window.take_ignore_click().then_some(LRESULT(0))
        }

        // ── Lifecycle ────────────────────────────────────────────────────────
        WM_CLOSE => {
            save_placement(shell);
            // SAFETY: hwnd is the window being closed; DestroyWindow triggers
            // WM_DESTROY, which posts WM_QUIT via PostQuitMessage.
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            Some(LRESULT(0))
        }

        WM_DESTROY => {
            shell.app.close_window(shell.main_id);
            // SAFETY: PostQuitMessage with exit code 0 is always safe to call
            // from WM_DESTROY. It posts WM_QUIT to the thread's message queue.
            unsafe {
                PostQuitMessage(0);
            }
            Some(LRESULT(0))
        }

        _ => None,
    }
}

fn native_message(msg: u32, wparam: WPARAM, lparam: LPARAM) -> NativeMessage {
    NativeMessage::new(msg, wparam.0, lparam.0)
}

// ── Snap geometry ─────────────────────────────────────────────────────────────

/// Consume the per-pass window effect flags: pending minimize and pending
/// snap geometry.
fn apply_window_effects(shell: &mut Shell) {
    let hwnd = shell.hwnd;
    let (minimize, snap_change) = match shell.app.window_mut(shell.main_id) {
        Some(window) => {
            let minimize = window.take_minimize_requested();
            let snap = window.take_snap_dirty().then(|| window.snap());
            (minimize, snap)
        }
        None => return,
    };

    if minimize {
        // SAFETY: hwnd is our own window; previous visibility state unused.
        unsafe {
            let _ = ShowWindow(hwnd, SW_MINIMIZE);
        }
    }
    if let Some(snap) = snap_change {
        apply_snap(shell, snap);
    }
}

fn apply_snap(shell: &mut Shell, snap: Snap) {
    let hwnd = shell.hwnd;
    log::debug!("applying snap geometry: {snap:?}");

    let current = window_rect(hwnd);
    // Remember the floating rect the first time we leave it.
    if snap.is_snapped() && shell.floating.is_none() {
        shell.floating = Some(current);
    }

    let work = monitor_work_area(hwnd);
    let (ww, wh) = (work.right - work.left, work.bottom - work.top);
    let half_w = ww / 2;
    let half_h = wh / 2;

    let target = match snap {
        Snap::Unsnapped => {
            let rect = shell.floating.take().unwrap_or(current);
            // SAFETY: hwnd is our own window; restores from a minimized or
            // maximized OS state before repositioning.
            unsafe {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            rect
        }
        Snap::Left => rect_at(work.left, work.top, half_w, wh),
        Snap::Right => rect_at(work.left + half_w, work.top, ww - half_w, wh),
        Snap::Top => rect_at(work.left, work.top, ww, half_h),
        Snap::Bottom => rect_at(work.left, work.top + half_h, ww, wh - half_h),
        Snap::LeftTop => rect_at(work.left, work.top, half_w, half_h),
        Snap::LeftBottom => rect_at(work.left, work.top + half_h, half_w, wh - half_h),
        Snap::RightTop => rect_at(work.left + half_w, work.top, ww - half_w, half_h),
        Snap::RightBottom => {
            rect_at(work.left + half_w, work.top + half_h, ww - half_w, wh - half_h)
        }
        Snap::Maximized => work,
        Snap::MaximizedVertical => {
            // Keep the current horizontal position and width.
            rect_at(current.left, work.top, current.right - current.left, wh)
        }
    };

    set_window_rect(hwnd, target);
}

fn rect_at(x: i32, y: i32, width: i32, height: i32) -> RECT {
    RECT {
        left: x,
        top: y,
        right: x + width,
        bottom: y + height,
    }
}

fn window_rect(hwnd: HWND) -> RECT {
    let mut rect = RECT::default();
    // SAFETY: hwnd is our own window; &mut rect is a valid RECT pointer.
    // A failure leaves the zeroed rect, which downstream code tolerates.
    unsafe {
        let _ = GetWindowRect(hwnd, &mut rect);
    }
    rect
}

fn monitor_work_area(hwnd: HWND) -> RECT {
    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    // SAFETY: MONITOR_DEFAULTTONEAREST guarantees a valid monitor handle for
    // any hwnd; &mut info has cbSize set as GetMonitorInfoW requires.
    unsafe {
        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        let _ = GetMonitorInfoW(monitor, &mut info);
    }
    info.rcWork
}

fn set_window_rect(hwnd: HWND, rect: RECT) {
    // SAFETY: hwnd is our own window.  SWP_NOZORDER ignores the insert-after
    // handle; a failure (e.g. during teardown) is deliberately dropped — snap
    // geometry is cosmetic, never load-bearing.
    unsafe {
        let _ = SetWindowPos(
            hwnd,
            HWND::default(),
            rect.left,
            rect.top,
            rect.right - rect.left,
            rect.bottom - rect.top,
            SWP_NOZORDER | SWP_NOACTIVATE,
        );
    }
}

// ── Placement persistence ─────────────────────────────────────────────────────

fn restore_placement(shell: &mut Shell) {
    let Some(placement) = session::load() else {
        log::debug!("no usable placement file; using defaults");
        return;
    };
    set_window_rect(
        shell.hwnd,
        rect_at(placement.x, placement.y, placement.width, placement.height),
    );
    let snap = placement.snap_state();
    if snap.is_snapped() {
        if let Some(window) = shell.app.window_mut(shell.main_id) {
            // Marks the snap dirty; the first pump pass applies the geometry.
            window.set_snap(snap);
        }
    }
    log::info!(
        "restored placement {}x{} at ({}, {}), snap {}",
        placement.width,
        placement.height,
        placement.x,
        placement.y,
        snap.as_str()
    );
}

fn save_placement(shell: &mut Shell) {
    let snap = shell
        .app
        .window(shell.main_id)
        .map(|w| w.snap())
        .unwrap_or_default();
    // Persist the floating rect, not the snapped one, so an unsnapped
    // restart opens at the user's chosen spot.
    let rect = shell.floating.unwrap_or_else(|| window_rect(shell.hwnd));
    if let Err(e) = session::save(
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
        snap,
    ) {
        log::warn!("could not save window placement: {e}");
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `LanternError`.
///
/// Call immediately after a Win32 function that signals failure — `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(api: &'static str) -> LanternError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    LanternError::Shell { api, code: code.0 }
}
