// ── Modal window plumbing ─────────────────────────────────────────────────────
//
// Shared by the prompt and option message box:
//   • Register (and always unregister) a per-call window class.
//   • Create a centred popup and hand it a per-call context via lpParam.
//   • Run a modal message loop until the window is destroyed.
//   • Disable the owner window for the dialog's lifetime.
//   • Own the per-call GDI resources (background brush, UI font).
//
// The window procedures retrieve their context from GWLP_USERDATA; nothing
// is staged in process-wide statics.

#![allow(unsafe_code)]

use std::ffi::c_void;

use log::debug;
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{
            GetLastError, COLORREF, FALSE, HINSTANCE, HWND, LPARAM, LRESULT, RECT, TRUE, WPARAM,
        },
        Graphics::Gdi::{
            CreateFontW, CreateSolidBrush, DeleteObject, SetBkColor, SetTextColor, UpdateWindow,
            CLEARTYPE_QUALITY, CLIP_DEFAULT_PRECIS, DEFAULT_CHARSET, DEFAULT_PITCH, FF_DONTCARE,
            FW_NORMAL, HBRUSH, HDC, HFONT, HGDIOBJ, OUT_DEFAULT_PRECIS,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Input::KeyboardAndMouse::{EnableWindow, SetActiveWindow},
            WindowsAndMessaging::{
                CreateWindowExW, DestroyWindow, DispatchMessageW, GetClientRect, GetMessageW,
                GetSystemMetrics, GetWindow, GetWindowLongPtrW, IsDialogMessageW, IsWindow, LoadCursorW,
                PostQuitMessage, RegisterClassExW, SendMessageW, SetWindowLongPtrW, SetWindowPos,
                ShowWindow, TranslateMessage, UnregisterClassW, CREATESTRUCTW, CS_HREDRAW,
                CS_VREDRAW, DS_MODALFRAME, GWLP_USERDATA, GW_OWNER, HMENU, IDC_ARROW, MSG, SM_CXSCREEN,
                SM_CYSCREEN, SWP_NOZORDER, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE, WM_NCCREATE,
                WM_SETFONT, WNDCLASSEXW, WNDPROC, WS_CAPTION, WS_CHILD, WS_POPUP, WS_SYSMENU,
                WS_VISIBLE,
            },
        },
    },
};

use crate::{
    color::Color,
    encoding::to_wide_checked,
    error::{DialogError, Result},
    modal::{centered_origin, Bounds},
};

// ── Control IDs ───────────────────────────────────────────────────────────────

/// Matches IDOK so that Enter in the dialog presses it.
pub(crate) const ID_OK: usize = 1;
/// Matches IDCANCEL so that Escape in the dialog presses it.
pub(crate) const ID_CANCEL: usize = 2;

// ── Appearance ────────────────────────────────────────────────────────────────

const BACKGROUND: Color = Color::rgb(240, 240, 240);
const FOREGROUND: Color = Color::rgb(0, 0, 0);
const UI_FONT_FACE: PCWSTR = w!("Microsoft YaHei");
const UI_FONT_HEIGHT: i32 = 24;

/// Per-call GDI resources: background brush and UI font.
pub(crate) struct DialogTheme {
    brush: HBRUSH,
    font: HFONT,
}

impl DialogTheme {
    pub(crate) fn new() -> Result<Self> {
        // SAFETY: CreateSolidBrush has no preconditions; a null result is
        // checked below.
        let brush = unsafe { CreateSolidBrush(COLORREF(BACKGROUND.to_colorref())) };
        if brush.is_invalid() {
            return Err(last_error("CreateSolidBrush"));
        }

        // SAFETY: all arguments are plain values; UI_FONT_FACE is a valid
        // NUL-terminated literal.  A null font is tolerated: controls then
        // keep the system font.
        let font = unsafe {
            CreateFontW(
                UI_FONT_HEIGHT,
                0,
                0,
                0,
                FW_NORMAL.0 as i32,
                0,
                0,
                0,
                DEFAULT_CHARSET.0 as u32,
                OUT_DEFAULT_PRECIS.0 as u32,
                CLIP_DEFAULT_PRECIS.0 as u32,
                CLEARTYPE_QUALITY.0 as u32,
                (DEFAULT_PITCH.0 | FF_DONTCARE.0) as u32,
                UI_FONT_FACE,
            )
        };
        if font.is_invalid() {
            debug!("CreateFontW failed; using the system font");
        }

        Ok(Self { brush, font })
    }

    pub(crate) fn brush(&self) -> HBRUSH {
        self.brush
    }

    /// Give `control` the dialog font.
    pub(crate) fn apply_font(&self, control: HWND) {
        if self.font.is_invalid() {
            return;
        }
        // SAFETY: `control` is a live child window; WM_SETFONT borrows the
        // font, which outlives the window (dropped after the loop ends).
        unsafe {
            SendMessageW(control, WM_SETFONT, WPARAM(self.font.0 as usize), LPARAM(1));
        }
    }

    /// Answer a WM_CTLCOLOR* message: grey background, black text.
    pub(crate) fn color_control(&self, wparam: WPARAM) -> LRESULT {
        let hdc = HDC(wparam.0 as *mut c_void);
        // SAFETY: for WM_CTLCOLOR* messages WPARAM is the control's HDC,
        // valid for the duration of the message.
        unsafe {
            SetBkColor(hdc, COLORREF(BACKGROUND.to_colorref()));
            SetTextColor(hdc, COLORREF(FOREGROUND.to_colorref()));
        }
        LRESULT(self.brush.0 as isize)
    }
}

impl Drop for DialogTheme {
    fn drop(&mut self) {
        // SAFETY: both objects were created in `new`, are no longer selected
        // into any DC, and are deleted exactly once.
        unsafe {
            if !self.font.is_invalid() {
                let _ = DeleteObject(HGDIOBJ(self.font.0));
            }
            let _ = DeleteObject(HGDIOBJ(self.brush.0));
        }
    }
}

// ── Window class registration ─────────────────────────────────────────────────

/// A window class registered for the duration of one dialog call.
struct ClassRegistration {
    name: PCWSTR,
    hinstance: HINSTANCE,
}

impl ClassRegistration {
    fn register(name: PCWSTR, wnd_proc: WNDPROC, hinstance: HINSTANCE, background: HBRUSH) -> Result<Self> {
        // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
        // a built-in resource guaranteed to exist on all Windows versions.
        let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }
            .map_err(|e| win32_error("LoadCursorW", &e))?;

        let wndclass = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: wnd_proc,
            hInstance: hinstance,
            hCursor: cursor,
            hbrBackground: background,
            lpszClassName: name,
            ..Default::default()
        };

        // SAFETY: wndclass is fully initialised with valid handles; `name`
        // is a valid null-terminated UTF-16 string literal.
        let atom = unsafe { RegisterClassExW(&wndclass) };
        if atom == 0 {
            return Err(last_error("RegisterClassExW"));
        }

        Ok(Self { name, hinstance })
    }
}

impl Drop for ClassRegistration {
    fn drop(&mut self) {
        // SAFETY: the class was registered in `register` and every window of
        // it has been destroyed by the time the registration is dropped.
        if let Err(e) = unsafe { UnregisterClassW(self.name, self.hinstance) } {
            debug!("UnregisterClassW failed: {e}");
        }
    }
}

// ── Modal driver ──────────────────────────────────────────────────────────────

/// State a modal window procedure keeps for one invocation.
///
/// The procedure only ever sees `&Self`; anything it changes lives in cells.
pub(crate) trait ModalContext {
    /// `true` once WM_DESTROY has been handled.
    fn is_destroyed(&self) -> bool;
    /// Brush used as the class background.
    fn background(&self) -> HBRUSH;
    /// An error raised inside the window procedure, typically while
    /// creating controls in WM_CREATE.
    fn take_failure(&self) -> Option<DialogError>;
}

/// How to create one modal popup.
pub(crate) struct ModalSpec<'a> {
    pub(crate) class_name: PCWSTR,
    pub(crate) wnd_proc: WNDPROC,
    pub(crate) title: &'a str,
    /// Outer window size.
    pub(crate) size: (i32, i32),
    pub(crate) owner: HWND,
}

/// Create the popup described by `spec`, run it modally and return the
/// context once the window is gone.
///
/// The window procedure must fetch `context` with [`window_context`], set
/// its destroyed flag on WM_DESTROY and clear the pointer on WM_NCDESTROY.
/// A failure the procedure recorded takes precedence over the generic
/// `CreateWindowExW` error it causes.
pub(crate) fn show_modal<C: ModalContext>(spec: &ModalSpec<'_>, context: C) -> Result<C> {
    let title = to_wide_checked(spec.title, "title")?;
    let hinstance = module_instance()?;
    let _class = ClassRegistration::register(
        spec.class_name,
        spec.wnd_proc,
        hinstance,
        context.background(),
    )?;

    // SAFETY: GetSystemMetrics takes plain indices and never fails.
    let screen = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
    let (x, y) = centered_origin(screen, spec.size);

    let context = Box::into_raw(Box::new(context));

    // SAFETY: the class was just registered; `title` outlives the call.
    // `context` is a live heap allocation that the window procedure borrows
    // (shared only) for the window's lifetime.
    let created = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            spec.class_name,
            PCWSTR(title.as_ptr()),
            WS_POPUP | WS_CAPTION | WS_SYSMENU | WINDOW_STYLE(DS_MODALFRAME as u32),
            x,
            y,
            spec.size.0,
            spec.size.1,
            spec.owner,
            HMENU::default(),
            hinstance,
            Some(context as *const c_void),
        )
    };

    let outcome = match created {
        // SAFETY: `context` stays allocated until after the loop returns.
        Ok(hwnd) => run_modal_loop(hwnd, spec.owner, || unsafe { (*context).is_destroyed() }),
        Err(e) => Err(win32_error("CreateWindowExW", &e)),
    };

    // SAFETY: the window no longer exists (or was never created), so the
    // window procedure can no longer reach `context`; reclaim it exactly once.
    let context = unsafe { Box::from_raw(context) };
    if let Some(failure) = context.take_failure() {
        return Err(failure);
    }
    outcome.map(|()| *context)
}

/// Pump messages until `done` reports the dialog destroyed.
fn run_modal_loop(hwnd: HWND, owner: HWND, done: impl Fn() -> bool) -> Result<()> {
    let _owner = DisabledOwner::disable(owner);

    // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
    // ShowWindow returns the previous visibility state; UpdateWindow returns
    // a success BOOL; neither matters here.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }

    let mut msg = MSG::default();
    let mut result = Ok(());

    while !done() {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            -1 => {
                result = Err(last_error("GetMessageW"));
                break;
            }
            0 => {
                // WM_QUIT belongs to the host's loop; put it back and leave.
                debug!("WM_QUIT during modal dialog; re-posting");
                // SAFETY: always safe; re-posts WM_QUIT with the same code.
                unsafe { PostQuitMessage(msg.wParam.0 as i32) };
                break;
            }
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                // IsDialogMessageW gives Tab / Enter / Escape handling.
                if !IsDialogMessageW(hwnd, &msg).as_bool() {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            },
        }
    }

    // SAFETY: IsWindow accepts any handle value.
    if unsafe { IsWindow(hwnd) }.as_bool() {
        // Loop left early.
        destroy(hwnd);
    }

    result
}

/// Keeps the owner window disabled while a modal dialog is up.
///
/// [`destroy`] re-enables the owner before the dialog goes away; dropping
/// the guard covers every other exit and reactivates the owner.
struct DisabledOwner(HWND);

impl DisabledOwner {
    fn disable(owner: HWND) -> Option<Self> {
        if owner.is_invalid() {
            return None;
        }
        // SAFETY: `owner` is a window handle provided by the caller.
        unsafe {
            let _ = EnableWindow(owner, FALSE);
        }
        Some(Self(owner))
    }
}

impl Drop for DisabledOwner {
    fn drop(&mut self) {
        // SAFETY: re-enables the window disabled in `disable`.
        unsafe {
            let _ = EnableWindow(self.0, TRUE);
            let _ = SetActiveWindow(self.0);
        }
    }
}

// ── Window procedure helpers ──────────────────────────────────────────────────

/// Fetch the per-window context, attaching it on WM_NCCREATE.
///
/// Returns `None` for the few messages that precede WM_NCCREATE and for any
/// message after WM_NCDESTROY cleared the slot.  Messages nest (child
/// creation, DestroyWindow), so several of these references can be live at
/// once; they are shared, and the context keeps its mutable state in cells.
///
/// # Safety
///
/// `hwnd`, `msg` and `lparam` must be the arguments of a window procedure
/// whose window was created by [`show_modal`] with a `C` context.  The
/// returned reference must not outlive the message being handled.
pub(crate) unsafe fn window_context<'a, C>(hwnd: HWND, msg: u32, lparam: LPARAM) -> Option<&'a C> {
    let context = if msg == WM_NCCREATE {
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        let context = create.lpCreateParams as *const C;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, context as isize);
        context
    } else {
        GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const C
    };
    // `show_modal` keeps the context allocated until the window is gone.
    context.as_ref()
}

/// Forget the context pointer; call on WM_NCDESTROY.
pub(crate) fn detach_context(hwnd: HWND) {
    // SAFETY: hwnd is the window being destroyed; clearing its user data
    // has no other effect.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
    }
}

/// Create a visible child control at `bounds`.
pub(crate) fn create_control(
    parent: HWND,
    class: PCWSTR,
    text: PCWSTR,
    style: WINDOW_STYLE,
    ex_style: WINDOW_EX_STYLE,
    id: usize,
    bounds: Bounds,
) -> Result<HWND> {
    let hinstance = module_instance()?;
    // SAFETY: `parent` is the window currently handling WM_CREATE; `class`
    // and `text` are NUL-terminated and outlive the call.  For child
    // windows HMENU carries the control ID.
    unsafe {
        CreateWindowExW(
            ex_style,
            class,
            text,
            WS_CHILD | WS_VISIBLE | style,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            parent,
            HMENU(id as *mut c_void),
            hinstance,
            None,
        )
    }
    .map_err(|e| win32_error("CreateWindowExW", &e))
}

/// Move and resize a child control.
pub(crate) fn place(control: HWND, bounds: Bounds) {
    // SAFETY: `control` is a live child window; failure only leaves it where
    // it was.
    unsafe {
        let _ = SetWindowPos(
            control,
            HWND::default(),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            SWP_NOZORDER,
        );
    }
}

/// Current client size of `hwnd`.
pub(crate) fn client_size(hwnd: HWND) -> (i32, i32) {
    let mut rect = RECT::default();
    // SAFETY: `rect` is a valid out-pointer; on failure it stays zeroed.
    unsafe {
        let _ = GetClientRect(hwnd, &mut rect);
    }
    (rect.right - rect.left, rect.bottom - rect.top)
}

/// Close a dialog window.
///
/// The owner is enabled first: if it is still disabled when the dialog
/// disappears, Windows activates some other application instead.
/// DestroyWindow re-enters the window procedure, so callers must not hold
/// a borrow of the context's state across this call.
pub(crate) fn destroy(hwnd: HWND) {
    // SAFETY: hwnd is a dialog created by `show_modal`; GetWindow only reads
    // the owner link and EnableWindow on a live owner has no other effect.
    // DestroyWindow sends WM_DESTROY / WM_NCDESTROY synchronously.
    unsafe {
        if let Ok(owner) = GetWindow(hwnd, GW_OWNER) {
            if !owner.is_invalid() {
                let _ = EnableWindow(owner, TRUE);
            }
        }
        let _ = DestroyWindow(hwnd);
    }
}

/// Low word of WPARAM (command / control identifier).
pub(crate) fn loword(wparam: WPARAM) -> usize {
    wparam.0 & 0xFFFF
}

/// Client width and height from a WM_SIZE LPARAM.
pub(crate) fn size_from_lparam(lparam: LPARAM) -> (i32, i32) {
    ((lparam.0 & 0xFFFF) as i32, ((lparam.0 >> 16) & 0xFFFF) as i32)
}

// ── Error helpers ─────────────────────────────────────────────────────────────

fn module_instance() -> Result<HINSTANCE> {
    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(|e| win32_error("GetModuleHandleW", &e))?;
    Ok(HINSTANCE(hmodule.0))
}

/// Name the failing function on a windows-crate error.
pub(crate) fn win32_error(function: &'static str, e: &windows::core::Error) -> DialogError {
    DialogError::Win32 {
        function,
        code: e.code().0 as u32,
    }
}

/// Capture the current Win32 last-error code and wrap it in a `DialogError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(crate) fn last_error(function: &'static str) -> DialogError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    DialogError::Win32 {
        function,
        code: code.0,
    }
}

#[cfg(test)]
mod tests {
    use windows::Win32::UI::{
        Input::KeyboardAndMouse::IsWindowEnabled,
        WindowsAndMessaging::{DefWindowProcW, WM_CREATE, WM_NCDESTROY},
    };

    use super::*;
    use crate::modal::ModalSession;

    #[test]
    fn theme_creates_brush_and_font() {
        let theme = DialogTheme::new().expect("theme");
        assert!(!theme.brush().is_invalid());
        assert!(!theme.font.is_invalid());
    }

    fn plain_window(owner: HWND) -> HWND {
        let hinstance = module_instance().expect("module handle");
        // SAFETY: STATIC is a system class; no creation data is passed.
        unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                w!("STATIC"),
                w!(""),
                WS_POPUP,
                0,
                0,
                10,
                10,
                owner,
                HMENU::default(),
                hinstance,
                None,
            )
        }
        .expect("CreateWindowExW")
    }

    #[test]
    fn destroy_enables_owner_first() {
        let owner = plain_window(HWND::default());
        let dialog = plain_window(owner);
        // SAFETY: `owner` was just created on this thread.
        unsafe {
            let _ = EnableWindow(owner, FALSE);
        }

        destroy(dialog);

        // SAFETY: both handles came from `plain_window`; IsWindow and
        // IsWindowEnabled accept stale handles.
        unsafe {
            assert!(!IsWindow(dialog).as_bool());
            assert!(IsWindowEnabled(owner).as_bool());
            let _ = DestroyWindow(owner);
        }
    }

    // ── Failure reporting ─────────────────────────────────────────────────────

    struct FailingContext {
        session: ModalSession<()>,
    }

    impl ModalContext for FailingContext {
        fn is_destroyed(&self) -> bool {
            self.session.is_destroyed()
        }

        fn background(&self) -> HBRUSH {
            HBRUSH::default()
        }

        fn take_failure(&self) -> Option<DialogError> {
            self.session.take_failure()
        }
    }

    // SAFETY: registered only by `show_modal` below with a `FailingContext`.
    unsafe extern "system" fn failing_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        let Some(context) = window_context::<FailingContext>(hwnd, msg, lparam) else {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        };
        match msg {
            WM_CREATE => {
                context.session.fail(DialogError::InteriorNul {
                    what: "option label",
                });
                LRESULT(-1)
            }
            WM_NCDESTROY => {
                detach_context(hwnd);
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn failing_spec(title: &str) -> ModalSpec<'_> {
        ModalSpec {
            class_name: w!("CommdlgFailingWindow"),
            wnd_proc: Some(failing_proc),
            title,
            size: (120, 80),
            owner: HWND::default(),
        }
    }

    #[test]
    fn creation_failure_reaches_caller() {
        let context = FailingContext {
            session: ModalSession::new(),
        };
        let err = show_modal(&failing_spec("Broken"), context)
            .err()
            .expect("window creation must fail");
        assert!(matches!(
            err,
            DialogError::InteriorNul {
                what: "option label"
            }
        ));
    }

    #[test]
    fn nul_in_title_is_rejected() {
        let context = FailingContext {
            session: ModalSession::new(),
        };
        let err = show_modal(&failing_spec("Bad\0title"), context)
            .err()
            .expect("title must be rejected");
        assert!(matches!(err, DialogError::InteriorNul { what: "title" }));
    }
}
