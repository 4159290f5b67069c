// ── Prompt dialog ─────────────────────────────────────────────────────────────
//
// A small modal window asking for one line of text: a label, an edit box
// and OK / Cancel.  The lifecycle lives in `modal::ModalState`; this file
// only translates window messages into `ModalEvent`s.

#![allow(unsafe_code)]

use std::cell::OnceCell;

use log::{debug, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::HBRUSH,
        UI::WindowsAndMessaging::{
            DefWindowProcW, GetWindowTextLengthW, GetWindowTextW, BS_DEFPUSHBUTTON,
            BS_PUSHBUTTON, ES_AUTOHSCROLL, SS_LEFT, WINDOW_EX_STYLE, WINDOW_STYLE, WM_CLOSE,
            WM_COMMAND, WM_CREATE, WM_CTLCOLORBTN, WM_CTLCOLOREDIT, WM_CTLCOLORSTATIC,
            WM_DESTROY, WM_NCDESTROY, WM_SHOWWINDOW, WM_SIZE, WS_EX_CLIENTEDGE, WS_TABSTOP,
        },
    },
};

use super::window::{
    client_size, create_control, destroy, detach_context, loword, place, show_modal,
    size_from_lparam, window_context, DialogTheme, ModalContext, ModalSpec, ID_CANCEL, ID_OK,
};
use crate::{
    encoding::{from_wide, to_wide_checked},
    error::{DialogError, Result},
    modal::{ModalEvent, ModalSession, PromptLayout, PROMPT_WINDOW_SIZE},
};

const CLASS_NAME: PCWSTR = w!("CommdlgPromptDialog");

const ID_LABEL: usize = 1001;
const ID_INPUT: usize = 1002;

/// Ask the user for a line of text.
///
/// `message` is shown above the edit box, which starts out holding
/// `default_content`.  Returns `Some(text)` when the user presses OK (the
/// text may be empty) and `None` on Cancel or when the window is closed.
/// Blocks until the dialog is dismissed; `owner` is disabled meanwhile.
pub fn prompt_dialog(
    title: &str,
    message: &str,
    default_content: &str,
    owner: HWND,
) -> Result<Option<String>> {
    let context = PromptContext {
        message: to_wide_checked(message, "message")?,
        default_content: to_wide_checked(default_content, "default content")?,
        theme: DialogTheme::new()?,
        controls: OnceCell::new(),
        session: ModalSession::new(),
    };

    let spec = ModalSpec {
        class_name: CLASS_NAME,
        wnd_proc: Some(prompt_proc),
        title,
        size: PROMPT_WINDOW_SIZE,
        owner,
    };

    debug!("prompt dialog {title:?}");
    let context = show_modal(&spec, context)?;

    context
        .session
        .into_state()
        .into_confirmed()
        .map(|wide| from_wide(&wide))
        .transpose()
}

// ── Per-call context ──────────────────────────────────────────────────────────

struct PromptControls {
    label: HWND,
    input: HWND,
    ok: HWND,
    cancel: HWND,
}

struct PromptContext {
    message: Vec<u16>,
    default_content: Vec<u16>,
    theme: DialogTheme,
    controls: OnceCell<PromptControls>,
    /// The confirmed value is the raw edit text; it is decoded after the
    /// window is gone so that conversion errors reach the caller.
    session: ModalSession<Vec<u16>>,
}

impl ModalContext for PromptContext {
    fn is_destroyed(&self) -> bool {
        self.session.is_destroyed()
    }

    fn background(&self) -> HBRUSH {
        self.theme.brush()
    }

    fn take_failure(&self) -> Option<DialogError> {
        self.session.take_failure()
    }
}

impl PromptContext {
    fn create_controls(&self, hwnd: HWND) -> Result<()> {
        let (width, height) = client_size(hwnd);
        let layout = PromptLayout::compute(width, height);
        let no_ex = WINDOW_EX_STYLE(0);

        let label = create_control(
            hwnd,
            w!("STATIC"),
            PCWSTR(self.message.as_ptr()),
            WINDOW_STYLE(SS_LEFT.0),
            no_ex,
            ID_LABEL,
            layout.label,
        )?;
        let input = create_control(
            hwnd,
            w!("EDIT"),
            PCWSTR(self.default_content.as_ptr()),
            WS_TABSTOP | WINDOW_STYLE(ES_AUTOHSCROLL as u32),
            WS_EX_CLIENTEDGE,
            ID_INPUT,
            layout.input,
        )?;
        let ok = create_control(
            hwnd,
            w!("BUTTON"),
            w!("OK"),
            WS_TABSTOP | WINDOW_STYLE(BS_DEFPUSHBUTTON as u32),
            no_ex,
            ID_OK,
            layout.ok,
        )?;
        let cancel = create_control(
            hwnd,
            w!("BUTTON"),
            w!("Cancel"),
            WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32),
            no_ex,
            ID_CANCEL,
            layout.cancel,
        )?;

        for control in [label, input, ok, cancel] {
            self.theme.apply_font(control);
        }
        // WM_CREATE arrives once per window.
        let _ = self.controls.set(PromptControls {
            label,
            input,
            ok,
            cancel,
        });
        Ok(())
    }

    fn layout(&self, width: i32, height: i32) {
        let Some(controls) = self.controls.get() else {
            return;
        };
        let layout = PromptLayout::compute(width, height);
        place(controls.label, layout.label);
        place(controls.input, layout.input);
        place(controls.ok, layout.ok);
        place(controls.cancel, layout.cancel);
    }

    /// Current contents of the edit box, without a length cap.
    fn input_text(&self) -> Vec<u16> {
        let Some(controls) = self.controls.get() else {
            return Vec::new();
        };
        // SAFETY: `input` is a live child of the dialog; the buffer is sized
        // from GetWindowTextLengthW plus the terminator and GetWindowTextW
        // writes at most `buf.len()` WCHARs.
        unsafe {
            let len = GetWindowTextLengthW(controls.input).max(0) as usize;
            let mut buf = vec![0u16; len + 1];
            let copied = GetWindowTextW(controls.input, &mut buf).max(0) as usize;
            buf.truncate(copied);
            buf
        }
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: prompt_proc is registered as lpfnWndProc for CLASS_NAME and its
// windows are only created by `show_modal` with a `PromptContext`.  Windows
// guarantees that hwnd, msg, wparam, and lparam are valid for the lifetime
// of this call.
unsafe extern "system" fn prompt_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // SAFETY: the context outlives the window (see `show_modal`).  Nested
    // messages get their own shared reference; the mutable parts are cells
    // and no cell borrow is held across a call that re-enters this procedure.
    let Some(context) = window_context::<PromptContext>(hwnd, msg, lparam) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CREATE => match context.create_controls(hwnd) {
            Ok(()) => LRESULT(0),
            Err(e) => {
                // -1 aborts creation; `show_modal` returns the recorded error.
                warn!("prompt dialog: creating controls failed: {e}");
                context.session.fail(e);
                LRESULT(-1)
            }
        },

        WM_SHOWWINDOW => {
            if wparam.0 != 0 {
                context.session.dispatch(ModalEvent::Shown);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_CLOSE => {
            context.session.close_with(ModalEvent::Cancel, || destroy(hwnd));
            LRESULT(0)
        }

        WM_DESTROY => {
            context.session.mark_destroyed();
            LRESULT(0)
        }

        WM_NCDESTROY => {
            detach_context(hwnd);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            let (width, height) = size_from_lparam(lparam);
            context.layout(width, height);
            LRESULT(0)
        }

        // ── Commands ──────────────────────────────────────────────────────────
        WM_COMMAND => {
            match loword(wparam) {
                ID_OK => {
                    let text = context.input_text();
                    context
                        .session
                        .close_with(ModalEvent::Confirm(text), || destroy(hwnd));
                }
                ID_CANCEL => {
                    context.session.close_with(ModalEvent::Cancel, || destroy(hwnd));
                }
                _ => {}
            }
            LRESULT(0)
        }

        // ── Painting ──────────────────────────────────────────────────────────
        WM_CTLCOLOREDIT | WM_CTLCOLORSTATIC | WM_CTLCOLORBTN => context.theme.color_control(wparam),

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_in_title_is_rejected_before_any_window() {
        let err = prompt_dialog("Rename\0", "New name:", "", HWND::default()).unwrap_err();
        assert!(matches!(err, DialogError::InteriorNul { what: "title" }));
    }

    #[test]
    fn nul_in_default_content_is_rejected() {
        let err = prompt_dialog("Rename", "New name:", "a\0b", HWND::default()).unwrap_err();
        assert!(matches!(
            err,
            DialogError::InteriorNul {
                what: "default content"
            }
        ));
    }
}
