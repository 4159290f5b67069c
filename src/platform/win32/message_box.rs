// ── Option message box ────────────────────────────────────────────────────────
//
// A modal window with a one-line message and one button per caller-supplied
// option, laid out in rows of three from the bottom up.  Clicking a button
// confirms its index; the index → id mapping and the reserved return codes
// live in `modal::choose_option`.

#![allow(unsafe_code)]

use std::cell::OnceCell;

use log::{debug, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::HBRUSH,
        UI::WindowsAndMessaging::{
            DefWindowProcW, BS_PUSHBUTTON, SS_LEFT, SS_WORDELLIPSIS, WINDOW_EX_STYLE,
            WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CREATE, WM_CTLCOLORBTN, WM_CTLCOLORSTATIC,
            WM_DESTROY, WM_NCDESTROY, WM_SHOWWINDOW, WM_SIZE, WS_TABSTOP,
        },
    },
};

use super::window::{
    client_size, create_control, destroy, detach_context, loword, place, show_modal,
    size_from_lparam, window_context, DialogTheme, ModalContext, ModalSpec, ID_CANCEL,
};
use crate::{
    encoding::to_wide_checked,
    error::{DialogError, Result},
    modal::{
        choose_option, option_button_bounds, option_label_bounds, option_window_size,
        DialogOption, ModalEvent, ModalSession, ModalState,
    },
};

const CLASS_NAME: PCWSTR = w!("CommdlgOptionBox");

const ID_LABEL: usize = 1001;
/// Button `i` gets control ID `ID_FIRST_OPTION + i`.
const ID_FIRST_OPTION: usize = 2000;

/// Show `message` with one button per entry of `options` and wait for a
/// click.
///
/// Returns the clicked option's `id`, [`CLOSED_WITHOUT_SELECTION`] if the
/// window was closed (or Escape pressed) without a choice, and
/// [`NO_OPTIONS`] without showing anything when `options` is empty.
///
/// [`CLOSED_WITHOUT_SELECTION`]: crate::modal::CLOSED_WITHOUT_SELECTION
/// [`NO_OPTIONS`]: crate::modal::NO_OPTIONS
pub fn message_box(
    title: &str,
    message: &str,
    options: &[DialogOption],
    owner: HWND,
) -> Result<i32> {
    choose_option(options, |options| present(title, message, options, owner))
}

fn present(
    title: &str,
    message: &str,
    options: &[DialogOption],
    owner: HWND,
) -> Result<ModalState<usize>> {
    let context = OptionBoxContext {
        message: to_wide_checked(message, "message")?,
        labels: options
            .iter()
            .map(|o| to_wide_checked(&o.label, "option label"))
            .collect::<Result<_>>()?,
        theme: DialogTheme::new()?,
        controls: OnceCell::new(),
        session: ModalSession::new(),
    };

    let spec = ModalSpec {
        class_name: CLASS_NAME,
        wnd_proc: Some(option_box_proc),
        title,
        size: option_window_size(options.len()),
        owner,
    };

    debug!("option box {title:?} with {} options", options.len());
    show_modal(&spec, context).map(|context| context.session.into_state())
}

// ── Per-call context ──────────────────────────────────────────────────────────

struct OptionBoxContext {
    message: Vec<u16>,
    labels: Vec<Vec<u16>>,
    theme: DialogTheme,
    controls: OnceCell<OptionBoxControls>,
    /// Confirmed value is the clicked button's index.
    session: ModalSession<usize>,
}

struct OptionBoxControls {
    label: HWND,
    buttons: Vec<HWND>,
}

impl ModalContext for OptionBoxContext {
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

impl OptionBoxContext {
    fn create_controls(&self, hwnd: HWND) -> Result<()> {
        let (width, height) = client_size(hwnd);

        let label = create_control(
            hwnd,
            w!("STATIC"),
            PCWSTR(self.message.as_ptr()),
            WINDOW_STYLE(SS_LEFT.0 | SS_WORDELLIPSIS.0),
            WINDOW_EX_STYLE(0),
            ID_LABEL,
            option_label_bounds(width),
        )?;
        self.theme.apply_font(label);

        let bounds = option_button_bounds(self.labels.len(), height);
        let mut buttons = Vec::with_capacity(self.labels.len());
        for (i, (caption, bounds)) in self.labels.iter().zip(bounds).enumerate() {
            let button = create_control(
                hwnd,
                w!("BUTTON"),
                PCWSTR(caption.as_ptr()),
                WS_TABSTOP | WINDOW_STYLE(BS_PUSHBUTTON as u32),
                WINDOW_EX_STYLE(0),
                ID_FIRST_OPTION + i,
                bounds,
            )?;
            self.theme.apply_font(button);
            buttons.push(button);
        }

        // WM_CREATE arrives once per window.
        let _ = self.controls.set(OptionBoxControls { label, buttons });
        Ok(())
    }

    fn layout(&self, width: i32, height: i32) {
        let Some(controls) = self.controls.get() else {
            return;
        };
        place(controls.label, option_label_bounds(width));
        let bounds = option_button_bounds(controls.buttons.len(), height);
        for (&button, bounds) in controls.buttons.iter().zip(bounds) {
            place(button, bounds);
        }
    }

    /// Index of the option whose button has control ID `id`.
    fn option_index(&self, id: usize) -> Option<usize> {
        id.checked_sub(ID_FIRST_OPTION)
            .filter(|&index| index < self.labels.len())
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: option_box_proc is registered as lpfnWndProc for CLASS_NAME and
// its windows are only created by `show_modal` with an `OptionBoxContext`.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call.
unsafe extern "system" fn option_box_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // SAFETY: the context outlives the window (see `show_modal`).  Nested
    // messages get their own shared reference; the mutable parts are cells
    // and no cell borrow is held across a call that re-enters this procedure.
    let Some(context) = window_context::<OptionBoxContext>(hwnd, msg, lparam) else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        WM_CREATE => match context.create_controls(hwnd) {
            Ok(()) => LRESULT(0),
            Err(e) => {
                warn!("option box: creating controls failed: {e}");
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

        WM_SIZE => {
            let (width, height) = size_from_lparam(lparam);
            context.layout(width, height);
            LRESULT(0)
        }

        WM_COMMAND => {
            let id = loword(wparam);
            if let Some(index) = context.option_index(id) {
                context
                    .session
                    .close_with(ModalEvent::Confirm(index), || destroy(hwnd));
            } else if id == ID_CANCEL {
                // Escape, via IsDialogMessageW.
                context.session.close_with(ModalEvent::Cancel, || destroy(hwnd));
            }
            LRESULT(0)
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

        WM_CTLCOLORSTATIC | WM_CTLCOLORBTN => context.theme.color_control(wparam),

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
