// ── Hand-built modal dialogs: state and layout ────────────────────────────────
//
// The prompt box and the option message box are plain top-level windows
// driven by their own message loop.  Everything about them that does not
// need a window handle lives here: the lifecycle state machine, the layout
// arithmetic recomputed on every WM_SIZE, and the option-box outcome rules.
// No `unsafe`; the Win32 side is in `platform::win32::{prompt, message_box}`.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::error::{DialogError, Result};

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Lifecycle of one modal dialog invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState<T> {
    /// Window created, not yet shown.
    Created,
    /// Shown and waiting for the user.
    AwaitingInput,
    /// The user confirmed; carries the captured value.
    Confirmed(T),
    /// Cancelled or closed without a choice.
    Cancelled,
}

/// Something that happened to the dialog window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent<T> {
    Shown,
    Confirm(T),
    Cancel,
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        Self::Created
    }
}

impl<T> ModalState<T> {
    /// Apply `event`, returning the next state.
    ///
    /// Terminal states absorb every event.  A confirmation that arrives
    /// before the dialog was shown is ignored.
    #[must_use]
    pub fn on(self, event: ModalEvent<T>) -> Self {
        match (self, event) {
            (Self::Created, ModalEvent::Shown) => Self::AwaitingInput,
            (Self::AwaitingInput, ModalEvent::Confirm(value)) => Self::Confirmed(value),
            (Self::Created | Self::AwaitingInput, ModalEvent::Cancel) => Self::Cancelled,
            (state, event) => {
                log::warn!(
                    "ignoring {} in state {}",
                    event.name(),
                    state.name()
                );
                state
            }
        }
    }

    /// Advance in place.
    pub fn apply(&mut self, event: ModalEvent<T>) {
        *self = std::mem::take(self).on(event);
    }

    /// `true` once the dialog has been confirmed or cancelled.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Cancelled)
    }

    /// The confirmed value, if any.
    pub fn into_confirmed(self) -> Option<T> {
        match self {
            Self::Confirmed(value) => Some(value),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::AwaitingInput => "AwaitingInput",
            Self::Confirmed(_) => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl<T> ModalEvent<T> {
    fn name(&self) -> &'static str {
        match self {
            Self::Shown => "Shown",
            Self::Confirm(_) => "Confirm",
            Self::Cancel => "Cancel",
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Per-window state of one modal dialog, shared with its window procedure.
///
/// Window procedures re-enter while a message is being handled (child
/// creation sends WM_PARENTNOTIFY, DestroyWindow sends WM_DESTROY), so the
/// session is only reached through `&self` and no borrow of the state is
/// held across a call back into the window system.
#[derive(Debug)]
pub struct ModalSession<T> {
    state: RefCell<ModalState<T>>,
    destroyed: Cell<bool>,
    failure: RefCell<Option<DialogError>>,
}

impl<T> Default for ModalSession<T> {
    fn default() -> Self {
        Self {
            state: RefCell::new(ModalState::Created),
            destroyed: Cell::new(false),
            failure: RefCell::new(None),
        }
    }
}

impl<T> ModalSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: ModalEvent<T>) {
        self.state.borrow_mut().apply(event);
    }

    /// Apply `event`, release the state, then run `teardown`.
    ///
    /// `teardown` is typically `DestroyWindow`, which re-enters the window
    /// procedure before it returns.
    pub fn close_with(&self, event: ModalEvent<T>, teardown: impl FnOnce()) {
        self.dispatch(event);
        teardown();
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().is_closed()
    }

    /// Record that WM_DESTROY arrived; ends the modal loop.
    pub fn mark_destroyed(&self) {
        self.destroyed.set(true);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Keep `error` for the caller.  Only the first failure is kept.
    pub fn fail(&self, error: DialogError) {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(error);
        }
    }

    pub fn take_failure(&self) -> Option<DialogError> {
        self.failure.borrow_mut().take()
    }

    pub fn into_state(self) -> ModalState<T> {
        self.state.into_inner()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A child control's position and size in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Left/right/top margin shared by both dialogs.
const MARGIN: i32 = 20;

/// Top-left origin for a window of `size` centred on a `screen`.
pub fn centered_origin(screen: (i32, i32), size: (i32, i32)) -> (i32, i32) {
    ((screen.0 - size.0) / 2, (screen.1 - size.1) / 2)
}

// ── Prompt layout ─────────────────────────────────────────────────────────────

/// Initial prompt window size (outer, including the frame).
pub const PROMPT_WINDOW_SIZE: (i32, i32) = (400, 180);

const PROMPT_LABEL_HEIGHT: i32 = 25;
const PROMPT_INPUT_TOP: i32 = 55;
const PROMPT_INPUT_HEIGHT: i32 = 30;
const PROMPT_BUTTON_SIZE: (i32, i32) = (80, 30);
const PROMPT_BUTTON_GAP: i32 = 20;
const PROMPT_BUTTON_BOTTOM: i32 = 15;

/// Control positions of the prompt dialog for a given client size.
///
/// The label and edit box stretch horizontally; the two buttons keep their
/// size, stay centred and hug the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLayout {
    pub label: Bounds,
    pub input: Bounds,
    pub ok: Bounds,
    pub cancel: Bounds,
}

impl PromptLayout {
    pub fn compute(client_width: i32, client_height: i32) -> Self {
        let inner_width = client_width - 2 * MARGIN;
        let (button_w, button_h) = PROMPT_BUTTON_SIZE;
        let button_y = client_height - button_h - PROMPT_BUTTON_BOTTOM;
        let start_x = (client_width - (button_w * 2 + PROMPT_BUTTON_GAP)) / 2;

        Self {
            label: Bounds::new(MARGIN, MARGIN, inner_width, PROMPT_LABEL_HEIGHT),
            input: Bounds::new(MARGIN, PROMPT_INPUT_TOP, inner_width, PROMPT_INPUT_HEIGHT),
            ok: Bounds::new(start_x, button_y, button_w, button_h),
            cancel: Bounds::new(
                start_x + button_w + PROMPT_BUTTON_GAP,
                button_y,
                button_w,
                button_h,
            ),
        }
    }
}

// ── Option box layout ─────────────────────────────────────────────────────────

/// Buttons per row in the option message box.
pub const OPTIONS_PER_ROW: usize = 3;

const OPTION_BUTTON_SIZE: (i32, i32) = (100, 30);
const OPTION_BUTTON_SPACING: i32 = 20;
const OPTION_ROW_PITCH: i32 = 40;
const OPTION_BOTTOM: i32 = 20;
const OPTION_LABEL_HEIGHT: i32 = 26;
const OPTION_BASE_HEIGHT: i32 = 140;

/// Outer window size for `count` options: three buttons wide, one extra
/// row pitch for every row beyond the first.
pub fn option_window_size(count: usize) -> (i32, i32) {
    let width = (OPTION_BUTTON_SIZE.0 + OPTION_BUTTON_SPACING) * OPTIONS_PER_ROW as i32 + MARGIN;
    let extra_rows = count.saturating_sub(1) / OPTIONS_PER_ROW;
    (width, OPTION_BASE_HEIGHT + OPTION_ROW_PITCH * extra_rows as i32)
}

/// Message label position in the option box.
pub fn option_label_bounds(client_width: i32) -> Bounds {
    Bounds::new(MARGIN, MARGIN, client_width - 2 * MARGIN, OPTION_LABEL_HEIGHT)
}

/// Button positions: rows of three, the first row at the bottom and later
/// rows stacked upward.
pub fn option_button_bounds(count: usize, client_height: i32) -> Vec<Bounds> {
    let (w, h) = OPTION_BUTTON_SIZE;
    let bottom_row_y = client_height - h - OPTION_BOTTOM;

    (0..count)
        .map(|i| {
            let col = (i % OPTIONS_PER_ROW) as i32;
            let row = (i / OPTIONS_PER_ROW) as i32;
            Bounds::new(
                MARGIN + col * (w + OPTION_BUTTON_SPACING),
                bottom_row_y - row * OPTION_ROW_PITCH,
                w,
                h,
            )
        })
        .collect()
}

// ── Option box outcome ────────────────────────────────────────────────────────

/// Returned when the option box was closed without picking anything.
pub const CLOSED_WITHOUT_SELECTION: i32 = 0;

/// Returned when the caller supplied no options; no window is created.
pub const NO_OPTIONS: i32 = -1;

/// One button of the option message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogOption {
    /// Value returned when this button is clicked.  Opaque to the dialog;
    /// avoid `0` and `-1`, which are reserved.
    pub id: i32,
    /// Button caption.
    pub label: String,
}

impl DialogOption {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Run an option box through `present` and map its final state to an id.
///
/// `present` shows the dialog and returns its final state, whose confirmed
/// value is the clicked button's index into `options`.  It is not called
/// at all for an empty option list.
pub fn choose_option<F>(options: &[DialogOption], present: F) -> Result<i32>
where
    F: FnOnce(&[DialogOption]) -> Result<ModalState<usize>>,
{
    if options.is_empty() {
        log::warn!("option box requested with no options");
        return Ok(NO_OPTIONS);
    }

    let state = present(options)?;
    Ok(state
        .into_confirmed()
        .and_then(|index| options.get(index))
        .map_or(CLOSED_WITHOUT_SELECTION, |option| option.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── State machine ─────────────────────────────────────────────────────────

    #[test]
    fn confirm_after_show_captures_value() {
        let state = ModalState::Created
            .on(ModalEvent::Shown)
            .on(ModalEvent::Confirm("hello"));
        assert!(state.is_closed());
        assert_eq!(state.into_confirmed(), Some("hello"));
    }

    #[test]
    fn cancel_yields_nothing() {
        let state: ModalState<&str> = ModalState::Created
            .on(ModalEvent::Shown)
            .on(ModalEvent::Cancel);
        assert_eq!(state, ModalState::Cancelled);
        assert_eq!(state.into_confirmed(), None);
    }

    #[test]
    fn terminal_states_absorb_events() {
        let mut state = ModalState::AwaitingInput;
        state.apply(ModalEvent::Confirm(1));
        state.apply(ModalEvent::Cancel);
        state.apply(ModalEvent::Confirm(2));
        assert_eq!(state, ModalState::Confirmed(1));
    }

    #[test]
    fn confirm_before_show_is_ignored() {
        let state = ModalState::Created.on(ModalEvent::Confirm(5));
        assert_eq!(state, ModalState::Created);
        assert!(!state.is_closed());
    }

    #[test]
    fn close_before_show_cancels() {
        let state: ModalState<()> = ModalState::Created.on(ModalEvent::Cancel);
        assert_eq!(state, ModalState::Cancelled);
    }

    // ── Session ───────────────────────────────────────────────────────────────

    #[test]
    fn new_session_is_open() {
        let session: ModalSession<()> = ModalSession::new();
        assert!(!session.is_closed());
        assert!(!session.is_destroyed());
        assert!(session.take_failure().is_none());
        assert_eq!(session.into_state(), ModalState::Created);
    }

    #[test]
    fn teardown_may_reenter_the_session() {
        let session = ModalSession::new();
        session.dispatch(ModalEvent::Shown);
        session.close_with(ModalEvent::Confirm(3), || {
            // DestroyWindow delivers WM_CLOSE / WM_DESTROY synchronously.
            assert!(session.is_closed());
            session.dispatch(ModalEvent::Cancel);
            session.mark_destroyed();
        });
        assert!(session.is_destroyed());
        assert_eq!(session.into_state(), ModalState::Confirmed(3));
    }

    #[test]
    fn first_failure_is_kept() {
        let session: ModalSession<usize> = ModalSession::new();
        session.fail(DialogError::InteriorNul { what: "option label" });
        session.fail(DialogError::Win32 {
            function: "CreateWindowExW",
            code: 5,
        });
        let err = session.take_failure().expect("failure recorded");
        assert!(matches!(err, DialogError::InteriorNul { what: "option label" }));
        assert!(session.take_failure().is_none());
    }

    // ── Layout ────────────────────────────────────────────────────────────────

    #[test]
    fn prompt_layout_stretches_and_centres() {
        let layout = PromptLayout::compute(384, 141);
        assert_eq!(layout.label, Bounds::new(20, 20, 344, 25));
        assert_eq!(layout.input, Bounds::new(20, 55, 344, 30));
        // (384 - 180) / 2 = 102; 141 - 30 - 15 = 96
        assert_eq!(layout.ok, Bounds::new(102, 96, 80, 30));
        assert_eq!(layout.cancel, Bounds::new(202, 96, 80, 30));
    }

    #[test]
    fn prompt_buttons_follow_bottom_edge() {
        let small = PromptLayout::compute(400, 150);
        let tall = PromptLayout::compute(400, 300);
        assert_eq!(tall.ok.y - small.ok.y, 150);
        assert_eq!(tall.ok.width, small.ok.width);
    }

    #[test]
    fn option_window_grows_per_extra_row() {
        assert_eq!(option_window_size(1), (380, 140));
        assert_eq!(option_window_size(3), (380, 140));
        assert_eq!(option_window_size(4), (380, 180));
        assert_eq!(option_window_size(7), (380, 220));
    }

    #[test]
    fn option_buttons_stack_upward() {
        let bounds = option_button_bounds(4, 100);
        assert_eq!(bounds[0], Bounds::new(20, 50, 100, 30));
        assert_eq!(bounds[1], Bounds::new(140, 50, 100, 30));
        assert_eq!(bounds[2], Bounds::new(260, 50, 100, 30));
        assert_eq!(bounds[3], Bounds::new(20, 10, 100, 30));
    }

    #[test]
    fn centred_origin() {
        assert_eq!(centered_origin((1920, 1080), (400, 180)), (760, 450));
    }

    // ── Option outcome ────────────────────────────────────────────────────────

    fn yes_no() -> Vec<DialogOption> {
        vec![DialogOption::new(7, "Yes"), DialogOption::new(8, "No")]
    }

    #[test]
    fn empty_options_never_present() {
        let id = choose_option(&[], |_| -> Result<ModalState<usize>> {
            panic!("no window may be created for an empty option list")
        })
        .unwrap();
        assert_eq!(id, NO_OPTIONS);
    }

    #[test]
    fn clicked_button_yields_its_id() {
        let id = choose_option(&yes_no(), |_| Ok(ModalState::Confirmed(0))).unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn closing_yields_zero() {
        let id = choose_option(&yes_no(), |_| Ok(ModalState::Cancelled)).unwrap();
        assert_eq!(id, CLOSED_WITHOUT_SELECTION);
    }

    #[test]
    fn out_of_range_index_counts_as_closed() {
        let id = choose_option(&yes_no(), |_| Ok(ModalState::Confirmed(9))).unwrap();
        assert_eq!(id, CLOSED_WITHOUT_SELECTION);
    }

    #[test]
    fn presenter_errors_propagate() {
        let err = choose_option(&yes_no(), |_| {
            Err(crate::DialogError::Win32 {
                function: "CreateWindowExW",
                code: 5,
            })
        })
        .unwrap_err();
        assert!(matches!(err, crate::DialogError::Win32 { .. }));
    }
}
