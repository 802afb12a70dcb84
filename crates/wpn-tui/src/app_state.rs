//! AppState — read-only data shared with every component.
//!
//! Owned by App; components receive `&AppState` in draw and handle_* calls.

use crate::session::Session;
use crate::widgets::status_bar::InputMode;
use crate::widgets::toast::SPINNER_FRAMES;

pub struct AppState {
    pub session: Session,
    pub input_mode: InputMode,
    /// Last refresh problem, cleared by the next applied refresh.
    pub status: Option<String>,
    /// Where snapshots come from, as the provider describes it.
    pub source: String,
    pub show_keys_bar: bool,
    /// Current spinner frame, advanced by the toast tick.
    pub spinner: &'static str,
}

impl AppState {
    pub fn new(source: String, show_keys_bar: bool) -> Self {
        Self {
            session: Session::new(),
            input_mode: InputMode::Normal,
            status: None,
            source,
            show_keys_bar,
            spinner: SPINNER_FRAMES[0],
        }
    }
}
