//! Component trait — the interface every UI panel implements.
//!
//! - Components own their view state and render themselves.
//! - They read the session through `AppState` and never mutate it.
//! - They return `Vec<Action>`; the App event loop applies them.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Handle a key event. Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Handle a mouse event that landed inside `area`.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action>;

    /// Receive an action dispatched by the App, focused or not.
    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action>;

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}

/// Whether the cell at (`col`, `row`) lies inside `r`.
pub fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0 && r.height > 0 && col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_edges() {
        let r = Rect::new(2, 3, 4, 1);
        assert!(hit(r, 2, 3));
        assert!(hit(r, 5, 3));
        assert!(!hit(r, 6, 3));
        assert!(!hit(r, 2, 4));
        assert!(!hit(Rect::new(2, 3, 0, 1), 2, 3));
    }
}
