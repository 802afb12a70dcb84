//! FilterInput — wraps tui-input for the filter box in the controls row.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthChar;

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

pub const PLACEHOLDER: &str = "Filter by channel, artist, or song...";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc clears a non-empty input and stays open; on an empty input it
    /// closes the filter.  Enter keeps the text and closes.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    FilterAction::Changed(String::new())
                } else {
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    // Cursor movement only.
                    FilterAction::None
                } else {
                    FilterAction::Changed(self.input.value().to_string())
                }
            }
        }
    }

    /// Render the input into a single row.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(inner_width);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(format!(" {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            Span::styled(
                format!(" {}", skip_columns(value, scroll)),
                Style::default().fg(C_FILTER_FG),
            )
        };

        let paragraph = Paragraph::new(Line::from(display)).style(Style::default().bg(C_FILTER_BG));
        frame.render_widget(paragraph, area);

        if self.active && area.width > 0 {
            let cursor_x = area.x + 1 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

/// Drop leading characters until `columns` display columns are consumed.
fn skip_columns(value: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in value.char_indices() {
        if used >= columns {
            return &value[idx..];
        }
        used += ch.width().unwrap_or(0);
    }
    ""
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new(PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut FilterInput, s: &str) -> Vec<FilterAction> {
        s.chars().map(|c| input.handle_key(key(KeyCode::Char(c)))).collect()
    }

    #[test]
    fn test_every_edit_emits_changed() {
        let mut input = FilterInput::default();
        input.activate();
        let actions = type_str(&mut input, "ro");
        assert_eq!(
            actions,
            [
                FilterAction::Changed("r".into()),
                FilterAction::Changed("ro".into())
            ]
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Backspace)),
            FilterAction::Changed("r".into())
        );
    }

    #[test]
    fn test_cursor_keys_do_not_emit_changed() {
        let mut input = FilterInput::default();
        type_str(&mut input, "ab");
        assert_eq!(input.handle_key(key(KeyCode::Left)), FilterAction::None);
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_esc_clears_then_closes() {
        let mut input = FilterInput::default();
        input.activate();
        type_str(&mut input, "jazz");
        assert_eq!(input.handle_key(key(KeyCode::Esc)), FilterAction::Changed(String::new()));
        assert!(input.is_active());
        assert_eq!(input.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled);
        assert!(!input.is_active());
    }

    #[test]
    fn test_enter_keeps_text() {
        let mut input = FilterInput::default();
        input.activate();
        type_str(&mut input, "miles");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), FilterAction::Confirmed);
        assert!(!input.is_active());
        assert_eq!(input.text(), "miles");
    }

    #[test]
    fn test_skip_columns_handles_wide_chars() {
        assert_eq!(skip_columns("abc", 1), "bc");
        assert_eq!(skip_columns("日本語", 2), "本語");
        assert_eq!(skip_columns("ab", 5), "");
    }
}
