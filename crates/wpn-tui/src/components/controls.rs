//! Controls row — `Filter:` label, the filter input and a `[ Refresh ]` button.
//!
//! Focusing this component opens the filter; every edit becomes a
//! `FilterChanged` action.  The button only reacts to mouse clicks.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::action::Action;
use crate::app_state::AppState;
use crate::component::{hit, Component};
use crate::theme::{C_BUTTON_BG, C_MUTED, C_PRIMARY, C_SECONDARY};
use crate::widgets::filter_input::{FilterAction, FilterInput};

const LABEL: &str = " Filter: ";
const BUTTON: &str = "[ Refresh ]";

/// Sub-areas of the controls row.
struct ControlsLayout {
    label: Rect,
    input: Rect,
    button: Rect,
}

fn split(area: Rect) -> ControlsLayout {
    let row = Rect {
        height: area.height.min(1),
        ..area
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LABEL.len() as u16),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(BUTTON.len() as u16),
            Constraint::Length(1),
        ])
        .split(row);
    ControlsLayout {
        label: cols[0],
        input: cols[1],
        button: cols[3],
    }
}

pub struct Controls {
    filter: FilterInput,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            filter: FilterInput::default(),
        }
    }

    #[cfg(test)]
    pub fn filter_text(&self) -> &str {
        self.filter.text()
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Controls {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if !self.filter.is_active() {
            return vec![];
        }
        match self.filter.handle_key(key) {
            FilterAction::Changed(text) => vec![Action::FilterChanged(text)],
            FilterAction::Confirmed | FilterAction::Cancelled => vec![Action::CloseFilter],
            FilterAction::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let layout = split(area);
        if hit(layout.button, event.column, event.row) {
            return vec![Action::Refresh];
        }
        if hit(layout.input, event.column, event.row) || hit(layout.label, event.column, event.row)
        {
            return vec![Action::OpenFilter];
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenFilter => self.filter.activate(),
            Action::CloseFilter => self.filter.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let layout = split(area);
        let label_style = if focused {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        frame.render_widget(Paragraph::new(Span::styled(LABEL, label_style)), layout.label);
        self.filter.draw(frame, layout.input);

        let button_style = if state.session.is_refreshing() {
            Style::default().fg(C_MUTED).bg(C_BUTTON_BG)
        } else {
            Style::default()
                .fg(C_PRIMARY)
                .bg(C_BUTTON_BG)
                .add_modifier(Modifier::BOLD)
        };
        frame.render_widget(Paragraph::new(Span::styled(BUTTON, button_style)), layout.button);
    }
}
