//! Header — 2-row top bar.
//!
//! Row 1: application title | channel counts and last refresh time (or a
//! spinner while a refresh is running).
//! Row 2: key instructions.
//!
//! Not focusable.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_KEY_HINT, C_PRIMARY, C_SECONDARY};

pub const TITLE: &str = "WPN — What's Playing Now";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let row1 = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(title_line()), row1);
        frame.render_widget(
            Paragraph::new(summary_line(state)).alignment(Alignment::Right),
            row1,
        );

        if area.height >= 2 {
            let row2 = Rect {
                y: area.y + 1,
                height: 1,
                ..area
            };
            frame.render_widget(Paragraph::new(instructions_line()), row2);
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

fn title_line() -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", TITLE),
        Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn summary_line(state: &AppState) -> Line<'static> {
    let session = &state.session;
    let counts = format!(
        "{}/{} channels",
        session.visible().len(),
        session.snapshot().usable_count()
    );
    let when = if session.is_refreshing() {
        Span::styled(
            format!("{} refreshing… ", state.spinner),
            Style::default().fg(C_KEY_HINT),
        )
    } else {
        match session.last_refreshed() {
            Some(ts) => Span::styled(
                format!("updated {} ", ts.format("%H:%M:%S")),
                Style::default().fg(C_SECONDARY),
            ),
            None => Span::styled("never updated ", Style::default().fg(C_SECONDARY)),
        }
    };
    Line::from(vec![
        Span::styled(counts, Style::default().fg(C_PRIMARY)),
        Span::styled("  ·  ", Style::default().fg(C_SECONDARY)),
        when,
    ])
}

/// `Press q to quit, r to refresh, f to focus filter`, key letters lit.
fn instructions_line() -> Line<'static> {
    let text = Style::default().fg(C_SECONDARY);
    let key = Style::default().fg(C_KEY_HINT).add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled(" Press ", text),
        Span::styled("q", key),
        Span::styled(" to quit, ", text),
        Span::styled("r", key),
        Span::styled(" to refresh, ", text),
        Span::styled("f", key),
        Span::styled(" to focus filter", text),
    ])
}
