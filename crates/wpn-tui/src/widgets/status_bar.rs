//! Status bar — the refresh status line and the keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_FILTER, C_MODE_NORMAL, C_MUTED, C_SECONDARY, C_TOAST_ERROR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " r refresh  f or / filter  ↑↓/jk scroll  PgUp/PgDn page  g/G top/bottom  Tab focus  q quit"
            }
            Self::Filter => " type to filter  Enter keep  Esc clear+close  Tab next pane  Ctrl-C quit",
        }
    }
}

/// One row: the last refresh problem, or the source when all is well.
pub fn draw_status_line(frame: &mut Frame, area: Rect, status: Option<&str>, source: &str) {
    let span = match status {
        Some(msg) => Span::styled(format!(" {}", msg), Style::default().fg(C_TOAST_ERROR)),
        None => Span::styled(format!(" source: {}", source), Style::default().fg(C_SECONDARY)),
    };
    frame.render_widget(Paragraph::new(Line::from(span)), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
