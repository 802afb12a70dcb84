//! Toast notifications — transient messages in the top-right corner.
//!
//! A refresh shows a spinner toast until its result arrives; the spinner is
//! then resolved into an ordinary expiring toast.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }

    fn color(self) -> ratatui::style::Color {
        match self {
            Self::Success => C_TOAST_SUCCESS,
            Self::Error => C_TOAST_ERROR,
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    spinner: Option<String>,
    frame: usize,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            frame: 0,
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Start or replace the spinner.  It animates on `tick()` and stays
    /// until resolved or dismissed.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some(message.into());
    }

    pub fn resolve_spinner(&mut self, severity: Severity, message: impl Into<String>) {
        self.spinner = None;
        let duration = match severity {
            Severity::Error => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        };
        self.push(message, severity, duration);
    }

    pub fn dismiss_spinner(&mut self) {
        self.spinner = None;
    }

    /// Drop expired toasts and advance the spinner. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    fn messages(&self) -> impl Iterator<Item = (&str, &str, ratatui::style::Color)> {
        let spinner = self
            .spinner
            .as_deref()
            .map(|m| (self.spinner_glyph(), m, C_TOAST_INFO));
        let toasts = self
            .toasts
            .iter()
            .rev()
            .take(self.max_visible)
            .map(|t| (t.severity.icon(), t.message.as_str(), t.severity.color()));
        spinner.into_iter().chain(toasts)
    }

    /// Render toasts in the top-right corner of `area`, spinner first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let mut y = area.y + 1;

        for (icon, message, color) in self.messages() {
            if y >= area.y + area.height {
                break;
            }
            let w = (message.width() as u16 + 4).min(max_width);
            let toast_area = Rect {
                x: area.x + area.width.saturating_sub(w + 1),
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            let paragraph = Paragraph::new(Line::from(Span::styled(
                format!(" {} {} ", icon, message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            frame.render_widget(paragraph, toast_area);
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let mut toasts = ToastManager::new();
        toasts.success("refreshed");
        toasts.success("refreshed");
        assert_eq!(toasts.messages().count(), 1);
    }

    #[test]
    fn test_spinner_resolves_into_toast() {
        let mut toasts = ToastManager::new();
        toasts.spinner("refreshing…");
        let first: Vec<_> = toasts.messages().map(|(_, m, _)| m.to_string()).collect();
        assert_eq!(first, ["refreshing…"]);

        toasts.resolve_spinner(Severity::Error, "refresh failed");
        let (icon, msg, color) = toasts.messages().next().unwrap();
        assert_eq!((icon, msg), ("✗", "refresh failed"));
        assert_eq!(color, C_TOAST_ERROR);
    }

    #[test]
    fn test_expired_toasts_removed_on_tick() {
        let mut toasts = ToastManager::new();
        toasts.push("gone", Severity::Success, Duration::ZERO);
        toasts.tick();
        assert!(toasts.is_empty());
    }
}
