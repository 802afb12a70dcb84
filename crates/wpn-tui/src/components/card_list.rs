//! Card list — the scrollable pane of channel cards.
//!
//! Cards are stacked top to bottom in visible order with one blank row
//! between them.  Long lines wrap at the pane width.  Scrolling is by
//! rendered row; the offset is clamped on every draw so a shrinking card list
//! never leaves the view past the end.

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::action::Action;
use crate::app_state::AppState;
use crate::card::Card;
use crate::component::Component;
use crate::theme::{style_muted, C_FILTER_FG};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub const NO_DATA: &str = "no data yet";
pub const NO_MATCH: &str = "no channels match filter";

const WHEEL_STEP: usize = 3;

pub struct CardList {
    scroll: usize,
    /// Inner height of the last draw, for page-sized scrolling.
    viewport: usize,
}

impl CardList {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            viewport: 0,
        }
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn page(&self) -> usize {
        self.viewport.saturating_sub(1).max(1)
    }
}

impl Default for CardList {
    fn default() -> Self {
        Self::new()
    }
}

/// All card lines with a blank row between consecutive cards.
pub fn stack_cards(cards: &[Card]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.extend(card.lines());
    }
    lines
}

/// Paragraph scroll offsets are `u16`.
fn max_scroll(total: usize, viewport: usize) -> usize {
    total.saturating_sub(viewport).min(u16::MAX as usize)
}

impl Component for CardList {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::ScrollUp(1)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::ScrollDown(1)],
            KeyCode::PageUp => vec![Action::ScrollUp(self.page())],
            KeyCode::PageDown => vec![Action::ScrollDown(self.page())],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::ScrollTop],
            KeyCode::End | KeyCode::Char('G') => vec![Action::ScrollBottom],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => vec![Action::ScrollUp(WHEEL_STEP)],
            MouseEventKind::ScrollDown => vec![Action::ScrollDown(WHEEL_STEP)],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(*n),
            // Clamped against the content on the next draw.
            Action::ScrollDown(n) => self.scroll = self.scroll.saturating_add(*n),
            Action::ScrollTop | Action::FilterChanged(_) => self.scroll = 0,
            Action::ScrollBottom => self.scroll = usize::MAX,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let filter = state.session.filter_text();
        let badge_text = format!("filter: {}", filter);
        let badge = (!filter.is_empty()).then(|| Badge {
            text: &badge_text,
            color: C_FILTER_FG,
        });
        let block = pane_chrome("Channels", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.viewport = inner.height as usize;
        let cards = state.session.cards();
        if cards.is_empty() {
            self.scroll = 0;
            let message = if state.session.snapshot().usable_count() == 0 {
                NO_DATA
            } else {
                NO_MATCH
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(style_muted())
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let text_area = inner.inner(Margin {
            horizontal: 1,
            vertical: 0,
        });
        let paragraph = Paragraph::new(stack_cards(cards))
            .style(Style::default())
            .wrap(Wrap { trim: false });
        let total = paragraph.line_count(text_area.width);
        self.scroll = self.scroll.min(max_scroll(total, self.viewport));

        frame.render_widget(paragraph.scroll((self.scroll as u16, 0)), text_area);

        if total > self.viewport {
            let mut scrollbar_state = ScrollbarState::new(max_scroll(total, self.viewport))
                .position(self.scroll)
                .viewport_content_length(self.viewport);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                inner,
                &mut scrollbar_state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use wpn_proto::{Snapshot, TrackEntry};

    fn loaded_state(snapshot: Snapshot) -> AppState {
        let mut state = AppState::new("test".into(), true);
        let ticket = state.session.begin_refresh();
        state.session.finish_refresh(ticket, Ok(snapshot)).unwrap();
        state
    }

    fn scenario() -> Snapshot {
        Snapshot::new()
            .with_channel("Jazz", vec![TrackEntry::new("Blue", "Miles")])
            .with_channel(
                "Rock",
                vec![
                    TrackEntry::new("Song1", "Band1"),
                    TrackEntry::new("Song2", "Band2"),
                ],
            )
    }

    fn render(list: &mut CardList, state: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                list.draw(f, area, true, state);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    #[test]
    fn test_renders_cards_in_order() {
        let state = loaded_state(scenario());
        let rows = render(&mut CardList::new(), &state, 50, 12);
        let jazz = rows.iter().position(|r| r.contains("Jazz")).unwrap();
        let rock = rows.iter().position(|r| r.contains("Rock")).unwrap();
        assert!(jazz < rock);
        assert!(contains(&rows, "Now Playing: Blue by Miles"));
        assert!(contains(&rows, "Previous Songs:"));
        assert!(contains(&rows, "• Song2 by Band2"));
        // Title, now playing, gap, then the next card.
        assert_eq!(rock, jazz + 3);
    }

    #[test]
    fn test_empty_states() {
        let empty = AppState::new("test".into(), true);
        assert!(contains(&render(&mut CardList::new(), &empty, 40, 5), NO_DATA));

        let mut filtered = loaded_state(scenario());
        filtered.session.set_filter_text("xyz");
        let rows = render(&mut CardList::new(), &filtered, 40, 5);
        assert!(contains(&rows, NO_MATCH));
        assert!(contains(&rows, "filter: xyz"));
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let state = loaded_state(scenario());
        let mut list = CardList::new();
        list.on_action(&Action::ScrollBottom, &state);
        // 2 + 1 + 4 = 7 content lines, 3 inner rows.
        let rows = render(&mut list, &state, 50, 5);
        assert_eq!(list.scroll(), 4);
        assert!(contains(&rows, "• Song2 by Band2"));

        list.on_action(&Action::ScrollUp(10), &state);
        assert_eq!(list.scroll(), 0);
    }

    #[test]
    fn test_long_lines_wrap_and_count_toward_scroll() {
        let snapshot = Snapshot::new().with_channel(
            "Jazz",
            vec![TrackEntry::new("A Very Long Song Title", "Someone Else")],
        );
        let state = loaded_state(snapshot);
        let mut list = CardList::new();
        // 30 columns leave 26 for text; the now-playing line takes two rows.
        let rows = render(&mut list, &state, 30, 6);
        assert!(contains(&rows, "Now Playing: A Very Long"));
        assert!(contains(&rows, "Someone Else"));

        // Title plus two wrapped rows against a 2-row viewport.
        list.on_action(&Action::ScrollBottom, &state);
        render(&mut list, &state, 30, 4);
        assert_eq!(list.scroll(), 1);
    }

    #[test]
    fn test_filter_change_resets_scroll() {
        let state = loaded_state(scenario());
        let mut list = CardList::new();
        list.on_action(&Action::ScrollDown(2), &state);
        list.on_action(&Action::FilterChanged("r".into()), &state);
        assert_eq!(list.scroll(), 0);
    }

    #[test]
    fn test_keys_map_to_scroll_actions() {
        let state = AppState::new("test".into(), true);
        let mut list = CardList::new();
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(list.handle_key(key(KeyCode::Char('j')), &state), vec![Action::ScrollDown(1)]);
        assert_eq!(list.handle_key(key(KeyCode::Up), &state), vec![Action::ScrollUp(1)]);
        assert_eq!(list.handle_key(key(KeyCode::Char('G')), &state), vec![Action::ScrollBottom]);
        assert!(list.handle_key(key(KeyCode::Char('x')), &state).is_empty());
    }

    #[test]
    fn test_stack_cards_gap() {
        let state = loaded_state(scenario());
        let lines = stack_cards(state.session.cards());
        assert_eq!(lines.len(), 2 + 1 + 4);
        assert!(lines[2].spans.is_empty());
    }
}
