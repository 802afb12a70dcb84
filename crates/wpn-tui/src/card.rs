//! Card renderer — turns one visible channel into styled text lines.
//!
//! ```text
//!  Rock                          ← bold, channel color
//!  Now Playing: Song1 by Band1   ← channel color
//!  Previous Songs:               ← bold
//!  • Song2 by Band2              ← channel color, one per earlier track
//! ```

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use wpn_proto::TrackEntry;

use crate::filter::VisibleEntry;
use crate::theme::DisplayColor;

pub const PREVIOUS_HEADER: &str = "Previous Songs:";
pub const BULLET: &str = "•";

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub channel: String,
    pub color: DisplayColor,
    pub title: Line<'static>,
    pub now_playing: Option<Line<'static>>,
    pub previous: Option<PreviousSongs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviousSongs {
    pub header: Line<'static>,
    pub lines: Vec<Line<'static>>,
}

impl Card {
    /// All lines of the card in display order, without the trailing gap.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut out = Vec::with_capacity(self.height());
        out.push(self.title.clone());
        if let Some(now) = &self.now_playing {
            out.push(now.clone());
        }
        if let Some(prev) = &self.previous {
            out.push(prev.header.clone());
            out.extend(prev.lines.iter().cloned());
        }
        out
    }

    pub fn height(&self) -> usize {
        1 + usize::from(self.now_playing.is_some())
            + self.previous.as_ref().map_or(0, |p| 1 + p.lines.len())
    }
}

pub fn render_card(entry: &VisibleEntry) -> Card {
    let fg = Style::default().fg(entry.color.color());
    let history = &entry.history;

    let title = Line::from(Span::styled(
        entry.channel.clone(),
        fg.add_modifier(Modifier::BOLD),
    ));

    let now_playing = (!history.is_empty())
        .then(|| Line::from(Span::styled(now_playing_text(history.current()), fg)));

    let previous = (history.len() > 1).then(|| PreviousSongs {
        header: Line::from(Span::styled(
            PREVIOUS_HEADER,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        lines: history
            .previous()
            .iter()
            .map(|track| Line::from(Span::styled(previous_text(track), fg)))
            .collect(),
    });

    Card {
        channel: entry.channel.clone(),
        color: entry.color,
        title,
        now_playing,
        previous,
    }
}

pub fn now_playing_text(track: &TrackEntry) -> String {
    format!("Now Playing: {} by {}", track.title, track.artist)
}

pub fn previous_text(track: &TrackEntry) -> String {
    format!("{} {} by {}", BULLET, track.title, track.artist)
}

/// Plain text of a line, styles dropped.
#[cfg(test)]
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use wpn_proto::ChannelHistory;

    fn entry(channel: &str, tracks: &[(&str, &str)], color: DisplayColor) -> VisibleEntry {
        VisibleEntry {
            channel: channel.to_string(),
            history: ChannelHistory::new(
                tracks.iter().map(|(t, a)| TrackEntry::new(*t, *a)).collect(),
            )
            .unwrap(),
            color,
        }
    }

    fn texts(card: &Card) -> Vec<String> {
        card.lines().iter().map(line_text).collect()
    }

    #[test]
    fn test_single_track_has_no_previous_section() {
        let card = render_card(&entry("Jazz", &[("Blue", "Miles")], DisplayColor::BrightBlue));
        assert_eq!(texts(&card), ["Jazz", "Now Playing: Blue by Miles"]);
        assert!(card.previous.is_none());
        assert_eq!(card.height(), 2);
    }

    #[test]
    fn test_previous_songs_keep_order() {
        let card = render_card(&entry(
            "Rock",
            &[("A", "x"), ("B", "y"), ("C", "z")],
            DisplayColor::BrightGreen,
        ));
        assert_eq!(
            texts(&card),
            [
                "Rock",
                "Now Playing: A by x",
                "Previous Songs:",
                "• B by y",
                "• C by z",
            ]
        );
        assert_eq!(card.height(), 5);
        assert_eq!(card.lines().len(), card.height());
    }

    #[test]
    fn test_card_uses_entry_color() {
        let card = render_card(&entry(
            "Soul",
            &[("A", "x"), ("B", "y")],
            DisplayColor::BrightMagenta,
        ));
        let title = &card.title.spans[0].style;
        assert_eq!(title.fg, Some(Color::LightMagenta));
        assert!(title.add_modifier.contains(Modifier::BOLD));

        let now = &card.now_playing.as_ref().unwrap().spans[0].style;
        assert_eq!(now.fg, Some(Color::LightMagenta));

        let prev = card.previous.as_ref().unwrap();
        assert!(prev.header.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(prev.lines[0].spans[0].style.fg, Some(Color::LightMagenta));
    }

    #[test]
    fn test_render_is_pure() {
        let e = entry("Rock", &[("A", "x"), ("B", "y")], DisplayColor::BrightRed);
        assert_eq!(render_card(&e), render_card(&e));
    }
}
