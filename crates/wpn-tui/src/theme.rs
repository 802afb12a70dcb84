//! Color palette and style constants for the WPN dashboard.

use ratatui::style::{Color, Style};

// ── Chrome colors ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_KEY_HINT: Color = Color::Rgb(255, 210, 50);
pub const C_FILTER_BG: Color = Color::Rgb(20, 20, 32);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_BUTTON_BG: Color = Color::Rgb(40, 40, 60);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_FILTER: Color = Color::Rgb(255, 200, 80);

// ── Channel card palette ──────────────────────────────────────────────────────

/// Named card color.  A channel's color is picked by its position in the
/// snapshot, so it never changes while the filter is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayColor {
    BrightBlue,
    BrightGreen,
    BrightMagenta,
    BrightYellow,
    BrightCyan,
    BrightRed,
    BrightWhite,
}

pub const PALETTE: [DisplayColor; 7] = [
    DisplayColor::BrightBlue,
    DisplayColor::BrightGreen,
    DisplayColor::BrightMagenta,
    DisplayColor::BrightYellow,
    DisplayColor::BrightCyan,
    DisplayColor::BrightRed,
    DisplayColor::BrightWhite,
];

impl DisplayColor {
    /// Palette slot for the channel at `index` in snapshot order.
    pub fn for_index(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    pub fn color(self) -> Color {
        match self {
            Self::BrightBlue => Color::LightBlue,
            Self::BrightGreen => Color::LightGreen,
            Self::BrightMagenta => Color::LightMagenta,
            Self::BrightYellow => Color::LightYellow,
            Self::BrightCyan => Color::LightCyan,
            Self::BrightRed => Color::LightRed,
            Self::BrightWhite => Color::White,
        }
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}
