//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Controls,
    Cards,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Data ─────────────────────────────────────────────────────────────────
    Refresh,
    FilterChanged(String),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollTop,
    ScrollBottom,

    // ── Filter ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── App ──────────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
    Noop,
}
