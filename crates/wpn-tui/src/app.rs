//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns the components and `AppState` (the session plus UI flags).
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks:
//!   terminal events from a blocking reader, fetch results from refresh tasks.
//! - The loop draws when something changed, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//!
//! Every fetch runs on its own task and reports back with the ticket it was
//! issued, so the session alone decides which result is current.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use wpn_proto::{ProviderError, Snapshot, SnapshotProvider};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    components::{card_list::CardList, controls::Controls, header::Header},
    focus::FocusRing,
    session::{RefreshOutcome, RefreshTicket},
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    SnapshotFetched(RefreshTicket, Result<Snapshot, ProviderError>),
}

/// Screen areas from the last draw, for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    controls: Rect,
    cards: Rect,
}

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Forward terminal events until the app drops its receiver.
fn read_terminal_events(tx: mpsc::Sender<AppMessage>) {
    while !tx.is_closed() {
        match event::poll(EVENT_POLL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!("terminal event reader stopped: {}", e);
                return;
            }
        }
        match event::read() {
            Ok(ev) => {
                if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!("terminal event reader stopped: {}", e);
                return;
            }
        }
    }
    debug!("terminal event reader finished");
}

pub struct App<P> {
    provider: Arc<P>,
    state: AppState,
    focus: FocusRing,
    header: Header,
    controls: Controls,
    cards: CardList,
    toast: ToastManager,
    areas: PaneAreas,
    auto_refresh: Option<Duration>,
    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,
    should_quit: bool,
}

impl<P: SnapshotProvider + 'static> App<P> {
    pub fn new(provider: P, auto_refresh: Option<Duration>, show_keys_bar: bool) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let source = provider.describe();
        Self {
            provider: Arc::new(provider),
            state: AppState::new(source, show_keys_bar),
            focus: FocusRing::default(),
            header: Header::new(),
            controls: Controls::new(),
            cards: CardList::new(),
            toast: ToastManager::new(),
            areas: PaneAreas::default(),
            auto_refresh,
            tx,
            rx: Some(rx),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        debug!("terminal ready, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("wpn exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already started"))?;

        // ── Background task: keyboard/mouse events ────────────────────────────
        // Stops within one poll period once `rx` is dropped, so the runtime's
        // blocking pool can shut down without waiting for another keypress.
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || read_terminal_events(event_tx));

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut auto_refresh = self.auto_refresh.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        // First load, as if the user had pressed `r`.
        self.dispatch(Action::Refresh);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }
                _ = toast_tick.tick() => {
                    needs_redraw = self.on_toast_tick();
                }
                _ = async {
                    match auto_refresh.as_mut() {
                        Some(interval) => { interval.tick().await; }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    needs_redraw = self.on_auto_refresh_tick();
                }
            }
        }
        Ok(())
    }

    // ── Timers ────────────────────────────────────────────────────────────────

    /// Expire toasts and advance the spinner.  Redraws while anything is
    /// animating, and once more on the tick that clears the last toast.
    fn on_toast_tick(&mut self) -> bool {
        let had_toasts = !self.toast.is_empty();
        self.toast.tick();
        self.state.spinner = self.toast.spinner_glyph();
        had_toasts || self.state.session.is_refreshing()
    }

    /// Periodic refresh; skipped while an earlier refresh is still running.
    fn on_auto_refresh_tick(&mut self) -> bool {
        if self.state.session.is_refreshing() {
            debug!("auto-refresh skipped: a refresh is still running");
            return false;
        }
        self.dispatch(Action::Refresh);
        true
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => return false,
            },
            AppMessage::SnapshotFetched(ticket, result) => self.on_snapshot_fetched(ticket, result),
        }
        true
    }

    fn on_snapshot_fetched(&mut self, ticket: RefreshTicket, result: Result<Snapshot, ProviderError>) {
        let outcome = self.state.session.finish_refresh(ticket, result);
        let still_running = self.state.session.is_refreshing();
        match outcome {
            Ok(RefreshOutcome::Applied { channels, usable }) => {
                self.state.status = None;
                let msg = format!("{} of {} channels have data", usable, channels);
                if still_running {
                    self.toast.success(msg);
                } else {
                    self.toast.resolve_spinner(Severity::Success, msg);
                }
            }
            Ok(RefreshOutcome::Superseded) => {
                if !still_running {
                    self.toast.dismiss_spinner();
                }
            }
            Err(e) => {
                self.state.status = Some(format!("refresh failed: {} (showing previous data)", e));
                let msg = format!("refresh failed: {}", e);
                if still_running {
                    self.toast.error(msg);
                } else {
                    self.toast.resolve_spinner(Severity::Error, msg);
                }
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('r') => return vec![Action::Refresh],
                KeyCode::Char('f') | KeyCode::Char('/') => return vec![Action::OpenFilter],
                _ => {}
            }
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::Controls) => self.controls.handle_key(key, s),
            Some(ComponentId::Cards) => self.cards.handle_key(key, s),
            None => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let (col, row) = (event.column, event.row);
        let areas = self.areas;
        let s = &self.state;

        if hit(areas.controls, col, row) {
            return self.controls.handle_mouse(event, areas.controls, s);
        }
        if hit(areas.cards, col, row) {
            let mut actions = self.cards.handle_mouse(event, areas.cards, s);
            if matches!(event.kind, MouseEventKind::Down(_)) && !self.focus.is_focused(ComponentId::Cards) {
                actions.insert(0, Action::FocusPane(ComponentId::Cards));
            }
            return actions;
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.controls.on_action(&action, s));
            out.extend(self.cards.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::ScrollUp(_) | Action::ScrollDown(_) | Action::Noop => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            Action::Refresh => self.start_refresh(),
            Action::FilterChanged(text) => self.state.session.set_filter_text(&text),

            Action::OpenFilter => {
                self.focus.set(ComponentId::Controls);
                self.state.input_mode = InputMode::Filter;
            }
            Action::CloseFilter => {
                self.state.input_mode = InputMode::Normal;
                self.focus.set(ComponentId::Cards);
            }
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                self.sync_input_mode();
            }

            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }

            // Scrolling is owned by the card list; resize just redraws.
            Action::ScrollUp(_)
            | Action::ScrollDown(_)
            | Action::ScrollTop
            | Action::ScrollBottom
            | Action::Resize(..)
            | Action::Noop => {}
        }
    }

    /// The filter is open exactly while the controls row has focus.
    fn sync_input_mode(&mut self) {
        let want = if self.focus.is_focused(ComponentId::Controls) {
            Action::OpenFilter
        } else {
            Action::CloseFilter
        };
        let mode = match want {
            Action::OpenFilter => InputMode::Filter,
            _ => InputMode::Normal,
        };
        if mode != self.state.input_mode {
            self.state.input_mode = mode;
            self.controls.on_action(&want, &self.state);
        }
    }

    fn start_refresh(&mut self) {
        let ticket = self.state.session.begin_refresh();
        info!("refresh {:?} requested from {}", ticket, self.state.source);
        self.toast.spinner("refreshing…");

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = provider.fetch().await;
            if tx.send(AppMessage::SnapshotFetched(ticket, result)).await.is_err() {
                debug!("refresh {:?} finished after shutdown", ticket);
            }
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let keys_h = if self.state.show_keys_bar { 1 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        self.areas = PaneAreas {
            controls: rows[1],
            cards: rows[2],
        };

        self.header.draw(frame, rows[0], &self.state);
        let controls_focused = self.focus.is_focused(ComponentId::Controls);
        self.controls.draw(frame, rows[1], controls_focused, &self.state);
        let cards_focused = self.focus.is_focused(ComponentId::Cards);
        self.cards.draw(frame, rows[2], cards_focused, &self.state);

        status_bar::draw_status_line(
            frame,
            rows[3],
            self.state.status.as_deref(),
            &self.state.source,
        );
        if self.state.show_keys_bar {
            status_bar::draw_keys_bar(frame, rows[4], self.state.input_mode);
        }

        self.toast.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use wpn_proto::TrackEntry;

    struct FixedProvider {
        fail: bool,
    }

    impl SnapshotProvider for FixedProvider {
        async fn fetch(&self) -> Result<Snapshot, ProviderError> {
            if self.fail {
                return Err(ProviderError::Status(503));
            }
            Ok(Snapshot::new()
                .with_channel("Jazz", vec![TrackEntry::new("Blue", "Miles")])
                .with_channel(
                    "Rock",
                    vec![
                        TrackEntry::new("Song1", "Band1"),
                        TrackEntry::new("Song2", "Band2"),
                    ],
                ))
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn key(code: KeyCode) -> AppMessage {
        AppMessage::Event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_str(app: &mut App<FixedProvider>, s: &str) {
        for c in s.chars() {
            app.handle_message(key(KeyCode::Char(c)));
        }
    }

    /// Run one refresh to completion through the message channel.
    async fn refresh(app: &mut App<FixedProvider>) {
        app.dispatch(Action::Refresh);
        let msg = app.rx.as_mut().unwrap().recv().await.unwrap();
        app.handle_message(msg);
    }

    fn card_names(app: &App<FixedProvider>) -> Vec<String> {
        app.state.session.cards().iter().map(|c| c.channel.clone()).collect()
    }

    #[tokio::test]
    async fn test_refresh_then_filter() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        refresh(&mut app).await;
        assert_eq!(card_names(&app), ["Jazz", "Rock"]);

        app.handle_message(key(KeyCode::Char('f')));
        assert_eq!(app.state.input_mode, InputMode::Filter);
        assert!(app.focus.is_focused(ComponentId::Controls));

        // `q` and `r` are text while the filter is open.
        type_str(&mut app, "band2");
        assert_eq!(app.state.session.filter_text(), "band2");
        assert_eq!(card_names(&app), ["Rock"]);
        assert!(!app.should_quit);

        app.handle_message(key(KeyCode::Enter));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert!(app.focus.is_focused(ComponentId::Cards));
        assert_eq!(app.state.session.filter_text(), "band2");
    }

    #[tokio::test]
    async fn test_esc_clears_then_closes() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        refresh(&mut app).await;
        app.handle_message(key(KeyCode::Char('/')));
        type_str(&mut app, "jaz");
        assert_eq!(card_names(&app), ["Jazz"]);

        app.handle_message(key(KeyCode::Esc));
        assert_eq!(app.state.session.filter_text(), "");
        assert_eq!(app.state.input_mode, InputMode::Filter);
        app.handle_message(key(KeyCode::Esc));
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_failed_refresh_sets_status() {
        let mut app = App::new(FixedProvider { fail: true }, None, true);
        refresh(&mut app).await;
        let status = app.state.status.clone().unwrap();
        assert!(status.starts_with("refresh failed: "), "{status}");
        assert!(status.ends_with("(showing previous data)"), "{status}");
        assert!(app.state.session.cards().is_empty());
        assert!(!app.state.session.is_refreshing());
    }

    #[tokio::test]
    async fn test_tab_toggles_filter_mode() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        app.handle_message(key(KeyCode::Tab));
        assert_eq!(app.state.input_mode, InputMode::Filter);
        app.handle_message(key(KeyCode::Tab));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert!(app.focus.is_focused(ComponentId::Cards));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        app.handle_message(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new(FixedProvider { fail: false }, None, true);
        app.handle_message(key(KeyCode::Char('f')));
        app.handle_message(AppMessage::Event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ))));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_redraw_after_last_toast_expires() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        app.toast.push("refreshed", Severity::Success, Duration::ZERO);
        assert!(app.on_toast_tick(), "the frame still shows the expired toast");
        assert!(app.toast.is_empty());
        assert!(!app.on_toast_tick());
    }

    #[tokio::test]
    async fn test_toast_tick_redraws_while_refreshing() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        app.state.session.begin_refresh();
        assert!(app.on_toast_tick());
    }

    #[tokio::test]
    async fn test_auto_refresh_when_idle() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        assert!(app.on_auto_refresh_tick());
        assert!(app.state.session.is_refreshing());
        let msg = app.rx.as_mut().unwrap().recv().await.unwrap();
        app.handle_message(msg);
        assert_eq!(card_names(&app), ["Jazz", "Rock"]);
        assert!(!app.state.session.is_refreshing());
    }

    #[tokio::test]
    async fn test_auto_refresh_skipped_while_refreshing() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        let ticket = app.state.session.begin_refresh();
        assert!(!app.on_auto_refresh_tick());

        // Only the outstanding refresh is in flight; nothing else was spawned.
        app.state.session.finish_refresh(ticket, Ok(Snapshot::new())).unwrap();
        assert!(!app.state.session.is_refreshing());
        tokio::task::yield_now().await;
        assert!(app.rx.as_mut().unwrap().try_recv().is_err());
    }

    #[tokio::test]
    async fn test_event_reader_stops_when_app_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let reader = tokio::task::spawn_blocking(move || read_terminal_events(tx));
        tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader should exit once the receiver is dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_full_frame_renders() {
        let mut app = App::new(FixedProvider { fail: false }, None, true);
        refresh(&mut app).await;
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = (0..20)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("What's Playing Now"));
        assert!(text.contains("2/2 channels"));
        assert!(text.contains("[ Refresh ]"));
        assert!(text.contains("Now Playing: Song1 by Band1"));
        assert!(text.contains("NORMAL"));
    }
}
