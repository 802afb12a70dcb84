//! Session — the single owner of the snapshot and the filter text.
//!
//! Two transitions change what is on screen:
//!
//! - **Refresh**: a new snapshot replaces the old one wholesale.  A failed
//!   fetch leaves every field untouched.
//! - **Filter change**: the filter text is replaced and the cards are rebuilt
//!   from the cached snapshot.  Nothing is fetched.
//!
//! Both rebuild the visible list and all cards from scratch.
//!
//! Fetches may run on a background task.  `begin_refresh` hands out a ticket
//! and `finish_refresh` applies the result; a result whose ticket is older than
//! the newest applied one is dropped, so the last request wins.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use wpn_proto::{ProviderError, Snapshot};

use crate::card::{render_card, Card};
use crate::filter::{compute_visible, VisibleEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { channels: usize, usable: usize },
    /// A newer refresh was already applied; this result was discarded.
    Superseded,
}

pub struct Session {
    snapshot: Snapshot,
    filter_text: String,
    visible: Vec<VisibleEntry>,
    cards: Vec<Card>,
    next_ticket: u64,
    applied_ticket: Option<RefreshTicket>,
    in_flight: usize,
    last_refreshed: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::new(),
            filter_text: String::new(),
            visible: Vec::new(),
            cards: Vec::new(),
            next_ticket: 0,
            applied_ticket: None,
            in_flight: 0,
            last_refreshed: None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Fetch from `provider` and apply the result in one step.
    #[cfg(test)]
    pub async fn refresh<P: wpn_proto::SnapshotProvider>(
        &mut self,
        provider: &P,
    ) -> Result<RefreshOutcome, ProviderError> {
        let ticket = self.begin_refresh();
        let result = provider.fetch().await;
        self.finish_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_ticket += 1;
        self.in_flight += 1;
        RefreshTicket(self.next_ticket)
    }

    /// Apply a fetch result.  On error nothing changes and the error is
    /// handed back to the caller.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Snapshot, ProviderError>,
    ) -> Result<RefreshOutcome, ProviderError> {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.applied_ticket.is_some_and(|applied| ticket < applied) {
            debug!("refresh {:?} superseded by {:?}", ticket, self.applied_ticket);
            return Ok(RefreshOutcome::Superseded);
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("refresh {:?} failed, keeping previous snapshot: {}", ticket, e);
                return Err(e);
            }
        };

        let channels = snapshot.len();
        let usable = snapshot.usable_count();
        self.snapshot = snapshot;
        self.applied_ticket = Some(ticket);
        self.last_refreshed = Some(Local::now());
        self.recompute();
        info!(
            "refresh {:?} applied: {} channels ({} usable), {} visible",
            ticket,
            channels,
            usable,
            self.visible.len()
        );
        Ok(RefreshOutcome::Applied { channels, usable })
    }

    pub fn set_filter_text(&mut self, text: &str) {
        if text == self.filter_text {
            return;
        }
        self.filter_text = text.to_string();
        self.recompute();
        debug!(
            "filter {:?}: {} of {} channels visible",
            self.filter_text,
            self.visible.len(),
            self.snapshot.len()
        );
    }

    fn recompute(&mut self) {
        self.visible = compute_visible(&self.snapshot, &self.filter_text);
        self.cards = self.visible.iter().map(render_card).collect();
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn visible(&self) -> &[VisibleEntry] {
        &self.visible
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
