//! Filter engine — which channels are visible for a given filter text.
//!
//! Matching is a case-insensitive substring test against the channel name,
//! then every track's title and artist in history order.  A channel either
//! matches as a whole or not at all; its history is never cut down to the
//! matching tracks.

use wpn_proto::{ChannelHistory, Snapshot};

use crate::theme::DisplayColor;

/// A channel that survived the filter, with its stable card color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    pub channel: String,
    pub history: ChannelHistory,
    pub color: DisplayColor,
}

/// Visible channels for `filter_text`, in snapshot order.
///
/// The color index counts every snapshot entry, including channels skipped
/// for having no usable history.
pub fn compute_visible(snapshot: &Snapshot, filter_text: &str) -> Vec<VisibleEntry> {
    let needle = filter_text.to_lowercase();
    snapshot
        .channels()
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let history = entry.history.as_ref()?;
            if !channel_matches(&entry.name, history, &needle) {
                return None;
            }
            Some(VisibleEntry {
                channel: entry.name.clone(),
                history: history.clone(),
                color: DisplayColor::for_index(i),
            })
        })
        .collect()
}

/// `needle` must already be lowercase.
pub fn channel_matches(name: &str, history: &ChannelHistory, needle: &str) -> bool {
    if needle.is_empty() || name.to_lowercase().contains(needle) {
        return true;
    }
    history.tracks().iter().any(|track| {
        track.title.to_lowercase().contains(needle) || track.artist.to_lowercase().contains(needle)
    })
}
