//! Snapshot data model — what a provider hands to the dashboard.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "Jazz FM":  { "song_list": [["Blue in Green", "Miles Davis"], ["So What", "Miles Davis"]] },
//!   "Silent":   { "error": "timeout" }
//! }
//! ```
//!
//! Key order is channel order.  A channel whose `song_list` is missing, empty
//! or not a list of `[title, artist]` string pairs is kept in the snapshot
//! with no history; it still occupies its slot in the channel order.

use serde_json::Value;

use crate::error::ProviderError;

/// Key under which a channel object carries its track list.
pub const SONG_LIST_KEY: &str = "song_list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub title: String,
    pub artist: String,
}

impl TrackEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Current track followed by earlier tracks, most recent first.  Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistory {
    tracks: Vec<TrackEntry>,
}

impl ChannelHistory {
    /// Returns `None` for an empty list: a channel with nothing playing has
    /// no usable history.
    pub fn new(tracks: Vec<TrackEntry>) -> Option<Self> {
        if tracks.is_empty() {
            None
        } else {
            Some(Self { tracks })
        }
    }

    pub fn current(&self) -> &TrackEntry {
        &self.tracks[0]
    }

    pub fn previous(&self) -> &[TrackEntry] {
        &self.tracks[1..]
    }

    pub fn tracks(&self) -> &[TrackEntry] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub name: String,
    /// `None` when the source had no usable track list for this channel.
    pub history: Option<ChannelHistory>,
}

/// One full pull of every channel, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    channels: Vec<ChannelEntry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_channels(channels: Vec<ChannelEntry>) -> Self {
        Self { channels }
    }

    /// Append a channel with the given tracks (empty = unusable).
    pub fn with_channel(mut self, name: impl Into<String>, tracks: Vec<TrackEntry>) -> Self {
        self.channels.push(ChannelEntry {
            name: name.into(),
            history: ChannelHistory::new(tracks),
        });
        self
    }

    /// Append a channel that has no track list at all.
    pub fn with_unusable(mut self, name: impl Into<String>) -> Self {
        self.channels.push(ChannelEntry {
            name: name.into(),
            history: None,
        });
        self
    }

    pub fn channels(&self) -> &[ChannelEntry] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of channels that have a usable history.
    pub fn usable_count(&self) -> usize {
        self.channels.iter().filter(|c| c.history.is_some()).count()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ProviderError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ProviderError::Malformed(format!("invalid JSON: {e}")))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, ProviderError> {
        let Some(obj) = value.as_object() else {
            return Err(ProviderError::Malformed(format!(
                "expected an object of channels, got {}",
                json_kind(value)
            )));
        };
        let channels = obj
            .iter()
            .map(|(name, data)| ChannelEntry {
                name: name.clone(),
                history: parse_history(data),
            })
            .collect();
        Ok(Self { channels })
    }
}

fn parse_history(data: &Value) -> Option<ChannelHistory> {
    let list = data.get(SONG_LIST_KEY)?.as_array()?;
    let tracks = list
        .iter()
        .map(parse_track)
        .collect::<Option<Vec<TrackEntry>>>()?;
    ChannelHistory::new(tracks)
}

fn parse_track(item: &Value) -> Option<TrackEntry> {
    match item.as_array()?.as_slice() {
        [Value::String(title), Value::String(artist)] => {
            Some(TrackEntry::new(title.clone(), artist.clone()))
        }
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
