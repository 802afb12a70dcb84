//! Shared data model and snapshot acquisition for the WPN dashboard.

pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod provider;

pub use error::ProviderError;
pub use model::{ChannelEntry, ChannelHistory, Snapshot, TrackEntry};
pub use provider::{SnapshotProvider, Source};
