#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic feed normalization.
//!
//! Turns the two upstream documents into [`TrafficEvent`] records:
//!
//! * [`planned`]: the structured JSON feed of scheduled work zones and
//!   closures, keyed by event id.
//! * [`live`]: the TMDD-style XML feed of live incident reports.
//!
//! This crate only parses documents the caller already holds; fetching
//! them is someone else's job.

pub mod live;
pub mod parsing;
pub mod planned;

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use ride_route_traffic_models::TrafficEvent;

pub use live::{LiveFeed, parse_live_incidents};
pub use planned::parse_planned_events;

/// Errors that can occur while reading a feed document.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing failed.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but does not have the expected shape.
    #[error("Feed format error: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}

/// Reads and parses a planned-event JSON file.
///
/// # Errors
///
/// Returns [`FeedError`] if the file cannot be read or is not a JSON object.
pub fn load_planned_events(path: &Path) -> Result<Vec<TrafficEvent>, FeedError> {
    let contents = std::fs::read_to_string(path)?;
    let events = parse_planned_events(&contents)?;
    log::info!(
        "Loaded {} planned events from {}",
        events.len(),
        path.display()
    );
    Ok(events)
}

/// Reads and parses a live-incident XML file.
///
/// # Errors
///
/// Returns [`FeedError`] if the file cannot be read or is not well-formed XML.
pub fn load_live_incidents(
    path: &Path,
    now: DateTime<Utc>,
    validity: Duration,
) -> Result<LiveFeed, FeedError> {
    let contents = std::fs::read_to_string(path)?;
    let feed = parse_live_incidents(&contents, now, validity)?;
    log::info!(
        "Loaded {} live incidents from {}",
        feed.incidents.len(),
        path.display()
    );
    Ok(feed)
}
