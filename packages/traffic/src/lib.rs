#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route incident checking and traffic event classification.
//!
//! Consumes a [`Route`](ride_route_geometry::Route) and a batch of
//! [`TrafficEvent`]s and answers "what will I run into on this trip, and
//! in what order". Corridor widths are always passed in by the caller;
//! nothing here reads configuration or touches I/O.

pub mod classify;
pub mod corridor;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ride_route_traffic_models::{EventSource, EventType, RouteIncident, TrafficEvent};

pub use classify::get_event_type;
pub use corridor::{CorridorReport, check_rider_position, find_route_incidents};

/// Label used when a feed leaves category or subcategory blank.
const UNKNOWN_LABEL: &str = "Unknown";

/// Returns the events that overlap `[window_start, window_end)`.
#[must_use]
pub fn filter_active(
    events: &[TrafficEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<&TrafficEvent> {
    events
        .iter()
        .filter(|event| event.is_active_in_window(window_start, window_end))
        .collect()
}

/// Groups planned events by category, then subcategory, counting each.
///
/// Live incidents are ignored; their categories are synthetic.
#[must_use]
pub fn category_breakdown(events: &[TrafficEvent]) -> BTreeMap<String, BTreeMap<String, usize>> {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for event in events.iter().filter(|e| e.source == EventSource::Planned) {
        let category = event.category.as_deref().unwrap_or(UNKNOWN_LABEL);
        let subcategory = event.subcategory.as_deref().unwrap_or(UNKNOWN_LABEL);

        *counts
            .entry(category.to_string())
            .or_default()
            .entry(subcategory.to_string())
            .or_default() += 1;
    }

    counts
}

/// Counts route incidents per [`EventType`].
#[must_use]
pub fn type_counts(incidents: &[RouteIncident]) -> BTreeMap<EventType, usize> {
    let mut counts = BTreeMap::new();
    for incident in incidents {
        *counts.entry(get_event_type(&incident.event)).or_default() += 1;
    }
    counts
}
