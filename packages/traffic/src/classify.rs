//! Traffic event classification.
//!
//! Maps the free-text category, subcategory, and description fields of a
//! [`TrafficEvent`] onto the canonical [`EventType`] taxonomy. Rules are
//! checked in order and the first match wins, so crash-like signals are
//! never masked by the generic "planned" default.

use ride_route_traffic_models::{EventSource, EventType, TrafficEvent};

/// Keyword rules for live incident subcategories. Anything unmatched is a
/// hazard.
const LIVE_RULES: &[(EventType, &[&str])] = &[
    (EventType::Crash, &["accident", "multi-vehicle", "crash"]),
    (
        EventType::Blocked,
        &["disabled", "stalled", "other traffic"],
    ),
    (EventType::Police, &["security", "police"]),
    (EventType::Weather, &["weather", "advisory"]),
];

/// Keyword rules for planned events, applied to the subcategory and then to
/// the description.
const PLANNED_RULES: &[(EventType, &[&str])] = &[
    (
        EventType::Construction,
        &["work-zone", "work zone", "construction", "bridge", "inspection"],
    ),
    (EventType::Closure, &["closure", "closed"]),
    (EventType::Crash, &["crash", "accident", "collision"]),
    (
        EventType::Police,
        &["police", "law-enforcement", "law enforcement"],
    ),
    (EventType::Weather, &["weather", "rain", "snow"]),
    (EventType::Hazard, &["hazard", "debris"]),
    (EventType::Blocked, &["lane", "shoulder", "blocked"]),
];

/// Classifies a traffic event.
///
/// Live incidents are classified from their subcategory alone. Planned
/// events try the subcategory, then the description, then the category,
/// and finally default to [`EventType::Construction`].
#[must_use]
pub fn get_event_type(event: &TrafficEvent) -> EventType {
    let subcategory = event
        .subcategory
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    match event.source {
        EventSource::Live => match_rules(&subcategory, LIVE_RULES).unwrap_or(EventType::Hazard),
        EventSource::Planned => classify_planned(event, &subcategory),
    }
}

fn classify_planned(event: &TrafficEvent, subcategory: &str) -> EventType {
    // Most planned events carry an "Unknown" subcategory, which says nothing.
    if !subcategory.is_empty()
        && subcategory != "unknown"
        && let Some(ty) = match_rules(subcategory, PLANNED_RULES)
    {
        return ty;
    }

    let description = event.description.to_lowercase();
    if let Some(ty) = match_rules(&description, PLANNED_RULES) {
        return ty;
    }

    let category = event
        .category
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    // "unplanned" contains "planned", so it has to be checked first.
    if category.contains("unplanned") {
        EventType::Hazard
    } else if category.contains("planned") {
        EventType::Construction
    } else if category.contains("incident") {
        EventType::Hazard
    } else {
        EventType::Construction
    }
}

fn match_rules(haystack: &str, rules: &[(EventType, &[&str])]) -> Option<EventType> {
    rules
        .iter()
        .find(|(_, needles)| contains_any(haystack, needles))
        .map(|(ty, _)| *ty)
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
