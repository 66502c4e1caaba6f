//! Planned-event JSON feed.
//!
//! The document is a single JSON object mapping event ids to records with
//! `orci:`-prefixed fields. The start position is a GML point nested under
//! `orci:start_point`.

use ride_route_traffic_models::{EventSource, TrafficEvent};
use serde_json::Value;

use crate::FeedError;
use crate::parsing::{parse_feed_timestamp, parse_gml_pos};

const DEFAULT_DESCRIPTION: &str = "No description available";
const DEFAULT_LABEL: &str = "Unknown";

/// Parses the planned-event feed.
///
/// Records missing an id, a start position, or either scheduled timestamp
/// are skipped with a warning.
///
/// # Errors
///
/// * [`FeedError::Json`] if the input is not valid JSON
/// * [`FeedError::Format`] if the top level is not an object
pub fn parse_planned_events(json: &str) -> Result<Vec<TrafficEvent>, FeedError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(records) = root else {
        return Err(FeedError::Format {
            message: "planned event feed must be a JSON object keyed by event id".to_string(),
        });
    };

    let mut events = Vec::with_capacity(records.len());
    let mut skipped = 0_usize;

    for (id, raw) in &records {
        if let Some(event) = normalize_record(id, raw) {
            events.push(event);
        } else {
            log::warn!("Skipping planned event {id:?}: missing position or schedule");
            skipped += 1;
        }
    }

    log::debug!(
        "Parsed {} planned events ({skipped} skipped)",
        events.len()
    );

    Ok(events)
}

fn normalize_record(id: &str, raw: &Value) -> Option<TrafficEvent> {
    if id.is_empty() {
        return None;
    }

    let coordinate = raw["orci:start_point"]["gml:Point"]["gml:pos"]
        .as_str()
        .and_then(parse_gml_pos)?;

    let start = text_field(raw, "orci:scheduled_start_time").and_then(parse_feed_timestamp)?;
    let end = text_field(raw, "orci:scheduled_stop_time").and_then(parse_feed_timestamp)?;

    let description = text_field(raw, "orci:template_511_text")
        .or_else(|| text_field(raw, "orci:type_event"))
        .unwrap_or(DEFAULT_DESCRIPTION);

    let category = text_field(raw, "orci:event_category").unwrap_or(DEFAULT_LABEL);
    let subcategory = text_field(raw, "orci:event_subcategory").unwrap_or(DEFAULT_LABEL);

    Some(TrafficEvent {
        id: id.to_string(),
        coordinate,
        description: description.to_string(),
        start,
        end,
        category: Some(category.to_string()),
        subcategory: Some(subcategory.to_string()),
        source: EventSource::Planned,
    })
}

/// Returns a non-empty string field, treating blanks as missing.
fn text_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
