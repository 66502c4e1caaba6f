//! Live incident XML feed.
//!
//! Each `impactReport` element describes one incident. Coordinates are
//! published as integer micro-degrees and must be divided by
//! [`COORDINATE_SCALE`]. The feed carries no end time, so every incident is
//! given a fixed validity window starting at the time of parsing.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use ride_route_geometry_models::Coordinate;
use ride_route_traffic_models::{EventSource, TrafficEvent};
use roxmltree::{Document, Node};

use crate::FeedError;

/// Divisor converting feed micro-degrees to decimal degrees.
pub const COORDINATE_SCALE: f64 = 1_000_000.0;

const DEFAULT_DESCRIPTION: &str = "Incident Reported";
const LIVE_CATEGORY: &str = "Unplanned Incident";

/// Parsed live incidents plus a tally of the raw incident types seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFeed {
    /// Normalized incidents, in document order.
    pub incidents: Vec<TrafficEvent>,
    /// Count per `"{type tag}: {type value}"`, e.g.
    /// `"accidentsAndIncidents: Disabled Vehicle"`.
    pub type_counts: BTreeMap<String, usize>,
}

/// Parses the live incident feed.
///
/// Reports without numeric coordinates are skipped with a warning. Every
/// incident is considered active from `now` until `now + validity`.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed.
pub fn parse_live_incidents(
    xml: &str,
    now: DateTime<Utc>,
    validity: Duration,
) -> Result<LiveFeed, FeedError> {
    let doc = Document::parse(xml)?;
    let mut feed = LiveFeed::default();
    let end = now + validity;

    for (index, report) in doc
        .descendants()
        .filter(|n| n.has_tag_name("impactReport"))
        .enumerate()
    {
        let id = descendant_text(report, "senderIncidentID")
            .map_or_else(|| format!("xml-id-{index}"), ToString::to_string);

        let Some(coordinate) = report_coordinate(report) else {
            log::warn!("Skipping live incident {id}: missing or invalid coordinates");
            continue;
        };

        let description = descendant_text(report, "five11Message")
            .or_else(|| {
                report
                    .descendants()
                    .find(|n| n.has_tag_name("description"))
                    .and_then(|d| descendant_text(d, "text"))
            })
            .unwrap_or(DEFAULT_DESCRIPTION);

        let (type_name, type_value) = incident_type(report);
        *feed
            .type_counts
            .entry(format!("{type_name}: {type_value}"))
            .or_default() += 1;

        feed.incidents.push(TrafficEvent {
            id,
            coordinate,
            description: description.to_string(),
            start: now,
            end,
            category: Some(LIVE_CATEGORY.to_string()),
            subcategory: Some(type_value),
            source: EventSource::Live,
        });
    }

    log::debug!(
        "Parsed {} live incidents across {} incident types",
        feed.incidents.len(),
        feed.type_counts.len()
    );

    Ok(feed)
}

/// Reads the report's point location, preferring the `geoLocationPoint`
/// block over any stray `latitude`/`longitude` elements.
fn report_coordinate(report: Node<'_, '_>) -> Option<Coordinate> {
    let scope = report
        .descendants()
        .find(|n| n.has_tag_name("geoLocationPoint"))
        .unwrap_or(report);

    let latitude = descendant_text(scope, "latitude")?.parse::<f64>().ok()? / COORDINATE_SCALE;
    let longitude = descendant_text(scope, "longitude")?.parse::<f64>().ok()? / COORDINATE_SCALE;

    let coordinate = Coordinate::new(latitude, longitude);
    coordinate.is_finite().then_some(coordinate)
}

/// The first element child of `typeEvent` names the incident type; its
/// text is the specific value.
fn incident_type(report: Node<'_, '_>) -> (String, String) {
    report
        .descendants()
        .find(|n| n.has_tag_name("typeEvent"))
        .and_then(|type_event| type_event.children().find(Node::is_element))
        .map_or_else(
            || ("Unspecified Incident".to_string(), "Unknown".to_string()),
            |child| {
                let value = child
                    .text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("Incident");
                (child.tag_name().name().to_string(), value.to_string())
            },
        )
}

/// Trimmed, non-empty text of the first descendant with the given local name.
fn descendant_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.descendants()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
