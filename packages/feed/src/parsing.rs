//! Shared parsing helpers for feed fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use ride_route_geometry_models::Coordinate;

/// Parses a feed timestamp.
///
/// Accepts RFC 3339 with an offset, or a naive ISO 8601 datetime which is
/// taken to be UTC.
#[must_use]
pub fn parse_feed_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Parses a GML `pos` string (`"lat lng"`, whitespace separated).
#[must_use]
pub fn parse_gml_pos(pos: &str) -> Option<Coordinate> {
    let mut parts = pos.split_whitespace();
    let latitude = parts.next()?.parse::<f64>().ok()?;
    let longitude = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coordinate::new(latitude, longitude))
}
