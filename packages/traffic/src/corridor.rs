//! Route corridor filtering.
//!
//! Projects every candidate event onto a route, keeps the ones inside the
//! corridor, and orders them by where along the route they will be met.

use std::collections::BTreeSet;

use ride_route_geometry::Route;
use ride_route_geometry_models::Coordinate;
use ride_route_traffic_models::{RiderRouteStatus, RouteIncident, TrafficEvent};

/// Outcome of a corridor pass over a batch of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorridorReport {
    /// Events inside the corridor, nearest-along-route first.
    pub incidents: Vec<RouteIncident>,
    /// Events dropped because their coordinates were not finite.
    pub skipped: usize,
    /// Events dropped because an earlier event had the same id.
    pub duplicates: usize,
}

/// Finds the events lying within `corridor_miles` of `route`.
///
/// Events are deduplicated by id (first occurrence wins). Events with
/// non-finite coordinates are skipped and counted instead of aborting the
/// batch. A degenerate route produces no incidents.
#[must_use]
pub fn find_route_incidents(
    route: &Route,
    events: &[TrafficEvent],
    corridor_miles: f64,
) -> CorridorReport {
    let mut seen = BTreeSet::new();
    let mut report = CorridorReport::default();

    for event in events {
        if !seen.insert(event.id.as_str()) {
            report.duplicates += 1;
            continue;
        }

        if !event.coordinate.is_finite() {
            log::warn!(
                "Skipping event {}: non-finite coordinate {:?}",
                event.id,
                event.coordinate
            );
            report.skipped += 1;
            continue;
        }

        let projection = route.project(event.coordinate);

        if projection.is_within(corridor_miles) {
            report.incidents.push(RouteIncident {
                event: event.clone(),
                distance_to_route_miles: projection.distance_to_route_miles,
                route_distance_miles: projection.route_distance_miles,
            });
        }
    }

    report
        .incidents
        .sort_by(|a, b| a.route_distance_miles.total_cmp(&b.route_distance_miles));

    log::debug!(
        "{} of {} events within {corridor_miles} mi of route ({} duplicates, {} skipped)",
        report.incidents.len(),
        events.len(),
        report.duplicates,
        report.skipped,
    );

    report
}

/// Checks whether a rider's position is on the route.
///
/// Returns `None` when the position is not finite.
#[must_use]
pub fn check_rider_position(
    route: &Route,
    position: Coordinate,
    corridor_miles: f64,
) -> Option<RiderRouteStatus> {
    if !position.is_finite() {
        return None;
    }

    let projection = route.project(position);

    Some(RiderRouteStatus {
        is_on_route: projection.is_within(corridor_miles),
        distance_to_route_miles: projection.distance_to_route_miles,
        route_distance_miles: projection.route_distance_miles,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ride_route_geometry::METERS_PER_MILE;
    use ride_route_traffic_models::{EventSource, EventType};

    use super::*;
    use crate::get_event_type;

    /// Degrees of latitude per mile in the projector's planar frame.
    const DEG_LAT_PER_MILE: f64 = METERS_PER_MILE / 111_132.0;

    fn event_at(id: &str, latitude: f64, longitude: f64) -> TrafficEvent {
        let now = Utc::now();
        TrafficEvent {
            id: id.to_string(),
            coordinate: Coordinate::new(latitude, longitude),
            description: "Incident Reported".to_string(),
            start: now,
            end: now,
            category: Some("Unplanned Incident".to_string()),
            subcategory: Some("Unknown".to_string()),
            source: EventSource::Live,
        }
    }

    /// A straight, roughly 10-mile eastward route along the equator.
    fn ten_mile_route() -> Route {
        let end_lng = 10.0 * METERS_PER_MILE / 111_320.0;
        Route::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, end_lng / 2.0),
            Coordinate::new(0.0, end_lng),
        ])
    }

    #[test]
    fn keeps_only_events_inside_the_corridor() {
        let route = ten_mile_route();
        let events = vec![
            event_at("far", 1.0 * DEG_LAT_PER_MILE, 0.02),
            event_at("medium", 0.25 * DEG_LAT_PER_MILE, 0.10),
            event_at("near", -0.05 * DEG_LAT_PER_MILE, 0.12),
        ];

        let report = find_route_incidents(&route, &events, 0.3);
        let ids: Vec<&str> = report
            .incidents
            .iter()
            .map(|i| i.event.id.as_str())
            .collect();

        assert_eq!(ids, vec!["medium", "near"]);
        assert!((report.incidents[0].distance_to_route_miles - 0.25).abs() < 1e-6);
        assert!((report.incidents[1].distance_to_route_miles - 0.05).abs() < 1e-6);
        assert!(report.incidents[0].route_distance_miles < report.incidents[1].route_distance_miles);
    }

    #[test]
    fn sorts_by_along_route_distance() {
        let route = ten_mile_route();
        let events = vec![
            event_at("c", 0.0, 0.13),
            event_at("a", 0.0, 0.01),
            event_at("b", 0.0, 0.07),
        ];

        let report = find_route_incidents(&route, &events, 0.3);
        let ids: Vec<&str> = report
            .incidents
            .iter()
            .map(|i| i.event.id.as_str())
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_ids_produce_one_incident() {
        let route = ten_mile_route();
        let mut second = event_at("dup", 0.0, 0.08);
        second.description = "second copy".to_string();
        let events = vec![event_at("dup", 0.0, 0.02), second];

        let report = find_route_incidents(&route, &events, 0.3);

        assert_eq!(report.incidents.len(), 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.incidents[0].event.description, "Incident Reported");
    }

    #[test]
    fn nan_coordinates_are_skipped_not_fatal() {
        let route = ten_mile_route();
        let events = vec![
            event_at("bad", f64::NAN, 0.05),
            event_at("good", 0.0, 0.05),
        ];

        let report = find_route_incidents(&route, &events, 0.3);

        assert_eq!(report.skipped, 1);
        assert_eq!(report.incidents.len(), 1);
        assert_eq!(report.incidents[0].event.id, "good");
    }

    #[test]
    fn degenerate_route_yields_nothing() {
        let route = Route::new(vec![Coordinate::new(0.0, 0.0)]);
        let events = vec![event_at("on-top", 0.0, 0.0)];

        let report = find_route_incidents(&route, &events, 1.0);

        assert!(report.incidents.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn end_to_end_disabled_vehicle_near_second_vertex() {
        let route = Route::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.1),
            Coordinate::new(0.0, 0.2),
        ]);
        let mut event = event_at("disabled", 0.001, 0.1);
        event.subcategory = Some("Disabled Vehicle".to_string());

        assert_eq!(get_event_type(&event), EventType::Blocked);

        let report = find_route_incidents(&route, &[event], 1.0);
        assert_eq!(report.incidents.len(), 1);

        let incident = &report.incidents[0];
        assert!(incident.distance_to_route_miles < 0.1);
        assert!(
            (incident.route_distance_miles - 6.9).abs() < 0.05,
            "got {}",
            incident.route_distance_miles
        );
    }

    #[test]
    fn rider_on_and_off_route() {
        let route = ten_mile_route();

        let on = check_rider_position(
            &route,
            Coordinate::new(0.1 * DEG_LAT_PER_MILE, 0.05),
            0.15,
        )
        .unwrap();
        assert!(on.is_on_route);
        assert!(on.route_distance_miles > 0.0);

        let off = check_rider_position(
            &route,
            Coordinate::new(0.2 * DEG_LAT_PER_MILE, 0.05),
            0.15,
        )
        .unwrap();
        assert!(!off.is_on_route);
        assert!((off.distance_to_route_miles - 0.2).abs() < 1e-6);

        assert!(check_rider_position(&route, Coordinate::new(f64::NAN, 0.0), 0.15).is_none());
    }
}
