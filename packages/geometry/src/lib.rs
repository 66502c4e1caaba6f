#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route polyline geometry.
//!
//! Three layers, leaves first:
//!
//! 1. [`haversine_miles`]: great-circle distance between two coordinates.
//! 2. [`build_route_metrics`]: cumulative along-route distance per vertex.
//! 3. [`project_point_to_route`]: closest point on a polyline, with the
//!    perpendicular offset and the along-route distance to it.

pub mod projection;
pub mod route;

pub use projection::project_point_to_route;
pub use ride_route_geometry_models::{Coordinate, RouteMetrics, RouteProjection};
pub use route::Route;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Metres in a statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Errors that can occur while loading route geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The `GeoJSON` document could not be parsed.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// I/O error reading a route file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document parsed but contained no usable line geometry.
    #[error("No LineString geometry found in route document")]
    MissingLineString,
}

/// Great-circle distance between two coordinates in statute miles.
///
/// The haversine term is clamped to `[0, 1]` before taking square roots so
/// rounding near identical or antipodal points can never produce `NaN`.
#[must_use]
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();

    let h = lat1
        .cos()
        .mul_add(lat2.cos() * sin_d_lng * sin_d_lng, sin_d_lat * sin_d_lat)
        .clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Walks a polyline once, accumulating the distance to each vertex.
///
/// An empty path yields empty metrics; a single point yields `[0]`. Neither
/// is an error.
#[must_use]
pub fn build_route_metrics(path: &[Coordinate]) -> RouteMetrics {
    let Some(first) = path.first() else {
        return RouteMetrics::default();
    };

    let mut cumulative_miles = Vec::with_capacity(path.len());
    cumulative_miles.push(0.0);

    let mut total = 0.0;
    let mut previous = *first;

    for &vertex in &path[1..] {
        total += haversine_miles(previous, vertex);
        cumulative_miles.push(total);
        previous = vertex;
    }

    log::trace!(
        "Built route metrics: {} vertices, {total:.3} miles",
        path.len()
    );

    RouteMetrics {
        cumulative_miles,
        total_miles: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn haversine_is_symmetric() {
        let pairs = [
            (Coordinate::new(45.52, -122.68), Coordinate::new(47.61, -122.33)),
            (Coordinate::new(-33.87, 151.21), Coordinate::new(51.51, -0.13)),
            (Coordinate::new(0.0, 179.9), Coordinate::new(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = haversine_miles(a, b);
            let ba = haversine_miles(b, a);
            assert!((ab - ba).abs() < TOLERANCE, "{ab} != {ba}");
        }
    }

    #[test]
    fn haversine_identical_points_is_zero() {
        let p = Coordinate::new(38.8977, -77.0365);
        assert!(haversine_miles(p, p).abs() < TOLERANCE);
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = haversine_miles(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 69.0).abs() < 0.5, "got {d}");
    }

    #[test]
    fn haversine_antipodal_points_do_not_nan() {
        let d = haversine_miles(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn metrics_are_monotonic_and_aligned() {
        let path = [
            Coordinate::new(45.0, -122.0),
            Coordinate::new(45.1, -122.0),
            Coordinate::new(45.1, -122.0),
            Coordinate::new(45.2, -121.9),
            Coordinate::new(45.0, -121.8),
        ];
        let metrics = build_route_metrics(&path);

        assert_eq!(metrics.cumulative_miles.len(), path.len());
        assert!(metrics.cumulative_miles[0].abs() < f64::EPSILON);
        for pair in metrics.cumulative_miles.windows(2) {
            assert!(pair[1] >= pair[0], "{pair:?} decreases");
        }
        let last = *metrics.cumulative_miles.last().unwrap();
        assert!((metrics.total_miles - last).abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_for_degenerate_paths() {
        let empty = build_route_metrics(&[]);
        assert!(empty.cumulative_miles.is_empty());
        assert!(empty.total_miles.abs() < f64::EPSILON);

        let single = build_route_metrics(&[Coordinate::new(10.0, 10.0)]);
        assert_eq!(single.cumulative_miles, vec![0.0]);
        assert!(single.total_miles.abs() < f64::EPSILON);
    }
}
