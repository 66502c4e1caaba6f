//! Point-to-polyline projection.
//!
//! Each segment is flattened onto its own equirectangular plane, scaled at
//! the segment's mean latitude. Offsets are only meaningful at corridor
//! scale (a fraction of a mile); adjacent segments may disagree slightly
//! at shared vertices.

use ride_route_geometry_models::{Coordinate, RouteProjection};

use crate::METERS_PER_MILE;

/// Metres per degree of latitude.
const METERS_PER_DEG_LAT: f64 = 111_132.0;

/// Metres per degree of longitude at the equator.
const METERS_PER_DEG_LNG_EQUATOR: f64 = 111_320.0;

/// Local planar frame for one segment.
#[derive(Debug, Clone, Copy)]
struct SegmentPlane {
    m_per_deg_lat: f64,
    m_per_deg_lng: f64,
}

impl SegmentPlane {
    fn for_segment(start: Coordinate, end: Coordinate) -> Self {
        let mean_lat = f64::midpoint(start.latitude, end.latitude).to_radians();
        Self {
            m_per_deg_lat: METERS_PER_DEG_LAT,
            m_per_deg_lng: METERS_PER_DEG_LNG_EQUATOR * mean_lat.cos(),
        }
    }

    fn to_xy(self, c: Coordinate) -> (f64, f64) {
        (
            c.longitude * self.m_per_deg_lng,
            c.latitude * self.m_per_deg_lat,
        )
    }

    fn to_coordinate(self, x: f64, y: f64) -> Coordinate {
        Coordinate::new(y / self.m_per_deg_lat, x / self.m_per_deg_lng)
    }
}

/// Projects `point` onto the nearest segment of `path`.
///
/// `cumulative_miles` must come from
/// [`build_route_metrics`](crate::build_route_metrics) for the same path; a
/// missing entry is treated as zero rather than panicking.
///
/// Paths with fewer than two vertices have nothing to project onto and
/// return an infinite offset, so corridor checks naturally reject them.
/// Ties between equally distant segments go to the earlier segment.
#[must_use]
pub fn project_point_to_route(
    path: &[Coordinate],
    cumulative_miles: &[f64],
    point: Coordinate,
) -> RouteProjection {
    if path.len() < 2 {
        return RouteProjection {
            distance_to_route_miles: f64::INFINITY,
            route_distance_miles: 0.0,
            segment_index: 0,
            projected_point: path.first().copied().unwrap_or(point),
        };
    }

    let mut best_distance_m = f64::INFINITY;
    let mut best_route_distance_miles = 0.0;
    let mut best_index = 0;
    let mut best_projected = path[0];

    for (i, segment) in path.windows(2).enumerate() {
        let (start, end) = (segment[0], segment[1]);
        let plane = SegmentPlane::for_segment(start, end);

        let (ax, ay) = plane.to_xy(start);
        let (bx, by) = plane.to_xy(end);
        let (px, py) = plane.to_xy(point);

        let (vx, vy) = (bx - ax, by - ay);
        let (wx, wy) = (px - ax, py - ay);

        let segment_len_sq = vx.mul_add(vx, vy * vy);
        let t = if segment_len_sq == 0.0 {
            0.0
        } else {
            (wx.mul_add(vx, wy * vy) / segment_len_sq).clamp(0.0, 1.0)
        };

        let proj_x = t.mul_add(vx, ax);
        let proj_y = t.mul_add(vy, ay);

        let (dx, dy) = (px - proj_x, py - proj_y);
        let distance_m = dx.hypot(dy);

        if distance_m < best_distance_m {
            best_distance_m = distance_m;

            let segment_miles = segment_len_sq.sqrt() / METERS_PER_MILE;
            let start_miles = cumulative_miles.get(i).copied().unwrap_or(0.0);
            best_route_distance_miles = segment_miles.mul_add(t, start_miles);
            best_index = i;
            best_projected = plane.to_coordinate(proj_x, proj_y);
        }
    }

    RouteProjection {
        distance_to_route_miles: best_distance_m / METERS_PER_MILE,
        route_distance_miles: best_route_distance_miles,
        segment_index: best_index,
        projected_point: best_projected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_route_metrics;

    fn eastward_route() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.1),
            Coordinate::new(0.0, 0.2),
        ]
    }

    #[test]
    fn vertices_project_onto_themselves() {
        let path = vec![
            Coordinate::new(44.05, -123.09),
            Coordinate::new(44.10, -123.00),
            Coordinate::new(44.20, -122.95),
            Coordinate::new(44.25, -122.80),
        ];
        let metrics = build_route_metrics(&path);

        for (i, vertex) in path.iter().enumerate() {
            let projection = project_point_to_route(&path, &metrics.cumulative_miles, *vertex);
            assert!(
                projection.distance_to_route_miles < 1e-6,
                "vertex {i} offset {}",
                projection.distance_to_route_miles
            );
            // Planar segment lengths differ slightly from the haversine
            // lengths used for the cumulative table.
            assert!(
                (projection.route_distance_miles - metrics.cumulative_miles[i]).abs() < 0.05,
                "vertex {i}: {} vs {}",
                projection.route_distance_miles,
                metrics.cumulative_miles[i]
            );
        }
    }

    #[test]
    fn empty_and_single_point_routes_are_infinitely_far() {
        let p = Coordinate::new(1.0, 1.0);

        let empty = project_point_to_route(&[], &[], p);
        assert!(empty.distance_to_route_miles.is_infinite());
        assert!(empty.route_distance_miles.abs() < f64::EPSILON);
        assert_eq!(empty.segment_index, 0);
        assert_eq!(empty.projected_point, p);

        let only = Coordinate::new(2.0, 2.0);
        let single = project_point_to_route(&[only], &[0.0], p);
        assert!(single.distance_to_route_miles.is_infinite());
        assert_eq!(single.projected_point, only);
    }

    #[test]
    fn points_beyond_the_ends_clamp_to_endpoints() {
        let path = eastward_route();
        let metrics = build_route_metrics(&path);

        let before = project_point_to_route(
            &path,
            &metrics.cumulative_miles,
            Coordinate::new(0.0, -0.05),
        );
        assert_eq!(before.segment_index, 0);
        assert!(before.route_distance_miles.abs() < 1e-9);
        assert!((before.projected_point.longitude).abs() < 1e-9);

        let after = project_point_to_route(
            &path,
            &metrics.cumulative_miles,
            Coordinate::new(0.0, 0.25),
        );
        assert_eq!(after.segment_index, 1);
        assert!((after.projected_point.longitude - 0.2).abs() < 1e-9);
        assert!((after.route_distance_miles - metrics.total_miles).abs() < 0.01);
    }

    #[test]
    fn offset_point_projects_perpendicular() {
        let path = eastward_route();
        let metrics = build_route_metrics(&path);

        // 0.01 degrees north of the midpoint of the first segment.
        let projection = project_point_to_route(
            &path,
            &metrics.cumulative_miles,
            Coordinate::new(0.01, 0.05),
        );

        let expected_offset = 0.01 * METERS_PER_DEG_LAT / METERS_PER_MILE;
        assert!((projection.distance_to_route_miles - expected_offset).abs() < 1e-6);
        assert_eq!(projection.segment_index, 0);
        assert!(projection.projected_point.latitude.abs() < 1e-9);
        assert!((projection.projected_point.longitude - 0.05).abs() < 1e-9);

        let expected_along = 0.05 * METERS_PER_DEG_LNG_EQUATOR / METERS_PER_MILE;
        assert!((projection.route_distance_miles - expected_along).abs() < 1e-6);
    }

    #[test]
    fn zero_length_segments_do_not_divide_by_zero() {
        let path = vec![
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 10.1),
        ];
        let metrics = build_route_metrics(&path);
        let projection = project_point_to_route(
            &path,
            &metrics.cumulative_miles,
            Coordinate::new(10.0, 10.05),
        );
        assert!(projection.distance_to_route_miles.is_finite());
        assert_eq!(projection.segment_index, 1);
    }

    #[test]
    fn ties_go_to_the_first_segment() {
        // Out and back along the same line: every point is equidistant from
        // both segments.
        let path = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.1),
            Coordinate::new(0.0, 0.0),
        ];
        let metrics = build_route_metrics(&path);
        let projection = project_point_to_route(
            &path,
            &metrics.cumulative_miles,
            Coordinate::new(0.001, 0.05),
        );
        assert_eq!(projection.segment_index, 0);
    }

    #[test]
    fn short_cumulative_table_does_not_panic() {
        let path = eastward_route();
        let projection = project_point_to_route(&path, &[], Coordinate::new(0.0, 0.15));
        assert!(projection.distance_to_route_miles < 1e-9);
        assert_eq!(projection.segment_index, 1);
    }
}
