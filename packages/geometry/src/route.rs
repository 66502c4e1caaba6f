//! A route polyline paired with its precomputed metrics.
//!
//! Routes usually arrive as the simplified "overview path" of a routing
//! provider, exported as `GeoJSON`. [`Route::from_geojson_str`] accepts a
//! bare geometry, a feature, or a feature collection and takes the first
//! line it finds.

use std::path::Path;

use geojson::GeoJson;
use ride_route_geometry_models::{Coordinate, RouteMetrics, RouteProjection};

use crate::{GeometryError, build_route_metrics, project_point_to_route};

/// An immutable route with its cumulative-distance table built once.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    path: Vec<Coordinate>,
    metrics: RouteMetrics,
}

impl Route {
    /// Builds a route from an ordered vertex list.
    #[must_use]
    pub fn new(path: Vec<Coordinate>) -> Self {
        let metrics = build_route_metrics(&path);
        Self { path, metrics }
    }

    /// The route vertices in travel order.
    #[must_use]
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Cumulative distances aligned with [`Self::path`].
    #[must_use]
    pub const fn metrics(&self) -> &RouteMetrics {
        &self.metrics
    }

    /// Total route length in miles.
    #[must_use]
    pub const fn total_miles(&self) -> f64 {
        self.metrics.total_miles
    }

    /// Whether the route has fewer than two vertices and so cannot be
    /// projected onto.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.path.len() < 2
    }

    /// Projects a point onto this route.
    #[must_use]
    pub fn project(&self, point: Coordinate) -> RouteProjection {
        project_point_to_route(&self.path, &self.metrics.cumulative_miles, point)
    }

    /// Parses a route from a `GeoJSON` document.
    ///
    /// # Errors
    ///
    /// * [`GeometryError::GeoJson`] if the document is not valid `GeoJSON`
    /// * [`GeometryError::MissingLineString`] if it contains no line geometry
    pub fn from_geojson_str(s: &str) -> Result<Self, GeometryError> {
        let geojson: GeoJson = s.parse()?;

        let geometries: Vec<geojson::Geometry> = match geojson {
            GeoJson::Geometry(geom) => vec![geom],
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|f| f.geometry)
                .collect(),
        };

        let line = geometries
            .into_iter()
            .find_map(|geom| {
                let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
                first_line_string(geo_geom)
            })
            .ok_or(GeometryError::MissingLineString)?;

        let path: Vec<Coordinate> = line.0.into_iter().map(Coordinate::from).collect();
        log::debug!("Loaded route with {} vertices from GeoJSON", path.len());

        Ok(Self::new(path))
    }

    /// Reads and parses a `GeoJSON` route file.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`Self::from_geojson_str`].
    pub fn load(path: &Path) -> Result<Self, GeometryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&contents)
    }
}

impl From<&Route> for geo::LineString<f64> {
    fn from(route: &Route) -> Self {
        route.path.iter().copied().map(geo::Coord::from).collect()
    }
}

/// Digs the first [`geo::LineString`] out of an arbitrary geometry.
fn first_line_string(geometry: geo::Geometry<f64>) -> Option<geo::LineString<f64>> {
    match geometry {
        geo::Geometry::LineString(line) => Some(line),
        geo::Geometry::MultiLineString(multi) => multi.0.into_iter().next(),
        geo::Geometry::GeometryCollection(collection) => {
            collection.0.into_iter().find_map(first_line_string)
        }
        _ => None,
    }
}
