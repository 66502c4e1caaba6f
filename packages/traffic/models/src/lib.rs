#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic event types and the event type taxonomy.
//!
//! Both upstream feeds (scheduled road work and live incident reports) are
//! normalized into [`TrafficEvent`] records. The [`EventSource`]
//! discriminant records which feed an event came from, since
//! classification treats the two very differently.

use chrono::{DateTime, Utc};
use ride_route_geometry_models::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which upstream feed produced an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSource {
    /// Structured feed of scheduled work zones and closures.
    Planned,
    /// Live incident reports with short validity windows.
    Live,
}

/// Presentation severity of an [`EventType`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSeverity {
    /// Weather advisories
    Advisory,
    /// Generic hazards and debris
    Caution,
    /// Law enforcement activity
    Enforcement,
    /// Work zones and blocked lanes
    Elevated,
    /// Crashes and full closures
    Critical,
}

impl EventSeverity {
    /// Marker colour used when rendering events of this severity.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Critical => "red",
            Self::Elevated => "orange",
            Self::Enforcement => "blue",
            Self::Advisory => "gray",
            Self::Caution => "yellow",
        }
    }
}

/// Canonical classification of a traffic event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    /// Collisions and multi-vehicle accidents
    Crash,
    /// Road or ramp closed
    Closure,
    /// Work zones, bridge work, inspections
    Construction,
    /// Disabled vehicles, lane or shoulder blockages
    Blocked,
    /// Police or security activity
    Police,
    /// Weather conditions and advisories
    Weather,
    /// Debris and anything else unclassified
    Hazard,
}

impl EventType {
    /// Returns the presentation severity for this type.
    #[must_use]
    pub const fn severity(self) -> EventSeverity {
        match self {
            Self::Crash | Self::Closure => EventSeverity::Critical,
            Self::Construction | Self::Blocked => EventSeverity::Elevated,
            Self::Police => EventSeverity::Enforcement,
            Self::Weather => EventSeverity::Advisory,
            Self::Hazard => EventSeverity::Caution,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Crash,
            Self::Closure,
            Self::Construction,
            Self::Blocked,
            Self::Police,
            Self::Weather,
            Self::Hazard,
        ]
    }
}

/// A single reported hazard, closure, or incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEvent {
    /// Feed-assigned identifier, used for deduplication.
    pub id: String,
    /// Where the event is located.
    pub coordinate: Coordinate,
    /// Free-text description (the 511 message for live incidents).
    pub description: String,
    /// When the event starts (or was first seen, for live incidents).
    pub start: DateTime<Utc>,
    /// When the event is expected to end.
    pub end: DateTime<Utc>,
    /// Feed category, e.g. "Planned Event" or "Unplanned Incident".
    pub category: Option<String>,
    /// Feed subcategory, e.g. "Work Zone" or "Disabled Vehicle".
    pub subcategory: Option<String>,
    /// Which feed produced this event.
    pub source: EventSource,
}

impl TrafficEvent {
    /// Whether the event overlaps the half-open window
    /// `[window_start, window_end)`.
    #[must_use]
    pub fn is_active_in_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> bool {
        self.start < window_end && self.end > window_start
    }
}

/// A [`TrafficEvent`] found within the corridor of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIncident {
    /// The underlying event.
    #[serde(flatten)]
    pub event: TrafficEvent,
    /// Perpendicular offset from the route in miles.
    pub distance_to_route_miles: f64,
    /// Distance from the route start to the closest point, in miles.
    pub route_distance_miles: f64,
}

/// Where a tracked rider sits relative to a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderRouteStatus {
    /// Whether the rider is within the rider corridor.
    pub is_on_route: bool,
    /// Perpendicular offset from the route in miles.
    pub distance_to_route_miles: f64,
    /// How far along the route the rider has progressed, in miles.
    pub route_distance_miles: f64,
}

/// Corridor widths and validity windows used when checking routes.
///
/// Rider tracking uses a tighter band than hazard lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Corridor half-width in miles for hazards near a planned trip.
    #[serde(default = "default_hazard_corridor_miles")]
    pub hazard_corridor_miles: f64,
    /// Corridor half-width in miles for deciding a rider is on the route.
    #[serde(default = "default_rider_corridor_miles")]
    pub rider_corridor_miles: f64,
    /// How long a live incident is assumed to stay valid, in minutes.
    #[serde(default = "default_live_validity_minutes")]
    pub live_validity_minutes: u32,
}

const fn default_hazard_corridor_miles() -> f64 {
    0.3
}

const fn default_rider_corridor_miles() -> f64 {
    0.15
}

const fn default_live_validity_minutes() -> u32 {
    60
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            hazard_corridor_miles: default_hazard_corridor_miles(),
            rider_corridor_miles: default_rider_corridor_miles(),
            live_validity_minutes: default_live_validity_minutes(),
        }
    }
}

impl CorridorConfig {
    /// Validity window for live incidents as a [`chrono::Duration`].
    #[must_use]
    pub fn live_validity(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.live_validity_minutes))
    }
}
