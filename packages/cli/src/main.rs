#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line route incident checker.
//!
//! Loads a route exported as `GeoJSON` plus any planned-event and
//! live-incident feed documents, then lists the incidents inside the
//! route corridor in the order they will be encountered. The `rider`
//! subcommand answers whether a single position is on the route.

mod config;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use ride_route_feed::FeedError;
use ride_route_geometry::{GeometryError, Route};
use ride_route_geometry_models::Coordinate;
use ride_route_traffic::{
    CorridorReport, check_rider_position, find_route_incidents, get_event_type,
};
use ride_route_traffic_models::{EventSeverity, EventType, RouteIncident, TrafficEvent};
use serde::Serialize;

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`ride_route_traffic_models::CorridorConfig`].
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A corridor width is negative or not a number.
    #[error("Invalid corridor width for {name}: {value}")]
    InvalidCorridor {
        /// Which setting was invalid.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A rider position is not a finite coordinate.
    #[error("Invalid position: {latitude}, {longitude}")]
    InvalidPosition {
        /// Supplied latitude.
        latitude: f64,
        /// Supplied longitude.
        longitude: f64,
    },

    /// `--active-days` reaches past the last representable date.
    #[error("Active window of {days} days is out of range")]
    ActiveWindowOverflow {
        /// Requested window length.
        days: i64,
    },

    /// Route file could not be loaded.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Feed file could not be loaded.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// JSON output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "ride_route", about = "Route incident checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List traffic events within the corridor of a route
    Check {
        /// `GeoJSON` file containing the route line
        #[arg(long)]
        route: PathBuf,
        /// Planned-event JSON feed document
        #[arg(long)]
        planned: Option<PathBuf>,
        /// Live-incident XML feed document
        #[arg(long)]
        live: Option<PathBuf>,
        /// Corridor half-width in miles (overrides the config file)
        #[arg(long)]
        corridor: Option<f64>,
        /// Only consider events active within this many days from now
        #[arg(long)]
        active_days: Option<u32>,
        /// TOML file with corridor settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print JSON instead of a text listing
        #[arg(long)]
        json: bool,
    },
    /// Check whether a rider position is on a route
    Rider {
        /// `GeoJSON` file containing the route line
        #[arg(long)]
        route: PathBuf,
        /// Rider latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Rider longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Corridor half-width in miles (overrides the config file)
        #[arg(long)]
        corridor: Option<f64>,
        /// TOML file with corridor settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// A route incident with its derived type, as printed by `check --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IncidentOutput<'a> {
    #[serde(flatten)]
    incident: &'a RouteIncident,
    event_type: EventType,
    severity: EventSeverity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput<'a> {
    total_miles: f64,
    corridor_miles: f64,
    skipped: usize,
    duplicates: usize,
    incidents: Vec<IncidentOutput<'a>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            route,
            planned,
            live,
            corridor,
            active_days,
            config,
            json,
        } => {
            let config = config::load_config(config.as_deref())?;
            let corridor = resolve_corridor(corridor, config.hazard_corridor_miles)?;
            let now = Utc::now();

            let route = load_route(&route)?;
            let mut events = load_events(
                planned.as_deref(),
                live.as_deref(),
                now,
                config.live_validity(),
            )?;

            if let Some(days) = active_days {
                events = active_events(events, now, i64::from(days))?;
            }

            let report = find_route_incidents(&route, &events, corridor);
            log::info!(
                "{} incidents within {corridor} mi of a {:.1} mi route",
                report.incidents.len(),
                route.total_miles()
            );

            if json {
                let output = check_output(&route, corridor, &report);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_report(&route, corridor, &report);
            }
        }
        Commands::Rider {
            route,
            lat,
            lng,
            corridor,
            config,
            json,
        } => {
            let config = config::load_config(config.as_deref())?;
            let corridor = resolve_corridor(corridor, config.rider_corridor_miles)?;
            let route = load_route(&route)?;

            let status = check_rider_position(&route, Coordinate::new(lat, lng), corridor)
                .ok_or(CliError::InvalidPosition {
                    latitude: lat,
                    longitude: lng,
                })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else if status.is_on_route {
                println!(
                    "On route: {:.2} mi along, {:.2} mi off the line",
                    status.route_distance_miles, status.distance_to_route_miles
                );
            } else {
                println!(
                    "Off route: {:.2} mi from the line (corridor {corridor} mi)",
                    status.distance_to_route_miles
                );
            }
        }
    }

    Ok(())
}

/// Picks the flag value if given, otherwise the configured value.
fn resolve_corridor(flag: Option<f64>, configured: f64) -> Result<f64, CliError> {
    let Some(value) = flag else {
        return Ok(configured);
    };
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::InvalidCorridor {
            name: "--corridor",
            value,
        });
    }
    Ok(value)
}

fn load_route(path: &Path) -> Result<Route, CliError> {
    let route = Route::load(path)?;
    if route.is_degenerate() {
        log::warn!(
            "Route {} has fewer than two points; nothing can be on it",
            path.display()
        );
    }
    Ok(route)
}

fn load_events(
    planned: Option<&Path>,
    live: Option<&Path>,
    now: DateTime<Utc>,
    live_validity: Duration,
) -> Result<Vec<TrafficEvent>, CliError> {
    let mut events = Vec::new();

    if let Some(path) = planned {
        events.extend(ride_route_feed::load_planned_events(path)?);
    }

    if let Some(path) = live {
        let feed = ride_route_feed::load_live_incidents(path, now, live_validity)?;
        for (incident_type, count) in &feed.type_counts {
            log::debug!("  {incident_type}: {count}");
        }
        events.extend(feed.incidents);
    }

    if events.is_empty() {
        log::warn!("No traffic events loaded; pass --planned and/or --live");
    }

    Ok(events)
}

/// Keeps the events active in `[now, now + days)`.
fn active_events(
    events: Vec<TrafficEvent>,
    now: DateTime<Utc>,
    days: i64,
) -> Result<Vec<TrafficEvent>, CliError> {
    let window_end = Duration::try_days(days)
        .and_then(|window| now.checked_add_signed(window))
        .ok_or(CliError::ActiveWindowOverflow { days })?;

    let before = events.len();
    let active: Vec<TrafficEvent> = ride_route_traffic::filter_active(&events, now, window_end)
        .into_iter()
        .cloned()
        .collect();
    log::debug!("{} of {before} events active in window", active.len());
    Ok(active)
}

fn check_output<'a>(route: &Route, corridor: f64, report: &'a CorridorReport) -> CheckOutput<'a> {
    CheckOutput {
        total_miles: route.total_miles(),
        corridor_miles: corridor,
        skipped: report.skipped,
        duplicates: report.duplicates,
        incidents: report
            .incidents
            .iter()
            .map(|incident| {
                let event_type = get_event_type(&incident.event);
                IncidentOutput {
                    incident,
                    event_type,
                    severity: event_type.severity(),
                }
            })
            .collect(),
    }
}

fn print_report(route: &Route, corridor: f64, report: &CorridorReport) {
    println!("Route: {:.1} mi, corridor {corridor} mi", route.total_miles());

    if report.incidents.is_empty() {
        println!("No incidents on route");
    }

    for incident in &report.incidents {
        println!(
            "{:>7.2} mi  {:<12} {:.2} mi off  {}",
            incident.route_distance_miles,
            get_event_type(&incident.event).as_ref(),
            incident.distance_to_route_miles,
            incident.event.description
        );
    }

    let counts = ride_route_traffic::type_counts(&report.incidents);
    if !counts.is_empty() {
        let summary: Vec<String> = counts
            .iter()
            .map(|(ty, count)| format!("{ty}: {count}"))
            .collect();
        println!("{}", summary.join(", "));
    }

    if report.skipped > 0 || report.duplicates > 0 {
        println!(
            "({} skipped with bad coordinates, {} duplicates)",
            report.skipped, report.duplicates
        );
    }
}
