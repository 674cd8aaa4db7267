//! Core-Domänentypen: Marker, Verbindungen, Roadbook, Geodäsie, Datumslogik.

pub mod connection;
pub mod error;
pub mod geo;
pub mod marker;
/// Zentrale Datenstrukturen des Roadbooks
///
/// Dieses Modul definiert die Haupt-Datenstrukturen:
/// - Roadbook: Container für Marker, Verbindungen und Tagesnotizen
/// - Marker: Markierungspunkt mit Position, Icon und Zeitstempeln
/// - Connection: typisierte Verbindung zwischen zwei Markern
pub mod roadbook;
pub mod schedule;

pub use connection::{Connection, TransportType};
pub use error::ModelError;
pub use geo::{bearing_degrees, haversine_distance_meters, GeoPoint};
pub use marker::{Marker, MarkerIcon};
pub use roadbook::{Roadbook, TransportStat, TripStats, ViewSettings};
pub use schedule::{DateKey, DayView};
