//! Roadbook Editor Library.
//! Kern-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod json;
pub mod remote;
pub mod shared;
pub mod sync;

pub use app::{
    AppCommand, AppController, AppState, CommandLog, EditHistory, EditorMode, HistoryOperation,
    MapEvent, Selection,
};
pub use core::{
    bearing_degrees, haversine_distance_meters, Connection, DateKey, DayView, GeoPoint, Marker,
    MarkerIcon, ModelError, Roadbook, TransportType,
};
pub use json::{
    decode_document, encode_document, export_html, import_html, DecodeReport, DocumentKind,
    RoadbookDocument,
};
pub use remote::{GeocodeCandidate, PlanStoreClient, SearchDebounce, SearchMethod};
pub use shared::EditorOptions;
pub use sync::{compute_hash, SyncGuard};
