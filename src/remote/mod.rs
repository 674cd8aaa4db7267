//! Externe Kollaborateure: Plan-Speicher (REST) und Geocoding-Suche.

pub mod geocode;
pub mod plan_store;

pub use geocode::{GeocodeCandidate, SearchDebounce, SearchMethod};
pub use plan_store::{Plan, PlanCreated, PlanStoreClient, PlanSummary, RemoteError};
