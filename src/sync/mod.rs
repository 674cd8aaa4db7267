//! Cloud-Sync-Unterstützung: Inhalts-Signatur und Dirty-Tracking.

pub mod guard;
pub mod hash;

pub use guard::{ActivePlan, SyncGuard};
pub use hash::{canonical_string, compute_hash};
