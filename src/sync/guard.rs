//! Dirty-Tracking gegenüber dem zuletzt synchronisierten Cloud-Stand.
//!
//! Die Shell pollt `has_unsaved_changes` kooperativ in festem Intervall
//! (siehe `EditorOptions::sync_poll_interval_secs`), solange ein Remote-Plan
//! geöffnet ist, und beendet das Polling beim Schliessen des Plans.

use super::hash::compute_hash;
use crate::core::Roadbook;

/// Der aktuell geöffnete Remote-Plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePlan {
    pub id: String,
    pub name: String,
}

/// Vergleicht den aktuellen Modell-Inhalt mit dem zuletzt
/// synchronisierten Stand.
#[derive(Debug, Default)]
pub struct SyncGuard {
    active_plan: Option<ActivePlan>,
    last_synced_hash: Option<String>,
}

impl SyncGuard {
    /// Erstellt einen inaktiven Guard (kein Plan geöffnet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Öffnet einen Remote-Plan; der aktuelle Stand gilt als synchronisiert.
    pub fn open_plan(&mut self, id: String, name: String, book: &Roadbook) {
        log::info!("Remote-Plan geöffnet: {name} ({id})");
        self.active_plan = Some(ActivePlan { id, name });
        self.last_synced_hash = Some(compute_hash(book));
    }

    /// Markiert den aktuellen Stand als erfolgreich synchronisiert.
    pub fn mark_synced(&mut self, book: &Roadbook) {
        self.last_synced_hash = Some(compute_hash(book));
    }

    /// Schliesst die Plan-Sitzung; das Polling endet damit.
    pub fn close_plan(&mut self) {
        if let Some(plan) = self.active_plan.take() {
            log::info!("Remote-Plan geschlossen: {}", plan.name);
        }
        self.last_synced_hash = None;
    }

    /// Der aktuell geöffnete Plan, falls vorhanden.
    pub fn active_plan(&self) -> Option<&ActivePlan> {
        self.active_plan.as_ref()
    }

    /// `true` wenn sich der Inhalt seit dem letzten Sync geändert hat.
    /// Ohne geöffneten Plan immer `false`.
    pub fn has_unsaved_changes(&self, book: &Roadbook) -> bool {
        match &self.last_synced_hash {
            Some(last) => *last != compute_hash(book),
            None => false,
        }
    }
}
