//! Begrenzte Operations-Historie mit einstufigem Undo.
//!
//! Jeder Eintrag trägt die für die Umkehrung nötigen Daten als tiefe,
//! unveränderliche Kopie; spätere Mutationen am Modell können einen
//! aufgezeichneten Eintrag nicht mehr verfälschen. Undo ist einstufig
//! (kein Redo) und zeichnet selbst nie Historie auf, sonst würde
//! "Undo des Undo" den Stapel wieder füllen.

use crate::core::{Connection, GeoPoint, Marker, Roadbook};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Umkehrdaten einer aufgezeichneten Operation.
#[derive(Debug, Clone)]
pub enum HistoryOperation {
    /// Marker wurde platziert; Undo entfernt ihn (inkl. Kaskade)
    AddMarker { id: u64 },
    /// Marker wurde gelöscht; Undo stellt den vollständigen Schnappschuss
    /// wieder her. Kaskadiert gelöschte Verbindungen bleiben entfernt;
    /// nur der Marker selbst kehrt zurück.
    RemoveMarker { marker: Marker },
    /// Verbindung wurde erstellt; Undo entfernt sie
    AddConnection { id: u64 },
    /// Verbindung wurde gelöscht; Undo stellt den Schnappschuss wieder her
    RemoveConnection { connection: Connection },
    /// Marker wurde verschoben; Undo stellt nur die Position wieder her
    /// (Identität bleibt erhalten, kein voller Schnappschuss nötig)
    MoveMarker { id: u64, previous_position: GeoPoint },
}

/// Ein Eintrag der Operations-Historie.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub operation: HistoryOperation,
    /// Aufzeichnungszeitpunkt in Millisekunden seit Epoche
    pub recorded_at_ms: u64,
}

/// FIFO-begrenzter Undo-Stapel.
#[derive(Debug, Default)]
pub struct EditHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl EditHistory {
    /// Erstellt eine Historie mit maximaler Tiefe.
    pub fn new_with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Zeichnet eine Operation auf; bei vollem Stapel fliegt der
    /// älteste Eintrag heraus.
    pub fn record(&mut self, operation: HistoryOperation) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            operation,
            recorded_at_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        });
    }

    /// Anzahl aufgezeichneter Einträge.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` wenn keine Einträge vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` wenn ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Read-only Sicht auf die Einträge (ältester zuerst).
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Macht die jüngste Operation rückgängig.
    ///
    /// `false` wenn der Stapel leer ist oder die Umkehrung an einer
    /// veralteten Referenz scheitert; das Modell bleibt dann unverändert.
    pub fn undo(&mut self, book: &mut Roadbook) -> bool {
        let Some(entry) = self.entries.pop_back() else {
            log::debug!("Nichts zum Rückgängigmachen");
            return false;
        };

        match entry.operation {
            HistoryOperation::AddMarker { id } => match book.remove_marker(id) {
                Some((marker, _)) => {
                    log::info!("Platzieren rückgängig: {}", marker.title);
                    true
                }
                None => {
                    log::warn!("Undo: Marker {id} nicht mehr vorhanden");
                    false
                }
            },
            HistoryOperation::RemoveMarker { marker } => {
                log::info!("Löschen rückgängig: {}", marker.title);
                book.restore_marker(marker);
                true
            }
            HistoryOperation::AddConnection { id } => {
                if book.remove_connection(id).is_some() {
                    log::info!("Verbinden rückgängig: {id}");
                    true
                } else {
                    log::warn!("Undo: Verbindung {id} nicht mehr vorhanden");
                    false
                }
            }
            HistoryOperation::RemoveConnection { connection } => {
                let id = connection.id;
                match book.restore_connection(connection) {
                    Ok(()) => {
                        log::info!("Verbindungs-Löschen rückgängig: {id}");
                        true
                    }
                    Err(err) => {
                        log::warn!("Undo: Verbindung {id} nicht wiederherstellbar: {err}");
                        false
                    }
                }
            }
            HistoryOperation::MoveMarker {
                id,
                previous_position,
            } => match book.move_marker(id, previous_position) {
                Ok(Some(_)) => {
                    log::info!("Verschieben rückgängig: Marker {id}");
                    true
                }
                Ok(None) => {
                    log::warn!("Undo: Marker {id} nicht mehr vorhanden");
                    false
                }
                Err(err) => {
                    log::warn!("Undo: Verschieben nicht umkehrbar: {err}");
                    false
                }
            },
        }
    }
}
