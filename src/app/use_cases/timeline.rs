//! Use-Cases: Zeitstempel-Listen und Tagesnotizen pflegen.

use super::io;
use crate::app::state::AppState;

/// Hängt einem Marker einen weiteren Zeitstempel an
/// (letzter Tag + 1 um 00:00:00).
pub fn add_marker_date_time(state: &mut AppState, id: u64) {
    match state.roadbook.add_marker_date_time(id) {
        Ok(date_time) => {
            log::info!("Marker {id}: Zeitstempel {date_time} angehängt");
            io::autosave(state);
        }
        Err(err) => log::warn!("Zeitstempel nicht anhängbar: {err}"),
    }
}

/// Entfernt den Zeitstempel an `index`; der letzte verbleibende
/// Zeitstempel wird abgelehnt und der Marker bleibt unverändert.
pub fn remove_marker_date_time(state: &mut AppState, id: u64, index: usize) {
    match state.roadbook.remove_marker_date_time(id, index) {
        Ok(()) => {
            log::info!("Marker {id}: Zeitstempel {index} entfernt");
            io::autosave(state);
        }
        Err(err) => log::warn!("Zeitstempel nicht entfernbar: {err}"),
    }
}

/// Setzt die Tagesnotiz eines Kalendertags (leerer Text entfernt sie).
pub fn set_date_note(state: &mut AppState, date_key: &str, note: &str) {
    state.roadbook.set_date_note(date_key, note);
    io::autosave(state);
}
