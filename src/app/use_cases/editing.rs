//! Use-Cases: Marker und Verbindungen bearbeiten (mit Historie).
//!
//! Lookup-Fehler sind nie fatal: Die UI muss nach einer veralteten
//! Referenz weiterlaufen, deshalb wird gewarnt statt geworfen.
//! Titel-, Label- und Icon-Edits laufen ohne Historien-Eintrag;
//! undo-fähig sind nur Platzieren, Löschen, Verschieben und Verbinden.

use super::io;
use crate::app::history::HistoryOperation;
use crate::app::state::{AppState, EditorMode, Selection};
use crate::core::{GeoPoint, MarkerIcon, TransportType};

/// Platziert einen Marker an der Klick-Position und selektiert ihn.
/// Der Platzier-Modus endet danach (ein Klick, ein Marker).
pub fn place_marker(state: &mut AppState, position: GeoPoint) {
    match state.roadbook.add_marker(position, None) {
        Ok(id) => {
            let title = state
                .roadbook
                .marker(id)
                .map(|m| m.title.clone())
                .unwrap_or_default();
            state.history.record(HistoryOperation::AddMarker { id });
            state.selection = Selection::Marker(id);
            state.mode = EditorMode::View;
            log::info!(
                "Marker platziert: {} bei [{:.6}, {:.6}]",
                title,
                position.lat(),
                position.lng()
            );
            io::autosave(state);
        }
        Err(err) => log::warn!("Marker nicht platzierbar: {err}"),
    }
}

/// Löscht einen Marker inklusive referenzierender Verbindungen.
pub fn remove_marker(state: &mut AppState, id: u64) {
    let Some((marker, cascaded)) = state.roadbook.remove_marker(id) else {
        log::warn!("Löschen: Marker {id} nicht gefunden");
        return;
    };

    log::info!(
        "Marker gelöscht: {} ({} Verbindung(en) kaskadiert)",
        marker.title,
        cascaded.len()
    );
    state
        .history
        .record(HistoryOperation::RemoveMarker { marker });

    // Selektion bereinigen, falls sie auf gelöschte Entitäten zeigt
    match state.selection {
        Selection::Marker(selected) if selected == id => state.selection = Selection::None,
        Selection::Connection(selected)
            if cascaded.iter().any(|conn| conn.id == selected) =>
        {
            state.selection = Selection::None
        }
        _ => {}
    }

    io::autosave(state);
}

/// Verschiebt einen Marker (Drag-Ende der Kartenoberfläche).
pub fn move_marker(state: &mut AppState, id: u64, position: GeoPoint) {
    match state.roadbook.move_marker(id, position) {
        Ok(Some(previous_position)) => {
            state.history.record(HistoryOperation::MoveMarker {
                id,
                previous_position,
            });
            io::autosave(state);
        }
        Ok(None) => log::warn!("Verschieben: Marker {id} nicht gefunden"),
        Err(err) => log::warn!("Verschieben abgelehnt: {err}"),
    }
}

/// Verbindet zwei Marker mit der gewählten Transportart.
pub fn connect_markers(state: &mut AppState, start_id: u64, end_id: u64, transport: TransportType) {
    match state.roadbook.add_connection(start_id, end_id, transport) {
        Ok(id) => {
            log::info!("Verbindung {start_id}→{end_id} erstellt ({id})");
            state.history.record(HistoryOperation::AddConnection { id });
            state.selection = Selection::Connection(id);
            io::autosave(state);
        }
        Err(err) => log::warn!("Verbindung nicht möglich: {err}"),
    }
}

/// Löscht eine Verbindung.
pub fn remove_connection(state: &mut AppState, id: u64) {
    let Some(connection) = state.roadbook.remove_connection(id) else {
        log::warn!("Löschen: Verbindung {id} nicht gefunden");
        return;
    };

    log::info!(
        "Verbindung gelöscht: {} → {}",
        connection.start_title,
        connection.end_title
    );
    state
        .history
        .record(HistoryOperation::RemoveConnection { connection });

    if state.selection.is_connection(id) {
        state.selection = Selection::None;
    }

    io::autosave(state);
}

/// Setzt den Marker-Titel.
pub fn set_marker_title(state: &mut AppState, id: u64, title: String) {
    let Some(marker) = state.roadbook.marker_mut(id) else {
        log::warn!("Titel-Edit: Marker {id} nicht gefunden");
        return;
    };
    marker.title = title;
    io::autosave(state);
}

/// Ersetzt die Label-Liste eines Markers.
pub fn set_marker_labels(state: &mut AppState, id: u64, labels: Vec<String>) {
    let Some(marker) = state.roadbook.marker_mut(id) else {
        log::warn!("Label-Edit: Marker {id} nicht gefunden");
        return;
    };
    marker.labels = labels;
    io::autosave(state);
}

/// Setzt das Marker-Icon.
pub fn set_marker_icon(state: &mut AppState, id: u64, icon: MarkerIcon) {
    let Some(marker) = state.roadbook.marker_mut(id) else {
        log::warn!("Icon-Edit: Marker {id} nicht gefunden");
        return;
    };
    marker.icon = icon;
    io::autosave(state);
}

/// Ersetzt die Zeitstempel-Liste eines Markers (leer wird abgelehnt).
pub fn set_marker_date_times(state: &mut AppState, id: u64, date_times: Vec<String>) {
    let Some(marker) = state.roadbook.marker_mut(id) else {
        log::warn!("Zeitstempel-Edit: Marker {id} nicht gefunden");
        return;
    };
    match marker.set_date_times(date_times) {
        Ok(()) => io::autosave(state),
        Err(err) => log::warn!("Zeitstempel-Edit abgelehnt: {err}"),
    }
}

/// Ändert die Transportart einer Verbindung.
pub fn set_connection_transport(state: &mut AppState, id: u64, transport: TransportType) {
    let Some(connection) = state.roadbook.connection_mut(id) else {
        log::warn!("Transport-Edit: Verbindung {id} nicht gefunden");
        return;
    };
    connection.transport = transport;
    io::autosave(state);
}

/// Ändert die Annotation einer Verbindung.
pub fn set_connection_label(state: &mut AppState, id: u64, label: String) {
    let Some(connection) = state.roadbook.connection_mut(id) else {
        log::warn!("Label-Edit: Verbindung {id} nicht gefunden");
        return;
    };
    connection.label = label;
    io::autosave(state);
}

/// Ändert den Zeitstempel einer Verbindung.
pub fn set_connection_date_time(state: &mut AppState, id: u64, date_time: String) {
    let Some(connection) = state.roadbook.connection_mut(id) else {
        log::warn!("Zeit-Edit: Verbindung {id} nicht gefunden");
        return;
    };
    connection.date_time = date_time;
    io::autosave(state);
}

/// Ändert die Dauer einer Verbindung (Stunden, nie negativ).
pub fn set_connection_duration(state: &mut AppState, id: u64, duration: f64) {
    if !duration.is_finite() || duration < 0.0 {
        log::warn!("Dauer-Edit abgelehnt: {duration} ist ungültig");
        return;
    }
    let Some(connection) = state.roadbook.connection_mut(id) else {
        log::warn!("Dauer-Edit: Verbindung {id} nicht gefunden");
        return;
    };
    connection.duration = duration;
    io::autosave(state);
}

/// Macht die jüngste Operation rückgängig. Undo selbst landet nie
/// in der Historie.
pub fn undo(state: &mut AppState) -> bool {
    let undone = state.history.undo(&mut state.roadbook);
    if undone {
        // Selektion kann auf eine soeben entfernte Entität zeigen
        state.selection = Selection::None;
        io::autosave(state);
    }
    undone
}
