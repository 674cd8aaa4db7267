//! MapEvent- und AppCommand-Enums für den Event-Fluss zwischen
//! Karten-Shell und Kern.
//!
//! Die Rendering-Oberfläche meldet Ereignisse bereits mit Entitäts-IDs
//! (sie zeichnet per ID); der Controller übersetzt sie in Commands und
//! führt diese auf dem AppState aus.

use crate::core::{GeoPoint, MarkerIcon, TransportType};
use chrono::NaiveDate;

/// Ereignisse der Karten-Oberfläche (extern erzeugt).
#[derive(Debug, Clone)]
pub enum MapEvent {
    /// Klick auf freie Kartenfläche
    MapClicked { position: GeoPoint },
    /// Klick auf einen Marker
    MarkerClicked { id: u64 },
    /// Drag eines Markers abgeschlossen (neue Position)
    MarkerDragged { id: u64, position: GeoPoint },
    /// Klick auf eine Verbindungslinie
    ConnectionClicked { id: u64 },
}

/// Mutierende und selektierende Commands auf dem AppState.
#[derive(Debug, Clone)]
pub enum AppCommand {
    // === Marker ===
    /// Marker an Position platzieren
    PlaceMarker { position: GeoPoint },
    /// Marker löschen (kaskadiert auf referenzierende Verbindungen)
    RemoveMarker { id: u64 },
    /// Marker verschieben
    MoveMarker { id: u64, position: GeoPoint },
    /// Titel ändern (nicht undo-fähig)
    SetMarkerTitle { id: u64, title: String },
    /// Label-Liste ersetzen (nicht undo-fähig)
    SetMarkerLabels { id: u64, labels: Vec<String> },
    /// Icon ändern (nicht undo-fähig)
    SetMarkerIcon { id: u64, icon: MarkerIcon },
    /// Zeitstempel-Liste ersetzen (leere Liste wird abgelehnt)
    SetMarkerDateTimes { id: u64, date_times: Vec<String> },
    /// Weiteren Zeitstempel anhängen (letzter Tag + 1 um 00:00)
    AddMarkerDateTime { id: u64 },
    /// Zeitstempel an Index entfernen (letzter wird abgelehnt)
    RemoveMarkerDateTime { id: u64, index: usize },

    // === Verbindungen ===
    /// Zwei Marker verbinden
    ConnectMarkers {
        start_id: u64,
        end_id: u64,
        transport: TransportType,
    },
    /// Verbindung löschen
    RemoveConnection { id: u64 },
    /// Transportart ändern (nicht undo-fähig)
    SetConnectionTransport { id: u64, transport: TransportType },
    /// Annotation ändern (nicht undo-fähig)
    SetConnectionLabel { id: u64, label: String },
    /// Zeitstempel ändern (nicht undo-fähig)
    SetConnectionDateTime { id: u64, date_time: String },
    /// Dauer in Stunden ändern (negativ wird abgelehnt)
    SetConnectionDuration { id: u64, duration: f64 },

    // === Tagesnotizen ===
    /// Notiz eines Kalendertags setzen (leer = entfernen)
    SetDateNote { date_key: String, note: String },

    // === Selektion & Modus ===
    SelectMarker { id: u64 },
    SelectConnection { id: u64 },
    /// Tagesfilter aktivieren
    SelectDate { date: NaiveDate },
    ClearSelection,
    /// Editor-Modus wechseln (View / Marker platzieren)
    SetEditorMode { mode: super::state::EditorMode },

    // === Historie ===
    Undo,

    // === Ansicht ===
    SetMapSource { layer: String },
    SetSearchMethod { method: String },

    // === Datei-I/O ===
    /// Dokument importieren (JSON oder HTML-Export), atomar
    ImportFile { path: String },
    /// Portablen Export schreiben
    ExportFile { path: String },
    /// Eigenständiges HTML-Dokument schreiben
    ExportHtml { path: String },
    /// Lokalen Schnappschuss schreiben
    SaveSnapshot { path: String },
    /// Alles leeren
    ClearAll,
}
