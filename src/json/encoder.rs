//! Encoder für Roadbook-Dokumente.
//!
//! Schreibt immer die aktuelle Generation (ID-basierte Referenzen) und
//! frischt die denormalisierten Anzeige-Titel aus den lebenden Markern
//! auf. Die `labels`-Liste bleibt als leeres Feld erhalten (Kompatibilität
//! mit Lesern, die das Feld erwarten).

use super::document::{
    ConnectionRecord, MarkerRecord, RoadbookDocument, EXPORT_VERSION, LOCAL_SNAPSHOT_VERSION,
};
use crate::core::{Connection, Marker, Roadbook};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

/// Ziel-Form der Serialisierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Lokaler Schnappschuss (mit Speicherzeitpunkt)
    LocalSnapshot,
    /// Portabler Export (Datei-Download, HTML-Payload, Plan-Inhalt)
    PortableExport,
}

/// Baut das Wire-Dokument aus dem in-memory Roadbook.
pub fn document_from_roadbook(book: &Roadbook, kind: DocumentKind) -> RoadbookDocument {
    let now_iso = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let (version, save_time, export_time) = match kind {
        DocumentKind::LocalSnapshot => (LOCAL_SNAPSHOT_VERSION, Some(now_iso), None),
        DocumentKind::PortableExport => (EXPORT_VERSION, None, Some(now_iso)),
    };

    RoadbookDocument {
        version: Some(version.to_string()),
        save_time,
        export_time,
        current_layer: Some(book.view.current_layer.clone()),
        current_search_method: Some(book.view.current_search_method.clone()),
        markers: book.markers().iter().map(marker_record).collect(),
        connections: book
            .connections()
            .iter()
            .map(|conn| connection_record(book, conn))
            .collect(),
        labels: Vec::new(),
        date_notes: book.date_notes.clone(),
    }
}

/// Serialisiert das Roadbook als JSON-Text (eingerückt, wie die
/// heruntergeladenen Export-Dateien).
pub fn encode_document(book: &Roadbook, kind: DocumentKind) -> Result<String> {
    let doc = document_from_roadbook(book, kind);
    serde_json::to_string_pretty(&doc).context("Roadbook-Dokument nicht serialisierbar")
}

fn marker_record(marker: &Marker) -> MarkerRecord {
    MarkerRecord {
        id: Some(marker.id),
        position: [marker.position.lat(), marker.position.lng()],
        title: marker.title.clone(),
        labels: marker.labels.clone(),
        created_at: Some(marker.created_at.clone()),
        date_times: Some(marker.date_times().to_vec()),
        date_time: None,
        icon: Some(marker.icon.clone()),
    }
}

fn connection_record(book: &Roadbook, conn: &Connection) -> ConnectionRecord {
    let (start_title, end_title) = book.connection_display_titles(conn);
    ConnectionRecord {
        id: Some(conn.id),
        start_id: Some(conn.start_id),
        end_id: Some(conn.end_id),
        start_index: None,
        end_index: None,
        transport_type: conn.transport.as_wire().to_string(),
        date_time: Some(conn.date_time.clone()),
        label: Some(conn.label.clone()),
        duration: Some(conn.duration),
        start_title: Some(start_title),
        end_title: Some(end_title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeoPoint, TransportType};

    fn sample_book() -> Roadbook {
        let mut book = Roadbook::new();
        let a = book
            .add_marker(GeoPoint::new(39.9042, 116.4074), Some("2024-05-01 09:00:00".into()))
            .expect("Marker A");
        let b = book
            .add_marker(GeoPoint::new(31.2304, 121.4737), None)
            .expect("Marker B");
        book.add_connection(a, b, TransportType::Train).expect("Verbindung");
        book.set_date_note("2024-05-01", "出发日");
        book
    }

    #[test]
    fn test_kinds_differ_only_in_version_and_timestamp_field() {
        let book = sample_book();

        let snapshot = document_from_roadbook(&book, DocumentKind::LocalSnapshot);
        assert_eq!(snapshot.version.as_deref(), Some("localStorage-v2.0"));
        assert!(snapshot.save_time.is_some());
        assert!(snapshot.export_time.is_none());

        let export = document_from_roadbook(&book, DocumentKind::PortableExport);
        assert_eq!(export.version.as_deref(), Some("2.0"));
        assert!(export.save_time.is_none());
        assert!(export.export_time.is_some());

        assert_eq!(snapshot.markers.len(), export.markers.len());
        assert_eq!(snapshot.connections.len(), export.connections.len());
    }

    #[test]
    fn test_encode_emits_id_references_and_no_legacy_fields() {
        let book = sample_book();
        let json = encode_document(&book, DocumentKind::PortableExport).expect("Export");

        assert!(json.contains("\"startId\""));
        assert!(json.contains("\"endId\""));
        assert!(!json.contains("\"startIndex\""));
        assert!(!json.contains("\"dateTime\": null"));
    }

    #[test]
    fn test_denormalized_titles_are_refreshed_from_live_markers() {
        let mut book = sample_book();
        let marker_id = book.markers()[0].id;
        book.marker_mut(marker_id).expect("Marker").title = "故宫".to_string();

        let doc = document_from_roadbook(&book, DocumentKind::PortableExport);
        assert_eq!(doc.connections[0].start_title.as_deref(), Some("故宫"));
    }
}
