//! Toleranter Decoder für Roadbook-Dokumente.
//!
//! Grundsatz: Ein fehlerhaftes Gesamtdokument schlägt fehl und lässt das
//! bestehende Modell unberührt; einzelne nicht auflösbare Verbindungen
//! werden mit Warnung verworfen statt den Import zu kippen. Die Wahl
//! zwischen ID- und Index-Referenzen wird genau einmal hier getroffen;
//! stromabwärts existiert nur noch die kanonische ID-Form.

use super::document::{ConnectionRecord, MarkerRecord, RoadbookDocument};
use crate::core::schedule;
use crate::core::{Connection, GeoPoint, Marker, Roadbook, TransportType};
use anyhow::{Context, Result};

/// Ergebnisprotokoll eines Imports: verworfene Datensätze und Warnungen.
#[derive(Debug, Default)]
pub struct DecodeReport {
    /// Gesammelte Warnungstexte (bereits geloggt)
    pub warnings: Vec<String>,
    /// Anzahl verworfener Verbindungen
    pub dropped_connections: u32,
    /// Anzahl über Legacy-Indizes aufgelöster Verbindungen
    pub legacy_connections: u32,
}

impl DecodeReport {
    fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Endpunkt-Referenzen einer Verbindung, einmalig beim Dekodieren
/// aufgelöst (Index-Form hat Vorrang, wie im Bestandsformat).
enum EndpointRefs {
    ByIndex { start: usize, end: usize },
    ById { start: u64, end: u64 },
    Missing,
}

impl EndpointRefs {
    fn of(record: &ConnectionRecord) -> Self {
        match (
            record.start_index,
            record.end_index,
            record.start_id,
            record.end_id,
        ) {
            (Some(start), Some(end), _, _) => Self::ByIndex { start, end },
            (_, _, Some(start), Some(end)) => Self::ById { start, end },
            _ => Self::Missing,
        }
    }
}

/// Parst ein Roadbook-Dokument aus JSON.
pub fn decode_document(json: &str) -> Result<(Roadbook, DecodeReport)> {
    let doc: RoadbookDocument =
        serde_json::from_str(json).context("Roadbook-Dokument ist kein gültiges JSON")?;
    Ok(roadbook_from_document(&doc))
}

/// Baut das in-memory Roadbook aus einem Wire-Dokument auf.
pub fn roadbook_from_document(doc: &RoadbookDocument) -> (Roadbook, DecodeReport) {
    let mut book = Roadbook::new();
    let mut report = DecodeReport::default();

    if let Some(version) = &doc.version {
        log::info!("Importiere Roadbook-Version: {version}");
    }

    // Marker zuerst: Verbindungen referenzieren sie per ID oder Index
    let mut fallback_id = 0u64;
    for record in &doc.markers {
        let marker = decode_marker(record, &mut fallback_id, &mut report);
        book.restore_marker(marker);
    }

    for (index, record) in doc.connections.iter().enumerate() {
        match resolve_connection(record, &book, &mut report) {
            Ok(connection) => {
                if book.restore_connection(connection).is_err() {
                    // Auflösung hat beide Endpunkte geprüft; hier nur Schutz
                    report.dropped_connections += 1;
                }
            }
            Err(reason) => {
                let label = record
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| format!("#{index}"));
                report.warn(format!("Verbindung {label} verworfen: {reason}"));
                report.dropped_connections += 1;
            }
        }
    }

    // Eigenständige Labels früherer Versionen an den Marker übernehmen
    for label in &doc.labels {
        let Some(index) = label.marker_index.and_then(|i| usize::try_from(i).ok()) else {
            continue;
        };
        if label.content.is_empty() {
            continue;
        }
        match book.markers().get(index).map(|m| m.id) {
            Some(id) => {
                if let Some(marker) = book.marker_mut(id) {
                    marker.labels.push(label.content.clone());
                }
            }
            None => report.warn(format!(
                "Eigenständiges Label übersprungen: Marker-Index {index} existiert nicht"
            )),
        }
    }

    for (date, note) in &doc.date_notes {
        book.set_date_note(date, note);
    }

    if let Some(layer) = &doc.current_layer {
        book.view.current_layer = layer.clone();
    }
    if let Some(method) = &doc.current_search_method {
        book.view.current_search_method = method.clone();
    }

    log::info!(
        "Roadbook geladen: {} Marker, {} Verbindungen, {} Tagesnotizen",
        book.marker_count(),
        book.connection_count(),
        book.date_notes.len()
    );

    (book, report)
}

fn decode_marker(
    record: &MarkerRecord,
    fallback_id: &mut u64,
    report: &mut DecodeReport,
) -> Marker {
    let id = match record.id {
        Some(id) => id,
        None => {
            *fallback_id += 1;
            report.warn(format!(
                "Marker ohne ID, vergebe Ersatz-ID {fallback_id}"
            ));
            *fallback_id
        }
    };

    // dateTimes ?? [dateTime]; leere Einträge fallen heraus
    let date_times: Vec<String> = record
        .date_times
        .clone()
        .or_else(|| record.date_time.clone().map(|dt| vec![dt]))
        .unwrap_or_default()
        .into_iter()
        .filter(|dt| !dt.trim().is_empty())
        .collect();

    let created_at = record
        .created_at
        .clone()
        .unwrap_or_else(schedule::current_local_date_time);
    let fallback_date_time = created_at.clone();

    Marker::restore(
        id,
        GeoPoint::new(record.position[0], record.position[1]),
        record.title.clone(),
        record.labels.clone(),
        record.icon.clone().unwrap_or_default(),
        created_at,
        date_times,
        fallback_date_time,
    )
}

/// Löst die Endpunkt-Referenzen auf und baut die kanonische Verbindung.
/// `Err` trägt den Verwerfungsgrund (die Verbindung wird fallen gelassen).
fn resolve_connection(
    record: &ConnectionRecord,
    book: &Roadbook,
    report: &mut DecodeReport,
) -> Result<Connection, String> {
    let (start, end) = match EndpointRefs::of(record) {
        EndpointRefs::ByIndex { start, end } => {
            report.legacy_connections += 1;
            let start_id = book
                .markers()
                .get(start)
                .ok_or_else(|| format!("Start-Index {start} ausserhalb des Marker-Arrays"))?
                .id;
            let end_id = book
                .markers()
                .get(end)
                .ok_or_else(|| format!("End-Index {end} ausserhalb des Marker-Arrays"))?
                .id;
            (start_id, end_id)
        }
        EndpointRefs::ById { start, end } => {
            if book.marker(start).is_none() {
                return Err(format!("Start-Marker {start} existiert nicht"));
            }
            if book.marker(end).is_none() {
                return Err(format!("End-Marker {end} existiert nicht"));
            }
            (start, end)
        }
        EndpointRefs::Missing => {
            return Err("weder ID- noch Index-Referenzen vorhanden".to_string())
        }
    };

    if start == end {
        return Err(format!("Start und Ziel identisch (Marker {start})"));
    }

    let id = match record.id {
        Some(id) => id,
        None => {
            // Legacy-Bestände ohne Verbindungs-ID: deterministische Ersatz-ID
            let max = book.connections().iter().map(|c| c.id).max().unwrap_or(0);
            max + 1
        }
    };

    let duration = record.duration.unwrap_or(0.0);
    let duration = if duration.is_finite() && duration >= 0.0 {
        duration
    } else {
        report.warn(format!("Verbindung {id}: ungültige Dauer, setze 0"));
        0.0
    };

    let start_title = record
        .start_title
        .clone()
        .or_else(|| book.marker(start).map(|m| m.title.clone()))
        .unwrap_or_default();
    let end_title = record
        .end_title
        .clone()
        .or_else(|| book.marker(end).map(|m| m.title.clone()))
        .unwrap_or_default();

    Ok(Connection {
        id,
        start_id: start,
        end_id: end,
        transport: TransportType::from_wire(&record.transport_type),
        date_time: record
            .date_time
            .clone()
            .unwrap_or_else(schedule::current_local_date_time),
        label: record.label.clone().unwrap_or_default(),
        duration,
        start_title,
        end_title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MarkerIcon;

    const ID_BASED_FIXTURE: &str = r##"{
        "version": "2.0",
        "exportTime": "2024-05-01T02:00:00.000Z",
        "currentLayer": "osm",
        "currentSearchMethod": "nominatim",
        "markers": [
            {"id": 100, "position": [39.9042, 116.4074], "title": "北京",
             "labels": ["首都"], "createdAt": "2024-05-01 09:00:00",
             "dateTimes": ["2024-05-01 09:00:00"],
             "icon": {"type": "number", "icon": "1", "color": "#667eea"}},
            {"id": 200, "position": [31.2304, 121.4737], "title": "上海",
             "labels": [], "createdAt": "2024-05-01 09:05:00",
             "dateTimes": ["2024-05-02 08:00:00"],
             "icon": {"type": "number", "icon": "2", "color": "#667eea"}}
        ],
        "connections": [
            {"id": 300, "startId": 100, "endId": 200, "transportType": "train",
             "dateTime": "2024-05-01 09:00:00", "label": "高铁",
             "duration": 4.5, "startTitle": "北京", "endTitle": "上海"}
        ],
        "labels": [],
        "dateNotes": {"2024-05-01": "出发日"}
    }"##;

    const LEGACY_INDEX_FIXTURE: &str = r#"{
        "version": "1.0",
        "markers": [
            {"id": 100, "position": [39.9042, 116.4074], "title": "北京",
             "dateTime": "2024-05-01 09:00:00"},
            {"id": 200, "position": [31.2304, 121.4737], "title": "上海",
             "dateTime": "2024-05-02 08:00:00"}
        ],
        "connections": [
            {"startIndex": 0, "endIndex": 1, "transportType": "train",
             "dateTime": "2024-05-01 09:00:00", "duration": 4.5}
        ]
    }"#;

    #[test]
    fn test_decode_id_based_document() {
        let (book, report) = decode_document(ID_BASED_FIXTURE).expect("dekodierbar");

        assert_eq!(book.marker_count(), 2);
        assert_eq!(book.connection_count(), 1);
        assert_eq!(report.dropped_connections, 0);
        assert_eq!(report.legacy_connections, 0);

        let conn = book.connection(300).expect("Verbindung 300");
        assert_eq!(conn.start_id, 100);
        assert_eq!(conn.end_id, 200);
        assert_eq!(conn.transport, TransportType::Train);
        assert_eq!(conn.duration, 4.5);

        assert_eq!(book.view.current_layer, "osm");
        assert_eq!(book.view.current_search_method, "nominatim");
        assert_eq!(book.date_note("2024-05-01"), Some("出发日"));
    }

    #[test]
    fn test_legacy_index_fixture_yields_same_graph_as_id_fixture() {
        let (by_id, _) = decode_document(ID_BASED_FIXTURE).expect("ID-Form");
        let (by_index, report) = decode_document(LEGACY_INDEX_FIXTURE).expect("Index-Form");

        assert_eq!(report.legacy_connections, 1);

        // Gleicher Verbindungsgraph: identische Endpunkt-IDs und Transportart
        let conn_id = &by_id.connections()[0];
        let conn_index = &by_index.connections()[0];
        assert_eq!(conn_index.start_id, conn_id.start_id);
        assert_eq!(conn_index.end_id, conn_id.end_id);
        assert_eq!(conn_index.transport, conn_id.transport);
        assert_eq!(conn_index.duration, conn_id.duration);
    }

    #[test]
    fn test_legacy_single_date_time_becomes_list() {
        let (book, _) = decode_document(LEGACY_INDEX_FIXTURE).expect("dekodierbar");
        let marker = book.marker(100).expect("Marker 100");
        assert_eq!(marker.date_times(), ["2024-05-01 09:00:00"]);
    }

    #[test]
    fn test_unresolvable_connection_is_dropped_with_warning() {
        let json = r#"{
            "markers": [{"id": 1, "position": [0.0, 0.0], "title": "A",
                         "dateTimes": ["2024-01-01 00:00:00"]}],
            "connections": [
                {"id": 9, "startId": 1, "endId": 999, "transportType": "car"},
                {"id": 10, "startId": 1, "endId": 1, "transportType": "car"}
            ]
        }"#;
        let (book, report) = decode_document(json).expect("dekodierbar");
        assert_eq!(book.connection_count(), 0);
        assert_eq!(report.dropped_connections, 2);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "markers": [{"id": 1, "position": [10.0, 20.0]}],
            "connections": []
        }"#;
        let (book, _) = decode_document(json).expect("dekodierbar");
        let marker = book.marker(1).expect("Marker 1");
        assert!(marker.labels.is_empty());
        assert_eq!(marker.icon, MarkerIcon::default());
        // Ohne jeden Zeitstempel greift der createdAt-Fallback; die
        // Nicht-leer-Invariante bleibt erhalten
        assert_eq!(marker.date_times().len(), 1);
    }

    #[test]
    fn test_malformed_document_fails_wholesale() {
        assert!(decode_document("{ kein json").is_err());
        assert!(decode_document(r#"{"markers": "nicht-array"}"#).is_err());
    }

    #[test]
    fn test_standalone_labels_attach_to_markers() {
        let json = r#"{
            "markers": [{"id": 1, "position": [0.0, 0.0],
                         "dateTimes": ["2024-01-01 00:00:00"]}],
            "connections": [],
            "labels": [{"markerIndex": 0, "content": "老备注"},
                       {"markerIndex": -1, "content": "verwaist"},
                       {"markerIndex": 7, "content": "ausserhalb"}]
        }"#;
        let (book, report) = decode_document(json).expect("dekodierbar");
        assert_eq!(book.marker(1).expect("Marker 1").labels, ["老备注"]);
        assert_eq!(report.warnings.len(), 1);
    }
}
