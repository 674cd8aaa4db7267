//! Wire-Format der Roadbook-Dokumente (lokaler Schnappschuss und
//! portabler Export).
//!
//! Beide Formen teilen sich die Struktur; sie unterscheiden sich nur im
//! `version`-Wert und im Zeitstempel-Feld. Der Decoder akzeptiert
//! zusätzlich die Legacy-Generation, in der Verbindungen Marker über
//! Array-Positionen statt über stabile IDs referenzieren.

use crate::core::MarkerIcon;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `version`-Wert des lokalen Schnappschusses.
pub const LOCAL_SNAPSHOT_VERSION: &str = "localStorage-v2.0";
/// `version`-Wert des portablen Exports (ID-basierte Referenzen).
pub const EXPORT_VERSION: &str = "2.0";

/// Wurzel-Objekt beider Serialisierungsformen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadbookDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Speicherzeitpunkt (nur lokaler Schnappschuss), ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_time: Option<String>,
    /// Exportzeitpunkt (nur portabler Export), ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_time: Option<String>,
    /// Kennung der aktiven Kartenquelle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_layer: Option<String>,
    /// Kennung des aktiven Suchdienstes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_search_method: Option<String>,
    #[serde(default)]
    pub markers: Vec<MarkerRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    /// Eigenständige Text-Labels früherer Versionen; aktuelle Bestände
    /// führen Labels am Marker und schreiben hier eine leere Liste
    #[serde(default)]
    pub labels: Vec<StandaloneLabelRecord>,
    /// Tagesnotizen: "YYYY-MM-DD" → Freitext
    #[serde(default)]
    pub date_notes: IndexMap<String, String>,
}

/// Marker im Wire-Format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// `[lat, lng]` in Dezimalgrad
    pub position: [f64; 2],
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Zeitstempel-Liste (aktuelle Generation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_times: Option<Vec<String>>,
    /// Einzelner Zeitstempel (Legacy-Generation); beim Dekodieren gilt
    /// `dateTimes ?? [dateTime]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<MarkerIcon>,
}

/// Verbindung im Wire-Format.
///
/// Entweder `startId`/`endId` (aktuell) oder `startIndex`/`endIndex`
/// (Legacy, Positionen im Marker-Array zum Speicherzeitpunkt).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub transport_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_title: Option<String>,
}

/// Eigenständiges Text-Label früherer Versionen (positionsbezogen).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneLabelRecord {
    /// Marker-Position im Array; -1 wenn der Marker nicht mehr existierte
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_index: Option<i64>,
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_field_names_are_camel_case() {
        let doc = RoadbookDocument {
            version: Some(EXPORT_VERSION.to_string()),
            export_time: Some("2024-05-01T00:00:00.000Z".to_string()),
            current_layer: Some("gaode".to_string()),
            current_search_method: Some("auto".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&doc).expect("serialisierbar");
        assert!(json.contains("\"exportTime\""));
        assert!(json.contains("\"currentLayer\""));
        assert!(json.contains("\"currentSearchMethod\""));
        assert!(json.contains("\"dateNotes\""));
    }

    #[test]
    fn test_connection_record_accepts_both_reference_generations() {
        let by_id: ConnectionRecord =
            serde_json::from_str(r#"{"id":1,"startId":10,"endId":20,"transportType":"car"}"#)
                .expect("ID-Form");
        assert_eq!(by_id.start_id, Some(10));
        assert_eq!(by_id.start_index, None);

        let by_index: ConnectionRecord =
            serde_json::from_str(r#"{"startIndex":0,"endIndex":1,"transportType":"walk"}"#)
                .expect("Index-Form");
        assert_eq!(by_index.start_index, Some(0));
        assert_eq!(by_index.start_id, None);
    }
}
