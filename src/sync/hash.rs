//! Stabile Inhalts-Signatur des Roadbooks.
//!
//! Die Signatur ist eine kanonische Serialisierung (Entitäten nach ID
//! sortiert, Objekt-Schlüssel rekursiv sortiert, flüchtige Zeitstempel
//! entfernt), reduziert auf einen 64-Bit-Digest. Kein kryptografischer
//! Hash; er dient nur dem Gleichheitsvergleich mit dem zuletzt
//! synchronisierten Stand.

use crate::core::Roadbook;
use crate::json::{document_from_roadbook, DocumentKind};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Kanonische String-Form des Roadbook-Inhalts.
///
/// Invariant gegenüber Einfüge- und Schlüssel-Reihenfolge, empfindlich
/// gegenüber jeder inhaltlichen Änderung (auch in verschachtelten Feldern
/// und im Ansichts-Zustand).
pub fn canonical_string(book: &Roadbook) -> String {
    let mut doc = document_from_roadbook(book, DocumentKind::PortableExport);

    // Flüchtige Felder tragen keinen Inhalt
    doc.save_time = None;
    doc.export_time = None;

    doc.markers.sort_by_key(|m| m.id);
    doc.connections.sort_by_key(|c| c.id);

    match serde_json::to_value(&doc) {
        Ok(value) => stable_stringify(&value),
        Err(err) => {
            // Tritt bei den Wire-Strukturen nicht auf; defensives Logging
            // statt Panik, der Vergleich meldet dann "geändert"
            log::error!("Kanonische Serialisierung fehlgeschlagen: {err}");
            String::new()
        }
    }
}

/// Inhalts-Signatur als Hex-String.
pub fn compute_hash(book: &Roadbook) -> String {
    let canonical = canonical_string(book);
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// JSON-Text mit rekursiv sortierten Objekt-Schlüsseln.
fn stable_stringify(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        Value::String(key.clone()),
                        stable_stringify(&map[key])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(stable_stringify).collect();
            format!("[{}]", parts.join(","))
        }
        // Skalare über die kompakte JSON-Darstellung (deterministisch)
        scalar => scalar.to_string(),
    }
}
