//! Reise-Markierungspunkte mit Icon, Freitext-Labels und Zeitstempel-Liste.

use super::geo::GeoPoint;
use super::ModelError;
use serde::{Deserialize, Serialize};

/// Visueller Icon-Deskriptor eines Markers. Für die Kernlogik opak,
/// wird unverändert durch Persistenz und Export gereicht.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    /// Icon-Art (z.B. "default", "number", "custom")
    #[serde(rename = "type")]
    pub kind: String,
    /// Angezeigtes Zeichen (Emoji oder Ziffer)
    #[serde(rename = "icon")]
    pub glyph: String,
    /// CSS-Farbwert des Icon-Hintergrunds
    pub color: String,
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            kind: "default".to_string(),
            glyph: "📍".to_string(),
            color: "#667eea".to_string(),
        }
    }
}

impl MarkerIcon {
    /// Nummern-Icon für neu platzierte Marker (laufende Nummer als Glyphe).
    pub fn numbered(number: usize) -> Self {
        Self {
            kind: "number".to_string(),
            glyph: number.to_string(),
            color: "#667eea".to_string(),
        }
    }
}

/// Ein Markierungspunkt auf der Karte.
///
/// Die `id` ist der einzige Fremdschlüssel für Verbindungen; die Position
/// im Marker-Vektor ist nur für Legacy-Importe relevant.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Eindeutige, zeitbasiert vergebene ID
    pub id: u64,
    /// Koordinate [lat, lng] in Dezimalgrad
    pub position: GeoPoint,
    /// Anzeigename (Default "标记点{n}" bei Erstellung)
    pub title: String,
    /// Freitext-Annotationen (im Editor semikolon-getrennt eingegeben)
    pub labels: Vec<String>,
    /// Icon-Deskriptor
    pub icon: MarkerIcon,
    /// Erstellungszeitpunkt, lokal formatiert
    pub created_at: String,
    /// Zeitstempel-Liste; Element 0 ist der kanonische Zeitpunkt.
    /// Invariante: nie leer.
    date_times: Vec<String>,
}

impl Marker {
    /// Erstellt einen Marker mit genau einem Start-Zeitstempel.
    pub fn new(
        id: u64,
        position: GeoPoint,
        title: String,
        icon: MarkerIcon,
        created_at: String,
        first_date_time: String,
    ) -> Self {
        Self {
            id,
            position,
            title,
            labels: Vec::new(),
            icon,
            created_at,
            date_times: vec![first_date_time],
        }
    }

    /// Stellt einen Marker mit vollständigen Feldern wieder her (Import, Undo).
    ///
    /// Eine leere Zeitstempel-Liste wird durch `fallback_date_time` ersetzt,
    /// damit die Nicht-leer-Invariante auch für tolerant dekodierte Daten gilt.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: u64,
        position: GeoPoint,
        title: String,
        labels: Vec<String>,
        icon: MarkerIcon,
        created_at: String,
        date_times: Vec<String>,
        fallback_date_time: String,
    ) -> Self {
        let date_times = if date_times.is_empty() {
            vec![fallback_date_time]
        } else {
            date_times
        };
        Self {
            id,
            position,
            title,
            labels,
            icon,
            created_at,
            date_times,
        }
    }

    /// Alle Zeitstempel in Listenreihenfolge.
    pub fn date_times(&self) -> &[String] {
        &self.date_times
    }

    /// Der kanonische (erste) Zeitstempel.
    pub fn primary_date_time(&self) -> &str {
        // Invariante: Liste nie leer
        &self.date_times[0]
    }

    /// Hängt einen weiteren Zeitstempel an.
    pub fn push_date_time(&mut self, date_time: String) {
        self.date_times.push(date_time);
    }

    /// Ersetzt die komplette Zeitstempel-Liste. Leere Listen werden abgelehnt.
    pub fn set_date_times(&mut self, date_times: Vec<String>) -> Result<(), ModelError> {
        if date_times.is_empty() {
            return Err(ModelError::LastTimestamp);
        }
        self.date_times = date_times;
        Ok(())
    }

    /// Entfernt den Zeitstempel an `index` und gibt ihn zurück.
    ///
    /// Das letzte verbleibende Element darf nicht entfernt werden.
    pub fn remove_date_time(&mut self, index: usize) -> Result<String, ModelError> {
        if self.date_times.len() <= 1 {
            return Err(ModelError::LastTimestamp);
        }
        if index >= self.date_times.len() {
            return Err(ModelError::TimestampIndexOutOfRange {
                index,
                len: self.date_times.len(),
            });
        }
        Ok(self.date_times.remove(index))
    }
}
