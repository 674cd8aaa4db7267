//! Typisierte Transport-Verbindungen zwischen zwei Markern.

/// Anzeige-Fallbacks für unbekannte Transportarten.
const NEUTRAL_COLOR: &str = "#666";
const NEUTRAL_GLYPH: &str = "•";
const NEUTRAL_NAME: &str = "其他";

/// Transportart einer Verbindung.
///
/// Unbekannte Wire-Werte werden als `Other` durchgereicht (Roundtrip-treu),
/// bekommen aber neutrale Anzeige-Attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TransportType {
    #[default]
    Car,
    Train,
    Subway,
    Plane,
    Walk,
    Bus,
    Cruise,
    /// Unbekannter Roh-Wert aus Import-Daten
    Other(String),
}

impl TransportType {
    /// Parst den Wire-Wert; unbekannte Werte bleiben als `Other` erhalten.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "car" => Self::Car,
            "train" => Self::Train,
            "subway" => Self::Subway,
            "plane" => Self::Plane,
            "walk" => Self::Walk,
            "bus" => Self::Bus,
            "cruise" => Self::Cruise,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire-Wert der Transportart.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Car => "car",
            Self::Train => "train",
            Self::Subway => "subway",
            Self::Plane => "plane",
            Self::Walk => "walk",
            Self::Bus => "bus",
            Self::Cruise => "cruise",
            Self::Other(raw) => raw,
        }
    }

    /// CSS-Farbwert für Linien und Icon-Rahmen.
    pub fn color(&self) -> &str {
        match self {
            Self::Car => "#FF5722",
            Self::Train => "#2196F3",
            Self::Subway => "#9C27B0",
            Self::Plane => "#4CAF50",
            Self::Walk => "#FF9800",
            Self::Bus => "#795548",
            Self::Cruise => "#00BCD4",
            Self::Other(_) => NEUTRAL_COLOR,
        }
    }

    /// Emoji-Glyphe für das Transport-Icon auf der Linienmitte.
    pub fn glyph(&self) -> &str {
        match self {
            Self::Car => "🚗",
            Self::Train => "🚄",
            Self::Subway => "🚇",
            Self::Plane => "✈️",
            Self::Walk => "🚶",
            Self::Bus => "🚌",
            Self::Cruise => "🚢",
            Self::Other(_) => NEUTRAL_GLYPH,
        }
    }

    /// Anzeigename der Transportart.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Car => "汽车",
            Self::Train => "火车",
            Self::Subway => "地铁",
            Self::Plane => "飞机",
            Self::Walk => "步行",
            Self::Bus => "公交",
            Self::Cruise => "游轮",
            Self::Other(_) => NEUTRAL_NAME,
        }
    }

    /// Alle bekannten Transportarten (für UI-Auswahl und Statistiken).
    pub fn known() -> [TransportType; 7] {
        [
            Self::Car,
            Self::Train,
            Self::Subway,
            Self::Plane,
            Self::Walk,
            Self::Bus,
            Self::Cruise,
        ]
    }
}

/// Eine gerichtete Verbindung zwischen zwei Markern.
///
/// `start_id`/`end_id` referenzieren `Marker::id`; `start_title`/`end_title`
/// sind denormalisierte Titel-Schnappschüsse vom Erstellungszeitpunkt und
/// dienen nur als Anzeige-Fallback, falls der referenzierte Marker
/// inzwischen gelöscht wurde.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Eindeutige, zeitbasiert vergebene ID
    pub id: u64,
    /// ID des Start-Markers
    pub start_id: u64,
    /// ID des End-Markers
    pub end_id: u64,
    /// Transportart
    pub transport: TransportType,
    /// Einzelner Zeitstempel (Default: kanonischer Zeitpunkt des Start-Markers)
    pub date_time: String,
    /// Freitext-Annotation
    pub label: String,
    /// Dauer in Stunden, nie negativ
    pub duration: f64,
    /// Titel des Start-Markers bei Erstellung (Anzeige-Fallback)
    pub start_title: String,
    /// Titel des End-Markers bei Erstellung (Anzeige-Fallback)
    pub end_title: String,
}

impl Connection {
    /// Erstellt eine neue Verbindung mit Titel-Schnappschüssen.
    pub fn new(
        id: u64,
        start_id: u64,
        end_id: u64,
        transport: TransportType,
        date_time: String,
        start_title: String,
        end_title: String,
    ) -> Self {
        Self {
            id,
            start_id,
            end_id,
            transport,
            date_time,
            label: String::new(),
            duration: 0.0,
            start_title,
            end_title,
        }
    }

    /// Prüft ob die Verbindung den Marker referenziert.
    pub fn references(&self, marker_id: u64) -> bool {
        self.start_id == marker_id || self.end_id == marker_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_wire_roundtrip() {
        for transport in TransportType::known() {
            assert_eq!(TransportType::from_wire(transport.as_wire()), transport);
        }
    }

    #[test]
    fn test_unknown_transport_keeps_raw_value() {
        let t = TransportType::from_wire("bicycle");
        assert_eq!(t, TransportType::Other("bicycle".to_string()));
        assert_eq!(t.as_wire(), "bicycle");
        assert_eq!(t.color(), "#666");
        assert_eq!(t.glyph(), "•");
        assert_eq!(t.display_name(), "其他");
    }

    #[test]
    fn test_known_transport_display_attributes() {
        assert_eq!(TransportType::Subway.color(), "#9C27B0");
        assert_eq!(TransportType::Bus.glyph(), "🚌");
        assert_eq!(TransportType::Cruise.color(), "#00BCD4");
        assert_eq!(TransportType::Train.display_name(), "火车");
    }

    #[test]
    fn test_references() {
        let conn = Connection::new(
            9,
            1,
            2,
            TransportType::Car,
            "2024-01-01 08:00:00".to_string(),
            "A".to_string(),
            "B".to_string(),
        );
        assert!(conn.references(1));
        assert!(conn.references(2));
        assert!(!conn.references(3));
    }
}
