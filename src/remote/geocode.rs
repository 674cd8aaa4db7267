//! Schnittstelle zum Geocoding-Suchdienst.
//!
//! Der Kern konsumiert nur die Kandidaten-Form; welcher Upstream-Dienst
//! sie geliefert hat, ist ihm gleichgültig. Die Eingabe-Entprellung läuft
//! über einen Generationszähler: Jede neue Eingabe entwertet alle noch
//! laufenden Suchen der vorherigen Generation.

use crate::core::GeoPoint;
use serde::{Deserialize, Serialize};

/// Auswählbare Suchdienste (Wire-Kennungen der Auswahlbox).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    /// Automatische Wahl je nach Kartenquelle
    #[default]
    Auto,
    Nominatim,
    Overpass,
    Photon,
    MapSearch,
}

impl SearchMethod {
    /// Parst die Wire-Kennung; unbekannte Werte fallen auf `Auto` zurück.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "nominatim" => Self::Nominatim,
            "overpass" => Self::Overpass,
            "photon" => Self::Photon,
            "mapsearch" => Self::MapSearch,
            _ => Self::Auto,
        }
    }

    /// Wire-Kennung des Suchdienstes.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Nominatim => "nominatim",
            Self::Overpass => "overpass",
            Self::Photon => "photon",
            Self::MapSearch => "mapsearch",
        }
    }
}

/// Ein Suchtreffer des Geocoding-Dienstes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeCandidate {
    /// Koordinate des Treffers `[lat, lng]`
    pub position: GeoPoint,
    /// Anzeigename (Adresse oder POI-Name)
    pub display_name: String,
    /// Kategorie des Treffers, falls der Dienst eine liefert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Generationszähler für die Such-Entprellung.
///
/// Die Shell startet pro Eingabe einen Timer (siehe
/// `EditorOptions::search_debounce_ms`); feuert er, gehört die Suche zur
/// damals gezogenen Generation. Antworten veralteter Generationen werden
/// verworfen statt das Ergebnis-Panel zu überschreiben.
#[derive(Debug, Default)]
pub struct SearchDebounce {
    generation: u64,
}

impl SearchDebounce {
    /// Erstellt einen Zähler bei Generation 0 (keine Suche aktiv).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert eine neue Eingabe und gibt deren Generation zurück.
    /// Alle früheren Generationen sind damit veraltet.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// `true` wenn `generation` noch die aktuelle Eingabe ist.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
