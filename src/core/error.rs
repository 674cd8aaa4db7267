//! Typisierte Fehler der Modell-Operationen.

use thiserror::Error;

/// Abgelehnte Modell-Operationen. Validierung passiert vor jeder Mutation;
/// ein Fehler lässt das Modell unverändert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Koordinate ausserhalb des gültigen Wertebereichs
    #[error("Koordinate ausserhalb des gültigen Bereichs: [{lat}, {lng}]")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Referenzierter Marker existiert nicht
    #[error("Marker {0} existiert nicht")]
    InvalidReference(u64),

    /// Verbindung von einem Marker auf sich selbst
    #[error("Start- und End-Marker müssen verschieden sein (Marker {0})")]
    SelfReference(u64),

    /// Der letzte Zeitstempel eines Markers darf nicht entfernt werden
    #[error("der letzte Zeitstempel eines Markers kann nicht entfernt werden")]
    LastTimestamp,

    /// Zeitstempel-Index ausserhalb der Liste
    #[error("Zeitstempel-Index {index} ausserhalb der Liste (Länge {len})")]
    TimestampIndexOutOfRange { index: usize, len: usize },
}
