//! Geteilte Typen und Laufzeit-Konfiguration.

pub mod options;

pub use options::EditorOptions;
