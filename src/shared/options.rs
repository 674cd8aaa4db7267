//! Zentrale Laufzeit-Konfiguration des Roadbook-Editors.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Historie ────────────────────────────────────────────────────────

/// Maximale Anzahl Einträge der Undo-Historie.
pub const HISTORY_CAPACITY: usize = 50;

// ── Sync ────────────────────────────────────────────────────────────

/// Poll-Intervall des Dirty-Checks bei geöffnetem Remote-Plan (Sekunden).
pub const SYNC_POLL_INTERVAL_SECS: u64 = 5;

// ── Suche ───────────────────────────────────────────────────────────

/// Entprell-Verzögerung der Ortssuche (Millisekunden).
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

// ── Ansicht ─────────────────────────────────────────────────────────

/// Standard-Kartenquelle neuer Sitzungen.
pub const DEFAULT_MAP_SOURCE: &str = "gaode";
/// Standard-Suchdienst neuer Sitzungen.
pub const DEFAULT_SEARCH_METHOD: &str = "auto";

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `roadbook_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Historie ────────────────────────────────────────────────
    /// Maximale Anzahl Undo-Einträge
    pub history_capacity: usize,

    // ── Persistenz ──────────────────────────────────────────────
    /// Nach jeder Mutation automatisch einen Schnappschuss schreiben
    pub autosave: bool,

    // ── Sync ────────────────────────────────────────────────────
    /// Poll-Intervall des Dirty-Checks in Sekunden
    pub sync_poll_interval_secs: u64,
    /// Basis-URL des Plan-Speichers (None = Offline-Betrieb)
    #[serde(default)]
    pub plan_store_url: Option<String>,

    // ── Suche ───────────────────────────────────────────────────
    /// Entprell-Verzögerung der Ortssuche in Millisekunden
    pub search_debounce_ms: u64,

    // ── Ansicht ─────────────────────────────────────────────────
    /// Kartenquelle neuer Sitzungen
    pub default_map_source: String,
    /// Suchdienst neuer Sitzungen
    pub default_search_method: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            autosave: true,
            sync_poll_interval_secs: SYNC_POLL_INTERVAL_SECS,
            plan_store_url: None,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            default_map_source: DEFAULT_MAP_SOURCE.to_string(),
            default_search_method: DEFAULT_SEARCH_METHOD.to_string(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("roadbook_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("roadbook_editor.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_toml_roundtrip() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let path = dir.path().join("roadbook_editor.toml");

        let mut options = EditorOptions::default();
        options.history_capacity = 100;
        options.plan_store_url = Some("https://api.example.com/api".to_string());
        options.save_to_file(&path).expect("speicherbar");

        let loaded = EditorOptions::load_from_file(&path);
        assert_eq!(loaded.history_capacity, 100);
        assert_eq!(
            loaded.plan_store_url.as_deref(),
            Some("https://api.example.com/api")
        );
        assert_eq!(loaded.sync_poll_interval_secs, SYNC_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let options = EditorOptions::load_from_file(std::path::Path::new(
            "/nicht/vorhanden/roadbook_editor.toml",
        ));
        assert_eq!(options.history_capacity, HISTORY_CAPACITY);
        assert!(options.autosave);
        assert_eq!(options.default_map_source, "gaode");
    }
}
