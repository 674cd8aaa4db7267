//! Application State — zentrale Datenhaltung.

use super::command_log::CommandLog;
use super::history::EditHistory;
use crate::core::Roadbook;
use crate::remote::SearchDebounce;
use crate::shared::EditorOptions;
use crate::sync::SyncGuard;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Aktiver Editor-Modus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Standard: Ansehen, Selektieren, Ziehen
    #[default]
    View,
    /// Nächster Kartenklick platziert einen Marker
    AddMarker,
}

/// Aktuelle Selektion, exklusiv und vollständig aufgezählt.
///
/// Der Tagesfilter ist Teil der Selektion: `Date` blendet alles aus,
/// was nicht zum gewählten Kalendertag gehört.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Marker(u64),
    Connection(u64),
    Date(NaiveDate),
}

impl Selection {
    /// `true` wenn der Marker selektiert ist.
    pub fn is_marker(&self, id: u64) -> bool {
        matches!(self, Selection::Marker(selected) if *selected == id)
    }

    /// `true` wenn die Verbindung selektiert ist.
    pub fn is_connection(&self, id: u64) -> bool {
        matches!(self, Selection::Connection(selected) if *selected == id)
    }
}

/// Hauptzustand der Anwendung.
pub struct AppState {
    /// Das bearbeitete Roadbook
    pub roadbook: Roadbook,
    /// Aktuelle Selektion (inkl. Tagesfilter)
    pub selection: Selection,
    /// Aktiver Editor-Modus
    pub mode: EditorMode,
    /// Undo-Historie (Operations-Log)
    pub history: EditHistory,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Dirty-Tracking gegenüber dem Cloud-Stand
    pub sync: SyncGuard,
    /// Generationszähler der Ortssuche
    pub search: SearchDebounce,
    /// Zielpfad des automatischen Schnappschusses (None = kein Autosave)
    pub autosave_path: Option<PathBuf>,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt einen App-State mit geladenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        let mut roadbook = Roadbook::new();
        roadbook.view.current_layer = options.default_map_source.clone();
        roadbook.view.current_search_method = options.default_search_method.clone();

        Self {
            roadbook,
            selection: Selection::None,
            mode: EditorMode::View,
            history: EditHistory::new_with_capacity(options.history_capacity),
            command_log: CommandLog::new(),
            options,
            sync: SyncGuard::new(),
            search: SearchDebounce::new(),
            autosave_path: None,
        }
    }

    /// Gibt die Anzahl der Marker zurück (für UI-Anzeige).
    pub fn marker_count(&self) -> usize {
        self.roadbook.marker_count()
    }

    /// Gibt die Anzahl der Verbindungen zurück (für UI-Anzeige).
    pub fn connection_count(&self) -> usize {
        self.roadbook.connection_count()
    }

    /// Gibt zurück, ob ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
