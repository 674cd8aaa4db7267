//! Application-Layer: Controller, State, Events, Historie und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod history;
/// Application State und Controller
///
/// Dieses Modul verwaltet den Zustand der Anwendung
/// (Roadbook, Selektion, Historie, Optionen).
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, MapEvent};
pub use history::{EditHistory, HistoryEntry, HistoryOperation};
pub use state::{AppState, EditorMode, Selection};
