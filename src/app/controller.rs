//! Application Controller für zentrale Event-Verarbeitung.

use super::events::{AppCommand, MapEvent};
use super::state::{AppState, EditorMode, Selection};
use super::use_cases;
use std::path::PathBuf;

/// Orchestriert Karten-Events und Commands auf dem AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Übersetzt ein Ereignis der Karten-Oberfläche in Commands und
    /// führt diese aus.
    pub fn handle_map_event(&mut self, state: &mut AppState, event: MapEvent) -> anyhow::Result<()> {
        let commands = Self::map_event_to_commands(state, event);
        for command in commands {
            self.handle_command(state, command)?;
        }
        Ok(())
    }

    fn map_event_to_commands(state: &AppState, event: MapEvent) -> Vec<AppCommand> {
        match event {
            MapEvent::MapClicked { position } => match state.mode {
                // Im Platzier-Modus erzeugt der Klick einen Marker
                EditorMode::AddMarker => vec![AppCommand::PlaceMarker { position }],
                // Sonst hebt ein Klick ins Leere die Selektion auf
                EditorMode::View => vec![AppCommand::ClearSelection],
            },
            MapEvent::MarkerClicked { id } => vec![AppCommand::SelectMarker { id }],
            MapEvent::MarkerDragged { id, position } => {
                vec![AppCommand::MoveMarker { id, position }]
            }
            MapEvent::ConnectionClicked { id } => vec![AppCommand::SelectConnection { id }],
        }
    }

    /// Führt einen Command auf dem AppState aus.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);

        match command {
            // === Marker ===
            AppCommand::PlaceMarker { position } => {
                use_cases::editing::place_marker(state, position)
            }
            AppCommand::RemoveMarker { id } => use_cases::editing::remove_marker(state, id),
            AppCommand::MoveMarker { id, position } => {
                use_cases::editing::move_marker(state, id, position)
            }
            AppCommand::SetMarkerTitle { id, title } => {
                use_cases::editing::set_marker_title(state, id, title)
            }
            AppCommand::SetMarkerLabels { id, labels } => {
                use_cases::editing::set_marker_labels(state, id, labels)
            }
            AppCommand::SetMarkerIcon { id, icon } => {
                use_cases::editing::set_marker_icon(state, id, icon)
            }
            AppCommand::SetMarkerDateTimes { id, date_times } => {
                use_cases::editing::set_marker_date_times(state, id, date_times)
            }
            AppCommand::AddMarkerDateTime { id } => {
                use_cases::timeline::add_marker_date_time(state, id)
            }
            AppCommand::RemoveMarkerDateTime { id, index } => {
                use_cases::timeline::remove_marker_date_time(state, id, index)
            }

            // === Verbindungen ===
            AppCommand::ConnectMarkers {
                start_id,
                end_id,
                transport,
            } => use_cases::editing::connect_markers(state, start_id, end_id, transport),
            AppCommand::RemoveConnection { id } => {
                use_cases::editing::remove_connection(state, id)
            }
            AppCommand::SetConnectionTransport { id, transport } => {
                use_cases::editing::set_connection_transport(state, id, transport)
            }
            AppCommand::SetConnectionLabel { id, label } => {
                use_cases::editing::set_connection_label(state, id, label)
            }
            AppCommand::SetConnectionDateTime { id, date_time } => {
                use_cases::editing::set_connection_date_time(state, id, date_time)
            }
            AppCommand::SetConnectionDuration { id, duration } => {
                use_cases::editing::set_connection_duration(state, id, duration)
            }

            // === Tagesnotizen ===
            AppCommand::SetDateNote { date_key, note } => {
                use_cases::timeline::set_date_note(state, &date_key, &note)
            }

            // === Selektion & Modus ===
            AppCommand::SelectMarker { id } => {
                if state.roadbook.marker(id).is_some() {
                    state.selection = Selection::Marker(id);
                } else {
                    log::warn!("Selektion: Marker {id} nicht gefunden");
                }
            }
            AppCommand::SelectConnection { id } => {
                if state.roadbook.connection(id).is_some() {
                    state.selection = Selection::Connection(id);
                } else {
                    log::warn!("Selektion: Verbindung {id} nicht gefunden");
                }
            }
            AppCommand::SelectDate { date } => state.selection = Selection::Date(date),
            AppCommand::ClearSelection => state.selection = Selection::None,
            AppCommand::SetEditorMode { mode } => state.mode = mode,

            // === Historie ===
            AppCommand::Undo => {
                use_cases::editing::undo(state);
            }

            // === Ansicht ===
            AppCommand::SetMapSource { layer } => {
                state.roadbook.view.current_layer = layer;
                use_cases::io::autosave(state);
            }
            AppCommand::SetSearchMethod { method } => {
                state.roadbook.view.current_search_method = method;
                use_cases::io::autosave(state);
            }

            // === Datei-I/O ===
            AppCommand::ImportFile { path } => {
                use_cases::io::import_file(state, &PathBuf::from(path))?;
            }
            AppCommand::ExportFile { path } => {
                use_cases::io::export_file(state, &PathBuf::from(path))?
            }
            AppCommand::ExportHtml { path } => {
                use_cases::io::export_html_file(state, &PathBuf::from(path))?
            }
            AppCommand::SaveSnapshot { path } => {
                use_cases::io::save_snapshot(state, &PathBuf::from(path))?
            }
            AppCommand::ClearAll => use_cases::io::clear_all(state),
        }

        Ok(())
    }

    /// Die sichtbare Teilmenge des Roadbooks unter der aktuellen Selektion:
    /// beim Tagesfilter nur die Entitäten des gewählten Kalendertags.
    pub fn visible_day_view<'a>(
        &self,
        state: &'a AppState,
    ) -> Option<crate::core::DayView<'a>> {
        match state.selection {
            Selection::Date(date) => Some(crate::core::schedule::filter_by_date(
                state.roadbook.markers(),
                state.roadbook.connections(),
                date,
            )),
            _ => None,
        }
    }
}
