//! Use-Case-Funktionen für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::state::{AppState, Selection};
use crate::json::{self, DecodeReport, DocumentKind};
use anyhow::{Context, Result};
use std::path::Path;

/// Schreibt den lokalen Schnappschuss auf den Autosave-Pfad, falls
/// Autosave aktiv ist. Fehler werden geloggt, nie propagiert: Ein
/// kaputter Persistenz-Pfad darf das Editieren nicht blockieren.
pub fn autosave(state: &AppState) {
    if !state.options.autosave {
        return;
    }
    let Some(path) = &state.autosave_path else {
        return;
    };
    if let Err(err) = write_snapshot(state, path) {
        log::error!("Autosave fehlgeschlagen: {err:#}");
    }
}

/// Schreibt den lokalen Schnappschuss an den angegebenen Pfad.
pub fn save_snapshot(state: &AppState, path: &Path) -> Result<()> {
    write_snapshot(state, path)?;
    log::info!("Schnappschuss gespeichert nach: {}", path.display());
    Ok(())
}

fn write_snapshot(state: &AppState, path: &Path) -> Result<()> {
    let content = json::encode_document(&state.roadbook, DocumentKind::LocalSnapshot)?;
    std::fs::write(path, content)
        .with_context(|| format!("Schnappschuss nicht schreibbar: {}", path.display()))
}

/// Importiert ein Roadbook-Dokument (JSON oder HTML-Export).
///
/// Atomar: Erst wird vollständig in ein frisches Roadbook dekodiert;
/// schlägt das fehl, bleibt das bestehende Modell unberührt. Die
/// Undo-Historie bleibt bestehen; Einträge auf verschwundene IDs
/// laufen beim Undo kontrolliert ins Leere.
pub fn import_file(state: &mut AppState, path: &Path) -> Result<DecodeReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei nicht lesbar: {}", path.display()))?;

    let (book, report) = if looks_like_html(path, &content) {
        json::import_html(&content)?
    } else {
        json::decode_document(&content)?
    };

    state.roadbook = book;
    state.selection = Selection::None;

    log::info!(
        "Import abgeschlossen: {} Marker, {} Verbindungen ({} verworfen)",
        state.roadbook.marker_count(),
        state.roadbook.connection_count(),
        report.dropped_connections
    );

    autosave(state);
    Ok(report)
}

/// Schreibt den portablen Export an den angegebenen Pfad.
pub fn export_file(state: &AppState, path: &Path) -> Result<()> {
    let content = json::encode_document(&state.roadbook, DocumentKind::PortableExport)?;
    std::fs::write(path, content)
        .with_context(|| format!("Export nicht schreibbar: {}", path.display()))?;
    log::info!("Roadbook exportiert nach: {}", path.display());
    Ok(())
}

/// Schreibt das eigenständige HTML-Dokument an den angegebenen Pfad.
pub fn export_html_file(state: &AppState, path: &Path) -> Result<()> {
    let content = json::export_html(&state.roadbook)?;
    std::fs::write(path, content)
        .with_context(|| format!("HTML-Export nicht schreibbar: {}", path.display()))?;
    log::info!("HTML-Export geschrieben nach: {}", path.display());
    Ok(())
}

/// Leert das komplette Roadbook.
pub fn clear_all(state: &mut AppState) {
    state.roadbook.clear_all();
    state.selection = Selection::None;
    log::info!("Roadbook geleert");
    autosave(state);
}

fn looks_like_html(path: &Path, content: &str) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false);
    by_extension || content.trim_start().starts_with("<!DOCTYPE") || content.trim_start().starts_with('<')
}
