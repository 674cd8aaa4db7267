//! Roadbook Editor — Kommandozeilen-Werkzeuge.
//!
//! Headless-Zugriff auf den Codec: Dokumente inspizieren, Legacy-Dateien
//! in die aktuelle Generation konvertieren und den eigenständigen
//! HTML-Export erzeugen. Die Web-Shell nutzt dieselbe Library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roadbook_editor::json::{self, DocumentKind};
use roadbook_editor::sync;
use roadbook_editor::Roadbook;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "roadbook-editor",
    version,
    about = "Werkzeuge für Roadbook-Dokumente (Inspektion, Konvertierung, Export)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Zeigt Kennzahlen eines Roadbook-Dokuments
    Info {
        /// Roadbook-Datei (JSON oder HTML-Export)
        file: PathBuf,
    },
    /// Konvertiert ein Dokument in die aktuelle Generation
    /// (ID-basierte Verbindungsreferenzen)
    Convert {
        /// Eingabe (JSON oder HTML-Export, auch Legacy-Index-Form)
        input: PathBuf,
        /// Ausgabedatei (portabler Export, Version 2.0)
        output: PathBuf,
    },
    /// Erzeugt das eigenständige HTML-Dokument
    ExportHtml {
        /// Eingabe (JSON oder HTML-Export)
        input: PathBuf,
        /// Ausgabedatei (.html)
        output: PathBuf,
    },
    /// Berechnet die Inhalts-Signatur (Sync-Vergleichswert)
    Hash {
        /// Roadbook-Datei (JSON oder HTML-Export)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Info { file } => info(&file),
        Command::Convert { input, output } => convert(&input, &output),
        Command::ExportHtml { input, output } => export_html(&input, &output),
        Command::Hash { file } => hash(&file),
    }
}

/// Lädt ein Roadbook aus JSON- oder HTML-Form.
fn load(path: &Path) -> Result<Roadbook> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei nicht lesbar: {}", path.display()))?;

    let (book, report) = if content.trim_start().starts_with('<') {
        json::import_html(&content)?
    } else {
        json::decode_document(&content)?
    };

    if report.dropped_connections > 0 {
        eprintln!(
            "Warnung: {} Verbindung(en) nicht auflösbar und verworfen",
            report.dropped_connections
        );
    }

    Ok(book)
}

fn info(file: &Path) -> Result<()> {
    let book = load(file)?;
    let stats = book.stats();

    println!("Roadbook: {}", file.display());
    println!("  Marker:       {}", stats.marker_count);
    println!("  Verbindungen: {}", stats.connection_count);
    println!("  Tagesnotizen: {}", stats.date_note_count);
    println!(
        "  Gesamtstrecke: {:.1} km (Luftlinie)",
        stats.total_distance_meters / 1000.0
    );

    for stat in &stats.by_transport {
        println!(
            "    {} {:<4} {} Verbindung(en), {:.1} km",
            stat.transport.glyph(),
            stat.transport.display_name(),
            stat.connection_count,
            stat.distance_meters / 1000.0
        );
    }

    let dates = roadbook_editor::core::schedule::all_dates_sorted(book.markers());
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        println!("  Zeitraum:     {first} bis {last} ({} Tag(e))", dates.len());
    }

    Ok(())
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    let book = load(input)?;
    let content = json::encode_document(&book, DocumentKind::PortableExport)?;
    std::fs::write(output, content)
        .with_context(|| format!("Ausgabe nicht schreibbar: {}", output.display()))?;
    println!(
        "Konvertiert: {} Marker, {} Verbindungen → {}",
        book.marker_count(),
        book.connection_count(),
        output.display()
    );
    Ok(())
}

fn export_html(input: &Path, output: &Path) -> Result<()> {
    let book = load(input)?;
    let html = json::export_html(&book)?;
    std::fs::write(output, html)
        .with_context(|| format!("Ausgabe nicht schreibbar: {}", output.display()))?;
    println!("HTML-Export geschrieben: {}", output.display());
    Ok(())
}

fn hash(file: &Path) -> Result<()> {
    let book = load(file)?;
    println!("{}", sync::compute_hash(&book));
    Ok(())
}
