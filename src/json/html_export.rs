//! Eigenständiges HTML-Export-Dokument.
//!
//! Der portable Export wird prozent-kodiert (kompatibel zu
//! `encodeURIComponent`) als String-Literal in eine statische Viewer-Seite
//! eingebettet und dort clientseitig wieder dekodiert. Der Payload muss
//! für beliebigen Unicode-Inhalt verlustfrei durch Kodieren und Dekodieren
//! laufen.

use super::decoder::{decode_document, DecodeReport};
use super::encoder::{encode_document, DocumentKind};
use crate::core::Roadbook;
use anyhow::{bail, Context, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Zeichensatz von `encodeURIComponent`: alles ausser A-Z a-z 0-9 - _ . ! ~ * ' ( )
/// wird kodiert. Damit enthält der eingebettete Payload weder Anführungszeichen
/// noch Backslashes und ist als JS-String-Literal unproblematisch.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Auftakt des Payload-Literals in der generierten Seite; der Import sucht
/// exakt nach diesem Präfix.
const PAYLOAD_PREFIX: &str = "const ROADBOOK_PAYLOAD = \"";

/// Kodiert einen String wie `encodeURIComponent`.
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Dekodiert einen `encodeURIComponent`-kodierten String.
pub fn decode_uri_component(encoded: &str) -> Result<String> {
    Ok(percent_decode_str(encoded)
        .decode_utf8()
        .context("Payload ist kein gültiges UTF-8")?
        .into_owned())
}

/// Erzeugt das eigenständige Viewer-Dokument mit eingebettetem Export.
pub fn export_html(book: &Roadbook) -> Result<String> {
    let json = encode_document(book, DocumentKind::PortableExport)?;
    let payload = encode_uri_component(&json);
    Ok(VIEWER_TEMPLATE.replace("__ROADBOOK_PAYLOAD__", &payload))
}

/// Extrahiert den Export aus einem zuvor erzeugten Viewer-Dokument.
pub fn import_html(html: &str) -> Result<(Roadbook, DecodeReport)> {
    let Some(start) = html.find(PAYLOAD_PREFIX) else {
        bail!("kein Roadbook-Payload im HTML-Dokument gefunden");
    };
    let rest = &html[start + PAYLOAD_PREFIX.len()..];
    let Some(end) = rest.find('"') else {
        bail!("Roadbook-Payload ist nicht abgeschlossen");
    };
    let json = decode_uri_component(&rest[..end])?;
    decode_document(&json)
}

/// Statische Viewer-Seite: Leaflet von CDN, Marker und Verbindungen aus dem
/// dekodierten Payload. Bewusst schlank; der vollwertige Editor bleibt der
/// Web-Anwendung vorbehalten.
const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>路书</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <style>
        html, body { margin: 0; height: 100%; }
        #map { height: 100%; }
        .transport-icon div { background: #fff; border-radius: 50%; width: 30px; height: 30px;
            display: flex; align-items: center; justify-content: center; font-size: 16px; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script>
        const ROADBOOK_PAYLOAD = "__ROADBOOK_PAYLOAD__";
        const roadbookData = JSON.parse(decodeURIComponent(ROADBOOK_PAYLOAD));

        const transportColors = { car: '#FF5722', train: '#2196F3', subway: '#9C27B0',
            plane: '#4CAF50', walk: '#FF9800', bus: '#795548', cruise: '#00BCD4' };
        const transportIcons = { car: '🚗', train: '🚄', subway: '🚇', plane: '✈️',
            walk: '🚶', bus: '🚌', cruise: '🚢' };

        const map = L.map('map');
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; OpenStreetMap contributors'
        }).addTo(map);

        const bounds = [];
        roadbookData.markers.forEach(m => {
            bounds.push(m.position);
            L.marker(m.position, { title: m.title }).addTo(map)
                .bindPopup('<strong>' + m.title + '</strong>');
        });

        roadbookData.connections.forEach(c => {
            const start = roadbookData.markers.find(m => m.id === c.startId);
            const end = roadbookData.markers.find(m => m.id === c.endId);
            if (!start || !end) return;
            const color = transportColors[c.transportType] || '#666';
            L.polyline([start.position, end.position],
                { color: color, weight: 6, opacity: 1.0 }).addTo(map);
            const mid = [(start.position[0] + end.position[0]) / 2,
                         (start.position[1] + end.position[1]) / 2];
            const glyph = transportIcons[c.transportType] || '•';
            L.marker(mid, { icon: L.divIcon({ className: 'transport-icon',
                html: '<div style="border: 2px solid ' + color + ';">' + glyph + '</div>',
                iconSize: [30, 30], iconAnchor: [15, 15] }) }).addTo(map);
        });

        if (bounds.length > 0) {
            map.fitBounds(bounds, { padding: [40, 40] });
        } else {
            map.setView([35.0, 105.0], 4);
        }
    </script>
</body>
</html>
"#;
