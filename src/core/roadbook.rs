//! Der zentrale Roadbook-Container mit Markern, Verbindungen,
//! Tagesnotizen und Ansichts-Einstellungen.

use super::connection::{Connection, TransportType};
use super::geo::{self, GeoPoint};
use super::marker::{Marker, MarkerIcon};
use super::schedule;
use super::ModelError;
use indexmap::IndexMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Zeitbasierte, streng monotone ID-Vergabe (Millisekunden seit Epoche).
///
/// Mehrere Erstellungen innerhalb derselben Millisekunde zählen hoch;
/// importierte IDs werden beobachtet, damit Neuvergaben nie kollidieren.
#[derive(Debug, Clone, Default)]
struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    fn next(&mut self) -> u64 {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = now_ms.max(self.last + 1);
        self.last
    }

    fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

/// Persistierte Ansichts-Einstellungen (Kartenquelle, Suchdienst).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// Kennung der aktiven Kartenquelle (z.B. "gaode", "osm")
    pub current_layer: String,
    /// Kennung des aktiven Suchdienstes (z.B. "auto", "nominatim")
    pub current_search_method: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            current_layer: "gaode".to_string(),
            current_search_method: "auto".to_string(),
        }
    }
}

/// Streckenstatistik einer Transportart.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStat {
    pub transport: TransportType,
    pub connection_count: usize,
    pub distance_meters: f64,
}

/// Kennzahlen des gesamten Roadbooks (für CLI und Statuszeilen).
#[derive(Debug, Clone, Default)]
pub struct TripStats {
    pub marker_count: usize,
    pub connection_count: usize,
    pub date_note_count: usize,
    /// Gesamt-Luftliniendistanz aller Verbindungen in Metern
    pub total_distance_meters: f64,
    /// Aufschlüsselung nach Transportart (nur vorkommende Arten)
    pub by_transport: Vec<TransportStat>,
}

/// Das in-memory Roadbook: alleiniger Eigentümer aller Entitäten
/// während einer Sitzung. Persistenz ist ein Schnappschuss, kein Live-Store.
#[derive(Debug, Clone, Default)]
pub struct Roadbook {
    /// Marker in Erstellungsreihenfolge (Legacy-Importe referenzieren
    /// Verbindungen über diese Reihenfolge)
    markers: Vec<Marker>,
    /// Verbindungen in Erstellungsreihenfolge
    connections: Vec<Connection>,
    /// Tagesnotizen: "YYYY-MM-DD" → Freitext, Einfügereihenfolge erhalten.
    /// Notizen zu Tagen ohne Marker sind erlaubt (verwaiste Notizen).
    pub date_notes: IndexMap<String, String>,
    /// Ansichts-Einstellungen, wandern mit durch Persistenz und Export
    pub view: ViewSettings,
    id_gen: IdGenerator,
}

impl Roadbook {
    /// Erstellt ein leeres Roadbook.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Marker ──────────────────────────────────────────────────────

    /// Alle Marker in Erstellungsreihenfolge.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Findet einen Marker per ID.
    pub fn marker(&self, id: u64) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Findet einen Marker per ID (mutierbar, für direkte Feld-Edits).
    pub fn marker_mut(&mut self, id: u64) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    /// Gibt die Anzahl der Marker zurück.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Platziert einen neuen Marker und gibt seine ID zurück.
    ///
    /// Titel und Nummern-Icon leiten sich aus der aktuellen Marker-Anzahl
    /// ab (1-basiert, wird später nicht nachgeführt). Der Start-Zeitstempel
    /// ist `seed_date_time`, sonst der kanonische Zeitpunkt des zuletzt
    /// platzierten Markers, sonst heute 00:00:00.
    pub fn add_marker(
        &mut self,
        position: GeoPoint,
        seed_date_time: Option<String>,
    ) -> Result<u64, ModelError> {
        if !position.is_valid() {
            return Err(ModelError::InvalidCoordinates {
                lat: position.lat(),
                lng: position.lng(),
            });
        }

        let number = self.markers.len() + 1;
        let first_date_time = seed_date_time
            .or_else(|| {
                self.markers
                    .last()
                    .map(|last| last.primary_date_time().to_string())
            })
            .unwrap_or_else(schedule::today_at_midnight);

        let id = self.id_gen.next();
        let marker = Marker::new(
            id,
            position,
            format!("标记点{number}"),
            MarkerIcon::numbered(number),
            schedule::current_local_date_time(),
            first_date_time,
        );
        self.markers.push(marker);
        Ok(id)
    }

    /// Entfernt einen Marker inklusive aller Verbindungen, die ihn
    /// referenzieren. Gibt die entfernten Entitäten zurück (für Undo),
    /// `None` wenn die ID unbekannt ist.
    pub fn remove_marker(&mut self, id: u64) -> Option<(Marker, Vec<Connection>)> {
        let index = self.markers.iter().position(|m| m.id == id)?;
        let marker = self.markers.remove(index);

        let mut removed_connections = Vec::new();
        self.connections.retain(|conn| {
            if conn.references(id) {
                removed_connections.push(conn.clone());
                false
            } else {
                true
            }
        });

        Some((marker, removed_connections))
    }

    /// Fügt einen vollständigen Marker wieder ein (Undo, Import).
    pub fn restore_marker(&mut self, marker: Marker) {
        self.id_gen.observe(marker.id);
        self.markers.push(marker);
    }

    /// Verschiebt einen Marker und gibt die vorherige Position zurück.
    ///
    /// `Ok(None)` bei unbekannter ID (nicht fatal); Koordinaten ausserhalb
    /// des Wertebereichs werden ohne Mutation abgelehnt.
    pub fn move_marker(
        &mut self,
        id: u64,
        new_position: GeoPoint,
    ) -> Result<Option<GeoPoint>, ModelError> {
        if !new_position.is_valid() {
            return Err(ModelError::InvalidCoordinates {
                lat: new_position.lat(),
                lng: new_position.lng(),
            });
        }
        let Some(marker) = self.marker_mut(id) else {
            return Ok(None);
        };
        let previous = marker.position;
        marker.position = new_position;
        Ok(Some(previous))
    }

    // ── Zeitstempel ─────────────────────────────────────────────────

    /// Hängt einem Marker einen weiteren Zeitstempel an: letzter bekannter
    /// Zeitpunkt + 1 Tag um 00:00:00, bei unlesbarem Zeitstempel die
    /// aktuelle Zeit. Gibt den neuen Zeitstempel zurück.
    pub fn add_marker_date_time(&mut self, id: u64) -> Result<String, ModelError> {
        let Some(marker) = self.marker_mut(id) else {
            return Err(ModelError::InvalidReference(id));
        };
        let last = marker
            .date_times()
            .last()
            .cloned()
            .unwrap_or_default();
        let next = schedule::next_day_at_midnight(&last)
            .unwrap_or_else(schedule::current_local_date_time);
        marker.push_date_time(next.clone());
        Ok(next)
    }

    /// Entfernt den Zeitstempel an `index`. Der letzte verbleibende
    /// Zeitstempel eines Markers kann nicht entfernt werden.
    pub fn remove_marker_date_time(&mut self, id: u64, index: usize) -> Result<(), ModelError> {
        let Some(marker) = self.marker_mut(id) else {
            return Err(ModelError::InvalidReference(id));
        };
        marker.remove_date_time(index)?;
        Ok(())
    }

    // ── Verbindungen ────────────────────────────────────────────────

    /// Alle Verbindungen in Erstellungsreihenfolge.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Findet eine Verbindung per ID.
    pub fn connection(&self, id: u64) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Findet eine Verbindung per ID (mutierbar, für direkte Feld-Edits).
    pub fn connection_mut(&mut self, id: u64) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    /// Gibt die Anzahl der Verbindungen zurück.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Alle Verbindungen, die den Marker referenzieren.
    pub fn connections_of(&self, marker_id: u64) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.references(marker_id))
            .collect()
    }

    /// Verbindet zwei Marker und gibt die Verbindungs-ID zurück.
    ///
    /// Beide IDs müssen auflösbar und verschieden sein. Der Zeitstempel
    /// der Verbindung ist der kanonische Zeitpunkt des Start-Markers.
    pub fn add_connection(
        &mut self,
        start_id: u64,
        end_id: u64,
        transport: TransportType,
    ) -> Result<u64, ModelError> {
        if start_id == end_id {
            return Err(ModelError::SelfReference(start_id));
        }
        let start = self
            .marker(start_id)
            .ok_or(ModelError::InvalidReference(start_id))?;
        let end = self
            .marker(end_id)
            .ok_or(ModelError::InvalidReference(end_id))?;

        let date_time = start.primary_date_time().to_string();
        let start_title = start.title.clone();
        let end_title = end.title.clone();

        let id = self.id_gen.next();
        self.connections.push(Connection::new(
            id,
            start_id,
            end_id,
            transport,
            date_time,
            start_title,
            end_title,
        ));
        Ok(id)
    }

    /// Entfernt eine Verbindung; `None` wenn die ID unbekannt ist.
    pub fn remove_connection(&mut self, id: u64) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Fügt eine vollständige Verbindung wieder ein (Undo, Import).
    ///
    /// Schlägt fehl wenn einer der Endpunkte nicht mehr existiert.
    pub fn restore_connection(&mut self, connection: Connection) -> Result<(), ModelError> {
        if self.marker(connection.start_id).is_none() {
            return Err(ModelError::InvalidReference(connection.start_id));
        }
        if self.marker(connection.end_id).is_none() {
            return Err(ModelError::InvalidReference(connection.end_id));
        }
        self.id_gen.observe(connection.id);
        self.connections.push(connection);
        Ok(())
    }

    /// Anzeige-Titel der Endpunkte: aktueller Marker-Titel, bei
    /// gelöschtem Marker der denormalisierte Schnappschuss.
    pub fn connection_display_titles(&self, connection: &Connection) -> (String, String) {
        let start = self
            .marker(connection.start_id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| connection.start_title.clone());
        let end = self
            .marker(connection.end_id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| connection.end_title.clone());
        (start, end)
    }

    /// Luftliniendistanz einer Verbindung in Metern.
    /// `None` wenn ein Endpunkt nicht mehr existiert.
    pub fn connection_distance_meters(&self, id: u64) -> Option<f64> {
        let conn = self.connection(id)?;
        let start = self.marker(conn.start_id)?;
        let end = self.marker(conn.end_id)?;
        Some(geo::haversine_distance_meters(start.position, end.position))
    }

    // ── Tagesnotizen ────────────────────────────────────────────────

    /// Setzt die Notiz eines Kalendertags; leerer Text entfernt die Notiz.
    pub fn set_date_note(&mut self, date_key: &str, note: &str) {
        if note.trim().is_empty() {
            self.date_notes.shift_remove(date_key);
        } else {
            self.date_notes
                .insert(date_key.to_string(), note.to_string());
        }
    }

    /// Notiz eines Kalendertags.
    pub fn date_note(&self, date_key: &str) -> Option<&str> {
        self.date_notes.get(date_key).map(String::as_str)
    }

    // ── Abfragen ────────────────────────────────────────────────────

    /// Findet den Marker mit der kleinsten Luftliniendistanz zur
    /// Abfrage-Koordinate. Linearer Scan, Roadbooks haben Dutzende Marker.
    pub fn nearest_marker(&self, query: GeoPoint) -> Option<(u64, f64)> {
        self.markers
            .iter()
            .map(|m| (m.id, geo::haversine_distance_meters(query, m.position)))
            .filter(|(_, d)| !d.is_nan())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Berechnet Kennzahlen über alle Marker und Verbindungen.
    pub fn stats(&self) -> TripStats {
        let mut by_transport: Vec<TransportStat> = Vec::new();
        let mut total_distance = 0.0;

        for conn in &self.connections {
            let distance = self.connection_distance_meters(conn.id).unwrap_or(0.0);
            total_distance += distance;

            match by_transport
                .iter_mut()
                .find(|stat| stat.transport == conn.transport)
            {
                Some(stat) => {
                    stat.connection_count += 1;
                    stat.distance_meters += distance;
                }
                None => by_transport.push(TransportStat {
                    transport: conn.transport.clone(),
                    connection_count: 1,
                    distance_meters: distance,
                }),
            }
        }

        TripStats {
            marker_count: self.markers.len(),
            connection_count: self.connections.len(),
            date_note_count: self.date_notes.len(),
            total_distance_meters: total_distance,
            by_transport,
        }
    }

    /// Leert das komplette Roadbook (Import ersetzt atomar: erst leeren,
    /// dann vollständig neu aufbauen, nie teilweise mischen).
    pub fn clear_all(&mut self) {
        self.markers.clear();
        self.connections.clear();
        self.date_notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_two_markers() -> (Roadbook, u64, u64) {
        let mut book = Roadbook::new();
        let a = book
            .add_marker(GeoPoint::new(39.9042, 116.4074), Some("2024-05-01 08:00:00".into()))
            .expect("Marker A");
        let b = book
            .add_marker(GeoPoint::new(31.2304, 121.4737), None)
            .expect("Marker B");
        (book, a, b)
    }

    #[test]
    fn test_add_marker_defaults() {
        let (book, a, b) = book_with_two_markers();

        let first = book.marker(a).expect("Marker A vorhanden");
        assert_eq!(first.title, "标记点1");
        assert_eq!(first.icon.kind, "number");
        assert_eq!(first.primary_date_time(), "2024-05-01 08:00:00");

        // Ohne Seed übernimmt der neue Marker den kanonischen Zeitpunkt
        // des zuletzt platzierten Markers
        let second = book.marker(b).expect("Marker B vorhanden");
        assert_eq!(second.title, "标记点2");
        assert_eq!(second.primary_date_time(), "2024-05-01 08:00:00");
    }

    #[test]
    fn test_marker_ids_are_strictly_monotonic() {
        let mut book = Roadbook::new();
        let mut last = 0;
        for _ in 0..20 {
            let id = book
                .add_marker(GeoPoint::new(0.0, 0.0), None)
                .expect("Marker");
            assert!(id > last, "IDs müssen streng monoton wachsen");
            last = id;
        }
    }

    #[test]
    fn test_add_marker_rejects_invalid_position() {
        let mut book = Roadbook::new();
        let err = book
            .add_marker(GeoPoint::new(91.0, 0.0), None)
            .expect_err("ungültige Breite");
        assert!(matches!(err, ModelError::InvalidCoordinates { .. }));
        assert_eq!(book.marker_count(), 0);
    }

    #[test]
    fn test_cascade_delete_removes_exactly_referencing_connections() {
        let (mut book, a, b) = book_with_two_markers();
        let c = book
            .add_marker(GeoPoint::new(22.5431, 114.0579), None)
            .expect("Marker C");

        let ab = book.add_connection(a, b, TransportType::Train).expect("a→b");
        let bc = book.add_connection(b, c, TransportType::Plane).expect("b→c");
        let ca = book.add_connection(c, a, TransportType::Car).expect("c→a");

        let (removed, cascaded) = book.remove_marker(a).expect("Marker A entfernt");
        assert_eq!(removed.id, a);

        // Genau die Verbindungen mit Bezug auf A fallen weg
        let cascaded_ids: Vec<u64> = cascaded.iter().map(|c| c.id).collect();
        assert!(cascaded_ids.contains(&ab));
        assert!(cascaded_ids.contains(&ca));
        assert!(!cascaded_ids.contains(&bc));
        assert_eq!(book.connection_count(), 1);
        assert!(book.connection(bc).is_some());
    }

    #[test]
    fn test_remove_marker_unknown_id_is_silent() {
        let mut book = Roadbook::new();
        assert!(book.remove_marker(12345).is_none());
    }

    #[test]
    fn test_move_marker_validates_and_returns_previous() {
        let (mut book, a, _) = book_with_two_markers();

        let err = book
            .move_marker(a, GeoPoint::new(0.0, 200.0))
            .expect_err("ungültige Länge");
        assert!(matches!(err, ModelError::InvalidCoordinates { .. }));
        // Keine Teil-Mutation
        assert_eq!(
            book.marker(a).expect("Marker A").position,
            GeoPoint::new(39.9042, 116.4074)
        );

        let prev = book
            .move_marker(a, GeoPoint::new(40.0, 116.0))
            .expect("gültige Koordinate")
            .expect("Marker existiert");
        assert_eq!(prev, GeoPoint::new(39.9042, 116.4074));

        // Unbekannte ID: stilles Ok(None)
        assert_eq!(
            book.move_marker(999, GeoPoint::new(0.0, 0.0)).expect("kein Fehler"),
            None
        );
    }

    #[test]
    fn test_add_connection_validations() {
        let (mut book, a, _) = book_with_two_markers();

        assert_eq!(
            book.add_connection(a, a, TransportType::Car).expect_err("Self-Loop"),
            ModelError::SelfReference(a)
        );
        assert_eq!(
            book.add_connection(a, 777, TransportType::Car)
                .expect_err("unbekanntes Ziel"),
            ModelError::InvalidReference(777)
        );
        assert_eq!(book.connection_count(), 0);
    }

    #[test]
    fn test_connection_defaults_from_start_marker() {
        let (mut book, a, b) = book_with_two_markers();
        let conn_id = book
            .add_connection(a, b, TransportType::Cruise)
            .expect("Verbindung");
        let conn = book.connection(conn_id).expect("Verbindung").clone();

        assert_eq!(conn.date_time, "2024-05-01 08:00:00");
        assert_eq!(conn.start_title, "标记点1");
        assert_eq!(conn.end_title, "标记点2");
        assert_eq!(conn.duration, 0.0);
        assert_eq!(conn.label, "");
    }

    #[test]
    fn test_display_titles_fall_back_after_delete() {
        let (mut book, a, b) = book_with_two_markers();
        let conn_id = book.add_connection(a, b, TransportType::Walk).expect("conn");

        book.marker_mut(a).expect("Marker A").title = "故宫".to_string();
        let conn = book.connection(conn_id).expect("conn").clone();
        // Lebender Marker: aktueller Titel gewinnt
        assert_eq!(
            book.connection_display_titles(&conn),
            ("故宫".to_string(), "标记点2".to_string())
        );

        // Endpunkt löschen entfernt die Verbindung kaskadiert; für den
        // Fallback-Test eine verwaiste Kopie befragen
        book.remove_marker(a);
        assert_eq!(
            book.connection_display_titles(&conn),
            ("标记点1".to_string(), "标记点2".to_string())
        );
    }

    #[test]
    fn test_add_marker_date_time_advances_one_day() {
        let (mut book, a, _) = book_with_two_markers();
        let added = book.add_marker_date_time(a).expect("Zeitstempel");
        assert_eq!(added, "2024-05-02 00:00:00");
        assert_eq!(book.marker(a).expect("A").date_times().len(), 2);

        // Folgeaufruf rechnet vom letzten Eintrag weiter
        let added = book.add_marker_date_time(a).expect("Zeitstempel");
        assert_eq!(added, "2024-05-03 00:00:00");
    }

    #[test]
    fn test_remove_last_date_time_rejected_via_roadbook() {
        let (mut book, a, _) = book_with_two_markers();
        assert_eq!(
            book.remove_marker_date_time(a, 0).expect_err("letzter Zeitstempel"),
            ModelError::LastTimestamp
        );
        assert_eq!(book.marker(a).expect("A").date_times().len(), 1);
    }

    #[test]
    fn test_nearest_marker() {
        let (book, a, b) = book_with_two_markers();
        // Abfrage nahe Peking
        let (id, distance) = book
            .nearest_marker(GeoPoint::new(39.9, 116.4))
            .expect("Treffer");
        assert_eq!(id, a);
        assert!(distance < 10_000.0);

        let (id, _) = book
            .nearest_marker(GeoPoint::new(31.0, 121.0))
            .expect("Treffer");
        assert_eq!(id, b);
    }

    #[test]
    fn test_date_notes_set_and_clear() {
        let mut book = Roadbook::new();
        book.set_date_note("2024-05-01", "长城一日游");
        // Verwaiste Notiz (kein Marker an diesem Tag) ist erlaubt
        assert_eq!(book.date_note("2024-05-01"), Some("长城一日游"));

        book.set_date_note("2024-05-01", "  ");
        assert_eq!(book.date_note("2024-05-01"), None);
    }

    #[test]
    fn test_stats() {
        let (mut book, a, b) = book_with_two_markers();
        book.add_connection(a, b, TransportType::Train).expect("conn");
        book.add_connection(b, a, TransportType::Train).expect("conn");
        book.set_date_note("2024-05-01", "Anreise");

        let stats = book.stats();
        assert_eq!(stats.marker_count, 2);
        assert_eq!(stats.connection_count, 2);
        assert_eq!(stats.date_note_count, 1);
        assert_eq!(stats.by_transport.len(), 1);
        assert_eq!(stats.by_transport[0].connection_count, 2);
        // Peking–Schanghai zweimal, grob 2 × 1067 km
        assert!(stats.total_distance_meters > 2_000_000.0);
    }

    #[test]
    fn test_clear_all() {
        let (mut book, a, b) = book_with_two_markers();
        book.add_connection(a, b, TransportType::Bus).expect("conn");
        book.set_date_note("2024-05-01", "x");

        book.clear_all();
        assert_eq!(book.marker_count(), 0);
        assert_eq!(book.connection_count(), 0);
        assert!(book.date_notes.is_empty());
    }
}
