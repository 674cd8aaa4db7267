//! Datumslogik: Zeitstempel-Parsing, Tages-Schlüssel, Gruppierung,
//! Filterung und Sortierung nach Reisetagen.

use super::connection::Connection;
use super::marker::Marker;
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

/// Anzeigetext für Zeitstempel ohne auswertbares Datum.
pub const UNKNOWN_DATE_LABEL: &str = "未知日期";

/// Wire-/Anzeige-Format der Zeitstempel ("YYYY-MM-DD HH:MM:SS", lokale Zeit).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tages-Schlüssel eines Zeitstempels: lokaler Kalendertag oder `Unknown`.
///
/// `Unknown` wird in Datenbeständen toleriert, taucht aber in keiner
/// Tagesliste auf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateKey {
    Day(NaiveDate),
    Unknown,
}

impl DateKey {
    /// Bestimmt den Tages-Schlüssel eines rohen Zeitstempels.
    pub fn of(raw: &str) -> DateKey {
        match parse_date_time(raw) {
            Some(dt) => DateKey::Day(dt.date()),
            None => DateKey::Unknown,
        }
    }

    /// `true` für Zeitstempel ohne auswertbares Datum.
    pub fn is_unknown(&self) -> bool {
        matches!(self, DateKey::Unknown)
    }

    /// String-Form: "YYYY-MM-DD" bzw. der Unknown-Anzeigetext.
    pub fn as_string(&self) -> String {
        match self {
            DateKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            DateKey::Unknown => UNKNOWN_DATE_LABEL.to_string(),
        }
    }
}

/// Parst einen Roadbook-Zeitstempel in lokale Kalenderzeit.
///
/// Akzeptiert das eigene Format, datetime-local-Eingaben, nackte Daten
/// sowie RFC-3339 (z.B. `exportTime`); RFC-3339-Werte werden in die lokale
/// Zeitzone umgerechnet, so wie es der Datumsfilter im Browser tut.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = [
        DATE_TIME_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    None
}

/// Formatiert einen Zeitpunkt im Roadbook-Format.
pub fn format_date_time(dt: NaiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}

/// Aktuelle lokale Zeit im Roadbook-Format.
pub fn current_local_date_time() -> String {
    format_date_time(Local::now().naive_local())
}

/// Heutiges Datum um 00:00:00 im Roadbook-Format.
pub fn today_at_midnight() -> String {
    format!("{} 00:00:00", Local::now().format("%Y-%m-%d"))
}

/// Folgetag eines Zeitstempels um 00:00:00 (für "weiteren Tag anhängen").
///
/// `None` wenn der Zeitstempel nicht parsbar ist oder der Folgetag den
/// Kalender verlässt.
pub fn next_day_at_midnight(raw: &str) -> Option<String> {
    let date = parse_date_time(raw)?.date().checked_add_days(Days::new(1))?;
    Some(format!("{} 00:00:00", date.format("%Y-%m-%d")))
}

/// Alle Kalendertage eines Markers (dedupliziert, aufsteigend).
/// Nicht parsbare Zeitstempel fallen heraus.
pub fn marker_dates(marker: &Marker) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = marker
        .date_times()
        .iter()
        .filter_map(|raw| parse_date_time(raw).map(|dt| dt.date()))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Zeitpunkte eines Markers, die auf den Kalendertag fallen.
pub fn marker_times_for_date(marker: &Marker, date: NaiveDate) -> Vec<NaiveDateTime> {
    marker
        .date_times()
        .iter()
        .filter_map(|raw| parse_date_time(raw))
        .filter(|dt| dt.date() == date)
        .collect()
}

/// Gruppiert Marker nach Kalendertag.
///
/// Ein Marker mit Zeitstempeln über mehrere Tage erscheint in JEDER
/// berührten Tagesgruppe (Mehrfach-Mitgliedschaft, nicht dedupliziert).
pub fn group_markers_by_date<'a>(markers: &'a [Marker]) -> BTreeMap<NaiveDate, Vec<&'a Marker>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Marker>> = BTreeMap::new();
    for marker in markers {
        for date in marker_dates(marker) {
            groups.entry(date).or_default().push(marker);
        }
    }
    groups
}

/// Sortiert Marker nach ihrem frühesten Zeitpunkt am Kalendertag.
///
/// Marker ohne Zeitpunkt an diesem Tag landen stabil am Ende.
pub fn sort_by_earliest_time_in_bucket<'a>(
    markers: &[&'a Marker],
    date: NaiveDate,
) -> Vec<&'a Marker> {
    let mut sorted: Vec<&Marker> = markers.to_vec();
    sorted.sort_by_key(|marker| {
        marker_times_for_date(marker, date)
            .into_iter()
            .min()
            // Ohne Treffer hinter jeden echten Zeitpunkt sortieren
            .unwrap_or(NaiveDateTime::MAX)
    });
    sorted
}

/// Alle Kalendertage, die in Marker-Zeitstempeln vorkommen, aufsteigend.
/// Unbekannte Daten sind ausgeschlossen.
pub fn all_dates_sorted(markers: &[Marker]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = markers.iter().flat_map(marker_dates).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Gefilterte Tagesansicht: Marker mit Mehrtages-Mitgliedschaft,
/// Verbindungen strikt über ihren einzelnen Zeitstempel.
#[derive(Debug)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    pub markers: Vec<&'a Marker>,
    pub connections: Vec<&'a Connection>,
}

/// Filtert Marker und Verbindungen auf einen Kalendertag.
///
/// Asymmetrie beabsichtigt: Marker gehören zu jedem Tag ihrer
/// Zeitstempel-Liste, Verbindungen nur zum Tag ihres einen Zeitstempels.
/// Die Marker sind nach frühestem Tageszeitpunkt sortiert.
pub fn filter_by_date<'a>(
    markers: &'a [Marker],
    connections: &'a [Connection],
    date: NaiveDate,
) -> DayView<'a> {
    let day_markers: Vec<&Marker> = markers
        .iter()
        .filter(|marker| marker_dates(marker).contains(&date))
        .collect();
    let day_markers = sort_by_earliest_time_in_bucket(&day_markers, date);

    let day_connections: Vec<&Connection> = connections
        .iter()
        .filter(|conn| DateKey::of(&conn.date_time) == DateKey::Day(date))
        .collect();

    DayView {
        date,
        markers: day_markers,
        connections: day_connections,
    }
}

/// Anzeigetext eines Tages-Schlüssels: 今天 / 昨天 / "M月D日 (周X)".
pub fn format_date_header(key: DateKey) -> String {
    let DateKey::Day(date) = key else {
        return UNKNOWN_DATE_LABEL.to_string();
    };

    let today = Local::now().date_naive();
    if date == today {
        return "今天".to_string();
    }
    if Some(date) == today.checked_sub_days(Days::new(1)) {
        return "昨天".to_string();
    }

    const WEEKDAYS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    format!("{}月{}日 ({})", date.month(), date.day(), weekday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::GeoPoint;
    use crate::core::marker::MarkerIcon;
    use crate::core::TransportType;

    fn make_marker(id: u64, date_times: &[&str]) -> Marker {
        Marker::restore(
            id,
            GeoPoint::new(0.0, 0.0),
            format!("标记点{id}"),
            Vec::new(),
            MarkerIcon::default(),
            "2024-01-01 00:00:00".to_string(),
            date_times.iter().map(|s| s.to_string()).collect(),
            "2024-01-01 00:00:00".to_string(),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Testdatum")
    }

    #[test]
    fn test_date_key_of_formats() {
        assert_eq!(
            DateKey::of("2024-01-01 10:30:00"),
            DateKey::Day(date("2024-01-01"))
        );
        assert_eq!(
            DateKey::of("2024-01-01T10:30"),
            DateKey::Day(date("2024-01-01"))
        );
        assert_eq!(DateKey::of("2024-01-01"), DateKey::Day(date("2024-01-01")));
        assert_eq!(DateKey::of(""), DateKey::Unknown);
        assert_eq!(DateKey::of("kein datum"), DateKey::Unknown);
        assert_eq!(DateKey::Unknown.as_string(), "未知日期");
    }

    #[test]
    fn test_multi_day_marker_appears_in_every_touched_group() {
        let markers = vec![
            make_marker(1, &["2024-01-01T10:00", "2024-01-03T09:00"]),
            make_marker(2, &["2024-01-02 08:00:00"]),
        ];

        let groups = group_markers_by_date(&markers);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[&date("2024-01-01")].iter().map(|m| m.id).collect::<Vec<_>>(),
            [1]
        );
        assert_eq!(
            groups[&date("2024-01-02")].iter().map(|m| m.id).collect::<Vec<_>>(),
            [2]
        );
        assert_eq!(
            groups[&date("2024-01-03")].iter().map(|m| m.id).collect::<Vec<_>>(),
            [1]
        );
    }

    #[test]
    fn test_unknown_timestamps_are_excluded_from_groups() {
        let markers = vec![make_marker(1, &["unlesbar"])];
        assert!(group_markers_by_date(&markers).is_empty());
        assert!(all_dates_sorted(&markers).is_empty());
    }

    #[test]
    fn test_sort_by_earliest_time_in_bucket() {
        let m_late = make_marker(1, &["2024-01-01 15:00:00"]);
        let m_early = make_marker(2, &["2024-01-01 20:00:00", "2024-01-01 07:00:00"]);
        let m_none = make_marker(3, &["2024-01-02 01:00:00"]);
        let m_none2 = make_marker(4, &["2024-01-02 02:00:00"]);

        let refs: Vec<&Marker> = vec![&m_late, &m_none, &m_early, &m_none2];
        let sorted = sort_by_earliest_time_in_bucket(&refs, date("2024-01-01"));
        let ids: Vec<u64> = sorted.iter().map(|m| m.id).collect();

        // 2 hat den frühesten Tageszeitpunkt (07:00), 3 und 4 ohne
        // Tageszeitpunkt stabil am Ende in Eingabereihenfolge
        assert_eq!(ids, [2, 1, 3, 4]);
    }

    #[test]
    fn test_all_dates_sorted_ascending() {
        let markers = vec![
            make_marker(1, &["2024-03-01 09:00:00"]),
            make_marker(2, &["2024-01-15 09:00:00", "2024-03-01 10:00:00"]),
            make_marker(3, &["nicht parsbar"]),
        ];
        assert_eq!(
            all_dates_sorted(&markers),
            [date("2024-01-15"), date("2024-03-01")]
        );
    }

    #[test]
    fn test_filter_by_date_marker_connection_asymmetry() {
        let markers = vec![
            make_marker(1, &["2024-01-01 09:00:00", "2024-01-02 09:00:00"]),
            make_marker(2, &["2024-01-02 10:00:00"]),
        ];
        let connections = vec![
            Connection::new(
                100,
                1,
                2,
                TransportType::Train,
                "2024-01-01 09:30:00".to_string(),
                "标记点1".to_string(),
                "标记点2".to_string(),
            ),
            Connection::new(
                101,
                2,
                1,
                TransportType::Walk,
                "2024-01-02 11:00:00".to_string(),
                "标记点2".to_string(),
                "标记点1".to_string(),
            ),
        ];

        let day1 = filter_by_date(&markers, &connections, date("2024-01-01"));
        assert_eq!(day1.markers.iter().map(|m| m.id).collect::<Vec<_>>(), [1]);
        assert_eq!(
            day1.connections.iter().map(|c| c.id).collect::<Vec<_>>(),
            [100]
        );

        // Marker 1 ist mehrtägig und erscheint auch am 02.01.;
        // Verbindung 100 gehört nur zum 01.01.
        let day2 = filter_by_date(&markers, &connections, date("2024-01-02"));
        assert_eq!(
            day2.markers.iter().map(|m| m.id).collect::<Vec<_>>(),
            [1, 2]
        );
        assert_eq!(
            day2.connections.iter().map(|c| c.id).collect::<Vec<_>>(),
            [101]
        );
    }

    #[test]
    fn test_next_day_at_midnight() {
        assert_eq!(
            next_day_at_midnight("2024-01-31 18:45:00").as_deref(),
            Some("2024-02-01 00:00:00")
        );
        assert_eq!(next_day_at_midnight("unlesbar"), None);
    }
}
