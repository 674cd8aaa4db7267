//! Geodätische Hilfsfunktionen: Distanz und Pfeil-Rotation zwischen Koordinaten.

use serde::{Deserialize, Serialize};

/// Erdradius in Metern (Kugel-Näherung).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Geografische Koordinate als `[Breite, Länge]` in Dezimalgrad.
///
/// Serialisiert als zweielementiges Array `[lat, lng]`, so wie die
/// Positionsfelder im Roadbook-Wire-Format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint(pub f64, pub f64);

impl GeoPoint {
    /// Erstellt eine Koordinate aus Breite und Länge.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self(lat, lng)
    }

    /// Breitengrad in Dezimalgrad.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.0
    }

    /// Längengrad in Dezimalgrad.
    #[inline]
    pub fn lng(&self) -> f64 {
        self.1
    }

    /// Prüft ob die Koordinate im gültigen Wertebereich liegt
    /// (lat ∈ [-90, 90], lng ∈ [-180, 180], beide endlich).
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

/// Großkreis-Distanz zwischen zwei Koordinaten in Metern (Haversine).
///
/// NaN-Eingaben propagieren als NaN; der Aufrufer validiert vorher.
pub fn haversine_distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let delta_phi = (b.lat() - a.lat()).to_radians();
    let delta_lambda = (b.lng() - a.lng()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Rotationswinkel von `a` nach `b` in Grad, vorzeichenbehaftet (-180, 180],
/// 0 = Norden, 90 = Osten.
///
/// Bewusst eine planare Näherung: `atan2(Δlng, Δlat)` ohne den
/// Breitengrad-Kosinus der sphärischen Peilungsformel. Die Richtungspfeile
/// auf der Karte werden damit bei den üblichen Zoomstufen korrekt rotiert;
/// für Langstrecken-Navigation ist der Wert ungeeignet. Nicht durch die
/// sphärische Formel ersetzen, sonst kippen bestehende Pfeil-Orientierungen.
pub fn bearing_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    let delta_lat = b.lat() - a.lat();
    let delta_lng = b.lng() - a.lng();
    delta_lng.atan2(delta_lat).to_degrees()
}

/// Mittelpunkt einer Strecke (planar, für Icon-Platzierung auf der Linie).
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    GeoPoint::new((a.lat() + b.lat()) / 2.0, (a.lng() + b.lng()) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_haversine_beijing_shanghai() {
        let beijing = GeoPoint::new(39.9042, 116.4074);
        let shanghai = GeoPoint::new(31.2304, 121.4737);

        let distance = haversine_distance_meters(beijing, shanghai);
        assert_abs_diff_eq!(distance, 1_067_000.0, epsilon = 2_000.0);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = GeoPoint::new(48.1371, 11.5754);
        assert_abs_diff_eq!(haversine_distance_meters(p, p), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_propagates_nan() {
        let p = GeoPoint::new(f64::NAN, 0.0);
        let q = GeoPoint::new(0.0, 0.0);
        assert!(haversine_distance_meters(p, q).is_nan());
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);

        // Norden: Δlat positiv, Δlng 0
        assert_abs_diff_eq!(
            bearing_degrees(origin, GeoPoint::new(1.0, 0.0)),
            0.0,
            epsilon = 1e-9
        );
        // Osten: Δlng positiv
        assert_abs_diff_eq!(
            bearing_degrees(origin, GeoPoint::new(0.0, 1.0)),
            90.0,
            epsilon = 1e-9
        );
        // Süden
        assert_abs_diff_eq!(
            bearing_degrees(origin, GeoPoint::new(-1.0, 0.0)),
            180.0,
            epsilon = 1e-9
        );
        // Westen
        assert_abs_diff_eq!(
            bearing_degrees(origin, GeoPoint::new(0.0, -1.0)),
            -90.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_geopoint_validation() {
        assert!(GeoPoint::new(39.9, 116.4).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(GeoPoint::new(10.0, 20.0), GeoPoint::new(20.0, 40.0));
        assert_eq!(m, GeoPoint::new(15.0, 30.0));
    }
}
