//! GEO operators: great-circle distance checks.

use crate::value::Value;

operator_enum! {
    GeoOperator {
        InRadius => "IN-RADIUS",
        NotInRadius => "NOT-IN-RADIUS",
    }
}

const EARTH_RADIUS_KM: f64 = 6371.0;
const EARTH_RADIUS_MI: f64 = 3959.0;

/// Unit used for radius and distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "km" | "kilometers" | "KM" => Some(DistanceUnit::Kilometers),
            "mi" | "miles" | "MI" => Some(DistanceUnit::Miles),
            _ => None,
        }
    }

    fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
            DistanceUnit::Miles => EARTH_RADIUS_MI,
        }
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Read a point from `[lat, lng]` or `{lat, lng}`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => match items.as_slice() {
                [lat, lng] => Some(Self {
                    lat: lat.as_f64()?,
                    lng: lng.as_f64()?,
                }),
                _ => None,
            },
            Value::Object(_) | Value::Map(_) => Some(Self {
                lat: value.get("lat")?.as_f64()?,
                lng: value.get("lng")?.as_f64()?,
            }),
            _ => None,
        }
    }
}

/// Circle described by a GEO match value
#[derive(Debug, Clone, Copy, PartialEq)]
struct Area {
    center: GeoPoint,
    radius: f64,
    unit: DistanceUnit,
}

impl Area {
    /// `{lat, lng, radius?, unit?}`; a missing radius means an exact point
    fn from_value(value: &Value) -> Option<Self> {
        if !matches!(value, Value::Object(_) | Value::Map(_)) {
            return None;
        }
        let center = GeoPoint::from_value(value)?;
        let radius = match value.get("radius") {
            None | Some(Value::Undefined) => 0.0,
            Some(r) => r.as_f64().filter(|r| *r >= 0.0)?,
        };
        let unit = match value.get("unit") {
            None | Some(Value::Undefined) => DistanceUnit::default(),
            Some(u) => DistanceUnit::parse(u.as_str()?)?,
        };
        Some(Self {
            center,
            radius,
            unit,
        })
    }
}

/// Haversine distance between two points
pub fn haversine_distance(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    unit.earth_radius() * c
}

/// Evaluate a GEO operator
pub fn evaluate(value: &Value, operator: GeoOperator, match_value: &Value) -> bool {
    let (Some(point), Some(area)) = (GeoPoint::from_value(value), Area::from_value(match_value))
    else {
        return false;
    };
    let distance = haversine_distance(point, area.center, area.unit);
    match operator {
        GeoOperator::InRadius => distance <= area.radius,
        GeoOperator::NotInRadius => distance > area.radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PARIS: GeoPoint = GeoPoint { lat: 48.8566, lng: 2.3522 };
    const LONDON: GeoPoint = GeoPoint { lat: 51.5074, lng: -0.1278 };

    #[test]
    fn test_haversine() {
        let km = haversine_distance(PARIS, LONDON, DistanceUnit::Kilometers);
        assert!((km - 343.5).abs() < 1.0, "got {km}");
        let mi = haversine_distance(PARIS, LONDON, DistanceUnit::Miles);
        assert!((mi - 213.5).abs() < 1.0, "got {mi}");
        assert_eq!(haversine_distance(PARIS, PARIS, DistanceUnit::Kilometers), 0.0);
    }

    #[test]
    fn test_in_radius() {
        let paris = Value::from(json!([48.8566, 2.3522]));
        let near_london = Value::from(json!({"lat": 51.5074, "lng": -0.1278, "radius": 400}));
        assert!(evaluate(&paris, GeoOperator::InRadius, &near_london));

        let tight = Value::from(json!({"lat": 51.5074, "lng": -0.1278, "radius": 300}));
        assert!(!evaluate(&paris, GeoOperator::InRadius, &tight));
        assert!(evaluate(&paris, GeoOperator::NotInRadius, &tight));

        let miles = Value::from(json!({"lat": 51.5074, "lng": -0.1278, "radius": 220, "unit": "mi"}));
        assert!(evaluate(&paris, GeoOperator::InRadius, &miles));
    }

    #[test]
    fn test_missing_radius_is_exact_point() {
        let here = Value::from(json!({"lat": 10.0, "lng": 20.0}));
        let same = Value::from(json!({"lat": 10.0, "lng": 20.0}));
        assert!(evaluate(&here, GeoOperator::InRadius, &same));
        let nearby = Value::from(json!({"lat": 10.0, "lng": 20.0001}));
        assert!(!evaluate(&nearby, GeoOperator::InRadius, &same));
        assert!(evaluate(&nearby, GeoOperator::NotInRadius, &same));
    }

    #[test]
    fn test_invalid_shapes() {
        let area = Value::from(json!({"lat": 0, "lng": 0, "radius": 10}));
        assert!(!evaluate(&Value::from(json!([1, 2, 3])), GeoOperator::InRadius, &area));
        assert!(!evaluate(&Value::from("0,0"), GeoOperator::NotInRadius, &area));
        let bad_unit = Value::from(json!({"lat": 0, "lng": 0, "unit": "parsec"}));
        assert!(!evaluate(&Value::from(json!([0, 0])), GeoOperator::InRadius, &bad_unit));
        let negative = Value::from(json!({"lat": 0, "lng": 0, "radius": -1}));
        assert!(!evaluate(&Value::from(json!([0, 0])), GeoOperator::NotInRadius, &negative));
    }
}
