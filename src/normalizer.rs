//! Maps raw upstream records onto the canonical [`Vehicle`] view model.
//!
//! Normalization is total: malformed or missing fields degrade to documented
//! defaults (empty string, empty list, zero) instead of failing.

use serde_json::Value;

use crate::models::{ListedVehicle, RawVehicleRecord, Vehicle};

pub fn normalize(raw: &[RawVehicleRecord]) -> Vec<Vehicle> {
    raw.iter().map(normalize_record).collect()
}

pub fn normalize_record(raw: &RawVehicleRecord) -> Vehicle {
    Vehicle {
        id: integer_field(&raw.id),
        make: string_field(&raw.brand),
        model: string_field(&raw.model),
        year: i32::try_from(integer_field(&raw.year)).unwrap_or(0),
        price: price_field(&raw.price),
        mileage: mileage_field(&raw.mileage),
        color: string_field(&raw.color),
        transmission: string_field(&raw.transmission),
        fuel_type: string_field(&raw.fuel_type),
        engine: string_field(&raw.engine),
        features: features_field(&raw.features),
        images: images_field(&raw.image_url),
        description: string_field(&raw.description),
    }
}

/// Pairs every vehicle with `"{id}-{position}"`. The numeric id is left as-is,
/// so two records sharing an id still get distinct keys.
pub fn with_display_keys(vehicles: Vec<Vehicle>) -> Vec<ListedVehicle> {
    vehicles
        .into_iter()
        .enumerate()
        .map(|(index, vehicle)| ListedVehicle {
            display_key: format!("{}-{}", vehicle.id, index),
            vehicle,
        })
        .collect()
}

/// Parses a mileage value. Strings such as `"45000 miles"` keep only the
/// leading digits of their first whitespace-separated token; a token with no
/// leading digits yields 0.
pub fn parse_mileage(text: &str) -> u64 {
    let token = text.split_whitespace().next().unwrap_or("");
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(miles) => miles,
        Err(_) => {
            if !digits.is_empty() {
                // Only reachable on overflow
                return u64::MAX;
            }
            tracing::debug!(raw = text, "Unparseable mileage, defaulting to 0");
            0
        }
    }
}

fn mileage_field(value: &Value) -> u64 {
    match value {
        Value::String(s) => parse_mileage(s),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn string_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn integer_field(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn price_field(value: &Value) -> f64 {
    let price = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if price.is_finite() && price > 0.0 { price } else { 0.0 }
}

// Only a real array counts; delimited strings are not split
fn features_field(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn images_field(value: &Value) -> Vec<String> {
    match value.as_str() {
        Some(url) if !url.is_empty() => vec![url.to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawVehicleRecord {
        RawVehicleRecord::from_value(value)
    }

    #[test]
    fn maps_a_complete_record() {
        let raw = record(json!({
            "id": 3,
            "brand": "Toyota",
            "model": "Camry",
            "year": 2022,
            "price": 27500,
            "mileage": 12000,
            "color": "Silver",
            "transmission": "Automatic",
            "fuel_type": "Hybrid",
            "engine": "2.5L I4",
            "features": ["5 Seats", "Lane Assist"],
            "image_url": "https://cdn.example.com/camry.jpg",
            "description": "Reliable commuter"
        }));
        let vehicle = normalize_record(&raw);
        assert_eq!(vehicle.id, 3);
        assert_eq!(vehicle.make, "Toyota");
        assert_eq!(vehicle.year, 2022);
        assert_eq!(vehicle.price, 27500.0);
        assert_eq!(vehicle.mileage, 12000);
        assert_eq!(vehicle.fuel_type, "Hybrid");
        assert_eq!(vehicle.features, vec!["5 Seats", "Lane Assist"]);
        assert_eq!(vehicle.images, vec!["https://cdn.example.com/camry.jpg"]);
        assert_eq!(vehicle.description, "Reliable commuter");
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let vehicle = normalize_record(&record(json!({ "id": 1, "brand": "Kia" })));
        assert!(vehicle.features.is_empty());
        assert!(vehicle.images.is_empty());
        assert_eq!(vehicle.description, "");
        assert_eq!(vehicle.mileage, 0);
        assert_eq!(vehicle.price, 0.0);
        assert_eq!(vehicle.model, "");
    }

    #[test]
    fn null_description_becomes_empty() {
        let vehicle = normalize_record(&record(json!({ "description": null })));
        assert_eq!(vehicle.description, "");
    }

    #[test]
    fn mileage_string_keeps_leading_number() {
        let vehicle = normalize_record(&record(json!({ "mileage": "50000 miles" })));
        assert_eq!(vehicle.mileage, 50000);
        assert_eq!(parse_mileage("45000 miles"), 45000);
        assert_eq!(parse_mileage("  8000   km"), 8000);
        assert_eq!(parse_mileage("12000mi"), 12000);
    }

    #[test]
    fn non_numeric_mileage_is_zero() {
        assert_eq!(parse_mileage("unknown"), 0);
        assert_eq!(parse_mileage(""), 0);
        assert_eq!(parse_mileage("-500 miles"), 0);
    }

    #[test]
    fn features_must_already_be_a_list() {
        let vehicle = normalize_record(&record(json!({ "features": "Sunroof, Heated Seats" })));
        assert!(vehicle.features.is_empty());

        let vehicle = normalize_record(&record(json!({ "features": ["Sunroof", 4, "Heated Seats"] })));
        assert_eq!(vehicle.features, vec!["Sunroof", "Heated Seats"]);
    }

    #[test]
    fn empty_image_url_gives_no_images() {
        let vehicle = normalize_record(&record(json!({ "image_url": "" })));
        assert!(vehicle.images.is_empty());
    }

    #[test]
    fn negative_price_is_clamped() {
        let vehicle = normalize_record(&record(json!({ "price": -10 })));
        assert_eq!(vehicle.price, 0.0);
        let vehicle = normalize_record(&record(json!({ "price": "18999.5" })));
        assert_eq!(vehicle.price, 18999.5);
    }

    #[test]
    fn duplicate_spellings_keep_the_rest_of_the_record() {
        let vehicle = normalize_record(&record(json!({
            "id": 9,
            "brand": "Honda",
            "make": "Honda",
            "price": 21000,
            "mileage": "40000 miles"
        })));
        assert_eq!(vehicle.id, 9);
        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.price, 21000.0);
        assert_eq!(vehicle.mileage, 40000);

        let vehicle = normalize_record(&record(json!({
            "id": 5,
            "brand": "Kia",
            "fuel_type": "Hybrid",
            "fuelType": "Hybrid"
        })));
        assert_eq!(vehicle.id, 5);
        assert_eq!(vehicle.make, "Kia");
        assert_eq!(vehicle.fuel_type, "Hybrid");
    }

    #[test]
    fn display_keys_disambiguate_colliding_ids() {
        let vehicles = normalize(&[
            record(json!({ "id": 4, "brand": "Audi" })),
            record(json!({ "id": 4, "brand": "BMW" })),
        ]);
        let listed = with_display_keys(vehicles);
        assert_eq!(listed[0].display_key, "4-0");
        assert_eq!(listed[1].display_key, "4-1");
        assert_eq!(listed[0].vehicle.id, listed[1].vehicle.id);
    }
}
