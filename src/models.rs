// Data structures shared by the normalizer, the filter engine and the API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog entry exactly as the upstream source delivers it.
///
/// Every field is kept as a raw JSON value: the source is trusted but
/// inconsistently shaped (mileage arrives as `45000` or `"45000 miles"`,
/// features may be missing, ...). Coercion happens in the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawVehicleRecord {
    pub id: Value,
    pub brand: Value,
    pub model: Value,
    pub year: Value,
    pub price: Value,
    pub mileage: Value,
    pub color: Value,
    pub transmission: Value,
    pub fuel_type: Value,
    pub engine: Value,
    pub features: Value,
    pub image_url: Value,
    pub description: Value,
}

impl RawVehicleRecord {
    /// Never fails: anything that is not a JSON object becomes an empty record.
    ///
    /// Fields are read key by key, so an odd value only affects its own
    /// field. When both a primary key and its alternate spelling are present
    /// (`brand`/`make`, `fuel_type`/`fuelType`, `image_url`/`imageUrl`) the
    /// primary key wins.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            id: first_present(&map, &["id"]),
            brand: first_present(&map, &["brand", "make"]),
            model: first_present(&map, &["model"]),
            year: first_present(&map, &["year"]),
            price: first_present(&map, &["price"]),
            mileage: first_present(&map, &["mileage"]),
            color: first_present(&map, &["color"]),
            transmission: first_present(&map, &["transmission"]),
            fuel_type: first_present(&map, &["fuel_type", "fuelType"]),
            engine: first_present(&map, &["engine"]),
            features: first_present(&map, &["features"]),
            image_url: first_present(&map, &["image_url", "imageUrl"]),
            description: first_present(&map, &["description"]),
        }
    }
}

fn first_present(map: &Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .cloned()
        .unwrap_or(Value::Null)
}

// Canonical vehicle. Every scalar is well-typed once normalized.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")] // Match JavaScript frontend keys
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: u64,
    pub color: String,
    pub transmission: String,
    pub fuel_type: String,
    pub engine: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub description: String,
}

impl AsRef<Vehicle> for Vehicle {
    fn as_ref(&self) -> &Vehicle {
        self
    }
}

/// A vehicle paired with its list-unique display key (`"{id}-{position}"`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListedVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub display_key: String,
}

impl AsRef<Vehicle> for ListedVehicle {
    fn as_ref(&self) -> &Vehicle {
        &self.vehicle
    }
}

/// Criteria for one filter action. Built fresh per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub make: String,
    // (min, max), both inclusive
    pub price_range: (f64, f64),
    pub fuel_type: String,
    pub seating_capacity: String,
    pub search_query: String,
}

impl FilterCriteria {
    pub const FULL_PRICE_RANGE: (f64, f64) = (0.0, f64::INFINITY);
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            make: String::new(),
            price_range: Self::FULL_PRICE_RANGE,
            fuel_type: String::new(),
            seating_capacity: String::new(),
            search_query: String::new(),
        }
    }
}

// Query parameters received from the frontend filter form
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(alias = "brand")]
    pub make: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub fuel_type: Option<String>,
    pub seating_capacity: Option<String>,
    #[serde(alias = "searchQuery")]
    pub q: Option<String>,

    // Pagination
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl SearchParams {
    pub fn criteria(&self) -> FilterCriteria {
        let (default_min, default_max) = FilterCriteria::FULL_PRICE_RANGE;
        // NaN or infinite bounds are treated as absent
        let finite = |bound: Option<f64>| bound.filter(|b| b.is_finite());
        FilterCriteria {
            make: self.make.clone().unwrap_or_default(),
            price_range: (
                finite(self.price_min).unwrap_or(default_min),
                finite(self.price_max).unwrap_or(default_max),
            ),
            fuel_type: self.fuel_type.clone().unwrap_or_default(),
            seating_capacity: self.seating_capacity.clone().unwrap_or_default(),
            search_query: self.q.clone().unwrap_or_default(),
        }
    }
}

// Headline numbers shown above the listing grid
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub makes: usize,
    pub fuel_types: usize,
    pub under_budget: usize,
    pub budget_threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_record_accepts_alternate_keys() {
        let raw = RawVehicleRecord::from_value(json!({
            "make": "Honda",
            "fuelType": "Hybrid",
            "imageUrl": "https://cdn.example.com/civic.jpg"
        }));
        assert_eq!(raw.brand, json!("Honda"));
        assert_eq!(raw.fuel_type, json!("Hybrid"));
        assert_eq!(raw.image_url, json!("https://cdn.example.com/civic.jpg"));
    }

    #[test]
    fn primary_key_wins_when_both_spellings_present() {
        let raw = RawVehicleRecord::from_value(json!({
            "id": 9,
            "brand": "Honda",
            "make": "Acura",
            "price": 21000,
            "fuel_type": "Hybrid",
            "fuelType": "Gasoline"
        }));
        assert_eq!(raw.id, json!(9));
        assert_eq!(raw.brand, json!("Honda"));
        assert_eq!(raw.price, json!(21000));
        assert_eq!(raw.fuel_type, json!("Hybrid"));
    }

    #[test]
    fn non_object_record_is_empty() {
        assert_eq!(RawVehicleRecord::from_value(json!([1, 2, 3])), RawVehicleRecord::default());
        assert_eq!(RawVehicleRecord::from_value(Value::Null), RawVehicleRecord::default());
    }

    #[test]
    fn listed_vehicle_serializes_flat() {
        let listed = ListedVehicle {
            vehicle: Vehicle { id: 7, make: "Ford".into(), fuel_type: "Gasoline".into(), ..Vehicle::default() },
            display_key: "7-0".into(),
        };
        let value = serde_json::to_value(&listed).unwrap();
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["fuelType"], json!("Gasoline"));
        assert_eq!(value["displayKey"], json!("7-0"));
    }

    #[test]
    fn params_without_values_give_default_criteria() {
        assert_eq!(SearchParams::default().criteria(), FilterCriteria::default());
    }

    #[test]
    fn non_finite_price_bounds_fall_back_to_full_range() {
        let params = SearchParams {
            price_min: Some(f64::NAN),
            price_max: Some(f64::INFINITY),
            ..SearchParams::default()
        };
        let criteria = params.criteria();
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(criteria.active_count(), 0);

        let params = SearchParams { price_max: Some(f64::NAN), price_min: Some(5000.0), ..SearchParams::default() };
        assert_eq!(params.criteria().price_range, (5000.0, f64::INFINITY));
    }

    #[test]
    fn params_map_onto_criteria() {
        let params = SearchParams {
            make: Some("Honda".into()),
            price_max: Some(30000.0),
            q: Some("sunroof".into()),
            ..SearchParams::default()
        };
        let criteria = params.criteria();
        assert_eq!(criteria.make, "Honda");
        assert_eq!(criteria.price_range, (0.0, 30000.0));
        assert_eq!(criteria.search_query, "sunroof");
        assert!(criteria.fuel_type.is_empty());
    }
}
