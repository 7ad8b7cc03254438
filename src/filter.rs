//! Client-facing filter and free-text search over the canonical catalog.
//!
//! A vehicle is kept only when every active criterion matches. The result
//! borrows from the input and keeps its order.

use crate::models::{FilterCriteria, Vehicle};

pub fn filter_vehicles<'a, V: AsRef<Vehicle>>(vehicles: &'a [V], criteria: &FilterCriteria) -> Vec<&'a V> {
    vehicles.iter().filter(|v| matches(v.as_ref(), criteria)).collect()
}

pub fn matches(vehicle: &Vehicle, criteria: &FilterCriteria) -> bool {
    make_matches(vehicle, &criteria.make)
        && price_matches(vehicle, criteria.price_range)
        && fuel_matches(vehicle, &criteria.fuel_type)
        && seating_matches(vehicle, &criteria.seating_capacity)
        && search_matches(vehicle, &criteria.search_query)
}

fn make_matches(vehicle: &Vehicle, make: &str) -> bool {
    make.is_empty() || vehicle.make == make
}

fn price_matches(vehicle: &Vehicle, (min, max): (f64, f64)) -> bool {
    vehicle.price >= min && vehicle.price <= max
}

fn fuel_matches(vehicle: &Vehicle, fuel_type: &str) -> bool {
    fuel_type.is_empty() || vehicle.fuel_type == fuel_type
}

// Seat counts only live in free-text features, so this is best effort: a
// vehicle whose features never spell out its seats will not match.
fn seating_matches(vehicle: &Vehicle, seats: &str) -> bool {
    if seats.is_empty() {
        return true;
    }
    let patterns = [
        format!("{seats} seats"),
        format!("{seats}-seater"),
        format!("seats {seats}"),
        format!("{seats} seat"),
    ]
    .map(|p| p.to_lowercase());

    vehicle.features.iter().any(|feature| {
        let feature = feature.to_lowercase();
        patterns.iter().any(|p| feature.contains(p.as_str()))
    })
}

// Fuel type is intentionally not part of the searchable text
fn search_matches(vehicle: &Vehicle, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    vehicle.make.to_lowercase().contains(&query)
        || vehicle.model.to_lowercase().contains(&query)
        || vehicle.description.to_lowercase().contains(&query)
        || vehicle.features.iter().any(|f| f.to_lowercase().contains(&query))
}

impl FilterCriteria {
    /// Number of criteria that narrow the result, for the "N filters" badge.
    pub fn active_count(&self) -> usize {
        let (min, max) = self.price_range;
        let (full_min, full_max) = Self::FULL_PRICE_RANGE;
        [
            !self.make.is_empty(),
            min > full_min || max < full_max,
            !self.fuel_type.is_empty(),
            !self.seating_capacity.is_empty(),
            !self.search_query.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// 1-based page selection over an already filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn new(number: Option<usize>, size: Option<usize>, default_size: usize) -> Self {
        Self {
            number: number.unwrap_or(1).max(1),
            size: size.unwrap_or(default_size).max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size)
    }
}

pub fn paginate<T>(items: &[T], page: Page) -> &[T] {
    let start = (page.number - 1).saturating_mul(page.size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page.size).min(items.len());
    &items[start..end]
}
