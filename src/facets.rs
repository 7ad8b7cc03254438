// Distinct value sets used to populate filter choices, plus headline counts

use std::collections::BTreeSet;

use crate::models::{CatalogStats, Vehicle};

pub fn distinct_makes<V: AsRef<Vehicle>>(vehicles: &[V]) -> BTreeSet<String> {
    vehicles.iter().map(|v| v.as_ref().make.clone()).collect()
}

pub fn distinct_fuel_types<V: AsRef<Vehicle>>(vehicles: &[V]) -> BTreeSet<String> {
    vehicles.iter().map(|v| v.as_ref().fuel_type.clone()).collect()
}

// `under_budget` counts prices strictly below the threshold
pub fn catalog_stats<V: AsRef<Vehicle>>(vehicles: &[V], budget_threshold: f64) -> CatalogStats {
    CatalogStats {
        total: vehicles.len(),
        makes: distinct_makes(vehicles).len(),
        fuel_types: distinct_fuel_types(vehicles).len(),
        under_budget: vehicles.iter().filter(|v| v.as_ref().price < budget_threshold).count(),
        budget_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(make: &str, fuel_type: &str, price: f64) -> Vehicle {
        Vehicle { make: make.into(), fuel_type: fuel_type.into(), price, ..Vehicle::default() }
    }

    #[test]
    fn makes_collapse_by_value() {
        let vehicles = vec![
            vehicle("Honda", "Hybrid", 1.0),
            vehicle("Ford", "Gasoline", 1.0),
            vehicle("Honda", "Gasoline", 1.0),
        ];
        let makes: Vec<String> = distinct_makes(&vehicles).into_iter().collect();
        assert_eq!(makes, vec!["Ford", "Honda"]);
    }

    #[test]
    fn empty_catalog_has_no_facets() {
        let vehicles: Vec<Vehicle> = Vec::new();
        assert!(distinct_makes(&vehicles).is_empty());
        assert_eq!(catalog_stats(&vehicles, 30000.0).total, 0);
    }

    #[test]
    fn stats_count_budget_vehicles() {
        let vehicles = vec![
            vehicle("Honda", "Hybrid", 20000.0),
            vehicle("Ford", "Gasoline", 50000.0),
            vehicle("Tesla", "Electric", 30000.0),
        ];
        let stats = catalog_stats(&vehicles, 30000.0);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.makes, 3);
        assert_eq!(stats.fuel_types, 3);
        assert_eq!(stats.under_budget, 1);
    }
}
