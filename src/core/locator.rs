use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box};
use crate::models::{Hospital, NearbyHospital};

/// Catalog compiled into the binary, used when no catalog file is configured
const BUILTIN_CATALOG: &str = include_str!("../../config/hospitals.toml");

/// Errors that can occur while loading a hospital catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "hospital")]
    hospitals: Vec<Hospital>,
}

/// Radius-filtered, distance-sorted lookup over a fixed hospital catalog.
///
/// The catalog is handed over at construction and never changes afterwards,
/// so one locator can be shared across workers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HospitalLocator {
    catalog: Vec<Hospital>,
}

impl HospitalLocator {
    pub fn new(catalog: Vec<Hospital>) -> Self {
        Self { catalog }
    }

    /// Parse a TOML catalog made of `[[hospital]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;

        for hospital in &file.hospitals {
            if !(-90.0..=90.0).contains(&hospital.latitude)
                || !(-180.0..=180.0).contains(&hospital.longitude)
            {
                return Err(CatalogError::InvalidEntry(format!(
                    "{} has coordinates out of range ({}, {})",
                    hospital.id, hospital.latitude, hospital.longitude
                )));
            }
        }

        Ok(Self::new(file.hospitals))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The catalog shipped with the service
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.catalog
    }

    /// Every hospital within `radius_km` of the query point, nearest first.
    ///
    /// Equal distances keep catalog order. A negative or NaN radius matches
    /// nothing.
    pub fn nearby(&self, lat: f64, lng: f64, radius_km: f64) -> Vec<NearbyHospital> {
        if !(radius_km >= 0.0) {
            return Vec::new();
        }

        let bbox = calculate_bounding_box(lat, lng, radius_km);

        let mut results: Vec<NearbyHospital> = self
            .catalog
            .iter()
            // Stage 1: bounding box pre-filter, when one can be drawn
            .filter(|h| {
                bbox.as_ref()
                    .map_or(true, |b| is_within_bounding_box(h.latitude, h.longitude, b))
            })
            // Stage 2: exact great-circle check
            .filter_map(|h| {
                let distance_km = haversine_distance(lat, lng, h.latitude, h.longitude);
                (distance_km <= radius_km).then(|| NearbyHospital {
                    hospital: h.clone(),
                    distance_km,
                })
            })
            .collect();

        // Vec::sort_by is stable, so ties stay in catalog order
        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results
    }

    /// Exact identifier lookup
    pub fn find_by_id(&self, id: &str) -> Option<&Hospital> {
        self.catalog.iter().find(|h| h.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(id: &str, lat: f64, lng: f64) -> Hospital {
        Hospital {
            id: id.to_string(),
            name: format!("Hospital {}", id),
            address: "Ahmedabad".to_string(),
            phone: None,
            website: None,
            specialties: vec!["maternity".to_string()],
            latitude: lat,
            longitude: lng,
            rating: 4.0,
        }
    }

    #[test]
    fn test_exact_location_within_one_km() {
        let locator = HospitalLocator::new(vec![
            hospital("far", 23.0500, 72.6000),
            hospital("here", 23.0225, 72.5714),
        ]);

        let result = locator.nearby(23.0225, 72.5714, 1.0);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].hospital.id, "here");
        assert_eq!(result[0].distance_km, 0.0);
    }

    #[test]
    fn test_sorted_with_stable_ties() {
        let locator = HospitalLocator::new(vec![
            hospital("c", 23.10, 72.60),
            hospital("a1", 23.03, 72.58),
            hospital("a2", 23.03, 72.58),
            hospital("b", 23.05, 72.58),
        ]);

        let ids: Vec<_> = locator
            .nearby(23.0225, 72.5714, 50.0)
            .into_iter()
            .map(|n| n.hospital.id)
            .collect();

        assert_eq!(ids, vec!["a1", "a2", "b", "c"]);
    }

    #[test]
    fn test_zero_radius_without_exact_match_is_empty() {
        let locator = HospitalLocator::new(vec![hospital("a", 23.03, 72.58)]);
        assert!(locator.nearby(23.0225, 72.5714, 0.0).is_empty());
    }

    #[test]
    fn test_negative_radius_is_empty() {
        let locator = HospitalLocator::new(vec![hospital("a", 23.0225, 72.5714)]);
        assert!(locator.nearby(23.0225, 72.5714, -1.0).is_empty());
        assert!(locator.nearby(23.0225, 72.5714, f64::NAN).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let locator = HospitalLocator::new(vec![]);
        assert!(locator.is_empty());
        assert!(locator.nearby(0.0, 0.0, 100.0).is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let locator = HospitalLocator::new(vec![hospital("a", 23.03, 72.58)]);
        assert_eq!(locator.find_by_id("a").map(|h| h.id.as_str()), Some("a"));
        assert!(locator.find_by_id("missing").is_none());
    }

    #[test]
    fn test_antimeridian_query_without_prefilter() {
        let locator = HospitalLocator::new(vec![hospital("fiji", -17.0, -179.99)]);
        let result = locator.nearby(-17.0, 179.99, 10.0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let locator = HospitalLocator::builtin().unwrap();
        assert!(!locator.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let source = r#"
            [[hospital]]
            id = "bad"
            name = "Bad"
            address = "Nowhere"
            latitude = 123.0
            longitude = 0.0
            rating = 1.0
        "#;
        assert!(matches!(
            HospitalLocator::from_toml_str(source),
            Err(CatalogError::InvalidEntry(_))
        ));
    }
}
