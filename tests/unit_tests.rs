// Unit tests for Matri Health

use matri_health::core::{
    distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box},
    health_score::{compute_health_score, score_breakdown, MetricStatus},
    HospitalLocator,
};
use matri_health::models::{ClinicalMeasurements, Hospital};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

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

/// Fold an arbitrary f64 into [-bound, bound]
fn bounded(value: f64, bound: f64) -> f64 {
    if value.is_finite() {
        value % bound
    } else {
        0.0
    }
}

#[test]
fn test_normal_hemoglobin_alone_scores_100() {
    let m = ClinicalMeasurements {
        hemoglobin: Some(12.0),
        ..Default::default()
    };
    assert_eq!(compute_health_score(&m), 100);

    for value in [11.0, 15.0] {
        let m = ClinicalMeasurements {
            hemoglobin: Some(value),
            ..Default::default()
        };
        assert_eq!(compute_health_score(&m), 100, "hemoglobin {}", value);
    }
}

#[test]
fn test_empty_set_scores_zero() {
    let m = ClinicalMeasurements::default();
    assert_eq!(compute_health_score(&m), 0);
    assert!(score_breakdown(&m).metrics.is_empty());
}

#[test]
fn test_mixed_measurements_score_47() {
    // 0.3 + 0.7 + 0.4 over three metrics
    let m = ClinicalMeasurements {
        hemoglobin: Some(9.0),
        blood_sugar: Some(65.0),
        bmi: Some(30.5),
        ..Default::default()
    };
    let breakdown = score_breakdown(&m);
    assert_eq!(breakdown.score, 47);

    let statuses: Vec<_> = breakdown.metrics.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            MetricStatus::OutOfRange,
            MetricStatus::SlightlyLow,
            MetricStatus::OutOfRange
        ]
    );
}

#[test]
fn test_present_zero_differs_from_absent() {
    let zero = ClinicalMeasurements {
        sleep_hours: Some(0.0),
        ..Default::default()
    };
    assert_eq!(compute_health_score(&zero), 40);
    assert_eq!(compute_health_score(&ClinicalMeasurements::default()), 0);
}

#[test]
fn test_json_key_order_does_not_matter() {
    let a: ClinicalMeasurements =
        serde_json::from_str(r#"{"hemoglobin": 10.5, "sleepHours": 8, "bmi": 26.0}"#).unwrap();
    let b: ClinicalMeasurements =
        serde_json::from_str(r#"{"bmi": 26.0, "hemoglobin": 10.5, "sleepHours": 8}"#).unwrap();

    assert_eq!(a, b);
    assert_eq!(compute_health_score(&a), compute_health_score(&b));
}

#[test]
fn test_measurement_aliases() {
    let m: ClinicalMeasurements =
        serde_json::from_str(r#"{"serumFerritin": 40, "sleep": 7.5}"#).unwrap();
    assert_eq!(m.ferritin, Some(40.0));
    assert_eq!(m.sleep_hours, Some(7.5));
}

#[quickcheck]
fn prop_score_within_bounds(values: Vec<f64>) -> bool {
    let v = |i: usize| values.get(i).map(|x| bounded(*x, 1000.0));
    let m = ClinicalMeasurements {
        hemoglobin: v(0),
        blood_sugar: v(1),
        bmi: v(2),
        vitamin_d: v(3),
        calcium: v(4),
        ferritin: v(5),
        water_intake: v(6),
        sleep_hours: v(7),
    };

    // Only an empty set can score 0
    let score = compute_health_score(&m);
    score <= 100 && values.is_empty() == (score == 0)
}

#[quickcheck]
fn prop_non_empty_score_is_at_least_30(value: f64) -> bool {
    // The lowest sub-score anywhere in the table is 0.3
    let m = ClinicalMeasurements {
        hemoglobin: Some(bounded(value, 1000.0)),
        ..Default::default()
    };
    compute_health_score(&m) >= 30
}

#[test]
fn test_distance_to_self_is_zero() {
    assert_eq!(haversine_distance(23.0225, 72.5714, 23.0225, 72.5714), 0.0);
    assert_eq!(haversine_distance(-33.86, 151.21, -33.86, 151.21), 0.0);
}

#[quickcheck]
fn prop_distance_is_symmetric(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> bool {
    let (lat1, lon1) = (bounded(lat1, 90.0), bounded(lon1, 180.0));
    let (lat2, lon2) = (bounded(lat2, 90.0), bounded(lon2, 180.0));

    let ab = haversine_distance(lat1, lon1, lat2, lon2);
    let ba = haversine_distance(lat2, lon2, lat1, lon1);
    (ab - ba).abs() < 1e-9
}

#[quickcheck]
fn prop_bounding_box_never_excludes_points_in_radius(
    lat: f64,
    lon: f64,
    dlat: f64,
    dlon: f64,
    radius: u16,
) -> TestResult {
    let (lat, lon) = (bounded(lat, 85.0), bounded(lon, 175.0));
    let (plat, plon) = (lat + bounded(dlat, 2.0), lon + bounded(dlon, 2.0));
    let radius_km = f64::from(radius % 300);

    let Some(bbox) = calculate_bounding_box(lat, lon, radius_km) else {
        return TestResult::discard();
    };

    if haversine_distance(lat, lon, plat, plon) <= radius_km {
        TestResult::from_bool(is_within_bounding_box(plat, plon, &bbox))
    } else {
        TestResult::passed()
    }
}

#[test]
fn test_bounding_box_around_ahmedabad() {
    let bbox = calculate_bounding_box(23.0225, 72.5714, 10.0).unwrap();

    assert!(bbox.min_lat < 23.0225 && bbox.max_lat > 23.0225);
    assert!(bbox.min_lon < 72.5714 && bbox.max_lon > 72.5714);

    // 10 km is roughly 0.18 degrees of latitude
    let lat_span = bbox.max_lat - bbox.min_lat;
    assert!((lat_span - 0.18).abs() < 0.01);
}

#[test]
fn test_radius_zero_without_exact_match_is_empty() {
    let locator = HospitalLocator::new(vec![hospital("a", 23.03, 72.58)]);
    assert!(locator.nearby(23.0225, 72.5714, 0.0).is_empty());
}

#[test]
fn test_exact_point_within_one_km() {
    let locator = HospitalLocator::new(vec![
        hospital("far", 23.05, 72.60),
        hospital("here", 23.0225, 72.5714),
    ]);

    let results = locator.nearby(23.0225, 72.5714, 1.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].hospital.id, "here");
    assert_eq!(results[0].distance_km, 0.0);

    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["distance"], 0.0);
    assert_eq!(json["id"], "here");
}

#[test]
fn test_nearby_is_sorted_and_within_radius() {
    let locator = HospitalLocator::builtin().unwrap();
    let results = locator.nearby(23.0225, 72.5714, 15.0);

    assert!(!results.is_empty());
    assert!(results.iter().all(|h| h.distance_km <= 15.0));
    assert!(results
        .windows(2)
        .all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn test_empty_catalog_returns_empty() {
    let locator = HospitalLocator::new(Vec::new());
    assert!(locator.nearby(23.0225, 72.5714, 50.0).is_empty());
    assert!(locator.find_by_id("hosp-001").is_none());
}
