// Criterion benchmarks for Matri Health

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matri_health::core::{
    distance::{calculate_bounding_box, haversine_distance},
    health_score::compute_health_score,
    HospitalLocator,
};
use matri_health::models::{ClinicalMeasurements, Hospital};

fn create_hospital(id: usize, lat: f64, lon: f64) -> Hospital {
    Hospital {
        id: format!("hosp-{:05}", id),
        name: format!("Hospital {}", id),
        address: "Ahmedabad".to_string(),
        phone: None,
        website: None,
        specialties: vec!["maternity".to_string()],
        latitude: lat,
        longitude: lon,
        rating: 4.0,
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(23.0225),
                black_box(72.5714),
                black_box(23.0526),
                black_box(72.6032),
            )
        });
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(23.0225), black_box(72.5714), black_box(10.0)));
    });
}

fn bench_health_score(c: &mut Criterion) {
    let full = ClinicalMeasurements {
        hemoglobin: Some(10.5),
        blood_sugar: Some(95.0),
        bmi: Some(26.1),
        vitamin_d: Some(22.0),
        calcium: Some(9.1),
        ferritin: Some(12.0),
        water_intake: Some(2.2),
        sleep_hours: Some(6.5),
    };

    c.bench_function("health_score_all_metrics", |b| {
        b.iter(|| compute_health_score(black_box(&full)));
    });
}

fn bench_nearby(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearby");

    for catalog_size in [10, 100, 1000, 10000].iter() {
        let catalog: Vec<Hospital> = (0..*catalog_size)
            .map(|i| {
                let lat_offset = (i as f64 * 0.0007) % 1.0 - 0.5;
                let lon_offset = (i as f64 * 0.0013) % 1.0 - 0.5;
                create_hospital(i, 23.0225 + lat_offset, 72.5714 + lon_offset)
            })
            .collect();
        let locator = HospitalLocator::new(catalog);

        group.bench_with_input(
            BenchmarkId::new("radius_10km", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| locator.nearby(black_box(23.0225), black_box(72.5714), black_box(10.0)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_bounding_box,
    bench_health_score,
    bench_nearby
);
criterion_main!(benches);
