use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{NearbyHospitalsQuery, NearbyHospitalsResponse};
use crate::routes::AppState;

/// Hard cap on the number of hospitals returned by one nearby query
const MAX_RESULTS: usize = 100;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/hospitals/nearby", web::get().to(nearby_hospitals))
        .route("/hospitals/{id}", web::get().to(get_hospital));
}

/// Nearby hospitals endpoint
///
/// GET /api/v1/hospitals/nearby?lat=23.0225&lng=72.5714&radius=10&specialty=maternity&limit=5
///
/// Results are nearest first. `specialty` and `limit` are applied after
/// sorting, so a limited result is always the nearest subset.
async fn nearby_hospitals(
    state: web::Data<AppState>,
    query: web::Query<NearbyHospitalsQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let radius_km = query.radius.unwrap_or(state.hospitals.default_radius_km);
    if !(radius_km > 0.0 && radius_km <= state.hospitals.max_radius_km) {
        return Err(ApiError::Validation(format!(
            "radius must be greater than 0 and at most {} km",
            state.hospitals.max_radius_km
        )));
    }

    let limit = query
        .limit
        .map_or(MAX_RESULTS, |l| usize::from(l).min(MAX_RESULTS));

    let hospitals: Vec<_> = state
        .locator
        .nearby(query.lat, query.lng, radius_km)
        .into_iter()
        .filter(|h| {
            query
                .specialty
                .as_deref()
                .map_or(true, |s| s.trim().is_empty() || h.hospital.offers(s))
        })
        .take(limit)
        .collect();

    tracing::info!(
        "Nearby query ({:.4}, {:.4}) radius {} km: {} hospitals",
        query.lat,
        query.lng,
        radius_km,
        hospitals.len()
    );

    Ok(HttpResponse::Ok().json(NearbyHospitalsResponse {
        total_results: hospitals.len(),
        hospitals,
        radius_km,
    }))
}

/// Catalog lookup by id
///
/// GET /api/v1/hospitals/{id}
async fn get_hospital(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    state
        .locator
        .find_by_id(&id)
        .map(|hospital| HttpResponse::Ok().json(hospital))
        .ok_or_else(|| ApiError::NotFound(format!("Hospital {} not found", id)))
}
