use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::core::pregnancy::current_week;
use crate::error::ApiError;
use crate::models::{HealthProfile, UpsertProfileRequest};
use crate::routes::AppState;
use crate::services::CacheKey;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(upsert_profile));
}

/// Load a profile, L1/L2 cache first
pub(crate) async fn load_profile(
    state: &AppState,
    user_id: &str,
) -> Result<Option<HealthProfile>, ApiError> {
    let key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<HealthProfile>(&key).await {
        return Ok(Some(profile));
    }

    let profile = state.postgres.get_profile(user_id).await?;
    if let Some(profile) = &profile {
        if let Err(e) = state.cache.set(&key, profile).await {
            tracing::warn!("Failed to cache profile for {}: {}", user_id, e);
        }
    }

    Ok(profile)
}

/// GET /api/v1/profile
///
/// The returned pregnancy week is derived from the due date when one is set.
async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let mut profile = load_profile(&state, &user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No health profile yet".to_string()))?;

    profile.pregnancy_week = current_week(&profile, Utc::now().date_naive());

    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/v1/profile
async fn upsert_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpsertProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner().normalized();
    req.validate()?;

    let profile = HealthProfile {
        user_id: user.user_id,
        name: req.name,
        age: req.age,
        pregnancy_week: req.pregnancy_week,
        due_date: req.due_date,
        height_cm: req.height_cm,
        weight_kg: req.weight_kg,
        diet: req.diet,
        allergies: req.allergies,
        conditions: req.conditions,
        updated_at: Utc::now(),
    };

    state.postgres.upsert_profile(&profile).await?;

    if let Err(e) = state.cache.delete(&CacheKey::profile(&profile.user_id)).await {
        tracing::warn!("Failed to invalidate profile cache for {}: {}", profile.user_id, e);
    }

    tracing::info!("Profile saved for {}", profile.user_id);

    Ok(HttpResponse::Ok().json(profile))
}
