use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::core::pregnancy::{current_week, Trimester};
use crate::core::score_breakdown;
use crate::error::ApiError;
use crate::models::{
    DashboardResponse, HealthEntriesResponse, HealthEntry, HealthEntryRequest, HealthScoreResponse,
    ListQuery, ProfileSummary,
};
use crate::routes::meal_plans::load_plan_for_date;
use crate::routes::profile::load_profile;
use crate::routes::AppState;

const MAX_LIST_LIMIT: u16 = 100;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health-score", web::post().to(preview_score))
        .route("/health-entries", web::post().to(create_entry))
        .route("/health-entries", web::get().to(list_entries))
        .route("/dashboard", web::get().to(dashboard));
}

/// Score a measurement set without storing it
///
/// POST /api/v1/health-score
async fn preview_score(
    _user: AuthenticatedUser,
    req: web::Json<HealthEntryRequest>,
) -> Result<HttpResponse, ApiError> {
    req.measurements.validate()?;

    let breakdown = score_breakdown(&req.measurements);

    Ok(HttpResponse::Ok().json(HealthScoreResponse {
        score: breakdown.score,
        breakdown,
        entry: None,
    }))
}

/// Validate, score and store a measurement set
///
/// POST /api/v1/health-entries
///
/// Request body:
/// ```json
/// {
///   "entryDate": "2026-03-01",
///   "hemoglobin": 11.5,
///   "bloodSugar": 92,
///   "sleepHours": 7.5
/// }
/// ```
async fn create_entry(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<HealthEntryRequest>,
) -> Result<HttpResponse, ApiError> {
    req.measurements.validate()?;

    let breakdown = score_breakdown(&req.measurements);
    let now = Utc::now();

    let entry = HealthEntry {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        entry_date: req.entry_date.unwrap_or_else(|| now.date_naive()),
        measurements: req.measurements,
        score: breakdown.score,
        created_at: now,
    };

    state.postgres.insert_health_entry(&entry).await?;

    tracing::info!(
        "Stored health entry {} for {} with score {}",
        entry.id,
        entry.user_id,
        entry.score
    );

    Ok(HttpResponse::Created().json(HealthScoreResponse {
        score: breakdown.score,
        breakdown,
        entry: Some(entry),
    }))
}

/// List the caller's entries, newest first
///
/// GET /api/v1/health-entries?limit=30
async fn list_entries(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.clamp(1, MAX_LIST_LIMIT) as usize;

    let entries = state
        .postgres
        .list_health_entries(&user.user_id, limit)
        .await?;

    Ok(HttpResponse::Ok().json(HealthEntriesResponse {
        count: entries.len(),
        entries,
    }))
}

/// Profile summary, latest score with its breakdown, and today's meal plan
///
/// GET /api/v1/dashboard
async fn dashboard(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let today = Utc::now().date_naive();

    let profile = load_profile(&state, &user.user_id).await?.map(|p| {
        let pregnancy_week = current_week(&p, today);
        ProfileSummary {
            name: p.name,
            pregnancy_week,
            trimester: pregnancy_week.map(Trimester::from_week),
        }
    });

    let latest_entry = state.postgres.latest_health_entry(&user.user_id).await?;
    let breakdown = latest_entry
        .as_ref()
        .map(|entry| score_breakdown(&entry.measurements));

    let meal_plan = load_plan_for_date(&state, &user.user_id, today)
        .await?
        .map(Into::into);

    Ok(HttpResponse::Ok().json(DashboardResponse {
        profile,
        latest_entry,
        breakdown,
        meal_plan,
    }))
}
