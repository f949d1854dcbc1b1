use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::core::meal_plan::MEAL_PLAN_SYSTEM_PROMPT;
use crate::core::{build_meal_plan_prompt, parse_meal_plan, score_breakdown};
use crate::error::ApiError;
use crate::models::{
    GenerateMealPlanRequest, MealCompletionRequest, MealPlan, MealPlanResponse, MealType,
};
use crate::routes::profile::load_profile;
use crate::routes::AppState;
use crate::services::{CacheKey, Content, ResponseFormat};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/meal-plans/generate", web::post().to(generate_plan))
        .route("/meal-plans/today", web::get().to(today_plan))
        .route(
            "/meal-plans/{plan_id}/meals/{meal_type}",
            web::put().to(set_meal_completion),
        );
}

/// Load a user's plan for a date, L1/L2 cache first.
/// Cache failures are logged and fall through to the database.
pub(crate) async fn load_plan_for_date(
    state: &AppState,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<MealPlan>, ApiError> {
    let key = CacheKey::meal_plan(user_id, date);
    if let Ok(plan) = state.cache.get::<MealPlan>(&key).await {
        return Ok(Some(plan));
    }

    let plan = state.postgres.get_meal_plan_for_date(user_id, date).await?;
    if let Some(plan) = &plan {
        if let Err(e) = state.cache.set(&key, plan).await {
            tracing::warn!("Failed to cache meal plan for {}: {}", user_id, e);
        }
    }

    Ok(plan)
}

async fn invalidate_plan(state: &AppState, user_id: &str, date: NaiveDate) {
    if let Err(e) = state.cache.delete(&CacheKey::meal_plan(user_id, date)).await {
        tracing::warn!("Failed to invalidate meal plan cache for {}: {}", user_id, e);
    }
}

/// Generate and store today's meal plan, replacing any existing one
///
/// POST /api/v1/meal-plans/generate
///
/// Request body (optional):
/// ```json
/// { "notes": "no spicy food today" }
/// ```
async fn generate_plan(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let req = parse_generate_request(&body)?;
    req.validate()?;

    let profile = load_profile(&state, &user.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Create a health profile before generating a meal plan".to_string())
        })?;

    let breakdown = state
        .postgres
        .latest_health_entry(&user.user_id)
        .await?
        .map(|entry| score_breakdown(&entry.measurements));

    let today = Utc::now().date_naive();
    let prompt = build_meal_plan_prompt(&profile, breakdown.as_ref(), req.notes.as_deref(), today);

    let text = state
        .meal_model
        .generate(
            MEAL_PLAN_SYSTEM_PROMPT,
            &[Content::user(prompt)],
            ResponseFormat::Json,
        )
        .await?;

    let generated = parse_meal_plan(&text)?;

    let plan = MealPlan {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        plan_date: today,
        meals: generated.meals,
        tips: generated.tips,
        completed: Vec::new(),
        created_at: Utc::now(),
    };

    state.postgres.replace_meal_plan(&plan).await?;
    invalidate_plan(&state, &plan.user_id, today).await;

    tracing::info!(
        "Generated meal plan {} for {} with {} meals",
        plan.id,
        plan.user_id,
        plan.meals.len()
    );

    Ok(HttpResponse::Created().json(MealPlanResponse::from(plan)))
}

/// An empty body means no extra guidance; anything else must be a valid
/// request document
fn parse_generate_request(body: &[u8]) -> Result<GenerateMealPlanRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateMealPlanRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("Invalid JSON: {}", e)))
}

/// GET /api/v1/meal-plans/today
async fn today_plan(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let plan = load_plan_for_date(&state, &user.user_id, Utc::now().date_naive())
        .await?
        .ok_or_else(|| ApiError::NotFound("No meal plan for today".to_string()))?;

    Ok(HttpResponse::Ok().json(MealPlanResponse::from(plan)))
}

/// Mark one meal of a plan completed or not completed
///
/// PUT /api/v1/meal-plans/{plan_id}/meals/{meal_type}
///
/// Request body:
/// ```json
/// { "completed": true }
/// ```
async fn set_meal_completion(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(Uuid, String)>,
    req: web::Json<MealCompletionRequest>,
) -> Result<HttpResponse, ApiError> {
    let (plan_id, meal_type) = path.into_inner();
    let meal_type = MealType::parse(&meal_type)
        .ok_or_else(|| ApiError::Validation(format!("Unknown meal type: {}", meal_type)))?;

    let plan = state
        .postgres
        .get_meal_plan(&user.user_id, plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Meal plan {} not found", plan_id)))?;

    if !plan.meals.iter().any(|m| m.meal_type == meal_type) {
        return Err(ApiError::NotFound(format!(
            "Meal plan {} has no {}",
            plan_id,
            meal_type.as_str()
        )));
    }

    state
        .postgres
        .set_meal_completed(plan_id, meal_type, req.completed)
        .await?;
    invalidate_plan(&state, &user.user_id, plan.plan_date).await;

    let mut plan = plan;
    plan.completed.retain(|m| *m != meal_type);
    if req.completed {
        plan.completed.push(meal_type);
        plan.completed.sort();
    }

    Ok(HttpResponse::Ok().json(MealPlanResponse::from(plan)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_defaults() {
        assert!(parse_generate_request(b"").unwrap().notes.is_none());
        assert!(parse_generate_request(b"  \n").unwrap().notes.is_none());
    }

    #[test]
    fn test_body_is_parsed_strictly() {
        let req = parse_generate_request(br#"{"notes": "no spicy food"}"#).unwrap();
        assert_eq!(req.notes.as_deref(), Some("no spicy food"));

        assert!(matches!(
            parse_generate_request(br#"{"notes": 5}"#),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_generate_request(b"{not json"),
            Err(ApiError::Validation(_))
        ));
    }
}
