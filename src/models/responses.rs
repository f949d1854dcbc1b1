use serde::{Deserialize, Serialize};

use crate::core::health_score::HealthScoreBreakdown;
use crate::core::pregnancy::Trimester;
use crate::models::domain::{ChatMessage, HealthEntry, MealPlan, NearbyHospital};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for the score preview and entry endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResponse {
    pub score: u8,
    pub breakdown: HealthScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<HealthEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntriesResponse {
    pub entries: Vec<HealthEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyHospitalsResponse {
    pub hospitals: Vec<NearbyHospital>,
    pub total_results: usize,
    pub radius_km: f64,
}

/// A meal plan with its completion progress
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    #[serde(flatten)]
    pub plan: MealPlan,
    pub progress: u8,
}

impl From<MealPlan> for MealPlanResponse {
    fn from(plan: MealPlan) -> Self {
        let progress = crate::core::meal_plan::completion_progress(&plan);
        Self { plan, progress }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: String,
    pub pregnancy_week: Option<u8>,
    pub trimester: Option<Trimester>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub profile: Option<ProfileSummary>,
    pub latest_entry: Option<HealthEntry>,
    pub breakdown: Option<HealthScoreBreakdown>,
    pub meal_plan: Option<MealPlanResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    /// False when the message was refused as off-topic
    pub on_topic: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
    pub count: usize,
}
