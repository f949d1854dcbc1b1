use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ClinicalMeasurements, DietPreference};

/// Request to create or replace the caller's health profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 12, max = 60))]
    pub age: u8,
    #[serde(default)]
    #[validate(range(min = 1, max = 42))]
    pub pregnancy_week: Option<u8>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 100.0, max = 250.0))]
    pub height_cm: Option<f32>,
    #[serde(default)]
    #[validate(range(min = 25.0, max = 250.0))]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub diet: DietPreference,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub allergies: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub conditions: Vec<String>,
}

impl UpsertProfileRequest {
    /// Trim the name and drop blank list items. Call before `validate` so a
    /// whitespace-only name is rejected.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.allergies = clean_list(self.allergies);
        self.conditions = clean_list(self.conditions);
        self
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Request to score, and optionally store, a measurement set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntryRequest {
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub measurements: ClinicalMeasurements,
}

/// Query for listing stored entries and chat history
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: u16,
}

fn default_list_limit() -> u16 {
    30
}

/// Query for the nearby hospitals endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyHospitalsQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Kilometers; falls back to the configured default
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to regenerate today's plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMealPlanRequest {
    /// Free-text extra guidance, e.g. "no spicy food today"
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request to change a meal's completion state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCompletionRequest {
    pub completed: bool,
}

/// Chat message from the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_request(json: serde_json::Value) -> UpsertProfileRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_blank_name_is_rejected_after_normalizing() {
        let req = profile_request(serde_json::json!({"name": "   ", "age": 28})).normalized();
        assert_eq!(req.name, "");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_normalized_trims_fields() {
        let req = profile_request(serde_json::json!({
            "name": "  Asha ",
            "age": 28,
            "allergies": [" peanuts ", "", "  ", "dairy"]
        }))
        .normalized();

        assert!(req.validate().is_ok());
        assert_eq!(req.name, "Asha");
        assert_eq!(req.allergies, vec!["peanuts", "dairy"]);
    }
}
