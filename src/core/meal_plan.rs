use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::core::health_score::{HealthScoreBreakdown, MetricStatus};
use crate::core::pregnancy::{current_week, Trimester};
use crate::models::{HealthProfile, Meal, MealPlan};

/// Errors raised while turning model output into a meal plan
#[derive(Debug, Error)]
pub enum MealPlanError {
    #[error("No JSON object found in model output")]
    MissingJson,

    #[error("Malformed meal plan JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Meal plan contains no meals")]
    Empty,
}

/// Meals and tips as returned by the model, before they are stored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedMealPlan {
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// System instruction sent with every meal plan request
pub const MEAL_PLAN_SYSTEM_PROMPT: &str = "You are a nutrition assistant for pregnant women. \
You design practical one-day Indian home-cooking meal plans that follow antenatal nutrition \
guidance. Never recommend alcohol, raw or undercooked animal products, unpasteurised dairy \
or high-mercury fish. Respond with JSON only.";

/// Build the user prompt for a one-day meal plan.
///
/// The prompt carries the pregnancy stage, diet, allergies, conditions and
/// every metric outside its normal band so the model can compensate.
pub fn build_meal_plan_prompt(
    profile: &HealthProfile,
    breakdown: Option<&HealthScoreBreakdown>,
    notes: Option<&str>,
    today: NaiveDate,
) -> String {
    let mut lines = Vec::new();

    match current_week(profile, today) {
        Some(week) => lines.push(format!(
            "The mother is {} years old, in week {} of pregnancy ({}).",
            profile.age,
            week,
            Trimester::from_week(week).label()
        )),
        None => lines.push(format!(
            "The mother is {} years old; pregnancy week is unknown.",
            profile.age
        )),
    }

    lines.push(format!("Diet: {}.", profile.diet.label()));

    if !profile.allergies.is_empty() {
        lines.push(format!(
            "Strictly avoid these allergens: {}.",
            profile.allergies.join(", ")
        ));
    }
    if !profile.conditions.is_empty() {
        lines.push(format!(
            "Existing conditions: {}.",
            profile.conditions.join(", ")
        ));
    }

    if let Some(breakdown) = breakdown {
        lines.push(format!("Latest health score: {}/100.", breakdown.score));
        for m in breakdown.flagged() {
            let direction = match m.status {
                MetricStatus::SlightlyLow => "slightly low",
                MetricStatus::SlightlyHigh => "slightly high",
                _ => "outside the healthy range",
            };
            lines.push(format!("- {} is {} ({}).", m.metric.label(), direction, m.value));
        }
    }

    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("Additional request: {}.", notes));
    }

    lines.push(
        "Return a JSON object {\"meals\": [{\"mealType\", \"name\", \"description\", \
         \"calories\", \"nutrients\"}], \"tips\": [string]} with exactly one meal for each \
         mealType in: breakfast, midMorningSnack, lunch, eveningSnack, dinner."
            .to_string(),
    );

    lines.join("\n")
}

/// Extract the JSON object from model output, tolerating Markdown code
/// fences and surrounding prose.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse model output into a meal plan.
///
/// Duplicate meal types keep the first occurrence; meals come back ordered
/// breakfast through dinner.
pub fn parse_meal_plan(text: &str) -> Result<GeneratedMealPlan, MealPlanError> {
    let json = extract_json_object(text).ok_or(MealPlanError::MissingJson)?;
    let mut plan: GeneratedMealPlan = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    plan.meals.retain(|meal| seen.insert(meal.meal_type));
    plan.meals.sort_by_key(|meal| meal.meal_type);
    plan.tips.retain(|tip| !tip.trim().is_empty());

    if plan.meals.is_empty() {
        return Err(MealPlanError::Empty);
    }

    Ok(plan)
}

/// Percentage of the plan's meals marked completed, rounded
pub fn completion_progress(plan: &MealPlan) -> u8 {
    if plan.meals.is_empty() {
        return 0;
    }

    let done = plan
        .meals
        .iter()
        .filter(|meal| plan.completed.contains(&meal.meal_type))
        .count();

    ((done as f64 / plan.meals.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::health_score::score_breakdown;
    use crate::models::{ClinicalMeasurements, DietPreference, MealType};
    use chrono::Utc;

    fn profile() -> HealthProfile {
        HealthProfile {
            user_id: "u1".to_string(),
            name: "Asha".to_string(),
            age: 28,
            pregnancy_week: Some(20),
            due_date: None,
            height_cm: Some(160.0),
            weight_kg: Some(58.0),
            diet: DietPreference::Vegetarian,
            allergies: vec!["peanuts".to_string()],
            conditions: vec![],
            updated_at: Utc::now(),
        }
    }

    fn meal(meal_type: MealType, name: &str) -> Meal {
        Meal {
            meal_type,
            name: name.to_string(),
            description: String::new(),
            calories: None,
            nutrients: vec![],
        }
    }

    #[test]
    fn test_prompt_mentions_profile_and_flags() {
        let breakdown = score_breakdown(&ClinicalMeasurements {
            hemoglobin: Some(10.5),
            sleep_hours: Some(8.0),
            ..Default::default()
        });
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let prompt = build_meal_plan_prompt(&profile(), Some(&breakdown), Some("less oil"), today);

        assert!(prompt.contains("week 20"));
        assert!(prompt.contains("second trimester"));
        assert!(prompt.contains("peanuts"));
        assert!(prompt.contains("hemoglobin (g/dL) is slightly low"));
        assert!(!prompt.contains("sleep (hours/night) is"));
        assert!(prompt.contains("less oil"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Here is your plan:\n```json\n{\"meals\": [\
            {\"mealType\": \"dinner\", \"name\": \"Khichdi\", \"calories\": 450},\
            {\"mealType\": \"breakfast\", \"name\": \"Poha\", \"nutrients\": [\"iron\"]}\
            ], \"tips\": [\"Drink water\", \" \"]}\n```";

        let plan = parse_meal_plan(text).unwrap();

        assert_eq!(plan.meals.len(), 2);
        assert_eq!(plan.meals[0].meal_type, MealType::Breakfast);
        assert_eq!(plan.meals[1].calories, Some(450));
        assert_eq!(plan.tips, vec!["Drink water"]);
    }

    #[test]
    fn test_parse_keeps_first_duplicate() {
        let text = r#"{"meals": [
            {"mealType": "lunch", "name": "Dal rice"},
            {"mealType": "lunch", "name": "Roti sabzi"}
        ]}"#;

        let plan = parse_meal_plan(text).unwrap();
        assert_eq!(plan.meals.len(), 1);
        assert_eq!(plan.meals[0].name, "Dal rice");
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(parse_meal_plan(r#"{"meals": []}"#), Err(MealPlanError::Empty)));
        assert!(matches!(parse_meal_plan("no json here"), Err(MealPlanError::MissingJson)));
        assert!(matches!(parse_meal_plan("{not json}"), Err(MealPlanError::Malformed(_))));
    }

    #[test]
    fn test_completion_progress() {
        let mut plan = MealPlan {
            id: uuid::Uuid::new_v4(),
            user_id: "u1".to_string(),
            plan_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            meals: vec![
                meal(MealType::Breakfast, "Poha"),
                meal(MealType::Lunch, "Dal"),
                meal(MealType::Dinner, "Khichdi"),
            ],
            tips: vec![],
            completed: vec![],
            created_at: Utc::now(),
        };

        assert_eq!(completion_progress(&plan), 0);
        plan.completed = vec![MealType::Breakfast];
        assert_eq!(completion_progress(&plan), 33);
        plan.completed = vec![MealType::Breakfast, MealType::Lunch];
        assert_eq!(completion_progress(&plan), 67);

        plan.meals.clear();
        assert_eq!(completion_progress(&plan), 0);
    }
}
