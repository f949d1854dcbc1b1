use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One set of clinical readings for a user at a point in time.
///
/// Every field is optional. A missing key means "not measured" and is kept
/// distinct from a present value of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalMeasurements {
    /// g/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 30.0))]
    pub hemoglobin: Option<f64>,
    /// mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub blood_sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub bmi: Option<f64>,
    /// ng/mL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 500.0))]
    pub vitamin_d: Option<f64>,
    /// mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 30.0))]
    pub calcium: Option<f64>,
    /// Serum ferritin, ng/mL
    #[serde(default, alias = "serumFerritin", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 5000.0))]
    pub ferritin: Option<f64>,
    /// Liters per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 20.0))]
    pub water_intake: Option<f64>,
    /// Hours per night
    #[serde(default, alias = "sleep", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: Option<f64>,
}

/// A scored measurement set as persisted. Never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    pub id: Uuid,
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub measurements: ClinicalMeasurements,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DietPreference {
    #[default]
    Vegetarian,
    Eggetarian,
    NonVegetarian,
    Vegan,
}

impl DietPreference {
    pub fn label(&self) -> &'static str {
        match self {
            DietPreference::Vegetarian => "vegetarian",
            DietPreference::Eggetarian => "vegetarian plus eggs",
            DietPreference::NonVegetarian => "non-vegetarian",
            DietPreference::Vegan => "vegan",
        }
    }
}

/// User health profile, stored as a single document per user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    pub user_id: String,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub pregnancy_week: Option<u8>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub height_cm: Option<f32>,
    #[serde(default)]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub diet: DietPreference,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Static hospital reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f32,
}

impl Hospital {
    /// Case-insensitive specialty tag match
    pub fn offers(&self, specialty: &str) -> bool {
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(specialty.trim()))
    }
}

/// A hospital annotated with its distance from a query point
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyHospital {
    #[serde(flatten)]
    pub hospital: Hospital,
    #[serde(rename = "distance", serialize_with = "serialize_km")]
    pub distance_km: f64,
}

fn serialize_km<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealType {
    Breakfast,
    MidMorningSnack,
    Lunch,
    EveningSnack,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::MidMorningSnack,
        MealType::Lunch,
        MealType::EveningSnack,
        MealType::Dinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MidMorningSnack => "midMorningSnack",
            MealType::Lunch => "lunch",
            MealType::EveningSnack => "eveningSnack",
            MealType::Dinner => "dinner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(value))
    }
}

/// A single meal as produced by the generative model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub meal_type: MealType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub nutrients: Vec<String>,
}

/// A meal plan for one user and one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: String,
    pub plan_date: NaiveDate,
    pub meals: Vec<Meal>,
    pub tips: Vec<String>,
    pub completed: Vec<MealType>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
