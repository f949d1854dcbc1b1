// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, ChatMessage, ChatRole, ClinicalMeasurements, DietPreference, HealthEntry,
    HealthProfile, Hospital, Meal, MealPlan, MealType, NearbyHospital,
};
pub use requests::{
    ChatRequest, GenerateMealPlanRequest, HealthEntryRequest, ListQuery, MealCompletionRequest,
    NearbyHospitalsQuery, UpsertProfileRequest,
};
pub use responses::{
    ChatHistoryResponse, ChatResponse, DashboardResponse, ErrorResponse, HealthEntriesResponse,
    HealthResponse, HealthScoreResponse, MealPlanResponse, NearbyHospitalsResponse,
    ProfileSummary,
};
