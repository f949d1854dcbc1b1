// Core algorithm exports
pub mod chat_guard;
pub mod distance;
pub mod health_score;
pub mod locator;
pub mod meal_plan;
pub mod pregnancy;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box};
pub use health_score::{compute_health_score, score_breakdown, HealthScoreBreakdown, Metric, MetricStatus};
pub use locator::{CatalogError, HospitalLocator};
pub use meal_plan::{build_meal_plan_prompt, completion_progress, parse_meal_plan, MealPlanError};
pub use pregnancy::Trimester;
