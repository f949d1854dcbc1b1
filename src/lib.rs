//! Matri Health - maternal health API
//!
//! Scores clinical measurements into a 0-100 wellness score, finds
//! hospitals near a point, generates daily meal plans and answers
//! pregnancy questions through a topic-restricted assistant.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use core::{
    compute_health_score, haversine_distance, score_breakdown, HealthScoreBreakdown,
    HospitalLocator,
};
pub use models::{ClinicalMeasurements, Hospital, NearbyHospital};
