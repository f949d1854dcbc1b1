// Route exports
pub mod chat;
pub mod health;
pub mod health_entries;
pub mod hospitals;
pub mod meal_plans;
pub mod profile;

use actix_web::web;
use std::sync::Arc;

use crate::config::{ChatSettings, HospitalSettings};
use crate::core::HospitalLocator;
use crate::services::{CacheManager, GeminiClient, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    /// Generation client tuned for chat replies
    pub chat_model: Arc<GeminiClient>,
    /// Generation client tuned for JSON meal plans
    pub meal_model: Arc<GeminiClient>,
    pub locator: Arc<HospitalLocator>,
    pub hospitals: HospitalSettings,
    pub chat: ChatSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(profile::configure)
            .configure(health_entries::configure)
            .configure(meal_plans::configure)
            .configure(hospitals::configure)
            .configure(chat::configure),
    );
}
