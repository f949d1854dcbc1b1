use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use matri_health::auth::JwtVerifier;
use matri_health::config::Settings;
use matri_health::core::HospitalLocator;
use matri_health::error::{handle_json_payload_error, handle_query_payload_error};
use matri_health::routes::{self, AppState};
use matri_health::services::{CacheManager, GeminiClient, PostgresClient};
use matri_health::telemetry;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    telemetry::init(&settings.logging).map_err(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Starting Matri Health service...");

    // Hospital catalog
    let locator = match &settings.hospitals.catalog_path {
        Some(path) => HospitalLocator::from_file(path),
        None => HospitalLocator::builtin(),
    }
    .map_err(|e| startup_error("Failed to load hospital catalog", e))?;

    info!("Hospital catalog loaded ({} hospitals)", locator.len());

    // Cache: Redis is optional, L1 always runs
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(settings.cache.redis_url.as_deref(), l1_cache_size, cache_ttl).await {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to connect to Redis ({}), using in-process cache only", e);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
        l1_cache_size,
        cache_ttl,
        cache.has_redis()
    );

    // PostgreSQL
    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        Some(db_max_conn),
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    // Generative API clients share endpoint and key, differ in sampling
    let gemini = &settings.gemini;
    let timeout = Duration::from_secs(gemini.timeout_secs);
    let chat_model = GeminiClient::new(
        gemini.endpoint.clone(),
        gemini.api_key.clone(),
        gemini.model.clone(),
        timeout,
    )
    .map_err(|e| startup_error("Failed to build generative API client", e))?
    .with_generation(gemini.temperature, gemini.max_output_tokens);

    let meal_model = GeminiClient::new(
        gemini.endpoint.clone(),
        gemini.api_key.clone(),
        gemini.model.clone(),
        timeout,
    )
    .map_err(|e| startup_error("Failed to build generative API client", e))?
    .with_generation(settings.meal_plan.temperature, settings.meal_plan.max_output_tokens);

    if gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; meal plans and chat will return 503");
    } else {
        info!("Generative API client initialized (model: {})", chat_model.model());
    }

    let verifier = web::Data::new(JwtVerifier::new(
        &settings.auth.jwt_secret,
        settings.auth.issuer.as_deref(),
    ));

    // Build application state
    let app_state = AppState {
        postgres: Arc::new(postgres),
        cache: Arc::new(cache),
        chat_model: Arc::new(chat_model),
        meal_model: Arc::new(meal_model),
        locator: Arc::new(locator),
        hospitals: settings.hospitals.clone(),
        chat: settings.chat.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
