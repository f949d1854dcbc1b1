use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub gemini: GeminiSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub hospitals: HospitalSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub meal_plan: MealPlanSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Optional; without it only the in-process cache is used
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_model() -> String { "gemini-1.5-flash".to_string() }
fn default_gemini_timeout() -> u64 { 30 }
fn default_temperature() -> f32 { 0.7 }
fn default_max_output_tokens() -> u32 { 2048 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// No default; must come from JWT_SECRET or local configuration
    pub jwt_secret: String,
    pub issuer: Option<String>,
}

/// Placeholder secrets that must never be used to verify tokens
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "changeme", "secret"];

impl AuthSettings {
    /// Reject an empty or placeholder signing secret
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.jwt_secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret is empty; set JWT_SECRET".to_string(),
            ));
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| secret.eq_ignore_ascii_case(p))
        {
            return Err(ConfigError::Message(
                "auth.jwt_secret is a placeholder value; set JWT_SECRET".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HospitalSettings {
    /// TOML catalog; the built-in catalog is used when unset
    pub catalog_path: Option<String>,
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,
}

impl Default for HospitalSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_radius_km: default_radius_km(),
            max_radius_km: default_max_radius_km(),
        }
    }
}

fn default_radius_km() -> f64 { 10.0 }
fn default_max_radius_km() -> f64 { 200.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_history_limit() -> usize { 10 }
fn default_max_message_chars() -> usize { 1000 }

/// Generation settings for meal plans; lower temperature than chat keeps
/// the JSON output stable
#[derive(Debug, Clone, Deserialize)]
pub struct MealPlanSettings {
    #[serde(default = "default_meal_plan_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for MealPlanSettings {
    fn default() -> Self {
        Self {
            temperature: default_meal_plan_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_meal_plan_temperature() -> f32 { 0.4 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATRI_)
    ///
    /// Fails when the JWT signing secret is missing or a placeholder.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATRI__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MATRI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::checked(substitute_env_vars(settings)?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MATRI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::checked(substitute_env_vars(settings)?)
    }

    fn checked(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.auth.validate()?;
        Ok(settings)
    }
}

/// Apply well-known secret variables (DATABASE_URL, GEMINI_API_KEY,
/// JWT_SECRET) on top of the loaded configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("DATABASE_URL", "database.url"),
        ("GEMINI_API_KEY", "gemini.api_key"),
        ("JWT_SECRET", "auth.jwt_secret"),
        ("REDIS_URL", "cache.redis_url"),
    ] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_section_defaults() {
        let hospitals = HospitalSettings::default();
        assert_eq!(hospitals.default_radius_km, 10.0);
        assert_eq!(hospitals.max_radius_km, 200.0);
        assert!(hospitals.catalog_path.is_none());

        let chat = ChatSettings::default();
        assert_eq!(chat.history_limit, 10);
        assert_eq!(chat.max_message_chars, 1000);

        let meal_plan = MealPlanSettings::default();
        assert_eq!(meal_plan.temperature, 0.4);
        assert_eq!(meal_plan.max_output_tokens, 2048);
    }

    #[test]
    fn test_minimal_toml_deserializes() {
        let source = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/matri"

            [gemini]
            api_key = "k"

            [auth]
            jwt_secret = "s"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.gemini.model, "gemini-1.5-flash");
        assert!(settings.cache.redis_url.is_none());
        assert_eq!(settings.chat.history_limit, 10);
    }

    fn auth(secret: &str) -> AuthSettings {
        AuthSettings {
            jwt_secret: secret.to_string(),
            issuer: None,
        }
    }

    #[test]
    fn test_jwt_secret_must_be_set() {
        assert!(auth("").validate().is_err());
        assert!(auth("   ").validate().is_err());
        assert!(auth("change-me").validate().is_err());
        assert!(auth("CHANGE-ME").validate().is_err());
        assert!(auth("k3n9-2f8d-a7c1-e5b4").validate().is_ok());
    }

    #[test]
    fn test_placeholder_secret_fails_loading() {
        let source = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/matri"

            [gemini]
            api_key = "k"

            [auth]
            jwt_secret = "change-me"
        "#;

        let config = Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap();
        assert!(Settings::checked(config).is_err());
    }

    #[test]
    fn test_shipped_defaults_carry_no_secret() {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .build()
            .unwrap();
        assert!(config.get_string("auth.jwt_secret").is_err());
    }
}
