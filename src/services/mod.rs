// Service exports
pub mod cache;
pub mod gemini;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use gemini::{Content, GeminiClient, GeminiError, ResponseFormat};
pub use postgres::{PostgresClient, PostgresError};
