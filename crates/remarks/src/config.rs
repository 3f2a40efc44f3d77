use std::{env, time::Duration};

use remarks_core::comment::Biz;
use remarks_core::storage::CountStrategy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Count cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of count cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "remarks.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// How comment counts are computed (default: materialized)
    pub count_strategy: CountStrategy,
    /// Deadline of a detached cache backfill in milliseconds (default: 1,000)
    pub backfill_timeout_ms: u64,
    /// Deadline of a detached feed event emission in milliseconds (default: 2,000)
    pub event_timeout_ms: u64,
    /// Maximum detached jobs in flight (default: 256)
    pub background_max_inflight: usize,
    /// Largest page returned by list operations (default: 50)
    pub max_page_size: i64,
    /// Start with reply previews disabled (default: false)
    pub degraded_mode: bool,
    /// Owner service base URL for answers
    pub answer_owner_url: Option<String>,
    /// Owner service base URL for evaluations
    pub evaluation_owner_url: Option<String>,
    /// Owner service base URL for questions
    pub question_owner_url: Option<String>,
    /// Owner lookup request timeout in milliseconds (default: 2,000)
    pub owner_lookup_timeout_ms: u64,
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Count cache TTL in seconds (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "remarks.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `COUNT_STRATEGY` - `materialized` or `row_count` (default: materialized)
    /// - `BACKFILL_TIMEOUT_MS` - Cache backfill deadline (default: 1,000)
    /// - `EVENT_TIMEOUT_MS` - Feed event deadline (default: 2,000)
    /// - `BACKGROUND_MAX_INFLIGHT` - Detached job bound (default: 256)
    /// - `MAX_PAGE_SIZE` - List page size ceiling (default: 50)
    /// - `DEGRADED_MODE` - Skip reply previews (default: false)
    /// - `ANSWER_OWNER_URL`, `EVALUATION_OWNER_URL`, `QUESTION_OWNER_URL` -
    ///   owner services; a business type is accepted only when its URL is set
    /// - `OWNER_LOOKUP_TIMEOUT_MS` - Owner lookup timeout (default: 2,000)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 600),
            cache_max_entries: parse_or("CACHE_MAX_ENTRIES", 10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "remarks.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            count_strategy: parse_or("COUNT_STRATEGY", CountStrategy::default()),
            backfill_timeout_ms: parse_or("BACKFILL_TIMEOUT_MS", 1_000),
            event_timeout_ms: parse_or("EVENT_TIMEOUT_MS", 2_000),
            background_max_inflight: parse_or("BACKGROUND_MAX_INFLIGHT", 256),
            max_page_size: parse_or("MAX_PAGE_SIZE", 50),
            degraded_mode: parse_or("DEGRADED_MODE", false),
            answer_owner_url: optional("ANSWER_OWNER_URL"),
            evaluation_owner_url: optional("EVALUATION_OWNER_URL"),
            question_owner_url: optional("QUESTION_OWNER_URL"),
            owner_lookup_timeout_ms: parse_or("OWNER_LOOKUP_TIMEOUT_MS", 2_000),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn backfill_timeout(&self) -> Duration {
        Duration::from_millis(self.backfill_timeout_ms)
    }

    pub fn event_timeout(&self) -> Duration {
        Duration::from_millis(self.event_timeout_ms)
    }

    pub fn owner_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.owner_lookup_timeout_ms)
    }

    /// Owner service URLs of the configured business types.
    pub fn owner_urls(&self) -> Vec<(Biz, &str)> {
        [
            (Biz::Evaluation, &self.evaluation_owner_url),
            (Biz::Answer, &self.answer_owner_url),
            (Biz::Question, &self.question_owner_url),
        ]
        .into_iter()
        .filter_map(|(biz, url)| url.as_deref().map(|url| (biz, url)))
        .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
