use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.flickr.com/services/rest/";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub port: u16,
    pub throttle_ms: u64,
    pub safe_search: u8,
    pub per_page: Option<u32>,
    pub timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("SCROLL_API_KEY").unwrap_or_default();
        let api_base = env::var("SCROLL_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let port = env::var("SCROLL_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(9162);
        let throttle_ms = env::var("SCROLL_THROTTLE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(1000);
        let safe_search = env::var("SCROLL_SAFE_SEARCH").ok().and_then(|v| v.parse().ok()).unwrap_or(1);
        let per_page = env::var("SCROLL_PER_PAGE").ok().and_then(|v| v.parse().ok());
        let timeout_ms = env::var("SCROLL_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000);
        Self {
            api_key,
            api_base,
            port,
            throttle_ms,
            safe_search,
            per_page,
            timeout_ms,
        }
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
