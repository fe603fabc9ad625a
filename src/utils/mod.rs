//! Utility functions module

use crate::error::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// HTTP client builder
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    connect_timeout: Duration,
    pool_max_idle_per_host: usize,
    user_agent: String,
    use_system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            user_agent: format!("ThaiFoodMCP/{}", crate::VERSION),
            use_system_proxy: true,
        }
    }
}

impl HttpClientBuilder {
    /// Create a new HTTP client builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[http]` config section
    #[must_use]
    pub fn from_config(config: &crate::config::HttpConfig) -> Self {
        Self {
            timeout: config.timeout_secs.map(Duration::from_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            pool_max_idle_per_host: config.pool_max_idle_per_host,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("ThaiFoodMCP/{}", crate::VERSION)),
            use_system_proxy: config.use_system_proxy,
        }
    }

    /// Set request timeout; `None` leaves it to the transport default
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set connection pool size
    #[must_use]
    pub fn pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Set User-Agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Honour `HTTP(S)_PROXY` environment variables
    #[must_use]
    pub fn use_system_proxy(mut self, enable: bool) -> Self {
        self.use_system_proxy = enable;
        self
    }

    /// Build HTTP client
    pub fn build(self) -> Result<Client> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        builder
            .build()
            .map_err(|e| Error::Initialization(format!("HTTP client: {e}")))
    }
}

/// String utilities
pub mod string {
    /// Human readable name for a snake_case key: `thai_curry` -> `Thai Curry`
    #[must_use]
    pub fn display_name(key: &str) -> String {
        key.split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case-insensitive substring test; `needle` must already be lowercased
    #[must_use]
    pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(needle)
    }

    /// Case-insensitive equality
    #[must_use]
    pub fn eq_ignore_case(a: &str, b: &str) -> bool {
        a.to_lowercase() == b.to_lowercase()
    }

    /// Check if string is empty or blank
    #[must_use]
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }
}

/// Request validation, applied by the tool layer before querying
pub mod validation {
    use crate::error::Error;

    /// Maximum accepted search query length
    pub const MAX_QUERY_LEN: usize = 200;

    /// Validate a required string parameter
    pub fn require(field: &str, value: &str) -> Result<(), Error> {
        if super::string::is_blank(value) {
            return Err(Error::Validation(format!("{field} 不能为空")));
        }
        Ok(())
    }

    /// Validate search query
    pub fn validate_search_query(query: &str) -> Result<(), Error> {
        require("query", query)?;

        if query.chars().count() > MAX_QUERY_LEN {
            return Err(Error::Validation("query 过长".to_string()));
        }

        Ok(())
    }

    /// Validate an optional result limit
    pub fn validate_limit(limit: Option<u32>) -> Result<Option<usize>, Error> {
        match limit {
            Some(0) => Err(Error::Validation("limit 必须大于 0".to_string())),
            Some(n) => Ok(Some(n as usize)),
            None => Ok(None),
        }
    }
}
