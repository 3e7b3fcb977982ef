//! API configuration

use serde::Deserialize;
use std::time::Duration;

use domain_claims::{SimulatedServicesConfig, WorkflowConfig};

/// API configuration, read from `API_`-prefixed environment variables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// PostgreSQL connection string; claims are kept in memory without one
    pub database_url: Option<String>,
    /// Comma-separated allowed origins, or `*`
    pub cors_origins: String,
    /// Upper bound on a single external service call
    pub adapter_timeout_ms: u64,
    pub simulated_latency_min_ms: u64,
    pub simulated_latency_max_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let latency = SimulatedServicesConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            database_url: None,
            cors_origins: "*".to_string(),
            adapter_timeout_ms: 5000,
            simulated_latency_min_ms: latency.latency_min_ms,
            simulated_latency_max_ms: latency.latency_max_ms,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed origins; `None` means any origin
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            adapter_timeout: Duration::from_millis(self.adapter_timeout_ms),
            ..WorkflowConfig::default()
        }
    }

    pub fn simulated_services_config(&self) -> SimulatedServicesConfig {
        SimulatedServicesConfig {
            latency_min_ms: self.simulated_latency_min_ms,
            latency_max_ms: self.simulated_latency_max_ms.max(self.simulated_latency_min_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert!(config.allowed_origins().is_none());
        assert_eq!(config.workflow_config().adapter_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_allowed_origins_parses_list() {
        let config = ApiConfig {
            cors_origins: "http://localhost:3000, https://claims.example.com".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.allowed_origins().unwrap(),
            vec!["http://localhost:3000", "https://claims.example.com"]
        );
    }

    #[test]
    fn test_wildcard_in_list_allows_any() {
        let config = ApiConfig {
            cors_origins: "http://localhost:3000,*".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.allowed_origins().is_none());
    }

    #[test]
    fn test_latency_window_never_inverted() {
        let config = ApiConfig {
            simulated_latency_min_ms: 500,
            simulated_latency_max_ms: 100,
            ..ApiConfig::default()
        };
        let latency = config.simulated_services_config();
        assert_eq!(latency.latency_max_ms, 500);
    }
}
