// Server configuration
// Defaults, then SERVER_* environment variables, then command line overrides

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Settings for the GraphQL HTTP server
///
/// ## Environment Variables
///
/// | Variable | Field | Default |
/// |---|---|---|
/// | `SERVER_HOST` | `host` | `0.0.0.0` |
/// | `SERVER_PORT` | `port` | `4000` |
/// | `SERVER_CORS_ENABLED` | `cors_enabled` | `true` |
/// | `SERVER_GRAPHIQL_ENABLED` | `graphiql_enabled` | `true` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub graphiql_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_enabled: true,
            graphiql_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("SERVER").try_parsing(true))
    }

    /// Load configuration from an explicit environment source
    ///
    /// Split out from [`ServerConfig::from_env`] so tests can supply
    /// variables without touching the real process environment.
    pub fn from_environment(environment: Environment) -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("cors_enabled", defaults.cors_enabled)?
            .set_default("graphiql_enabled", defaults.graphiql_enabled)?
            .add_source(environment)
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Environment::with_prefix("SERVER")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_environment(environment(&[])).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert!(config.cors_enabled);
        assert!(config.graphiql_enabled);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServerConfig::from_environment(environment(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8081"),
            ("SERVER_GRAPHIQL_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8081");
        assert!(!config.graphiql_enabled);
        assert!(config.cors_enabled);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = ServerConfig::from_environment(environment(&[("SERVER_PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
