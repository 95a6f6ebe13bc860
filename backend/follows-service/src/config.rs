use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Neo4j connection configuration from NEO4J_* env vars
    pub neo4j: Neo4jConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// HTTP port, defaults to 8086 when not set
    pub http_port: u16,
}

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    /// Neo4j bolt URI, e.g. bolt://neo4j:7687
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Upper bound for a single repository operation
    pub query_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // First key wins; the second is the legacy name used by older deployments.
        let first_of = |keys: &[&str]| keys.iter().find_map(|key| lookup(*key));

        let host = first_of(&["SERVER_HOST"]).unwrap_or_else(|| "0.0.0.0".to_string());
        let http_port = match first_of(&["PORT", "SERVER_HTTP_PORT"]) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            None => 8086,
        };

        let uri = first_of(&["NEO4J_URI", "NEO4J_DB"])
            .unwrap_or_else(|| "bolt://localhost:7687".to_string());
        let user = first_of(&["NEO4J_USER", "NEO4J_USERNAME"]).unwrap_or_else(|| "neo4j".to_string());
        let password =
            first_of(&["NEO4J_PASSWORD", "NEO4J_PASS"]).unwrap_or_else(|| "password".to_string());

        let query_timeout_secs = match first_of(&["NEO4J_QUERY_TIMEOUT_SECS"]) {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("NEO4J_QUERY_TIMEOUT_SECS must be an integer, got {:?}", raw)
            })?,
            None => 10,
        };
        if query_timeout_secs == 0 {
            anyhow::bail!("NEO4J_QUERY_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            server: ServerConfig { host, http_port },
            neo4j: Neo4jConfig {
                uri,
                user,
                password,
                query_timeout: Duration::from_secs(query_timeout_secs),
            },
        })
    }
}
