//! Server configuration.

use std::env;

const DEFAULT_PORT: u16 = 3000;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Public base URL, used to build share links.
    pub public_url: String,
    /// Database URL. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Secret shared with the identity provider to verify session tokens.
    pub jwt_secret: String,
    /// Expected session token issuer.
    pub jwt_issuer: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Creates a configuration with defaults and the given session secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            public_url: format!("http://localhost:{DEFAULT_PORT}"),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            jwt_issuer: auth::DEFAULT_JWT_ISSUER.to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("TAREFAS_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("TAREFAS_JWT_SECRET is required"))?;

        let mut config = Self::new(jwt_secret);

        if let Ok(host) = env::var("TAREFAS_SERVER_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("TAREFAS_SERVER_PORT") {
            config.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("TAREFAS_SERVER_PORT is not a valid port: {port}"))?;
            config.public_url = format!("http://localhost:{}", config.port);
        }
        if let Ok(public_url) = env::var("TAREFAS_PUBLIC_URL") {
            config.public_url = public_url;
        }
        config.database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if let Ok(issuer) = env::var("TAREFAS_JWT_ISSUER") {
            config.jwt_issuer = issuer;
        }
        if let Ok(level) = env::var("TAREFAS_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Sets the public base URL.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into();
        self
    }
}
