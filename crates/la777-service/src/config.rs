//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use la777_core::DEFAULT_INACTIVITY_WINDOW_SECS;

/// Default identity-provider REST endpoint.
pub const DEFAULT_IDENTITY_API_URL: &str = "https://identitytoolkit.googleapis.com";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/la777").
    pub data_dir: String,

    /// HS256 secret used to verify staff tokens. Without it every
    /// authenticated route rejects.
    pub jwt_secret: Option<String>,

    /// Identity provider base URL.
    pub identity_api_url: String,

    /// Identity provider API key (optional).
    pub identity_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Seconds without ledger activity before a player turns inactive.
    pub inactivity_window_seconds: i64,

    /// Seconds between background sweeps; 0 disables the task.
    pub sweep_interval_seconds: u64,
}

/// Identity secrets file structure.
#[derive(Debug, Deserialize)]
struct IdentitySecrets {
    #[serde(default)]
    api_url: Option<String>,
    api_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (identity_api_url, identity_api_key) = load_identity_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/la777".into()),
            jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            identity_api_url,
            identity_api_key,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS").unwrap_or(30),
            inactivity_window_seconds: env_parse("INACTIVITY_WINDOW_SECONDS")
                .unwrap_or(DEFAULT_INACTIVITY_WINDOW_SECS),
            sweep_interval_seconds: env_parse("SWEEP_INTERVAL_SECONDS").unwrap_or(60),
        }
    }

    /// The inactivity window as a duration.
    #[must_use]
    pub fn inactivity_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.inactivity_window_seconds)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

/// Load identity secrets from file or environment.
fn load_identity_secrets() -> (String, Option<String>) {
    let secret_paths = [
        ".secrets/identity.json",
        "la777/.secrets/identity.json",
        "../.secrets/identity.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<IdentitySecrets>(path) {
            tracing::info!(path = %path, "Loaded identity secrets from file");
            return (
                secrets
                    .api_url
                    .unwrap_or_else(|| DEFAULT_IDENTITY_API_URL.into()),
                Some(secrets.api_key),
            );
        }
    }

    // Fall back to environment variables
    tracing::debug!("Identity secrets file not found, using environment variables");
    (
        std::env::var("IDENTITY_API_URL").unwrap_or_else(|_| DEFAULT_IDENTITY_API_URL.into()),
        std::env::var("IDENTITY_API_KEY").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/la777".into(),
            jwt_secret: None,
            identity_api_url: DEFAULT_IDENTITY_API_URL.into(),
            identity_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            inactivity_window_seconds: DEFAULT_INACTIVITY_WINDOW_SECS,
            sweep_interval_seconds: 60,
        }
    }
}
