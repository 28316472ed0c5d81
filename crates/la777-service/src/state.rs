//! Application state.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;

use la777_store::RocksStore;

use crate::config::ServiceConfig;
use crate::identity::IdentityClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Key for verifying staff tokens (optional).
    pub jwt_key: Option<DecodingKey>,

    /// Identity client for password changes (optional).
    pub identity: Option<Arc<IdentityClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let jwt_key = config
            .jwt_secret
            .as_ref()
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));

        if jwt_key.is_none() {
            tracing::warn!("JWT_SECRET not set - authenticated routes will reject every request");
        }

        let identity = config.identity_api_key.as_ref().and_then(|key| {
            match IdentityClient::new(&config.identity_api_url, key) {
                Ok(client) => {
                    tracing::info!(identity_url = %config.identity_api_url, "Identity integration enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build identity client");
                    None
                }
            }
        });

        if identity.is_none() {
            tracing::warn!("Identity provider not configured - password changes will fail");
        }

        Self {
            store,
            config,
            jwt_key,
            identity,
        }
    }

    /// Check if the identity provider is configured.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }
}
