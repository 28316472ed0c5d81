//! Identity provider REST client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Error type for identity provider operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("identity API error: {message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider error code, e.g. `INVALID_PASSWORD`.
        message: String,
    },
}

impl IdentityError {
    /// The provider's error code, if the provider answered.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message.as_str()),
            Self::Http(_) => None,
        }
    }
}

/// Response from a password sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Short-lived token proving the password was correct.
    pub id_token: String,
    /// Provider uid.
    #[serde(default)]
    pub local_id: Option<String>,
    /// Account email.
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordRequest<'a> {
    id_token: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Identity provider client.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    /// Create a new identity client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider base URL, without the `/v1` suffix
    /// * `api_key` - Web API key passed as the `key` query parameter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, IdentityError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Verify an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Api` with the provider code when the
    /// credentials are rejected.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, IdentityError> {
        let response = self
            .client
            .post(format!("{}/v1/accounts:signInWithPassword", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Set a new password for the account behind `id_token`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Api` with the provider code on rejection,
    /// e.g. a weak password.
    pub async fn update_password(&self, id_token: &str, new_password: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(format!("{}/v1/accounts:update", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&UpdatePasswordRequest {
                id_token,
                password: new_password,
                return_secure_token: false,
            })
            .send()
            .await?;

        Self::handle_response::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Handle an API response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));

        tracing::debug!(status = %status, message = %message, "Identity API error");

        Err(IdentityError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
