use std::time::Duration;

use qprobe_core::Credentials;
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

use crate::errors::KustoError;
use crate::wire::{TokenErrorBody, TokenResponse};

/// Assumed token lifetime when the authority does not report one.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Client-credentials token provider for one resource scope.
pub(crate) struct TokenSource {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    refresh_margin: Duration,
    current: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(
        http: reqwest::Client,
        token_url: String,
        credentials: &Credentials,
        scope: String,
        refresh_margin: Duration,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            scope,
            refresh_margin,
            current: Mutex::new(None),
        }
    }

    /// Current bearer token, fetching a new one when missing or about to expire.
    ///
    /// Concurrent callers serialize on the refresh, so at most one token request is in flight.
    pub async fn token(&self) -> Result<String, KustoError> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref()
            && token.expires_at > Instant::now() + self.refresh_margin
        {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *current = Some(fresh);
        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken, KustoError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let response = self.http.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorBody>(&body)
                .map(|e| format!("{}: {}", e.error, e.error_description))
                .unwrap_or_else(|_| format!("{status}: {body}"));
            return Err(KustoError::TokenRejected(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let lifetime = token
            .expires_in_secs()
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LIFETIME);
        debug!(scope = %self.scope, expires_in = lifetime.as_secs(), "access token acquired");

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
