use async_trait::async_trait;
use qprobe_core::{ClientFactory, ClientInitError, Credentials};
use tracing::info;

use crate::auth::TokenSource;
use crate::{KustoClient, KustoConfig, KustoError};

/// Builds authenticated [`KustoClient`]s; plug it into a [`qprobe_core::ClientCache`].
pub struct KustoConnector {
    http: reqwest::Client,
    config: KustoConfig,
}

impl KustoConnector {
    pub fn new(config: KustoConfig) -> Result<Self, KustoError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("{}/{}", config.app_name, env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl ClientFactory for KustoConnector {
    type Client = KustoClient;

    async fn connect(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<KustoClient, ClientInitError> {
        if let Some(key) = credentials.first_missing() {
            return Err(ClientInitError::MissingCredential(key));
        }
        let endpoint = validate_endpoint(endpoint)?;

        let authority = match credentials.authority_host.trim() {
            "" => self.config.authority_host.as_str(),
            host => host,
        };
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority.trim_end_matches('/'),
            credentials.tenant_id
        );
        let tokens = TokenSource::new(
            self.http.clone(),
            token_url,
            credentials,
            format!("{endpoint}/.default"),
            self.config.refresh_margin,
        );

        // Authenticate up front so bad credentials fail construction, not the first query.
        tokens.token().await?;
        info!(%endpoint, "authenticated against kusto endpoint");

        Ok(KustoClient::new(
            self.http.clone(),
            endpoint,
            self.config.app_name.clone(),
            tokens,
        ))
    }
}

fn validate_endpoint(endpoint: &str) -> Result<String, ClientInitError> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| ClientInitError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ClientInitError::InvalidEndpoint(format!(
            "{endpoint}: expected an http(s) URL"
        )));
    }
    Ok(endpoint.to_string())
}
