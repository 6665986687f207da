use async_trait::async_trait;
use qprobe_core::{BackendError, QueryClient, QueryContext};
use qprobe_model::NativeRow;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::auth::TokenSource;
use crate::errors::KustoError;
use crate::wire::{self, QueryRequest, QueryResponse, ServiceErrorBody};

/// Authenticated client bound to one Kusto cluster endpoint.
pub struct KustoClient {
    http: reqwest::Client,
    endpoint: String,
    app_name: String,
    tokens: TokenSource,
}

impl KustoClient {
    pub(crate) fn new(
        http: reqwest::Client,
        endpoint: String,
        app_name: String,
        tokens: TokenSource,
    ) -> Self {
        Self {
            http,
            endpoint,
            app_name,
            tokens,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(
        &self,
        database: &str,
        query: &str,
    ) -> Result<Vec<NativeRow>, KustoError> {
        let token = self.tokens.token().await?;
        let request_id = format!("{};{}", self.app_name, Uuid::new_v4());

        let response = self
            .http
            .post(format!("{}/v1/rest/query", self.endpoint))
            .bearer_auth(token)
            .header("x-ms-client-request-id", &request_id)
            .header("x-ms-app", &self.app_name)
            .json(&QueryRequest {
                db: database,
                csl: query,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ServiceErrorBody>(&body)
                .map(|b| b.error.text())
                .unwrap_or_else(|_| body.clone());
            return Err(KustoError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        let rows = wire::decode_primary(parsed)?;
        trace!(%request_id, rows = rows.len(), "query response decoded");
        Ok(rows)
    }
}

#[async_trait]
impl QueryClient for KustoClient {
    async fn query(
        &self,
        database: &str,
        query: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<NativeRow>, BackendError> {
        tokio::select! {
            _ = ctx.cancelled() => {
                debug!(endpoint = %self.endpoint, "query cancelled");
                Err(KustoError::Cancelled.into())
            }
            _ = tokio::time::sleep_until(ctx.deadline()) => {
                debug!(endpoint = %self.endpoint, "query deadline exceeded");
                Err(BackendError::DeadlineExceeded)
            }
            res = self.execute(database, query) => res.map_err(BackendError::from),
        }
    }
}
