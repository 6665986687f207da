use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use qprobe_core::{
    BackendError, ClientCache, ClientFactory, ClientInitError, Credentials, QueryClient,
    QueryContext,
};
use qprobe_model::{CellValue, ColumnDescriptor, ColumnType, NativeRow};
use qprobe_prometheus::ProbeMetrics;

use crate::{DEFAULT_PROBE_PATH, ProbeService};

/// Backend double whose behaviour is picked by the query text.
pub struct MockClient {
    seen_ctx: Arc<Mutex<Option<QueryContext>>>,
}

fn string_row(pairs: &[(&str, &str)]) -> NativeRow {
    NativeRow::new(
        pairs
            .iter()
            .map(|(name, _)| ColumnDescriptor::new(*name, ColumnType::String))
            .collect(),
        pairs
            .iter()
            .map(|(_, value)| CellValue::String(value.to_string()))
            .collect(),
    )
}

#[async_trait]
impl QueryClient for MockClient {
    async fn query(
        &self,
        _database: &str,
        query: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<NativeRow>, BackendError> {
        *self.seen_ctx.lock().unwrap() = Some(ctx.clone());
        match query {
            "two" => Ok(vec![
                string_row(&[("id", "a"), ("region", "us")]),
                string_row(&[("id", "b"), ("region", "eu")]),
            ]),
            "counted" => Ok(vec![
                string_row(&[("id", "a"), ("count", "3")]),
                string_row(&[("id", "b"), ("count", "5")]),
            ]),
            "one" => Ok(vec![string_row(&[("id", "a")])]),
            "none" => Ok(vec![]),
            "bad-label" => Ok(vec![
                string_row(&[("Node Name", "a")]),
                string_row(&[("Node Name", "b")]),
            ]),
            "hang" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![])
            }
            "deadline" => {
                tokio::time::sleep_until(ctx.deadline()).await;
                Err(BackendError::DeadlineExceeded)
            }
            _ => Err(BackendError::Query(format!("semantic error in '{query}'"))),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockFactory {
    pub constructed: Arc<AtomicUsize>,
    pub failing_connects: Arc<AtomicUsize>,
    pub seen_ctx: Arc<Mutex<Option<QueryContext>>>,
}

#[async_trait]
impl ClientFactory for MockFactory {
    type Client = MockClient;

    async fn connect(
        &self,
        _endpoint: &str,
        _credentials: &Credentials,
    ) -> Result<MockClient, ClientInitError> {
        if self
            .failing_connects
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ClientInitError::Authentication("invalid_client".into()));
        }
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(MockClient {
            seen_ctx: Arc::clone(&self.seen_ctx),
        })
    }
}

pub fn service(factory: MockFactory) -> (ProbeService<MockFactory>, ProbeMetrics) {
    let metrics = ProbeMetrics::new().unwrap();
    let cache = Arc::new(ClientCache::with_credentials(factory, Credentials::default));
    let svc = ProbeService::new(cache, metrics.clone(), DEFAULT_PROBE_PATH);
    (svc, metrics)
}
