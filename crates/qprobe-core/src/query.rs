use qprobe_model::{QueryResult, QueryStatement};
use tracing::{debug, instrument};

use crate::{ClientCache, ClientFactory, CoreError, QueryClient, QueryContext, normalize_all};

/// Execute `statement` through the cached client of its endpoint and normalize the rows.
///
/// The caller owns the deadline: `ctx` is handed to the backend, which is expected to observe its cancellation.
#[instrument(level = "debug", skip_all, fields(endpoint = statement.endpoint(), database = statement.database()))]
pub async fn run_query<F>(
    cache: &ClientCache<F>,
    statement: &QueryStatement,
    ctx: &QueryContext,
) -> Result<QueryResult, CoreError>
where
    F: ClientFactory,
{
    let client = cache.get_client(statement.endpoint()).await?;
    let rows = client
        .query(statement.database(), statement.text(), ctx)
        .await?;
    let result = normalize_all(&rows)?;

    debug!(rows = result.len(), "query finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use qprobe_model::{CellValue, ColumnDescriptor, ColumnType, NativeRow};

    use super::*;
    use crate::{BackendError, ClientInitError, Credentials};

    struct StaticClient;

    #[async_trait]
    impl QueryClient for StaticClient {
        async fn query(
            &self,
            database: &str,
            query: &str,
            _ctx: &QueryContext,
        ) -> Result<Vec<NativeRow>, BackendError> {
            if query == "fail" {
                return Err(BackendError::Query("syntax error".into()));
            }
            let columns = vec![
                ColumnDescriptor::new("db", ColumnType::String),
                ColumnDescriptor::new("query", ColumnType::String),
            ];
            Ok(vec![NativeRow::new(
                columns,
                vec![
                    CellValue::String(database.into()),
                    CellValue::String(query.into()),
                ],
            )])
        }
    }

    struct StaticFactory;

    #[async_trait]
    impl ClientFactory for StaticFactory {
        type Client = StaticClient;

        async fn connect(
            &self,
            _endpoint: &str,
            _credentials: &Credentials,
        ) -> Result<StaticClient, ClientInitError> {
            Ok(StaticClient)
        }
    }

    #[tokio::test]
    async fn passes_statement_through_verbatim() {
        let cache = ClientCache::with_credentials(StaticFactory, Credentials::default);
        let stmt = QueryStatement::new("https://a.example", "db1", "T | take 1 // \"raw\"");
        let ctx = QueryContext::with_timeout(Duration::from_secs(1));

        let result = run_query(&cache, &stmt, &ctx).await.unwrap();
        let row = result.first().unwrap();
        assert_eq!(row.get("db"), Some("db1"));
        assert_eq!(row.get("query"), Some("T | take 1 // \"raw\""));
    }

    #[tokio::test]
    async fn backend_errors_are_propagated() {
        let cache = ClientCache::with_credentials(StaticFactory, Credentials::default);
        let stmt = QueryStatement::new("https://a.example", "db1", "fail");
        let ctx = QueryContext::with_timeout(Duration::from_secs(1));

        let err = run_query(&cache, &stmt, &ctx).await.unwrap_err();
        assert!(matches!(err, CoreError::Backend(BackendError::Query(_))));
    }
}
