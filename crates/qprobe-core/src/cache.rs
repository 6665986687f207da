use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{ClientFactory, ClientInitError, Credentials};

type Slot<C> = Arc<OnceCell<Arc<C>>>;
type CredentialSource = Box<dyn Fn() -> Credentials + Send + Sync>;

/// Process-wide cache of backend clients, one per endpoint.
///
/// Each endpoint gets a compute-once cell: concurrent first callers wait on a single construction,
/// and a failed construction leaves the cell empty so the next caller retries.
pub struct ClientCache<F: ClientFactory> {
    factory: F,
    credentials: CredentialSource,
    slots: Mutex<HashMap<String, Slot<F::Client>>>,
}

impl<F: ClientFactory> ClientCache<F> {
    /// Cache that resolves credentials from the process environment.
    pub fn new(factory: F) -> Self {
        Self::with_credentials(factory, Credentials::from_env)
    }

    /// Cache with a custom credential source, called once per construction attempt.
    pub fn with_credentials<S>(factory: F, source: S) -> Self
    where
        S: Fn() -> Credentials + Send + Sync + 'static,
    {
        Self {
            factory,
            credentials: Box::new(source),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get the client for `endpoint`, constructing it on first use.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_client(&self, endpoint: &str) -> Result<Arc<F::Client>, ClientInitError> {
        let key = cache_key(endpoint);
        let slot = {
            let mut slots = self.lock();
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let outcome = slot
            .get_or_try_init(|| async {
                debug!("constructing backend client");
                let credentials = (self.credentials)();
                match self.factory.connect(key, &credentials).await {
                    Ok(client) => {
                        info!(endpoint = key, "backend client ready");
                        Ok(Arc::new(client))
                    }
                    Err(e) => {
                        warn!(endpoint = key, error = %e, "backend client construction failed");
                        Err(e)
                    }
                }
            })
            .await;

        match outcome {
            Ok(client) => Ok(Arc::clone(client)),
            Err(e) => {
                self.release_failed(key, &slot);
                Err(e)
            }
        }
    }

    /// Forget an empty slot after a failed construction, unless another caller still waits on it.
    fn release_failed(&self, key: &str, slot: &Slot<F::Client>) {
        let mut slots = self.lock();
        let unused = slots.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if unused {
            slots.remove(key);
        }
    }

    /// Number of endpoints tracked, including ones whose construction is in flight.
    pub fn slots(&self) -> usize {
        self.lock().len()
    }

    /// Drop the cached client for `endpoint`; the next call constructs a fresh one.
    ///
    /// Returns `true` if a constructed client was dropped.
    pub fn invalidate(&self, endpoint: &str) -> bool {
        self.lock()
            .remove(cache_key(endpoint))
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of endpoints with a constructed client.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|s| s.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<F::Client>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cache_key(endpoint: &str) -> &str {
    endpoint.trim().trim_end_matches('/')
}
