pub mod error;
pub use error::{BackendError, ClientInitError, CoreError};

pub mod credentials;
pub use credentials::Credentials;

pub mod backend;
pub use backend::{ClientFactory, MAX_TIMEOUT, QueryClient, QueryContext};

mod cache;
pub use cache::ClientCache;

mod normalize;
pub use normalize::{normalize, normalize_all};

mod projector;
pub use projector::{LabelProjector, MIN_ROWS_FOR_SCHEMA};

mod query;
pub use query::run_query;
