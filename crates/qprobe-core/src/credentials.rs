use std::fmt;

pub const TENANT_ID_KEY: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_KEY: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "AZURE_CLIENT_SECRET";
pub const AUTHORITY_HOST_KEY: &str = "AZURE_AUTHORITY_HOST";

/// Backend credentials resolved from process configuration.
///
/// Unset keys resolve to an empty string; whether that is acceptable is decided by the client factory.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
}

impl Credentials {
    /// Resolve credentials through an environment-style lookup.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            tenant_id: get(TENANT_ID_KEY),
            client_id: get(CLIENT_ID_KEY),
            client_secret: get(CLIENT_SECRET_KEY),
            authority_host: get(AUTHORITY_HOST_KEY),
        }
    }

    /// Resolve credentials from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Name of the first required key that resolved to an empty value.
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            (TENANT_ID_KEY, &self.tenant_id),
            (CLIENT_ID_KEY, &self.client_id),
            (CLIENT_SECRET_KEY, &self.client_secret),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}
