use std::time::Duration;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

#[derive(Debug, Clone)]
pub struct KustoConfig {
    /// Identity provider base URL, used when the credentials do not name one.
    pub authority_host: String,
    /// Tokens closer than this to expiry are refreshed before the next query.
    pub refresh_margin: Duration,
    /// TCP connect timeout for both the authority and the cluster.
    pub connect_timeout: Duration,
    /// Application name sent as `x-ms-app`.
    pub app_name: String,
}

impl Default for KustoConfig {
    fn default() -> Self {
        Self {
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            refresh_margin: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            app_name: "qprobe".to_string(),
        }
    }
}
