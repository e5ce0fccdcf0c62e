//! Backend endpoint configuration

use std::time::Duration;

/// Default general API base (user accounts).
const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default inference API base (recommendation + chat).
const DEFAULT_INFER_BASE: &str = "http://localhost:8001";

/// The only bound on how long a remote call may stay pending. There is no
/// cancellation token; a call either resolves or times out.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the two backend services live.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_base: String,
    pub infer_base: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            infer_base: DEFAULT_INFER_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl BackendConfig {
    /// Environment overrides for the compile-time defaults.
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("HEALIN_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            infer_base: std::env::var("HEALIN_INFER_BASE")
                .unwrap_or_else(|_| DEFAULT_INFER_BASE.to_string()),
            timeout: REQUEST_TIMEOUT,
        }
    }
}
