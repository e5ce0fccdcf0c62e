//! Clients for the companion's backend services
//!
//! Two external bases: the general API (user accounts) and the inference API
//! (activity recommendation + chat). Every call is a single attempt with a
//! fixed timeout; failures are normalized into [`RemoteError`] at this
//! boundary and nothing is retried.

mod error;
mod http;
mod types;

pub use error::{RemoteError, RemoteErrorKind};
pub use http::HttpRemote;
pub use types::{
    ChatRequest, ChatResponse, CreateUserRequest, CreateUserResponse, InferRequest,
    InferResponse, WINDOW_LEN,
};

use crate::store::InferenceResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface to the remote backend.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Create a user account, returning its id.
    async fn create_user(&self, display_name: &str) -> Result<i64, RemoteError>;

    /// Request an activity recommendation for one feature window.
    async fn infer(&self, request: &InferRequest) -> Result<InferenceResult, RemoteError>;

    /// Send one chat message with conversation context, returning the reply.
    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError>;
}

#[async_trait]
impl<T: RemoteService + ?Sized> RemoteService for Arc<T> {
    async fn create_user(&self, display_name: &str) -> Result<i64, RemoteError> {
        (**self).create_user(display_name).await
    }

    async fn infer(&self, request: &InferRequest) -> Result<InferenceResult, RemoteError> {
        (**self).infer(request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError> {
        (**self).chat(request).await
    }
}

/// Logging wrapper for remote services
pub struct LoggingRemote<R> {
    inner: R,
}

impl<R: RemoteService> LoggingRemote<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn finish<T>(
        op: &'static str,
        started: std::time::Instant,
        result: Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        let duration = started.elapsed();
        match &result {
            Ok(_) => {
                tracing::info!(op, duration_ms = %duration.as_millis(), "Remote call completed");
            }
            Err(e) => {
                tracing::error!(
                    op,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Remote call failed"
                );
            }
        }
        result
    }
}

#[async_trait]
impl<R: RemoteService> RemoteService for LoggingRemote<R> {
    async fn create_user(&self, display_name: &str) -> Result<i64, RemoteError> {
        let started = std::time::Instant::now();
        Self::finish("create_user", started, self.inner.create_user(display_name).await)
    }

    async fn infer(&self, request: &InferRequest) -> Result<InferenceResult, RemoteError> {
        let started = std::time::Instant::now();
        Self::finish("infer", started, self.inner.infer(request).await)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError> {
        let started = std::time::Instant::now();
        Self::finish("chat", started, self.inner.chat(request).await)
    }
}
