//! reqwest-backed remote client

use super::error::RemoteError;
use super::types::{ChatRequest, ChatResponse, CreateUserRequest, CreateUserResponse, InferRequest, InferResponse};
use super::RemoteService;
use crate::config::BackendConfig;
use crate::store::InferenceResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP client for both backend bases. One `reqwest::Client` shared across
/// calls, with the fixed per-call timeout baked in.
pub struct HttpRemote {
    client: Client,
    api_base: String,
    infer_base: String,
}

impl HttpRemote {
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            infer_base: config.infer_base.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    RemoteError::network(format!("Connection failed: {e}"))
                } else {
                    RemoteError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(RemoteError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| RemoteError::malformed(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn create_user(&self, display_name: &str) -> Result<i64, RemoteError> {
        let body = CreateUserRequest {
            display_name: display_name.to_string(),
        };
        let response: CreateUserResponse = self
            .post_json(format!("{}/v1/users", self.api_base), &body)
            .await?;
        Ok(response.user_id)
    }

    async fn infer(&self, request: &InferRequest) -> Result<InferenceResult, RemoteError> {
        let response: InferResponse = self
            .post_json(format!("{}/infer", self.infer_base), request)
            .await?;
        response.into_result()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError> {
        let response: ChatResponse = self
            .post_json(format!("{}/chat", self.infer_base), request)
            .await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_bases() {
        let config = BackendConfig {
            api_base: "http://localhost:8000/".to_string(),
            infer_base: "http://localhost:8001///".to_string(),
            ..BackendConfig::default()
        };
        let remote = HttpRemote::new(&config);
        assert_eq!(remote.api_base, "http://localhost:8000");
        assert_eq!(remote.infer_base, "http://localhost:8001");
    }
}
