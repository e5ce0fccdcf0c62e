//! Wire types for the backend and inference services
//!
//! Responses are loosely typed at the wire and validated into the strict
//! store records at this boundary; fields a service omitted become explicit
//! `None`s instead of silently missing values.

use super::error::RemoteError;
use crate::store::{ChatHistoryEntry, InferenceResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed window length the model was trained on.
pub const WINDOW_LEN: usize = 100;

/// Body of `POST {api_base}/v1/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
}

/// Body of `POST {infer_base}/infer`: windowed IMU features shaped
/// `[WINDOW_LEN][3]`.
#[derive(Debug, Clone, Serialize)]
pub struct InferRequest {
    pub x: Vec<[f64; 3]>,
}

impl InferRequest {
    /// Placeholder feature window until a real telemetry pipeline feeds this:
    /// uniform noise in [-1, 1], shaped the way the model expects.
    pub fn synthetic() -> Self {
        let mut rng = rand::thread_rng();
        let x = (0..WINDOW_LEN)
            .map(|_| {
                [
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                ]
            })
            .collect();
        Self { x }
    }
}

/// Response of `POST {infer_base}/infer`. Only `pred_label` is required
/// downstream; everything else may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct InferResponse {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub pred_label: Option<String>,
    #[serde(default)]
    pub pred_index: Option<i64>,
    #[serde(default)]
    pub pred_activity_id: Option<i64>,
    #[serde(default)]
    pub probs: Vec<f64>,
}

impl InferResponse {
    /// Validate into the persisted record shape.
    pub fn into_result(self) -> Result<InferenceResult, RemoteError> {
        let pred_label = self
            .pred_label
            .filter(|label| !label.is_empty())
            .ok_or_else(|| RemoteError::malformed("inference response missing pred_label"))?;
        Ok(InferenceResult {
            pred_label,
            pred_index: self.pred_index,
            pred_activity_id: self.pred_activity_id,
            probs: self.probs,
        })
    }
}

/// Body of `POST {infer_base}/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pred_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HistoryRole;

    #[test]
    fn synthetic_window_has_model_shape() {
        let request = InferRequest::synthetic();
        assert_eq!(request.x.len(), WINDOW_LEN);
        assert!(request
            .x
            .iter()
            .flatten()
            .all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn infer_response_validates_into_record() {
        let raw = r#"{"user_id":7,"pred_label":"Stretching","pred_index":4,"pred_activity_id":4,"probs":[0.1,0.1,0.1,0.1,0.5,0.1]}"#;
        let response: InferResponse = serde_json::from_str(raw).unwrap();
        let result = response.into_result().unwrap();
        assert_eq!(result.pred_label, "Stretching");
        assert_eq!(result.pred_index, Some(4));
        assert_eq!(result.probs.len(), 6);
    }

    #[test]
    fn infer_response_without_label_is_malformed() {
        let response: InferResponse = serde_json::from_str(r#"{"pred_index":1}"#).unwrap();
        assert!(response.into_result().is_err());
    }

    #[test]
    fn chat_request_omits_absent_pred_label() {
        let request = ChatRequest {
            message: "Tremor?".to_string(),
            history: vec![ChatHistoryEntry {
                role: HistoryRole::User,
                content: "hi".to_string(),
            }],
            pred_label: None,
        };
        let raw = serde_json::to_string(&request).unwrap();
        assert!(!raw.contains("pred_label"));
        assert!(raw.contains(r#""history":[{"role":"user","content":"hi"}]"#));
    }
}
