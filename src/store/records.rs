//! Persisted record types
//!
//! Everything durable is a string under a single key; the collection-valued
//! keys hold JSON encoded here. Records round-trip through serde unchanged so
//! a restored session renders exactly what was saved.

use super::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity created once during onboarding, immutable until a full reset.
///
/// Persisted as two plain keys (`user_id`, `username`) rather than JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: i64,
    pub display_name: String,
}

/// Latest activity recommendation from the inference service.
///
/// Owned exclusively by the `infer_result` key and overwritten whole on each
/// refresh, never merged. Fields the service omitted stay explicitly absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub pred_label: String,
    #[serde(default)]
    pub pred_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pred_activity_id: Option<i64>,
    #[serde(default)]
    pub probs: Vec<f64>,
}

/// Who a chat bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Agent,
}

/// A rendered chat bubble, in conversation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_action: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            time: time.into(),
            has_action: false,
        }
    }

    pub fn agent(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Agent,
            text: text.into(),
            time: time.into(),
            has_action: false,
        }
    }
}

/// Role names the chat endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One line of prompt context for the chat endpoint.
///
/// Grows only in user+assistant pairs, and only for successful exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl ChatHistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            content: content.into(),
        }
    }
}

pub(crate) fn encode<T: Serialize>(key: &'static str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Malformed { key, source })
}

pub(crate) fn decode<T: DeserializeOwned>(key: &'static str, raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|source| StoreError::Malformed { key, source })
}
