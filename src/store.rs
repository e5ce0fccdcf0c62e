//! Persistent key-value store boundary
//!
//! The platform secure-store capability, abstracted so the session engine can
//! be driven against an in-memory fake in tests. The engine is the sole writer
//! of these keys; screens go through its operations instead of touching the
//! store directly.

mod memory;
pub(crate) mod records;
mod sqlite;

pub use memory::MemoryStore;
pub use records::{
    ChatHistoryEntry, ChatMessage, ChatRole, HistoryRole, InferenceResult, UserIdentity,
};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// Keys owned by the session engine.
pub mod keys {
    pub const USER_ID: &str = "user_id";
    pub const USERNAME: &str = "username";
    pub const INFER_RESULT: &str = "infer_result";
    pub const CHAT_MESSAGES: &str = "chat_messages";
    pub const CHAT_HISTORY: &str = "chat_history";
    pub const PENDING_MESSAGE: &str = "pending_message";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed record at '{key}': {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed durable storage.
///
/// Every access is a suspension point; a single key's write is all-or-nothing.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }
}
