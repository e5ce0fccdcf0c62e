//! Mock remote service for tests
//!
//! Queued-response mock: tests enqueue outcomes up front and inspect what the
//! engine actually sent.

use crate::remote::{ChatRequest, InferRequest, RemoteError, RemoteService};
use crate::store::InferenceResult;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockRemote {
    users: Mutex<VecDeque<Result<i64, RemoteError>>>,
    inferences: Mutex<VecDeque<Result<InferenceResult, RemoteError>>>,
    chats: Mutex<VecDeque<Result<String, RemoteError>>>,
    created: Mutex<Vec<String>>,
    infer_calls: Mutex<usize>,
    chat_log: Mutex<Vec<ChatRequest>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_user(&self, outcome: Result<i64, RemoteError>) {
        self.users.lock().unwrap().push_back(outcome);
    }

    pub fn queue_inference(&self, outcome: Result<InferenceResult, RemoteError>) {
        self.inferences.lock().unwrap().push_back(outcome);
    }

    pub fn queue_chat(&self, outcome: Result<String, RemoteError>) {
        self.chats.lock().unwrap().push_back(outcome);
    }

    /// Display names passed to `create_user`, in call order.
    pub fn created_users(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn infer_calls(&self) -> usize {
        *self.infer_calls.lock().unwrap()
    }

    /// Full chat requests the engine dispatched, in call order.
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn create_user(&self, display_name: &str) -> Result<i64, RemoteError> {
        self.created.lock().unwrap().push(display_name.to_string());
        self.users
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::network("No mock response queued")))
    }

    async fn infer(&self, _request: &InferRequest) -> Result<InferenceResult, RemoteError> {
        *self.infer_calls.lock().unwrap() += 1;
        self.inferences
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::network("No mock response queued")))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError> {
        self.chat_log.lock().unwrap().push(request.clone());
        self.chats
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::network("No mock response queued")))
    }
}
