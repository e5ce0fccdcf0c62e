//! Session engine: the operations the screens invoke
//!
//! Owns the in-memory mirrors of everything persisted and is the sole writer
//! of the store keys. Every mutation is mirrored to the store before the
//! operation completes (write-through); remote calls are single-attempt and
//! their failures never escape as panics.

use super::state::{Baseline, OnboardingStep};
use super::transition::{transition, TransitionError};
use super::{Effect, Event};
use crate::remote::{ChatRequest, InferRequest, RemoteService};
use crate::store::records;
use crate::store::{
    keys, ChatHistoryEntry, ChatMessage, InferenceResult, KeyValueStore, StoreError,
    UserIdentity,
};
use chrono::Local;
use thiserror::Error;

/// Fixed agent reply substituted when the chat endpoint fails. Failed
/// exchanges are answered inline, never surfaced as a blocking error.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't reach your assistant just now. Please try again in a moment.";

/// Errors surfaced to the hosting screens
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },
    #[error("Baseline is incomplete")]
    IncompleteBaseline,
    #[error("A chat message is already in flight")]
    ChatBusy,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Remote(#[from] crate::remote::RemoteError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// In-memory session state, synchronized to the injected store.
///
/// The host runs this on its UI event loop; methods take `&mut self`, so
/// onboarding advancement is totally ordered by construction. Chat sends
/// additionally keep an explicit single-flight flag because hosting
/// lifecycle hooks can re-enter across suspension points.
pub struct SessionEngine<S, R> {
    store: S,
    remote: R,
    step: OnboardingStep,
    identity: Option<UserIdentity>,
    inference: Option<InferenceResult>,
    messages: Vec<ChatMessage>,
    history: Vec<ChatHistoryEntry>,
    chat_in_flight: bool,
}

impl<S: KeyValueStore, R: RemoteService> SessionEngine<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self {
            store,
            remote,
            step: OnboardingStep::Welcome,
            identity: None,
            inference: None,
            messages: Vec::new(),
            history: Vec::new(),
            chat_in_flight: false,
        }
    }

    // ==================== Lifecycle ====================

    /// Load persisted state into the mirrors and derive the starting step.
    ///
    /// An existing identity skips onboarding entirely: a restart mid-flow
    /// resumes at `Ready` rather than asking the user to sign up again.
    pub async fn resume(&mut self) -> SessionResult<()> {
        self.identity = self.load_identity().await?;
        self.inference = match self.store.get(keys::INFER_RESULT).await? {
            Some(raw) => Some(records::decode(keys::INFER_RESULT, &raw)?),
            None => None,
        };
        self.reload_chat_logs().await?;

        self.step = if self.identity.is_some() {
            OnboardingStep::Ready
        } else {
            OnboardingStep::Welcome
        };
        tracing::info!(step = ?self.step, messages = self.messages.len(), "Session resumed");
        Ok(())
    }

    async fn load_identity(&self) -> SessionResult<Option<UserIdentity>> {
        let (id, name) = (
            self.store.get(keys::USER_ID).await?,
            self.store.get(keys::USERNAME).await?,
        );
        match (id, name) {
            (Some(id), Some(display_name)) => match id.parse() {
                Ok(id) => Ok(Some(UserIdentity { id, display_name })),
                Err(_) => {
                    tracing::warn!(raw = %id, "Stored user id is not numeric; treating as absent");
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }

    async fn reload_chat_logs(&mut self) -> SessionResult<()> {
        self.messages = match self.store.get(keys::CHAT_MESSAGES).await? {
            Some(raw) => records::decode(keys::CHAT_MESSAGES, &raw)?,
            None => Vec::new(),
        };
        self.history = match self.store.get(keys::CHAT_HISTORY).await? {
            Some(raw) => records::decode(keys::CHAT_HISTORY, &raw)?,
            None => Vec::new(),
        };
        Ok(())
    }

    // ==================== Onboarding ====================

    /// Create the user account and advance `Welcome -> Permissions`.
    ///
    /// Exactly one persistent write batch on success, zero on failure.
    pub async fn create_session(&mut self, display_name: &str) -> SessionResult<UserIdentity> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyInput {
                field: "display name",
            });
        }
        self.ensure_step(OnboardingStep::Welcome, "identity_created")?;

        let id = self.remote.create_user(name).await?;
        let identity = UserIdentity {
            id,
            display_name: name.to_string(),
        };
        self.apply(Event::IdentityCreated {
            identity: identity.clone(),
        })
        .await?;
        Ok(identity)
    }

    /// Advance `Permissions -> Baseline`. Grants are advisory; nothing blocks.
    pub async fn acknowledge_permissions(&mut self) -> SessionResult<()> {
        self.apply(Event::PermissionsAcknowledged).await
    }

    /// Validate the baseline, fetch the initial recommendation, and advance
    /// `Baseline -> Ready`. On a remote failure the transition is suppressed
    /// and the screen stays on the baseline step.
    pub async fn submit_baseline(&mut self, baseline: &Baseline) -> SessionResult<InferenceResult> {
        self.ensure_step(OnboardingStep::Baseline, "baseline_confirmed")?;
        if !baseline.is_complete() {
            return Err(SessionError::IncompleteBaseline);
        }

        match self.remote.infer(&InferRequest::synthetic()).await {
            Ok(result) => {
                self.apply(Event::BaselineConfirmed {
                    result: result.clone(),
                })
                .await?;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial inference failed; staying on baseline");
                Err(e.into())
            }
        }
    }

    fn ensure_step(&self, expected: OnboardingStep, event: &'static str) -> SessionResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                step: self.step,
                event,
            }
            .into())
        }
    }

    /// Run one event through the pure transition and execute its effects.
    async fn apply(&mut self, event: Event) -> SessionResult<()> {
        let result = transition(self.step, event)?;
        for effect in result.effects {
            self.execute(effect).await?;
        }
        self.step = result.next;
        tracing::info!(step = ?self.step, "Onboarding advanced");
        Ok(())
    }

    async fn execute(&mut self, effect: Effect) -> SessionResult<()> {
        match effect {
            Effect::PersistIdentity { identity } => {
                self.store
                    .set(keys::USER_ID, &identity.id.to_string())
                    .await?;
                self.store
                    .set(keys::USERNAME, &identity.display_name)
                    .await?;
                self.identity = Some(identity);
            }
            Effect::PersistInference { result } => {
                let raw = records::encode(keys::INFER_RESULT, &result)?;
                self.store.set(keys::INFER_RESULT, &raw).await?;
                self.inference = Some(result);
            }
        }
        Ok(())
    }

    // ==================== Inference ====================

    /// Fetch a fresh recommendation, overwriting the cached one whole.
    /// On failure the previous result stays untouched.
    pub async fn refresh_inference(&mut self) -> SessionResult<InferenceResult> {
        let result = self.remote.infer(&InferRequest::synthetic()).await?;
        let raw = records::encode(keys::INFER_RESULT, &result)?;
        self.store.set(keys::INFER_RESULT, &raw).await?;
        self.inference = Some(result.clone());
        Ok(result)
    }

    // ==================== Chat ====================

    /// Send one chat message and return the agent's reply bubble.
    ///
    /// The user bubble is appended (and persisted) before the call resolves.
    /// A remote failure substitutes [`FALLBACK_REPLY`] and leaves the model
    /// context untouched, so failed exchanges are never replayed as context.
    pub async fn send_chat_message(&mut self, text: &str) -> SessionResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput { field: "message" });
        }
        if self.chat_in_flight {
            return Err(SessionError::ChatBusy);
        }

        self.chat_in_flight = true;
        let outcome = self.run_chat_exchange(text).await;
        self.chat_in_flight = false;
        outcome
    }

    async fn run_chat_exchange(&mut self, text: &str) -> SessionResult<ChatMessage> {
        self.messages.push(ChatMessage::user(text, clock_now()));
        self.persist_chat_logs().await?;

        let request = ChatRequest {
            message: text.to_string(),
            history: self.history.clone(),
            pred_label: self.inference.as_ref().map(|r| r.pred_label.clone()),
        };

        let reply = match self.remote.chat(&request).await {
            Ok(content) => {
                self.history.push(ChatHistoryEntry::user(text));
                self.history.push(ChatHistoryEntry::assistant(&content));
                ChatMessage::agent(content, clock_now())
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind, "Chat request failed; substituting fallback reply");
                ChatMessage::agent(FALLBACK_REPLY, clock_now())
            }
        };

        self.messages.push(reply.clone());
        self.persist_chat_logs().await?;
        Ok(reply)
    }

    async fn persist_chat_logs(&self) -> SessionResult<()> {
        let messages = records::encode(keys::CHAT_MESSAGES, &self.messages)?;
        self.store.set(keys::CHAT_MESSAGES, &messages).await?;
        let history = records::encode(keys::CHAT_HISTORY, &self.history)?;
        self.store.set(keys::CHAT_HISTORY, &history).await?;
        Ok(())
    }

    /// Park a message from another screen for the chat screen to auto-send.
    /// At most one outstanding; the last writer wins.
    pub async fn queue_pending_message(&mut self, text: &str) -> SessionResult<()> {
        self.store.set(keys::PENDING_MESSAGE, text.trim()).await?;
        Ok(())
    }

    /// Drain the pending slot and auto-send its message.
    ///
    /// Read-then-delete: only the first invocation per activation observes a
    /// value; overlapping lifecycle hooks see an empty slot and no-op.
    pub async fn consume_pending_message(&mut self) -> SessionResult<Option<ChatMessage>> {
        let Some(pending) = self.store.get(keys::PENDING_MESSAGE).await? else {
            return Ok(None);
        };
        self.store.delete(keys::PENDING_MESSAGE).await?;

        if pending.trim().is_empty() {
            return Ok(None);
        }
        self.send_chat_message(&pending).await.map(Some)
    }

    /// Clear both chat logs, store and mirrors, both-or-neither.
    ///
    /// The mirrors are only dropped once both keys are gone; after a partial
    /// failure they are re-synced from the store so memory never disagrees
    /// with disk.
    pub async fn clear_chat(&mut self) -> SessionResult<()> {
        let deleted = async {
            self.store.delete(keys::CHAT_MESSAGES).await?;
            self.store.delete(keys::CHAT_HISTORY).await?;
            Ok::<(), StoreError>(())
        }
        .await;

        match deleted {
            Ok(()) => {
                self.messages.clear();
                self.history.clear();
                Ok(())
            }
            Err(e) => {
                if let Err(reload) = self.reload_chat_logs().await {
                    tracing::error!(error = %reload, "Failed to re-sync chat logs after partial clear");
                }
                Err(e.into())
            }
        }
    }

    // ==================== Accessors ====================

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn inference(&self) -> Option<&InferenceResult> {
        self.inference.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn history(&self) -> &[ChatHistoryEntry] {
        &self.history
    }

    pub fn is_chat_busy(&self) -> bool {
        self.chat_in_flight
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Display clock string for chat bubbles ("9:45 AM").
fn clock_now() -> String {
    Local::now().format("%-I:%M %p").to_string()
}
