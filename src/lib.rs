//! HealinMotion session core
//!
//! Client-side state machine for the activity companion: onboarding
//! progression, the persisted inference cache, and the chat transcript.
//! Screens stay presentation-only and drive everything through
//! [`session::SessionEngine`]; the backend "intelligence" lives behind
//! [`remote::RemoteService`] and durable state behind
//! [`store::KeyValueStore`].

pub mod config;
pub mod remote;
pub mod session;
pub mod store;
