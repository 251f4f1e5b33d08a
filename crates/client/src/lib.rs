//! Campus Client - session, authorization and file transfer pipelines.
//!
//! This crate is the browser-side core of the campus portal, reworked as a
//! library: it owns "who is the current user and what can they do" and the
//! binary-safe movement of course material through JSON bodies. Presentation
//! is someone else's problem - consumers (the `campus` CLI, or any other
//! front end) read session state through [`session::SessionStore`], gate
//! navigation through [`guard`], and invoke the service pipelines in
//! [`services`].
//!
//! # Lifecycle
//!
//! On startup, build a [`config::ClientConfig`], construct a `SessionStore`
//! over a [`session::record::CredentialStore`], and call
//! [`session::SessionStore::rehydrate`] exactly once. Guard decisions are
//! meaningless until rehydration completes; consumers must treat the loading
//! state as "render a placeholder, decide nothing".

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cancel;
pub mod config;
pub mod error;
pub mod guard;
pub mod services;
pub mod session;

pub use cancel::CancelHandle;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use guard::{Decision, Route, require_authenticated, require_elevated};
pub use session::{Identity, Session, SessionStore};
