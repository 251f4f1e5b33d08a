//! Command implementations.
//!
//! All commands share a [`Context`]: loaded configuration, one HTTP client,
//! and the rehydrated session store. Rehydration happens during context
//! construction, so every gate evaluation a command performs is meaningful.

pub mod auth;
pub mod files;
pub mod status;

use std::sync::Arc;

use thiserror::Error;

use campus_client::session::SessionStore;
use campus_client::session::record::FileCredentialStore;
use campus_client::{ClientConfig, ClientError, ConfigError, Decision, Route};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The underlying client operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A gate refused entry; carries the redirect target already reported.
    #[error("access refused, go to {0}")]
    Refused(&'static str),
    /// Invalid command-line input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shared command context.
pub struct Context {
    /// Loaded configuration.
    pub config: ClientConfig,
    /// Shared HTTP client.
    pub http: reqwest::Client,
    /// Rehydrated session store.
    pub session: Arc<SessionStore>,
}

impl Context {
    /// Load configuration, build the session store and rehydrate it.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if configuration is invalid or the persisted
    /// record cannot be cleared after a failed decode.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        let store = FileCredentialStore::new(config.credentials_path.clone());
        let session = Arc::new(SessionStore::new(Arc::new(store)));
        session.rehydrate()?;

        Ok(Self {
            config,
            http: reqwest::Client::new(),
            session,
        })
    }

    /// Evaluate a gate decision, translating a refusal into a command error
    /// after telling the user where they were redirected.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Refused`] when the decision is a redirect.
    pub fn enforce(&self, decision: Decision) -> Result<(), CommandError> {
        match decision {
            Decision::Allow => Ok(()),
            Decision::RedirectTo(Route::Login) => {
                eprintln!("Not logged in. Run `campus auth login` first.");
                Err(CommandError::Refused("login"))
            }
            Decision::RedirectTo(Route::Home) => {
                eprintln!("This view is for administrators only.");
                Err(CommandError::Refused("home"))
            }
        }
    }
}
