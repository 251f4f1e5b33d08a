//! Process-wide session state.
//!
//! One [`SessionStore`] per process is the single source of truth for the
//! current user. It is an explicit context object handed to consumers rather
//! than a global: one owner mutates it (login, registration, logout, and the
//! startup rehydration step), everyone else reads snapshots or subscribes for
//! change notifications.
//!
//! Writers serialize through the underlying watch channel, and every state
//! transition is published as one atomic send - a reader can never observe a
//! partial [`Identity`]. Readers never block.

pub mod record;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use campus_core::{Claims, Credential};

use crate::error::ClientError;
use record::{CredentialRecord, CredentialStore};

/// UI-facing view of the current authenticated user.
///
/// Exists if and only if a structurally valid credential is held: an
/// `Identity` is only ever built from a successful decode, with the raw
/// credential kept alongside for `Authorization` headers.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Claims decoded from the credential payload.
    pub claims: Claims,
    /// The raw credential, sent verbatim on authenticated requests.
    pub credential: Credential,
}

/// Snapshot of the session state.
#[derive(Debug, Clone)]
pub struct Session {
    /// The current user, if a valid credential is held.
    pub identity: Option<Identity>,
    /// True until rehydration has completed. While this is set, guard
    /// decisions are meaningless and consumers must render a placeholder
    /// instead of deciding anything.
    pub is_loading: bool,
}

impl Session {
    const fn loading() -> Self {
        Self {
            identity: None,
            is_loading: true,
        }
    }
}

/// Single-writer, many-readers session state over a durable credential store.
pub struct SessionStore {
    state: watch::Sender<Session>,
    store: Arc<dyn CredentialStore>,
    rehydrated: AtomicBool,
}

impl SessionStore {
    /// Create a store in the loading state, before rehydration.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            state,
            store,
            rehydrated: AtomicBool::new(false),
        }
    }

    /// Latest committed session snapshot. Never blocks.
    #[must_use]
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Observer handle for reactive consumers.
    ///
    /// The receiver yields the current snapshot immediately and a change
    /// notification for every committed transition after it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Reconstruct session state from the persisted credential record.
    ///
    /// Runs at most once per store lifetime; later calls are no-ops. If a
    /// record is present but its credential no longer decodes, the record is
    /// cleared entirely so the process does not get stuck in an
    /// invalid-credential loop, and the session ends up unauthenticated.
    /// Either way the loading flag drops, which is what makes guard
    /// decisions meaningful.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] only if clearing a bad record fails;
    /// a decode failure by itself is not an error to the caller.
    pub fn rehydrate(&self) -> Result<(), ClientError> {
        if self.rehydrated.swap(true, Ordering::AcqRel) {
            debug!("session already rehydrated; ignoring");
            return Ok(());
        }

        let outcome = match self.store.load() {
            Ok(Some(record)) => {
                let credential = Credential::new(record.token);
                match credential.decode() {
                    Ok(claims) => Some(Identity { claims, credential }),
                    Err(e) => {
                        warn!(error = %e, "persisted credential no longer decodes; clearing");
                        self.store.clear()?;
                        None
                    }
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "persisted credential record unreadable; clearing");
                self.store.clear()?;
                None
            }
        };

        self.state.send_replace(Session {
            identity: outcome,
            is_loading: false,
        });
        Ok(())
    }

    /// Install a freshly issued credential (after login or registration).
    ///
    /// The credential is decoded *before* anything is persisted: a credential
    /// that fails to decode is never written to the record, and the session
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedCredential`] if the decode fails, or
    /// [`ClientError::Storage`] if the record cannot be written.
    pub fn establish(&self, raw: &str) -> Result<Identity, ClientError> {
        let credential = Credential::from(raw);
        let claims = credential.decode()?;

        let record = CredentialRecord::new(raw.to_owned(), claims.subject_id, claims.role);
        self.store.save(&record)?;

        let identity = Identity { claims, credential };
        self.state.send_modify(|session| {
            session.identity = Some(identity.clone());
            session.is_loading = false;
        });
        debug!(subject = %identity.claims.subject_id, "session established");
        Ok(identity)
    }

    /// Drop the identity and the persisted record together (logout).
    ///
    /// After this returns, a fresh store rehydrating from the same backing
    /// storage comes up unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the record cannot be removed; the
    /// in-memory identity is dropped regardless.
    pub fn clear(&self) -> Result<(), ClientError> {
        self.state.send_modify(|session| {
            session.identity = None;
            session.is_loading = false;
        });
        self.store.clear()?;
        debug!("session cleared");
        Ok(())
    }

    /// The bearer credential of the current identity, if any.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.state.borrow().identity.as_ref().map(|i| i.credential.clone())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.identity.is_some())
            .field("is_loading", &session.is_loading)
            .finish_non_exhaustive()
    }
}
