//! Unified error handling for the client pipelines.
//!
//! Every failure in this crate either clears the affected state (credentials)
//! or aborts the operation with no partial effects (file transfer). Nothing
//! here is fatal to the process; the worst case is a forced return to the
//! login gate.

use std::path::PathBuf;

use thiserror::Error;

use campus_core::{CredentialError, TransferError};

use crate::session::record::StorageError;

/// Client-level error type covering the session and transfer pipelines.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A credential failed structural decoding.
    ///
    /// Persisted credential state is cleared by the session store before this
    /// surfaces, so the caller's only recovery is re-login.
    #[error("malformed credential: {0}")]
    MalformedCredential(#[from] CredentialError),

    /// A local file read failed before anything was sent.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An inbound transfer payload was malformed; no file was written.
    #[error("malformed transfer payload: {0}")]
    Decode(#[from] TransferError),

    /// The network request itself failed. Opaque; retries belong to the caller.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A service answered with a non-success status.
    #[error("service error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the service.
        message: String,
    },

    /// The durable credential record could not be read or written.
    #[error("credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// A service endpoint URL could not be built.
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The requested resource does not exist on the service.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation is missing an authenticated session.
    #[error("no authenticated session")]
    NotAuthenticated,

    /// The operation's owner went away; the completed result was discarded.
    #[error("operation cancelled")]
    Cancelled,

    /// A local file write failed after a successful decode.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Destination path that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
