//! Campus Core - Shared types and pure codecs.
//!
//! This crate provides the types shared across the campus portal client:
//! - `client` - Session, authorization and service pipelines
//! - `cli` - Command-line consumer
//!
//! # Architecture
//!
//! The core crate contains only types and pure codecs - no I/O, no HTTP
//! clients, no storage access. Decoding a credential or a transfer payload
//! here never touches the network or the filesystem.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the closed role enumeration
//! - [`credential`] - Bearer credential claims decoding
//! - [`transfer`] - Binary-safe textual transfer encoding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod credential;
pub mod transfer;
pub mod types;

pub use credential::{Claims, Credential, CredentialError};
pub use transfer::{
    TransferError, decode_transport, encode_display, encode_transport, split_display,
    strip_display_prefix,
};
pub use types::*;
