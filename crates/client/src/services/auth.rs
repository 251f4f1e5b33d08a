//! Authentication against the users service.
//!
//! Login and registration both end the same way: the service hands back an
//! opaque credential, and the session store decodes it *before* persisting
//! anything. A credential that fails to decode never reaches storage.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use campus_core::Role;

use crate::error::ClientError;
use crate::session::{Identity, SessionStore};

/// Credentials for a login attempt.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// The users service's answer to a successful login or registration.
#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Fields for a registration request.
#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    user_type: &'a str,
}

/// Authentication service client.
///
/// Owns the session store reference so that every successful authentication
/// flows through the same establish-before-persist path.
pub struct AuthService {
    http: reqwest::Client,
    users_url: Url,
    session: Arc<SessionStore>,
}

impl AuthService {
    /// Create an auth client over the users service.
    #[must_use]
    pub fn new(http: reqwest::Client, users_url: Url, session: Arc<SessionStore>) -> Self {
        Self {
            http,
            users_url,
            session,
        }
    }

    /// Log in and establish a session from the returned credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] if the service refuses the credentials,
    /// [`ClientError::Network`] on transport failure, and
    /// [`ClientError::MalformedCredential`] if the returned token does not
    /// decode - in which case nothing is persisted.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Identity, ClientError> {
        let url = endpoint(&self.users_url, "login")?;
        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let body: TokenResponse = check(response).await?.json().await?;
        let identity = self.session.establish(&body.token)?;
        debug!(subject = %identity.claims.subject_id, "login succeeded");
        Ok(identity)
    }

    /// Register a new user and establish a session for it.
    ///
    /// # Errors
    ///
    /// Same failure surface as [`Self::login`].
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<Identity, ClientError> {
        let url = endpoint(&self.users_url, "users")?;
        let response = self
            .http
            .post(url)
            .json(&RegisterRequest {
                username,
                email,
                password: password.expose_secret(),
                user_type: role.as_str(),
            })
            .send()
            .await?;

        let body: TokenResponse = check(response).await?.json().await?;
        let identity = self.session.establish(&body.token)?;
        debug!(subject = %identity.claims.subject_id, "registration succeeded");
        Ok(identity)
    }

    /// Log out: drop the session identity and the persisted record together.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the persisted record cannot be
    /// removed.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()
    }
}

/// Join a path onto a service base URL.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    Ok(base.join(path)?)
}

/// Map a non-success response to [`ClientError::Api`] with the service's body.
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
