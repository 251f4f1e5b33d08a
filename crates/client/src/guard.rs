//! Authorization gates for protected routes.
//!
//! Two gate functions cover the portal's two route sets: authenticated
//! routes and elevated (management) routes. Both are pure over a session
//! snapshot and are meant to be evaluated on *every* protected entry, never
//! cached - a credential cleared mid-session is honored at the next
//! navigation.
//!
//! Neither gate consults a clock: an expired-but-structurally-valid
//! credential still passes. Only a refusing server call reveals expiry.

use crate::session::Session;

/// Redirect targets for refused navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The login page; used when no identity is present.
    Login,
    /// The authenticated landing page; used when the identity lacks the
    /// required capability.
    Home,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Entry is permitted.
    Allow,
    /// Entry is refused; the consumer should navigate to the given route.
    RedirectTo(Route),
}

impl Decision {
    /// Whether this decision permits entry.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gate for routes that require any authenticated user.
///
/// Allows iff an identity is present, regardless of role.
#[must_use]
pub fn require_authenticated(session: &Session) -> Decision {
    if session.identity.is_some() {
        Decision::Allow
    } else {
        Decision::RedirectTo(Route::Login)
    }
}

/// Gate for routes that require the elevated (administrator) role.
///
/// No identity redirects to login; a non-elevated identity redirects home;
/// an elevated identity is allowed. The role was validated case-insensitively
/// at decode time, so no string comparison happens here.
#[must_use]
pub fn require_elevated(session: &Session) -> Decision {
    match &session.identity {
        None => Decision::RedirectTo(Route::Login),
        Some(identity) if identity.claims.role.is_elevated() => Decision::Allow,
        Some(_) => Decision::RedirectTo(Route::Home),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use campus_core::Credential;
    use serde_json::json;

    fn session_with(role: Option<&str>) -> Session {
        let identity = role.map(|role| {
            let payload = URL_SAFE_NO_PAD.encode(
                serde_json::to_vec(&json!({ "user_id": 7, "user_type": role })).expect("payload"),
            );
            let credential = Credential::new(format!("hdr.{payload}.sig"));
            let claims = credential.decode().expect("decode");
            Identity { claims, credential }
        });
        Session {
            identity,
            is_loading: false,
        }
    }

    #[test]
    fn test_authenticated_gate_without_identity() {
        assert_eq!(
            require_authenticated(&session_with(None)),
            Decision::RedirectTo(Route::Login)
        );
    }

    #[test]
    fn test_authenticated_gate_allows_any_role() {
        assert_eq!(
            require_authenticated(&session_with(Some("alumno"))),
            Decision::Allow
        );
        assert_eq!(
            require_authenticated(&session_with(Some("administrador"))),
            Decision::Allow
        );
    }

    #[test]
    fn test_elevated_gate_without_identity() {
        assert_eq!(
            require_elevated(&session_with(None)),
            Decision::RedirectTo(Route::Login)
        );
    }

    #[test]
    fn test_elevated_gate_redirects_students_home() {
        assert_eq!(
            require_elevated(&session_with(Some("alumno"))),
            Decision::RedirectTo(Route::Home)
        );
    }

    #[test]
    fn test_elevated_gate_allows_mixed_case_admin() {
        // Case folding happened at decode time; the gate sees the closed enum.
        assert_eq!(
            require_elevated(&session_with(Some("Administrador"))),
            Decision::Allow
        );
    }

    #[test]
    fn test_decision_is_allowed() {
        assert!(Decision::Allow.is_allowed());
        assert!(!Decision::RedirectTo(Route::Home).is_allowed());
    }
}
