//! User role enumeration.

use core::fmt;

use serde::{Deserialize, Serialize, de};

/// Error returned when a role string is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct RoleError(pub String);

/// Capability level of a portal user.
///
/// The wire form is a free-text string, but only two values are issued by the
/// auth service. Comparison is case-insensitive at the boundary: any casing of
/// `"alumno"` or `"administrador"` parses, and anything else is rejected
/// rather than passed through.
///
/// ## Examples
///
/// ```
/// use campus_core::Role;
///
/// assert_eq!(Role::parse("alumno"), Ok(Role::Student));
/// assert_eq!(Role::parse("Administrador"), Ok(Role::Administrator));
/// assert!(Role::parse("root").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Regular enrolled user (`"alumno"`).
    Student,
    /// Elevated user gating management routes (`"administrador"`).
    Administrator,
}

impl Role {
    /// Parse a role from its wire string, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError`] if the input is not a known role.
    pub fn parse(s: &str) -> Result<Self, RoleError> {
        if s.eq_ignore_ascii_case("alumno") {
            Ok(Self::Student)
        } else if s.eq_ignore_ascii_case("administrador") {
            Ok(Self::Administrator)
        } else {
            Err(RoleError(s.to_owned()))
        }
    }

    /// The canonical lowercased wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "alumno",
            Self::Administrator => "administrador",
        }
    }

    /// Whether this role carries the elevated (administrative) capability.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
