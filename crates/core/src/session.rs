//! Session state and the admin access gate.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The authentication state reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    /// No user is signed in.
    Anonymous,
    /// A user is signed in with the given identity.
    Identified(UserId),
}

impl Session {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Identified(_))
    }

    /// The signed-in user's identity, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Identified(uid) => Some(uid),
        }
    }
}

/// The three-way admin gate for the management view.
///
/// Modeled as a tagged variant instead of `(session_known, is_admin)`
/// booleans so the invalid combination "admin but session unknown" cannot
/// be represented. `Unknown` holds only until the session provider has
/// reported at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminAccess {
    /// The session provider has not reported yet.
    Unknown,
    /// The session is known and the user is not the administrator.
    Denied,
    /// The session is known and the user is the administrator.
    Granted(UserId),
}

impl AdminAccess {
    /// Evaluate the gate for a known session against the configured
    /// administrator identity.
    #[must_use]
    pub fn evaluate(session: &Session, admin_uid: &UserId) -> Self {
        match session.user_id() {
            Some(uid) if uid == admin_uid => Self::Granted(uid.clone()),
            _ => Self::Denied,
        }
    }

    /// Whether the gate is open.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// The administrator identity, when the gate is open.
    #[must_use]
    pub const fn granted_user(&self) -> Option<&UserId> {
        match self {
            Self::Granted(uid) => Some(uid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_id() {
        assert_eq!(Session::Anonymous.user_id(), None);
        assert_eq!(
            Session::Identified(UserId::new("u1")).user_id(),
            Some(&UserId::new("u1"))
        );
    }

    #[test]
    fn test_evaluate_grants_admin() {
        let admin = UserId::new("U1");
        let session = Session::Identified(admin.clone());
        assert_eq!(
            AdminAccess::evaluate(&session, &admin),
            AdminAccess::Granted(admin)
        );
    }

    #[test]
    fn test_evaluate_denies_other_user() {
        let admin = UserId::new("U1");
        let session = Session::Identified(UserId::new("U2"));
        assert_eq!(AdminAccess::evaluate(&session, &admin), AdminAccess::Denied);
    }

    #[test]
    fn test_evaluate_denies_anonymous() {
        let admin = UserId::new("U1");
        assert_eq!(
            AdminAccess::evaluate(&Session::Anonymous, &admin),
            AdminAccess::Denied
        );
    }
}
