//! The admin login flow.
//!
//! Login is the one workflow that couples navigation to an outcome: a
//! successful sign-in jumps straight to the management view as a UX
//! shortcut. The manage gate itself is still derived from the session
//! feed, so the shortcut grants nothing the session doesn't.

use parts_pro_core::UserId;

use crate::providers::{CredentialError, SessionProvider};
use crate::router::{Router, View};

/// Sign in and, on success, navigate to the management view.
///
/// The caller keeps pumping the provider's session feed into
/// [`Router::on_session`]; this function never touches the router's
/// session state directly.
///
/// # Errors
///
/// Returns the provider's [`CredentialError`]; render it with
/// [`CredentialError::user_message`].
pub async fn sign_in<P: SessionProvider>(
    router: &mut Router,
    provider: &P,
    email: &str,
    password: &str,
) -> Result<UserId, CredentialError> {
    let uid = provider.sign_in(email, password).await?;
    router.navigate(View::Manage);
    Ok(uid)
}

#[cfg(test)]
mod tests {
    use super::*;

    use parts_pro_core::{AdminAccess, Session};

    use crate::providers::memory::MemorySessions;
    use crate::router::Page;

    #[tokio::test]
    async fn test_successful_login_navigates_to_manage() {
        let sessions = MemorySessions::new();
        sessions.register("admin@example.com", "hunter2", "U1");
        let mut router = Router::new(UserId::new("U1"));

        let uid = sign_in(&mut router, &sessions, "admin@example.com", "hunter2")
            .await
            .expect("sign-in succeeds");
        assert_eq!(uid, UserId::new("U1"));
        assert_eq!(router.view(), View::Manage);

        // Until the session feed is pumped, the gate is still closed; the
        // shortcut only moved the navigation target.
        assert_eq!(router.page(), Page::Manage(AdminAccess::Unknown));

        router.on_session(sessions.sessions().borrow().clone());
        assert_eq!(
            router.page(),
            Page::Manage(AdminAccess::Granted(UserId::new("U1")))
        );
    }

    #[tokio::test]
    async fn test_failed_login_stays_put() {
        let sessions = MemorySessions::new();
        sessions.register("admin@example.com", "hunter2", "U1");
        let mut router = Router::new(UserId::new("U1"));
        router.navigate(View::Login);

        let err = sign_in(&mut router, &sessions, "admin@example.com", "wrong")
            .await
            .expect_err("wrong password");
        assert_eq!(err, CredentialError::InvalidCredentials);
        assert_eq!(err.user_message(), "Invalid email or password.");
        assert_eq!(router.view(), View::Login);
        assert_eq!(*router.session(), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_non_admin_login_reaches_manage_but_denied() {
        let sessions = MemorySessions::new();
        sessions.register("user@example.com", "pw", "U2");
        let mut router = Router::new(UserId::new("U1"));

        sign_in(&mut router, &sessions, "user@example.com", "pw")
            .await
            .expect("sign-in succeeds");
        router.on_session(sessions.sessions().borrow().clone());
        assert_eq!(router.page(), Page::Manage(AdminAccess::Denied));
    }
}
