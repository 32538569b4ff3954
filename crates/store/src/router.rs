//! The session-gated view router.
//!
//! Navigation and session state are independent axes: navigating never
//! consults the session, and a session transition never moves the user.
//! Gating happens at render time, through [`Router::page`], and at
//! workflow execution time, through the [`AdminAccess`] value the router
//! derives from each session report.

use parts_pro_core::{AdminAccess, Session, UserId};

use crate::providers::SessionProvider;

/// The fixed set of navigation targets. Not persisted; a full reload
/// starts back at `Home`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Catalog,
    Manage,
    About,
    Contact,
    Login,
}

/// What to render for the current navigation target.
///
/// `Manage` is the only gated target: it carries the three-way access
/// state so the caller renders exactly one of loading (`Unknown`), an
/// explicit denial (`Denied`), or the management console (`Granted`).
/// Denial is shown, never silently redirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Catalog,
    Manage(AdminAccess),
    About,
    Contact,
    Login,
}

/// The storefront's navigation and session state machine.
#[derive(Debug)]
pub struct Router {
    view: View,
    session: Session,
    access: AdminAccess,
    admin_uid: UserId,
}

impl Router {
    /// A router gated on the configured administrator identity, starting
    /// at `Home` with the session not yet known.
    #[must_use]
    pub const fn new(admin_uid: UserId) -> Self {
        Self {
            view: View::Home,
            session: Session::Anonymous,
            access: AdminAccess::Unknown,
            admin_uid,
        }
    }

    /// Set the navigation target. Never blocked; gating is applied when
    /// the target is rendered, not when it is selected.
    pub const fn navigate(&mut self, view: View) {
        self.view = view;
    }

    /// The current navigation target.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// The last session state reported by the provider.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The current admin gate.
    #[must_use]
    pub const fn access(&self) -> &AdminAccess {
        &self.access
    }

    /// Whether a user is signed in (drives the login/logout affordance).
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Apply a session report from the provider. This is the only place
    /// the gate is recomputed; after the first report the gate can never
    /// return to `Unknown`.
    pub fn on_session(&mut self, session: Session) {
        self.access = AdminAccess::evaluate(&session, &self.admin_uid);
        self.session = session;
    }

    /// Request sign-out and navigate home.
    ///
    /// Fire-and-forget: the session itself changes only when the provider
    /// reports `Anonymous` through its feed. A sign-out failure is logged,
    /// not surfaced, and does not stop the navigation.
    pub async fn logout<P: SessionProvider>(&mut self, provider: &P) {
        if let Err(err) = provider.sign_out().await {
            tracing::warn!(error = %err, "sign-out request failed");
        }
        self.navigate(View::Home);
    }

    /// Resolve the current navigation target to a renderable page.
    #[must_use]
    pub fn page(&self) -> Page {
        match self.view {
            View::Home => Page::Home,
            View::Catalog => Page::Catalog,
            View::Manage => Page::Manage(self.access.clone()),
            View::About => Page::About,
            View::Contact => Page::Contact,
            View::Login => Page::Login,
        }
    }
}
