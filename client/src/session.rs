//! Authenticated session state shared by every screen.

use friendzone_social::UserSummary;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Credentials of the signed-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user: UserSummary,
}

/// Process-wide handle to the current session, if any.
///
/// Data operations treat an absent session as a silent no-op, never as an
/// error: screens can race sign-out without crashing.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a handle that is already signed in.
    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    pub async fn sign_in(&self, session: AuthSession) {
        *self.inner.write().await = Some(session);
    }

    pub async fn sign_out(&self) {
        *self.inner.write().await = None;
    }

    /// Current credentials, or `None` when signed out.
    pub async fn credentials(&self) -> Option<AuthSession> {
        self.inner.read().await.clone()
    }

    pub async fn current_user_id(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|s| s.user.id.clone())
    }
}
