// Session state and the auth-service seam.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The signed-in user as seen by the rest of the app.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// What the session feed delivers.
///
/// `loading` stays true until the auth service has resolved the initial
/// session; consumers should not treat `user == None` as "signed out" before
/// that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed(&self) -> bool {
        self.user.is_some()
    }

    pub fn uid(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.uid.as_str())
    }
}

/// Transition between two session states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(SessionUser),
    SignedOut,
}

impl SessionEvent {
    /// The transition from `before` to `after`, if there is one.
    ///
    /// A change of user without an intermediate sign-out is reported as
    /// `SignedIn` for the new user.
    pub fn between(before: &SessionState, after: &SessionState) -> Option<Self> {
        if after.loading {
            return None;
        }
        match (&before.user, &after.user) {
            (Some(a), Some(b)) if a.uid == b.uid => None,
            (_, Some(b)) => Some(SessionEvent::SignedIn(b.clone())),
            (Some(_), None) => Some(SessionEvent::SignedOut),
            (None, None) if before.loading => Some(SessionEvent::SignedOut),
            (None, None) => None,
        }
    }
}

/// The hosted auth service, reduced to what the catalog consumes.
pub trait AuthService: Send + Sync {
    /// Feed of session changes. The receiver starts at the current state.
    fn on_session_change(&self) -> watch::Receiver<SessionState>;

    /// Current state without subscribing.
    fn current(&self) -> SessionState {
        self.on_session_change().borrow().clone()
    }
}
