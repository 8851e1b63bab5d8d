//! Session-driven owner dashboard.
//!
//! Binds a [`CollectionMirror`] to the session feed: signing in attaches the
//! listener for the new user's listings, signing out releases it and clears
//! the list.

use std::sync::Arc;

use carhub_auth::{AuthService, SessionEvent, SessionState};
use carhub_core::ListingSummary;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{CatalogError, CatalogResult};
use crate::mirror::{CollectionMirror, DeleteReport};

pub struct OwnerDashboard {
    mirror: Arc<CollectionMirror>,
    session: Mutex<SessionState>,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl OwnerDashboard {
    pub fn new(mirror: Arc<CollectionMirror>) -> Arc<Self> {
        Arc::new(Self {
            mirror,
            session: Mutex::new(SessionState::loading()),
            follower: Mutex::new(None),
        })
    }

    /// Apply the current session, then keep following `auth`'s feed until
    /// [`shutdown`](Self::shutdown) or the feed closes.
    pub async fn follow(self: &Arc<Self>, auth: &dyn AuthService) -> CatalogResult<()> {
        let mut feed = auth.on_session_change();
        let current = feed.borrow_and_update().clone();
        self.apply(&current).await?;

        let dashboard = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            while feed.changed().await.is_ok() {
                let Some(dashboard) = dashboard.upgrade() else {
                    return;
                };
                let next = feed.borrow_and_update().clone();
                // Failures are already recorded in the mirror state.
                let _ = dashboard.apply(&next).await;
            }
            tracing::debug!("session feed closed");
        });

        if let Some(previous) = self.follower.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// React to one session state.
    pub async fn apply(&self, next: &SessionState) -> CatalogResult<()> {
        let event = {
            let mut session = self.session.lock();
            let event = SessionEvent::between(&session, next);
            if !next.loading {
                *session = next.clone();
            }
            event
        };
        // The same user again only reattaches a listener that failed or ended.
        let event = event.or_else(|| match &next.user {
            Some(user) if !next.loading && !self.follows(&user.uid) => {
                Some(SessionEvent::SignedIn(user.clone()))
            }
            _ => None,
        });

        match event {
            Some(SessionEvent::SignedIn(user)) => {
                tracing::info!(uid = %user.uid, "owner signed in");
                self.mirror.subscribe(&user.uid).await
            }
            Some(SessionEvent::SignedOut) => {
                tracing::info!("owner signed out");
                self.mirror.unsubscribe();
                self.mirror.clear();
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn follows(&self, uid: &str) -> bool {
        self.mirror.is_subscribed() && self.mirror.owner_id().as_deref() == Some(uid)
    }

    /// Delete one of the signed-in owner's listings.
    pub async fn delete(&self, item: &ListingSummary) -> CatalogResult<DeleteReport> {
        let uid = self
            .session
            .lock()
            .uid()
            .map(str::to_string)
            .ok_or(CatalogError::NotAuthenticated)?;
        self.mirror.delete(&uid, item).await
    }

    pub fn session(&self) -> SessionState {
        self.session.lock().clone()
    }

    pub fn mirror(&self) -> &CollectionMirror {
        &self.mirror
    }

    pub fn changes(&self) -> watch::Receiver<crate::mirror::MirrorState> {
        self.mirror.changes()
    }

    /// Stop following the session and release the listener.
    pub fn shutdown(&self) {
        if let Some(task) = self.follower.lock().take() {
            task.abort();
        }
        self.mirror.unsubscribe();
    }
}

impl Drop for OwnerDashboard {
    fn drop(&mut self) {
        if let Some(task) = self.follower.get_mut().take() {
            task.abort();
        }
    }
}
