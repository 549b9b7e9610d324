//! Knock screen state: categorized relationship buckets kept live.
//!
//! Seeds from the two REST knock lists, re-derives the buckets through the
//! pure resolver, and folds in `knockStatusChanged` socket events. Mutations
//! (accept, decline, knock back) re-fetch from the server because approval
//! rules live there; the client never guesses the resulting status.

use crate::services::{KnockService, ServiceError};
use crate::session::SessionHandle;
use friendzone_social::events::ChatEvent;
use friendzone_social::knocks::{categorize_knocks, KnockBuckets};
use friendzone_social::KnockRequest;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Raw lists plus the buckets derived from them.
#[derive(Debug, Clone, Default)]
pub struct KnockBoardState {
    received: Vec<KnockRequest>,
    sent: Vec<KnockRequest>,
    buckets: KnockBuckets,
}

impl KnockBoardState {
    pub fn received(&self) -> &[KnockRequest] {
        &self.received
    }

    pub fn sent(&self) -> &[KnockRequest] {
        &self.sent
    }

    pub fn buckets(&self) -> &KnockBuckets {
        &self.buckets
    }

    fn seed(
        &mut self,
        received: Vec<KnockRequest>,
        sent: Vec<KnockRequest>,
        current_user_id: &str,
    ) {
        self.received = received;
        self.sent = sent;
        self.recategorize(current_user_id);
    }

    /// Fold in a server-side status change. Entries for the same counterparty
    /// are updated in both directions; a change for an unknown counterparty
    /// with no local entry lands in the received list so a fresh incoming
    /// knock still shows up without a refetch.
    fn apply_status_change(&mut self, knock: &KnockRequest, current_user_id: &str) {
        let mut matched = false;
        for entry in self
            .received
            .iter_mut()
            .chain(self.sent.iter_mut())
            .filter(|entry| entry.user.id == knock.user.id)
        {
            entry.status = knock.status;
            entry.timestamp = knock.timestamp.clone();
            matched = true;
        }
        if !matched {
            debug!(user_id = %knock.user.id, "knock status for unknown counterparty, inserting");
            self.received.push(knock.clone());
        }
        self.recategorize(current_user_id);
    }

    fn recategorize(&mut self, current_user_id: &str) {
        self.buckets = categorize_knocks(&self.received, &self.sent, current_user_id);
    }
}

/// Screen-scoped store for the knock screens.
#[derive(Clone)]
pub struct KnockBoard {
    session: SessionHandle,
    service: Arc<dyn KnockService>,
    state: Arc<RwLock<KnockBoardState>>,
}

impl KnockBoard {
    pub fn new(session: SessionHandle, service: Arc<dyn KnockService>) -> Self {
        Self {
            session,
            service,
            state: Arc::new(RwLock::new(KnockBoardState::default())),
        }
    }

    /// Fetch both knock lists and rebuild the buckets; a no-op when signed
    /// out. A failed fetch keeps the last known good state.
    pub async fn refresh(&self) -> Result<(), ServiceError> {
        let Some(session) = self.session.credentials().await else {
            return Ok(());
        };
        let received = self.service.get_knockers(&session.access_token).await?;
        let sent = self.service.get_knocked(&session.access_token).await?;
        self.state
            .write()
            .await
            .seed(received, sent, &session.user.id);
        Ok(())
    }

    /// Apply a realtime event; only `knockStatusChanged` concerns this board.
    pub async fn apply_event(&self, event: &ChatEvent) {
        let ChatEvent::KnockStatusChanged(knock) = event else {
            return;
        };
        let Some(user_id) = self.session.current_user_id().await else {
            return;
        };
        self.state
            .write()
            .await
            .apply_status_change(knock, &user_id);
    }

    pub async fn accept(&self, knock_id: &str) -> Result<(), ServiceError> {
        let Some(session) = self.session.credentials().await else {
            return Ok(());
        };
        self.service
            .accept_knock(knock_id, &session.access_token)
            .await?;
        self.refresh().await
    }

    pub async fn decline(&self, knock_id: &str) -> Result<(), ServiceError> {
        let Some(session) = self.session.credentials().await else {
            return Ok(());
        };
        self.service
            .decline_knock(knock_id, &session.access_token)
            .await?;
        self.refresh().await
    }

    pub async fn knock_back(&self, knock_id: &str) -> Result<(), ServiceError> {
        let Some(session) = self.session.credentials().await else {
            return Ok(());
        };
        self.service
            .knock_back(knock_id, &session.access_token)
            .await?;
        self.refresh().await
    }

    pub async fn snapshot(&self) -> KnockBoardState {
        self.state.read().await.clone()
    }
}
