//! Reconciliation of paginated chat listings with live socket deltas.
//!
//! REST pages and socket events interleave arbitrarily on the UI runtime, so
//! every mutation is a single synchronous transition over [`ChatListState`]
//! taken under one lock acquisition. A socket update landing between "fetch
//! completed" and "state committed" can therefore never be lost to the
//! fetch's result.

use crate::services::{ChatService, ServiceError};
use crate::session::SessionHandle;
use friendzone_social::events::{ChatEvent, ChatPreviewDelta};
use friendzone_social::previews::{compare_by_recency, has_real_activity, ChatPreview};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Pure list state for one chat screen session.
///
/// Invariants after every transition: at most one entry per id, and the list
/// is sorted newest-first with unparsable timestamps at the end.
#[derive(Debug, Clone, Default)]
pub struct ChatListState {
    chats: Vec<ChatPreview>,
    page: u32,
    total_pages: u32,
    has_more_chats: bool,
}

impl ChatListState {
    pub fn chats(&self) -> &[ChatPreview] {
        &self.chats
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more_chats(&self) -> bool {
        self.has_more_chats
    }

    /// Merge one fetched page. Page 1 replaces the whole list (first load and
    /// pull-to-refresh); later pages append whatever is not already present,
    /// so entries freshly updated by socket events are left alone.
    pub fn apply_page(&mut self, page: u32, fetched: Vec<ChatPreview>, total_pages: u32) {
        let fetched_count = fetched.len();
        let valid: Vec<ChatPreview> = fetched.into_iter().filter(has_real_activity).collect();

        if page <= 1 {
            self.chats = valid;
        } else {
            let fresh: Vec<ChatPreview> = valid
                .into_iter()
                .filter(|c| !self.chats.iter().any(|existing| existing.id == c.id))
                .collect();
            self.chats.extend(fresh);
        }

        self.page = page;
        self.total_pages = total_pages;
        self.has_more_chats = fetched_count > 0 && page < total_pages;
        self.sort();
    }

    /// Pagination stops after a failed fetch; the data already on screen is
    /// kept as-is.
    pub fn mark_fetch_failed(&mut self) {
        self.has_more_chats = false;
    }

    /// Apply one socket event. `current_user_id` scopes `messagesRead` to the
    /// viewer's own read confirmations.
    pub fn apply_event(&mut self, event: &ChatEvent, current_user_id: &str) {
        match event {
            ChatEvent::NewChat(preview) | ChatEvent::ChatCreatedConfirmation(preview) => {
                self.upsert(preview.clone());
                self.sort();
            }
            ChatEvent::ChatPreviewUpdate(delta) => {
                self.merge_update(delta);
                self.sort();
            }
            ChatEvent::MessagesRead { chat_id, user_id } => {
                if user_id == current_user_id {
                    if let Some(chat) = self.chats.iter_mut().find(|c| c.id == *chat_id) {
                        chat.unread_count = 0;
                    }
                }
            }
            // Knock state belongs to the knock board, not the chat list.
            ChatEvent::KnockStatusChanged(_) => {}
        }
    }

    fn upsert(&mut self, preview: ChatPreview) {
        match self.chats.iter_mut().find(|c| c.id == preview.id) {
            Some(existing) => *existing = preview,
            None => self.chats.insert(0, preview),
        }
    }

    fn merge_update(&mut self, delta: &ChatPreviewDelta) {
        match self.chats.iter_mut().find(|c| c.id == delta.id) {
            Some(existing) => merge_delta(existing, delta),
            None => {
                // Most likely a missed newChat while this screen was not yet
                // listening; insert what we have rather than dropping it.
                warn!(chat_id = %delta.id, "preview update for unknown chat, inserting");
                self.chats.insert(0, preview_from_delta(delta));
            }
        }
    }

    fn sort(&mut self) {
        self.chats.sort_by(compare_by_recency);
    }
}

/// Apply the fields present in `delta` over `existing`.
///
/// An absent or empty `last_message` keeps the existing text so transient
/// empty-body events cannot blank the preview; every other present field
/// overwrites. `unread_count` is authoritative from the latest event, it
/// overwrites and never accumulates.
fn merge_delta(existing: &mut ChatPreview, delta: &ChatPreviewDelta) {
    if let Some(name) = &delta.name {
        existing.name = name.clone();
    }
    if delta.avatar.is_some() {
        existing.avatar = delta.avatar.clone();
    }
    if let Some(text) = &delta.last_message {
        if !text.is_empty() {
            existing.last_message = text.clone();
        }
    }
    if let Some(ts) = &delta.timestamp {
        existing.timestamp = ts.clone();
    }
    if let Some(n) = delta.unread_count {
        existing.unread_count = n;
    }
    if let Some(r) = delta.is_restricted {
        existing.is_restricted = r;
    }
    if delta.first_message_by_knocker_id.is_some() {
        existing.first_message_by_knocker_id = delta.first_message_by_knocker_id.clone();
    }
}

fn preview_from_delta(delta: &ChatPreviewDelta) -> ChatPreview {
    ChatPreview {
        id: delta.id.clone(),
        name: delta.name.clone().unwrap_or_default(),
        avatar: delta.avatar.clone(),
        last_message: delta.last_message.clone().unwrap_or_default(),
        // An absent timestamp is unparsable and sorts last, which is the
        // right place for a chat we know nothing else about.
        timestamp: delta.timestamp.clone().unwrap_or_default(),
        unread_count: delta.unread_count.unwrap_or_default(),
        is_restricted: delta.is_restricted.unwrap_or_default(),
        first_message_by_knocker_id: delta.first_message_by_knocker_id.clone(),
    }
}

/// Outcome of [`ChatPreviewStore::load_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// Page merged into the list.
    Loaded,
    /// No session; nothing was fetched.
    Skipped,
    /// Result arrived after the screen detached and was discarded.
    Stale,
}

/// Screen-scoped store owning the chat list for one screen session.
///
/// Fetches are bound to the screen's lifetime through an epoch counter:
/// [`ChatPreviewStore::detach`] bumps the epoch, and any in-flight fetch that
/// completes afterwards is discarded instead of resurrecting a dead screen's
/// data.
#[derive(Clone)]
pub struct ChatPreviewStore {
    session: SessionHandle,
    service: Arc<dyn ChatService>,
    state: Arc<RwLock<ChatListState>>,
    epoch: Arc<AtomicU64>,
}

impl ChatPreviewStore {
    pub fn new(session: SessionHandle, service: Arc<dyn ChatService>) -> Self {
        Self {
            session,
            service,
            state: Arc::new(RwLock::new(ChatListState::default())),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch and merge one page of the chat listing.
    ///
    /// A failed fetch stops pagination but keeps the current list; the error
    /// is propagated so the screen can surface a notification.
    pub async fn load_page(&self, page: u32) -> Result<PageLoad, ServiceError> {
        let Some(session) = self.session.credentials().await else {
            return Ok(PageLoad::Skipped);
        };
        let epoch = self.epoch.load(Ordering::Acquire);

        match self.service.get_user_chats(&session.access_token, page).await {
            Ok(fetched) => {
                let mut state = self.state.write().await;
                if self.epoch.load(Ordering::Acquire) != epoch {
                    debug!(page, "discarding page fetched after screen detach");
                    return Ok(PageLoad::Stale);
                }
                state.apply_page(page, fetched.chats, fetched.total_pages);
                Ok(PageLoad::Loaded)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                if self.epoch.load(Ordering::Acquire) == epoch {
                    state.mark_fetch_failed();
                }
                Err(err)
            }
        }
    }

    /// Apply one socket event; a no-op when signed out.
    pub async fn apply_event(&self, event: &ChatEvent) {
        let Some(user_id) = self.session.current_user_id().await else {
            return;
        };
        self.state.write().await.apply_event(event, &user_id);
    }

    /// Unbind in-flight fetches from this screen session.
    pub fn detach(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Full-refresh semantics: discard in-flight fetches and clear the list.
    pub async fn reset(&self) {
        self.detach();
        *self.state.write().await = ChatListState::default();
    }

    pub async fn snapshot(&self) -> ChatListState {
        self.state.read().await.clone()
    }
}
