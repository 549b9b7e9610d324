//! FriendZone client core.
//!
//! The screens themselves are plain view code; everything with actual
//! invariants lives here: the chat-list reconciliation store that merges
//! paginated REST pages with live socket deltas, the knock board derived
//! from the relation resolver, the shared realtime event bus, and the
//! debounced search task. All of it is driven through injected service
//! traits so tests can run without a network or a UI.

pub mod chat_store;
pub mod config;
pub mod knock_board;
pub mod realtime;
pub mod search;
pub mod services;
pub mod session;

pub use chat_store::{ChatListState, ChatPreviewStore, PageLoad};
pub use config::ClientConfig;
pub use knock_board::{KnockBoard, KnockBoardState};
pub use realtime::{bind_store, EventBus, ScreenBinding, Subscription};
pub use search::Debouncer;
pub use services::{ChatPage, ChatService, KnockService, ServiceError};
pub use session::{AuthSession, SessionHandle};
