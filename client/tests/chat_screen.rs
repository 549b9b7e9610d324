//! End-to-end exercise of a chat screen session: paginated fetches merged
//! with decoded socket frames through the event bus.

use async_trait::async_trait;
use friendzone_client::{
    bind_store, AuthSession, ChatPage, ChatPreviewStore, ChatService, EventBus, SessionHandle,
};
use friendzone_social::events::decode_event;
use friendzone_social::previews::ChatPreview;
use friendzone_social::UserSummary;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

struct PagedService {
    pages: HashMap<u32, ChatPage>,
}

#[async_trait]
impl ChatService for PagedService {
    async fn get_user_chats(
        &self,
        _token: &str,
        page: u32,
    ) -> Result<ChatPage, friendzone_client::ServiceError> {
        self.pages
            .get(&page)
            .cloned()
            .ok_or_else(|| friendzone_client::ServiceError::Rejected(format!("no page {page}")))
    }
}

fn preview(id: &str, timestamp: &str, last_message: &str, unread: u32) -> ChatPreview {
    ChatPreview {
        id: id.to_string(),
        name: format!("chat-{id}"),
        avatar: None,
        last_message: last_message.to_string(),
        timestamp: timestamp.to_string(),
        unread_count: unread,
        is_restricted: false,
        first_message_by_knocker_id: None,
    }
}

fn session() -> SessionHandle {
    SessionHandle::signed_in(AuthSession {
        access_token: "token".into(),
        user: UserSummary {
            id: "u1".into(),
            username: "ada".into(),
            avatar: None,
        },
    })
}

async fn settle() {
    // Let the forwarding task drain the bus.
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn screen_session_reconciles_pages_and_socket_frames() {
    let service = Arc::new(PagedService {
        pages: HashMap::from([
            (
                1,
                ChatPage {
                    chats: vec![
                        preview("a", "2025-03-04T10:00:00Z", "hey", 0),
                        preview("b", "2025-03-03T10:00:00Z", "yo", 5),
                        preview("empty", "2025-03-05T10:00:00Z", "No messages yet", 0),
                    ],
                    total_pages: 2,
                },
            ),
            (
                2,
                ChatPage {
                    chats: vec![
                        preview("b", "2025-03-03T10:00:00Z", "yo", 5),
                        preview("c", "2025-03-02T10:00:00Z", "sup", 0),
                    ],
                    total_pages: 2,
                },
            ),
        ]),
    });

    let bus = EventBus::new(32);
    let store = ChatPreviewStore::new(session(), service);
    let binding = bind_store(&bus, store.clone());

    store.load_page(1).await.unwrap();
    store.load_page(2).await.unwrap();

    let state = store.snapshot().await;
    let ids: Vec<&str> = state.chats().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!(!state.has_more_chats());

    // A new chat lands over the socket, as a raw frame.
    let frame = serde_json::json!({
        "event": "newChat",
        "payload": {
            "id": "d",
            "name": "Dana",
            "lastMessage": "knock knock",
            "timestamp": "2025-03-06T10:00:00Z",
            "unreadCount": 1
        }
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());

    // A transient empty-body update for `b` must not blank its preview.
    let frame = serde_json::json!({
        "event": "chatPreviewUpdate",
        "payload": {"id": "b", "lastMessage": "", "unreadCount": 6}
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());

    // Someone else reading `b` must not clear our badge; our own read does.
    let frame = serde_json::json!({
        "event": "messagesRead",
        "payload": {"chatId": "b", "userId": "other"}
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());
    settle().await;

    let state = store.snapshot().await;
    assert_eq!(state.chats()[0].id, "d");
    let b = state.chats().iter().find(|c| c.id == "b").unwrap();
    assert_eq!(b.last_message, "yo");
    assert_eq!(b.unread_count, 6);

    let frame = serde_json::json!({
        "event": "messagesRead",
        "payload": {"chatId": "b", "userId": "u1"}
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());
    settle().await;

    let b = store
        .snapshot()
        .await
        .chats()
        .iter()
        .find(|c| c.id == "b")
        .cloned()
        .unwrap();
    assert_eq!(b.unread_count, 0);

    drop(binding);
    settle().await;

    // The screen unmounted: later frames no longer reach this store.
    let frame = serde_json::json!({
        "event": "chatPreviewUpdate",
        "payload": {"id": "d", "unreadCount": 99}
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());
    settle().await;

    let d = store
        .snapshot()
        .await
        .chats()
        .iter()
        .find(|c| c.id == "d")
        .cloned()
        .unwrap();
    assert_eq!(d.unread_count, 1);
}

#[tokio::test]
async fn signed_out_screen_ignores_everything() {
    let service = Arc::new(PagedService {
        pages: HashMap::new(),
    });
    let bus = EventBus::new(8);
    let store = ChatPreviewStore::new(SessionHandle::new(), service);
    let _binding = bind_store(&bus, store.clone());

    assert!(matches!(
        store.load_page(1).await,
        Ok(friendzone_client::PageLoad::Skipped)
    ));

    let frame = serde_json::json!({
        "event": "newChat",
        "payload": {
            "id": "x",
            "name": "X",
            "lastMessage": "hi",
            "timestamp": "2025-03-06T10:00:00Z"
        }
    });
    bus.publish(decode_event(&frame.to_string()).unwrap());
    settle().await;

    assert!(store.snapshot().await.chats().is_empty());
}
