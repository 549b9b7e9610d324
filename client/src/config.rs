use std::env;
use std::time::Duration;

/// Runtime configuration for the client core.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub chat_page_size: u32,
    /// Delay before a search keystroke actually executes.
    pub search_debounce: Duration,
    /// Capacity of the realtime event bus per subscriber.
    pub event_buffer: usize,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = env::var("FRIENDZONE_API_URL")
            .unwrap_or_else(|_| "https://api.friendzone.app".to_string());
        let chat_page_size = env::var("FRIENDZONE_CHAT_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);
        let search_debounce_ms = env::var("FRIENDZONE_SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);
        let event_buffer = env::var("FRIENDZONE_EVENT_BUFFER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(64);
        Ok(Self {
            api_base_url,
            chat_page_size,
            search_debounce: Duration::from_millis(search_debounce_ms),
            event_buffer,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.friendzone.app".to_string(),
            chat_page_size: 20,
            search_debounce: Duration::from_millis(500),
            event_buffer: 64,
        }
    }
}
