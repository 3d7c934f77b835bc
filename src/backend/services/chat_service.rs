// src/backend/services/chat_service.rs
// Shared caregiver chat with change-driven polling

use crate::error::CareError;
use crate::metrics;
use crate::models::chat::{ChatMessage, ChatPost, ChatSnapshot};
use crate::models::common::{OwnerId, TimestampNs};
use crate::storage::chat;
use crate::utils::rate_limit::{rate_guard, RateScope};
use crate::utils::validation::validate_input;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    // Live subscriptions per path. Cleared on upgrade.
    static SUBSCRIBERS: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());
    // Subscriptions opened through the canister API, one per caller and path.
    static CALLER_SUBSCRIPTIONS: RefCell<HashMap<(OwnerId, String), ChatSubscription>> =
        RefCell::new(HashMap::new());
}

/// Appends a message to `post.path` on behalf of `poster`.
pub fn push(poster: &str, post: ChatPost, now: TimestampNs) -> Result<ChatMessage, CareError> {
    validate_input(&post)?;
    rate_guard(RateScope::ChatPost, poster, now)?;
    let message = chat::append_message(ChatMessage {
        seq: 0,
        path: post.path,
        sender: post.sender.trim().to_string(),
        text: post.text,
        timestamp: now,
    })?;
    metrics::record_chat_message();
    Ok(message)
}

/// The full message list of `path`.
pub fn snapshot(path: &str) -> ChatSnapshot {
    ChatSnapshot {
        messages: chat::messages_for_path(path),
        log_len: chat::log_len(),
    }
}

/// Messages of `path` appended at or after log position `since`.
pub fn messages_since(path: &str, since: u64) -> ChatSnapshot {
    ChatSnapshot {
        messages: chat::messages_since(path, since),
        log_len: chat::log_len(),
    }
}

pub fn subscriber_count(path: &str) -> usize {
    SUBSCRIBERS.with(|subs| subs.borrow().get(path).copied().unwrap_or(0))
}

/// A live view of one chat path. The first poll yields the current
/// snapshot; later polls yield a snapshot only when the path changed.
/// Dropping the subscription unsubscribes.
pub struct ChatSubscription {
    path: String,
    seen_len: Option<u64>,
}

impl ChatSubscription {
    pub fn subscribe(path: &str) -> Self {
        SUBSCRIBERS.with(|subs| *subs.borrow_mut().entry(path.to_string()).or_insert(0) += 1);
        ChatSubscription {
            path: path.to_string(),
            seen_len: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn poll(&mut self) -> Option<ChatSnapshot> {
        let len = chat::log_len();
        let changed = match self.seen_len {
            None => true,
            Some(seen) => !chat::messages_since(&self.path, seen).is_empty(),
        };
        self.seen_len = Some(len);
        changed.then(|| snapshot(&self.path))
    }
}

impl Drop for ChatSubscription {
    fn drop(&mut self) {
        SUBSCRIBERS.with(|subs| {
            let mut subs = subs.borrow_mut();
            if let Some(count) = subs.get_mut(&self.path) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    subs.remove(&self.path);
                }
            }
        });
    }
}

/// Opens (or restarts) `owner`'s subscription to `path`. The next poll
/// returns the full snapshot.
pub fn subscribe_caller(owner: &str, path: &str) {
    let subscription = ChatSubscription::subscribe(path);
    // The replaced subscription is dropped outside the borrow, since its Drop touches SUBSCRIBERS.
    let previous = CALLER_SUBSCRIPTIONS.with(|subs| {
        subs.borrow_mut()
            .insert((owner.to_string(), path.to_string()), subscription)
    });
    drop(previous);
}

/// Polls `owner`'s subscription to `path`.
///
/// # Errors
///
/// `RecordNotFound` when the caller never subscribed to `path`.
pub fn poll_caller(owner: &str, path: &str) -> Result<Option<ChatSnapshot>, CareError> {
    CALLER_SUBSCRIPTIONS.with(|subs| {
        subs.borrow_mut()
            .get_mut(&(owner.to_string(), path.to_string()))
            .map(ChatSubscription::poll)
            .ok_or_else(|| CareError::RecordNotFound(format!("No chat subscription to {}", path)))
    })
}

/// Closes `owner`'s subscription to `path`. Returns whether one was open.
pub fn unsubscribe_caller(owner: &str, path: &str) -> bool {
    let removed = CALLER_SUBSCRIPTIONS.with(|subs| {
        subs.borrow_mut()
            .remove(&(owner.to_string(), path.to_string()))
    });
    removed.is_some()
}
