// src/backend/storage/chat.rs
use crate::error::CareError;
use crate::models::chat::ChatMessage;
use crate::storage::memory::{get_chat_log_data_memory, get_chat_log_index_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableLog;
use std::cell::RefCell;

thread_local! {
    /// Chat Log: append-only log of messages across all paths.
    static CHAT_LOG: RefCell<StableLog<Cbor<ChatMessage>, Memory, Memory>> = RefCell::new(
        StableLog::init(get_chat_log_index_memory(), get_chat_log_data_memory())
            .expect("Failed to initialize chat log")
    );
}

/// Appends a message. Its `seq` is set to the log position it lands at.
pub fn append_message(mut message: ChatMessage) -> Result<ChatMessage, CareError> {
    CHAT_LOG.with(|log| {
        message.seq = log.borrow().len();
        log.borrow_mut()
            .append(&Cbor(message.clone()))
            .map_err(|e| CareError::StorageError(format!("Failed to append chat message: {:?}", e)))?;
        Ok(message)
    })
}

/// Messages of one path in posting order.
pub fn messages_for_path(path: &str) -> Vec<ChatMessage> {
    CHAT_LOG.with(|log| {
        log.borrow()
            .iter()
            .map(|entry| entry.0)
            .filter(|message| message.path == path)
            .collect()
    })
}

/// Messages of one path posted at or after log position `from`.
pub fn messages_since(path: &str, from: u64) -> Vec<ChatMessage> {
    CHAT_LOG.with(|log| {
        let log = log.borrow();
        (from..log.len())
            .filter_map(|idx| log.get(idx))
            .map(|entry| entry.0)
            .filter(|message| message.path == path)
            .collect()
    })
}

pub fn log_len() -> u64 {
    CHAT_LOG.with(|log| log.borrow().len())
}
