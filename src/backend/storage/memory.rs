// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Non-overlapping IDs, one per stable structure
const KV_STORE_MEM_ID: MemoryId = MemoryId::new(1);
const SEQUENCE_MEM_ID: MemoryId = MemoryId::new(2);
const ACCOUNTS_MEM_ID: MemoryId = MemoryId::new(3);
const PROFILES_MEM_ID: MemoryId = MemoryId::new(4);
const SESSIONS_MEM_ID: MemoryId = MemoryId::new(5);
const EMAIL_INDEX_MEM_ID: MemoryId = MemoryId::new(6);
const CHAT_LOG_INDEX_MEM_ID: MemoryId = MemoryId::new(7);
const CHAT_LOG_DATA_MEM_ID: MemoryId = MemoryId::new(8);
const REMINDERS_MEM_ID: MemoryId = MemoryId::new(9);
const REMINDER_COUNTER_MEM_ID: MemoryId = MemoryId::new(10);
const PURCHASE_LOG_INDEX_MEM_ID: MemoryId = MemoryId::new(11);
const PURCHASE_LOG_DATA_MEM_ID: MemoryId = MemoryId::new(12);
const METRICS_MEM_ID: MemoryId = MemoryId::new(13);
// 14-24 reserved; 25-29 hold the config cells (see config.rs)

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

pub fn get_kv_store_memory() -> Memory {
    get_memory(KV_STORE_MEM_ID)
}

pub fn get_sequence_memory() -> Memory {
    get_memory(SEQUENCE_MEM_ID)
}

pub fn get_accounts_memory() -> Memory {
    get_memory(ACCOUNTS_MEM_ID)
}

pub fn get_profiles_memory() -> Memory {
    get_memory(PROFILES_MEM_ID)
}

pub fn get_sessions_memory() -> Memory {
    get_memory(SESSIONS_MEM_ID)
}

pub fn get_email_index_memory() -> Memory {
    get_memory(EMAIL_INDEX_MEM_ID)
}

pub fn get_chat_log_index_memory() -> Memory {
    get_memory(CHAT_LOG_INDEX_MEM_ID)
}

pub fn get_chat_log_data_memory() -> Memory {
    get_memory(CHAT_LOG_DATA_MEM_ID)
}

pub fn get_reminders_memory() -> Memory {
    get_memory(REMINDERS_MEM_ID)
}

pub fn get_reminder_counter_memory() -> Memory {
    get_memory(REMINDER_COUNTER_MEM_ID)
}

pub fn get_purchase_log_index_memory() -> Memory {
    get_memory(PURCHASE_LOG_INDEX_MEM_ID)
}

pub fn get_purchase_log_data_memory() -> Memory {
    get_memory(PURCHASE_LOG_DATA_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}
