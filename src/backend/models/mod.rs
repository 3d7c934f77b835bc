pub mod account;
pub mod chat;
pub mod common;
pub mod contact;
pub mod document;
pub mod emergency_info;
pub mod init;
pub mod note;
pub mod prescription;
pub mod reminder;
pub mod schedule_event;
pub mod subscription;
pub mod supply;

// Re-export common types/enums for easier access
pub use common::*;
