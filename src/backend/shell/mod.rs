// src/backend/shell/mod.rs
// Screen chrome shared by every page: header/help and navigation

pub mod header;
pub mod navigation;

pub use header::{HeaderConfig, HelpContent, HelpDialog};
pub use navigation::{Route, Screen, Tab};
