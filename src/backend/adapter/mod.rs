// src/backend/adapter/mod.rs

pub mod app_store_adapter;
