// src/backend/services/mod.rs

pub mod auth_service;
pub mod chat_service;
pub mod emergency_service;
pub mod needs_service;
pub mod notes_service;
pub mod notification;
pub mod prescriptions_service;
pub mod records_service;
pub mod schedule_service;
pub mod scheduler;
pub mod subscription_service;
pub mod team_service;
