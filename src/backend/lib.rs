// src/backend/lib.rs

#[macro_use]
pub mod utils;

pub mod adapter;
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod shell;
pub mod storage;

use std::time::Duration;

use crate::error::CareError;
use crate::metrics::CareMetrics;
use crate::models::account::{
    Profile, Session, SignInRequest, SignUpRequest, TeamMember, TeamMemberInput, UpdateProfileRequest,
};
use crate::models::chat::{ChatMessage, ChatPost, ChatSnapshot};
use crate::models::common::{DateKey, RecordId, TimestampNs};
use crate::models::contact::{Contact, ContactInput, ContactLinks, GeoPoint, MapProvider};
use crate::models::document::{Document, DocumentInput};
use crate::models::emergency_info::{EmergencyInfo, EmergencySummary};
use crate::models::init::InitArgs;
use crate::models::note::{Note, NoteInput};
use crate::models::prescription::{Prescription, PrescriptionInput};
use crate::models::reminder::PendingReminder;
use crate::models::schedule_event::{DateMarker, ScheduleEvent, ScheduleEventInput};
use crate::models::subscription::{
    Entitlement, PendingPurchase, Product, PurchaseEvent, PurchaseResolution, RestoreResult, StoreStatus,
};
use crate::models::supply::{ActionItem, ActionItemInput, FoodInput, FoodItem, Supply, SupplyInput};
use crate::services::scheduler::MaintenanceReport;
use crate::shell::navigation::{MenuEntry, Route, Screen, Tab, TabAction};
use crate::shell::{HeaderConfig, HelpContent};
use crate::storage::config;

fn start_maintenance_timer() {
    let interval = Duration::from_secs(config::get_maintenance_interval_secs());
    ic_cdk_timers::set_timer_interval(interval, || {
        if !utils::rng::is_seeded() {
            schedule_rng_seeding();
        }
        if let Err(e) = services::scheduler::perform_maintenance(utils::time::get_current_time_ns()) {
            log_error!("Scheduled maintenance failed: {}", e);
        }
    });
    log_scheduler!("Maintenance timer set to every {}s", interval.as_secs());
}

// raw_rand is an inter-canister call, which init and post_upgrade cannot await.
fn schedule_rng_seeding() {
    ic_cdk_timers::set_timer(Duration::ZERO, || {
        ic_cdk::spawn(async {
            if let Err(e) = utils::rng::initialize_rng().await {
                log_error!("Failed to seed secret RNG: {}", e);
            }
        });
    });
}

#[ic_cdk::init]
fn init(args: InitArgs) {
    if let Err(e) = config::init_config(&args) {
        ic_cdk::trap(&format!("Invalid init arguments: {}", e));
    }
    schedule_rng_seeding();
    start_maintenance_timer();
    log_info!("Carekeeper backend canister initialized.");
}

/// Configuration lives in stable cells, so an upgrade without arguments keeps it.
#[ic_cdk::post_upgrade]
fn post_upgrade(args: Option<InitArgs>) {
    if let Some(args) = args {
        if let Err(e) = config::init_config(&args) {
            ic_cdk::trap(&format!("Invalid upgrade arguments: {}", e));
        }
    }
    // Timers and heap state do not survive an upgrade.
    schedule_rng_seeding();
    start_maintenance_timer();
    log_info!("Carekeeper backend canister upgraded.");
}

ic_cdk::export_candid!();
