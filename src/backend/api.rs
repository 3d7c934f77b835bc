// src/backend/api.rs
// Candid query/update endpoints

use crate::{
    adapter::app_store_adapter::AppStoreVerifier,
    error::CareError,
    metrics::CareMetrics,
    models::account::{
        Profile, Session, SignInRequest, SignUpRequest, TeamMember, TeamMemberInput, UpdateProfileRequest,
    },
    models::chat::{ChatMessage, ChatPost, ChatSnapshot},
    models::common::{DateKey, RecordId, TimestampNs},
    models::contact::{Contact, ContactInput, ContactLinks, GeoPoint, MapProvider},
    models::document::{Document, DocumentInput},
    models::emergency_info::{EmergencyInfo, EmergencySummary},
    models::note::{Note, NoteInput},
    models::prescription::{Prescription, PrescriptionInput},
    models::reminder::PendingReminder,
    models::schedule_event::{DateMarker, ScheduleEvent, ScheduleEventInput},
    models::subscription::{
        Entitlement, PendingPurchase, Product, PurchaseEvent, PurchaseResolution, RestoreResult, StoreStatus,
    },
    models::supply::{ActionItem, ActionItemInput, FoodInput, FoodItem, Supply, SupplyInput},
    services::{
        auth_service, chat_service, emergency_service, needs_service, notes_service,
        notification::{self, ReminderOutbox},
        prescriptions_service,
        records_service::{self, RecordInput},
        schedule_service,
        scheduler::{self, MaintenanceReport},
        subscription_service, team_service,
    },
    shell::navigation::{self, MenuEntry, Route, Screen, Tab, TabAction},
    shell::{header, HeaderConfig, HelpContent},
    storage::{collection::Record, config, metrics::get_metrics as get_stored_metrics, with_kv_store},
    utils::guards::{admin_guard, caller_owner, check_cycles},
    utils::time::get_current_time_ns,
};
use ic_cdk_macros::{query, update};

// --- Generic record helpers ---

fn list_records<R: Record>() -> Result<Vec<R>, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| records_service::list::<R, _>(store, &owner))
}

fn create_record<I: RecordInput>(input: I) -> Result<I::Record, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    let now = get_current_time_ns();
    with_kv_store(|store| records_service::create(store, &owner, input, now))
}

fn update_record<I: RecordInput>(id: RecordId, input: I) -> Result<I::Record, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| records_service::update(store, &owner, &id, input))
}

fn delete_record<R: Record>(id: RecordId) -> Result<R, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| records_service::delete::<R, _>(store, &owner, &id))
}

// --- Notes ---

#[query]
fn list_notes() -> Result<Vec<Note>, CareError> {
    list_records::<Note>()
}

#[query]
fn search_notes(query: String) -> Result<Vec<Note>, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| notes_service::search_notes(store, &owner, &query))
}

#[update]
fn add_note(input: NoteInput) -> Result<Note, CareError> {
    create_record(input)
}

#[update]
fn update_note(id: RecordId, input: NoteInput) -> Result<Note, CareError> {
    update_record(id, input)
}

#[update]
fn delete_note(id: RecordId) -> Result<Note, CareError> {
    delete_record::<Note>(id)
}

// --- Contacts ---

#[query]
fn list_contacts() -> Result<Vec<Contact>, CareError> {
    list_records::<Contact>()
}

#[update]
fn add_contact(input: ContactInput) -> Result<Contact, CareError> {
    create_record(input)
}

#[update]
fn update_contact(id: RecordId, input: ContactInput) -> Result<Contact, CareError> {
    update_record(id, input)
}

#[update]
fn delete_contact(id: RecordId) -> Result<Contact, CareError> {
    delete_record::<Contact>(id)
}

/// Call, email and directions links for one contact. Directions need the
/// device's current position.
#[query]
fn contact_links(id: RecordId, origin: Option<GeoPoint>, provider: MapProvider) -> Result<ContactLinks, CareError> {
    let owner = caller_owner()?;
    let contact = with_kv_store(|store| records_service::get::<Contact, _>(store, &owner, &id))?;
    Ok(contact.links(origin, provider))
}

// --- Supplies, food and the action-needed list ---

#[query]
fn list_supplies() -> Result<Vec<Supply>, CareError> {
    list_records::<Supply>()
}

#[update]
fn add_supply(input: SupplyInput) -> Result<Supply, CareError> {
    create_record(input)
}

#[update]
fn update_supply(id: RecordId, input: SupplyInput) -> Result<Supply, CareError> {
    update_record(id, input)
}

#[update]
fn delete_supply(id: RecordId) -> Result<Supply, CareError> {
    delete_record::<Supply>(id)
}

#[update]
fn mark_supply_needed(id: RecordId) -> Result<ActionItem, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    let now = get_current_time_ns();
    with_kv_store(|store| needs_service::mark_supply_needed(store, &owner, &id, now))
}

#[query]
fn list_foods() -> Result<Vec<FoodItem>, CareError> {
    list_records::<FoodItem>()
}

#[update]
fn add_food(input: FoodInput) -> Result<FoodItem, CareError> {
    create_record(input)
}

#[update]
fn update_food(id: RecordId, input: FoodInput) -> Result<FoodItem, CareError> {
    update_record(id, input)
}

#[update]
fn delete_food(id: RecordId) -> Result<FoodItem, CareError> {
    delete_record::<FoodItem>(id)
}

#[update]
fn mark_food_needed(id: RecordId) -> Result<ActionItem, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    let now = get_current_time_ns();
    with_kv_store(|store| needs_service::mark_food_needed(store, &owner, &id, now))
}

#[query]
fn list_actions() -> Result<Vec<ActionItem>, CareError> {
    list_records::<ActionItem>()
}

#[update]
fn set_action_quantity(id: RecordId, quantity: u32) -> Result<ActionItem, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| needs_service::set_quantity(store, &owner, &id, quantity))
}

#[update]
fn update_action(id: RecordId, input: ActionItemInput) -> Result<ActionItem, CareError> {
    update_record(id, input)
}

#[update]
fn delete_action(id: RecordId) -> Result<ActionItem, CareError> {
    delete_record::<ActionItem>(id)
}

// --- Documents ---

#[query]
fn list_documents() -> Result<Vec<Document>, CareError> {
    list_records::<Document>()
}

#[update]
fn add_document(input: DocumentInput) -> Result<Document, CareError> {
    create_record(input)
}

#[update]
fn update_document(id: RecordId, input: DocumentInput) -> Result<Document, CareError> {
    update_record(id, input)
}

#[update]
fn delete_document(id: RecordId) -> Result<Document, CareError> {
    delete_record::<Document>(id)
}

// --- Prescriptions and the ambulance selection ---

#[query]
fn list_prescriptions() -> Result<Vec<Prescription>, CareError> {
    list_records::<Prescription>()
}

#[update]
fn add_prescription(input: PrescriptionInput) -> Result<Prescription, CareError> {
    create_record(input)
}

#[update]
fn update_prescription(id: RecordId, input: PrescriptionInput) -> Result<Prescription, CareError> {
    update_record(id, input)
}

#[update]
fn delete_prescription(id: RecordId) -> Result<Prescription, CareError> {
    delete_record::<Prescription>(id)
}

/// Flips prescription `id` in or out of the ambulance list. Returns whether it is now selected.
#[update]
fn toggle_ambulance_rx(id: RecordId) -> Result<bool, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| prescriptions_service::toggle_selection_by_id(store, &owner, &id))
}

#[query]
fn selected_rx_numbers() -> Result<Vec<String>, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| prescriptions_service::selected_rx_numbers(store, &owner))
}

// --- Emergency info ---

#[query]
fn get_emergency_info() -> Result<Option<EmergencyInfo>, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| emergency_service::get_info(&*store, &owner))
}

#[update]
fn save_emergency_info(info: EmergencyInfo) -> Result<EmergencyInfo, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| emergency_service::save_info(store, &owner, info))
}

#[query]
fn get_emergency_summary() -> Result<EmergencySummary, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| emergency_service::summary(store, &owner))
}

// --- Schedule ---

#[query]
fn list_schedule_events() -> Result<Vec<ScheduleEvent>, CareError> {
    list_records::<ScheduleEvent>()
}

#[query]
fn events_for_date(date: DateKey) -> Result<Vec<ScheduleEvent>, CareError> {
    let owner = caller_owner()?;
    with_kv_store(|store| schedule_service::events_on(store, &owner, &date))
}

#[query]
fn calendar_markers(selected: Option<DateKey>) -> Result<Vec<(DateKey, DateMarker)>, CareError> {
    let owner = caller_owner()?;
    let markers = with_kv_store(|store| schedule_service::calendar_markers(store, &owner, selected.as_deref()))?;
    Ok(markers.into_iter().collect())
}

#[update]
fn add_schedule_event(input: ScheduleEventInput) -> Result<ScheduleEvent, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    let now = get_current_time_ns();
    let mut outbox = ReminderOutbox::for_owner(&owner);
    with_kv_store(|store| schedule_service::add_event(store, &mut outbox, &owner, input, now))
}

/// Edits an event. Its reminder, if any, keeps the original instant.
#[update]
fn update_schedule_event(id: RecordId, input: ScheduleEventInput) -> Result<ScheduleEvent, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    with_kv_store(|store| schedule_service::update_event(store, &owner, &id, input))
}

#[update]
fn delete_schedule_event(id: RecordId) -> Result<ScheduleEvent, CareError> {
    delete_record::<ScheduleEvent>(id)
}

#[query]
fn reminder_instant(date: DateKey, time_of_day: String) -> Result<TimestampNs, CareError> {
    schedule_service::reminder_instant(&date, &time_of_day)
}

/// Hands the caller's device every reminder that is due; each is returned once.
#[update]
fn take_due_reminders() -> Result<Vec<PendingReminder>, CareError> {
    let owner = caller_owner()?;
    Ok(notification::take_due_reminders(&owner, get_current_time_ns()))
}

#[query]
fn pending_reminders() -> Result<Vec<PendingReminder>, CareError> {
    let owner = caller_owner()?;
    Ok(notification::pending_reminders(&owner))
}

// --- Chat ---

#[update]
fn post_chat_message(post: ChatPost) -> Result<ChatMessage, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    chat_service::push(&owner, post, get_current_time_ns())
}

#[query]
fn chat_snapshot(path: String) -> ChatSnapshot {
    chat_service::snapshot(&path)
}

/// Messages after the log position the device saw last.
#[query]
fn chat_messages_since(path: String, since: u64) -> ChatSnapshot {
    chat_service::messages_since(&path, since)
}

#[update]
fn chat_subscribe(path: String) -> Result<(), CareError> {
    let owner = caller_owner()?;
    chat_service::subscribe_caller(&owner, &path);
    Ok(())
}

/// The full snapshot on the first poll after subscribing, then only when the path changed.
#[update]
fn chat_poll(path: String) -> Result<Option<ChatSnapshot>, CareError> {
    let owner = caller_owner()?;
    chat_service::poll_caller(&owner, &path)
}

#[update]
fn chat_unsubscribe(path: String) -> Result<bool, CareError> {
    let owner = caller_owner()?;
    Ok(chat_service::unsubscribe_caller(&owner, &path))
}

#[query]
fn chat_subscriber_count(path: String) -> u64 {
    chat_service::subscriber_count(&path) as u64
}

// --- Account ---

#[update]
fn sign_up(req: SignUpRequest) -> Result<Profile, CareError> {
    check_cycles()?;
    auth_service::sign_up(req, get_current_time_ns())
}

#[update]
fn sign_in(req: SignInRequest) -> Result<Session, CareError> {
    check_cycles()?;
    auth_service::sign_in(req, get_current_time_ns())
}

#[query]
fn get_profile(token: String) -> Result<Profile, CareError> {
    auth_service::get_profile(&token, get_current_time_ns())
}

#[update]
fn update_profile(token: String, req: UpdateProfileRequest) -> Result<Profile, CareError> {
    check_cycles()?;
    auth_service::update_profile(&token, req, get_current_time_ns())
}

#[update]
fn sign_out(token: String) {
    auth_service::sign_out(&token)
}

#[query]
fn list_team_members(token: String) -> Result<Vec<TeamMember>, CareError> {
    let now = get_current_time_ns();
    with_kv_store(|store| team_service::list_team_members(store, &token, now))
}

#[update]
fn add_team_member(token: String, input: TeamMemberInput) -> Result<TeamMember, CareError> {
    check_cycles()?;
    let now = get_current_time_ns();
    with_kv_store(|store| team_service::add_team_member(store, &token, input, now))
}

#[update]
fn update_team_member(token: String, id: RecordId, input: TeamMemberInput) -> Result<TeamMember, CareError> {
    check_cycles()?;
    let now = get_current_time_ns();
    with_kv_store(|store| team_service::update_team_member(store, &token, &id, input, now))
}

#[update]
fn remove_team_member(token: String, id: RecordId) -> Result<TeamMember, CareError> {
    check_cycles()?;
    let now = get_current_time_ns();
    with_kv_store(|store| team_service::remove_team_member(store, &token, &id, now))
}

// --- Subscription ---

#[query]
fn store_status() -> StoreStatus {
    subscription_service::connect(config::get_platform())
}

#[query]
fn list_products(ids: Vec<String>) -> Result<Vec<Product>, CareError> {
    subscription_service::list_products(config::get_platform(), &ids)
}

#[update]
fn request_purchase(product_id: String) -> Result<Product, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    subscription_service::request_purchase(config::get_platform(), &owner, &product_id, get_current_time_ns())
}

/// Purchase listener. A successful purchase is acknowledged only after its
/// receipt verifies with the App Store.
#[update]
async fn complete_purchase(event: PurchaseEvent) -> Result<PurchaseResolution, CareError> {
    check_cycles()?;
    let owner = caller_owner()?;
    subscription_service::complete_purchase(
        &AppStoreVerifier,
        config::get_platform(),
        &owner,
        event,
        get_current_time_ns(),
    )
    .await
}

/// The product the caller started buying, if the store has not reported back yet.
#[query]
fn pending_purchase() -> Result<Option<PendingPurchase>, CareError> {
    let owner = caller_owner()?;
    Ok(subscription_service::pending_purchase(&owner))
}

#[update]
fn restore_purchases() -> Result<RestoreResult, CareError> {
    let owner = caller_owner()?;
    Ok(subscription_service::restore_purchases(
        config::get_platform(),
        &owner,
        get_current_time_ns(),
    ))
}

#[query]
fn get_entitlement() -> Result<Option<Entitlement>, CareError> {
    let owner = caller_owner()?;
    Ok(subscription_service::entitlement(
        config::get_platform(),
        &owner,
        get_current_time_ns(),
    ))
}

#[update]
fn disconnect_store() -> Result<(), CareError> {
    let owner = caller_owner()?;
    subscription_service::disconnect(&owner);
    Ok(())
}

// --- Shell ---

#[query]
fn get_header(screen: Screen) -> HeaderConfig {
    screen.header()
}

#[update]
fn open_help(screen: Screen) -> Result<Option<HelpContent>, CareError> {
    let owner = caller_owner()?;
    Ok(header::open_help(&owner, screen))
}

#[update]
fn close_help() -> Result<(), CareError> {
    let owner = caller_owner()?;
    header::close_help(&owner);
    Ok(())
}

#[query]
fn is_help_open() -> Result<bool, CareError> {
    let owner = caller_owner()?;
    Ok(header::is_help_open(&owner))
}

#[query]
fn press_tab(tab: Tab) -> TabAction {
    tab.press()
}

#[query]
fn home_menu() -> Vec<MenuEntry> {
    navigation::home_menu()
}

#[query]
fn account_options() -> Vec<MenuEntry> {
    navigation::account_options()
}

#[query]
fn parse_route(path: String) -> Option<Route> {
    Route::parse(&path)
}

// --- Admin ---

#[query(guard = "admin_guard")]
fn get_metrics() -> CareMetrics {
    get_stored_metrics()
}

#[update(guard = "admin_guard")]
fn run_maintenance() -> Result<MaintenanceReport, CareError> {
    scheduler::perform_maintenance(get_current_time_ns())
}
