// src/backend/services/needs_service.rs
// The "action needed" restock list fed from supplies and food items

use crate::error::CareError;
use crate::metrics;
use crate::models::common::TimestampNs;
use crate::models::supply::{ActionItem, FoodItem, Supply};
use crate::services::records_service;
use crate::storage::collection::RecordCollection;
use crate::storage::kv_store::KeyValueStore;
use crate::utils::crypto::next_record_id;

fn append_action<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    item: ActionItem,
) -> Result<ActionItem, CareError> {
    let mut actions = RecordCollection::<ActionItem, S>::open(store, owner)?;
    actions.add(item.clone())?;
    metrics::record_write();
    log_info!("Marked {} as needed for {}", item.title, owner);
    Ok(item)
}

/// Copies supply `supply_id` onto the action list with quantity 1.
pub fn mark_supply_needed<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    supply_id: &str,
    now: TimestampNs,
) -> Result<ActionItem, CareError> {
    let supply = records_service::get::<Supply, S>(store, owner, supply_id)?;
    let item = ActionItem::from_supply(next_record_id(now)?, &supply);
    append_action(store, owner, item)
}

/// Copies food item `food_id` onto the action list with quantity 1.
pub fn mark_food_needed<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    food_id: &str,
    now: TimestampNs,
) -> Result<ActionItem, CareError> {
    let food = records_service::get::<FoodItem, S>(store, owner, food_id)?;
    let item = ActionItem::from_food(next_record_id(now)?, &food);
    append_action(store, owner, item)
}

/// Sets how many units of an action item are needed.
pub fn set_quantity<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    id: &str,
    quantity: u32,
) -> Result<ActionItem, CareError> {
    if quantity == 0 {
        return Err(CareError::InvalidInput(
            "Quantity must be at least 1; remove the item instead".to_string(),
        ));
    }
    let mut actions = RecordCollection::<ActionItem, S>::open(store, owner)?;
    let mut item = actions
        .get(id)
        .cloned()
        .ok_or_else(|| CareError::RecordNotFound(format!("{} in {}", id, actions.key())))?;
    item.quantity = quantity;
    actions.update(id, item.clone())?;
    metrics::record_write();
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supply::{ActionItemInput, FoodInput, SupplyInput};
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;

    fn gloves() -> SupplyInput {
        SupplyInput {
            title: "Gloves".to_string(),
            description: "Nitrile".to_string(),
            size: "M".to_string(),
            source: "Pharmacy".to_string(),
            image: None,
        }
    }

    #[test]
    fn marking_twice_appends_two_entries() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let supply = records_service::create(&mut store, "alice", gloves(), 1).unwrap();
        let first = mark_supply_needed(&mut store, "alice", &supply.id, 2).unwrap();
        let second = mark_supply_needed(&mut store, "alice", &supply.id, 3).unwrap();
        assert_ne!(first.id, second.id);
        assert_ne!(first.id, supply.id);

        let actions = records_service::list::<ActionItem, _>(&mut store, "alice").unwrap();
        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.quantity == 1 && a.title == "Gloves" && a.size == "M"));
    }

    #[test]
    fn food_copies_into_action_list() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let food = records_service::create(
            &mut store,
            "alice",
            FoodInput {
                title: "Applesauce".to_string(),
                description: "No sugar".to_string(),
                source: "Grocer".to_string(),
                food_type: "Snack".to_string(),
                image: None,
            },
            1,
        )
        .unwrap();
        let item = mark_food_needed(&mut store, "alice", &food.id, 2).unwrap();
        assert_eq!(item.title, "Applesauce");
        assert_eq!(item.source, "Grocer");
    }

    #[test]
    fn unknown_supply_is_not_found() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        assert!(matches!(
            mark_supply_needed(&mut store, "alice", "nope", 1),
            Err(CareError::RecordNotFound(_))
        ));
    }

    #[test]
    fn quantity_updates_in_place() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let supply = records_service::create(&mut store, "alice", gloves(), 1).unwrap();
        let item = mark_supply_needed(&mut store, "alice", &supply.id, 2).unwrap();
        assert_eq!(set_quantity(&mut store, "alice", &item.id, 4).unwrap().quantity, 4);
        assert!(set_quantity(&mut store, "alice", &item.id, 0).is_err());
    }

    #[test]
    fn action_item_edit_keeps_id_and_position() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let supply = records_service::create(&mut store, "alice", gloves(), 1).unwrap();
        let first = mark_supply_needed(&mut store, "alice", &supply.id, 2).unwrap();
        mark_supply_needed(&mut store, "alice", &supply.id, 3).unwrap();

        let edit = ActionItemInput {
            title: "Gloves (large box)".to_string(),
            description: "Nitrile".to_string(),
            size: "L".to_string(),
            source: "Pharmacy".to_string(),
            quantity: 2,
            image: None,
        };
        let edited = records_service::update(&mut store, "alice", &first.id, edit.clone()).unwrap();
        assert_eq!(edited.id, first.id);

        let actions = records_service::list::<ActionItem, _>(&mut store, "alice").unwrap();
        assert_eq!(actions[0], edited);
        assert_eq!(actions[0].size, "L");
        assert_eq!(actions[1].title, "Gloves");

        let zero = ActionItemInput { quantity: 0, ..edit };
        assert!(matches!(
            records_service::update(&mut store, "alice", &first.id, zero),
            Err(CareError::InvalidInput(_))
        ));
    }
}
