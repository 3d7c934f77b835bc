use crate::models::common::{RecordId, TimestampNs};
use crate::services::records_service::RecordInput;
use crate::storage::collection::Record;
use crate::utils::validation::not_blank;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A medical or caregiving supply.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub size: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Record for Supply {
    const STORE_KEY: &'static str = "stored_supplies";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct SupplyInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub size: String,
    #[validate(custom(function = "not_blank"))]
    pub source: String,
    pub image: Option<String>,
}

impl RecordInput for SupplyInput {
    type Record = Supply;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> Supply {
        Supply {
            id,
            title: self.title,
            description: self.description,
            size: self.size,
            source: self.source,
            image: self.image,
        }
    }

    fn merge_into(self, existing: &Supply) -> Supply {
        self.into_record(existing.id.clone(), 0)
    }
}

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type", default)]
    pub food_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Record for FoodItem {
    const STORE_KEY: &'static str = "stored_foods";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct FoodInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: String,
    pub source: String,
    pub food_type: String,
    pub image: Option<String>,
}

impl RecordInput for FoodInput {
    type Record = FoodItem;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> FoodItem {
        FoodItem {
            id,
            title: self.title,
            description: self.description,
            source: self.source,
            food_type: self.food_type,
            image: self.image,
        }
    }

    fn merge_into(self, existing: &FoodItem) -> FoodItem {
        self.into_record(existing.id.clone(), 0)
    }
}

/// An entry on the "action needed" list: a supply or food item to restock.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub source: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ActionItem {
    pub fn from_supply(id: RecordId, supply: &Supply) -> Self {
        ActionItem {
            id,
            title: supply.title.clone(),
            description: supply.description.clone(),
            size: supply.size.clone(),
            source: supply.source.clone(),
            quantity: 1,
            image: supply.image.clone(),
        }
    }

    pub fn from_food(id: RecordId, food: &FoodItem) -> Self {
        ActionItem {
            id,
            title: food.title.clone(),
            description: food.description.clone(),
            size: String::new(),
            source: food.source.clone(),
            quantity: 1,
            image: food.image.clone(),
        }
    }
}

impl Record for ActionItem {
    const STORE_KEY: &'static str = "stored_actions";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Edit form of an action-needed entry.
#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ActionItemInput {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: String,
    pub size: String,
    pub source: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub image: Option<String>,
}

impl RecordInput for ActionItemInput {
    type Record = ActionItem;

    fn into_record(self, id: RecordId, _now: TimestampNs) -> ActionItem {
        ActionItem {
            id,
            title: self.title,
            description: self.description,
            size: self.size,
            source: self.source,
            quantity: self.quantity,
            image: self.image,
        }
    }

    fn merge_into(self, existing: &ActionItem) -> ActionItem {
        self.into_record(existing.id.clone(), 0)
    }
}
