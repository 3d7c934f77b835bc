// src/backend/services/subscription_service.rs
// Premium subscription catalog, purchase listener and entitlements

use crate::error::CareError;
use crate::metrics;
use crate::models::common::{OwnerId, Platform, TimestampNs};
use crate::models::subscription::{
    Entitlement, PendingPurchase, Product, PurchaseEvent, PurchaseOutcome, PurchaseRecord, PurchaseResolution,
    RestoreResult, StoreStatus, SubscriptionPeriod, FREE_TRIAL_DAYS, PREMIUM_MONTHLY, PREMIUM_YEARLY,
};
use crate::storage::purchases;
use std::cell::RefCell;
use std::collections::HashMap;

/// Proves a store receipt contains a transaction before it is acknowledged.
#[allow(async_fn_in_trait)]
pub trait ReceiptVerifier {
    async fn verify(&self, receipt: &str, product_id: &str, transaction_id: &str) -> Result<(), CareError>;
}

thread_local! {
    // Purchases requested but not yet reported by the store. Cleared on upgrade.
    static PENDING_PURCHASES: RefCell<HashMap<OwnerId, PendingPurchase>> = RefCell::new(HashMap::new());
}

/// Products the platform's store sells. Only the App Store catalog exists.
pub fn catalog(platform: Platform) -> Vec<Product> {
    match platform {
        Platform::Ios => vec![
            Product {
                product_id: PREMIUM_MONTHLY.to_string(),
                title: "Premium Monthly".to_string(),
                price_label: "$4.95 / month".to_string(),
                period: SubscriptionPeriod::Monthly,
                trial_days: FREE_TRIAL_DAYS,
            },
            Product {
                product_id: PREMIUM_YEARLY.to_string(),
                title: "Premium Yearly".to_string(),
                price_label: "$48 / year".to_string(),
                period: SubscriptionPeriod::Yearly,
                trial_days: FREE_TRIAL_DAYS,
            },
        ],
        Platform::Android | Platform::Web => Vec::new(),
    }
}

pub fn connect(platform: Platform) -> StoreStatus {
    if catalog(platform).is_empty() {
        StoreStatus::Unavailable
    } else {
        StoreStatus::Connected
    }
}

fn find_product(platform: Platform, product_id: &str) -> Result<Product, CareError> {
    catalog(platform)
        .into_iter()
        .find(|p| p.product_id == product_id)
        .ok_or_else(|| CareError::PurchaseError(format!("Unknown product {}", product_id)))
}

/// Catalog entries matching `ids`, in catalog order. No ids means the whole catalog.
pub fn list_products(platform: Platform, ids: &[String]) -> Result<Vec<Product>, CareError> {
    if connect(platform) == StoreStatus::Unavailable {
        return Err(CareError::PurchaseError(
            "Unable to connect to the store. Please try again.".to_string(),
        ));
    }
    Ok(catalog(platform)
        .into_iter()
        .filter(|p| ids.is_empty() || ids.contains(&p.product_id))
        .collect())
}

/// Records that `owner` started buying `product_id`; the store reports the
/// outcome later through `complete_purchase`.
pub fn request_purchase(
    platform: Platform,
    owner: &str,
    product_id: &str,
    now: TimestampNs,
) -> Result<Product, CareError> {
    let product = find_product(platform, product_id)?;
    PENDING_PURCHASES.with(|pending| {
        pending.borrow_mut().insert(
            owner.to_string(),
            PendingPurchase {
                product_id: product.product_id.clone(),
                requested_at: now,
            },
        )
    });
    log_info!("Purchase of {} requested by {}", product_id, owner);
    Ok(product)
}

pub fn pending_purchase(owner: &str) -> Option<PendingPurchase> {
    PENDING_PURCHASES.with(|pending| pending.borrow().get(owner).cloned())
}

fn clear_pending(owner: &str) {
    PENDING_PURCHASES.with(|pending| pending.borrow_mut().remove(owner));
}

fn entitlement_for(platform: Platform, record: &PurchaseRecord, now: TimestampNs) -> Entitlement {
    let duration = find_product(platform, &record.product_id)
        .map(|p| p.period.duration_ns())
        .unwrap_or(0);
    let expires_at = record.purchased_at.saturating_add(duration);
    Entitlement {
        product_id: record.product_id.clone(),
        active: now < expires_at,
        expires_at,
    }
}

/// Purchase listener: acknowledges new successful purchases and records the
/// outcome of cancelled or failed ones.
///
/// # Errors
///
/// `PurchaseError` when a successful outcome carries no receipt or the
/// receipt does not verify; nothing is recorded in that case.
pub async fn complete_purchase<V: ReceiptVerifier>(
    verifier: &V,
    platform: Platform,
    owner: &str,
    event: PurchaseEvent,
    now: TimestampNs,
) -> Result<PurchaseResolution, CareError> {
    match event.outcome {
        PurchaseOutcome::UserCancelled => {
            clear_pending(owner);
            log_info!("Purchase cancelled by {}", owner);
            Ok(PurchaseResolution::Cancelled)
        }
        PurchaseOutcome::Error(reason) => {
            clear_pending(owner);
            log_warn!("Purchase failed for {}: {}", owner, reason);
            Ok(PurchaseResolution::Failed(reason))
        }
        PurchaseOutcome::Ok => {
            find_product(platform, &event.product_id)?;
            if event.transaction_id.trim().is_empty() {
                return Err(CareError::PurchaseError("Missing transaction id".to_string()));
            }
            if event.acknowledged || purchases::find_transaction(owner, &event.transaction_id).is_some() {
                return Ok(PurchaseResolution::AlreadyAcknowledged);
            }
            let receipt = event
                .receipt
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| CareError::PurchaseError("Missing purchase receipt".to_string()))?;
            verifier
                .verify(receipt, &event.product_id, &event.transaction_id)
                .await?;
            let record = PurchaseRecord {
                owner: owner.to_string(),
                product_id: event.product_id,
                transaction_id: event.transaction_id,
                acknowledged: true,
                purchased_at: now,
            };
            purchases::append_purchase(record.clone())?;
            clear_pending(owner);
            metrics::record_purchase_completed();
            log_info!("Subscription {} active for {}", record.product_id, owner);
            Ok(PurchaseResolution::Activated(entitlement_for(platform, &record, now)))
        }
    }
}

/// The entitlement granted by the owner's newest acknowledged purchase.
pub fn entitlement(platform: Platform, owner: &str, now: TimestampNs) -> Option<Entitlement> {
    purchases::purchases_for(owner)
        .iter()
        .rev()
        .find(|record| record.acknowledged)
        .map(|record| entitlement_for(platform, record, now))
}

pub fn restore_purchases(platform: Platform, owner: &str, now: TimestampNs) -> RestoreResult {
    match entitlement(platform, owner, now) {
        Some(entitlement) => RestoreResult::Restored(entitlement),
        None => RestoreResult::NoPurchases,
    }
}

/// Drops any purchase the owner left in flight.
pub fn disconnect(owner: &str) {
    clear_pending(owner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::NANOS_PER_DAY;
    use futures::executor::block_on;

    /// Accepts receipts of the form "receipt:{transaction_id}".
    struct FakeStore;

    impl ReceiptVerifier for FakeStore {
        async fn verify(&self, receipt: &str, _product_id: &str, transaction_id: &str) -> Result<(), CareError> {
            if receipt == format!("receipt:{}", transaction_id) {
                Ok(())
            } else {
                Err(CareError::PurchaseError("receipt rejected".to_string()))
            }
        }
    }

    fn ok_event(product_id: &str, tx: &str) -> PurchaseEvent {
        PurchaseEvent {
            outcome: PurchaseOutcome::Ok,
            product_id: product_id.to_string(),
            transaction_id: tx.to_string(),
            receipt: Some(format!("receipt:{}", tx)),
            acknowledged: false,
        }
    }

    fn complete(owner: &str, event: PurchaseEvent, now: TimestampNs) -> Result<PurchaseResolution, CareError> {
        block_on(complete_purchase(&FakeStore, Platform::Ios, owner, event, now))
    }

    #[test]
    fn only_ios_has_a_catalog() {
        let labels: Vec<String> = catalog(Platform::Ios).into_iter().map(|p| p.price_label).collect();
        assert_eq!(labels, vec!["$4.95 / month", "$48 / year"]);
        assert_eq!(connect(Platform::Android), StoreStatus::Unavailable);
        assert!(list_products(Platform::Android, &[]).is_err());
    }

    #[test]
    fn list_products_filters_by_id() {
        let products = list_products(Platform::Ios, &[PREMIUM_YEARLY.to_string()]).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].period, SubscriptionPeriod::Yearly);
    }

    #[test]
    fn completed_purchase_grants_entitlement() {
        request_purchase(Platform::Ios, "alice", PREMIUM_MONTHLY, 1).unwrap();
        assert_eq!(
            pending_purchase("alice"),
            Some(PendingPurchase {
                product_id: PREMIUM_MONTHLY.to_string(),
                requested_at: 1,
            })
        );

        let resolution = complete("alice", ok_event(PREMIUM_MONTHLY, "t1"), 10).unwrap();
        match resolution {
            PurchaseResolution::Activated(e) => {
                assert!(e.active);
                assert_eq!(e.expires_at, 10 + 30 * NANOS_PER_DAY);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
        assert!(pending_purchase("alice").is_none());

        let later = 10 + 31 * NANOS_PER_DAY;
        assert!(!entitlement(Platform::Ios, "alice", later).unwrap().active);
    }

    #[test]
    fn repeated_transaction_is_acknowledged_once() {
        complete("alice", ok_event(PREMIUM_YEARLY, "t1"), 1).unwrap();
        assert_eq!(
            complete("alice", ok_event(PREMIUM_YEARLY, "t1"), 2).unwrap(),
            PurchaseResolution::AlreadyAcknowledged
        );
        assert_eq!(purchases::purchases_for("alice").len(), 1);
    }

    #[test]
    fn cancellation_and_errors_record_nothing() {
        request_purchase(Platform::Ios, "alice", PREMIUM_MONTHLY, 1).unwrap();
        let mut cancelled = ok_event(PREMIUM_MONTHLY, "t1");
        cancelled.outcome = PurchaseOutcome::UserCancelled;
        assert_eq!(
            complete("alice", cancelled, 2).unwrap(),
            PurchaseResolution::Cancelled
        );
        assert!(pending_purchase("alice").is_none());
        assert_eq!(restore_purchases(Platform::Ios, "alice", 3), RestoreResult::NoPurchases);
    }

    #[test]
    fn restore_finds_previous_purchase() {
        complete("alice", ok_event(PREMIUM_YEARLY, "t9"), 5).unwrap();
        match restore_purchases(Platform::Ios, "alice", 6) {
            RestoreResult::Restored(e) => assert_eq!(e.product_id, PREMIUM_YEARLY),
            other => panic!("unexpected restore: {:?}", other),
        }
        assert_eq!(restore_purchases(Platform::Ios, "bob", 6), RestoreResult::NoPurchases);
    }

    #[test]
    fn success_without_receipt_grants_nothing() {
        let mut event = ok_event(PREMIUM_YEARLY, "made-up");
        event.receipt = None;
        assert!(matches!(complete("mallory", event, 1), Err(CareError::PurchaseError(_))));
        assert!(entitlement(Platform::Ios, "mallory", 2).is_none());
    }

    #[test]
    fn unverified_receipt_grants_nothing() {
        let mut event = ok_event(PREMIUM_YEARLY, "t1");
        event.receipt = Some("receipt:someone-else".to_string());
        assert!(matches!(complete("mallory", event, 1), Err(CareError::PurchaseError(_))));
        assert!(purchases::purchases_for("mallory").is_empty());
    }

    #[test]
    fn unknown_product_cannot_be_requested() {
        assert!(matches!(
            request_purchase(Platform::Ios, "alice", "lifetime", 1),
            Err(CareError::PurchaseError(_))
        ));
    }
}
