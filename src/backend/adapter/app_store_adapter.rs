// src/backend/adapter/app_store_adapter.rs
// App Store receipt verification over HTTP outcalls

use crate::error::CareError;
use crate::services::subscription_service::ReceiptVerifier;
use candid::Nat;
use ic_cdk::api::management_canister::http_request::{
    http_request, CanisterHttpRequestArgument, HttpHeader, HttpMethod,
};
use serde::{Deserialize, Serialize};

const PRODUCTION_VERIFY_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
const SANDBOX_VERIFY_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

/// Status the production endpoint returns for sandbox receipts.
const STATUS_SANDBOX_RECEIPT: i64 = 21007;

const HTTP_OUTCALL_CYCLES: u128 = 100_000_000;
const MAX_RESPONSE_BYTES: u64 = 1024 * 64;

#[derive(Serialize, Debug, Clone)]
struct VerifyReceiptRequest<'a> {
    #[serde(rename = "receipt-data")]
    receipt_data: &'a str,
    #[serde(rename = "exclude-old-transactions")]
    exclude_old_transactions: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceiptTransaction {
    pub product_id: String,
    pub transaction_id: String,
}

#[derive(Deserialize, Debug, Clone)]
struct VerifyReceiptResponse {
    status: i64,
    #[serde(default)]
    latest_receipt_info: Vec<ReceiptTransaction>,
}

/// Decides whether a verifyReceipt response proves `transaction_id` of `product_id`.
fn check_response(
    response: &VerifyReceiptResponse,
    product_id: &str,
    transaction_id: &str,
) -> Result<(), CareError> {
    if response.status != 0 {
        return Err(CareError::PurchaseError(format!(
            "App Store rejected the receipt (status {})",
            response.status
        )));
    }
    let found = response
        .latest_receipt_info
        .iter()
        .any(|t| t.product_id == product_id && t.transaction_id == transaction_id);
    if found {
        Ok(())
    } else {
        Err(CareError::PurchaseError(format!(
            "Receipt does not contain transaction {} for {}",
            transaction_id, product_id
        )))
    }
}

async fn post_receipt(url: &str, receipt: &str) -> Result<VerifyReceiptResponse, CareError> {
    let request_body = serde_json::to_vec(&VerifyReceiptRequest {
        receipt_data: receipt,
        exclude_old_transactions: true,
    })
    .map_err(|e| CareError::SerializationError(format!("Failed to serialize receipt request: {}", e)))?;

    let request_arg = CanisterHttpRequestArgument {
        url: url.to_string(),
        method: HttpMethod::POST,
        body: Some(request_body),
        max_response_bytes: Some(MAX_RESPONSE_BYTES),
        transform: None,
        headers: vec![HttpHeader {
            name: String::from("Content-Type"),
            value: String::from("application/json"),
        }],
    };

    log_info!("Verifying App Store receipt via {}", url);
    match http_request(request_arg, HTTP_OUTCALL_CYCLES).await {
        Ok((response,)) => {
            if response.status >= Nat::from(200u32) && response.status < Nat::from(300u32) {
                serde_json::from_slice::<VerifyReceiptResponse>(&response.body).map_err(|e| {
                    CareError::SerializationError(format!("Failed to parse verifyReceipt response: {}", e))
                })
            } else {
                Err(CareError::PurchaseError(format!(
                    "verifyReceipt returned HTTP {}: {}",
                    response.status,
                    String::from_utf8_lossy(&response.body)
                )))
            }
        }
        Err((code, msg)) => {
            log_error!("HTTP outcall failed: {:?} - {}", code, msg);
            Err(CareError::PurchaseError(format!(
                "Failed to reach the App Store: {:?} - {}",
                code, msg
            )))
        }
    }
}

/// Verifies an App Store receipt for one transaction, retrying against the
/// sandbox when the production endpoint reports a sandbox receipt.
pub async fn verify_receipt(receipt: &str, product_id: &str, transaction_id: &str) -> Result<(), CareError> {
    let mut response = post_receipt(PRODUCTION_VERIFY_URL, receipt).await?;
    if response.status == STATUS_SANDBOX_RECEIPT {
        response = post_receipt(SANDBOX_VERIFY_URL, receipt).await?;
    }
    check_response(&response, product_id, transaction_id)
}

/// `ReceiptVerifier` backed by the App Store's verifyReceipt endpoint.
pub struct AppStoreVerifier;

impl ReceiptVerifier for AppStoreVerifier {
    async fn verify(&self, receipt: &str, product_id: &str, transaction_id: &str) -> Result<(), CareError> {
        verify_receipt(receipt, product_id, transaction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: i64, txs: &[(&str, &str)]) -> VerifyReceiptResponse {
        VerifyReceiptResponse {
            status,
            latest_receipt_info: txs
                .iter()
                .map(|(p, t)| ReceiptTransaction {
                    product_id: p.to_string(),
                    transaction_id: t.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn receipt_must_contain_transaction() {
        let ok = response(0, &[("premium_monthly", "100")]);
        assert!(check_response(&ok, "premium_monthly", "100").is_ok());
        assert!(check_response(&ok, "premium_yearly", "100").is_err());
        assert!(check_response(&ok, "premium_monthly", "101").is_err());
    }

    #[test]
    fn non_zero_status_is_rejected() {
        let bad = response(21003, &[("premium_monthly", "100")]);
        assert!(matches!(
            check_response(&bad, "premium_monthly", "100"),
            Err(CareError::PurchaseError(_))
        ));
    }

    #[test]
    fn response_parses_without_receipt_info() {
        let parsed: VerifyReceiptResponse = serde_json::from_str(r#"{"status":21007}"#).unwrap();
        assert_eq!(parsed.status, STATUS_SANDBOX_RECEIPT);
        assert!(parsed.latest_receipt_info.is_empty());
    }
}
