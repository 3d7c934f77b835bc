use crate::models::common::TimestampNs;

/// Returns the current time as nanoseconds since epoch.
///
/// Inside a canister this is the Internet Computer's consensus time. Native
/// builds (unit tests, tooling) fall back to the host clock.
pub fn get_current_time_ns() -> TimestampNs {
    #[cfg(target_arch = "wasm32")]
    {
        ic_cdk::api::time()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}
