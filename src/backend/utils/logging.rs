// src/backend/utils/logging.rs
// Canister debug log. The IC system API only exists on wasm32, so native
// builds write the same lines to stderr.

pub fn emit(tag: &str, message: &str) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::println!("{} {}", tag, message);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{} {}", tag, message);
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("📝 INFO:", &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("⚠️ WARN:", &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("🔥 ERROR:", &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_scheduler {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("⚙️ SCHEDULER:", &format!($($arg)*))
    };
}
