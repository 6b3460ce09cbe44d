//! Type aliases for shared state.
//!
//! The scheduler, the store backends and the controller facade all share
//! state across tokio tasks; these aliases keep the nested types readable.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Thread-safe mutable value behind a `parking_lot` mutex.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Thread-safe value with many readers and one writer.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Wrap a value as [`ThreadSafe`].
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Wrap a value as [`ThreadSafeRw`].
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_safe_shares_state() {
        let counter = thread_safe(0u32);
        let clone = counter.clone();
        *clone.lock() += 1;
        assert_eq!(*counter.lock(), 1);
    }

    #[test]
    fn test_thread_safe_rw_shares_state() {
        let speed = thread_safe_rw(128u8);
        *speed.clone().write() = 170;
        assert_eq!(*speed.read(), 170);
    }
}
