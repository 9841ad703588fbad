use std::sync::{Mutex, MutexGuard};

/// Mutex which doesn't return poisoned lock
pub struct NiceMutex<T>(Mutex<T>);

impl<T> NiceMutex<T> {
    pub fn new(t: T) -> NiceMutex<T> {
        NiceMutex(Mutex::new(t))
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        match self.0.lock() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner()
        }
    }
}
