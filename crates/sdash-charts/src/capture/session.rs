//! Scoped, reference-counted colour overrides.
//!
//! Raster capture needs every chart painted in plain colours. The override
//! is installed when the first [`CaptureSession`] for a key is acquired and
//! removed when the last one is dropped, whatever path the capture took.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Something that can apply and lift a keyed colour override.
///
/// Both calls run while the registry lock is held, so they must not call
/// back into the registry.
pub trait OverrideTarget: Sync {
    fn install_override(&self, key: &str);
    fn remove_override(&self, key: &str);
}

/// Live override keys and how many sessions hold each.
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    holders: Mutex<HashMap<String, usize>>,
}

impl OverrideRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a hold on `key`, installing the override on `target` only if
    /// nobody held it yet.
    pub fn acquire<'a, T: OverrideTarget + ?Sized>(
        &'a self,
        target: &'a T,
        key: &str,
    ) -> CaptureSession<'a, T> {
        let mut holders = self.lock();
        let count = holders.entry(key.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            tracing::debug!(key, "installing capture colour override");
            target.install_override(key);
        }
        drop(holders);
        CaptureSession {
            registry: self,
            target,
            key: key.to_string(),
        }
    }

    #[must_use]
    pub fn holders(&self, key: &str) -> usize {
        self.lock().get(key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_active(&self, key: &str) -> bool {
        self.holders(key) > 0
    }

    /// Drops one hold, removing the override from `target` when it was the
    /// last one. Returns whether the override was removed.
    fn release<T: OverrideTarget + ?Sized>(&self, target: &T, key: &str) -> bool {
        let mut holders = self.lock();
        match holders.get_mut(key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                holders.remove(key);
                tracing::debug!(key, "removing capture colour override");
                target.remove_override(key);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.holders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A held colour override. Dropping it releases the hold.
#[must_use = "the override is lifted as soon as the session is dropped"]
pub struct CaptureSession<'a, T: OverrideTarget + ?Sized> {
    registry: &'a OverrideRegistry,
    target: &'a T,
    key: String,
}

impl<T: OverrideTarget + ?Sized> CaptureSession<'_, T> {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: OverrideTarget + ?Sized> Drop for CaptureSession<'_, T> {
    fn drop(&mut self) {
        self.registry.release(self.target, &self.key);
    }
}
