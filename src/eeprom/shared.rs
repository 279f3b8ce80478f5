//! Critical-section sharing of one accessor.
//!
//! The accessor itself is single-threaded by design: allocator, budget, and
//! pool state mutate with no internal locking, and a multi-byte operation
//! is observable midway by a concurrent reader. When main-loop code and
//! interrupt handlers must share one device, wrap the accessor in
//! [`SharedEeprom`]: every access runs inside a critical section, so whole
//! closures serialize against each other.
//!
//! This serializes *callers*; it does not add multi-record atomicity or
//! any other transactional guarantee.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::eeprom::{device::RawStore, storage::Eeprom};

/// An [`Eeprom`] behind a critical-section mutex.
pub struct SharedEeprom<S: RawStore> {
    inner: Mutex<RefCell<Eeprom<S>>>,
}

impl<S: RawStore> SharedEeprom<S> {
    pub const fn new(eeprom: Eeprom<S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(eeprom)),
        }
    }

    /// Runs `f` with exclusive access to the accessor.
    ///
    /// # Panics
    /// Panics if called reentrantly from within another `with` closure on
    /// the same instance.
    pub fn with<R>(&self, f: impl FnOnce(&mut Eeprom<S>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Consumes the wrapper and returns the accessor.
    pub fn into_inner(self) -> Eeprom<S> {
        self.inner.into_inner().into_inner()
    }
}
