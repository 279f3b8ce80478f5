use core::marker::PhantomData;

use crate::eeprom::{budget::WriteBudget, device::RawStore, pool::MemPool, storage::Eeprom};
use crate::eeprom::storage::assert_pool_fits;

// Builder states
pub struct NeedPool;
pub struct Ready;

/// Builder for [`Eeprom`].
///
/// The memory pool is mandatory and must be set before `build`; the write
/// ceiling is optional (unlimited by default).
pub struct EepromBuilder<S: RawStore, State> {
    store: S,
    pool: Option<MemPool>,
    max_writes: Option<u32>,
    _phantom: PhantomData<State>,
}

// Start the builder
impl<S: RawStore> EepromBuilder<S, NeedPool> {
    pub fn new(store: S) -> Self {
        EepromBuilder {
            store,
            pool: None,
            max_writes: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the pool window `[base, base + size)` the accessor may use.
    ///
    /// The allocation cursor starts at `base`.
    ///
    /// # Panics
    /// Panics if the window exceeds the device capacity.
    pub fn mem_pool(self, base: u32, size: u32) -> EepromBuilder<S, Ready> {
        assert_pool_fits(self.store.capacity(), base, size);

        EepromBuilder {
            store: self.store,
            pool: Some(MemPool::new(base, size)),
            max_writes: self.max_writes,
            _phantom: PhantomData,
        }
    }
}

// Optional settings, then build
impl<S: RawStore> EepromBuilder<S, Ready> {
    /// Caps the lifetime number of physical byte writes.
    pub fn max_writes(mut self, allowed: u32) -> Self {
        self.max_writes = Some(allowed);
        self
    }

    /// Builds the accessor.
    pub fn build(self) -> Eeprom<S> {
        Eeprom::new(
            self.store,
            self.pool.unwrap(),
            WriteBudget::new(self.max_writes),
        )
    }
}
