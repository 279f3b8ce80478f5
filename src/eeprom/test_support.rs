//! Test support utilities - only compiled in test builds.

use crate::eeprom::{builder::EepromBuilder, device::MemStore, storage::Eeprom};

/// Standard test device: 512 bytes, fully pooled.
pub type TestStore = MemStore<512>;

/// Accessor over a fresh erased device, pool `[0, 512)`, no write ceiling.
pub fn test_eeprom() -> Eeprom<TestStore> {
    EepromBuilder::new(TestStore::new()).mem_pool(0, 512).build()
}

/// Accessor as [`test_eeprom`] but with a write ceiling.
pub fn budgeted_eeprom(max_writes: u32) -> Eeprom<TestStore> {
    EepromBuilder::new(TestStore::new())
        .mem_pool(0, 512)
        .max_writes(max_writes)
        .build()
}
