pub mod budget;
pub mod builder;
pub mod crc;
pub mod device;
pub mod error;
pub mod frame;
pub(crate) mod pool;
mod scalar;
pub mod shared;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use builder::EepromBuilder;
pub use crc::crc8;
pub use device::{MemStore, RawStore};
pub use error::{ElementError, Error};
pub use frame::{FRAME_OVERHEAD, SLOT_OVERHEAD, START_MARKER, frame_len, slot_len};
pub use shared::SharedEeprom;
pub use storage::Eeprom;

pub mod prelude {
    pub use super::{
        ElementError, Eeprom, EepromBuilder, Error, FRAME_OVERHEAD, MemStore, RawStore,
        SLOT_OVERHEAD, START_MARKER, SharedEeprom, crc8, frame_len, slot_len,
    };
}
