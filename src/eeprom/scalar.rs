//! Fixed-width scalar and bit accessors.
//!
//! Raw-mode convenience wrappers over the block operations, one set per
//! width, stored little-endian. These carry no framing; use the record
//! operations when validation on read is needed.

use crate::eeprom::{device::RawStore, error::Error, storage::Eeprom};

/// Generates read/write/update methods for one scalar type.
macro_rules! impl_scalar_ops {
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Reads a little-endian `" $type "` at `addr`."]
            pub fn [<read_ $type>](&self, addr: u32) -> Result<$type, Error> {
                let mut buf = [0u8; $size];
                self.read_block(addr, &mut buf)?;
                Ok(<$type>::from_le_bytes(buf))
            }

            #[doc = "Writes `value` as a little-endian `" $type "` at `addr`."]
            pub fn [<write_ $type>](&mut self, addr: u32, value: $type) -> Result<(), Error> {
                self.write_block(addr, &value.to_le_bytes())?;
                Ok(())
            }

            #[doc = "Updates the `" $type "` at `addr`, writing only bytes that changed."]
            #[doc = ""]
            #[doc = "Returns the number of bytes physically written (0 when the device"]
            #[doc = "already holds `value`)."]
            pub fn [<update_ $type>](&mut self, addr: u32, value: $type) -> Result<usize, Error> {
                self.update_block(addr, &value.to_le_bytes())
            }
        }
    };
}

impl<S: RawStore> Eeprom<S> {
    impl_scalar_ops!(u8, 1);
    impl_scalar_ops!(u16, 2);
    impl_scalar_ops!(u32, 4);
    impl_scalar_ops!(f32, 4);
    impl_scalar_ops!(f64, 8);

    /// Reads one bit of the byte at `addr`. `bit` counts from 0 (LSB).
    pub fn read_bit(&self, addr: u32, bit: u8) -> Result<bool, Error> {
        let mask = bit_mask(bit)?;
        let byte = self.read_u8(addr)?;
        Ok(byte & mask != 0)
    }

    /// Sets or clears one bit of the byte at `addr`.
    ///
    /// Reads the containing byte, masks the bit, and writes the byte back
    /// unconditionally (one budgeted write). Use
    /// [`update_bit`](Self::update_bit) to skip the write when the bit
    /// already has the requested value.
    pub fn write_bit(&mut self, addr: u32, bit: u8, value: bool) -> Result<(), Error> {
        let mask = bit_mask(bit)?;
        let byte = self.read_u8(addr)?;
        self.write_u8(addr, apply_mask(byte, mask, value))
    }

    /// Sets or clears one bit, writing the containing byte back only when
    /// it actually changes.
    ///
    /// Returns the number of bytes physically written (0 or 1).
    pub fn update_bit(&mut self, addr: u32, bit: u8, value: bool) -> Result<usize, Error> {
        let mask = bit_mask(bit)?;
        let byte = self.read_u8(addr)?;
        let updated = apply_mask(byte, mask, value);

        if updated == byte {
            return Ok(0);
        }
        self.write_u8(addr, updated)?;
        Ok(1)
    }
}

fn bit_mask(bit: u8) -> Result<u8, Error> {
    if bit > 7 {
        return Err(Error::OutOfBounds);
    }
    Ok(1 << bit)
}

#[inline]
fn apply_mask(byte: u8, mask: u8, value: bool) -> u8 {
    if value { byte | mask } else { byte & !mask }
}
