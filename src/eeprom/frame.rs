//! Safe-mode framed records.
//!
//! A safe record is stored as `[marker][length][payload][checksum]`:
//!
//! ```text
//! offset   0         1..3          3..3+N       3+N
//!        ┌────┐ ┌───────────┐ ┌────────────┐ ┌──────┐
//!        │0xAF│ │ N (u16 LE)│ │  payload   │ │ crc8 │
//!        └────┘ └───────────┘ └────────────┘ └──────┘
//! ```
//!
//! The marker distinguishes a record from erased memory, the length field
//! catches type-size drift between writer and reader, and the CRC-8 trailer
//! catches corruption of the payload. This layout is the persisted wire
//! format; records written by earlier firmware revisions must keep reading
//! back byte for byte.
//!
//! Array elements are placed at a stride of [`SLOT_OVERHEAD`] + payload
//! length. The stride leaves one slack byte after each frame, kept for
//! compatibility with arrays already on devices in the field.

use crate::eeprom::{
    crc::crc8,
    device::RawStore,
    error::{ElementError, Error},
    storage::{Eeprom, assert_element_shape},
};

/// First byte of every safe record.
pub const START_MARKER: u8 = 0xAF;

/// Bytes a frame occupies beyond its payload: marker, length, checksum.
pub const FRAME_OVERHEAD: usize = 4;

/// Array stride overhead per element: the frame overhead plus one slack
/// byte.
pub const SLOT_OVERHEAD: usize = 5;

/// On-device size of a record holding `payload_len` payload bytes.
#[inline]
pub const fn frame_len(payload_len: usize) -> usize {
    payload_len + FRAME_OVERHEAD
}

/// Array stride for elements of `payload_len` payload bytes.
#[inline]
pub const fn slot_len(payload_len: usize) -> usize {
    payload_len + SLOT_OVERHEAD
}

impl<S: RawStore> Eeprom<S> {
    /// Writes `payload` as a safe record at `addr`.
    ///
    /// Gates bounds and budget over the whole frame before the first byte
    /// lands; a rejected write leaves the device untouched. Returns the
    /// payload byte count.
    pub fn write_record(&mut self, addr: u32, payload: &[u8]) -> Result<usize, Error> {
        if payload.is_empty() {
            return Err(Error::ZeroLength);
        }
        check_frame_payload(payload.len())?;

        self.check_write(addr, frame_len(payload.len()))?;
        self.emit_frame(addr, payload);
        Ok(payload.len())
    }

    /// Reads and validates the safe record at `addr` into `out`.
    ///
    /// `out.len()` is the expected payload size. Failures are distinct
    /// because they imply different recovery strategies:
    ///
    /// - [`Error::NotAFrame`]: no marker; the memory was never written as
    ///   a record (or the address is wrong)
    /// - [`Error::LengthMismatch`]: a record of a different size lives
    ///   here; likely a type or firmware-revision mismatch
    /// - [`Error::ChecksumMismatch`]: the payload was corrupted after it
    ///   was written; `out` holds the corrupt bytes for forensics
    ///
    /// On success returns the payload byte count.
    pub fn read_record(&self, addr: u32, out: &mut [u8]) -> Result<usize, Error> {
        if out.is_empty() {
            return Err(Error::ZeroLength);
        }
        check_frame_payload(out.len())?;
        self.check_read(addr, frame_len(out.len()))?;

        if self.store.read_byte(addr) != START_MARKER {
            return Err(Error::NotAFrame);
        }

        let mut len_bytes = [0u8; 2];
        self.load_span(addr + 1, &mut len_bytes);
        if u16::from_le_bytes(len_bytes) as usize != out.len() {
            return Err(Error::LengthMismatch);
        }

        self.load_span(addr + 3, out);

        let stored = self.store.read_byte(addr + 3 + out.len() as u32);
        if stored != crc8(out) {
            return Err(Error::ChecksumMismatch);
        }

        Ok(out.len())
    }

    /// Rewrites the record at `addr` in place, touching only bytes that
    /// changed.
    ///
    /// An update never creates a frame: the address must already hold a
    /// record whose stored length equals `payload.len()`, otherwise
    /// [`Error::NotAFrame`] / [`Error::LengthMismatch`] is returned and
    /// the device is untouched.
    ///
    /// The differing payload bytes, plus the checksum trailer if it
    /// changes, are counted first and committed to the budget as one
    /// charge, then written. Returns the bytes physically written; 0 means
    /// the device already held exactly this content.
    pub fn update_record(&mut self, addr: u32, payload: &[u8]) -> Result<usize, Error> {
        if payload.is_empty() {
            return Err(Error::ZeroLength);
        }
        check_frame_payload(payload.len())?;
        self.check_read(addr, frame_len(payload.len()))?;

        if self.store.read_byte(addr) != START_MARKER {
            return Err(Error::NotAFrame);
        }

        let mut len_bytes = [0u8; 2];
        self.load_span(addr + 1, &mut len_bytes);
        if u16::from_le_bytes(len_bytes) as usize != payload.len() {
            return Err(Error::LengthMismatch);
        }

        let crc = crc8(payload);
        let crc_addr = addr + 3 + payload.len() as u32;

        let mut changed = self.diff_span(addr + 3, payload);
        if self.store.read_byte(crc_addr) != crc {
            changed += 1;
        }
        if changed == 0 {
            return Ok(0);
        }
        self.budget.try_consume(changed)?;

        let mut written = self.emit_diff_span(addr + 3, payload);
        if self.store.read_byte(crc_addr) != crc {
            self.store.write_byte(crc_addr, crc);
            written += 1;
        }
        Ok(written)
    }

    // ---- record arrays ----

    /// Writes `data.len() / item_len` safe records at a stride of
    /// `slot_len(item_len)`.
    ///
    /// Bounds and budget are gated over the entire striped span up front:
    /// a rejection writes nothing. An empty `data` is a no-op. Returns the
    /// total payload bytes written.
    ///
    /// # Panics
    /// Panics if `item_len` is 0 or `data.len()` is not a multiple of it.
    pub fn write_records(&mut self, addr: u32, item_len: usize, data: &[u8]) -> Result<usize, Error> {
        assert_element_shape(item_len, data.len());
        if data.is_empty() {
            return Ok(0);
        }
        check_frame_payload(item_len)?;

        let count = data.len() / item_len;
        let span = (count - 1) * slot_len(item_len) + frame_len(item_len);
        self.pool.check_span(addr, span)?;
        self.budget.try_consume(count * frame_len(item_len))?;

        for (i, item) in data.chunks_exact(item_len).enumerate() {
            self.emit_frame(addr + (i * slot_len(item_len)) as u32, item);
        }
        Ok(data.len())
    }

    /// Reads `out.len() / item_len` safe records written by
    /// [`write_records`](Self::write_records).
    ///
    /// Stops at the first invalid element and reports its index and cause;
    /// elements before it are already in `out`. Returns the total payload
    /// bytes read.
    ///
    /// # Panics
    /// Panics if `item_len` is 0 or `out.len()` is not a multiple of it.
    pub fn read_records(
        &self,
        addr: u32,
        item_len: usize,
        out: &mut [u8],
    ) -> Result<usize, ElementError> {
        assert_element_shape(item_len, out.len());

        for (i, chunk) in out.chunks_exact_mut(item_len).enumerate() {
            let at = addr + (i * slot_len(item_len)) as u32;
            self.read_record(at, chunk)
                .map_err(|cause| ElementError { index: i, cause })?;
        }
        Ok(out.len())
    }

    /// Updates an array of safe records in place, element by element.
    ///
    /// Each element is diffed and charged independently; a failing element
    /// stops the walk and reports its index, leaving later elements
    /// untouched. Returns the total bytes physically written.
    ///
    /// # Panics
    /// Panics if `item_len` is 0 or `data.len()` is not a multiple of it.
    pub fn update_records(
        &mut self,
        addr: u32,
        item_len: usize,
        data: &[u8],
    ) -> Result<usize, ElementError> {
        assert_element_shape(item_len, data.len());

        let mut written = 0;
        for (i, chunk) in data.chunks_exact(item_len).enumerate() {
            let at = addr + (i * slot_len(item_len)) as u32;
            written += self
                .update_record(at, chunk)
                .map_err(|cause| ElementError { index: i, cause })?;
        }
        Ok(written)
    }

    /// Emits one frame with no gating. Callers have already charged the
    /// budget for `frame_len(payload.len())` writes.
    fn emit_frame(&mut self, addr: u32, payload: &[u8]) {
        debug_assert!(payload.len() <= u16::MAX as usize);

        self.store.write_byte(addr, START_MARKER);
        self.emit_span(addr + 1, &(payload.len() as u16).to_le_bytes());
        self.emit_span(addr + 3, payload);
        self.store
            .write_byte(addr + 3 + payload.len() as u32, crc8(payload));
    }
}

/// The length field is 16 bits; larger payloads cannot be framed.
fn check_frame_payload(len: usize) -> Result<(), Error> {
    if len > u16::MAX as usize {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eeprom::test_support::{budgeted_eeprom, test_eeprom};

    #[test]
    fn record_layout_on_device() {
        let mut eeprom = test_eeprom();

        eeprom.write_record(10, &0x1234u16.to_le_bytes()).unwrap();

        let bytes = eeprom.store().as_bytes();
        assert_eq!(bytes[10], START_MARKER);
        assert_eq!(&bytes[11..13], &[0x02, 0x00]); // length 2, little-endian
        assert_eq!(&bytes[13..15], &[0x34, 0x12]); // payload
        assert_eq!(bytes[15], crc8(&[0x34, 0x12]));

        // Frame writes charge marker + length + payload + checksum.
        assert_eq!(eeprom.written_count(), 6);
    }

    #[test]
    fn record_round_trip() {
        let mut eeprom = test_eeprom();

        eeprom.write_record(10, &0x1234u16.to_le_bytes()).unwrap();

        let mut out = [0u8; 2];
        assert_eq!(eeprom.read_record(10, &mut out).unwrap(), 2);
        assert_eq!(u16::from_le_bytes(out), 0x1234);
    }

    #[test]
    fn erased_memory_is_not_a_frame() {
        let eeprom = test_eeprom();
        let mut out = [0u8; 4];
        assert_eq!(eeprom.read_record(0, &mut out), Err(Error::NotAFrame));
    }

    #[test]
    fn size_mismatch_is_detected() {
        let mut eeprom = test_eeprom();
        eeprom.write_record(0, &[0x01, 0x02, 0x03, 0x04]).unwrap();

        let mut two = [0u8; 2];
        assert_eq!(eeprom.read_record(0, &mut two), Err(Error::LengthMismatch));
    }

    #[test]
    fn corrupting_any_payload_byte_is_detected() {
        let payload = [0x10, 0x20, 0x30, 0x40];

        for victim in 0..payload.len() {
            let mut eeprom = test_eeprom();
            eeprom.write_record(0, &payload).unwrap();

            // Flip one payload byte behind the accessor's back.
            let at = 3 + victim as u32;
            let current = eeprom.store().read_byte(at);
            eeprom.write_block(at, &[current ^ 0x01]).unwrap();

            let mut out = [0u8; 4];
            assert_eq!(
                eeprom.read_record(0, &mut out),
                Err(Error::ChecksumMismatch),
                "flip of payload byte {} went undetected",
                victim
            );
        }
    }

    #[test]
    fn corrupting_the_checksum_byte_is_detected() {
        let mut eeprom = test_eeprom();
        eeprom.write_record(10, &0x1234u16.to_le_bytes()).unwrap();

        // Payload is 2 bytes, so the trailer lives at byte 15.
        let stored = eeprom.store().read_byte(15);
        eeprom.write_block(15, &[stored ^ 0xFF]).unwrap();

        let mut out = [0u8; 2];
        assert_eq!(eeprom.read_record(10, &mut out), Err(Error::ChecksumMismatch));
    }

    #[test]
    fn rejected_record_write_leaves_device_untouched() {
        let mut eeprom = test_eeprom();

        // Frame needs 6 bytes but only 4 remain before the pool edge.
        assert_eq!(
            eeprom.write_record(508, &[0x01, 0x02]),
            Err(Error::OutOfBounds)
        );
        assert!(eeprom.store().as_bytes()[504..].iter().all(|&b| b == 0xFF));
        assert_eq!(eeprom.written_count(), 0);
    }

    #[test]
    fn update_record_is_idempotent() {
        let mut eeprom = test_eeprom();
        let payload = [0x11, 0x22, 0x33, 0x44];

        eeprom.write_record(0, &payload).unwrap();
        let baseline = eeprom.written_count();

        assert_eq!(eeprom.update_record(0, &payload).unwrap(), 0);
        assert_eq!(eeprom.update_record(0, &payload).unwrap(), 0);
        assert_eq!(eeprom.written_count(), baseline);
    }

    #[test]
    fn update_record_writes_only_changed_bytes() {
        let mut eeprom = test_eeprom();
        eeprom.write_record(0, &[0x11, 0x22, 0x33, 0x44]).unwrap();
        let baseline = eeprom.written_count();

        // One payload byte changes; the checksum changes with it.
        let written = eeprom.update_record(0, &[0x11, 0x22, 0x33, 0x99]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(eeprom.written_count(), baseline + 2);

        let mut out = [0u8; 4];
        eeprom.read_record(0, &mut out).unwrap();
        assert_eq!(out, [0x11, 0x22, 0x33, 0x99]);
    }

    #[test]
    fn update_refuses_where_no_record_exists() {
        let mut eeprom = test_eeprom();

        assert_eq!(
            eeprom.update_record(0, &[0x01, 0x02]),
            Err(Error::NotAFrame)
        );
        assert!(eeprom.store().as_bytes()[..8].iter().all(|&b| b == 0xFF));
        assert_eq!(eeprom.written_count(), 0);
    }

    #[test]
    fn update_refuses_a_record_of_different_size() {
        let mut eeprom = test_eeprom();
        eeprom.write_record(0, &[0x01, 0x02]).unwrap();
        let before = eeprom.written_count();

        assert_eq!(
            eeprom.update_record(0, &[0x01, 0x02, 0x03]),
            Err(Error::LengthMismatch)
        );
        assert_eq!(eeprom.written_count(), before);

        // The stored record is intact.
        let mut out = [0u8; 2];
        assert_eq!(eeprom.read_record(0, &mut out).unwrap(), 2);
    }

    #[test]
    fn update_refused_by_budget_leaves_record_intact() {
        let mut eeprom = test_eeprom();
        let payload = [0x01, 0x02, 0x03, 0x04];
        eeprom.write_record(0, &payload).unwrap();

        // All four payload bytes plus the checksum would change: 5 writes,
        // but only 1 remains in the budget.
        eeprom.set_max_writes(Some(eeprom.written_count() + 1));
        assert_eq!(
            eeprom.update_record(0, &[0xA1, 0xA2, 0xA3, 0xA4]),
            Err(Error::BudgetExhausted)
        );

        let mut out = [0u8; 4];
        eeprom.read_record(0, &mut out).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn record_array_round_trip_with_slot_stride() {
        let mut eeprom = test_eeprom();
        let items = [0xA0, 0xA1, 0xB0, 0xB1, 0xC0, 0xC1]; // three u16-sized elements

        assert_eq!(eeprom.write_records(20, 2, &items).unwrap(), 6);

        // Elements sit at stride 7 (2 payload + 5 slot overhead).
        let bytes = eeprom.store().as_bytes();
        assert_eq!(bytes[20], START_MARKER);
        assert_eq!(bytes[27], START_MARKER);
        assert_eq!(bytes[34], START_MARKER);

        let mut out = [0u8; 6];
        assert_eq!(eeprom.read_records(20, 2, &mut out).unwrap(), 6);
        assert_eq!(out, items);
    }

    #[test]
    fn record_array_budget_covers_frames_not_slack() {
        let mut eeprom = test_eeprom();

        eeprom.write_records(0, 2, &[0u8; 4]).unwrap();
        // Two frames of 6 bytes each; the slack byte is never written.
        assert_eq!(eeprom.written_count(), 12);
    }

    #[test]
    fn rejected_record_array_writes_nothing() {
        let mut eeprom = budgeted_eeprom(10);

        // Two frames cost 12 writes; the whole array is refused.
        assert_eq!(
            eeprom.write_records(0, 2, &[0u8; 4]),
            Err(Error::BudgetExhausted)
        );
        assert!(eeprom.store().as_bytes()[..16].iter().all(|&b| b == 0xFF));
        assert_eq!(eeprom.written_count(), 0);
    }

    #[test]
    fn failing_array_element_reports_its_index() {
        let mut eeprom = test_eeprom();
        let items = [0xA0, 0xA1, 0xB0, 0xB1, 0xC0, 0xC1];
        eeprom.write_records(20, 2, &items).unwrap();

        // Corrupt the payload of element 1 (frame at 27, payload at 30).
        let current = eeprom.store().read_byte(30);
        eeprom.write_block(30, &[current ^ 0x01]).unwrap();

        let mut out = [0u8; 6];
        assert_eq!(
            eeprom.read_records(20, 2, &mut out),
            Err(ElementError {
                index: 1,
                cause: Error::ChecksumMismatch
            })
        );
        // Element 0 was delivered before the walk stopped.
        assert_eq!(&out[..2], &[0xA0, 0xA1]);
    }

    #[test]
    fn update_records_accumulates_physical_writes() {
        let mut eeprom = test_eeprom();
        let items = [0xA0, 0xA1, 0xB0, 0xB1];
        eeprom.write_records(0, 2, &items).unwrap();

        // Unchanged array: zero writes.
        assert_eq!(eeprom.update_records(0, 2, &items).unwrap(), 0);

        // Change one byte of element 1: payload byte + checksum.
        let changed = [0xA0, 0xA1, 0xB0, 0xFF];
        assert_eq!(eeprom.update_records(0, 2, &changed).unwrap(), 2);

        let mut out = [0u8; 4];
        eeprom.read_records(0, 2, &mut out).unwrap();
        assert_eq!(out, changed);
    }

    #[test]
    fn update_records_refuses_where_no_array_exists() {
        let mut eeprom = test_eeprom();

        assert_eq!(
            eeprom.update_records(0, 2, &[0u8; 4]),
            Err(ElementError {
                index: 0,
                cause: Error::NotAFrame
            })
        );
    }

    #[test]
    fn empty_array_is_a_no_op() {
        let mut eeprom = test_eeprom();
        assert_eq!(eeprom.write_records(0, 2, &[]).unwrap(), 0);
        assert_eq!(eeprom.read_records(0, 2, &mut []).unwrap(), 0);
        assert_eq!(eeprom.update_records(0, 2, &[]).unwrap(), 0);
        assert_eq!(eeprom.written_count(), 0);
    }
}
