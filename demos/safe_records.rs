//! Safe records example: framing, corruption detection, wear-free updates
//!
//! This example demonstrates:
//! - Writing values as self-validating framed records
//! - The three distinct read-failure classes and what they mean
//! - The wear-reducing in-place update
//! - Record arrays and per-element failure reporting

use embedded_eeprom::prelude::*;

fn main() {
    let mut eeprom = EepromBuilder::new(MemStore::<1024>::new())
        .mem_pool(0, 1024)
        .build();

    // A record needs its payload plus 4 bytes of framing; claim a slot.
    let config_addr = eeprom.alloc(frame_len(8) as u32);
    let config = 0x0102_0304_0506_0708u64.to_le_bytes();
    eeprom.write_record(config_addr, &config).unwrap();

    // Read back with full validation.
    let mut out = [0u8; 8];
    let n = eeprom.read_record(config_addr, &mut out).unwrap();
    println!("read {n} payload bytes: {out:02X?}");

    // --- failure classes ---

    // Erased memory has no start marker.
    let empty_addr = eeprom.alloc(frame_len(8) as u32);
    match eeprom.read_record(empty_addr, &mut out) {
        Err(Error::NotAFrame) => println!("empty slot: not a record"),
        other => println!("unexpected: {other:?}"),
    }

    // A reader expecting a different payload size is told so.
    let mut four = [0u8; 4];
    match eeprom.read_record(config_addr, &mut four) {
        Err(Error::LengthMismatch) => println!("4-byte reader refused an 8-byte record"),
        other => println!("unexpected: {other:?}"),
    }

    // Corruption of the payload is caught by the checksum trailer.
    let victim = config_addr + 5; // some payload byte
    let byte = eeprom.read_u8(victim).unwrap();
    eeprom.write_u8(victim, byte ^ 0x40).unwrap();
    match eeprom.read_record(config_addr, &mut out) {
        Err(Error::ChecksumMismatch) => println!("corrupted payload detected"),
        other => println!("unexpected: {other:?}"),
    }
    eeprom.write_u8(victim, byte).unwrap(); // repair

    // --- wear-reducing update ---

    let before = eeprom.written_count();
    let written = eeprom.update_record(config_addr, &config).unwrap();
    println!("idempotent update wrote {written} bytes");
    assert_eq!(eeprom.written_count(), before);

    // Changing one payload byte costs that byte plus the checksum.
    let mut tweaked = config;
    tweaked[0] = 0xFF;
    let written = eeprom.update_record(config_addr, &tweaked).unwrap();
    println!("one-byte change wrote {written} bytes");

    // --- record arrays ---

    // Four 2-byte channel gains, each its own framed record.
    let gains = [0x10u8, 0x27, 0x20, 0x4E, 0x30, 0x75, 0x40, 0x9C];
    let gains_addr = eeprom.alloc((4 * slot_len(2)) as u32);
    eeprom.write_records(gains_addr, 2, &gains).unwrap();

    let mut read_back = [0u8; 8];
    eeprom.read_records(gains_addr, 2, &mut read_back).unwrap();
    assert_eq!(read_back, gains);

    // Corrupt channel 2 and watch the walk stop exactly there.
    let ch2_payload = gains_addr + (2 * slot_len(2)) as u32 + 3;
    let byte = eeprom.read_u8(ch2_payload).unwrap();
    eeprom.write_u8(ch2_payload, byte ^ 0x01).unwrap();
    match eeprom.read_records(gains_addr, 2, &mut read_back) {
        Err(e) => println!("array read failed at element {}: {}", e.index, e.cause),
        Ok(_) => println!("unexpected: array read succeeded"),
    }
}
