//! Basic example: allocation, raw access, and write budgeting
//!
//! This example demonstrates:
//! - Building an accessor over a simulated device
//! - Claiming regions with the bump allocator
//! - Raw scalar and block access
//! - The write budget refusing work before any byte lands

use embedded_eeprom::prelude::*;

// ============ Layout ============
// Regions are claimed from the allocator at startup, in a fixed order, so
// every build of the firmware agrees on where each subsystem's data lives.

const BOOT_COUNT_LEN: u32 = 4; // u32
const CALIBRATION_LEN: u32 = 8; // f64

fn main() {
    // 1KB simulated device; the pool covers all of it and the budget caps
    // lifetime wear at 100 byte writes.
    let mut eeprom = EepromBuilder::new(MemStore::<1024>::new())
        .mem_pool(0, 1024)
        .max_writes(100)
        .build();

    // Claim non-overlapping regions without manual address bookkeeping.
    let boot_count_addr = eeprom.alloc(BOOT_COUNT_LEN);
    let calibration_addr = eeprom.alloc(CALIBRATION_LEN);
    println!("boot count at {boot_count_addr}, calibration at {calibration_addr}");

    // Typical boot sequence: bump a counter, refresh calibration.
    let boots = match eeprom.read_u32(boot_count_addr) {
        Ok(0xFFFF_FFFF) => 0, // erased device, first boot
        Ok(n) => n,
        Err(e) => panic!("boot counter unreadable: {e}"),
    };
    eeprom.write_u32(boot_count_addr, boots + 1).unwrap();
    eeprom.write_f64(calibration_addr, 0.997).unwrap();

    // update_* only writes bytes that changed: re-storing the same
    // calibration costs nothing against the budget.
    let worn = eeprom.update_f64(calibration_addr, 0.997).unwrap();
    println!("re-store of identical calibration wrote {worn} bytes");

    // Single-bit flags share a byte without clobbering their neighbours.
    let flags_addr = eeprom.alloc(1);
    eeprom.write_u8(flags_addr, 0).unwrap();
    eeprom.write_bit(flags_addr, 0, true).unwrap(); // "configured"
    eeprom.write_bit(flags_addr, 3, true).unwrap(); // "field unit"
    println!("flags byte: {:#010b}", eeprom.read_u8(flags_addr).unwrap());

    // The governor refuses anything that would exceed the ceiling -- the
    // device is untouched on refusal.
    println!("written so far: {}", eeprom.written_count());
    match eeprom.write_block(64, &[0u8; 512]) {
        Err(Error::BudgetExhausted) => println!("bulk write refused by the budget"),
        other => println!("unexpected: {other:?}"),
    }
    assert!(eeprom.written_count() <= 100);
}
