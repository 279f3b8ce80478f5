//! A `no_std`, no-alloc accessor layer for EEPROM-class storage.
//!
//! This crate wraps a raw byte-addressable non-volatile device with the three
//! services endurance-limited media need: address allocation, write budgeting,
//! and self-validating record framing.
//!
//! # Features
//!
//! - **Zero heap allocation** - All state lives in the accessor instance
//! - **Bump allocation** - Subsystems claim non-overlapping regions without
//!   manual address bookkeeping
//! - **Write budgeting** - An optional ceiling on lifetime physical byte
//!   writes, enforced before any device mutation
//! - **Safe records** - Framed values with a start marker, length, and CRC-8
//!   trailer that detect garbage, truncation, and corruption on read
//! - **Wear-reducing updates** - Update operations diff against the device
//!   and write only the bytes that actually changed
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │  Eeprom<S>       │     │  bounds + budget  │     │  RawStore    │
//! │                  │────▶│  gate             │────▶│  (device)    │
//! │  blocks, records,│     │                   │     │              │
//! │  scalars, bits   │     │  rejects before   │     │  read_byte   │
//! │                  │     │  any byte lands   │     │  write_byte  │
//! └──────────────────┘     └───────────────────┘     └──────────────┘
//!          │
//!          │ safe mode
//!          ▼
//! ┌──────────────────┐     ┌───────────────────┐
//! │  record codec    │────▶│  crc8             │
//! │  [AF][len][..][c]│     │  (poly 0xD8)      │
//! └──────────────────┘     └───────────────────┘
//! ```
//!
//! The allocator is consulted by callers up front; every read and write is
//! then checked against the configured pool window, and every write is
//! additionally charged against the write budget before it reaches the
//! device.
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_eeprom::prelude::*;
//!
//! // A 1KB simulated device; real hardware implements `RawStore` instead.
//! let mut eeprom = EepromBuilder::new(MemStore::<1024>::new())
//!     .mem_pool(0, 1024)
//!     .max_writes(10_000)
//!     .build();
//!
//! // Claim regions for two independent subsystems.
//! let settings_addr = eeprom.alloc(8);
//! let counter_addr = eeprom.alloc(4);
//!
//! // Raw scalar access.
//! eeprom.write_u32(counter_addr, 42).unwrap();
//! assert_eq!(eeprom.read_u32(counter_addr).unwrap(), 42);
//!
//! // Safe (framed) access with corruption detection on read.
//! eeprom.write_record(settings_addr, &[0x01, 0x1F]).unwrap();
//! let mut settings = [0u8; 2];
//! eeprom.read_record(settings_addr, &mut settings).unwrap();
//!
//! // Re-writing identical content costs no device wear.
//! assert_eq!(eeprom.update_record(settings_addr, &[0x01, 0x1F]).unwrap(), 0);
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod eeprom;

pub mod prelude {
    pub use crate::eeprom::prelude::*;
}
