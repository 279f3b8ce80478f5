/// Errors that can occur during EEPROM accessor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Address span exits the configured memory pool, or a bit index
    /// exceeds 7.
    OutOfBounds,
    /// Operation attempted with zero length.
    ZeroLength,
    /// The write would exceed the configured write ceiling.
    BudgetExhausted,
    /// No start marker at the address; the memory does not hold a record.
    NotAFrame,
    /// The stored record length does not match the expected payload size.
    LengthMismatch,
    /// The stored checksum does not match the payload read back.
    ChecksumMismatch,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfBounds => write!(f, "address span exits the memory pool"),
            Error::ZeroLength => write!(f, "operation attempted with zero length"),
            Error::BudgetExhausted => write!(f, "write would exceed the configured write ceiling"),
            Error::NotAFrame => write!(f, "no start marker at address"),
            Error::LengthMismatch => write!(f, "stored record length does not match expected size"),
            Error::ChecksumMismatch => write!(f, "stored checksum does not match payload"),
        }
    }
}

/// Failure of one element in a record-array operation.
///
/// Elements before `index` were fully processed; the element at `index`
/// failed with `cause` and processing stopped there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementError {
    /// Zero-based index of the failing element.
    pub index: usize,
    /// Why the element failed.
    pub cause: Error,
}

impl core::fmt::Display for ElementError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "element {}: {}", self.index, self.cause)
    }
}
