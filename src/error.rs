//! Error type shared by every container in the crate.

use thiserror::Error;

/// Errors reported by trie and interval operations.
///
/// Queries that merely have no answer (an empty trie, an out-of-range rank, no
/// value past a bound) return `None` instead of an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An argument violates the operation's contract.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: &'static str,
    },

    /// A value or mask has bits set above the configured width.
    #[error("value {value:#x} does not fit in {bits} bits")]
    OutOfRange {
        /// The offending value, widened
        value: u128,
        /// Configured bit width
        bits: u32,
    },

    /// Requested bit width is zero or wider than the value type.
    #[error("bit width {bits} is outside 1..={max}")]
    InvalidBitWidth {
        /// Requested width
        bits: u32,
        /// Width of the value type
        max: u32,
    },

    /// A string contains a byte outside the trie alphabet.
    #[error("symbol {symbol:#04x} is outside the trie alphabet")]
    InvalidSymbol {
        /// The offending byte
        symbol: u8,
    },

    /// The multiplicity counter would overflow.
    #[error("multiplicity overflow")]
    CountOverflow,

    /// The 32-bit node index space is full.
    #[error("node arena exhausted")]
    CapacityExhausted,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
