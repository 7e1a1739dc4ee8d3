//! Traits for the integer types a trie can store and count with.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Unsigned integer types usable as bit-trie values.
///
/// Values are widened to `u128` while descending so that a single code path
/// serves every width.
pub trait TrieValue: Copy + Eq + Ord + Hash + Debug {
    /// Number of bits in the native representation.
    const BITS: u32;

    /// Widens the value losslessly.
    fn to_u128(self) -> u128;

    /// Narrows a widened value. Bits above [`Self::BITS`] are discarded.
    fn from_u128(value: u128) -> Self;
}

macro_rules! impl_trie_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl TrieValue for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline(always)]
                fn to_u128(self) -> u128 {
                    self as u128
                }

                #[inline(always)]
                fn from_u128(value: u128) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_trie_value!(u8, u16, u32, u64, u128, usize);

/// Integer types usable as multiplicity counters.
///
/// Signed counters are accepted so that callers can pass through whatever
/// count type they already use; negative requests are rejected at the API
/// boundary.
pub trait Multiplicity:
    Copy
    + Ord
    + Debug
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
{
    /// Additive identity.
    const ZERO: Self;
    /// A single copy.
    const ONE: Self;

    /// `self + rhs`, or `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Whether the value is below zero. Always `false` for unsigned types.
    fn is_negative(self) -> bool;
}

macro_rules! impl_multiplicity {
    (signed: $($s:ty),*; unsigned: $($u:ty),* $(;)?) => {
        $(
            impl Multiplicity for $s {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline(always)]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$s>::checked_add(self, rhs)
                }

                #[inline(always)]
                fn is_negative(self) -> bool {
                    self < 0
                }
            }
        )*
        $(
            impl Multiplicity for $u {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline(always)]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$u>::checked_add(self, rhs)
                }

                #[inline(always)]
                fn is_negative(self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_multiplicity!(
    signed: i8, i16, i32, i64, i128, isize;
    unsigned: u8, u16, u32, u64, u128, usize;
);
