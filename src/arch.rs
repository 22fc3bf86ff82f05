//! Target data model (LP64).
//!
//! https://en.wikipedia.org/wiki/64-bit_computing#64-bit_data_models

pub const CHAR_BIT: u32 = 8; // number of bits in a byte

pub const BOOL_WIDTH: u32 = 1;
pub const CHAR_WIDTH: u32 = CHAR_BIT;
pub const SHORT_WIDTH: u32 = 2 * CHAR_BIT;
pub const INT_WIDTH: u32 = 4 * CHAR_BIT;
pub const LONG_WIDTH: u32 = 8 * CHAR_BIT;
pub const LONG_LONG_WIDTH: u32 = 8 * CHAR_BIT;

/// `BITINT_MAXWIDTH` from `<limits.h>`.
pub const BITINT_MAXWIDTH: u32 = 65535;

static_assertions::const_assert!(SHORT_WIDTH < INT_WIDTH);
static_assertions::const_assert!(LONG_WIDTH <= LONG_LONG_WIDTH);
