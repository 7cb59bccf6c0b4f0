//! # Money Module
//!
//! Fixed-precision rounding helpers for currency and quantities.
//!
//! ## Precision Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TWO SCALES                                                             │
//! │                                                                         │
//! │  Currency (prices, sale totals)          → 2 decimal places            │
//! │  Quantities and per-line figures         → 4 decimal places            │
//! │                                                                         │
//! │  PER-STEP ROUNDING                                                      │
//! │    line figures:  round4 after every multiplication                     │
//! │    sale totals:   round2 after every accumulation                       │
//! │                                                                         │
//! │  Summing many rounded lines can differ from rounding one algebraic     │
//! │  total. Sale totals are defined by the per-step result.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::money::{round2, round4};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(round2(Decimal::new(10005, 3)), Decimal::new(1001, 2)); // 10.005 → 10.01
//! assert_eq!(round4(Decimal::new(123456, 5)), Decimal::new(12346, 4)); // 1.23456 → 1.2346
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Decimal places for quantities and per-line figures.
pub const QUANTITY_SCALE: u32 = 4;

/// Rounds to a currency value (2 decimal places, half away from zero).
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a quantity value (4 decimal places, half away from zero).
#[inline]
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Adds `amount` to a running currency total, rounding the result.
///
/// This is the accumulation step used for every sale-level total.
#[inline]
pub fn accumulate2(total: Decimal, amount: Decimal) -> Decimal {
    round2(total + amount)
}
