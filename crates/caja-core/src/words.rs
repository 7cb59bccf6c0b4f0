//! # Amount-to-Words Formatter
//!
//! Spells a monetary total out for printed receipts.
//!
//! ## Output Shape
//! ```text
//! 1234.56 ──► "UN MIL DOSCIENTOS TREINTA Y CUATRO DOLARES CON
//!              CINCUENTA Y SEIS CENTAVOS 56/100"
//!
//! <DOLLARS> DOLARES CON <CENTS> CENTAVOS <NN>/100
//!     │                    │              │
//!     │                    │              └── two-digit cents, always present
//!     │                    └── "UN CENTAVO" when cents == 1
//!     └── "UN DOLAR" when the integer part == 1
//! ```
//!
//! The integer part is converted recursively with table lookups:
//! units 0–20, tens joined to units with "Y", a hundreds table, then
//! thousands ("MIL") and millions ("MILLONES") by recursion on the quotient.
//! Amounts are rounded to 2 decimal places before being split.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::round2;

const UNITS: [&str; 21] = [
    "CERO",
    "UN",
    "DOS",
    "TRES",
    "CUATRO",
    "CINCO",
    "SEIS",
    "SIETE",
    "OCHO",
    "NUEVE",
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISEIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
    "VEINTE",
];

/// Indexed by the tens digit (index 0 and 1 are never used).
const TENS: [&str; 10] = [
    "", "", "VEINTE", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA",
    "NOVENTA",
];

/// Indexed by the hundreds digit; exactly 100 is "CIEN".
const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

/// Exclusive upper bound of the integer part that can be spelled out.
const MAX_INTEGER_PART: u64 = 1_000_000_000;

/// Converts a non-negative integer below one billion to words.
pub fn integer_to_words(n: u64) -> String {
    match n {
        0..=20 => UNITS[n as usize].to_string(),
        21..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{} Y {}", tens, UNITS[unit as usize]),
            }
        }
        100 => "CIEN".to_string(),
        101..=999 => with_remainder(HUNDREDS[(n / 100) as usize].to_string(), n % 100),
        1_000..=999_999 => {
            with_remainder(format!("{} MIL", integer_to_words(n / 1_000)), n % 1_000)
        }
        _ => with_remainder(
            format!("{} MILLONES", integer_to_words(n / 1_000_000)),
            n % 1_000_000,
        ),
    }
}

fn with_remainder(head: String, rest: u64) -> String {
    if rest == 0 {
        head
    } else {
        format!("{} {}", head, integer_to_words(rest))
    }
}

/// Formats a monetary amount as receipt words.
///
/// ## Example
/// ```rust
/// use caja_core::words::amount_to_words;
/// use rust_decimal::Decimal;
///
/// let text = amount_to_words(Decimal::new(1, 2)).unwrap();
/// assert_eq!(text, "CERO DOLARES CON UN CENTAVO 01/100");
/// ```
///
/// ## Errors
/// `CoreError::AmountOutOfRange` for negative amounts and amounts of one
/// billion or more.
pub fn amount_to_words(amount: Decimal) -> CoreResult<String> {
    let amount = round2(amount);
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::AmountOutOfRange(amount.to_string()));
    }

    let integer_part = amount.trunc();
    let dollars = integer_part
        .to_u64()
        .filter(|d| *d < MAX_INTEGER_PART)
        .ok_or_else(|| CoreError::AmountOutOfRange(amount.to_string()))?;
    let cents = ((amount - integer_part) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_u64()
        .unwrap_or(0);

    let dollars_text = match dollars {
        1 => "UN DOLAR".to_string(),
        d => format!("{} DOLARES", integer_to_words(d)),
    };
    let cents_text = match cents {
        1 => "UN CENTAVO".to_string(),
        c => format!("{} CENTAVOS", integer_to_words(c)),
    };

    Ok(format!("{} CON {} {:02}/100", dollars_text, cents_text, cents))
}
