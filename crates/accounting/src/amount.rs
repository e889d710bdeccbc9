//! Monetary amounts entered by hand.
//!
//! Amounts are currency-agnostic decimals. Anything typed into a debit or
//! credit field goes through [`coerce_amount`] before it reaches a line.

use core::str::FromStr;

use rust_decimal::Decimal;

/// Tolerance used when deciding whether a bank/cash voucher balances.
///
/// One hundredth of a currency unit, enough to absorb rounding noise from
/// amounts that were entered with more than two decimals.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Coerce free text into a non-negative amount.
///
/// Empty, malformed and negative input all become zero. Surrounding
/// whitespace is ignored and scientific notation is accepted, so `" 5e2 "`
/// reads as 500.
pub fn coerce_amount(input: &str) -> Decimal {
    let text = input.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO);

    non_negative(parsed)
}

/// Clamp an already-numeric amount to the non-negative range.
pub fn non_negative(amount: Decimal) -> Decimal {
    if amount.is_sign_negative() {
        Decimal::ZERO
    } else {
        amount.normalize()
    }
}
