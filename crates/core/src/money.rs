//! Monetary value helpers.
//!
//! Amounts are `rust_decimal::Decimal` everywhere; floats never carry money.
//! The backend stores DECIMAL(10, 2), so values are rounded to two places
//! with half-away-from-zero (what users expect from displayed currency).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Round an amount to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a user-entered amount (form input arrives as text).
///
/// Rejects non-numeric and negative input; rounds to cents.
pub fn parse_amount(input: &str) -> DomainResult<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("amount is required"));
    }

    let amount: Decimal = trimmed
        .parse()
        .map_err(|_| DomainError::validation(format!("not a valid amount: {trimmed}")))?;

    if amount.is_sign_negative() {
        return Err(DomainError::validation("amount cannot be negative"));
    }

    Ok(round_money(amount))
}
