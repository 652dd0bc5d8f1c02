use rust_decimal::{Decimal, RoundingStrategy};

/// Largest price the `numeric(12, 2)` price column holds
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Round to whole cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum amounts, clamping at `Decimal::MAX` instead of overflowing
pub fn saturating_total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}
