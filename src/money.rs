use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places in the smallest currency unit (cents).
pub const CURRENCY_DP: u32 = 2;

/// Round to cents with round-half-to-even, always carrying two decimal places
/// so serialized output is stable ("625.00" rather than "625").
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Percentage of `part` in `whole`, rounded to two places. Zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_money(part / whole * Decimal::ONE_HUNDRED)
}

pub fn format_dollars(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

pub fn format_dollars_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

pub fn format_percent(pct: Decimal) -> String {
    format!("{:.2}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.12));
        assert_eq!(round_money(dec!(0.135)), dec!(0.14));
        assert_eq!(round_money(dec!(2.5)), dec!(2.50));
    }

    #[test]
    fn rounded_values_carry_two_places() {
        assert_eq!(round_money(dec!(625)).to_string(), "625.00");
        assert_eq!(round_money(dec!(1666.6666666)).to_string(), "1666.67");
    }

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        assert_eq!(percentage(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(format_dollars(dec!(10000)), "$10000.00");
        assert_eq!(format_dollars_signed(dec!(-12.5)), "-$12.50");
        assert_eq!(format_percent(dec!(3.6)), "3.60%");
    }
}
