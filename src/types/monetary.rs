use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::fmt::{Display, Formatter};

const DISPLAY_PLACES: u32 = 2;

/// Rounds to two decimal places, with midpoints rounded away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Human-readable dollar amount, always two decimal places.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Currency(pub Decimal);

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let rounded = round2(self.0);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        write!(formatter, "{}${:.width$}", sign, rounded.abs(), width = DISPLAY_PLACES as usize)
    }
}

/// Percentage rendered with two decimal places and a trailing `%`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Percentage(pub Decimal);

impl Display for Percentage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.width$}%", round2(self.0), width = DISPLAY_PLACES as usize)
    }
}
