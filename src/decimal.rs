use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// currency amount held at cent precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// decimal places kept after every operation
    pub const SCALE: u32 = 2;

    /// rounds to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(to_cents(d))
    }

    /// parse a ledger amount, tolerating surrounding whitespace
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(to_cents(Decimal::from_str(s.trim())?)))
    }

    /// create from integer amount (pesos, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor amount (cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, Self::SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// clamp negatives to zero
    pub fn non_negative(self) -> Self {
        if self.is_negative() {
            Money::ZERO
        } else {
            self
        }
    }

    /// multiply by a count (e.g. missed weeks x installment)
    pub fn times(&self, count: u32) -> Self {
        Money(to_cents(self.0 * Decimal::from(count)))
    }

    /// split evenly into `parts`, zero when there is nothing to split into
    pub fn split(&self, parts: u32) -> Self {
        if parts == 0 {
            return Money::ZERO;
        }
        Money(to_cents(self.0 / Decimal::from(parts)))
    }
}

/// half-up to the cent, the way the ledger rounds
fn to_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(Money::SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(to_cents(self.0 + other.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(to_cents(self.0 - other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}
