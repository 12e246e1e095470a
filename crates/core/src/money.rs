//! `Money` value object: a non-negative decimal amount tagged with an
//! ISO-4217 currency code. Every arithmetic operation returns a new value;
//! the receiver is never mutated (P5 money-immutability).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: [u8; 3],
}

impl ValueObject for Money {}

impl Money {
    /// Construct a `Money` value. Rejects negative amounts and anything
    /// that isn't exactly three ASCII letters for the currency code.
    pub fn new(amount: Decimal, currency: &str) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation("money amount must be non-negative"));
        }
        let trimmed = currency.trim();
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(DomainError::validation(format!(
                "currency must be a 3-letter ISO-4217 code, got {trimmed:?}"
            )));
        }
        let upper = trimmed.to_ascii_uppercase();
        let mut code = [0u8; 3];
        code.copy_from_slice(upper.as_bytes());
        Ok(Self { amount, currency: code })
    }

    pub fn zero(currency: &str) -> DomainResult<Self> {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        core::str::from_utf8(&self.currency).expect("currency code is always ASCII")
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::validation(format!(
                "currency mismatch: {} vs {}",
                self.currency(),
                other.currency()
            )));
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        Money::new(self.amount + other.amount, self.currency())
    }

    /// Never returns a negative amount; subtracting more than `self` holds
    /// is a validation error rather than a saturating clamp.
    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        if other.amount > self.amount {
            return Err(DomainError::validation(
                "cannot subtract a larger amount of money from a smaller one",
            ));
        }
        Money::new(self.amount - other.amount, self.currency())
    }

    pub fn multiply(&self, factor: Decimal) -> DomainResult<Money> {
        if factor < Decimal::ZERO {
            return Err(DomainError::validation("money multiplier must be non-negative"));
        }
        Money::new(self.amount * factor, self.currency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_negative_amount() {
        assert!(Money::new(dec!(-1), "USD").is_err());
    }

    #[test]
    fn rejects_malformed_currency() {
        assert!(Money::new(dec!(1), "US").is_err());
        assert!(Money::new(dec!(1), "US1").is_err());
    }

    #[test]
    fn normalizes_currency_case() {
        let m = Money::new(dec!(10), "usd").unwrap();
        assert_eq!(m.currency(), "USD");
    }

    #[test]
    fn add_requires_same_currency() {
        let usd = Money::new(dec!(10), "USD").unwrap();
        let eur = Money::new(dec!(10), "EUR").unwrap();
        assert!(usd.add(&eur).is_err());
    }

    #[test]
    fn subtract_never_goes_negative() {
        let small = Money::new(dec!(5), "USD").unwrap();
        let big = Money::new(dec!(10), "USD").unwrap();
        assert!(small.subtract(&big).is_err());
        assert_eq!(big.subtract(&small).unwrap().amount(), dec!(5));
    }

    #[test]
    fn arithmetic_does_not_mutate_operands() {
        let a = Money::new(dec!(10), "USD").unwrap();
        let b = Money::new(dec!(3), "USD").unwrap();
        let _ = a.add(&b).unwrap();
        let _ = a.subtract(&b).unwrap();
        let _ = a.multiply(dec!(2)).unwrap();
        assert_eq!(a.amount(), dec!(10));
        assert_eq!(b.amount(), dec!(3));
    }

    #[test]
    fn multiply_rejects_negative_factor() {
        let a = Money::new(dec!(10), "USD").unwrap();
        assert!(a.multiply(dec!(-1)).is_err());
        assert_eq!(a.multiply(dec!(0)).unwrap().amount(), dec!(0));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// P5 money-immutability: any arithmetic op leaves the operands
            /// unchanged, regardless of which op or which (valid) operands.
            #[test]
            fn arithmetic_never_mutates_operands(
                a_cents in 0i64..1_000_000,
                b_cents in 0i64..1_000_000,
                factor_cents in 0i64..1000,
            ) {
                let a = Money::new(Decimal::new(a_cents, 2), "USD").unwrap();
                let b = Money::new(Decimal::new(b_cents, 2), "USD").unwrap();
                let factor = Decimal::new(factor_cents, 2);

                let _ = a.add(&b);
                let _ = a.multiply(factor);
                if b.amount() <= a.amount() {
                    let _ = a.subtract(&b);
                }

                prop_assert_eq!(a.amount(), Decimal::new(a_cents, 2));
                prop_assert_eq!(b.amount(), Decimal::new(b_cents, 2));
            }
        }
    }
}
