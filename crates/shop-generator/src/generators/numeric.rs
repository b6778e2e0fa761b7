//! Numeric value generators.

use rand::Rng;
use rust_decimal::Decimal;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    rng.random_range(min..=max)
}

/// Generate a price in the given cent range (inclusive).
///
/// Drawing whole cents keeps every price at two-decimal resolution.
pub fn generate_price<R: Rng + ?Sized>(rng: &mut R, min_cents: i64, max_cents: i64) -> Decimal {
    Decimal::new(rng.random_range(min_cents..=max_cents), 2)
}
