//! Column-precision checks for decimal amounts.
//!
//! Money columns are `DECIMAL(8, 2)` and bathrooms are `DECIMAL(3, 1)`. A value
//! that does not fit would be stored rounded, and the next save of the same form
//! would then look like a change to the auditor. Amounts are therefore checked
//! against their column before any query runs.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Total digits and digits after the point of a `DECIMAL(p, s)` column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    /// Total significant digits (`p`)
    pub max_digits: u32,
    /// Digits after the decimal point (`s`)
    pub decimal_places: u32,
}

/// Monthly money fields, deposits, history values and payments
pub const MONEY: Precision = Precision {
    max_digits: 8,
    decimal_places: 2,
};

/// Bathroom counts (0.5, 1.0, 1.5, ...)
pub const BATHROOMS: Precision = Precision {
    max_digits: 3,
    decimal_places: 1,
};

impl Precision {
    /// Whether `value` is stored exactly by a column of this precision.
    ///
    /// Trailing zeros do not count against the decimal places, so `12.50` fits a
    /// one-place column.
    #[must_use]
    pub fn fits(self, value: Decimal) -> bool {
        if value.normalize().scale() > self.decimal_places {
            return false;
        }

        let integer_digits = self.max_digits - self.decimal_places;
        let limit = Decimal::from(10_u64.pow(integer_digits));
        value.trunc().abs() < limit
    }
}

/// Rejects a money value the `DECIMAL(8, 2)` columns cannot hold.
pub fn ensure_money(amount: Decimal) -> Result<()> {
    if MONEY.fits(amount) {
        Ok(())
    } else {
        Err(Error::InvalidAmount { amount })
    }
}
