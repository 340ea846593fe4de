//! The fixed set of allowed bet magnitudes.
//!
//! Amount validity is membership in [`BetAmount::ALL`]. The
//! `[MIN_BET, MAX_BET]` range check is only a fast-reject pre-filter.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BET, MIN_BET, OCT_DECIMALS};

/// One of the allowed stake sizes, in base units (1 OCT = 10^9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum BetAmount {
    /// 0.01 OCT
    Cent1,
    /// 0.02 OCT
    Cent2,
    /// 0.03 OCT
    Cent3,
    /// 0.04 OCT
    Cent4,
    /// 0.05 OCT
    Cent5,
}

impl BetAmount {
    /// Allowed amounts in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Cent1,
        Self::Cent2,
        Self::Cent3,
        Self::Cent4,
        Self::Cent5,
    ];

    /// Resolve a raw base-unit amount to an allowed bet, if it is one.
    #[must_use]
    pub fn from_base_units(raw: u64) -> Option<Self> {
        if !(MIN_BET..=MAX_BET).contains(&raw) {
            return None;
        }
        Self::ALL.into_iter().find(|a| a.base_units() == raw)
    }

    #[must_use]
    pub const fn base_units(self) -> u64 {
        match self {
            Self::Cent1 => 10_000_000,
            Self::Cent2 => 20_000_000,
            Self::Cent3 => 30_000_000,
            Self::Cent4 => 40_000_000,
            Self::Cent5 => 50_000_000,
        }
    }

    /// The amount in whole OCT.
    #[must_use]
    pub fn as_oct(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.base_units()), OCT_DECIMALS).normalize()
    }

    /// Human label, e.g. `"0.01 OCT"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} OCT", self.as_oct())
    }
}

impl fmt::Display for BetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<BetAmount> for u64 {
    fn from(amount: BetAmount) -> Self {
        amount.base_units()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_allowed_amount_resolves() {
        for amount in BetAmount::ALL {
            assert_eq!(BetAmount::from_base_units(amount.base_units()), Some(amount));
        }
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(BetAmount::from_base_units(0), None);
        assert_eq!(BetAmount::from_base_units(99), None);
        assert_eq!(BetAmount::from_base_units(MAX_BET + 1), None);
        assert_eq!(BetAmount::from_base_units(u64::MAX), None);
    }

    #[test]
    fn in_range_but_not_in_set_rejected() {
        // Passes the range pre-filter, fails set membership.
        assert_eq!(BetAmount::from_base_units(15_000_000), None);
        assert_eq!(BetAmount::from_base_units(MIN_BET + 1), None);
    }

    #[test]
    fn labels_in_oct() {
        assert_eq!(BetAmount::Cent1.label(), "0.01 OCT");
        assert_eq!(BetAmount::Cent5.to_string(), "0.05 OCT");
        assert_eq!(BetAmount::Cent3.as_oct(), Decimal::new(3, 2));
    }

    #[test]
    fn ordering_is_ascending() {
        let mut sorted = BetAmount::ALL;
        sorted.sort();
        assert_eq!(sorted, BetAmount::ALL);
        assert!(BetAmount::Cent1 < BetAmount::Cent5);
    }
}
