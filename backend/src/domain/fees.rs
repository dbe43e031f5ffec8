//! Stamp duty and registration fee assessment.
//!
//! Charges are a percentage of the parcel's assessed value, which in turn
//! is a configured rate applied to the registered area. All amounts are
//! whole INR; fractions round down.

use serde::{Deserialize, Serialize};

use super::property::AreaSqFt;

const BASIS_POINTS: u64 = 10_000;

/// Configured rates used to derive transfer charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    /// Stamp duty rate in basis points of assessed value.
    pub stamp_duty_bp: u64,
    /// Registration fee rate in basis points of assessed value.
    pub registration_fee_bp: u64,
    /// Assessed value per square foot, in INR.
    pub value_rate_inr_per_sqft: u64,
}

impl Default for FeePolicy {
    /// 5% stamp duty, 1% registration fee, 3500 INR/sq ft assessed value.
    fn default() -> Self {
        Self {
            stamp_duty_bp: 500,
            registration_fee_bp: 100,
            value_rate_inr_per_sqft: 3_500,
        }
    }
}

impl FeePolicy {
    /// Derive the charges for a parcel of the given area.
    #[must_use]
    pub fn assess(&self, area: AreaSqFt) -> FeeBreakdown {
        let value = area.get().saturating_mul(self.value_rate_inr_per_sqft);
        FeeBreakdown {
            stamp_duty_inr: Self::share(value, self.stamp_duty_bp),
            registration_fee_inr: Self::share(value, self.registration_fee_bp),
        }
    }

    #[expect(
        clippy::integer_division,
        reason = "fee amounts round down to whole INR by definition"
    )]
    fn share(value: u64, rate_bp: u64) -> u64 {
        value.saturating_mul(rate_bp) / BASIS_POINTS
    }
}

/// Charges attached to an approved transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct FeeBreakdown {
    /// Stamp duty in INR.
    pub stamp_duty_inr: u64,
    /// Registration fee in INR.
    pub registration_fee_inr: u64,
}
