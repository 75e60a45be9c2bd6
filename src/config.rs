use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{ChronologyError, Result};

/// when an open loan counts as settled for horizon purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullyPaidPolicy {
    /// never settled by balance; the legacy behaviour
    Never,
    /// settled once the stored pending balance reaches zero
    PendingBalanceZero,
}

/// what happens to a week's shortfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeficitPolicy {
    /// only positive surplus carries forward; each missed week stands alone
    ForgiveShortfall,
    /// negative balance carries forward and raises the next week's obligation
    CarryForward,
}

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronologyConfig {
    pub fully_paid_policy: FullyPaidPolicy,
    pub deficit_policy: DeficitPolicy,
    /// principal / divisor gives the minimum evaluation window in weeks
    pub horizon_cap_divisor: Decimal,
    /// seconds east of utc used for week boundaries
    pub utc_offset_seconds: i32,
    /// chrono format string for `date_formatted`
    pub date_format: String,
}

impl Default for ChronologyConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChronologyConfig {
    /// the unified policy set every consumer shares
    pub fn standard() -> Self {
        Self {
            fully_paid_policy: FullyPaidPolicy::Never,
            deficit_policy: DeficitPolicy::ForgiveShortfall,
            horizon_cap_divisor: dec!(100),
            utc_offset_seconds: 0,
            date_format: "%d/%m/%Y".to_string(),
        }
    }

    /// shortfalls accumulate week over week
    pub fn carry_forward() -> Self {
        Self {
            deficit_policy: DeficitPolicy::CarryForward,
            ..Self::standard()
        }
    }

    pub fn with_fully_paid_policy(mut self, policy: FullyPaidPolicy) -> Self {
        self.fully_paid_policy = policy;
        self
    }

    pub fn with_deficit_policy(mut self, policy: DeficitPolicy) -> Self {
        self.deficit_policy = policy;
        self
    }

    /// local offset in whole hours, e.g. -6 for central mexico
    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_seconds = hours * 3600;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_horizon_cap_divisor(mut self, divisor: Decimal) -> Self {
        self.horizon_cap_divisor = divisor;
        self
    }

    /// timezone used for week boundaries, utc when the offset is out of range
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// weeks implied by principal under the horizon cap heuristic
    pub fn principal_weeks(&self, principal: Money) -> u32 {
        if self.horizon_cap_divisor <= Decimal::ZERO || !principal.is_positive() {
            return 0;
        }
        let weeks = (principal.as_decimal() / self.horizon_cap_divisor).ceil();
        weeks.to_u32().unwrap_or(u32::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_cap_divisor <= Decimal::ZERO {
            return Err(ChronologyError::InvalidConfiguration {
                message: format!(
                    "horizon cap divisor must be positive, got {}",
                    self.horizon_cap_divisor
                ),
            });
        }

        if FixedOffset::east_opt(self.utc_offset_seconds).is_none() {
            return Err(ChronologyError::InvalidConfiguration {
                message: format!("utc offset out of range: {}s", self.utc_offset_seconds),
            });
        }

        if self.date_format.trim().is_empty() {
            return Err(ChronologyError::InvalidConfiguration {
                message: "date format must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
