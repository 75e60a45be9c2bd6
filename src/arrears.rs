use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chronology::Chronology;
use crate::decimal::Money;
use crate::loan::LoanRecord;
use crate::types::{CoverageType, LoanId};

/// arrears ("vdo") figure for one loan, derived from its chronology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrearsReport {
    pub loan_id: LoanId,
    pub expected_weekly: Money,
    pub evaluated_weeks: u32,
    pub full_weeks: u32,
    pub partial_weeks: u32,
    pub covered_by_surplus_weeks: u32,
    pub missed_weeks: u32,
    /// missed weeks x installment, before the cap
    pub computed_arrears: Money,
    /// reported figure, never above the stored pending balance
    pub arrears: Money,
    pub pending_balance: Option<Money>,
    /// the stored balance lowered the computed figure
    pub capped: bool,
    pub surplus_balance: Money,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl ArrearsReport {
    pub fn from_chronology(chronology: &Chronology, loan: &LoanRecord) -> Self {
        let missed_weeks = chronology.missed_weeks();
        let computed_arrears = chronology.expected_weekly.non_negative().times(missed_weeks);
        let (arrears, capped) = cap_arrears(computed_arrears, loan.pending_amount_stored);

        Self {
            loan_id: chronology.loan_id.clone(),
            expected_weekly: chronology.expected_weekly,
            evaluated_weeks: chronology.weeks.len() as u32,
            full_weeks: chronology.count(CoverageType::Full),
            partial_weeks: chronology.count(CoverageType::Partial),
            covered_by_surplus_weeks: chronology.count(CoverageType::CoveredBySurplus),
            missed_weeks,
            computed_arrears,
            arrears,
            pending_balance: loan.pending_amount_stored,
            capped,
            surplus_balance: chronology.final_surplus,
            last_payment_date: chronology.last_payment_date(),
        }
    }

    pub fn is_in_arrears(&self) -> bool {
        self.arrears.is_positive()
    }
}

/// the stored ledger balance bounds what can be reported as owed
pub fn cap_arrears(computed: Money, pending_balance: Option<Money>) -> (Money, bool) {
    match pending_balance {
        Some(pending) => {
            let limit = pending.non_negative();
            if computed > limit {
                (limit, true)
            } else {
                (computed, false)
            }
        }
        None => (computed, false),
    }
}
