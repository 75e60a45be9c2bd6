use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::calendar::{local_date, weeks_between};
use crate::config::{ChronologyConfig, FullyPaidPolicy};
use crate::decimal::Money;
use crate::loan::LoanRecord;

/// why evaluation stops where it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizonReason {
    /// finished or renewed loan, bounded by its finished date
    Closed,
    /// bounded by the bad debt date
    BadDebt,
    /// settled by balance policy, evaluated up to now
    Settled,
    /// open loan, bounded by now
    Now,
    /// open loan, bounded by its nominal or principal-implied term
    TermCap,
}

/// last local date to evaluate plus the week count it implies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationHorizon {
    pub end_date: NaiveDate,
    pub total_weeks: u32,
    pub reason: HorizonReason,
}

/// resolves the evaluation horizon of a loan
pub struct HorizonResolver<'a> {
    config: &'a ChronologyConfig,
}

impl<'a> HorizonResolver<'a> {
    pub fn new(config: &'a ChronologyConfig) -> Self {
        Self { config }
    }

    /// `None` when the loan has no sign date
    pub fn resolve(&self, loan: &LoanRecord, now: DateTime<Utc>) -> Option<EvaluationHorizon> {
        let tz = self.config.timezone();
        let sign_date = local_date(loan.sign_date?, &tz);
        let today = local_date(now, &tz);

        let (end_date, reason) = match (loan.status.is_closed(), loan.finished_date) {
            (true, Some(finished)) => (local_date(finished, &tz), HorizonReason::Closed),
            _ => match loan.bad_debt_date.filter(|_| loan.is_bad_debt()) {
                Some(bad_debt) => (local_date(bad_debt, &tz), HorizonReason::BadDebt),
                None if self.is_fully_paid(loan) => (today, HorizonReason::Settled),
                None => match self.term_end(loan, sign_date) {
                    Some(term_end) if today > term_end => (term_end, HorizonReason::TermCap),
                    _ => (today, HorizonReason::Now),
                },
            },
        };

        let horizon = EvaluationHorizon {
            end_date,
            total_weeks: weeks_between(sign_date, end_date),
            reason,
        };

        debug!(
            "loan {} horizon resolved to {} ({:?}, {} weeks)",
            loan.id, horizon.end_date, horizon.reason, horizon.total_weeks
        );

        Some(horizon)
    }

    /// sign date plus the longer of the nominal and principal-implied terms;
    /// `None` when that lies past the end of the calendar
    fn term_end(&self, loan: &LoanRecord, sign_date: NaiveDate) -> Option<NaiveDate> {
        let principal_weeks = self.config.principal_weeks(loan.amount_requested);
        let term_weeks = loan.week_duration.max(principal_weeks);
        sign_date.checked_add_signed(Duration::try_weeks(term_weeks as i64)?)
    }

    /// settled-by-balance check, governed by `FullyPaidPolicy`
    pub fn is_fully_paid(&self, loan: &LoanRecord) -> bool {
        match self.config.fully_paid_policy {
            FullyPaidPolicy::Never => false,
            FullyPaidPolicy::PendingBalanceZero => loan
                .pending_amount_stored
                .map(|pending| pending <= Money::ZERO)
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanStatus;
    use chrono::TimeZone;

    fn sign() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 2, 10, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan() -> LoanRecord {
        LoanRecord::builder()
            .id("L-1")
            .sign_date(sign())
            .week_duration(14)
            .amount_requested(Money::from_major(1_000))
            .total_amount_due(Money::from_major(4_200))
            .build()
            .unwrap()
    }

    #[test]
    fn test_active_loan_bounded_by_now() {
        let config = ChronologyConfig::standard();
        let now = Utc.with_ymd_and_hms(2025, 10, 13, 9, 0, 0).unwrap();

        let horizon = HorizonResolver::new(&config).resolve(&loan(), now).unwrap();
        assert_eq!(horizon.end_date, date(2025, 10, 13));
        assert_eq!(horizon.reason, HorizonReason::Now);
        assert_eq!(horizon.total_weeks, 6);
    }

    #[test]
    fn test_active_loan_bounded_by_term() {
        let config = ChronologyConfig::standard();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        let horizon = HorizonResolver::new(&config).resolve(&loan(), now).unwrap();
        assert_eq!(horizon.end_date, date(2025, 12, 9)); // 14 weeks after signing
        assert_eq!(horizon.reason, HorizonReason::TermCap);
        assert_eq!(horizon.total_weeks, 14);
    }

    #[test]
    fn test_large_principal_extends_window() {
        let config = ChronologyConfig::standard();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let mut big = loan();
        big.amount_requested = Money::from_major(2_000); // 20 weeks > 14

        let horizon = HorizonResolver::new(&config).resolve(&big, now).unwrap();
        assert_eq!(horizon.total_weeks, 20);
    }

    #[test]
    fn test_finished_and_bad_debt_dates() {
        let config = ChronologyConfig::standard();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let mut finished = loan();
        finished.status = LoanStatus::Renewed;
        finished.finished_date = Some(Utc.with_ymd_and_hms(2025, 10, 9, 15, 0, 0).unwrap());
        let horizon = HorizonResolver::new(&config).resolve(&finished, now).unwrap();
        assert_eq!(horizon.end_date, date(2025, 10, 9));
        assert_eq!(horizon.reason, HorizonReason::Closed);

        let mut bad_debt = loan();
        bad_debt.status = LoanStatus::BadDebt;
        bad_debt.bad_debt_date = Some(Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap());
        let horizon = HorizonResolver::new(&config).resolve(&bad_debt, now).unwrap();
        assert_eq!(horizon.end_date, date(2025, 11, 1));
        assert_eq!(horizon.reason, HorizonReason::BadDebt);
    }

    #[test]
    fn test_fully_paid_policy() {
        let mut settled = loan();
        settled.pending_amount_stored = Some(Money::ZERO);

        let legacy = ChronologyConfig::standard();
        assert!(!HorizonResolver::new(&legacy).is_fully_paid(&settled));

        let config = ChronologyConfig::standard()
            .with_fully_paid_policy(FullyPaidPolicy::PendingBalanceZero);
        let resolver = HorizonResolver::new(&config);
        assert!(resolver.is_fully_paid(&settled));

        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let horizon = resolver.resolve(&settled, now).unwrap();
        assert_eq!(horizon.reason, HorizonReason::Settled);
        assert_eq!(horizon.end_date, date(2026, 6, 1));
    }

    #[test]
    fn test_extreme_terms_fall_back_to_now() {
        let config = ChronologyConfig::standard();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        let mut long = loan();
        long.week_duration = 50_000_000;
        let horizon = HorizonResolver::new(&config).resolve(&long, now).unwrap();
        assert_eq!(horizon.reason, HorizonReason::Now);
        assert_eq!(horizon.end_date, date(2026, 6, 1));

        let mut huge = loan();
        huge.amount_requested = Money::from_major(10_000_000_000);
        let horizon = HorizonResolver::new(&config).resolve(&huge, now).unwrap();
        assert_eq!(horizon.reason, HorizonReason::Now);

        let mut widest = loan();
        widest.week_duration = u32::MAX;
        assert!(HorizonResolver::new(&config).resolve(&widest, now).is_some());
    }

    #[test]
    fn test_missing_sign_date() {
        let config = ChronologyConfig::standard();
        let mut unsigned = loan();
        unsigned.sign_date = None;
        assert!(HorizonResolver::new(&config).resolve(&unsigned, Utc::now()).is_none());
    }
}
