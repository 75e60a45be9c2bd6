use chrono::{DateTime, FixedOffset, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::arrears::ArrearsReport;
use crate::calendar::{format_local, local_date, WeekSlot};
use crate::config::ChronologyConfig;
use crate::coverage::{CoverageClassifier, WeekCoverage};
use crate::decimal::Money;
use crate::events::{ChronologyEvent, EventLog};
use crate::horizon::{EvaluationHorizon, HorizonResolver};
use crate::loan::{LoanRecord, PaymentRecord};
use crate::types::{CoverageType, EventKind, LoanId, PaymentId};

/// one evaluated week and how it was covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub slot: WeekSlot,
    pub coverage: WeekCoverage,
    pub payment_count: usize,
}

/// full reconstruction of a loan's weekly payment history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chronology {
    pub loan_id: LoanId,
    pub expected_weekly: Money,
    pub horizon: Option<EvaluationHorizon>,
    pub weeks: Vec<WeekSummary>,
    pub events: Vec<ChronologyEvent>,
    /// payments left out of every sum because their amount was not positive
    pub ignored_payments: Vec<PaymentId>,
    pub final_surplus: Money,
}

impl Chronology {
    fn empty(loan: &LoanRecord) -> Self {
        Self {
            loan_id: loan.id.clone(),
            expected_weekly: loan.expected_weekly(),
            horizon: None,
            weeks: Vec::new(),
            events: Vec::new(),
            ignored_payments: Vec::new(),
            final_surplus: Money::ZERO,
        }
    }

    /// nothing to display
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// number of evaluated weeks with the given coverage
    pub fn count(&self, coverage: CoverageType) -> u32 {
        self.weeks.iter().filter(|w| w.coverage.coverage == coverage).count() as u32
    }

    pub fn missed_weeks(&self) -> u32 {
        self.weeks.iter().filter(|w| w.coverage.coverage.is_miss()).count() as u32
    }

    /// everything paid across payment events, out-of-band included
    pub fn total_paid(&self) -> Money {
        self.events
            .iter()
            .filter(|e| e.is_payment())
            .map(|e| e.amount_paid_this_week)
            .sum()
    }

    pub fn last_payment_date(&self) -> Option<DateTime<Utc>> {
        self.events.iter().rev().find(|e| e.is_payment()).map(|e| e.date)
    }
}

/// the single chronology engine every consumer calls
#[derive(Debug, Clone, Default)]
pub struct ChronologyEngine {
    config: ChronologyConfig,
}

impl ChronologyEngine {
    pub fn new(config: ChronologyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChronologyConfig {
        &self.config
    }

    /// generate using the provider's notion of now
    pub fn generate(&self, loan: &LoanRecord, time_provider: &SafeTimeProvider) -> Chronology {
        self.generate_at(loan, time_provider.now())
    }

    /// generate with system time
    pub fn generate_now(&self, loan: &LoanRecord) -> Chronology {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.generate(loan, &time)
    }

    /// arrears ("pago vdo") for the collections listing
    pub fn arrears(&self, loan: &LoanRecord, time_provider: &SafeTimeProvider) -> ArrearsReport {
        let chronology = self.generate(loan, time_provider);
        ArrearsReport::from_chronology(&chronology, loan)
    }

    /// generate as of `now`; pure in (loan, config, now)
    pub fn generate_at(&self, loan: &LoanRecord, now: DateTime<Utc>) -> Chronology {
        let mut chronology = Chronology::empty(loan);

        let horizon = match HorizonResolver::new(&self.config).resolve(loan, now) {
            Some(horizon) => horizon,
            None => {
                warn!("loan {} has no sign date, chronology is empty", loan.id);
                return chronology;
            }
        };
        chronology.horizon = Some(horizon);

        let tz = self.config.timezone();
        let (sign_date, today) = match loan.sign_date {
            Some(sign) => (local_date(sign, &tz), local_date(now, &tz)),
            None => return chronology,
        };

        // evaluated weeks form a prefix of the grid
        let slots: Vec<WeekSlot> = WeekSlot::enumerate(sign_date, horizon.total_weeks)
            .take_while(|slot| !slot.starts_after(horizon.end_date) && slot.has_ended(today))
            .collect();

        // an evaluated week always sees its whole monday-sunday range
        let cutoff = slots
            .last()
            .map(|slot| slot.end.max(horizon.end_date))
            .unwrap_or(horizon.end_date);

        // receipt order; payment_number breaks same-instant ties
        let mut payments: Vec<&PaymentRecord> = loan.payments.iter().collect();
        payments.sort_by_key(|p| (p.received_at, p.payment_number));

        let mut buckets: Vec<Vec<&PaymentRecord>> = vec![Vec::new(); slots.len()];
        let mut early = Vec::new();
        let mut late = Vec::new();
        for payment in payments {
            if !payment.is_countable() {
                warn!(
                    "loan {} payment {} has non-positive amount {}, ignored",
                    loan.id, payment.id, payment.amount
                );
                chronology.ignored_payments.push(payment.id.clone());
                continue;
            }

            let received = local_date(payment.received_at, &tz);
            if received < sign_date || received > cutoff {
                debug!(
                    "loan {} payment {} on {} is outside [{}, {}]",
                    loan.id, payment.id, received, sign_date, cutoff
                );
                continue;
            }

            match slots.iter().position(|slot| slot.contains(received)) {
                Some(index) => buckets[index].push(payment),
                None if slots.first().map_or(true, |first| received < first.start) => {
                    early.push(payment)
                }
                None => late.push(payment),
            }
        }

        let expected = chronology.expected_weekly;
        let mut classifier = CoverageClassifier::new(expected, self.config.deficit_policy);
        let mut log = EventLog::new();

        for payment in early {
            log.emit(self.out_of_band_event(payment, expected, Money::ZERO, &tz));
        }

        for (slot, week_payments) in slots.iter().zip(buckets) {
            let paid: Money = week_payments.iter().map(|p| p.amount).sum();
            let coverage = classifier.classify(paid);

            debug!(
                "loan {} week {} ({} - {}): paid {} expected {} surplus {} -> {} {:?}",
                loan.id,
                slot.index,
                slot.start,
                slot.end,
                paid,
                expected,
                coverage.surplus_before,
                coverage.surplus_after,
                coverage.coverage
            );

            if week_payments.is_empty() {
                let date = slot.due_instant(&tz);
                log.emit(ChronologyEvent {
                    week_index: Some(slot.index),
                    kind: EventKind::NoPayment,
                    coverage_type: Some(coverage.coverage),
                    amount_expected: coverage.expected,
                    amount_paid_this_week: Money::ZERO,
                    week_paid_total: Money::ZERO,
                    surplus_before: coverage.surplus_before,
                    surplus_after: coverage.surplus_after,
                    payment_id: None,
                    payment_method: None,
                    is_week_primary: true,
                    date,
                    date_formatted: self.format_date(date, &tz),
                });
            } else {
                let last = week_payments.len() - 1;
                for (position, payment) in week_payments.iter().enumerate() {
                    log.emit(ChronologyEvent {
                        week_index: Some(slot.index),
                        kind: EventKind::Payment,
                        coverage_type: Some(coverage.coverage),
                        amount_expected: coverage.expected,
                        amount_paid_this_week: payment.amount,
                        week_paid_total: coverage.paid,
                        surplus_before: coverage.surplus_before,
                        surplus_after: coverage.surplus_after,
                        payment_id: Some(payment.id.clone()),
                        payment_method: Some(payment.payment_method),
                        is_week_primary: position == last,
                        date: payment.received_at,
                        date_formatted: self.format_date(payment.received_at, &tz),
                    });
                }
            }

            chronology.weeks.push(WeekSummary {
                slot: *slot,
                coverage,
                payment_count: week_payments.len(),
            });
        }

        chronology.final_surplus = classifier.surplus();

        for payment in late {
            log.emit(self.out_of_band_event(payment, expected, chronology.final_surplus, &tz));
        }

        chronology.events = log.into_sorted();
        chronology
    }

    fn out_of_band_event(
        &self,
        payment: &PaymentRecord,
        expected: Money,
        surplus: Money,
        tz: &FixedOffset,
    ) -> ChronologyEvent {
        ChronologyEvent {
            week_index: None,
            kind: EventKind::OutOfBandPayment,
            coverage_type: None,
            amount_expected: expected,
            amount_paid_this_week: payment.amount,
            week_paid_total: payment.amount,
            surplus_before: surplus,
            surplus_after: surplus,
            payment_id: Some(payment.id.clone()),
            payment_method: Some(payment.payment_method),
            is_week_primary: false,
            date: payment.received_at,
            date_formatted: self.format_date(payment.received_at, tz),
        }
    }

    fn format_date(&self, date: DateTime<Utc>, tz: &FixedOffset) -> String {
        format_local(date, tz, &self.config.date_format)
    }
}

/// chronology of `loan` under the standard policies
pub fn generate_chronology(
    loan: &LoanRecord,
    time_provider: &SafeTimeProvider,
) -> Vec<ChronologyEvent> {
    ChronologyEngine::default().generate(loan, time_provider).events
}
