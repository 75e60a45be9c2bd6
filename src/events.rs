use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CoverageType, EventKind, PaymentId, PaymentMethod};

/// one row of a loan's payment chronology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronologyEvent {
    /// 1-based week number, `None` for out-of-band payments
    pub week_index: Option<u32>,
    pub kind: EventKind,
    /// coverage of the week this event belongs to
    pub coverage_type: Option<CoverageType>,
    pub amount_expected: Money,
    /// this event's own contribution: the payment amount, or zero
    pub amount_paid_this_week: Money,
    /// everything paid in the event's week
    pub week_paid_total: Money,
    pub surplus_before: Money,
    pub surplus_after: Money,
    pub payment_id: Option<PaymentId>,
    pub payment_method: Option<PaymentMethod>,
    /// last payment of its week; the one that displays the week's coverage
    pub is_week_primary: bool,
    pub date: DateTime<Utc>,
    pub date_formatted: String,
}

impl ChronologyEvent {
    pub fn is_payment(&self) -> bool {
        self.kind.is_payment()
    }
}

/// collects events and hands them back in date order
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ChronologyEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: ChronologyEvent) {
        self.events.push(event);
    }

    /// stable sort by date; events emitted earlier win ties
    pub fn into_sorted(mut self) -> Vec<ChronologyEvent> {
        self.events.sort_by_key(|e| e.date);
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(kind: EventKind, day: u32, amount: i64) -> ChronologyEvent {
        ChronologyEvent {
            week_index: Some(1),
            kind,
            coverage_type: Some(CoverageType::Full),
            amount_expected: Money::from_major(300),
            amount_paid_this_week: Money::from_major(amount),
            week_paid_total: Money::from_major(amount),
            surplus_before: Money::ZERO,
            surplus_after: Money::ZERO,
            payment_id: None,
            payment_method: None,
            is_week_primary: false,
            date: Utc.with_ymd_and_hms(2025, 9, day, 12, 0, 0).unwrap(),
            date_formatted: String::new(),
        }
    }

    #[test]
    fn test_event_log_sorts_stably() {
        let mut log = EventLog::new();
        log.emit(event(EventKind::Payment, 16, 100));
        log.emit(event(EventKind::OutOfBandPayment, 5, 50));
        log.emit(event(EventKind::Payment, 16, 200));

        let sorted = log.into_sorted();
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0].kind, EventKind::OutOfBandPayment);
        assert_eq!(sorted[1].amount_paid_this_week, Money::from_major(100));
        assert_eq!(sorted[2].amount_paid_this_week, Money::from_major(200));
    }

    #[test]
    fn test_event_flags() {
        assert!(!event(EventKind::NoPayment, 9, 0).is_payment());
        assert!(event(EventKind::Payment, 9, 300).is_payment());
        assert!(event(EventKind::OutOfBandPayment, 5, 50).is_payment());
    }
}
