/// serialization support for chronology consumers
use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::arrears::ArrearsReport;
use crate::calendar::format_local;
use crate::chronology::{Chronology, ChronologyEngine};
use crate::config::ChronologyConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::ChronologyEvent;
use crate::loan::LoanRecord;
use crate::types::{CoverageType, EventKind, LoanId, PaymentMethod, RowColor};

/// one table row for the history page and pdf export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronologyRowView {
    pub week: Option<u32>,
    pub kind: EventKind,
    pub coverage: Option<CoverageType>,
    pub label: String,
    pub color: RowColor,
    pub color_hex: String,
    pub date: String,
    pub expected: Money,
    pub paid: Money,
    pub surplus_before: Money,
    pub surplus_after: Money,
    pub payment_method: Option<PaymentMethod>,
    pub is_week_primary: bool,
}

impl ChronologyRowView {
    pub fn from_event(event: &ChronologyEvent) -> Self {
        let color = event.coverage_type.map(|c| c.row_color()).unwrap_or(RowColor::White);
        let label = match (event.kind, event.coverage_type) {
            (EventKind::OutOfBandPayment, _) => "payment outside schedule".to_string(),
            (_, Some(coverage)) => coverage.label().to_string(),
            (_, None) => String::new(),
        };

        ChronologyRowView {
            week: event.week_index,
            kind: event.kind,
            coverage: event.coverage_type,
            label,
            color,
            color_hex: color.hex().to_string(),
            date: event.date_formatted.clone(),
            expected: event.amount_expected,
            paid: event.amount_paid_this_week,
            surplus_before: event.surplus_before,
            surplus_after: event.surplus_after,
            payment_method: event.payment_method,
            is_week_primary: event.is_week_primary,
        }
    }
}

/// serializable view of a loan's chronology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronologyView {
    pub loan_id: LoanId,
    pub expected_weekly: Money,
    pub horizon_end: Option<NaiveDate>,
    pub rows: Vec<ChronologyRowView>,
    pub summary: ArrearsReport,
}

impl ChronologyView {
    pub fn from_chronology(chronology: &Chronology, loan: &LoanRecord) -> Self {
        ChronologyView {
            loan_id: chronology.loan_id.clone(),
            expected_weekly: chronology.expected_weekly,
            horizon_end: chronology.horizon.map(|h| h.end_date),
            rows: chronology.events.iter().map(ChronologyRowView::from_event).collect(),
            summary: ArrearsReport::from_chronology(chronology, loan),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// one line of the printed collections route sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntryView {
    pub loan_id: LoanId,
    pub expected_weekly: Money,
    #[serde(rename = "pago_vdo")]
    pub arrears: Money,
    pub missed_weeks: u32,
    pub pending_balance: Option<Money>,
    pub last_payment: Option<String>,
}

impl ListingEntryView {
    pub fn from_report(report: &ArrearsReport, config: &ChronologyConfig) -> Self {
        let tz = config.timezone();
        ListingEntryView {
            loan_id: report.loan_id.clone(),
            expected_weekly: report.expected_weekly,
            arrears: report.arrears,
            missed_weeks: report.missed_weeks,
            pending_balance: report.pending_balance,
            last_payment: report
                .last_payment_date
                .map(|d| format_local(d, &tz, &config.date_format)),
        }
    }
}

/// listing rows for a batch of loans, all through the same engine
pub fn listing_entries(
    engine: &ChronologyEngine,
    loans: &[LoanRecord],
    time_provider: &SafeTimeProvider,
) -> Vec<ListingEntryView> {
    loans
        .iter()
        .map(|loan| {
            ListingEntryView::from_report(&engine.arrears(loan, time_provider), engine.config())
        })
        .collect()
}

/// serialize listing rows as pretty json
pub fn listing_to_json(entries: &[ListingEntryView]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
