use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{ChronologyError, Result};
use crate::types::{LoanId, LoanStatus, PaymentId, PaymentMethod};

/// a payment received against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub received_at: DateTime<Utc>,
    pub amount: Money,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_number: Option<u32>,
}

impl PaymentRecord {
    pub fn new(id: impl Into<PaymentId>, received_at: DateTime<Utc>, amount: Money) -> Self {
        Self {
            id: id.into(),
            received_at,
            amount,
            payment_method: PaymentMethod::Cash,
            payment_number: None,
        }
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.payment_number = Some(number);
        self
    }

    /// only positive amounts count toward a week
    pub fn is_countable(&self) -> bool {
        self.amount.is_positive()
    }
}

/// loan record as fetched from the servicing ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub sign_date: Option<DateTime<Utc>>,
    pub week_duration: u32,
    pub amount_requested: Money,
    pub total_amount_due: Money,
    #[serde(default)]
    pub expected_weekly_payment: Option<Money>,
    #[serde(default)]
    pub pending_amount_stored: Option<Money>,
    pub status: LoanStatus,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub finished_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub bad_debt_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl LoanRecord {
    /// builder for creating loan records
    pub fn builder() -> LoanRecordBuilder {
        LoanRecordBuilder::new()
    }

    /// parse a loan record from its json representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// weekly installment; an explicit value takes precedence
    pub fn expected_weekly(&self) -> Money {
        match self.expected_weekly_payment {
            Some(explicit) => explicit,
            None => self.total_amount_due.split(self.week_duration),
        }
    }

    /// marked bad debt either by status or by a recorded date
    pub fn is_bad_debt(&self) -> bool {
        self.status == LoanStatus::BadDebt || self.bad_debt_date.is_some()
    }

    /// sum of all countable payments, regardless of date
    pub fn total_paid(&self) -> Money {
        self.payments
            .iter()
            .filter(|p| p.is_countable())
            .map(|p| p.amount)
            .sum()
    }

    /// structural checks for records created through the builder
    pub fn validate(&self) -> Result<()> {
        let sign_date = self.sign_date.ok_or(ChronologyError::MissingField { field: "sign_date" })?;

        let terminal = [
            ("finished_date", self.finished_date),
            ("bad_debt_date", self.bad_debt_date),
        ];
        for (name, date) in terminal {
            if let Some(date) = date {
                if date < sign_date {
                    return Err(ChronologyError::InvalidDate {
                        message: format!("{} {} is before sign date {}", name, date, sign_date),
                    });
                }
            }
        }

        if let Some(payment) = self.payments.iter().find(|p| !p.is_countable()) {
            return Err(ChronologyError::InvalidPaymentAmount { amount: payment.amount });
        }

        Ok(())
    }
}

/// builder for loan records
#[derive(Default)]
pub struct LoanRecordBuilder {
    id: Option<LoanId>,
    sign_date: Option<DateTime<Utc>>,
    week_duration: Option<u32>,
    amount_requested: Option<Money>,
    total_amount_due: Option<Money>,
    expected_weekly_payment: Option<Money>,
    pending_amount_stored: Option<Money>,
    status: Option<LoanStatus>,
    finished_date: Option<DateTime<Utc>>,
    bad_debt_date: Option<DateTime<Utc>>,
    payments: Vec<PaymentRecord>,
}

impl LoanRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<LoanId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn sign_date(mut self, date: DateTime<Utc>) -> Self {
        self.sign_date = Some(date);
        self
    }

    pub fn week_duration(mut self, weeks: u32) -> Self {
        self.week_duration = Some(weeks);
        self
    }

    pub fn amount_requested(mut self, amount: Money) -> Self {
        self.amount_requested = Some(amount);
        self
    }

    pub fn total_amount_due(mut self, amount: Money) -> Self {
        self.total_amount_due = Some(amount);
        self
    }

    pub fn expected_weekly_payment(mut self, amount: Money) -> Self {
        self.expected_weekly_payment = Some(amount);
        self
    }

    pub fn pending_amount_stored(mut self, amount: Money) -> Self {
        self.pending_amount_stored = Some(amount);
        self
    }

    pub fn status(mut self, status: LoanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn finished_date(mut self, date: DateTime<Utc>) -> Self {
        self.finished_date = Some(date);
        self
    }

    pub fn bad_debt_date(mut self, date: DateTime<Utc>) -> Self {
        self.bad_debt_date = Some(date);
        self
    }

    /// add a cash payment with a generated id
    pub fn payment(mut self, received_at: DateTime<Utc>, amount: Money) -> Self {
        let number = self.payments.len() as u32 + 1;
        let id = format!("PAY-{}", Uuid::new_v4().to_string()[..8].to_uppercase());
        self.payments.push(PaymentRecord::new(id, received_at, amount).with_number(number));
        self
    }

    pub fn payment_record(mut self, payment: PaymentRecord) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn build(self) -> Result<LoanRecord> {
        let sign_date = self.sign_date.ok_or(ChronologyError::MissingField { field: "sign_date" })?;

        let week_duration = self.week_duration.ok_or(ChronologyError::MissingField {
            field: "week_duration",
        })?;

        let amount_requested = self.amount_requested.ok_or(ChronologyError::MissingField {
            field: "amount_requested",
        })?;

        let id = self.id.unwrap_or_else(|| {
            format!("LOAN-{}", Uuid::new_v4().to_string()[..8].to_uppercase())
        });

        let loan = LoanRecord {
            id,
            sign_date: Some(sign_date),
            week_duration,
            amount_requested,
            total_amount_due: self.total_amount_due.unwrap_or(amount_requested),
            expected_weekly_payment: self.expected_weekly_payment,
            pending_amount_stored: self.pending_amount_stored,
            status: self.status.unwrap_or(LoanStatus::Active),
            finished_date: self.finished_date,
            bad_debt_date: self.bad_debt_date,
            payments: self.payments,
        };

        loan.validate()?;
        Ok(loan)
    }
}

/// accepts rfc3339 timestamps or plain dates; anything else becomes `None`
mod lenient_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}
