use serde::{Deserialize, Serialize};

/// unique identifier for a loan
pub type LoanId = String;

/// unique identifier for a payment
pub type PaymentId = String;

/// loan status as stored by the servicing ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// disbursed and collecting
    Active,
    /// fully paid off
    Finished,
    /// closed by a renewal into a new loan
    Renewed,
    /// written off as uncollectable
    BadDebt,
    /// voided before collection
    Cancelled,
}

impl LoanStatus {
    /// statuses whose `finished_date` bounds evaluation
    pub fn is_closed(&self) -> bool {
        matches!(self, LoanStatus::Finished | LoanStatus::Renewed)
    }
}

/// how a payment was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    /// deposit collected through the field agent's bank account
    MoneyBank,
    Transfer,
    Other,
}

/// how a week's installment obligation was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageType {
    /// payments (plus surplus) reached the installment
    Full,
    /// something was paid but the installment was not reached
    Partial,
    /// nothing paid, prior surplus absorbed the installment
    CoveredBySurplus,
    /// nothing paid and no surplus to absorb it
    Miss,
}

impl CoverageType {
    /// row colour used by the history table and pdf export
    pub fn row_color(&self) -> RowColor {
        match self {
            CoverageType::Full => RowColor::White,
            CoverageType::Partial => RowColor::Yellow,
            CoverageType::CoveredBySurplus => RowColor::Blue,
            CoverageType::Miss => RowColor::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoverageType::Full => "full payment",
            CoverageType::Partial => "partial payment",
            CoverageType::CoveredBySurplus => "covered by surplus",
            CoverageType::Miss => "missed payment",
        }
    }

    /// true when the week counts toward arrears
    pub fn is_miss(&self) -> bool {
        matches!(self, CoverageType::Miss)
    }
}

/// chronology event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Payment,
    NoPayment,
    /// payment inside the loan's life but outside every evaluated week
    OutOfBandPayment,
}

impl EventKind {
    pub fn is_payment(&self) -> bool {
        matches!(self, EventKind::Payment | EventKind::OutOfBandPayment)
    }
}

/// display colour for a chronology row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowColor {
    White,
    Yellow,
    Blue,
    Red,
}

impl RowColor {
    /// hex fill used by the exporters
    pub fn hex(&self) -> &'static str {
        match self {
            RowColor::White => "#FFFFFF",
            RowColor::Yellow => "#FEF3C7",
            RowColor::Blue => "#DBEAFE",
            RowColor::Red => "#FEE2E2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_colors() {
        assert_eq!(CoverageType::Full.row_color(), RowColor::White);
        assert_eq!(CoverageType::Partial.row_color(), RowColor::Yellow);
        assert_eq!(CoverageType::CoveredBySurplus.row_color(), RowColor::Blue);
        assert_eq!(CoverageType::Miss.row_color(), RowColor::Red);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&LoanStatus::BadDebt).unwrap();
        assert_eq!(json, "\"BAD_DEBT\"");

        let status: LoanStatus = serde_json::from_str("\"RENEWED\"").unwrap();
        assert!(status.is_closed());
    }
}
