pub mod arrears;
pub mod calendar;
pub mod chronology;
pub mod config;
pub mod coverage;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod horizon;
pub mod loan;
pub mod serialization;
pub mod types;

// re-export key types
pub use arrears::{cap_arrears, ArrearsReport};
pub use calendar::WeekSlot;
pub use chronology::{generate_chronology, Chronology, ChronologyEngine, WeekSummary};
pub use config::{ChronologyConfig, DeficitPolicy, FullyPaidPolicy};
pub use coverage::{CoverageClassifier, WeekCoverage};
pub use decimal::Money;
pub use errors::{ChronologyError, Result};
pub use events::{ChronologyEvent, EventLog};
pub use horizon::{EvaluationHorizon, HorizonReason, HorizonResolver};
pub use loan::{LoanRecord, LoanRecordBuilder, PaymentRecord};
pub use serialization::{
    listing_entries, listing_to_json, ChronologyRowView, ChronologyView, ListingEntryView,
};
pub use types::{
    CoverageType, EventKind, LoanId, LoanStatus, PaymentId, PaymentMethod, RowColor,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
