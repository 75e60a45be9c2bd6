/// collections listing - arrears for a route sheet of loans
use payment_chronology_rs::chrono::{TimeZone, Utc};
use payment_chronology_rs::{
    listing_entries, listing_to_json, ChronologyConfig, ChronologyEngine, LoanRecord, LoanStatus,
    Money, PaymentMethod, PaymentRecord, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== collections listing example ===\n");

    let sign = Utc.with_ymd_and_hms(2025, 9, 2, 15, 0, 0).unwrap();
    let paid_on = |m: u32, d: u32| Utc.with_ymd_and_hms(2025, m, d, 18, 0, 0).unwrap();

    let on_time = LoanRecord::builder()
        .id("L-1001")
        .sign_date(sign)
        .week_duration(14)
        .amount_requested(Money::from_major(3_000))
        .total_amount_due(Money::from_major(4_200))
        .pending_amount_stored(Money::from_major(3_000))
        .payment(paid_on(9, 9), Money::from_major(300))
        .payment(paid_on(9, 16), Money::from_major(300))
        .payment(paid_on(9, 23), Money::from_major(300))
        .payment(paid_on(9, 30), Money::from_major(300))
        .build()?;

    let behind = LoanRecord::builder()
        .id("L-1002")
        .sign_date(sign)
        .week_duration(12)
        .amount_requested(Money::from_major(1_500))
        .total_amount_due(Money::from_major(1_800))
        .pending_amount_stored(Money::from_major(1_650))
        .payment_record(
            PaymentRecord::new("DEP-2207", paid_on(9, 11), Money::from_major(150))
                .with_method(PaymentMethod::MoneyBank),
        )
        .build()?;

    let written_off = LoanRecord::builder()
        .id("L-1003")
        .sign_date(sign)
        .week_duration(10)
        .amount_requested(Money::from_major(1_000))
        .total_amount_due(Money::from_major(1_200))
        .pending_amount_stored(Money::from_major(240))
        .status(LoanStatus::BadDebt)
        .bad_debt_date(paid_on(9, 29))
        .build()?;

    // route sheets are printed in central time
    let engine = ChronologyEngine::new(ChronologyConfig::standard().with_utc_offset_hours(-6));
    engine.config().validate()?;

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 10, 6, 14, 0, 0).unwrap()
    ));

    let loans = [on_time, behind, written_off];
    let behind_count = loans
        .iter()
        .filter(|loan| engine.arrears(loan, &time).is_in_arrears())
        .count();
    println!("{} of {} loans are behind\n", behind_count, loans.len());

    let entries = listing_entries(&engine, &loans, &time);
    for entry in &entries {
        println!(
            "{}  installment {:>8}  missed {:>2}  pago vdo {:>8}",
            entry.loan_id, entry.expected_weekly, entry.missed_weeks, entry.arrears
        );
    }

    println!("\n{}", listing_to_json(&entries)?);

    Ok(())
}
