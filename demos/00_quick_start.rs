/// quick start - minimal example to get started
use payment_chronology_rs::chrono::{TimeZone, Utc};
use payment_chronology_rs::{
    ChronologyEngine, ChronologyView, LoanRecord, Money, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 3,000 loan repaid as 4,200 over 14 weeks
    let loan = LoanRecord::builder()
        .id("L-0001")
        .sign_date(Utc.with_ymd_and_hms(2025, 9, 2, 10, 0, 0).unwrap())
        .week_duration(14)
        .amount_requested(Money::from_major(3_000))
        .total_amount_due(Money::from_major(4_200))
        .payment(Utc.with_ymd_and_hms(2025, 9, 16, 11, 0, 0).unwrap(), Money::from_major(300))
        .payment(Utc.with_ymd_and_hms(2025, 9, 23, 11, 0, 0).unwrap(), Money::from_major(300))
        .build()?;

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 9, 29, 8, 0, 0).unwrap()
    ));

    let engine = ChronologyEngine::default();
    let chronology = engine.generate(&loan, &time);

    // print the history table
    println!("{}", ChronologyView::from_chronology(&chronology, &loan).to_json_pretty()?);

    // the same loan against the system clock
    let today = engine.generate_now(&loan);
    if today.is_empty() {
        println!("no closed weeks yet");
    } else {
        println!("as of today: {} weeks, {} missed", today.weeks.len(), today.missed_weeks());
    }

    Ok(())
}
