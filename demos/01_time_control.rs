/// time control - watch weeks close as the clock moves
use payment_chronology_rs::chrono::{Duration, TimeZone, Utc};
use payment_chronology_rs::{
    ChronologyConfig, ChronologyEngine, LoanRecord, Money, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 9, 2, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let loan = LoanRecord::builder()
        .id("L-0002")
        .sign_date(time.now())
        .week_duration(10)
        .amount_requested(Money::from_major(2_000))
        .total_amount_due(Money::from_major(2_500))
        .payment(Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap(), Money::from_major(500))
        .payment(Utc.with_ymd_and_hms(2025, 9, 30, 12, 0, 0).unwrap(), Money::from_major(100))
        .build()?;

    let engine = ChronologyEngine::default();
    let carrying = ChronologyEngine::new(ChronologyConfig::carry_forward());
    println!(
        "signed on {}, installment {}",
        time.now().format("%Y-%m-%d"),
        loan.expected_weekly()
    );

    for _ in 0..6 {
        controller.advance(Duration::weeks(1));
        let chronology = engine.generate(&loan, &time);

        println!(
            "\nas of {}: {} weeks closed",
            time.now().format("%Y-%m-%d"),
            chronology.weeks.len()
        );
        for week in &chronology.weeks {
            println!(
                "  week {:>2} ({} - {}): {:<18} paid {:>8} short {:>8} surplus {:>8}",
                week.slot.index,
                week.slot.start,
                week.slot.end,
                week.coverage.coverage.label(),
                week.coverage.paid,
                week.coverage.shortfall(),
                week.coverage.surplus_after,
            );
        }

        // carrying shortfalls forward changes the balance, not the arrears count
        println!(
            "  arrears: {}  balance if shortfalls carry: {}",
            engine.arrears(&loan, &time).arrears,
            carrying.generate(&loan, &time).final_surplus
        );
    }

    Ok(())
}
