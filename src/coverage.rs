use serde::{Deserialize, Serialize};

use crate::config::DeficitPolicy;
use crate::decimal::Money;
use crate::types::CoverageType;

/// classification result for one evaluated week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCoverage {
    pub coverage: CoverageType,
    pub expected: Money,
    pub paid: Money,
    pub surplus_before: Money,
    pub surplus_after: Money,
}

impl WeekCoverage {
    /// amount the week fell short by, zero when covered
    pub fn shortfall(&self) -> Money {
        (self.expected - (self.surplus_before + self.paid)).non_negative()
    }
}

/// running surplus classifier, fed one week at a time in order
#[derive(Debug, Clone)]
pub struct CoverageClassifier {
    expected: Money,
    policy: DeficitPolicy,
    surplus: Money,
}

impl CoverageClassifier {
    pub fn new(expected: Money, policy: DeficitPolicy) -> Self {
        Self {
            expected,
            policy,
            surplus: Money::ZERO,
        }
    }

    /// balance carried into the next week
    pub fn surplus(&self) -> Money {
        self.surplus
    }

    /// classify the next week given what was paid in it
    pub fn classify(&mut self, paid: Money) -> WeekCoverage {
        let paid = paid.non_negative();
        let surplus_before = self.surplus;
        let covered = surplus_before + paid;

        // no obligation: every week is full and everything paid is surplus
        if !self.expected.is_positive() {
            self.surplus = self.carry(covered);
            return WeekCoverage {
                coverage: CoverageType::Full,
                expected: self.expected,
                paid,
                surplus_before,
                surplus_after: self.surplus,
            };
        }

        let reached = covered >= self.expected;
        let coverage = match (paid.is_positive(), reached) {
            (false, true) => CoverageType::CoveredBySurplus,
            (false, false) => CoverageType::Miss,
            (true, true) => CoverageType::Full,
            (true, false) => CoverageType::Partial,
        };

        self.surplus = self.carry(covered - self.expected);

        WeekCoverage {
            coverage,
            expected: self.expected,
            paid,
            surplus_before,
            surplus_after: self.surplus,
        }
    }

    fn carry(&self, balance: Money) -> Money {
        match self.policy {
            DeficitPolicy::ForgiveShortfall => balance.non_negative(),
            DeficitPolicy::CarryForward => balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(amount: i64) -> Money {
        Money::from_major(amount)
    }

    #[test]
    fn test_surplus_covers_next_week() {
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::ForgiveShortfall);

        let week1 = classifier.classify(m(600));
        assert_eq!(week1.coverage, CoverageType::Full);
        assert_eq!(week1.surplus_after, m(300));

        let week2 = classifier.classify(Money::ZERO);
        assert_eq!(week2.coverage, CoverageType::CoveredBySurplus);
        assert_eq!(week2.surplus_before, m(300));
        assert_eq!(week2.surplus_after, Money::ZERO);

        let week3 = classifier.classify(Money::ZERO);
        assert_eq!(week3.coverage, CoverageType::Miss);
        assert_eq!(week3.shortfall(), m(300));
    }

    #[test]
    fn test_partial_surplus_with_payment() {
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::ForgiveShortfall);
        classifier.classify(m(450));

        // 150 carried + 100 paid is still short
        let week2 = classifier.classify(m(100));
        assert_eq!(week2.coverage, CoverageType::Partial);
        assert_eq!(week2.shortfall(), m(50));
        assert_eq!(week2.surplus_after, Money::ZERO);

        // 150 carried + 150 paid reaches it
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::ForgiveShortfall);
        classifier.classify(m(450));
        assert_eq!(classifier.classify(m(150)).coverage, CoverageType::Full);
    }

    #[test]
    fn test_surplus_alone_short_is_miss() {
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::ForgiveShortfall);
        classifier.classify(m(400));
        let week2 = classifier.classify(Money::ZERO);
        assert_eq!(week2.coverage, CoverageType::Miss);
        assert_eq!(week2.surplus_after, Money::ZERO);
    }

    #[test]
    fn test_forgive_policy_resets_after_miss() {
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::ForgiveShortfall);
        assert_eq!(classifier.classify(Money::ZERO).coverage, CoverageType::Miss);
        assert_eq!(classifier.surplus(), Money::ZERO);
        assert_eq!(classifier.classify(m(300)).coverage, CoverageType::Full);
    }

    #[test]
    fn test_carry_forward_policy_accumulates_deficit() {
        let mut classifier = CoverageClassifier::new(m(300), DeficitPolicy::CarryForward);
        assert_eq!(classifier.classify(Money::ZERO).coverage, CoverageType::Miss);
        assert_eq!(classifier.surplus(), m(-300));

        let week2 = classifier.classify(m(300));
        assert_eq!(week2.coverage, CoverageType::Partial);
        assert_eq!(week2.surplus_after, m(-300));

        let week3 = classifier.classify(m(600));
        assert_eq!(week3.coverage, CoverageType::Full);
        assert_eq!(week3.surplus_after, Money::ZERO);
    }

    #[test]
    fn test_no_obligation_is_always_full() {
        let mut classifier = CoverageClassifier::new(Money::ZERO, DeficitPolicy::ForgiveShortfall);
        assert_eq!(classifier.classify(Money::ZERO).coverage, CoverageType::Full);
        assert_eq!(classifier.classify(m(50)).surplus_after, m(50));

        let mut negative = CoverageClassifier::new(m(-10), DeficitPolicy::CarryForward);
        assert_eq!(negative.classify(Money::ZERO).coverage, CoverageType::Full);
        assert_eq!(negative.surplus(), Money::ZERO);
    }
}
