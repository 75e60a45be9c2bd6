use std::fmt::Write;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// calendar date of an instant in the given timezone
pub fn local_date(instant: DateTime<Utc>, tz: &FixedOffset) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// local midnight of `date`, expressed in utc; naive midnight at the edges of the calendar
pub fn local_midnight(date: NaiveDate, tz: &FixedOffset) -> DateTime<Utc> {
    let naive_local = date.and_time(NaiveTime::MIN);
    naive_local
        .checked_sub_signed(Duration::seconds(tz.local_minus_utc() as i64))
        .unwrap_or(naive_local)
        .and_utc()
}

/// format an instant in local time; an invalid format string falls back to iso dates
pub fn format_local(instant: DateTime<Utc>, tz: &FixedOffset, format: &str) -> String {
    let local = instant.with_timezone(tz);
    let mut formatted = String::new();
    if write!(formatted, "{}", local.format(format)).is_err() {
        formatted.clear();
        let _ = write!(formatted, "{}", local.format(FALLBACK_DATE_FORMAT));
    }
    formatted
}

/// monday of the iso week containing `date`
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// whole weeks needed to cover `start..end`, never less than one
pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days();
    if days <= 0 {
        return 1;
    }
    (((days + 6) / 7) as u32).max(1)
}

/// one installment week relative to the signing date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSlot {
    /// 1-based week number
    pub index: u32,
    /// sign date + 7 * index days; may fall mid-week
    pub due_date: NaiveDate,
    /// monday of the week containing the due date
    pub start: NaiveDate,
    /// sunday of the week containing the due date
    pub end: NaiveDate,
}

impl WeekSlot {
    /// slot for week `index` of a loan signed on `sign_date`, `None` past the end of the calendar
    pub fn for_week(sign_date: NaiveDate, index: u32) -> Option<Self> {
        let due_date = sign_date.checked_add_signed(Duration::weeks(index as i64))?;
        let start = week_monday(due_date);
        Some(Self {
            index,
            due_date,
            start,
            end: start.checked_add_signed(Duration::days(6))?,
        })
    }

    /// slots 1..=total_weeks, stopping early if the calendar runs out
    pub fn enumerate(sign_date: NaiveDate, total_weeks: u32) -> impl Iterator<Item = WeekSlot> {
        (1..=total_weeks).map_while(move |k| Self::for_week(sign_date, k))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// the sunday has fully passed as of `today`
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        today > self.end
    }

    pub fn starts_after(&self, date: NaiveDate) -> bool {
        self.start > date
    }

    /// due date at local midnight, in utc
    pub fn due_instant(&self, tz: &FixedOffset) -> DateTime<Utc> {
        local_midnight(self.due_date, tz)
    }
}
