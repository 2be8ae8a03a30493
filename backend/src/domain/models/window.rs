use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;
use super::errors::WindowError;

/// Size of one aggregation bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Hour,
}

impl Granularity {
    /// Start of the bucket containing `at`, on the stored wall-clock value
    pub fn truncate(&self, at: NaiveDateTime) -> NaiveDateTime {
        let midnight = at.date().and_time(NaiveTime::MIN);
        match self {
            Granularity::Day => midnight,
            Granularity::Hour => midnight + Duration::hours(i64::from(at.hour())),
        }
    }

    pub fn step(&self) -> Duration {
        match self {
            Granularity::Day => Duration::days(1),
            Granularity::Hour => Duration::hours(1),
        }
    }
}

/// Inclusive span of buckets: from the bucket holding `first` to the bucket holding `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    first: NaiveDateTime,
    last: NaiveDateTime,
    granularity: Granularity,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, granularity: Granularity) -> Result<Self, WindowError> {
        let first = granularity.truncate(start);
        let last = granularity.truncate(end);
        if last < first {
            return Err(WindowError::Inverted);
        }
        Ok(Self { first, last, granularity })
    }

    /// Day buckets covering `first..=last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self, WindowError> {
        Self::new(
            first.and_time(NaiveTime::MIN),
            last.and_time(NaiveTime::MIN),
            Granularity::Day,
        )
    }

    /// The 24 hour buckets of one day
    pub fn hours_of(day: NaiveDate) -> Self {
        let first = day.and_time(NaiveTime::MIN);
        Self {
            first,
            last: first + Duration::hours(23),
            granularity: Granularity::Hour,
        }
    }

    /// `count` day buckets ending with (and including) `today`
    pub fn trailing_days(today: NaiveDate, count: u32) -> Result<Self, WindowError> {
        if count == 0 {
            return Err(WindowError::Empty);
        }
        let first = today - Duration::days(i64::from(count) - 1);
        Self::days(first, today)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Start of the first bucket
    pub fn start(&self) -> NaiveDateTime {
        self.first
    }

    /// Start of the last bucket
    pub fn last_bucket(&self) -> NaiveDateTime {
        self.last
    }

    /// First instant after the last bucket; reads use `[start, end_exclusive)`
    pub fn end_exclusive(&self) -> NaiveDateTime {
        self.last + self.granularity.step()
    }

    pub fn bucket_count(&self) -> usize {
        let span = self.last - self.first;
        let steps = match self.granularity {
            Granularity::Day => span.num_days(),
            Granularity::Hour => span.num_hours(),
        };
        usize::try_from(steps).unwrap_or(0) + 1
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start() && at < self.end_exclusive()
    }
}

/// A calendar month, parsed from `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthId {
    year: i32,
    month: u32,
}

impl MonthId {
    pub fn new(year: i32, month: u32) -> Result<Self, WindowError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(WindowError::InvalidMonth(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for MonthId {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WindowError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
