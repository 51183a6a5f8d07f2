#![forbid(unsafe_code)]

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// A calendar date with a 1-based month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDay {
    date: NaiveDate,
}

impl CalendarDay {
    pub fn try_new(year: i32, month: u32, day: u32) -> Result<Self, CalendarDayError> {
        let date =
            NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarDayError::InvalidDate)?;
        Ok(Self { date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Epoch milliseconds of midnight at the start of this day in the local time zone.
    pub fn start_millis_local(&self) -> Result<i64, CalendarDayError> {
        self.start_millis_in(&Local)
    }

    /// Epoch milliseconds of the first instant of this day in `tz`.
    ///
    /// When midnight falls into a DST gap the day starts at 01:00 instead.
    pub fn start_millis_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<i64, CalendarDayError> {
        let midnight = self.at(0)?;
        if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
            return Ok(start.timestamp_millis());
        }
        tz.from_local_datetime(&self.at(1)?)
            .earliest()
            .map(|start| start.timestamp_millis())
            .ok_or(CalendarDayError::UnresolvableMidnight)
    }

    fn at(&self, hour: u32) -> Result<NaiveDateTime, CalendarDayError> {
        self.date
            .and_hms_opt(hour, 0, 0)
            .ok_or(CalendarDayError::InvalidDate)
    }
}

impl std::fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarDayError {
    InvalidDate,
    UnresolvableMidnight,
}

impl CalendarDayError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidDate => "invalid calendar date",
            Self::UnresolvableMidnight => "start of day does not exist in the local time zone",
        }
    }
}

/// The `[start, start + lasting days]` interval a task occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskWindow {
    pub start_date_ms: i64,
    pub lasting_days: i64,
}

impl TaskWindow {
    pub fn new(start_date_ms: i64, lasting_days: i64) -> Self {
        Self {
            start_date_ms,
            lasting_days,
        }
    }

    pub fn end_ms(&self) -> i64 {
        self.start_date_ms
            .saturating_add(self.lasting_days.saturating_mul(MILLIS_PER_DAY))
    }

    /// Both ends of the window are inclusive.
    pub fn is_active_on(&self, day_start_ms: i64) -> bool {
        self.start_date_ms <= day_start_ms && self.end_ms() >= day_start_ms
    }

    pub fn is_overdue_at(&self, now_ms: i64, is_done: bool) -> bool {
        !is_done && self.end_ms() < now_ms
    }
}
