//! Date windows for the day, month and year entry points

use crate::diary::DiaryError;
use chrono::{Datelike, NaiveDate};

/// Inclusive range of publication dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// A single day. The day may be today but not later.
    pub fn day(year: i32, month: u32, day: u32, today: NaiveDate) -> Result<Self, DiaryError> {
        let date = ymd(year, month, day)?;
        ensure_not_future(date, today)?;
        Ok(Self { start: date, end: date })
    }

    /// A calendar month, ending at today when the month is still running.
    pub fn month(year: i32, month: u32, today: NaiveDate) -> Result<Self, DiaryError> {
        let start = ymd(year, month, 1)?;
        ensure_not_future(start, today)?;

        let last_day = days_in_month(year, month).ok_or_else(|| invalid(year, month, 1))?;
        let end = ymd(year, month, last_day)?;

        Ok(Self { start, end: end.min(today) })
    }

    /// A calendar year, ending at today for the current year.
    pub fn year(year: i32, today: NaiveDate) -> Result<Self, DiaryError> {
        let start = ymd(year, 1, 1)?;
        ensure_not_future(start, today)?;
        let end = ymd(year, 12, 31)?;

        Ok(Self { start, end: end.min(today) })
    }
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.pred_opt()?.day())
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, DiaryError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(year, month, day))
}

fn invalid(year: i32, month: u32, day: u32) -> DiaryError {
    DiaryError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
}

fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), DiaryError> {
    if date > today {
        return Err(DiaryError::FutureDate { date, today });
    }
    Ok(())
}
