//! Calendar windows for day, month and year views.
//!
//! Every function here is pure and infallible. Results stay in the time zone
//! of their input and have all components below the granularity zeroed, so
//! `start_of_month` of `2016-10-31T23:59:59+09:00` is `2016-10-01T00:00:00+09:00`.
//!
//! A [`Window`] is the half-open interval `[start, end)` covering one calendar
//! period. The record selector hands it to storage as a range query.

use crate::errors::{Error, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc,
};
use std::fmt;

/// Size of the calendar period a view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One calendar day
    Day,
    /// One calendar month
    Month,
    /// One calendar year
    Year,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

/// Midnight at the start of `date` in `tz`.
///
/// A midnight skipped by a DST transition resolves to the first whole hour
/// after it; an ambiguous midnight resolves to the earlier instant.
fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let local = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(a, b) => a.min(b),
        LocalResult::None => (1..=24)
            .find_map(|hours| {
                local
                    .checked_add_signed(TimeDelta::hours(hours))
                    .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
            })
            .unwrap_or_else(|| tz.from_utc_datetime(&local)),
    }
}

/// First day of the month `delta` months away from `date`'s month.
fn first_of_month(date: NaiveDate, delta: i32) -> NaiveDate {
    // month0 is always < 12
    #[allow(clippy::cast_possible_wrap)]
    let index = date.year() * 12 + date.month0() as i32 + delta;
    #[allow(clippy::cast_sign_loss)]
    let month = (index.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), month, 1).unwrap_or(if delta < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// January 1st of the year `delta` years away from `date`'s year.
fn first_of_year(date: NaiveDate, delta: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year().saturating_add(delta), 1, 1).unwrap_or(if delta < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Midnight of `t`'s calendar day.
#[must_use]
pub fn start_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), t.date_naive())
}

/// Midnight of the day after `t`'s calendar day.
#[must_use]
pub fn start_of_next_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive().succ_opt().unwrap_or(NaiveDate::MAX);
    midnight(&t.timezone(), date)
}

/// Midnight of the day before `t`'s calendar day.
#[must_use]
pub fn start_of_prev_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive().pred_opt().unwrap_or(NaiveDate::MIN);
    midnight(&t.timezone(), date)
}

/// First instant of `t`'s calendar month.
#[must_use]
pub fn start_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_month(t.date_naive(), 0))
}

/// First instant of the month after `t`'s. December rolls into January.
#[must_use]
pub fn start_of_next_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_month(t.date_naive(), 1))
}

/// First instant of the month before `t`'s. January rolls back into December.
#[must_use]
pub fn start_of_prev_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_month(t.date_naive(), -1))
}

/// January 1st of `t`'s year.
#[must_use]
pub fn start_of_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_year(t.date_naive(), 0))
}

/// January 1st of the year after `t`'s.
#[must_use]
pub fn start_of_next_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_year(t.date_naive(), 1))
}

/// January 1st of the year before `t`'s.
#[must_use]
pub fn start_of_prev_year<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&t.timezone(), first_of_year(t.date_naive(), -1))
}

/// Half-open interval `[start, end)` covering one calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<Tz: TimeZone> {
    /// Period size
    pub granularity: Granularity,
    /// First instant inside the window
    pub start: DateTime<Tz>,
    /// First instant after the window
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> Window<Tz> {
    /// The window of the given granularity that contains `t`.
    #[must_use]
    pub fn containing(t: &DateTime<Tz>, granularity: Granularity) -> Self {
        let (start, end) = match granularity {
            Granularity::Day => (start_of_day(t), start_of_next_day(t)),
            Granularity::Month => (start_of_month(t), start_of_next_month(t)),
            Granularity::Year => (start_of_year(t), start_of_next_year(t)),
        };
        Self {
            granularity,
            start,
            end,
        }
    }

    /// Whether `t` falls inside the window. `start` is included, `end` is not.
    #[must_use]
    pub fn contains<Tz2: TimeZone>(&self, t: &DateTime<Tz2>) -> bool {
        self.start <= *t && *t < self.end
    }

    /// The adjacent window after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::containing(&self.end, self.granularity)
    }

    /// The adjacent window before this one.
    #[must_use]
    pub fn prev(&self) -> Self {
        let earlier = match self.granularity {
            Granularity::Day => start_of_prev_day(&self.start),
            Granularity::Month => start_of_prev_month(&self.start),
            Granularity::Year => start_of_prev_year(&self.start),
        };
        Self::containing(&earlier, self.granularity)
    }

    /// The same interval expressed in UTC, as stored in the database.
    #[must_use]
    pub fn to_utc(&self) -> Window<Utc> {
        Window {
            granularity: self.granularity,
            start: self.start.with_timezone(&Utc),
            end: self.end.with_timezone(&Utc),
        }
    }
}

fn invalid_date(input: &str) -> Error {
    Error::InvalidDate {
        input: input.to_string(),
    }
}

/// Reads a fixed-width, unsigned decimal field such as `MM` or `DD`.
fn parse_field(field: &str, width: usize, input: &str) -> Result<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_date(input));
    }
    field.parse().map_err(|_| invalid_date(input))
}

fn parse_year_number(field: &str, input: &str) -> Result<i32> {
    let year = parse_field(field, 4, input)?;
    i32::try_from(year).map_err(|_| invalid_date(input))
}

/// Parses a `YYYY-MM-DD` day into its midnight at `offset`.
pub fn parse_day(input: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let mut fields = input.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid_date(input));
    };
    let date = NaiveDate::from_ymd_opt(
        parse_year_number(year, input)?,
        parse_field(month, 2, input)?,
        parse_field(day, 2, input)?,
    )
    .ok_or_else(|| invalid_date(input))?;
    Ok(midnight(&offset, date))
}

/// Parses a `YYYY-MM` month into the midnight of its first day at `offset`.
pub fn parse_month(input: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let (year, month) = input.split_once('-').ok_or_else(|| invalid_date(input))?;
    let date =
        NaiveDate::from_ymd_opt(parse_year_number(year, input)?, parse_field(month, 2, input)?, 1)
            .ok_or_else(|| invalid_date(input))?;
    Ok(midnight(&offset, date))
}

/// Parses a `YYYY` year into the midnight of January 1st at `offset`.
pub fn parse_year(input: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let year = parse_year_number(input, input)?;
    let date = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| invalid_date(input))?;
    Ok(midnight(&offset, date))
}

/// Parses any of `YYYY-MM-DD`, `YYYY-MM` or `YYYY` and returns the window it names.
pub fn parse_period(input: &str, offset: FixedOffset) -> Result<Window<FixedOffset>> {
    let (granularity, start) = match input.matches('-').count() {
        0 => (Granularity::Year, parse_year(input, offset)?),
        1 => (Granularity::Month, parse_month(input, offset)?),
        2 => (Granularity::Day, parse_day(input, offset)?),
        _ => return Err(invalid_date(input)),
    };
    Ok(Window::containing(&start, granularity))
}
