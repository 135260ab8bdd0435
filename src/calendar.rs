use crate::ledger::{DailySummary, Ledger, LedgerError};
use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month, displayed and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() => 29,
            _ => 28,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Previous month, rolling January back to December of the prior year.
    /// Stays put at the lower edge of chrono's date range.
    pub fn prev(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    /// Next month, rolling December over to January of the following year.
    pub fn next(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| LedgerError::InvalidMonth(trimmed.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| LedgerError::InvalidMonth(trimmed.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| LedgerError::InvalidMonth(trimmed.to_string()))?;
        Self::new(year, month).ok_or_else(|| LedgerError::InvalidMonth(trimmed.to_string()))
    }
}

/// Truncates a timestamp to its calendar day in the timestamp's own zone.
pub fn day_of<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.date_naive()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(trimmed.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One slot of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell<'a> {
    /// Padding before the first day of the month.
    Blank,
    Day(CalendarDay<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub summary: Option<&'a DailySummary>,
}

impl<'a> CalendarCell<'a> {
    pub fn day(&self) -> Option<&CalendarDay<'a>> {
        match self {
            Self::Blank => None,
            Self::Day(day) => Some(day),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Lays out `month` as a Sunday-first grid: one blank per weekday before the
/// 1st, then one cell per day. No trailing padding.
pub fn build_month_grid<'a>(
    ledger: &'a Ledger,
    month: YearMonth,
    selected: NaiveDate,
    today: NaiveDate,
) -> Vec<CalendarCell<'a>> {
    let leading = month.first_day().weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(leading + month.days_in_month() as usize);
    cells.extend((0..leading).map(|_| CalendarCell::Blank));

    for date in month.days() {
        cells.push(CalendarCell::Day(CalendarDay {
            date,
            day: date.day(),
            is_today: date == today,
            is_selected: date == selected,
            summary: ledger.summary_for(date),
        }));
    }

    cells
}
