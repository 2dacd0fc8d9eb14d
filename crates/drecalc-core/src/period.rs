//! Date windows and calendar alignment helpers.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Closed date interval; both ends inclusive.
///
/// A range whose start is after its end matches nothing, which callers rely
/// on as a safe degenerate case rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The window of equal length ending the day before this one starts.
    ///
    /// This is the comparison period dashboards put next to the current one.
    pub fn previous(&self) -> DateRange {
        let length = self.end - self.start;
        let end = self.start - Duration::days(1);
        DateRange {
            start: end - length,
            end,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// First day of the calendar quarter containing `date`.
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// Last day of the calendar quarter containing `date`.
pub fn quarter_end(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 3;
    NaiveDate::from_ymd_opt(date.year(), month, 1)
        .map(month_end)
        .unwrap_or(date)
}

/// January 1st of the year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// December 31st of the year containing `date`.
pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// First day of the month `months` months before the one containing `date`.
fn month_start_back(date: NaiveDate, months: u32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Dashboard period presets, resolved against an explicit reference day.
///
/// The reference day is a parameter on purpose: the engine has no ambient
/// clock, so callers decide what "today" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodPreset {
    CurrentMonth,
    Last30Days,
    Last3Months,
    Last6Months,
}

impl PeriodPreset {
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        match self {
            PeriodPreset::CurrentMonth => DateRange::new(month_start(today), month_end(today)),
            PeriodPreset::Last30Days => {
                // 30 days counting today itself.
                DateRange::new(today - Duration::days(29), today)
            }
            PeriodPreset::Last3Months => {
                DateRange::new(month_start_back(today, 2), month_end(today))
            }
            PeriodPreset::Last6Months => {
                DateRange::new(month_start_back(today, 5), month_end(today))
            }
        }
    }
}

impl std::str::FromStr for PeriodPreset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current-month" => Ok(PeriodPreset::CurrentMonth),
            "last-30-days" => Ok(PeriodPreset::Last30Days),
            "last-3-months" => Ok(PeriodPreset::Last3Months),
            "last-6-months" => Ok(PeriodPreset::Last6Months),
            _ => Err(format!("Invalid period preset: {}", s)),
        }
    }
}

impl std::fmt::Display for PeriodPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodPreset::CurrentMonth => write!(f, "current-month"),
            PeriodPreset::Last30Days => write!(f, "last-30-days"),
            PeriodPreset::Last3Months => write!(f, "last-3-months"),
            PeriodPreset::Last6Months => write!(f, "last-6-months"),
        }
    }
}

// ==================== Tests ====================
