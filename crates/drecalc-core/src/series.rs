//! Historical statement series over calendar-aligned sub-periods.

use serde::{Deserialize, Serialize};

use crate::model::{Account, LedgerEntry};
use crate::period::{month_end, quarter_end, year_end, DateRange};
use crate::statement::{calculate, Statement};

/// Width of the sub-periods a reporting window is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Quarter,
    Year,
}

impl std::str::FromStr for Granularity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            _ => Err(format!("Invalid granularity: {}", s)),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Month => write!(f, "month"),
            Granularity::Quarter => write!(f, "quarter"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

/// Whether empty sub-periods appear in the series.
///
/// `Full` emits an all-zero statement for quiet sub-periods; `ActiveOnly`
/// drops them (the dashboard's adaptive month list).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    #[default]
    Full,
    ActiveOnly,
}

/// Split `range` into consecutive calendar-aligned sub-periods.
///
/// Sub-periods never overlap and their union covers the range exactly: the
/// first and last are clamped to the range bounds, so a window opening
/// mid-month yields a short first sub-period.
pub fn partition(range: DateRange, granularity: Granularity) -> Vec<DateRange> {
    let mut sub_periods = Vec::new();
    let mut cursor = range.start;

    while cursor <= range.end {
        let aligned_end = match granularity {
            Granularity::Month => month_end(cursor),
            Granularity::Quarter => quarter_end(cursor),
            Granularity::Year => year_end(cursor),
        };
        let end = aligned_end.min(range.end);
        sub_periods.push(DateRange::new(cursor, end));

        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    sub_periods
}

/// One statement per sub-period of the window, in chronological order.
pub fn build_series(
    entries: &[LedgerEntry],
    accounts: &[Account],
    company_id: &str,
    range: DateRange,
    granularity: Granularity,
    mode: SeriesMode,
) -> Vec<Statement> {
    partition(range, granularity)
        .into_iter()
        .filter(|sub_period| match mode {
            SeriesMode::Full => true,
            SeriesMode::ActiveOnly => entries
                .iter()
                .any(|e| e.company_id == company_id && sub_period.contains(e.date)),
        })
        .map(|sub_period| calculate(entries, accounts, company_id, sub_period))
        .collect()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountKind;
    use crate::types::{Category, EntryType};
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn revenue_account() -> Vec<Account> {
        vec![Account {
            id: "a1".to_string(),
            code: String::new(),
            name: "Vendas".to_string(),
            category: Category::GrossRevenue,
            kind: AccountKind::Analytic,
            active: true,
        }]
    }

    fn credit(id: &str, day: NaiveDate, amount: f64) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            company_id: "c1".to_string(),
            account_id: "a1".to_string(),
            date: day,
            description: String::new(),
            amount,
            entry_type: EntryType::Credit,
        }
    }

    #[test]
    fn test_month_partition_covers_year_exactly() {
        let year = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        let months = partition(year, Granularity::Month);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].start, date(2024, 1, 1));
        assert_eq!(months[11].end, date(2024, 12, 31));
        for pair in months.windows(2) {
            // Consecutive, gap-free, non-overlapping.
            assert_eq!(pair[0].end + Duration::days(1), pair[1].start);
        }
    }

    #[test]
    fn test_partition_clamps_to_window() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 3, 10));
        let months = partition(range, Granularity::Month);

        assert_eq!(months.len(), 3);
        assert_eq!(months[0], DateRange::new(date(2024, 1, 15), date(2024, 1, 31)));
        assert_eq!(months[1], DateRange::new(date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(months[2], DateRange::new(date(2024, 3, 1), date(2024, 3, 10)));
    }

    #[test]
    fn test_quarter_partition_calendar_aligned() {
        let range = DateRange::new(date(2024, 2, 10), date(2024, 8, 20));
        let quarters = partition(range, Granularity::Quarter);

        assert_eq!(quarters.len(), 3);
        assert_eq!(quarters[0], DateRange::new(date(2024, 2, 10), date(2024, 3, 31)));
        assert_eq!(quarters[1], DateRange::new(date(2024, 4, 1), date(2024, 6, 30)));
        assert_eq!(quarters[2], DateRange::new(date(2024, 7, 1), date(2024, 8, 20)));
    }

    #[test]
    fn test_year_partition() {
        let range = DateRange::new(date(2022, 6, 1), date(2024, 2, 1));
        let years = partition(range, Granularity::Year);

        assert_eq!(years.len(), 3);
        assert_eq!(years[0], DateRange::new(date(2022, 6, 1), date(2022, 12, 31)));
        assert_eq!(years[1], DateRange::new(date(2023, 1, 1), date(2023, 12, 31)));
        assert_eq!(years[2], DateRange::new(date(2024, 1, 1), date(2024, 2, 1)));
    }

    #[test]
    fn test_inverted_range_partitions_to_nothing() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 1, 1));
        assert!(partition(range, Granularity::Month).is_empty());
    }

    #[test]
    fn test_full_series_keeps_empty_months() {
        let accounts = revenue_account();
        let entries = vec![
            credit("e1", date(2024, 1, 10), 100.0),
            credit("e2", date(2024, 3, 10), 300.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 3, 31));

        let series = build_series(
            &entries,
            &accounts,
            "c1",
            range,
            Granularity::Month,
            SeriesMode::Full,
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].gross_revenue, 100.0);
        assert_eq!(series[1].gross_revenue, 0.0);
        assert_eq!(series[1].net_margin, 0.0);
        assert_eq!(series[2].gross_revenue, 300.0);
    }

    #[test]
    fn test_active_only_series_drops_empty_months() {
        let accounts = revenue_account();
        let entries = vec![
            credit("e1", date(2024, 1, 10), 100.0),
            credit("e2", date(2024, 3, 10), 300.0),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 3, 31));

        let series = build_series(
            &entries,
            &accounts,
            "c1",
            range,
            Granularity::Month,
            SeriesMode::ActiveOnly,
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].start_date, date(2024, 1, 1));
        assert_eq!(series[1].start_date, date(2024, 3, 1));
    }

    #[test]
    fn test_series_is_chronological() {
        let accounts = revenue_account();
        let entries: Vec<LedgerEntry> = (1..=6)
            .map(|month| credit(&format!("e{}", month), date(2024, month, 5), 10.0))
            .collect();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 6, 30));

        let series = build_series(
            &entries,
            &accounts,
            "c1",
            range,
            Granularity::Month,
            SeriesMode::Full,
        );
        for pair in series.windows(2) {
            assert!(pair[0].end_date < pair[1].start_date);
        }
    }
}
