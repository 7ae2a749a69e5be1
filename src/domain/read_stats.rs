//! Read-statistics value types and windowing rules.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// Half-open calendar range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The single day `date`.
    pub fn day(date: Date) -> Self {
        Self {
            start: date,
            end: date.next_day().unwrap_or(date),
        }
    }

    /// The `days` calendar days immediately before `today`, excluding `today`.
    pub fn trailing(today: Date, days: u32) -> Self {
        let start = today
            .checked_sub(Duration::days(i64::from(days)))
            .unwrap_or(Date::MIN);
        Self { start, end: today }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Every date of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        std::iter::successors(Some(self.start), |date| date.next_day())
            .take_while(move |date| *date < self.end)
    }
}

/// Summed read count of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReadSum {
    pub date: Date,
    pub read_num: i64,
}

/// Daily read totals over a contiguous window, one slot per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedWindow {
    pub dates: Vec<Date>,
    pub read_nums: Vec<i64>,
}

impl AggregatedWindow {
    /// Lay the sparse per-day sums over every day of `range`; missing days read as zero.
    pub fn from_daily_sums(range: &DateRange, sums: &[DailyReadSum]) -> Self {
        let dates: Vec<Date> = range.days().collect();
        let read_nums = dates
            .iter()
            .map(|date| {
                sums.iter()
                    .filter(|sum| sum.date == *date)
                    .map(|sum| sum.read_num)
                    .sum()
            })
            .collect();
        Self { dates, read_nums }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A content item ranked by its summed read count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotItem {
    pub id: i64,
    pub title: String,
    pub read_num_sum: i64,
}

/// Order hot items by summed reads descending, breaking ties by ascending id.
pub fn rank_hot_items(items: &mut [HotItem]) {
    items.sort_by(|a, b| {
        b.read_num_sum
            .cmp(&a.read_num_sum)
            .then_with(|| a.id.cmp(&b.id))
    });
}
