//! Names of the cached dashboard datasets.

use std::fmt;

/// A dataset the home dashboard keeps in the cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    /// Seven-day read trend for the blog category.
    DatesAndReadNums,
    /// Yesterday's top items.
    HotBlogsForYesterday,
    /// Top blogs over the trailing seven days.
    HotBlogsFor7Days,
}

impl DatasetKey {
    pub const ALL: [DatasetKey; 3] = [
        DatasetKey::DatesAndReadNums,
        DatasetKey::HotBlogsForYesterday,
        DatasetKey::HotBlogsFor7Days,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKey::DatesAndReadNums => "dates_and_read_nums",
            DatasetKey::HotBlogsForYesterday => "hot_blogs_for_yesterday_day",
            DatasetKey::HotBlogsFor7Days => "hot_blogs_for_7_days",
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
