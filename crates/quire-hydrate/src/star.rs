//! Star count metric and its display format.

use std::num::NonZeroU64;

/// A known, non-zero repository star count.
///
/// Zero and absent counts are both "unknown" and produce no badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StarMetric(NonZeroU64);

impl StarMetric {
    /// Wrap a count from a star source, rejecting absent and zero values.
    pub fn new(count: Option<u64>) -> Option<Self> {
        count.and_then(NonZeroU64::new).map(Self)
    }

    /// The raw count.
    pub fn count(self) -> u64 {
        self.0.get()
    }

    /// The count as displayed, e.g. `12.3k`.
    pub fn formatted(self) -> String {
        format_stars(self.count())
    }

    /// Text content of the badge element.
    pub fn badge_text(self) -> String {
        format!("★ {}", self.formatted())
    }
}

/// Format a star count: counts of 1000 and above use a one-decimal `k`
/// abbreviation, smaller counts are printed as-is.
///
/// Halves round up (`1250` is `1.3k`), matching the browser runtime.
pub fn format_stars(count: u64) -> String {
    if count >= 1000 {
        let tenths = (count + 50) / 100;
        format!("{}.{}k", tenths / 10, tenths % 10)
    } else {
        count.to_string()
    }
}
