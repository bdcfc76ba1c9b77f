//! Calendar period arithmetic for the usage ledger.
//!
//! A period is one calendar month. All month/year rollover logic in the
//! app lives here; no other module does its own date math.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use shared::MONTHS;

/// One calendar month. `month` is zero-based (0 = January, 11 = December),
/// matching the index stored on meter readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        debug_assert!(month < 12, "month must be zero-based 0-11");
        Self { month, year }
    }

    /// The current calendar month according to the local clock.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            month: now.month0(),
            year: now.year(),
        }
    }

    /// The immediately preceding calendar month. January wraps to December
    /// of the previous year.
    pub fn previous(self) -> Self {
        if self.month == 0 {
            Self {
                month: 11,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    pub fn month_name(self) -> &'static str {
        MONTHS[self.month as usize]
    }

    /// Display label, e.g. "Juni 2025".
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Generate `len` consecutive periods ending at `end`, oldest first.
    pub fn rolling_window(end: Period, len: usize) -> Vec<Period> {
        let mut periods = Vec::with_capacity(len);
        let mut cursor = end;

        for _ in 0..len {
            periods.push(cursor);
            cursor = cursor.previous();
        }

        periods.reverse();
        periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_within_a_year() {
        assert_eq!(Period::new(6, 2025).previous(), Period::new(5, 2025));
    }

    #[test]
    fn test_previous_wraps_january_to_december() {
        // January 2025 -> December 2024, never anywhere else
        assert_eq!(Period::new(0, 2025).previous(), Period::new(11, 2024));
    }

    #[test]
    fn test_rolling_window_spans_year_boundary() {
        let window = Period::rolling_window(Period::new(2, 2025), 12);

        assert_eq!(window.len(), 12);
        assert_eq!(window[0], Period::new(3, 2024));
        assert_eq!(window[11], Period::new(2, 2025));

        // Each entry is exactly one month after the previous one
        for pair in window.windows(2) {
            assert_eq!(pair[1].previous(), pair[0]);
        }
    }

    #[test]
    fn test_labels_use_month_display_names() {
        assert_eq!(Period::new(0, 2025).label(), "Januari 2025");
        assert_eq!(Period::new(11, 2024).label(), "Desember 2024");
    }
}
