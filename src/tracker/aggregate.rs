//! Attendance arithmetic over one student's records. No I/O.

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Days looked back from the reference date, which is itself included.
pub const TRAILING_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceTally {
    pub present: u32,
    pub absent: u32,
    pub total: u32,
}

impl AttendanceTally {
    fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
        self.total += 1;
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.present, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSummary {
    pub daily_present: bool,
    /// Tally over `[reference - 30 days, reference]`.
    pub window: AttendanceTally,
    pub overall: AttendanceTally,
    /// Lifetime absences, ascending.
    pub absent_dates: Vec<NaiveDate>,
}

impl AttendanceSummary {
    pub fn window_percentage(&self) -> f64 {
        self.window.percentage()
    }

    pub fn overall_percentage(&self) -> f64 {
        self.overall.percentage()
    }
}

/// `present / total * 100` rounded to one decimal, ties to even; 0 when there
/// is nothing to count.
pub fn percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(present) / f64::from(total) * 100.0;
    (raw * 10.0).round_ties_even() / 10.0
}

pub fn window_start(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// Collapse records to one per date. When a date appears more than once the
/// most recently written record wins; on equal timestamps the later one in
/// the slice wins.
pub fn latest_per_day(records: &[AttendanceRecord]) -> BTreeMap<NaiveDate, &AttendanceRecord> {
    let mut by_day: BTreeMap<NaiveDate, &AttendanceRecord> = BTreeMap::new();
    for record in records {
        by_day
            .entry(record.date)
            .and_modify(|kept| {
                if record.timestamp >= kept.timestamp {
                    *kept = record;
                }
            })
            .or_insert(record);
    }
    by_day
}

pub fn summarize(records: &[AttendanceRecord], reference: NaiveDate) -> AttendanceSummary {
    let from = window_start(reference);

    let mut summary = AttendanceSummary {
        daily_present: false,
        window: AttendanceTally::default(),
        overall: AttendanceTally::default(),
        absent_dates: Vec::new(),
    };

    for (date, record) in latest_per_day(records) {
        summary.overall.count(record.status);

        if (from..=reference).contains(&date) {
            summary.window.count(record.status);
        }

        match record.status {
            AttendanceStatus::Present if date == reference => summary.daily_present = true,
            AttendanceStatus::Absent => summary.absent_dates.push(date),
            _ => {}
        }
    }

    summary
}
