// src/range.rs

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use std::fmt;

/// One unit of fetch work: a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The half-open date interval to backfill: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a window from two `YYYY-MM-DD` strings. Malformed dates are a
    /// hard failure; no work is possible without a valid window.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("parsing start date `{start}`"))?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
            .with_context(|| format!("parsing end date `{end}`"))?;
        Ok(Self { start, end })
    }

    /// Iterate the months covered by this window, oldest first.
    ///
    /// The cursor starts at `start` and advances one true calendar month per
    /// step while strictly before `end`, so month-length irregularities never
    /// cause drift. Each call builds a fresh iterator.
    pub fn months(&self) -> MonthRange {
        MonthRange {
            cursor: self.start,
            end: self.end,
        }
    }
}

/// Lazy iterator over the calendar months of a [`FetchWindow`].
#[derive(Debug, Clone)]
pub struct MonthRange {
    cursor: NaiveDate,
    end: NaiveDate,
}

impl Iterator for MonthRange {
    type Item = MonthKey;

    fn next(&mut self) -> Option<MonthKey> {
        if self.cursor >= self.end {
            return None;
        }
        let key = MonthKey {
            year: self.cursor.year(),
            month: self.cursor.month(),
        };
        // checked_add_months clamps day-of-month (Jan 31 → Feb 28) and only
        // fails at the end of chrono's representable range.
        self.cursor = self.cursor.checked_add_months(Months::new(1))?;
        Some(key)
    }
}
