use chrono::{NaiveDate, NaiveDateTime};
use std::env;

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_date(key: &str, default: NaiveDateTime) -> NaiveDateTime {
    env::var(key)
        .ok()
        .and_then(|value| parse_day(&value))
        .unwrap_or(default)
}

/// Parse a `YYYY-MM-DD` day into midnight of that day.
pub fn parse_day(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Runtime switches for one assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Parse thread-root subjects on the rayon pool before the sequential pass.
    pub parallel_parse: bool,
    /// Rewrite list-tagged subjects while building threads.
    pub clean_subjects: bool,
}

impl AssemblyConfig {
    pub fn from_env() -> Self {
        Self {
            parallel_parse: env_bool("PATCH_TRACKER_PARALLEL_PARSE", false),
            clean_subjects: env_bool("PATCH_TRACKER_CLEAN_SUBJECTS", true),
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Half-open `[from, to)` window applied by the retrieval collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    pub fn from_env() -> Self {
        let fallback = Self::unbounded();
        Self {
            from: env_date("PATCH_TRACKER_FROM", fallback.from),
            to: env_date("PATCH_TRACKER_TO", fallback.to),
        }
    }

    /// The window the mailing-list and commit archives are normally read with.
    pub fn unbounded() -> Self {
        Self {
            from: midnight(2010, 1, 1),
            to: midnight(2100, 1, 1),
        }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        *at >= self.from && *at < self.to
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::from_env()
    }
}
