//! Reporting window resolution.
//!
//! Turns a period name from the dashboard (plus optional custom bounds) into
//! an inclusive timestamp window. `today` is always an explicit input so the
//! result is deterministic.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodName {
    Today,
    Yesterday,
    Last7Days,
    CurrentMonth,
    PreviousMonth,
    AllTime,
    Custom,
}

impl PeriodName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodName::Today => "today",
            PeriodName::Yesterday => "yesterday",
            PeriodName::Last7Days => "last_7_days",
            PeriodName::CurrentMonth => "current_month",
            PeriodName::PreviousMonth => "previous_month",
            PeriodName::AllTime => "all_time",
            PeriodName::Custom => "custom",
        }
    }

    fn parse(name: &str) -> Option<PeriodName> {
        match name.trim().to_lowercase().as_str() {
            "today" => Some(PeriodName::Today),
            "yesterday" => Some(PeriodName::Yesterday),
            "last_7_days" => Some(PeriodName::Last7Days),
            "current_month" => Some(PeriodName::CurrentMonth),
            "previous_month" => Some(PeriodName::PreviousMonth),
            "max" | "all_time" => Some(PeriodName::AllTime),
            "custom" => Some(PeriodName::Custom),
            _ => None,
        }
    }
}

/// Inclusive window; both bounds are set or neither is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Window {
    pub fn unbounded() -> Self {
        Self { bounds: None }
    }

    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            bounds: Some((start, end)),
        }
    }

    /// Whole days from `first` to `last`, end of day inclusive
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::between(start_of_day(first), end_of_day(last))
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.bounds.map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.bounds.map(|(_, end)| end)
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        match self.bounds {
            Some((start, end)) => start <= at && at <= end,
            None => true,
        }
    }

    /// Like [`Window::contains`], for optional timestamp fields. A missing
    /// timestamp never matches, even in an unbounded window.
    pub fn contains_opt(&self, at: Option<NaiveDateTime>) -> bool {
        at.map_or(false, |at| self.contains(at))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds {
            Some((start, end)) => write!(f, "{} .. {}", start, end),
            None => f.write_str("unbounded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPeriod {
    /// Effective period, `Today` when the requested one could not be honoured
    pub name: PeriodName,
    pub window: Window,
    pub label: String,
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// 23:59:59.999 on `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::default()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn parse_date(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

fn today_period(today: NaiveDate) -> ResolvedPeriod {
    ResolvedPeriod {
        name: PeriodName::Today,
        window: Window::days(today, today),
        label: "Today".to_string(),
    }
}

/// Resolve a period name into a window relative to `today`.
///
/// Unknown names, and `custom` without two parseable `YYYY-MM-DD` bounds,
/// resolve to today.
pub fn resolve_period(
    name: &str,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    today: NaiveDate,
) -> ResolvedPeriod {
    let Some(period) = PeriodName::parse(name) else {
        warn!("Unknown period '{}', falling back to today", name);
        return today_period(today);
    };

    match period {
        PeriodName::Today => today_period(today),
        PeriodName::Yesterday => {
            let yesterday = today - Duration::days(1);
            ResolvedPeriod {
                name: period,
                window: Window::days(yesterday, yesterday),
                label: "Yesterday".to_string(),
            }
        }
        PeriodName::Last7Days => ResolvedPeriod {
            name: period,
            window: Window::days(today - Duration::days(6), today),
            label: "Last 7 Days".to_string(),
        },
        PeriodName::CurrentMonth => ResolvedPeriod {
            name: period,
            window: Window::days(first_of_month(today), today),
            label: "Current Month".to_string(),
        },
        PeriodName::PreviousMonth => {
            let last_of_previous = first_of_month(today) - Duration::days(1);
            ResolvedPeriod {
                name: period,
                window: Window::days(first_of_month(last_of_previous), last_of_previous),
                label: "Previous Month".to_string(),
            }
        }
        PeriodName::AllTime => ResolvedPeriod {
            name: period,
            window: Window::unbounded(),
            label: "All Time".to_string(),
        },
        PeriodName::Custom => match (parse_date(custom_start), parse_date(custom_end)) {
            (Some(start), Some(end)) => ResolvedPeriod {
                name: period,
                window: Window::days(start, end),
                label: format!("{} - {}", start.format("%d/%m"), end.format("%d/%m")),
            },
            _ => {
                warn!(
                    "Custom period needs two YYYY-MM-DD dates (got {:?} / {:?}), falling back to today",
                    custom_start, custom_end
                );
                today_period(today)
            }
        },
    }
}
