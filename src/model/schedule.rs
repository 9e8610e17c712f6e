use crate::model::error::config::ConfigError;
use chrono::{Duration, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CadenceKind {
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Interval,
}

impl fmt::Display for CadenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CadenceKind::Minutely => "minutely",
            CadenceKind::Hourly => "hourly",
            CadenceKind::Daily => "daily",
            CadenceKind::Weekly => "weekly",
            CadenceKind::Interval => "interval",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CadenceValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for CadenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CadenceValue::Number(number) => write!(f, "{number}"),
            CadenceValue::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// A validated recurrence. Offsets are relative to the start of the
/// enclosing minute, hour, day or Monday-based week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSpec {
    Minutely { second: u32 },
    Hourly { minute: u32 },
    Daily { hour: u32 },
    Weekly { weekday: Weekday },
    Interval { period: Duration },
}

impl ScheduleSpec {
    pub fn parse(target: &str, kind: CadenceKind, value: &CadenceValue) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::invalid_schedule_value(target, kind.to_string(), value.to_string());

        let spec = match kind {
            CadenceKind::Minutely => ScheduleSpec::Minutely {
                second: parse_offset(value, 59).ok_or_else(invalid)?,
            },
            CadenceKind::Hourly => ScheduleSpec::Hourly {
                minute: parse_offset(value, 59).ok_or_else(invalid)?,
            },
            CadenceKind::Daily => ScheduleSpec::Daily {
                hour: parse_offset(value, 23).ok_or_else(invalid)?,
            },
            CadenceKind::Weekly => match value {
                CadenceValue::Text(text) => ScheduleSpec::Weekly {
                    weekday: text.trim().parse::<Weekday>().map_err(|_| invalid())?,
                },
                CadenceValue::Number(_) => return Err(invalid()),
            },
            CadenceKind::Interval => ScheduleSpec::Interval {
                period: parse_period(value).ok_or_else(invalid)?,
            },
        };
        Ok(spec)
    }
}

// Accepts 7, "7", "07" and the ":07" form.
fn parse_offset(value: &CadenceValue, max: u32) -> Option<u32> {
    let offset = match value {
        CadenceValue::Number(number) => u32::try_from(*number).ok()?,
        CadenceValue::Text(text) => {
            let text = text.trim();
            let digits = text.strip_prefix(':').unwrap_or(text);
            if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u32>().ok()?
        }
    };
    (offset <= max).then_some(offset)
}

// A bare number counts minutes; text takes an s, m, h or d suffix.
fn parse_period(value: &CadenceValue) -> Option<Duration> {
    let period = match value {
        CadenceValue::Number(minutes) => Duration::try_minutes(*minutes)?,
        CadenceValue::Text(text) => {
            let text = text.trim();
            let split = text.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(text.len());
            let (amount, unit) = text.split_at(split);
            let amount = amount.parse::<i64>().ok()?;
            match unit.trim() {
                "s" => Duration::try_seconds(amount)?,
                "m" | "" => Duration::try_minutes(amount)?,
                "h" => Duration::try_hours(amount)?,
                "d" => Duration::try_days(amount)?,
                _ => return None,
            }
        }
    };
    (period > Duration::zero() && period <= max_interval()).then_some(period)
}

// Longer periods would overflow the calendar when scheduled far enough ahead.
fn max_interval() -> Duration {
    Duration::days(366)
}
