use crate::model::schedule::ScheduleSpec;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};

pub struct ScheduleRule;

impl ScheduleRule {
    /// The first aligned boundary at or after `now`.
    ///
    /// The boundary of the current minute, hour, day or week is used when it
    /// has not passed yet, otherwise one full period is added. An interval
    /// schedule has no alignment and first fires one period from `now`.
    pub fn next(now: NaiveDateTime, spec: &ScheduleSpec) -> NaiveDateTime {
        let day_start = now.date().and_time(NaiveTime::MIN);

        let (boundary, period) = match *spec {
            ScheduleSpec::Minutely { second } => {
                let minute_start = day_start
                    + Duration::hours(i64::from(now.hour()))
                    + Duration::minutes(i64::from(now.minute()));
                (minute_start + Duration::seconds(i64::from(second)), Duration::minutes(1))
            }
            ScheduleSpec::Hourly { minute } => {
                let hour_start = day_start + Duration::hours(i64::from(now.hour()));
                (hour_start + Duration::minutes(i64::from(minute)), Duration::hours(1))
            }
            ScheduleSpec::Daily { hour } => {
                (day_start + Duration::hours(i64::from(hour)), Duration::days(1))
            }
            ScheduleSpec::Weekly { weekday } => {
                let week_start =
                    day_start - Duration::days(i64::from(now.weekday().num_days_from_monday()));
                (
                    week_start + Duration::days(i64::from(weekday.num_days_from_monday())),
                    Duration::days(7),
                )
            }
            ScheduleSpec::Interval { period } => return now + period,
        };

        if boundary < now {
            boundary + period
        } else {
            boundary
        }
    }

    /// The firing after one that was due at `previous`.
    ///
    /// Always later than `previous` and never earlier than `now`, so cycles
    /// missed while a job overran are skipped rather than replayed. Interval
    /// schedules stay anchored on `previous` to avoid drifting by the time
    /// each run takes.
    pub fn following(previous: NaiveDateTime, now: NaiveDateTime, spec: &ScheduleSpec) -> NaiveDateTime {
        match *spec {
            ScheduleSpec::Interval { period } => {
                let mut next = previous + period;
                if next < now {
                    let behind = (now - next).num_milliseconds();
                    let step = period.num_milliseconds().max(1);
                    let cycles = behind / step;
                    next += period * cycles as i32;
                    if next < now {
                        next += period;
                    }
                }
                next
            }
            _ => {
                let after = (previous + Duration::nanoseconds(1)).max(now);
                Self::next(after, spec)
            }
        }
    }
}
