//! Cron-style recurrence for crawl cycles
//!
//! Only the minute and hour fields are meaningful. Day-of-month, month and
//! day-of-week must be `*`, so every schedule fires at least once a day.

use crate::ConfigError;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use std::fmt;

/// Parsed `M H * * *` expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    expression: String,
    minutes: Vec<u32>,
    hours: Vec<u32>,
}

impl Schedule {
    /// Parses a five-field expression
    ///
    /// Minute and hour fields accept `*`, `*/n`, a number, or a comma list of
    /// numbers.
    ///
    /// # Example
    ///
    /// ```
    /// use docket::crawler::Schedule;
    ///
    /// assert!(Schedule::parse("0 2 * * *").is_ok());
    /// assert!(Schedule::parse("*/30 8,12,18 * * *").is_ok());
    /// assert!(Schedule::parse("0 2 1 * *").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, ConfigError> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(invalid(expression, "expected 5 fields"));
        }

        if fields[2..].iter().any(|f| *f != "*") {
            return Err(invalid(
                expression,
                "only minute and hour fields are supported",
            ));
        }

        let minutes = parse_field(fields[0], 59).map_err(|reason| invalid(expression, &reason))?;
        let hours = parse_field(fields[1], 23).map_err(|reason| invalid(expression, &reason))?;

        Ok(Self {
            expression: fields.join(" "),
            minutes,
            hours,
        })
    }

    /// Next firing time strictly after `after`, in the same time zone
    ///
    /// Local times that do not exist (DST spring-forward gaps) are skipped.
    /// Ambiguous local times fire at their earliest instant.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        let local = after.naive_local();

        for day_offset in 0..3 {
            let date = local.date() + Duration::days(day_offset);
            for &hour in &self.hours {
                for &minute in &self.minutes {
                    let Some(candidate) = date.and_hms_opt(hour, minute, 0) else {
                        continue;
                    };
                    if candidate <= local {
                        continue;
                    }
                    if let Some(fire_at) = resolve_local(&tz, &candidate) {
                        return Some(fire_at);
                    }
                }
            }
        }

        None
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(local).earliest()
}

fn invalid(expression: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSchedule(format!("'{}': {}", expression, reason))
}

fn parse_field(field: &str, max: u32) -> Result<Vec<u32>, String> {
    if field == "*" {
        return Ok((0..=max).collect());
    }

    if let Some(step) = field.strip_prefix("*/") {
        let step: u32 = step
            .parse()
            .map_err(|_| format!("invalid step '{}'", step))?;
        if step == 0 || step > max {
            return Err(format!("step {} out of range 1..={}", step, max));
        }
        return Ok((0..=max).step_by(step as usize).collect());
    }

    let mut values = field
        .split(',')
        .map(|part| {
            let value: u32 = part
                .parse()
                .map_err(|_| format!("invalid value '{}'", part))?;
            if value > max {
                return Err(format!("value {} out of range 0..={}", value, max));
            }
            Ok(value)
        })
        .collect::<Result<Vec<u32>, String>>()?;

    values.sort_unstable();
    values.dedup();
    Ok(values)
}
