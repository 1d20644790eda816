// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::schedule::{
    Frequency, NOTIFICATION_FREQUENCIES, RECURRING_FREQUENCIES, next_date, occurrences,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn daily_and_weekly_add_days() {
    assert_eq!(next_date(d(2025, 12, 31), Frequency::Daily), Some(d(2026, 1, 1)));
    assert_eq!(next_date(d(2024, 2, 28), Frequency::Daily), Some(d(2024, 2, 29)));
    assert_eq!(next_date(d(2025, 3, 28), Frequency::Weekly), Some(d(2025, 4, 4)));
}

#[test]
fn month_steps_keep_day_when_it_exists() {
    assert_eq!(next_date(d(2025, 1, 15), Frequency::Monthly), Some(d(2025, 2, 15)));
    assert_eq!(next_date(d(2025, 5, 10), Frequency::Semiannual), Some(d(2025, 11, 10)));
    assert_eq!(next_date(d(2025, 12, 10), Frequency::Monthly), Some(d(2026, 1, 10)));
    assert_eq!(next_date(d(2025, 7, 4), Frequency::Yearly), Some(d(2026, 7, 4)));
}

#[test]
fn short_target_month_falls_back_to_previous_month_end() {
    // Jan 31 + 1 month: Feb has no 31st, so day 0 of February = Jan 31
    assert_eq!(next_date(d(2025, 1, 31), Frequency::Monthly), Some(d(2025, 1, 31)));
    // Mar 31 -> April has 30 days -> Mar 31
    assert_eq!(next_date(d(2025, 3, 31), Frequency::Monthly), Some(d(2025, 3, 31)));
    // Jan 30 -> Feb (28 days) -> Jan 31
    assert_eq!(next_date(d(2025, 1, 30), Frequency::Monthly), Some(d(2025, 1, 31)));
    // Aug 31 + quarter -> Nov has 30 days -> Oct 31
    assert_eq!(next_date(d(2025, 8, 31), Frequency::Quarterly), Some(d(2025, 10, 31)));
    // Leap day + year -> Feb 2025 has no 29th -> Jan 31 2025
    assert_eq!(next_date(d(2024, 2, 29), Frequency::Yearly), Some(d(2025, 1, 31)));
    // Nov 30 + quarter -> Feb 2026 has no 30th -> Jan 31 2026
    assert_eq!(next_date(d(2025, 11, 30), Frequency::Quarterly), Some(d(2026, 1, 31)));
    // Aug 31 + 6 months -> Feb 2026 -> Jan 31 2026
    assert_eq!(next_date(d(2025, 8, 31), Frequency::Semiannual), Some(d(2026, 1, 31)));
}

#[test]
fn once_never_repeats() {
    assert_eq!(next_date(d(2025, 6, 1), Frequency::Once), None);
}

#[test]
fn occurrences_stop_at_until_and_on_pinned_dates() {
    let got = occurrences(d(2025, 1, 10), Frequency::Monthly, d(2025, 4, 10));
    assert_eq!(
        got,
        vec![d(2025, 1, 10), d(2025, 2, 10), d(2025, 3, 10), d(2025, 4, 10)]
    );
    // Jan 31 monthly is pinned by the rollover rule
    let pinned = occurrences(d(2025, 1, 31), Frequency::Monthly, d(2025, 12, 31));
    assert_eq!(pinned, vec![d(2025, 1, 31)]);
    assert!(occurrences(d(2025, 5, 1), Frequency::Daily, d(2025, 4, 30)).is_empty());
}

#[test]
fn frequency_parsing_respects_allowed_sets() {
    assert_eq!(
        Frequency::parse_within(" Weekly ", &RECURRING_FREQUENCIES).unwrap(),
        Frequency::Weekly
    );
    assert!(Frequency::parse_within("yearly", &RECURRING_FREQUENCIES).is_err());
    assert!(Frequency::parse_within("weekly", &NOTIFICATION_FREQUENCIES).is_err());
    assert_eq!(
        Frequency::parse_within("once", &NOTIFICATION_FREQUENCIES).unwrap(),
        Frequency::Once
    );
    assert!("fortnightly".parse::<Frequency>().is_err());
}
