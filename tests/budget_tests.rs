// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::budget::{BudgetProgress, BudgetStatus, month_progress, month_start};
use pocketledger::commands::users::add_user;
use pocketledger::config::UserContext;
use pocketledger::db::init_schema;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn progress_ratio_and_status() {
    let p = BudgetProgress::compute(Some(dec("100")), dec("80")).unwrap();
    assert_eq!(p.ratio, dec("0.8"));
    assert_eq!(p.status, BudgetStatus::Warning);

    let p = BudgetProgress::compute(Some(dec("100")), dec("10")).unwrap();
    assert_eq!(p.ratio, dec("0.1"));
    assert_eq!(p.status, BudgetStatus::Normal);

    let edge = BudgetProgress::compute(Some(dec("200")), dec("150")).unwrap();
    assert_eq!(edge.status, BudgetStatus::Warning);

    let over = BudgetProgress::compute(Some(dec("50")), dec("75")).unwrap();
    assert_eq!(over.ratio, dec("1.5"));
    assert_eq!(over.fill(), Decimal::ONE);
}

#[test]
fn missing_or_zero_ceiling_is_skipped() {
    assert!(BudgetProgress::compute(None, dec("10")).is_none());
    assert!(BudgetProgress::compute(Some(Decimal::ZERO), dec("10")).is_none());
}

#[test]
fn month_start_is_first_day() {
    let d = NaiveDate::from_ymd_opt(2025, 8, 19).unwrap();
    assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
}

fn setup() -> (Connection, UserContext) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let user = UserContext::new(add_user(&conn, "alice", "USD").unwrap());
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, currency, balance, icon, color)
         VALUES ('acct0000000000000000000a', ?1, 'Wallet', 'USD', '0', 'wallet', '#4CAF50')",
        params![user.user_id],
    )
    .unwrap();
    conn.execute_batch(
        "INSERT INTO categories(id, user_id, name, monthly_budget, kind, icon, color)
             VALUES ('cat00000000000000000dine', NULL, 'Dining', '100', 'expense', 'food', '#FF9800');
         INSERT INTO categories(id, user_id, name, monthly_budget, kind, icon, color)
             VALUES ('cat0000000000000000000no', NULL, 'Misc', NULL, 'expense', 'other', '#9E9E9E');",
    )
    .unwrap();
    (conn, user)
}

fn spend(conn: &Connection, user: &UserContext, kind: &str, amount: &str, date: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id, kind, category_id, account_id, amount, currency, date)
         VALUES (?1, ?2, 'cat00000000000000000dine', 'acct0000000000000000000a', ?3, 'USD', ?4)",
        params![user.user_id, kind, amount, date],
    )
    .unwrap();
}

#[test]
fn month_to_date_spend_against_global_category() {
    let (conn, user) = setup();
    spend(&conn, &user, "expense", "50", "2025-08-01");
    spend(&conn, &user, "expense", "30.00", "2025-08-18");
    // previous month and income do not count
    spend(&conn, &user, "expense", "999", "2025-07-31");
    spend(&conn, &user, "income", "40", "2025-08-05");

    let today = NaiveDate::from_ymd_opt(2025, 8, 19).unwrap();
    let rows = month_progress(&conn, &user, today).unwrap();
    assert_eq!(rows.len(), 1, "categories without a ceiling are hidden");
    assert_eq!(rows[0].category, "Dining");
    assert_eq!(rows[0].progress.spent, dec("80"));
    assert_eq!(rows[0].progress.ratio, dec("0.8"));
    assert_eq!(rows[0].progress.status, BudgetStatus::Warning);
}

#[test]
fn other_users_spend_is_ignored() {
    let (conn, user) = setup();
    let bob = UserContext::new(add_user(&conn, "bob", "USD").unwrap());
    spend(&conn, &bob, "expense", "90", "2025-08-02");
    spend(&conn, &user, "expense", "10", "2025-08-02");

    let today = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
    let rows = month_progress(&conn, &user, today).unwrap();
    assert_eq!(rows[0].progress.spent, dec("10"));
    assert_eq!(rows[0].progress.status, BudgetStatus::Normal);
}

#[test]
fn huge_spend_against_tiny_budget_pins_ratio() {
    let p = BudgetProgress::compute(Some(dec("0.01")), dec("79000000000000000000000000000")).unwrap();
    assert_eq!(p.ratio, Decimal::MAX);
    assert_eq!(p.status, BudgetStatus::Warning);
    assert_eq!(p.fill(), Decimal::ONE);
}
