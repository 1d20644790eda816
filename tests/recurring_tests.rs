// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::cli;
use pocketledger::commands::{doctor, recurring, users::add_user};
use pocketledger::config::UserContext;
use pocketledger::db::init_schema;
use pocketledger::schedule::Frequency;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> (Connection, UserContext) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let user = UserContext::new(add_user(&conn, "alice", "USD").unwrap());
    conn.execute(
        "INSERT INTO accounts(user_id, name, currency, balance, icon, color)
         VALUES (?1, 'Checking', 'EUR', '100', 'bank', '#2196F3')",
        params![user.user_id],
    )
    .unwrap();
    (conn, user)
}

fn run(conn: &Connection, user: &UserContext, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pocketledger", "recurring"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    match matches.subcommand() {
        Some(("recurring", sub)) => recurring::handle(conn, user, sub),
        _ => panic!("recurring command not parsed"),
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn add_sets_next_execution_to_start_date() {
    let (conn, user) = setup();
    run(
        &conn,
        &user,
        &[
            "add",
            "--account",
            "Checking",
            "--kind",
            "expense",
            "--amount",
            "12.999",
            "--date",
            "2025-01-31",
            "--frequency",
            "monthly",
        ],
    )
    .unwrap();

    let items = recurring::list_recurring(&conn, &user).unwrap();
    assert_eq!(items.len(), 1);
    let r = &items[0];
    assert_eq!(r.next_execution, d(2025, 1, 31));
    assert_eq!(r.frequency, Frequency::Monthly);
    assert_eq!(r.currency, "EUR");
    assert_eq!(r.amount, Decimal::new(1300, 2));
}

#[test]
fn edit_with_new_date_resets_next_execution() {
    let (conn, user) = setup();
    run(
        &conn,
        &user,
        &[
            "add", "--account", "Checking", "--kind", "income", "--amount", "50", "--date",
            "2025-02-01", "--frequency", "weekly",
        ],
    )
    .unwrap();
    let id = recurring::list_recurring(&conn, &user).unwrap()[0].id.clone();

    // simulate a stale next_execution, then edit only the amount: it must stay put
    conn.execute(
        "UPDATE recurring_transactions SET next_execution='2025-03-01' WHERE id=?1",
        params![id],
    )
    .unwrap();
    run(&conn, &user, &["edit", "--id", id.as_str(), "--amount", "60"]).unwrap();
    let r = recurring::load_recurring(&conn, &user, &id).unwrap();
    assert_eq!(r.next_execution, d(2025, 3, 1));
    assert_eq!(r.amount, Decimal::new(60, 0));

    run(&conn, &user, &["edit", "--id", id.as_str(), "--date", "2025-04-10"]).unwrap();
    let r = recurring::load_recurring(&conn, &user, &id).unwrap();
    assert_eq!(r.date, d(2025, 4, 10));
    assert_eq!(r.next_execution, d(2025, 4, 10));
}

#[test]
fn rejects_frequencies_templates_do_not_support() {
    let (conn, user) = setup();
    let err = run(
        &conn,
        &user,
        &[
            "add", "--account", "Checking", "--kind", "expense", "--amount", "5", "--date",
            "2025-02-01", "--frequency", "yearly",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not allowed"));
    assert!(recurring::list_recurring(&conn, &user).unwrap().is_empty());
}

#[test]
fn doctor_flags_overdue_templates() {
    let (conn, user) = setup();
    run(
        &conn,
        &user,
        &[
            "add", "--account", "Checking", "--kind", "expense", "--amount", "5", "--date",
            "2025-02-01", "--frequency", "daily",
        ],
    )
    .unwrap();
    let rows = doctor::findings(&conn, &user, d(2025, 2, 1)).unwrap();
    assert!(rows.is_empty());
    let rows = doctor::findings(&conn, &user, d(2025, 2, 5)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "recurring_not_executed");
}
