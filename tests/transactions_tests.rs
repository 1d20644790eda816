// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketledger::commands::{transactions, users::add_user};
use pocketledger::config::UserContext;
use pocketledger::db::init_schema;
use pocketledger::error::LedgerError;
use pocketledger::models::EntryKind;
use pocketledger::settlement::{EntryRequest, delete_entry, load_account, post_entry};
use pocketledger::cli;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> (Connection, UserContext, String) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let user = UserContext::new(add_user(&conn, "alice", "USD").unwrap());
    let acct: String = conn
        .query_row(
            "INSERT INTO accounts(user_id, name, currency, balance, icon, color)
             VALUES (?1, 'A1', 'USD', '100.00', 'bank', '#2196F3') RETURNING id",
            params![user.user_id],
            |r| r.get(0),
        )
        .unwrap();
    conn.execute(
        "INSERT INTO categories(user_id, name, kind, icon, color) VALUES (?1, 'Cat1', 'expense', 'other', '#9E9E9E')",
        params![user.user_id],
    )
    .unwrap();
    (conn, user, acct)
}

fn entry(acct: &str, kind: EntryKind, amount: &str, day: u32) -> EntryRequest {
    EntryRequest {
        kind,
        account_id: acct.to_string(),
        category_id: None,
        amount: amount.parse().unwrap(),
        date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        note: None,
    }
}

#[test]
fn entries_move_balance_and_deletion_restores_it() {
    let (mut conn, user, acct) = setup();
    let spent = post_entry(&mut conn, &user, &entry(&acct, EntryKind::Expense, "30.255", 2)).unwrap();
    assert_eq!(spent.amount.to_string(), "30.26");
    post_entry(&mut conn, &user, &entry(&acct, EntryKind::Income, "10", 3)).unwrap();
    assert_eq!(
        load_account(&conn, &user, &acct).unwrap().balance,
        Decimal::new(7974, 2)
    );

    delete_entry(&mut conn, &user, &spent.id).unwrap();
    assert_eq!(
        load_account(&conn, &user, &acct).unwrap().balance,
        Decimal::new(11000, 2)
    );

    let err = post_entry(&mut conn, &user, &entry(&acct, EntryKind::Expense, "-1", 4)).unwrap_err();
    assert!(matches!(err, LedgerError::NonPositiveAmount(_)));
}

#[test]
fn list_limit_respected() {
    let (mut conn, user, _) = setup();
    for i in 1..=3 {
        let matches = cli::build_cli().get_matches_from([
            "pocketledger",
            "tx",
            "add",
            "--date",
            &format!("2025-01-0{}", i),
            "--account",
            "A1",
            "--amount",
            "10",
            "--category",
            " Cat1 ",
        ]);
        if let Some(("tx", tx_m)) = matches.subcommand() {
            transactions::handle(&mut conn, &user, tx_m).unwrap();
        }
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["pocketledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, &user, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].category, "Cat1");
            assert_eq!(rows[0].kind, "expense");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn income_past_decimal_range_is_rejected() {
    let (mut conn, user, acct) = setup();
    conn.execute(
        "UPDATE accounts SET balance='79000000000000000000000000000' WHERE id=?1",
        params![acct],
    )
    .unwrap();
    let err = post_entry(
        &mut conn,
        &user,
        &entry(&acct, EntryKind::Income, "10000000000000000000000000000", 5),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Overflow { .. }));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
