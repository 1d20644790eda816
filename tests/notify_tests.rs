// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use pocketledger::commands::{notifications, users::add_user};
use pocketledger::config::UserContext;
use pocketledger::db::init_schema;
use pocketledger::notify::{
    Every, LocalScheduler, OutboxScheduler, Trigger, notification_key, toggle,
};
use pocketledger::schedule::Frequency;
use pocketledger::cli;
use rusqlite::Connection;
use std::cell::RefCell;

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl LocalScheduler for Recorder {
    fn schedule(&self, key: i64, title: &str, _body: &str, trigger: &Trigger) -> Result<()> {
        self.events.borrow_mut().push(format!(
            "schedule {} {} repeats={} every={:?}",
            key, title, trigger.repeats, trigger.every
        ));
        Ok(())
    }

    fn cancel(&self, key: i64) -> Result<()> {
        self.events.borrow_mut().push(format!("cancel {}", key));
        Ok(())
    }
}

fn setup() -> (Connection, UserContext) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let user = UserContext::new(add_user(&conn, "alice", "USD").unwrap());
    (conn, user)
}

#[test]
fn key_comes_from_last_six_hex_digits() {
    assert_eq!(notification_key("65f1c0ffee00000000abcdef").unwrap(), 0xabcdef);
    assert_eq!(notification_key("000001").unwrap(), 1);
    assert!(notification_key("abc").is_err());
    assert!(notification_key("65f1c0ffee0000000000zzzz").is_err());
}

#[test]
fn triggers_follow_frequency() {
    let at = NaiveDate::from_ymd_opt(2025, 9, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let once = Trigger::for_schedule(at, Frequency::Once).unwrap();
    assert!(!once.repeats);
    assert_eq!(once.every, None);
    let monthly = Trigger::for_schedule(at, Frequency::Monthly).unwrap();
    assert!(monthly.repeats);
    assert_eq!(monthly.every, Some(Every::Month));
    assert_eq!(
        Trigger::for_schedule(at, Frequency::Yearly).unwrap().every,
        Some(Every::Year)
    );
    assert!(Trigger::for_schedule(at, Frequency::Weekly).is_err());
}

#[test]
fn add_toggle_and_remove_drive_the_scheduler() {
    let (conn, user) = setup();
    let rec = Recorder::default();
    let run = |args: &[&str]| {
        let mut full = vec!["pocketledger", "notify"];
        full.extend_from_slice(args);
        let matches = cli::build_cli().get_matches_from(full);
        match matches.subcommand() {
            Some(("notify", sub)) => notifications::handle_with(&conn, &rec, &user, sub),
            _ => panic!("notify command not parsed"),
        }
    };

    run(&[
        "add",
        "--name",
        "Rent",
        "--message",
        "Pay the rent",
        "--date",
        "2025-09-01 09:00",
        "--frequency",
        "monthly",
    ])
    .unwrap();
    let id: String = conn
        .query_row("SELECT id FROM notifications WHERE name='Rent'", [], |r| {
            r.get(0)
        })
        .unwrap();
    let key = notification_key(&id).unwrap();
    assert_eq!(
        rec.events.borrow().as_slice(),
        [format!("schedule {} Rent repeats=true every=Some(Month)", key)]
    );

    run(&["toggle", "--id", id.as_str()]).unwrap();
    run(&["toggle", "--id", id.as_str()]).unwrap();
    run(&["rm", "--id", id.as_str()]).unwrap();
    let events = rec.events.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[1], format!("cancel {}", key));
    assert!(events[2].starts_with(&format!("schedule {} Rent", key)));
    assert_eq!(events[3], format!("cancel {}", key));
}

#[test]
fn inactive_reminders_are_not_scheduled() {
    let (conn, user) = setup();
    let rec = Recorder::default();
    let matches = cli::build_cli().get_matches_from([
        "pocketledger",
        "notify",
        "add",
        "--name",
        "Tax",
        "--message",
        "File taxes",
        "--date",
        "2026-04-01",
        "--inactive",
    ]);
    if let Some(("notify", sub)) = matches.subcommand() {
        notifications::handle_with(&conn, &rec, &user, sub).unwrap();
    }
    assert!(rec.events.borrow().is_empty());
    let list = notifications::list_notifications(&conn, &user).unwrap();
    assert_eq!(list.len(), 1);
    assert!(!list[0].is_active);
    assert_eq!(list[0].frequency, Frequency::Once);
}

#[test]
fn outbox_upserts_and_cancels() {
    let (conn, user) = setup();
    let id: String = conn
        .query_row(
            "INSERT INTO notifications(user_id, name, frequency, date, message, is_active)
             VALUES (?1, 'Gym', 'daily', '2025-09-01 07:00:00', 'Go', 0) RETURNING id",
            [&user.user_id],
            |r| r.get(0),
        )
        .unwrap();
    let outbox = OutboxScheduler::new(&conn);
    let outbox_rows = || -> i64 {
        conn.query_row("SELECT COUNT(*) FROM local_notifications", [], |r| r.get(0))
            .unwrap()
    };

    let n = toggle(&conn, &outbox, &user, &id).unwrap();
    assert!(n.is_active);
    assert_eq!(outbox_rows(), 1);
    let (every, repeats): (String, bool) = conn
        .query_row(
            "SELECT every, repeats FROM local_notifications WHERE key=?1",
            [notification_key(&id).unwrap()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(every, "day");
    assert!(repeats);

    let n = toggle(&conn, &outbox, &user, &id).unwrap();
    assert!(!n.is_active);
    assert_eq!(outbox_rows(), 0);
}

struct Refusing;

impl LocalScheduler for Refusing {
    fn schedule(&self, _key: i64, _title: &str, _body: &str, _trigger: &Trigger) -> Result<()> {
        anyhow::bail!("notification permission denied")
    }

    fn cancel(&self, _key: i64) -> Result<()> {
        anyhow::bail!("notification permission denied")
    }
}

#[test]
fn scheduler_failure_leaves_reminders_untouched() {
    let (conn, user) = setup();
    let matches = cli::build_cli().get_matches_from([
        "pocketledger",
        "notify",
        "add",
        "--name",
        "Bills",
        "--message",
        "Pay bills",
        "--date",
        "2025-10-01 08:00",
    ]);
    let Some(("notify", sub)) = matches.subcommand() else {
        panic!("notify command not parsed");
    };
    assert!(notifications::handle_with(&conn, &Refusing, &user, sub).is_err());
    assert!(notifications::list_notifications(&conn, &user).unwrap().is_empty());

    let id: String = conn
        .query_row(
            "INSERT INTO notifications(user_id, name, frequency, date, message, is_active)
             VALUES (?1, 'Gym', 'daily', '2025-09-01 07:00:00', 'Go', 0) RETURNING id",
            [&user.user_id],
            |r| r.get(0),
        )
        .unwrap();
    assert!(toggle(&conn, &Refusing, &user, &id).is_err());
    let list = notifications::list_notifications(&conn, &user).unwrap();
    assert_eq!(list.len(), 1);
    assert!(!list[0].is_active);
}
