// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketledger::commands::users::{add_user, list_users};
use pocketledger::config::{KEY_CURRENT_USER, resolve_user_from, set_setting};
use pocketledger::db::init_schema;
use pocketledger::icons::Icon;
use rusqlite::Connection;

fn setup() -> (Connection, String, String, String) {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    let alice = add_user(&conn, "alice", "USD").unwrap();
    let bob = add_user(&conn, "bob", "EUR").unwrap();
    let carol = add_user(&conn, "carol", "INR").unwrap();
    (conn, alice, bob, carol)
}

#[test]
fn flag_beats_environment_and_setting() {
    let (conn, alice, bob, carol) = setup();
    set_setting(&conn, KEY_CURRENT_USER, &carol).unwrap();
    let user = resolve_user_from(&conn, Some("alice"), Some(bob.as_str())).unwrap();
    assert_eq!(user.user_id, alice);
}

#[test]
fn environment_beats_setting() {
    let (conn, _, bob, carol) = setup();
    set_setting(&conn, KEY_CURRENT_USER, &carol).unwrap();
    let user = resolve_user_from(&conn, None, Some("bob")).unwrap();
    assert_eq!(user.user_id, bob);
    // ids work as well as names
    let user = resolve_user_from(&conn, None, Some(bob.as_str())).unwrap();
    assert_eq!(user.user_id, bob);
}

#[test]
fn setting_used_when_nothing_else_given() {
    let (conn, _, _, carol) = setup();
    set_setting(&conn, KEY_CURRENT_USER, &carol).unwrap();
    let user = resolve_user_from(&conn, None, Some("  ")).unwrap();
    assert_eq!(user.user_id, carol);
}

#[test]
fn no_user_selected_is_an_error() {
    let (conn, _, _, _) = setup();
    let err = resolve_user_from(&conn, None, None).unwrap_err();
    assert!(err.to_string().contains("No user selected"));

    let err = resolve_user_from(&conn, Some("mallory"), None).unwrap_err();
    assert!(err.to_string().contains("User 'mallory' not found"));
}

#[test]
fn users_listed_by_name() {
    let (conn, alice, _, _) = setup();
    let users = list_users(&conn).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["alice", "bob", "carol"]);
    assert_eq!(users[0].id, alice);
    assert_eq!(users[0].currency, "USD");
}

#[test]
fn icon_tags_round_trip() {
    for icon in Icon::ALL {
        assert_eq!(icon.tag().parse::<Icon>().unwrap(), icon);
        assert_eq!(icon.to_string(), icon.tag());
    }
    assert_eq!(" Credit_Card ".parse::<Icon>().unwrap(), Icon::CreditCard);
}

#[test]
fn unknown_icon_tag_is_rejected() {
    let err = "spaceship".parse::<Icon>().unwrap_err();
    assert!(err.to_string().contains("Unknown icon 'spaceship'"));
}
