// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KEY_CURRENT_USER, get_setting, set_setting};
use crate::models::User;
use crate::utils::{maybe_print_json, parse_currency, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let ccy = parse_currency(sub.get_one::<String>("currency").unwrap())?;
            let id = add_user(conn, name, &ccy)?;
            // first user becomes the default
            if get_setting(conn, KEY_CURRENT_USER)?.is_none() {
                set_setting(conn, KEY_CURRENT_USER, &id)?;
            }
            println!("Added user '{}' ({}) id={}", name, ccy, id);
        }
        Some(("list", sub)) => {
            let users = list_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                let current = get_setting(conn, KEY_CURRENT_USER)?;
                let rows = users
                    .into_iter()
                    .map(|u| {
                        let mark = if current.as_deref() == Some(u.id.as_str()) { "*" } else { "" };
                        vec![mark.to_string(), u.name, u.currency, u.id, u.created_at]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "Name", "Currency", "Id", "Created"], rows)
                );
            }
        }
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id: String = conn
                .query_row(
                    "SELECT id FROM users WHERE name=?1 OR id=?1",
                    params![name],
                    |r| r.get(0),
                )
                .with_context(|| format!("User '{}' not found", name))?;
            set_setting(conn, KEY_CURRENT_USER, &id)?;
            println!("Now acting as '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn add_user(conn: &Connection, name: &str, currency: &str) -> Result<String> {
    let id: String = conn
        .query_row(
            "INSERT INTO users(name, currency) VALUES (?1, ?2) RETURNING id",
            params![name, currency],
            |r| r.get(0),
        )
        .with_context(|| format!("Could not add user '{}'", name))?;
    Ok(id)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, currency, created_at FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            currency: r.get(2)?,
            created_at: r.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
