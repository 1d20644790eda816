// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::models::Notification;
use crate::notify::{
    LocalScheduler, OutboxScheduler, arm, load_notification, notification_key, toggle,
};
use crate::schedule::{Frequency, NOTIFICATION_FREQUENCIES};
use crate::utils::{maybe_print_json, parse_datetime, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    let scheduler = OutboxScheduler::new(conn);
    handle_with(conn, &scheduler, user, m)
}

pub fn handle_with(
    conn: &Connection,
    scheduler: &dyn LocalScheduler,
    user: &UserContext,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let message = sub.get_one::<String>("message").unwrap().trim().to_string();
            let date = parse_datetime(sub.get_one::<String>("date").unwrap())?;
            let frequency = Frequency::parse_within(
                sub.get_one::<String>("frequency").unwrap(),
                &NOTIFICATION_FREQUENCIES,
            )?;
            let is_active = !sub.get_flag("inactive");
            let tx = conn.unchecked_transaction()?;
            let id: String = tx.query_row(
                "INSERT INTO notifications(user_id, name, frequency, date, message, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
                params![
                    user.user_id,
                    name,
                    frequency.as_str(),
                    date,
                    message,
                    is_active
                ],
                |r| r.get(0),
            )?;
            let n = Notification {
                id,
                user_id: user.user_id.clone(),
                name,
                frequency,
                date,
                message,
                is_active,
            };
            if n.is_active {
                arm(scheduler, &n)?;
            }
            tx.commit()?;
            println!("Added reminder '{}' ({}) id={}", n.name, n.frequency, n.id);
        }
        Some(("list", sub)) => {
            let items = list_notifications(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|n| {
                        vec![
                            n.name,
                            n.frequency.to_string(),
                            n.date.format("%Y-%m-%d %H:%M").to_string(),
                            if n.is_active { "on" } else { "off" }.to_string(),
                            n.message,
                            n.id,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Every", "At", "Active", "Message", "Id"], rows)
                );
            }
        }
        Some(("toggle", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = toggle(conn, scheduler, user, id)?;
            println!(
                "Reminder '{}' is now {}",
                n.name,
                if n.is_active { "on" } else { "off" }
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = load_notification(conn, user, id)?;
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "DELETE FROM notifications WHERE id=?1 AND user_id=?2",
                params![n.id, user.user_id],
            )?;
            if n.is_active {
                scheduler.cancel(notification_key(&n.id)?)?;
            }
            tx.commit()?;
            println!("Removed reminder '{}'", n.name);
        }
        _ => {}
    }
    Ok(())
}

pub fn list_notifications(conn: &Connection, user: &UserContext) -> Result<Vec<Notification>> {
    let mut stmt =
        conn.prepare("SELECT id FROM notifications WHERE user_id=?1 ORDER BY date, name")?;
    let ids = stmt.query_map(params![user.user_id], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for id in ids {
        let id = id?;
        out.push(
            load_notification(conn, user, &id)
                .map_err(|e| anyhow!("Reminder {} unreadable: {}", id, e))?,
        );
    }
    Ok(out)
}
