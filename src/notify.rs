// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reminder scheduling through an OS-level local notification scheduler.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::info;

use crate::config::UserContext;
use crate::models::Notification;
use crate::schedule::Frequency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Every {
    Day,
    Month,
    Year,
}

impl Every {
    pub fn as_str(&self) -> &'static str {
        match self {
            Every::Day => "day",
            Every::Month => "month",
            Every::Year => "year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub at: NaiveDateTime,
    pub repeats: bool,
    pub every: Option<Every>,
}

impl Trigger {
    pub fn for_schedule(at: NaiveDateTime, frequency: Frequency) -> Result<Trigger> {
        let every = match frequency {
            Frequency::Once => None,
            Frequency::Daily => Some(Every::Day),
            Frequency::Monthly => Some(Every::Month),
            Frequency::Yearly => Some(Every::Year),
            other => return Err(anyhow!("Reminders cannot repeat {}", other)),
        };
        Ok(Trigger {
            at,
            repeats: every.is_some(),
            every,
        })
    }
}

/// Numeric key the OS scheduler uses: the last 6 hex digits of the record id.
pub fn notification_key(id: &str) -> Result<i64> {
    let tail = id
        .len()
        .checked_sub(6)
        .and_then(|start| id.get(start..))
        .ok_or_else(|| anyhow!("Notification id '{}' is shorter than 6 characters", id))?;
    i64::from_str_radix(tail, 16)
        .with_context(|| format!("Notification id '{}' does not end in hex digits", id))
}

pub trait LocalScheduler {
    fn schedule(&self, key: i64, title: &str, body: &str, trigger: &Trigger) -> Result<()>;
    fn cancel(&self, key: i64) -> Result<()>;
}

/// Writes pending notifications to the `local_notifications` table.
pub struct OutboxScheduler<'a> {
    conn: &'a Connection,
}

impl<'a> OutboxScheduler<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl LocalScheduler for OutboxScheduler<'_> {
    fn schedule(&self, key: i64, title: &str, body: &str, trigger: &Trigger) -> Result<()> {
        self.conn.execute(
            "INSERT INTO local_notifications(key, title, body, at, repeats, every)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(key) DO UPDATE SET title=excluded.title, body=excluded.body,
                 at=excluded.at, repeats=excluded.repeats, every=excluded.every",
            params![
                key,
                title,
                body,
                trigger.at,
                trigger.repeats,
                trigger.every.map(|e| e.as_str())
            ],
        )?;
        info!(key, at = %trigger.at, repeats = trigger.repeats, "local notification scheduled");
        Ok(())
    }

    fn cancel(&self, key: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM local_notifications WHERE key=?1", params![key])?;
        info!(key, "local notification cancelled");
        Ok(())
    }
}

pub fn load_notification(
    conn: &Connection,
    user: &UserContext,
    id: &str,
) -> Result<Notification> {
    let row = conn
        .query_row(
            "SELECT id, user_id, name, frequency, date, message, is_active
             FROM notifications WHERE id=?1 AND user_id=?2",
            params![id, user.user_id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, NaiveDateTime>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, bool>(6)?,
                ))
            },
        )
        .optional()?;
    let (id, user_id, name, freq, date, message, is_active) =
        row.ok_or_else(|| anyhow!("Notification '{}' not found", id))?;
    Ok(Notification {
        id,
        user_id,
        name,
        frequency: freq.parse()?,
        date,
        message,
        is_active,
    })
}

/// Hands an active reminder to the scheduler.
pub fn arm(scheduler: &dyn LocalScheduler, n: &Notification) -> Result<()> {
    let trigger = Trigger::for_schedule(n.date, n.frequency)?;
    scheduler.schedule(notification_key(&n.id)?, &n.name, &n.message, &trigger)
}

/// Flips `is_active` and schedules or cancels the local notification to match.
///
/// The flag is rolled back when the scheduler call fails.
pub fn toggle(
    conn: &Connection,
    scheduler: &dyn LocalScheduler,
    user: &UserContext,
    id: &str,
) -> Result<Notification> {
    let mut n = load_notification(conn, user, id)?;
    n.is_active = !n.is_active;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE notifications SET is_active=?1 WHERE id=?2 AND user_id=?3",
        params![n.is_active, n.id, user.user_id],
    )?;
    if n.is_active {
        arm(scheduler, &n)?;
    } else {
        scheduler.cancel(notification_key(&n.id)?)?;
    }
    tx.commit()?;
    Ok(n)
}
