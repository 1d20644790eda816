// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};

use crate::fx::{DEFAULT_CURRENCIES_URL, DEFAULT_RATES_URL};

pub const USER_ENV: &str = "POCKETLEDGER_USER";

pub const KEY_CURRENT_USER: &str = "current_user";
pub const KEY_RATES_URL: &str = "fx_rates_url";
pub const KEY_CURRENCIES_URL: &str = "currencies_url";

pub const KNOWN_KEYS: [&str; 3] = [KEY_CURRENT_USER, KEY_RATES_URL, KEY_CURRENCIES_URL];

/// The user every query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub current_user: Option<String>,
    pub rates_url: String,
    pub currencies_url: String,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            current_user: get_setting(conn, KEY_CURRENT_USER)?,
            rates_url: get_setting(conn, KEY_RATES_URL)?
                .unwrap_or_else(|| DEFAULT_RATES_URL.to_string()),
            currencies_url: get_setting(conn, KEY_CURRENCIES_URL)?
                .unwrap_or_else(|| DEFAULT_CURRENCIES_URL.to_string()),
        })
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(anyhow!(
            "Unknown setting '{}', expected one of: {}",
            key,
            KNOWN_KEYS.join(", ")
        ));
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Picks the acting user: explicit flag, then environment, then the stored default.
/// The flag and environment accept a user name or id.
pub fn resolve_user(conn: &Connection, flag: Option<&str>) -> Result<UserContext> {
    let env = std::env::var(USER_ENV).ok();
    resolve_user_from(conn, flag, env.as_deref())
}

/// [`resolve_user`] with the environment value passed in.
pub fn resolve_user_from(
    conn: &Connection,
    flag: Option<&str>,
    env: Option<&str>,
) -> Result<UserContext> {
    let env = env.filter(|s| !s.trim().is_empty()).map(str::to_string);
    let wanted = match flag.map(str::to_string).or(env) {
        Some(w) => w,
        None => get_setting(conn, KEY_CURRENT_USER)?.ok_or_else(|| {
            anyhow!("No user selected; run `user add` and `user use`, or pass --user")
        })?,
    };
    let id: String = conn
        .query_row(
            "SELECT id FROM users WHERE id=?1 OR name=?1",
            params![wanted.trim()],
            |r| r.get(0),
        )
        .with_context(|| format!("User '{}' not found", wanted.trim()))?;
    Ok(UserContext::new(id))
}
