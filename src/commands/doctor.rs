// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, user: &UserContext) -> Result<()> {
    let rows = findings(conn, user, Local::now().date_naive())?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Integrity findings as (issue, detail) rows.
pub fn findings(
    conn: &Connection,
    user: &UserContext,
    today: NaiveDate,
) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut push = |issue: &str, detail: String| rows.push(vec![issue.to_string(), detail]);

    // 1) Transfers pointing at accounts that no longer exist
    let mut stmt = conn.prepare(
        "SELECT t.id, t.from_account_id, t.to_account_id FROM transfers t
         WHERE t.user_id=?1
           AND (NOT EXISTS (SELECT 1 FROM accounts a WHERE a.id=t.from_account_id)
             OR NOT EXISTS (SELECT 1 FROM accounts a WHERE a.id=t.to_account_id))",
    )?;
    let mut cur = stmt.query(params![user.user_id])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let from: String = r.get(1)?;
        let to: String = r.get(2)?;
        push("transfer_missing_account", format!("{} ({} -> {})", id, from, to));
    }

    // 2) Transfer currencies that disagree with their accounts
    let mut stmt = conn.prepare(
        "SELECT t.id, t.from_currency, fa.currency, t.to_currency, ta.currency FROM transfers t
         JOIN accounts fa ON fa.id=t.from_account_id
         JOIN accounts ta ON ta.id=t.to_account_id
         WHERE t.user_id=?1 AND (t.from_currency != fa.currency OR t.to_currency != ta.currency)",
    )?;
    let mut cur = stmt.query(params![user.user_id])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let (tf, af, tt, at): (String, String, String, String) =
            (r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?);
        push(
            "transfer_currency_mismatch",
            format!("{}: {}->{} recorded, accounts now {}->{}", id, tf, tt, af, at),
        );
    }

    // 3) Negative balances
    let mut stmt = conn.prepare(
        "SELECT name, balance, currency FROM accounts
         WHERE user_id=?1 AND CAST(balance AS REAL) < 0 ORDER BY name",
    )?;
    let mut cur = stmt.query(params![user.user_id])?;
    while let Some(r) = cur.next()? {
        let name: String = r.get(0)?;
        let bal: String = r.get(1)?;
        let ccy: String = r.get(2)?;
        push("negative_balance", format!("{} {} {}", name, bal, ccy));
    }

    // 4) Recurring templates past due; there is no executor
    let mut stmt = conn.prepare(
        "SELECT id, next_execution FROM recurring_transactions
         WHERE user_id=?1 AND next_execution < ?2 ORDER BY next_execution",
    )?;
    let mut cur = stmt.query(params![user.user_id, today])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let due: String = r.get(1)?;
        push("recurring_not_executed", format!("{} due {}", id, due));
    }

    Ok(rows)
}
