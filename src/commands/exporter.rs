// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::settlement::list_transfers;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user, sub),
        Some(("transfers", sub)) => export_transfers(conn, user, sub),
        _ => Ok(()),
    }
}

fn export_transactions(
    conn: &Connection,
    user: &UserContext,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, a.name as account, t.kind, t.amount, t.currency, c.name as category, t.note
         FROM transactions t
         LEFT JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1
         ORDER BY t.date, t.created_at")?;
    let rows = stmt.query_map(params![user.user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "account", "kind", "amount", "currency", "category", "note",
            ])?;
            for row in rows {
                let (d, a, k, amt, ccy, cat, note) = row?;
                wtr.write_record([
                    d,
                    a.unwrap_or_default(),
                    k,
                    amt,
                    ccy,
                    cat.unwrap_or_default(),
                    note.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, a, k, amt, ccy, cat, note) = row?;
                items.push(json!({
                    "date": d,
                    "account": a,
                    "kind": k,
                    "amount": amt,
                    "currency": ccy,
                    "category": cat,
                    "note": note,
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => return Err(anyhow!("Unsupported format '{}', expected csv or json", other)),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_transfers(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let mut transfers = list_transfers(conn, user)?;
    transfers.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            for t in &transfers {
                wtr.serialize(t)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&transfers)?)?;
        }
        other => return Err(anyhow!("Unsupported format '{}', expected csv or json", other)),
    }
    println!("Exported {} transfers to {}", transfers.len(), out);
    Ok(())
}
