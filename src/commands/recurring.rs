// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring payment templates.
//!
//! Templates are stored with their next execution date but nothing executes them; `next`
//! only previews the schedule.

use crate::config::UserContext;
use crate::models::{EntryKind, RecurringTransaction};
use crate::schedule::{Frequency, RECURRING_FREQUENCIES, next_date, occurrences};
use crate::settlement::load_account;
use crate::utils::{
    id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table,
    round2,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("list", sub)) => {
            let items = list_recurring(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.kind.to_string(),
                            format!("{:.2} {}", r.amount, r.currency),
                            r.frequency.to_string(),
                            r.date.to_string(),
                            r.next_execution.to_string(),
                            r.id,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Kind", "Amount", "Every", "Start", "Next", "Id"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = conn.execute(
                "DELETE FROM recurring_transactions WHERE id=?1 AND user_id=?2",
                params![id, user.user_id],
            )?;
            if n == 0 {
                return Err(anyhow!("Recurring transaction '{}' not found", id));
            }
            println!("Removed recurring transaction {}", id);
        }
        Some(("next", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let r = load_recurring(conn, user, id)?;
            match sub.get_one::<String>("until") {
                Some(until) => {
                    let until = parse_date(until)?;
                    let rows = occurrences(r.next_execution, r.frequency, until)
                        .into_iter()
                        .map(|d| vec![d.to_string()])
                        .collect();
                    println!("{}", pretty_table(&["Occurrence"], rows));
                }
                None => match next_date(r.next_execution, r.frequency) {
                    Some(d) => println!("Due {}, then {}", r.next_execution, d),
                    None => println!("Due {}, does not repeat", r.next_execution),
                },
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let account_id = id_for_account(conn, user, sub.get_one::<String>("account").unwrap())?;
    let account = load_account(conn, user, &account_id)?;
    let kind: EntryKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let amount = positive(parse_decimal(sub.get_one::<String>("amount").unwrap())?)?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let frequency = Frequency::parse_within(
        sub.get_one::<String>("frequency").unwrap(),
        &RECURRING_FREQUENCIES,
    )?;
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(id_for_category(conn, user, c)?),
        None => None,
    };
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());

    let id: String = conn.query_row(
        "INSERT INTO recurring_transactions(user_id, kind, category_id, account_id, amount,
                                            currency, date, frequency, next_execution, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?7, ?9) RETURNING id",
        params![
            user.user_id,
            kind.as_str(),
            category_id,
            account.id,
            amount.to_string(),
            account.currency,
            date,
            frequency.as_str(),
            note
        ],
        |r| r.get(0),
    )?;
    println!(
        "Added {} {} {} every {} from {} id={}",
        kind, amount, account.currency, frequency, date, id
    );
    Ok(())
}

fn edit(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut r = load_recurring(conn, user, id)?;

    if let Some(a) = sub.get_one::<String>("account") {
        let account = load_account(conn, user, &id_for_account(conn, user, a)?)?;
        r.account_id = account.id;
        r.currency = account.currency;
    }
    if let Some(k) = sub.get_one::<String>("kind") {
        r.kind = k.parse()?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        r.amount = positive(parse_decimal(a)?)?;
    }
    if let Some(f) = sub.get_one::<String>("frequency") {
        r.frequency = Frequency::parse_within(f, &RECURRING_FREQUENCIES)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        r.category_id = Some(id_for_category(conn, user, c)?);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        r.date = parse_date(d)?;
        r.next_execution = r.date;
    }
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());

    conn.execute(
        "UPDATE recurring_transactions SET kind=?1, category_id=?2, account_id=?3, amount=?4,
             currency=?5, date=?6, frequency=?7, next_execution=?8, note=COALESCE(?9, note)
         WHERE id=?10 AND user_id=?11",
        params![
            r.kind.as_str(),
            r.category_id,
            r.account_id,
            r.amount.to_string(),
            r.currency,
            r.date,
            r.frequency.as_str(),
            r.next_execution,
            note,
            r.id,
            user.user_id
        ],
    )?;
    println!("Updated recurring transaction {}, next due {}", r.id, r.next_execution);
    Ok(())
}

fn positive(amount: Decimal) -> Result<Decimal> {
    let amount = round2(amount);
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Amount must be positive, got {}", amount));
    }
    Ok(amount)
}

type RecurringRow = (
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
    chrono::NaiveDate,
    String,
    chrono::NaiveDate,
);

const RECURRING_COLUMNS: &str = "id, user_id, kind, category_id, account_id, amount, currency, \
     date, frequency, next_execution";

fn read_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RecurringRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
        r.get(9)?,
    ))
}

fn build(row: RecurringRow) -> Result<RecurringTransaction> {
    let (id, user_id, kind, category_id, account_id, amount, currency, date, freq, next) = row;
    Ok(RecurringTransaction {
        kind: kind.parse()?,
        amount: amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' for {}", amount, id))?,
        frequency: freq.parse()?,
        id,
        user_id,
        category_id,
        account_id,
        currency,
        date,
        next_execution: next,
    })
}

pub fn load_recurring(
    conn: &Connection,
    user: &UserContext,
    id: &str,
) -> Result<RecurringTransaction> {
    let sql = format!(
        "SELECT {RECURRING_COLUMNS} FROM recurring_transactions WHERE id=?1 AND user_id=?2"
    );
    let row = conn
        .query_row(&sql, params![id, user.user_id], read_row)
        .optional()?
        .ok_or_else(|| anyhow!("Recurring transaction '{}' not found", id))?;
    build(row)
}

pub fn list_recurring(conn: &Connection, user: &UserContext) -> Result<Vec<RecurringTransaction>> {
    let sql = format!(
        "SELECT {RECURRING_COLUMNS} FROM recurring_transactions WHERE user_id=?1 ORDER BY next_execution"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user.user_id], read_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}
