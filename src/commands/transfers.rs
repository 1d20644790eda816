// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, UserContext};
use crate::fx::{HttpRateSource, RateSource};
use crate::settlement::{
    TransferRequest, create_transfer, delete_transfer, edit_transfer, list_accounts,
    list_transfers, load_transfer,
};
use crate::utils::{id_for_account, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let rates = HttpRateSource::new(&settings.rates_url)?;
    handle_with(conn, user, &rates, m)
}

/// Same as [`handle`] with an explicit rate source.
pub fn handle_with(
    conn: &mut Connection,
    user: &UserContext,
    rates: &dyn RateSource,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, rates, sub)?,
        Some(("edit", sub)) => edit(conn, user, rates, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let reverse = sub.get_flag("reverse");
            let t = delete_transfer(conn, user, id, reverse)?;
            if reverse {
                println!("Deleted transfer {} and restored balances", t.id);
            } else {
                println!("Deleted transfer {} (balances unchanged)", t.id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn account_arg(
    conn: &Connection,
    user: &UserContext,
    sub: &clap::ArgMatches,
    name: &str,
) -> Result<Option<String>> {
    match sub.get_one::<String>(name).map(|s| s.trim()) {
        Some(n) if !n.is_empty() => Ok(Some(id_for_account(conn, user, n)?)),
        _ => Ok(None),
    }
}

fn add(
    conn: &mut Connection,
    user: &UserContext,
    rates: &dyn RateSource,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let req = TransferRequest {
        from_account_id: account_arg(conn, user, sub, "from")?,
        to_account_id: account_arg(conn, user, sub, "to")?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        date: match sub.get_one::<String>("date") {
            Some(d) => parse_date(d)?,
            None => Local::now().date_naive(),
        },
        note: sub.get_one::<String>("note").map(|s| s.trim().to_string()),
    };
    let t = create_transfer(conn, user, rates, &req)?;
    println!(
        "Transferred {} {} -> {} {} id={}",
        t.amount, t.from_currency, t.converted_amount, t.to_currency, t.id
    );
    Ok(())
}

fn edit(
    conn: &mut Connection,
    user: &UserContext,
    rates: &dyn RateSource,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let current = load_transfer(conn, user, id)?;
    let req = TransferRequest {
        from_account_id: account_arg(conn, user, sub, "from")?
            .or(Some(current.from_account_id)),
        to_account_id: account_arg(conn, user, sub, "to")?.or(Some(current.to_account_id)),
        amount: match sub.get_one::<String>("amount") {
            Some(a) => parse_decimal(a)?,
            None => current.amount,
        },
        date: match sub.get_one::<String>("date") {
            Some(d) => parse_date(d)?,
            None => current.date,
        },
        note: match sub.get_one::<String>("note") {
            Some(n) => Some(n.trim().to_string()),
            None => current.note,
        },
    };
    let t = edit_transfer(conn, user, rates, id, &req)?;
    println!(
        "Updated transfer {}: {} {} -> {} {}",
        t.id, t.amount, t.from_currency, t.converted_amount, t.to_currency
    );
    Ok(())
}

fn list(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let transfers = list_transfers(conn, user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &transfers)? {
        return Ok(());
    }
    let names: HashMap<String, String> = list_accounts(conn, user)?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_else(|| format!("<{}>", id));
    let rows = transfers
        .into_iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                name_of(&t.from_account_id),
                name_of(&t.to_account_id),
                format!("{:.2} {}", t.amount, t.from_currency),
                format!("{:.2} {}", t.converted_amount, t.to_currency),
                t.note.unwrap_or_default(),
                t.id,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "From", "To", "Sent", "Received", "Note", "Id"], rows)
    );
    Ok(())
}
