// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::fx::{HttpRateSource, RateSource, convert, fetch_currency_names};
use crate::utils::{parse_currency, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    match m.subcommand() {
        Some(("convert", sub)) => {
            let rates = HttpRateSource::new(&settings.rates_url)?;
            convert_amount(&rates, sub)?;
        }
        Some(("currencies", sub)) => {
            if sub.get_flag("refresh") {
                let n = refresh_currencies(conn, &settings.currencies_url)?;
                println!("Stored {} currencies", n);
            }
            list_currencies(conn)?;
        }
        _ => {}
    }
    Ok(())
}

fn convert_amount(rates: &dyn RateSource, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = parse_currency(sub.get_one::<String>("from").unwrap())?;
    let to = parse_currency(sub.get_one::<String>("to").unwrap())?;
    let res = convert(rates, amount, &from, &to)?;
    println!("{} {} -> {:.2} {}", amount, from, res, to);
    Ok(())
}

pub fn refresh_currencies(conn: &Connection, url: &str) -> Result<usize> {
    let names = fetch_currency_names(url)?;
    let tx = conn.unchecked_transaction()?;
    for (code, name) in &names {
        tx.execute(
            "INSERT INTO currencies(code, name) VALUES (?1, ?2)
             ON CONFLICT(code) DO UPDATE SET name=excluded.name",
            params![code.to_uppercase(), name],
        )?;
    }
    tx.commit()?;
    Ok(names.len())
}

fn list_currencies(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT code, name FROM currencies ORDER BY code")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut data = Vec::new();
    for row in rows {
        let (c, n) = row?;
        data.push(vec![c, n]);
    }
    if data.is_empty() {
        println!("No currencies cached; run `fx currencies --refresh`.");
    } else {
        println!("{}", pretty_table(&["Code", "Name"], data));
    }
    Ok(())
}
