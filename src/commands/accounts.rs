// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::icons::Icon;
use crate::settlement::list_accounts;
use crate::utils::{
    fmt_money, id_for_account, maybe_print_json, parse_currency, parse_decimal, pretty_table,
    round2,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let ccy = parse_currency(sub.get_one::<String>("currency").unwrap())?;
            let balance = round2(parse_decimal(sub.get_one::<String>("balance").unwrap())?);
            let icon: Icon = sub.get_one::<String>("icon").unwrap().parse()?;
            let color = sub
                .get_one::<String>("color")
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| icon.default_color().to_string());
            conn.execute(
                "INSERT INTO accounts(user_id, name, currency, balance, icon, color)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.user_id,
                    name,
                    ccy,
                    balance.to_string(),
                    icon.tag(),
                    color
                ],
            )
            .with_context(|| format!("Could not add account '{}'", name))?;
            println!("Added account '{}' ({}) opening {}", name, ccy, fmt_money(&balance, &ccy));
        }
        Some(("list", sub)) => {
            let accounts = list_accounts(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let data = accounts
                    .into_iter()
                    .map(|a| {
                        vec![
                            a.name,
                            a.currency,
                            format!("{:.2}", a.balance),
                            a.icon.to_string(),
                            a.color,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Currency", "Balance", "Icon", "Color"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id = id_for_account(conn, user, name)?;
            conn.execute(
                "DELETE FROM accounts WHERE id=?1 AND user_id=?2",
                params![id, user.user_id],
            )?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
