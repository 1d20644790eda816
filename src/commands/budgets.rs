// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{BudgetStatus, month_progress, month_start};
use crate::config::UserContext;
use crate::utils::{id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::Local;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, user, sub)?,
        Some(("clear", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap().trim();
            let cat_id = id_for_category(conn, user, cat)?;
            let n = conn.execute(
                "UPDATE categories SET monthly_budget=NULL WHERE id=?1 AND user_id=?2",
                params![cat_id, user.user_id],
            )?;
            if n == 0 {
                return Err(anyhow!("Category '{}' is global and cannot be changed", cat));
            }
            println!("Budget cleared for {}", cat);
        }
        Some(("status", sub)) => status(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?.round_dp(2);
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Budget must be positive, got {}", amount));
    }
    let cat_id = id_for_category(conn, user, cat)?;
    let n = conn.execute(
        "UPDATE categories SET monthly_budget=?1 WHERE id=?2 AND user_id=?3",
        params![amount.to_string(), cat_id, user.user_id],
    )?;
    if n == 0 {
        return Err(anyhow!("Category '{}' is global and cannot be changed", cat));
    }
    println!("Monthly budget for {} = {}", cat, amount);
    Ok(())
}

fn status(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let data = month_progress(conn, user, today)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|c| {
                let p = c.progress;
                vec![
                    c.category,
                    format!("{:.2}", p.ceiling),
                    format!("{:.2}", p.spent),
                    p.ratio
                        .checked_mul(Decimal::ONE_HUNDRED)
                        .map(|r| format!("{:.0}%", r))
                        .unwrap_or_else(|| ">100%".to_string()),
                    match p.status {
                        BudgetStatus::Warning => "warning".to_string(),
                        BudgetStatus::Normal => "normal".to_string(),
                    },
                ]
            })
            .collect();
        println!("Since {}", month_start(today));
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Used", "Status"], rows)
        );
    }
    Ok(())
}
