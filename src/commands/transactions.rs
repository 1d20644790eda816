// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::settlement::{EntryRequest, delete_entry, post_entry};
use crate::utils::{
    id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let t = delete_entry(conn, user, id)?;
            println!("Deleted {} of {} {} on {}", t.kind, t.amount, t.currency, t.date);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let account_name = sub.get_one::<String>("account").unwrap().trim();
    let kind = sub.get_one::<String>("kind").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, user, cat)?),
        None => None,
    };
    let note = sub.get_one::<String>("note").map(|s| s.trim().to_string());

    let req = EntryRequest {
        kind,
        account_id: id_for_account(conn, user, account_name)?,
        category_id,
        amount,
        date,
        note,
    };
    let t = post_entry(conn, user, &req)?;
    println!(
        "Recorded {} {} {} on {} (acct: {}) id={}",
        t.kind, t.amount, t.currency, t.date, account_name, t.id
    );
    Ok(())
}

fn list(conn: &Connection, user: &UserContext, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Kind", "Amount", "CCY", "Category", "Note", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub note: String,
}

pub fn query_rows(
    conn: &Connection,
    user: &UserContext,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, a.name, t.kind, t.amount, t.currency, c.name, t.note FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id LEFT JOIN categories c ON t.category_id=c.id WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user.user_id.clone()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.trim().into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.trim().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.trim().into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let category: Option<String> = r.get(6)?;
        let note: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            account: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            kind: r.get(3)?,
            amount: r.get(4)?,
            currency: r.get(5)?,
            category: category.unwrap_or_default(),
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
