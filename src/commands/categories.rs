// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::UserContext;
use crate::icons::Icon;
use crate::models::{Category, EntryKind};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table, round2};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, user: &UserContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind: EntryKind = sub.get_one::<String>("kind").unwrap().parse()?;
            let budget = match sub.get_one::<String>("budget") {
                Some(b) => Some(round2(parse_decimal(b)?)),
                None => None,
            };
            let icon: Icon = sub.get_one::<String>("icon").unwrap().parse()?;
            let color = sub
                .get_one::<String>("color")
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| icon.default_color().to_string());
            let owner = if sub.get_flag("global") {
                None
            } else {
                Some(user.user_id.as_str())
            };
            conn.execute(
                "INSERT INTO categories(user_id, name, monthly_budget, kind, icon, color)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    owner,
                    name,
                    budget.map(|b| b.to_string()),
                    kind.as_str(),
                    icon.tag(),
                    color
                ],
            )?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let cats = list_categories(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.name,
                            c.kind.to_string(),
                            c.monthly_budget
                                .map(|b| format!("{:.2}", b))
                                .unwrap_or_default(),
                            c.icon.to_string(),
                            if c.user_id.is_none() { "yes" } else { "" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Kind", "Budget", "Icon", "Global"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let n = conn.execute(
                "DELETE FROM categories WHERE name=?1 AND user_id=?2",
                params![name, user.user_id],
            )?;
            if n == 0 {
                return Err(anyhow!("Category '{}' not found among your categories", name));
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

/// The user's own categories plus the global ones.
pub fn list_categories(conn: &Connection, user: &UserContext) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, monthly_budget, kind, icon, color FROM categories
         WHERE user_id=?1 OR user_id IS NULL ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user.user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, name, budget, kind, icon, color) = row?;
        let monthly_budget = match budget {
            Some(b) => Some(
                b.parse::<Decimal>()
                    .with_context(|| format!("Invalid budget '{}' for {}", b, name))?,
            ),
            None => None,
        };
        out.push(Category {
            id,
            user_id,
            name,
            monthly_budget,
            kind: kind.parse()?,
            icon: icon.parse().unwrap_or(Icon::Other),
            color,
        });
    }
    Ok(out)
}
