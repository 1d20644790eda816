// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::UserContext;

/// Ratio at which a category is flagged.
pub const WARNING_RATIO: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Normal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub ceiling: Decimal,
    pub spent: Decimal,
    pub ratio: Decimal,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    /// `None` when there is no positive ceiling to measure against.
    pub fn compute(ceiling: Option<Decimal>, spent: Decimal) -> Option<BudgetProgress> {
        let ceiling = ceiling.filter(|c| *c > Decimal::ZERO)?;
        // a ratio past Decimal::MAX is pinned there; it is a warning either way
        let ratio = spent.checked_div(ceiling).unwrap_or(Decimal::MAX);
        let status = if ratio >= WARNING_RATIO {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Normal
        };
        Some(BudgetProgress {
            ceiling,
            spent,
            ratio,
            status,
        })
    }

    /// Ratio clamped to 0..=1 for progress bars.
    pub fn fill(&self) -> Decimal {
        self.ratio.clamp(Decimal::ZERO, Decimal::ONE)
    }
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    #[serde(flatten)]
    pub progress: BudgetProgress,
}

/// Month-to-date progress for every budgeted category visible to `user`.
///
/// Expense amounts are summed at face value in whatever currency they were recorded in.
pub fn month_progress(
    conn: &Connection,
    user: &UserContext,
    today: NaiveDate,
) -> Result<Vec<CategoryProgress>> {
    let since = month_start(today);
    let mut cats = conn.prepare(
        "SELECT id, name, monthly_budget FROM categories
         WHERE (user_id=?1 OR user_id IS NULL) AND monthly_budget IS NOT NULL
         ORDER BY name",
    )?;
    let rows = cats.query_map(params![user.user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut spent_stmt = conn.prepare(
        "SELECT amount FROM transactions
         WHERE user_id=?1 AND category_id=?2 AND kind='expense' AND date>=?3",
    )?;
    let mut out = Vec::new();
    for row in rows {
        let (cat_id, name, ceiling_s) = row?;
        let ceiling = ceiling_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget '{}' for {}", ceiling_s, name))?;
        if ceiling <= Decimal::ZERO {
            continue;
        }
        let mut spent = Decimal::ZERO;
        let mut amounts = spent_stmt.query(params![user.user_id, cat_id, since])?;
        while let Some(r) = amounts.next()? {
            let s: String = r.get(0)?;
            let amount = s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in transactions", s))?;
            spent = spent
                .checked_add(amount)
                .ok_or_else(|| anyhow!("Spending in {} exceeds the representable range", name))?;
        }
        if let Some(progress) = BudgetProgress::compute(Some(ceiling), spent) {
            out.push(CategoryProgress {
                category: name,
                progress,
            });
        }
    }
    Ok(out)
}
