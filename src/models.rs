// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::icons::Icon;
use crate::schedule::Frequency;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub balance: Decimal,
    pub icon: Icon,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Income => "income",
        }
    }

    /// Signed effect of an entry of this kind on its account balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            EntryKind::Expense => -amount,
            EntryKind::Income => amount,
        }
    }
}

impl FromStr for EntryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(EntryKind::Expense),
            "income" => Ok(EntryKind::Income),
            other => Err(anyhow::anyhow!(
                "Invalid kind '{}', expected expense or income",
                other
            )),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub user_id: Option<String>, // None = global
    pub name: String,
    pub monthly_budget: Option<Decimal>,
    pub kind: EntryKind,
    pub icon: Icon,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub kind: EntryKind,
    pub category_id: Option<String>,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub user_id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: Decimal,
    pub converted_amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: String,
    pub user_id: String,
    pub kind: EntryKind,
    pub category_id: Option<String>,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub frequency: Frequency,
    pub next_execution: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub frequency: Frequency,
    pub date: NaiveDateTime,
    pub message: String,
    pub is_active: bool,
}
