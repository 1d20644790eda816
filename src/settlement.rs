// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance settlement for transfers and ledger entries.
//!
//! Account balances only move through this module. Each operation validates first, fetches
//! any exchange rate it needs, and then performs all of its writes inside one SQLite
//! transaction so a failed write leaves no partial effect behind.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::UserContext;
use crate::error::LedgerError;
use crate::fx::{self, RateSource};
use crate::icons::Icon;
use crate::models::{Account, EntryKind, Transaction, Transfer};
use crate::utils::round2;

/// What the caller wants a transfer to look like after create or edit.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// A new expense or income entry.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub kind: EntryKind,
    pub account_id: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
}

fn parse_amount(s: String) -> Result<Decimal, LedgerError> {
    s.parse::<Decimal>().map_err(|_| LedgerError::BadAmount(s))
}

fn account_row(r: &Row<'_>) -> rusqlite::Result<(Account, String)> {
    let icon: String = r.get(5)?;
    Ok((
        Account {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            currency: r.get(3)?,
            balance: Decimal::ZERO,
            icon: icon.parse().unwrap_or(Icon::Other),
            color: r.get(6)?,
        },
        r.get(4)?,
    ))
}

pub fn load_account(
    conn: &Connection,
    user: &UserContext,
    id: &str,
) -> Result<Account, LedgerError> {
    let row = conn
        .query_row(
            "SELECT id, user_id, name, currency, balance, icon, color
             FROM accounts WHERE id=?1 AND user_id=?2",
            params![id, user.user_id],
            account_row,
        )
        .optional()?;
    let (mut acct, bal) = row.ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;
    acct.balance = parse_amount(bal)?;
    Ok(acct)
}

pub fn list_accounts(conn: &Connection, user: &UserContext) -> Result<Vec<Account>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, currency, balance, icon, color
         FROM accounts WHERE user_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![user.user_id], account_row)?;
    let mut out = Vec::new();
    for row in rows {
        let (mut acct, bal) = row?;
        acct.balance = parse_amount(bal)?;
        out.push(acct);
    }
    Ok(out)
}

fn transfer_row(r: &Row<'_>) -> rusqlite::Result<(Transfer, String, String)> {
    Ok((
        Transfer {
            id: r.get(0)?,
            user_id: r.get(1)?,
            from_account_id: r.get(2)?,
            to_account_id: r.get(3)?,
            amount: Decimal::ZERO,
            converted_amount: Decimal::ZERO,
            from_currency: r.get(6)?,
            to_currency: r.get(7)?,
            date: r.get(8)?,
            note: r.get(9)?,
        },
        r.get(4)?,
        r.get(5)?,
    ))
}

const TRANSFER_COLUMNS: &str = "id, user_id, from_account_id, to_account_id, amount, \
     converted_amount, from_currency, to_currency, date, note";

pub fn load_transfer(
    conn: &Connection,
    user: &UserContext,
    id: &str,
) -> Result<Transfer, LedgerError> {
    let sql = format!("SELECT {TRANSFER_COLUMNS} FROM transfers WHERE id=?1 AND user_id=?2");
    let row = conn
        .query_row(&sql, params![id, user.user_id], transfer_row)
        .optional()?;
    let (mut t, amt, conv) = row.ok_or_else(|| LedgerError::TransferNotFound(id.to_string()))?;
    t.amount = parse_amount(amt)?;
    t.converted_amount = parse_amount(conv)?;
    Ok(t)
}

pub fn list_transfers(
    conn: &Connection,
    user: &UserContext,
) -> Result<Vec<Transfer>, LedgerError> {
    let sql = format!(
        "SELECT {TRANSFER_COLUMNS} FROM transfers WHERE user_id=?1 ORDER BY date DESC, created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user.user_id], transfer_row)?;
    let mut out = Vec::new();
    for row in rows {
        let (mut t, amt, conv) = row?;
        t.amount = parse_amount(amt)?;
        t.converted_amount = parse_amount(conv)?;
        out.push(t);
    }
    Ok(out)
}

pub fn validate(req: &TransferRequest) -> Result<(&str, &str), LedgerError> {
    let from = req
        .from_account_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(LedgerError::MissingAccount("source"))?;
    let to = req
        .to_account_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(LedgerError::MissingAccount("destination"))?;
    if from == to {
        return Err(LedgerError::SameAccount);
    }
    if round2(req.amount) <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(req.amount));
    }
    Ok((from, to))
}

fn shift(balance: Decimal, delta: Decimal) -> Result<Decimal, LedgerError> {
    balance
        .checked_add(delta)
        .ok_or(LedgerError::Overflow { balance, delta })
}

fn adjust(
    balances: &mut BTreeMap<String, Decimal>,
    id: &str,
    delta: Decimal,
) -> Result<(), LedgerError> {
    if let Some(b) = balances.get_mut(id) {
        *b = shift(*b, delta)?;
    }
    Ok(())
}

fn write_balances(
    tx: &rusqlite::Transaction<'_>,
    balances: &BTreeMap<String, Decimal>,
) -> Result<(), LedgerError> {
    for (id, bal) in balances {
        tx.execute(
            "UPDATE accounts SET balance=?1 WHERE id=?2",
            params![round2(*bal).to_string(), id],
        )?;
    }
    Ok(())
}

/// Creates a transfer and moves the money between the two accounts.
///
/// Nothing is written when validation fails or the rate lookup errors.
pub fn create_transfer(
    conn: &mut Connection,
    user: &UserContext,
    rates: &dyn RateSource,
    req: &TransferRequest,
) -> Result<Transfer, LedgerError> {
    let (from_id, to_id) = validate(req)?;
    let from = load_account(conn, user, from_id)?;
    let to = load_account(conn, user, to_id)?;
    let amount = round2(req.amount);
    if from.balance < amount {
        return Err(LedgerError::InsufficientFunds {
            available: from.balance,
            requested: amount,
        });
    }
    let converted = round2(fx::convert(rates, amount, &from.currency, &to.currency)?);

    let mut balances = BTreeMap::new();
    balances.insert(from.id.clone(), shift(from.balance, -amount)?);
    balances.insert(to.id.clone(), shift(to.balance, converted)?);

    let tx = conn.transaction()?;
    let id: String = tx.query_row(
        "INSERT INTO transfers(user_id, from_account_id, to_account_id, amount, converted_amount,
                               from_currency, to_currency, date, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING id",
        params![
            user.user_id,
            from.id,
            to.id,
            amount.to_string(),
            converted.to_string(),
            from.currency,
            to.currency,
            req.date,
            req.note
        ],
        |r| r.get(0),
    )?;
    write_balances(&tx, &balances)?;
    tx.commit()?;
    info!(transfer = %id, from = %from.name, to = %to.name, %amount, %converted, "transfer created");

    Ok(Transfer {
        id,
        user_id: user.user_id.clone(),
        from_account_id: from.id,
        to_account_id: to.id,
        amount,
        converted_amount: converted,
        from_currency: from.currency,
        to_currency: to.currency,
        date: req.date,
        note: req.note.clone(),
    })
}

/// Replaces an existing transfer: the old effect is reversed and the new one applied.
///
/// When accounts and amount are unchanged the stored converted amount is reused, so an
/// edit of only the date or note leaves balances exactly where they were.
pub fn edit_transfer(
    conn: &mut Connection,
    user: &UserContext,
    rates: &dyn RateSource,
    id: &str,
    req: &TransferRequest,
) -> Result<Transfer, LedgerError> {
    let (from_id, to_id) = validate(req)?;
    let original = load_transfer(conn, user, id)?;
    let from = load_account(conn, user, from_id)?;
    let to = load_account(conn, user, to_id)?;
    let amount = round2(req.amount);

    let mut balances: BTreeMap<String, Decimal> = BTreeMap::new();
    for acct in [&from, &to] {
        balances.insert(acct.id.clone(), acct.balance);
    }
    // Accounts of the original transfer may have been deleted since; their side is skipped.
    for acct_id in [&original.from_account_id, &original.to_account_id] {
        if !balances.contains_key(acct_id) {
            match load_account(conn, user, acct_id) {
                Ok(a) => {
                    balances.insert(a.id, a.balance);
                }
                Err(LedgerError::AccountNotFound(_)) => {
                    warn!(transfer = %id, account = %acct_id, "original account gone; not reversing its side");
                }
                Err(e) => return Err(e),
            }
        }
    }
    adjust(&mut balances, &original.from_account_id, original.amount)?;
    adjust(&mut balances, &original.to_account_id, -original.converted_amount)?;

    let available = balances[&from.id];
    if available < amount {
        return Err(LedgerError::InsufficientFunds {
            available,
            requested: amount,
        });
    }

    let unchanged = original.from_account_id == from.id
        && original.to_account_id == to.id
        && original.amount == amount
        && original.from_currency == from.currency
        && original.to_currency == to.currency;
    let converted = if unchanged {
        original.converted_amount
    } else {
        round2(fx::convert(rates, amount, &from.currency, &to.currency)?)
    };
    debug!(transfer = %id, unchanged, %converted, "reapplying transfer");

    adjust(&mut balances, &from.id, -amount)?;
    adjust(&mut balances, &to.id, converted)?;

    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE transfers SET from_account_id=?1, to_account_id=?2, amount=?3,
             converted_amount=?4, from_currency=?5, to_currency=?6, date=?7, note=?8
         WHERE id=?9 AND user_id=?10",
        params![
            from.id,
            to.id,
            amount.to_string(),
            converted.to_string(),
            from.currency,
            to.currency,
            req.date,
            req.note,
            id,
            user.user_id
        ],
    )?;
    write_balances(&tx, &balances)?;
    tx.commit()?;
    info!(transfer = %id, %amount, %converted, "transfer edited");

    Ok(Transfer {
        id: id.to_string(),
        user_id: user.user_id.clone(),
        from_account_id: from.id,
        to_account_id: to.id,
        amount,
        converted_amount: converted,
        from_currency: from.currency,
        to_currency: to.currency,
        date: req.date,
        note: req.note.clone(),
    })
}

/// Deletes a transfer record. Balances stay as they are unless `reverse` is set, in which
/// case the transfer's effect is undone in the same transaction.
pub fn delete_transfer(
    conn: &mut Connection,
    user: &UserContext,
    id: &str,
    reverse: bool,
) -> Result<Transfer, LedgerError> {
    let t = load_transfer(conn, user, id)?;
    let mut balances = BTreeMap::new();
    if reverse {
        for (acct_id, delta) in [
            (&t.from_account_id, t.amount),
            (&t.to_account_id, -t.converted_amount),
        ] {
            match load_account(conn, user, acct_id) {
                Ok(a) => {
                    balances.insert(a.id, shift(a.balance, delta)?);
                }
                Err(LedgerError::AccountNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM transfers WHERE id=?1 AND user_id=?2",
        params![id, user.user_id],
    )?;
    write_balances(&tx, &balances)?;
    tx.commit()?;
    if reverse {
        info!(transfer = %id, "transfer deleted and reversed");
    } else {
        warn!(transfer = %id, amount = %t.amount, "transfer deleted; balances left unchanged");
    }
    Ok(t)
}

fn transaction_row(r: &Row<'_>) -> rusqlite::Result<(Transaction, String)> {
    let kind: String = r.get(2)?;
    let kind = kind.parse::<EntryKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;
    Ok((
        Transaction {
            id: r.get(0)?,
            user_id: r.get(1)?,
            kind,
            category_id: r.get(3)?,
            account_id: r.get(4)?,
            amount: Decimal::ZERO,
            currency: r.get(6)?,
            date: r.get(7)?,
            note: r.get(8)?,
        },
        r.get(5)?,
    ))
}

pub fn load_transaction(
    conn: &Connection,
    user: &UserContext,
    id: &str,
) -> Result<Transaction, LedgerError> {
    let row = conn
        .query_row(
            "SELECT id, user_id, kind, category_id, account_id, amount, currency, date, note
             FROM transactions WHERE id=?1 AND user_id=?2",
            params![id, user.user_id],
            transaction_row,
        )
        .optional()?;
    let (mut t, amt) = row.ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;
    t.amount = parse_amount(amt)?;
    Ok(t)
}

/// Records an expense or income and applies it to the account balance.
pub fn post_entry(
    conn: &mut Connection,
    user: &UserContext,
    req: &EntryRequest,
) -> Result<Transaction, LedgerError> {
    if round2(req.amount) <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(req.amount));
    }
    let acct = load_account(conn, user, &req.account_id)?;
    let amount = round2(req.amount);
    let new_balance = shift(acct.balance, req.kind.signed(amount))?;

    let tx = conn.transaction()?;
    let id: String = tx.query_row(
        "INSERT INTO transactions(user_id, kind, category_id, account_id, amount, currency, date, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
        params![
            user.user_id,
            req.kind.as_str(),
            req.category_id,
            acct.id,
            amount.to_string(),
            acct.currency,
            req.date,
            req.note
        ],
        |r| r.get(0),
    )?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![round2(new_balance).to_string(), acct.id],
    )?;
    tx.commit()?;
    debug!(entry = %id, kind = %req.kind, %amount, account = %acct.name, "entry posted");

    Ok(Transaction {
        id,
        user_id: user.user_id.clone(),
        kind: req.kind,
        category_id: req.category_id.clone(),
        account_id: acct.id,
        amount,
        currency: acct.currency,
        date: req.date,
        note: req.note.clone(),
    })
}

/// Removes an entry and undoes its balance effect.
pub fn delete_entry(
    conn: &mut Connection,
    user: &UserContext,
    id: &str,
) -> Result<Transaction, LedgerError> {
    let t = load_transaction(conn, user, id)?;
    let acct = load_account(conn, user, &t.account_id)?;
    let new_balance = shift(acct.balance, -t.kind.signed(t.amount))?;

    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user.user_id],
    )?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![round2(new_balance).to_string(), acct.id],
    )?;
    tx.commit()?;
    debug!(entry = %id, "entry deleted");
    Ok(t)
}
