// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the currency conversion helper.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("exchange rate service unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("could not decode rate table for {base}: {reason}")]
    Decode { base: String, reason: String },
    #[error("no {quote} rate published for base {base}")]
    MissingRate { base: String, quote: String },
    #[error("amount to convert must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("{amount} at rate {rate} is out of range")]
    Overflow { amount: Decimal, rate: Decimal },
}

/// Errors raised by settlement and the other ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0} account is required")]
    MissingAccount(&'static str),
    #[error("source and destination account must differ")]
    SameAccount,
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("insufficient funds: balance {available}, requested {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },
    #[error("account '{0}' not found")]
    AccountNotFound(String),
    #[error("transfer '{0}' not found")]
    TransferNotFound(String),
    #[error("transaction '{0}' not found")]
    TransactionNotFound(String),
    #[error("invalid stored amount '{0}'")]
    BadAmount(String),
    #[error("balance {balance} cannot absorb {delta}")]
    Overflow { balance: Decimal, delta: Decimal },
    #[error(transparent)]
    Fx(#[from] FxError),
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

impl LedgerError {
    /// True for errors caused by user input, raised before anything is written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::MissingAccount(_)
                | LedgerError::SameAccount
                | LedgerError::NonPositiveAmount(_)
                | LedgerError::InsufficientFunds { .. }
        )
    }
}
