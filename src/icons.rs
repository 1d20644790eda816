// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Icon tags shared by accounts and categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Wallet,
    Bank,
    Cash,
    CreditCard,
    Savings,
    Food,
    Groceries,
    Transport,
    Shopping,
    Health,
    Entertainment,
    Bills,
    Home,
    Education,
    Travel,
    Salary,
    Gift,
    Other,
}

impl Icon {
    pub const ALL: [Icon; 18] = [
        Icon::Wallet,
        Icon::Bank,
        Icon::Cash,
        Icon::CreditCard,
        Icon::Savings,
        Icon::Food,
        Icon::Groceries,
        Icon::Transport,
        Icon::Shopping,
        Icon::Health,
        Icon::Entertainment,
        Icon::Bills,
        Icon::Home,
        Icon::Education,
        Icon::Travel,
        Icon::Salary,
        Icon::Gift,
        Icon::Other,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Icon::Wallet => "wallet",
            Icon::Bank => "bank",
            Icon::Cash => "cash",
            Icon::CreditCard => "credit-card",
            Icon::Savings => "savings",
            Icon::Food => "food",
            Icon::Groceries => "groceries",
            Icon::Transport => "transport",
            Icon::Shopping => "shopping",
            Icon::Health => "health",
            Icon::Entertainment => "entertainment",
            Icon::Bills => "bills",
            Icon::Home => "home",
            Icon::Education => "education",
            Icon::Travel => "travel",
            Icon::Salary => "salary",
            Icon::Gift => "gift",
            Icon::Other => "other",
        }
    }

    /// Color used when the caller does not pick one.
    pub fn default_color(&self) -> &'static str {
        match self {
            Icon::Wallet | Icon::Cash => "#4CAF50",
            Icon::Bank | Icon::Savings => "#2196F3",
            Icon::CreditCard | Icon::Bills => "#F44336",
            Icon::Food | Icon::Groceries => "#FF9800",
            Icon::Transport | Icon::Travel => "#00BCD4",
            Icon::Shopping | Icon::Gift => "#E91E63",
            Icon::Health => "#8BC34A",
            Icon::Entertainment => "#9C27B0",
            Icon::Home => "#795548",
            Icon::Education => "#3F51B5",
            Icon::Salary => "#009688",
            Icon::Other => "#9E9E9E",
        }
    }
}

impl FromStr for Icon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Icon::ALL
            .iter()
            .find(|i| i.tag() == needle)
            .copied()
            .ok_or_else(|| {
                let known: Vec<&str> = Icon::ALL.iter().map(|i| i.tag()).collect();
                anyhow::anyhow!("Unknown icon '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
