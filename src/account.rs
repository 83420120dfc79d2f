//! Account record.

use crate::amount::Amount;
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// An account and the transactions recorded against it.
///
/// Transactions read before any account is declared belong to an unnamed
/// account created on demand, so `name` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Account {
    pub name: String,

    /// Quicken account type label, e.g. `Bank`, `CCard`, `Invst`.
    pub account_type: String,

    pub description: String,
    pub credit_limit: Option<Amount>,
    pub statement_balance: Option<Amount>,
    pub statement_date: Option<NaiveDate>,

    /// Transactions in the order they were read.
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Creates an empty account with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Account {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sum of all transaction amounts.
    pub fn balance(&self) -> Amount {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "(unnamed)"
        } else {
            self.name.as_str()
        };
        write!(f, "{}", name)?;
        if !self.account_type.is_empty() {
            write!(f, " [{}]", self.account_type)?;
        }
        write!(
            f,
            ": {} transactions, balance {}",
            self.transactions.len(),
            self.balance()
        )
    }
}
