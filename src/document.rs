//! The assembled result of reading a QIF file.

use crate::account::Account;
use crate::amount::Amount;
use crate::category::{Category, Tag};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Accounts, categories and tags in the order they were read.
///
/// Only the reader populates a document; callers get read-only access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub(crate) accounts: Vec<Account>,
    pub(crate) categories: Vec<Category>,
    pub(crate) tags: Vec<Tag>,
}

impl Document {
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Looks up an account by exact name.
    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name == name)
    }

    /// Sum of every account balance.
    pub fn balance(&self) -> Amount {
        self.accounts.iter().map(Account::balance).sum()
    }

    /// Number of transactions across all accounts.
    pub fn transaction_count(&self) -> usize {
        self.accounts
            .iter()
            .map(|account| account.transactions.len())
            .sum()
    }

    /// Writes one CSV row per account, in document order.
    pub fn write_summary<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account", "type", "transactions", "balance"])?;

        for account in &self.accounts {
            csv_writer.write_record([
                account.name.clone(),
                account.account_type.clone(),
                account.transactions.len().to_string(),
                account.balance().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
