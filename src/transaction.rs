//! Transaction and split records.

use crate::amount::Amount;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A single register entry.
///
/// # Invariants
///
/// When `splits` is non-empty, the split amounts add up exactly to `amount`.
/// The reader refuses to produce a transaction that breaks this.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transaction {
    pub date: Option<NaiveDate>,

    /// Signed amount; negative for money leaving the account.
    pub amount: Amount,

    /// Undocumented `U` amount, carried as read.
    pub undocumented: Option<Amount>,

    /// Cleared status: `*` or `c` for cleared, `X` or `R` for reconciled.
    pub cleared: Option<char>,

    /// Check or reference number.
    pub number: String,

    pub payee: String,
    pub memo: String,

    /// Address lines, joined with `\n`.
    pub address: String,

    /// Category label, or `[Account]` for transfers.
    pub category: String,

    pub security: Option<String>,
    pub quantity: Option<Amount>,
    pub price: Option<Amount>,

    pub splits: Vec<Split>,
}

impl Transaction {
    /// Sum of split amounts, or `None` when the transaction is not split.
    pub fn split_total(&self) -> Option<Amount> {
        if self.splits.is_empty() {
            None
        } else {
            Some(self.splits.iter().map(|split| split.amount).sum())
        }
    }

    /// Returns `true` unless splits exist and disagree with `amount`.
    pub fn is_balanced(&self) -> bool {
        self.split_total().map_or(true, |total| total == self.amount)
    }

    /// Sum of splits when split, otherwise the transaction amount.
    pub fn balance(&self) -> Amount {
        self.split_total().unwrap_or(self.amount)
    }

    /// Appends another address line.
    pub fn add_address_line(&mut self, line: &str) {
        if !self.address.is_empty() {
            self.address.push('\n');
        }
        self.address.push_str(line);
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{} ", date)?,
            None => write!(f, "---------- ")?,
        }
        write!(f, "{} {}", self.payee, self.amount)?;
        if !self.splits.is_empty() {
            write!(f, " ({} splits)", self.splits.len())?;
        }
        Ok(())
    }
}

/// A part of a transaction allocated to its own category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Split {
    pub amount: Amount,
    pub category: String,
    pub memo: String,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.amount)?;
        if !self.memo.is_empty() {
            write!(f, " ({})", self.memo)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn split(amount: &str, category: &str) -> Split {
        Split {
            amount: amt(amount),
            category: category.to_string(),
            memo: String::new(),
        }
    }

    #[test]
    fn test_unsplit_balance_is_amount() {
        let tx = Transaction {
            amount: amt("-500.00"),
            ..Default::default()
        };

        assert_eq!(tx.split_total(), None);
        assert!(tx.is_balanced());
        assert_eq!(tx.balance(), amt("-500.00"));
    }

    #[test]
    fn test_split_balance_is_split_sum() {
        let tx = Transaction {
            amount: amt("-320.63"),
            splits: vec![split("-300.00", "Bills:Electric"), split("-20.63", "Bills:Water")],
            ..Default::default()
        };

        assert_eq!(tx.split_total(), Some(amt("-320.63")));
        assert!(tx.is_balanced());
        assert_eq!(tx.balance(), tx.amount);
    }

    #[test]
    fn test_mismatched_splits_are_unbalanced() {
        let tx = Transaction {
            amount: amt("-100.00"),
            splits: vec![split("-60.00", "Food")],
            ..Default::default()
        };

        assert!(!tx.is_balanced());
        assert_eq!(tx.balance(), amt("-60.00"));
    }

    #[test]
    fn test_address_lines_are_joined() {
        let mut tx = Transaction::default();
        tx.add_address_line("123 Main St");
        tx.add_address_line("Springfield");
        assert_eq!(tx.address, "123 Main St\nSpringfield");
    }

    #[test]
    fn test_display_summary() {
        let tx = Transaction {
            date: NaiveDate::from_ymd_opt(2006, 1, 5),
            amount: amt("-500"),
            payee: "Rent Co".to_string(),
            ..Default::default()
        };
        assert_eq!(tx.to_string(), "2006-01-05 Rent Co -500.00");
        assert_eq!(split("-20.63", "Bills:Water").to_string(), "Bills:Water -20.63");
    }
}
