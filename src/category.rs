//! Category and tag records.

use crate::amount::Amount;
use serde::Serialize;
use std::fmt;

/// An income or expense category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub description: String,

    /// `true` for income categories, `false` for expense categories.
    pub is_income: bool,

    pub tax_related: bool,
    pub tax_schedule: String,
    pub budget: Option<Amount>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_income { "income" } else { "expense" };
        write!(f, "{} ({})", self.name, kind)?;
        if self.tax_related {
            write!(f, " tax-related")?;
        }
        if let Some(budget) = self.budget {
            write!(f, " budget {}", budget)?;
        }
        Ok(())
    }
}

/// A free-form label attached to transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
