//! Section readers: one per record kind.
//!
//! Each section consumes field lines until it sees a header or the end of
//! input, which it hands back to the dispatcher. Field codes are closed
//! per-section enums; a code outside the active section's set is fatal.

use crate::account::Account;
use crate::amount::Amount;
use crate::category::{Category, Tag};
use crate::date::parse_date;
use crate::document::Document;
use crate::error::{QifError, Result};
use crate::token::{Token, TokenStream};
use crate::transaction::{Split, Transaction};
use chrono::NaiveDate;
use log::debug;
use std::mem;
use tokio::io::AsyncBufRead;

/// A closed set of field codes valid inside one section.
pub trait FieldCode: Sized {
    fn from_code(code: char) -> Option<Self>;
}

/// Account list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Type,
    Description,
    CreditLimit,
    BalanceDate,
    StatementBalance,
    EndOfEntry,
}

impl FieldCode for AccountField {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(AccountField::Name),
            'T' => Some(AccountField::Type),
            'D' => Some(AccountField::Description),
            'L' => Some(AccountField::CreditLimit),
            '/' => Some(AccountField::BalanceDate),
            '$' => Some(AccountField::StatementBalance),
            '^' => Some(AccountField::EndOfEntry),
            _ => None,
        }
    }
}

/// Category list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Description,
    TaxRelated,
    Income,
    Expense,
    Budget,
    TaxSchedule,
    EndOfEntry,
}

impl FieldCode for CategoryField {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(CategoryField::Name),
            'D' => Some(CategoryField::Description),
            'T' => Some(CategoryField::TaxRelated),
            'I' => Some(CategoryField::Income),
            'E' => Some(CategoryField::Expense),
            'B' => Some(CategoryField::Budget),
            'R' => Some(CategoryField::TaxSchedule),
            '^' => Some(CategoryField::EndOfEntry),
            _ => None,
        }
    }
}

/// Tag list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Name,
    EndOfEntry,
}

impl FieldCode for TagField {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(TagField::Name),
            '^' => Some(TagField::EndOfEntry),
            _ => None,
        }
    }
}

/// Transaction fields, shared by every account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Date,
    Undocumented,
    Amount,
    Cleared,
    Number,
    Payee,
    Memo,
    Address,
    Category,
    SplitCategory,
    SplitMemo,
    Security,
    Quantity,
    Price,
    SplitAmount,
    EndOfEntry,
}

impl FieldCode for TransactionField {
    fn from_code(code: char) -> Option<Self> {
        match code {
            'D' => Some(TransactionField::Date),
            'U' => Some(TransactionField::Undocumented),
            'T' => Some(TransactionField::Amount),
            'C' => Some(TransactionField::Cleared),
            'N' => Some(TransactionField::Number),
            'P' => Some(TransactionField::Payee),
            'M' => Some(TransactionField::Memo),
            'A' => Some(TransactionField::Address),
            'L' => Some(TransactionField::Category),
            'S' => Some(TransactionField::SplitCategory),
            'E' => Some(TransactionField::SplitMemo),
            'Y' => Some(TransactionField::Security),
            'Q' => Some(TransactionField::Quantity),
            'I' => Some(TransactionField::Price),
            '$' => Some(TransactionField::SplitAmount),
            '^' => Some(TransactionField::EndOfEntry),
            _ => None,
        }
    }
}

/// State shared by all sections during one read.
#[derive(Debug, Default)]
pub(crate) struct ParseContext {
    pub(crate) document: Document,

    /// Index of the account that transactions attach to.
    current_account: Option<usize>,

    /// Running balance of each account, parallel to `document.accounts`.
    balances: Vec<Amount>,
}

impl ParseContext {
    /// Appends a completed account and makes it current.
    fn add_account(&mut self, account: Account) {
        debug!("Account '{}' completed", account.name);
        self.document.accounts.push(account);
        self.balances.push(Amount::ZERO);
        self.current_account = Some(self.document.accounts.len() - 1);
    }

    /// Index of the current account, creating an unnamed one if none was declared.
    fn current_account_index(&mut self) -> usize {
        match self.current_account {
            Some(index) => index,
            None => {
                debug!("Transactions before any account, creating an unnamed account");
                self.document.accounts.push(Account::default());
                self.balances.push(Amount::ZERO);
                let index = self.document.accounts.len() - 1;
                self.current_account = Some(index);
                index
            }
        }
    }

    /// Attaches a completed transaction to the current account.
    ///
    /// Fails if the account balance or the document balance would overflow.
    fn add_transaction(&mut self, tx: Transaction, token: &Token, line: usize) -> Result<()> {
        let overflow = || QifError::AmountOverflow {
            line,
            text: token.raw.clone(),
        };

        let index = self.current_account_index();
        let balance = self.balances[index]
            .checked_add(tx.amount)
            .ok_or_else(overflow)?;
        let balances = self
            .balances
            .iter()
            .enumerate()
            .map(|(i, b)| if i == index { balance } else { *b });
        Amount::checked_sum(balances).ok_or_else(overflow)?;

        self.balances[index] = balance;
        self.document.accounts[index].transactions.push(tx);
        Ok(())
    }
}

/// Accumulates the records of one section kind.
pub(crate) trait SectionRecord {
    type Field: FieldCode;

    /// Applies one field line. `line` is the token's 1-based line number.
    fn apply(
        &mut self,
        field: Self::Field,
        token: &Token,
        line: usize,
        ctx: &mut ParseContext,
    ) -> Result<()>;

    /// Returns `true` if fields were read since the last end of entry.
    fn has_pending(&self) -> bool;
}

/// Reads field lines into `section` until a header or the end of input,
/// which is pushed back for the dispatcher.
pub(crate) async fn read_section<R, S>(
    tokens: &mut TokenStream<R>,
    section: &mut S,
    ctx: &mut ParseContext,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: SectionRecord,
{
    loop {
        let token = tokens.next().await?;
        if token.end_of_record {
            if section.has_pending() {
                debug!(
                    "Discarding unterminated record before line {}",
                    tokens.line()
                );
            }
            tokens.push(token);
            return Ok(());
        }

        let line = tokens.line();
        let field = token
            .code
            .and_then(<S::Field as FieldCode>::from_code)
            .ok_or_else(|| QifError::InvalidToken {
                line,
                text: token.raw.clone(),
            })?;
        section.apply(field, &token, line, ctx)?;
    }
}

/// Consumes field lines without interpreting them.
pub(crate) async fn skip_section<R>(tokens: &mut TokenStream<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let token = tokens.next().await?;
        if token.end_of_record {
            tokens.push(token);
            return Ok(());
        }
    }
}

fn amount(token: &Token, line: usize) -> Result<Amount> {
    token
        .value
        .parse()
        .map_err(|source| QifError::InvalidAmount {
            line,
            text: token.raw.clone(),
            source,
        })
}

fn date(token: &Token, line: usize) -> Result<NaiveDate> {
    parse_date(&token.value).ok_or_else(|| QifError::InvalidDate {
        line,
        text: token.raw.clone(),
    })
}

#[derive(Debug, Default)]
pub(crate) struct AccountSection {
    pending: Account,
    dirty: bool,
}

impl SectionRecord for AccountSection {
    type Field = AccountField;

    fn apply(
        &mut self,
        field: AccountField,
        token: &Token,
        line: usize,
        ctx: &mut ParseContext,
    ) -> Result<()> {
        let account = &mut self.pending;
        match field {
            AccountField::Name => account.name = token.value.clone(),
            AccountField::Type => account.account_type = token.value.clone(),
            AccountField::Description => account.description = token.value.clone(),
            AccountField::CreditLimit => account.credit_limit = Some(amount(token, line)?),
            AccountField::BalanceDate => account.statement_date = Some(date(token, line)?),
            AccountField::StatementBalance => {
                account.statement_balance = Some(amount(token, line)?)
            }
            AccountField::EndOfEntry => {
                ctx.add_account(mem::take(account));
                self.dirty = false;
                return Ok(());
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Default)]
pub(crate) struct CategorySection {
    pending: Category,
    dirty: bool,
}

impl SectionRecord for CategorySection {
    type Field = CategoryField;

    fn apply(
        &mut self,
        field: CategoryField,
        token: &Token,
        line: usize,
        ctx: &mut ParseContext,
    ) -> Result<()> {
        let category = &mut self.pending;
        match field {
            CategoryField::Name => category.name = token.value.clone(),
            CategoryField::Description => category.description = token.value.clone(),
            CategoryField::TaxRelated => category.tax_related = true,
            CategoryField::Income => category.is_income = true,
            CategoryField::Expense => category.is_income = false,
            CategoryField::Budget => category.budget = Some(amount(token, line)?),
            CategoryField::TaxSchedule => category.tax_schedule = token.value.clone(),
            CategoryField::EndOfEntry => {
                ctx.document.categories.push(mem::take(category));
                self.dirty = false;
                return Ok(());
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Default)]
pub(crate) struct TagSection {
    pending: Tag,
    dirty: bool,
}

impl SectionRecord for TagSection {
    type Field = TagField;

    fn apply(
        &mut self,
        field: TagField,
        token: &Token,
        _line: usize,
        ctx: &mut ParseContext,
    ) -> Result<()> {
        match field {
            TagField::Name => {
                self.pending.name = token.value.clone();
                self.dirty = true;
            }
            TagField::EndOfEntry => {
                ctx.document.tags.push(mem::take(&mut self.pending));
                self.dirty = false;
            }
        }
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.dirty
    }
}

#[derive(Debug, Default)]
pub(crate) struct TransactionSection {
    pending: Transaction,
    split: Split,
    /// Running sum of the pending transaction's splits.
    split_total: Amount,
    dirty: bool,
}

impl SectionRecord for TransactionSection {
    type Field = TransactionField;

    fn apply(
        &mut self,
        field: TransactionField,
        token: &Token,
        line: usize,
        ctx: &mut ParseContext,
    ) -> Result<()> {
        let tx = &mut self.pending;
        match field {
            TransactionField::Date => tx.date = Some(date(token, line)?),
            TransactionField::Undocumented => tx.undocumented = Some(amount(token, line)?),
            TransactionField::Amount => tx.amount = amount(token, line)?,
            TransactionField::Cleared => tx.cleared = token.value.chars().next(),
            TransactionField::Number => tx.number = token.value.clone(),
            TransactionField::Payee => tx.payee = token.value.clone(),
            TransactionField::Memo => tx.memo = token.value.clone(),
            TransactionField::Address => tx.add_address_line(&token.value),
            TransactionField::Category => tx.category = token.value.clone(),
            TransactionField::SplitCategory => self.split.category = token.value.clone(),
            TransactionField::SplitMemo => self.split.memo = token.value.clone(),
            TransactionField::Security => tx.security = Some(token.value.clone()),
            TransactionField::Quantity => tx.quantity = Some(amount(token, line)?),
            TransactionField::Price => tx.price = Some(amount(token, line)?),
            TransactionField::SplitAmount => {
                self.split.amount = amount(token, line)?;
                self.split_total = self
                    .split_total
                    .checked_add(self.split.amount)
                    .ok_or_else(|| QifError::AmountOverflow {
                        line,
                        text: token.raw.clone(),
                    })?;
                tx.splits.push(mem::take(&mut self.split));
            }
            TransactionField::EndOfEntry => {
                if self.split != Split::default() {
                    debug!("Discarding split without an amount before line {}", line);
                }
                let tx = mem::take(tx);
                self.split = Split::default();
                self.split_total = Amount::ZERO;
                self.dirty = false;
                if !tx.is_balanced() {
                    return Err(QifError::SplitMismatch {
                        line,
                        amount: tx.amount,
                        splits: tx.balance(),
                    });
                }
                return ctx.add_transaction(tx, token, line);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.dirty
    }
}
