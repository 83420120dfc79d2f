//! # QIF Reader
//!
//! A streaming reader for Quicken Interchange Format (QIF) files. It turns
//! the line-oriented text into a [`Document`] of accounts (with their
//! transactions and splits), categories and tags.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: Amounts use `rust_decimal`, never floating point
//! - **Streaming input**: Lines are read one at a time from any async source
//! - **Strict invariants**: Split amounts must add up to their transaction,
//!   checked while reading
//! - **Fail fast**: The first structural, value or invariant error aborts the
//!   read with its line number
//!
//! ## Example
//!
//! ```
//! use qif_reader::QifReader;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> qif_reader::Result<()> {
//! let qif = "!Type:Bank\nD1/5'06\nT-500.00\nPRent Co\n^\n";
//! let document = QifReader::new(qif.as_bytes()).read_document().await?;
//! assert_eq!(document.balance().to_string(), "-500.00");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod amount;
pub mod cancel;
pub mod category;
pub mod date;
pub mod document;
pub mod error;
pub mod reader;
pub mod section;
pub mod token;
pub mod transaction;

pub use account::Account;
pub use amount::Amount;
pub use cancel::CancelToken;
pub use category::{Category, Tag};
pub use document::Document;
pub use error::{QifError, Result};
pub use reader::{QifReader, SectionKind};
pub use token::{Token, TokenStream};
pub use transaction::{Split, Transaction};
