//! Top-level QIF reader.
//!
//! The reader only ever expects header lines at the top level. Each header
//! selects a section reader, which runs until the next header or the end of
//! input and hands that line back. Any failure aborts the read and the
//! partial document is dropped.

use crate::cancel::CancelToken;
use crate::document::Document;
use crate::error::{QifError, Result};
use crate::section::{
    read_section, skip_section, AccountSection, CategorySection, ParseContext, TagSection,
    TransactionSection,
};
use crate::token::TokenStream;
use log::debug;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

/// What a header line announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Accounts,
    Categories,
    Tags,
    Transactions,
    /// Informational headers whose contents are skipped.
    Ignored,
    /// Recognized but not implemented: class and memorized-transaction lists.
    Unsupported,
}

impl SectionKind {
    /// Classifies a header value (the text after `!`), ignoring case.
    ///
    /// Returns `None` for headers that are not part of the format.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim().to_lowercase();
        match header.as_str() {
            "account" => Some(SectionKind::Accounts),
            "type:cat" => Some(SectionKind::Categories),
            "type:tag" => Some(SectionKind::Tags),
            "type:bank" | "type:cash" | "type:ccard" | "type:invst" | "type:oth a"
            | "type:oth l" => Some(SectionKind::Transactions),
            "type:class" | "type:memorized" => Some(SectionKind::Unsupported),
            "option:autoswitch" | "clear:autoswitch" => Some(SectionKind::Ignored),
            other if other.starts_with("type:") => Some(SectionKind::Transactions),
            _ => None,
        }
    }
}

/// Reads a whole QIF document from an async line source.
///
/// The reader owns whatever it is given. Pass `&mut source` to keep
/// ownership of a source, which then stays open after the reader is gone.
///
/// # Example
///
/// ```no_run
/// use qif_reader::QifReader;
///
/// # async fn run() -> qif_reader::Result<()> {
/// let document = QifReader::open("export.qif").await?.read_document().await?;
/// println!("Total balance: {}", document.balance());
/// # Ok(())
/// # }
/// ```
pub struct QifReader<R> {
    tokens: TokenStream<R>,
}

impl QifReader<BufReader<File>> {
    /// Opens the file at `path`. The file is closed when the reader is dropped.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).await?;
        debug!("Opened {}", path.as_ref().display());
        Ok(QifReader::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> QifReader<R> {
    /// Creates a reader over an already-open source.
    pub fn new(source: R) -> Self {
        QifReader {
            tokens: TokenStream::new(source),
        }
    }

    /// Checks `cancel` before every line read.
    pub fn with_cancellation(self, cancel: CancelToken) -> Self {
        QifReader {
            tokens: self.tokens.with_cancellation(cancel),
        }
    }

    /// Gives back the source without reading from it.
    pub fn into_inner(self) -> R {
        self.tokens.into_inner()
    }

    /// Reads every section until the end of input.
    ///
    /// Consumes the reader: after a failure or cancellation it cannot be
    /// resumed.
    pub async fn read_document(mut self) -> Result<Document> {
        let mut ctx = ParseContext::default();

        loop {
            let token = self.tokens.next().await?;
            if token.end_of_input {
                break;
            }

            let line = self.tokens.line();
            if !token.is_header() {
                return Err(QifError::InvalidToken {
                    line,
                    text: token.raw,
                });
            }

            let kind = SectionKind::from_header(&token.value).ok_or_else(|| {
                QifError::InvalidToken {
                    line,
                    text: token.raw.clone(),
                }
            })?;
            debug!("Line {}: {:?} section '{}'", line, kind, token.value);

            let tokens = &mut self.tokens;
            match kind {
                SectionKind::Accounts => {
                    read_section(tokens, &mut AccountSection::default(), &mut ctx).await?
                }
                SectionKind::Categories => {
                    read_section(tokens, &mut CategorySection::default(), &mut ctx).await?
                }
                SectionKind::Tags => {
                    read_section(tokens, &mut TagSection::default(), &mut ctx).await?
                }
                SectionKind::Transactions => {
                    read_section(tokens, &mut TransactionSection::default(), &mut ctx).await?
                }
                SectionKind::Ignored => skip_section(tokens).await?,
                SectionKind::Unsupported => {
                    return Err(QifError::Unsupported {
                        line,
                        text: token.raw,
                    })
                }
            }
        }

        debug!(
            "Read {} accounts, {} categories, {} tags",
            ctx.document.accounts().len(),
            ctx.document.categories().len(),
            ctx.document.tags().len()
        );
        Ok(ctx.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn read_str(input: &str) -> Result<Document> {
        QifReader::new(input.as_bytes()).read_document().await
    }

    #[test]
    fn test_header_classification() {
        assert_eq!(SectionKind::from_header("Account"), Some(SectionKind::Accounts));
        assert_eq!(SectionKind::from_header("TYPE:CAT"), Some(SectionKind::Categories));
        assert_eq!(SectionKind::from_header("Type:Tag"), Some(SectionKind::Tags));
        assert_eq!(SectionKind::from_header("Type:Oth L"), Some(SectionKind::Transactions));
        assert_eq!(SectionKind::from_header("Type:Invoice"), Some(SectionKind::Transactions));
        assert_eq!(SectionKind::from_header("Type:Memorized"), Some(SectionKind::Unsupported));
        assert_eq!(SectionKind::from_header("Option:AutoSwitch"), Some(SectionKind::Ignored));
        assert_eq!(SectionKind::from_header("Clear:AutoSwitch"), Some(SectionKind::Ignored));
        assert_eq!(SectionKind::from_header("Accounts"), None);
        assert_eq!(SectionKind::from_header(""), None);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let document = read_str("").await.unwrap();
        assert_eq!(document, Document::default());
    }

    #[tokio::test]
    async fn test_field_line_at_top_level_is_invalid() {
        let err = read_str("NChecking\n^\n").await.unwrap_err();
        assert!(matches!(err, QifError::InvalidToken { line: 1, .. }));
    }

    #[tokio::test]
    async fn test_unknown_header_is_invalid() {
        let err = read_str("!Type:Cat\nNFood\n^\n!Bogus\n").await.unwrap_err();
        match err {
            QifError::InvalidToken { line, text } => {
                assert_eq!(line, 4);
                assert_eq!(text, "!Bogus");
            }
            other => panic!("Expected InvalidToken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsupported_header() {
        let err = read_str("!Type:Class\nNWork\n^\n").await.unwrap_err();
        assert!(matches!(err, QifError::Unsupported { line: 1, .. }));
    }

    #[tokio::test]
    async fn test_ignored_headers_are_skipped() {
        let input = "!Option:AutoSwitch\n!Account\nNChecking\nTBank\n^\n!Clear:AutoSwitch\n";
        let document = read_str(input).await.unwrap();
        assert_eq!(document.accounts().len(), 1);
        assert_eq!(document.accounts()[0].name, "Checking");
    }

    #[tokio::test]
    async fn test_borrowed_source_stays_usable() {
        let mut source: &[u8] = b"!Type:Tag\nNVacation\n^\n";
        let document = QifReader::new(&mut source).read_document().await.unwrap();
        assert_eq!(document.tags().len(), 1);

        let mut rest = String::new();
        source.read_to_string(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_stops_reading() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = QifReader::new("!Type:Tag\nNVacation\n^\n".as_bytes())
            .with_cancellation(cancel)
            .read_document()
            .await
            .unwrap_err();
        assert!(matches!(err, QifError::Cancelled { line: 1 }));
    }
}
