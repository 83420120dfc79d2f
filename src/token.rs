//! Line tokenizer and the lookahead token stream.
//!
//! Every QIF line is one token: a field code character followed by its value.
//! Header lines (`!Type:Bank`, `!Account`, ...) end whatever record run came
//! before them; running out of lines ends the input.

use crate::cancel::CancelToken;
use crate::error::{QifError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Field code that introduces a section header line.
pub const HEADER_MARKER: char = '!';

/// Field code that ends the record currently being accumulated.
pub const END_OF_ENTRY: char = '^';

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Leading character of the line. `None` at end of input.
    pub code: Option<char>,

    /// Remainder of the line with surrounding whitespace trimmed.
    pub value: String,

    /// The line as read, without its line terminator.
    pub raw: String,

    /// Set for header lines and at end of input.
    pub end_of_record: bool,

    /// Set once the source has no more lines.
    pub end_of_input: bool,
}

impl Token {
    /// The sentinel produced when the input is exhausted.
    pub fn end_of_input() -> Self {
        Token {
            code: None,
            value: String::new(),
            raw: String::new(),
            end_of_record: true,
            end_of_input: true,
        }
    }

    /// Returns `true` if this token is a section header line.
    pub fn is_header(&self) -> bool {
        self.code == Some(HEADER_MARKER)
    }
}

/// Converts one line (or its absence) into a token.
///
/// A missing or empty line is the end of input. Any other line, even one
/// of only spaces, takes its first character as the field code.
pub fn tokenize(line: Option<&str>) -> Token {
    let raw = match line {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Token::end_of_input(),
    };

    let mut chars = raw.chars();
    let code = chars.next();
    let value = chars.as_str().trim().to_string();

    Token {
        code,
        value,
        raw: raw.to_string(),
        end_of_record: code == Some(HEADER_MARKER),
        end_of_input: false,
    }
}

/// Tokens pulled line by line from an async source, with pushback.
///
/// Pushed-back tokens are returned before any new line is read, last pushed
/// first. The line counter always names the line of the most recently
/// returned token, so pushing back rewinds it by one.
pub struct TokenStream<R> {
    source: R,
    pushed: Vec<Token>,
    line: usize,
    buffer: String,
    cancel: Option<CancelToken>,
}

impl<R: AsyncBufRead + Unpin> TokenStream<R> {
    /// Creates a stream positioned before the first line of `source`.
    pub fn new(source: R) -> Self {
        TokenStream {
            source,
            pushed: Vec::new(),
            line: 0,
            buffer: String::new(),
            cancel: None,
        }
    }

    /// Makes every subsequent read check `cancel` first.
    pub fn with_cancellation(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// 1-based line number of the last token returned, 0 before the first read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Hands a token back so the next read returns it again.
    pub fn push(&mut self, token: Token) {
        self.line = self.line.saturating_sub(1);
        self.pushed.push(token);
    }

    /// Returns the next token, reading a new line only when nothing was pushed back.
    pub async fn next(&mut self) -> Result<Token> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(QifError::Cancelled {
                line: self.line + 1,
            });
        }

        if let Some(token) = self.pushed.pop() {
            self.line += 1;
            return Ok(token);
        }

        self.buffer.clear();
        let read = self.source.read_line(&mut self.buffer).await?;
        self.line += 1;
        if read == 0 {
            return Ok(tokenize(None));
        }

        let mut text = self.buffer.trim_end_matches(&['\r', '\n'][..]);
        if self.line == 1 {
            text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        }
        Ok(tokenize(Some(text)))
    }

    /// Gives back the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_field_line() {
        let token = tokenize(Some("PCity Power  "));
        assert_eq!(token.code, Some('P'));
        assert_eq!(token.value, "City Power");
        assert_eq!(token.raw, "PCity Power  ");
        assert!(!token.end_of_record);
        assert!(!token.end_of_input);
    }

    #[test]
    fn test_tokenize_header_ends_record() {
        let token = tokenize(Some("!Type:Bank"));
        assert!(token.is_header());
        assert_eq!(token.value, "Type:Bank");
        assert!(token.end_of_record);
        assert!(!token.end_of_input);
    }

    #[test]
    fn test_tokenize_missing_or_empty_line_ends_input() {
        for line in [None, Some("")] {
            let token = tokenize(line);
            assert!(token.end_of_input);
            assert!(token.end_of_record);
            assert_eq!(token.code, None);
            assert!(token.value.is_empty());
        }
    }

    #[test]
    fn test_tokenize_whitespace_line_is_a_field() {
        let token = tokenize(Some("   "));
        assert_eq!(token.code, Some(' '));
        assert!(token.value.is_empty());
        assert!(!token.end_of_record);
        assert!(!token.end_of_input);
    }

    #[test]
    fn test_tokenize_end_of_entry() {
        let token = tokenize(Some("^"));
        assert_eq!(token.code, Some(END_OF_ENTRY));
        assert!(token.value.is_empty());
        assert!(!token.end_of_record);
    }

    #[tokio::test]
    async fn test_stream_counts_lines() {
        let mut tokens = TokenStream::new("!Account\r\nNChecking\r\n^\r\n".as_bytes());

        assert!(tokens.next().await.unwrap().is_header());
        assert_eq!(tokens.line(), 1);
        assert_eq!(tokens.next().await.unwrap().value, "Checking");
        assert_eq!(tokens.line(), 2);
        assert_eq!(tokens.next().await.unwrap().code, Some('^'));
        assert_eq!(tokens.line(), 3);
        assert!(tokens.next().await.unwrap().end_of_input);
        assert_eq!(tokens.line(), 4);
    }

    #[tokio::test]
    async fn test_pushback_rereads_identical_token() {
        let mut tokens = TokenStream::new("NFirst\nNSecond\n".as_bytes());
        tokens.next().await.unwrap();

        let second = tokens.next().await.unwrap();
        let line = tokens.line();
        tokens.push(second.clone());
        assert_eq!(tokens.line(), line - 1);

        let again = tokens.next().await.unwrap();
        assert_eq!(again, second);
        assert_eq!(tokens.line(), line);
    }

    #[tokio::test]
    async fn test_nested_pushback_is_last_in_first_out() {
        let mut tokens = TokenStream::new("NOne\nNTwo\n".as_bytes());
        let one = tokens.next().await.unwrap();
        let two = tokens.next().await.unwrap();

        tokens.push(two.clone());
        tokens.push(one.clone());
        assert_eq!(tokens.line(), 0);

        assert_eq!(tokens.next().await.unwrap(), one);
        assert_eq!(tokens.next().await.unwrap(), two);
        assert_eq!(tokens.line(), 2);
    }

    #[tokio::test]
    async fn test_strips_byte_order_mark() {
        let mut tokens = TokenStream::new("\u{feff}!Type:Cat\n".as_bytes());
        let token = tokens.next().await.unwrap();
        assert!(token.is_header());
        assert_eq!(token.value, "Type:Cat");
    }

    #[tokio::test]
    async fn test_cancelled_before_read() {
        let cancel = CancelToken::new();
        let mut tokens = TokenStream::new("NOne\n".as_bytes()).with_cancellation(cancel.clone());

        cancel.cancel();
        let err = tokens.next().await.unwrap_err();
        assert!(matches!(err, QifError::Cancelled { line: 1 }));
    }
}
