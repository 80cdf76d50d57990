use crate::index::types::{Occurrence, SearchRecord, Target};
use crate::utils::entities::decode_entities;
use std::fmt;

/// Parse error with position information into the shard source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse the contents of one shard file (`var searchData=[...];`)
pub fn parse_shard_source(input: &str) -> Result<Vec<SearchRecord>, ParseError> {
    let mut parser = ShardParser::new(input);
    parser.parse()
}

/// Cursor parser over the generated array literal
struct ShardParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ShardParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Vec<SearchRecord>, ParseError> {
        self.skip_whitespace();
        self.expect_keyword("var")?;
        self.skip_whitespace();
        self.expect_keyword("searchData")?;
        self.skip_whitespace();
        self.expect_char('=')?;
        self.skip_whitespace();
        self.expect_char('[')?;

        let mut records = Vec::new();

        loop {
            self.skip_whitespace();
            if self.consume_char(']') {
                break;
            }

            records.push(self.parse_record()?);

            self.skip_whitespace();
            if !self.consume_char(',') {
                self.skip_whitespace();
                self.expect_char(']')?;
                break;
            }
        }

        self.skip_whitespace();
        self.consume_char(';');
        self.skip_whitespace();

        if !self.is_eof() {
            return Err(self.error("trailing content after searchData array"));
        }

        Ok(records)
    }

    /// `['key',['name',<occurrence>,...]]`
    fn parse_record(&mut self) -> Result<SearchRecord, ParseError> {
        self.expect_char('[')?;
        self.skip_whitespace();

        let key = self.parse_string()?;
        if key.is_empty() {
            return Err(self.error("record key is empty"));
        }

        self.skip_whitespace();
        self.expect_char(',')?;
        self.skip_whitespace();
        self.expect_char('[')?;
        self.skip_whitespace();

        let name = decode_entities(&self.parse_string()?);
        let mut record = SearchRecord::new(key, name);

        loop {
            self.skip_whitespace();
            if self.consume_char(']') {
                break;
            }
            self.expect_char(',')?;
            self.skip_whitespace();
            record.occurrences.push(self.parse_occurrence()?);
        }

        self.skip_whitespace();
        self.expect_char(']')?;

        if record.occurrences.is_empty() {
            return Err(self.error(format!("record '{}' has no occurrences", record.key)));
        }

        Ok(record)
    }

    /// `['url',1,'label']`
    fn parse_occurrence(&mut self) -> Result<Occurrence, ParseError> {
        self.expect_char('[')?;
        self.skip_whitespace();

        let url = self.parse_string()?;
        if url.is_empty() {
            return Err(self.error("occurrence URL is empty"));
        }

        self.skip_whitespace();
        self.expect_char(',')?;
        self.skip_whitespace();

        let flag = self.parse_integer()?;

        self.skip_whitespace();
        self.expect_char(',')?;
        self.skip_whitespace();

        let label = decode_entities(&self.parse_string()?);

        self.skip_whitespace();
        self.expect_char(']')?;

        Ok(Occurrence {
            target: Target::from_url(&url),
            label,
            main_window: flag != 0,
        })
    }

    /// Single-quoted string with `\'` and `\\` escapes
    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect_char('\'')?;

        let mut value = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.error("unterminated string")),
                Some('\'') => {
                    self.advance();
                    return Ok(value);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some(escaped @ ('\'' | '\\')) => {
                            value.push(escaped);
                            self.advance();
                        }
                        Some(other) => {
                            // Unknown escape: keep it verbatim
                            value.push('\\');
                            value.push(other);
                            self.advance();
                        }
                        None => return Err(self.error("unterminated string escape")),
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn parse_integer(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        while self
            .peek_char()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
        {
            self.advance();
        }

        if start == self.pos {
            return Err(self.error("expected integer"));
        }

        self.input[start..self.pos]
            .parse()
            .map_err(|_| self.error("integer out of range"))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.remaining().starts_with(keyword) {
            self.pos += keyword.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", keyword)))
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        if self.consume_char(expected) {
            Ok(())
        } else {
            match self.peek_char() {
                Some(found) => Err(self.error(format!("expected '{}', found '{}'", expected, found))),
                None => Err(self.error(format!("expected '{}', found end of input", expected))),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek_char()
            .map(|c| c.is_whitespace())
            .unwrap_or(false)
        {
            self.advance();
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map(|nl| consumed.len() - nl)
            .unwrap_or(consumed.len() + 1);

        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}
