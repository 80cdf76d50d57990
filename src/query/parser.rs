use crate::index::types::Section;

/// Parsed query representation
#[derive(Debug, Clone)]
pub struct Query {
    pub terms: Vec<TermNode>,
    pub filters: QueryFilters,
    pub options: QueryOptions,
}

/// One term of a query; all terms must hold for a record to match
#[derive(Debug, Clone, PartialEq)]
pub enum TermNode {
    /// Case-insensitive substring/prefix match on the symbol name
    Literal(String),
    /// Exact name match (quoted)
    Exact(String),
    /// Regex over the symbol name (`re:/pattern/`)
    Regex(String),
    /// Exclusion (`-term`)
    Not(String),
}

/// Query filters
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    /// Section filter (`section:functions`)
    pub section: Option<Section>,
    /// Page glob over decoded page names (`page:*.hpp`)
    pub page: Option<String>,
    /// Label substring filter (`label:noexcept`)
    pub label: Option<String>,
}

impl QueryFilters {
    /// Check if any filter is set
    pub fn has_any(&self) -> bool {
        self.section.is_some() || self.page.is_some() || self.label.is_some()
    }
}

/// Query options
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub sort: SortOrder,
    /// Maximum results; 0 means unlimited
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Score,
            limit: 50,
        }
    }
}

/// Sort order for results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Score,
    Name,
    Hits,
}

/// Parse a query string into a Query structure
pub fn parse_query(input: &str) -> Query {
    let mut parser = QueryParser::new(input);
    parser.parse()
}

/// Query parser
struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
    terms: Vec<TermNode>,
    filters: QueryFilters,
    options: QueryOptions,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            terms: Vec::new(),
            filters: QueryFilters::default(),
            options: QueryOptions::default(),
        }
    }

    fn parse(mut self) -> Query {
        loop {
            self.skip_whitespace();
            if self.is_eof() {
                break;
            }
            self.parse_item();
        }

        Query {
            terms: self.terms,
            filters: self.filters,
            options: self.options,
        }
    }

    fn parse_item(&mut self) {
        if self.peek_char() == Some('"') {
            let phrase = self.parse_quoted();
            if !phrase.is_empty() {
                self.terms.push(TermNode::Exact(phrase));
            }
            return;
        }

        if self.consume_char('-') {
            let word = self.parse_word();
            if !word.is_empty() {
                self.terms.push(TermNode::Not(word));
            }
            return;
        }

        if self.remaining().starts_with("re:/") {
            self.pos += 4;
            let start = self.pos;
            while !self.is_eof() && self.peek_char() != Some('/') {
                self.advance();
            }
            let pattern = self.input[start..self.pos].to_string();
            self.consume_char('/');
            if !pattern.is_empty() {
                self.terms.push(TermNode::Regex(pattern));
            }
            return;
        }

        let word = self.parse_word();
        if word.is_empty() {
            // Stray punctuation; skip one char so the loop advances
            self.advance();
            return;
        }

        match word.split_once(':') {
            Some((field, value)) if !value.is_empty() => self.parse_field(field, value),
            _ => self.terms.push(TermNode::Literal(word)),
        }
    }

    fn parse_field(&mut self, field: &str, value: &str) {
        match field.to_lowercase().as_str() {
            "section" | "kind" => match Section::parse(&value.to_lowercase()) {
                Some(section) => self.filters.section = Some(section),
                // Unknown section names never match anything; keep the
                // term so the user sees zero results rather than all
                None => self.terms.push(TermNode::Literal(format!("{}:{}", field, value))),
            },
            "page" | "file" => {
                self.filters.page = Some(value.to_string());
            }
            "label" => {
                self.filters.label = Some(value.to_string());
            }
            "sort" => {
                self.options.sort = match value.to_lowercase().as_str() {
                    "name" => SortOrder::Name,
                    "hits" | "overloads" => SortOrder::Hits,
                    _ => SortOrder::Score,
                };
            }
            "top" | "limit" => {
                if let Ok(n) = value.parse() {
                    self.options.limit = n;
                }
            }
            _ => {
                // Unknown field, treat as literal
                self.terms
                    .push(TermNode::Literal(format!("{}:{}", field, value)));
            }
        }
    }

    fn parse_quoted(&mut self) -> String {
        self.consume_char('"');
        let start = self.pos;
        while !self.is_eof() && self.peek_char() != Some('"') {
            self.advance();
        }
        let phrase = self.input[start..self.pos].to_string();
        self.consume_char('"');
        phrase
    }

    fn parse_word(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
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
}

impl Query {
    /// Check if query is empty (no search term AND no filters)
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && !self.filters.has_any()
    }
}
