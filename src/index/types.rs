use crate::utils::slug::{PageName, decode_page};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Index section, taken from the shard file name stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    All,
    Classes,
    Namespaces,
    Files,
    Functions,
    Variables,
    Typedefs,
    Enums,
    EnumValues,
    Defines,
    Groups,
    Pages,
    Related,
    Properties,
    Events,
}

impl Section {
    pub const ALL: [Section; 15] = [
        Section::All,
        Section::Classes,
        Section::Namespaces,
        Section::Files,
        Section::Functions,
        Section::Variables,
        Section::Typedefs,
        Section::Enums,
        Section::EnumValues,
        Section::Defines,
        Section::Groups,
        Section::Pages,
        Section::Related,
        Section::Properties,
        Section::Events,
    ];

    /// Section name as used in shard file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Classes => "classes",
            Section::Namespaces => "namespaces",
            Section::Files => "files",
            Section::Functions => "functions",
            Section::Variables => "variables",
            Section::Typedefs => "typedefs",
            Section::Enums => "enums",
            Section::EnumValues => "enumvalues",
            Section::Defines => "defines",
            Section::Groups => "groups",
            Section::Pages => "pages",
            Section::Related => "related",
            Section::Properties => "properties",
            Section::Events => "events",
        }
    }

    pub fn parse(name: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link target of one occurrence: page file plus intra-page anchor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target {
    /// Page file name relative to the documentation root (`address_8hpp.html`)
    pub page: String,
    /// Fragment identifier without the `#` (`a3f005dedb5a8205580b09c8382157374`)
    pub anchor: String,
}

impl Target {
    #[allow(dead_code)]
    pub fn new(page: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            anchor: anchor.into(),
        }
    }

    /// Parse a relative URL as found in shard files (`../page.html#anchor`)
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.strip_prefix("../").unwrap_or(url);
        match trimmed.split_once('#') {
            Some((page, anchor)) => Self::new(page, anchor),
            None => Self::new(trimmed, ""),
        }
    }

    /// Render back to the relative URL form used in shard files
    pub fn to_url(&self) -> String {
        if self.anchor.is_empty() {
            format!("../{}", self.page)
        } else {
            format!("../{}#{}", self.page, self.anchor)
        }
    }

    /// Decode the page file name into kind + display name
    pub fn page_name(&self) -> PageName {
        decode_page(&self.page)
    }

    /// Whether the anchor has the generator's shape: `a` or `ga`
    /// followed by 32 hex digits.
    pub fn has_canonical_anchor(&self) -> bool {
        let hex = self
            .anchor
            .strip_prefix("ga")
            .or_else(|| self.anchor.strip_prefix('a'))
            .unwrap_or("");
        hex.len() == 32 && hex.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

/// One definition site of a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub target: Target,
    /// Qualified signature label shown in the search dropdown,
    /// with HTML entities already decoded
    pub label: String,
    /// True when the hit opens in the main window (the `1` field)
    pub main_window: bool,
}

impl Occurrence {
    #[allow(dead_code)]
    pub fn new(target: Target, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
            main_window: true,
        }
    }
}

/// A search record: one key with its display name and all definition sites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Escaped lookup key (`make_5faddress`)
    pub key: String,
    /// Human-readable symbol name (`make_address`)
    pub name: String,
    /// Definition sites, one per overload; never empty in a valid index
    pub occurrences: Vec<Occurrence>,
}

impl SearchRecord {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            occurrences: Vec::new(),
        }
    }
}

/// One shard file: a section, its hex id, and its records in file order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shard {
    pub section: Section,
    /// Hex token from the file name (`b` in `functions_b.js`)
    pub id: String,
    pub records: Vec<SearchRecord>,
}

impl Shard {
    #[allow(dead_code)]
    pub fn new(section: Section, id: impl Into<String>) -> Self {
        Self {
            section,
            id: id.into(),
            records: Vec::new(),
        }
    }

    /// Shard file name (`functions_b.js`)
    pub fn file_name(&self) -> String {
        format!("{}_{}.js", self.section.as_str(), self.id)
    }

    /// Parse a shard file name into section and id
    pub fn parse_file_name(name: &str) -> Option<(Section, String)> {
        let stem = name.strip_suffix(".js")?;
        let (section, id) = stem.rsplit_once('_')?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some((Section::parse(section)?, id.to_string()))
    }
}

/// Position of a record within a loaded index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRef {
    pub shard: usize,
    pub record: usize,
}

/// A fully loaded search index: every shard of one `search/` directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Directory the index was loaded from (empty for built indexes)
    pub source: PathBuf,
    pub shards: Vec<Shard>,
}

impl SearchIndex {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            shards: Vec::new(),
        }
    }

    /// Iterate all records across shards, with their positions
    pub fn records(&self) -> impl Iterator<Item = (RecordRef, &SearchRecord)> {
        self.shards.iter().enumerate().flat_map(|(si, shard)| {
            shard
                .records
                .iter()
                .enumerate()
                .map(move |(ri, record)| (RecordRef { shard: si, record: ri }, record))
        })
    }

    pub fn record(&self, r: RecordRef) -> &SearchRecord {
        &self.shards[r.shard].records[r.record]
    }

    pub fn shard_of(&self, r: RecordRef) -> &Shard {
        &self.shards[r.shard]
    }

    pub fn record_count(&self) -> usize {
        self.shards.iter().map(|s| s.records.len()).sum()
    }

    pub fn occurrence_count(&self) -> usize {
        self.shards
            .iter()
            .flat_map(|s| &s.records)
            .map(|r| r.occurrences.len())
            .sum()
    }

    /// Exact-key lookup map: (section, key) -> record position.
    /// Later shards win on duplicates; validate reports those.
    pub fn key_map(&self) -> FxHashMap<(Section, &str), RecordRef> {
        let mut map = FxHashMap::default();
        for (r, record) in self.records() {
            map.insert((self.shard_of(r).section, record.key.as_str()), r);
        }
        map
    }
}
