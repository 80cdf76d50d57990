use crate::index::types::{RecordRef, SearchIndex, SearchRecord, Section};
use crate::query::parser::{Query, SortOrder, TermNode};
use crate::query::scorer::{MatchKind, ScoreContext, Scorer, ScoringWeights};
use anyhow::{Context, Result};
use globset::Glob;
use regex::RegexBuilder;

/// One query hit: a record plus how and how well it matched
#[derive(Debug, Clone)]
pub struct SymbolMatch<'a> {
    pub section: Section,
    pub record: &'a SearchRecord,
    pub kind: MatchKind,
    pub score: f32,
}

/// Query executor over a loaded index
pub struct QueryExecutor<'a> {
    index: &'a SearchIndex,
    scorer: Scorer,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            scorer: Scorer::with_defaults(),
        }
    }

    /// Create executor with custom scoring weights
    #[allow(dead_code)]
    pub fn with_scoring_weights(index: &'a SearchIndex, weights: ScoringWeights) -> Self {
        Self {
            index,
            scorer: Scorer::new(weights),
        }
    }

    /// Execute a query and return ranked matches
    pub fn execute(&self, query: &Query) -> Result<Vec<SymbolMatch<'a>>> {
        let regexes = compile_regexes(&query.terms)?;
        let page_matcher = match &query.filters.page {
            Some(pattern) => Some(
                Glob::new(pattern)
                    .with_context(|| format!("invalid page glob '{}'", pattern))?
                    .compile_matcher(),
            ),
            None => None,
        };

        // The `all` section duplicates every per-kind entry; search it
        // only when it is the sole section present or explicitly asked for
        let has_specific = self
            .index
            .shards
            .iter()
            .any(|s| s.section != Section::All);

        let mut matches = Vec::new();

        for (r, record) in self.index.records() {
            let section = self.index.shard_of(r).section;

            if let Some(wanted) = query.filters.section {
                if section != wanted {
                    continue;
                }
            } else if section == Section::All && has_specific {
                continue;
            }

            let Some(kind) = self.match_terms(record, &query.terms, &regexes) else {
                continue;
            };

            if !self.passes_filters(record, query, page_matcher.as_ref()) {
                continue;
            }

            let score = self.score(record, &query.terms, kind);
            matches.push(SymbolMatch {
                section,
                record: self.index.record(r),
                kind,
                score,
            });
        }

        sort_matches(&mut matches, query.options.sort);
        if query.options.limit > 0 {
            matches.truncate(query.options.limit);
        }

        Ok(matches)
    }

    /// Check every term against the record name; returns the strongest
    /// match kind, or None when any term fails.
    fn match_terms(
        &self,
        record: &SearchRecord,
        terms: &[TermNode],
        regexes: &[regex::Regex],
    ) -> Option<MatchKind> {
        let name = record.name.to_lowercase();
        let mut best: Option<MatchKind> = None;
        let mut regex_index = 0;

        for term in terms {
            let kind = match term {
                TermNode::Literal(text) => {
                    let text = text.to_lowercase();
                    if name == text {
                        MatchKind::Exact
                    } else if name.starts_with(&text) {
                        MatchKind::Prefix
                    } else if name.contains(&text) {
                        MatchKind::Substring
                    } else {
                        return None;
                    }
                }
                TermNode::Exact(text) => {
                    if name == text.to_lowercase() {
                        MatchKind::Exact
                    } else {
                        return None;
                    }
                }
                TermNode::Regex(_) => {
                    let regex = &regexes[regex_index];
                    regex_index += 1;
                    if regex.is_match(&record.name) {
                        MatchKind::Regex
                    } else {
                        return None;
                    }
                }
                TermNode::Not(text) => {
                    if name.contains(&text.to_lowercase()) {
                        return None;
                    }
                    continue;
                }
            };

            best = Some(best.map_or(kind, |b| b.max(kind)));
        }

        // Filter-only queries match every record
        if terms.iter().all(|t| matches!(t, TermNode::Not(_))) {
            best = Some(MatchKind::Substring);
        }

        best
    }

    fn passes_filters(
        &self,
        record: &SearchRecord,
        query: &Query,
        page_matcher: Option<&globset::GlobMatcher>,
    ) -> bool {
        if let Some(matcher) = page_matcher {
            let hit = record.occurrences.iter().any(|occ| {
                matcher.is_match(&occ.target.page)
                    || matcher.is_match(occ.target.page_name().name.as_str())
            });
            if !hit {
                return false;
            }
        }

        if let Some(label) = &query.filters.label {
            let label = label.to_lowercase();
            let hit = record
                .occurrences
                .iter()
                .any(|occ| occ.label.to_lowercase().contains(&label));
            if !hit {
                return false;
            }
        }

        true
    }

    fn score(&self, record: &SearchRecord, terms: &[TermNode], kind: MatchKind) -> f32 {
        let term_len = terms
            .iter()
            .filter_map(|t| match t {
                TermNode::Literal(text) | TermNode::Exact(text) => Some(text.len()),
                _ => None,
            })
            .max()
            .unwrap_or(record.name.len());

        self.scorer.score(&ScoreContext {
            kind: Some(kind),
            excess_chars: record.name.len().saturating_sub(term_len),
            occurrence_count: record.occurrences.len(),
        })
    }
}

/// Look up a record by exact key, the way the doc viewer resolves a hit
#[allow(dead_code)]
pub fn lookup_key<'a>(
    index: &'a SearchIndex,
    section: Section,
    key: &str,
) -> Option<(RecordRef, &'a SearchRecord)> {
    let map = index.key_map();
    let r = *map.get(&(section, key))?;
    Some((r, index.record(r)))
}

fn compile_regexes(terms: &[TermNode]) -> Result<Vec<regex::Regex>> {
    terms
        .iter()
        .filter_map(|t| match t {
            TermNode::Regex(pattern) => Some(pattern),
            _ => None,
        })
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("invalid regex '{}'", pattern))
        })
        .collect()
}

fn sort_matches(matches: &mut [SymbolMatch<'_>], sort: SortOrder) {
    match sort {
        SortOrder::Score => matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.record.name.cmp(&b.record.name))
        }),
        SortOrder::Name => matches.sort_by(|a, b| a.record.name.cmp(&b.record.name)),
        SortOrder::Hits => matches.sort_by(|a, b| {
            b.record
                .occurrences
                .len()
                .cmp(&a.record.occurrences.len())
                .then_with(|| a.record.name.cmp(&b.record.name))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{Occurrence, Shard, Target};
    use crate::query::parser::parse_query;

    fn sample_index() -> SearchIndex {
        let mut index = SearchIndex::default();

        let mut functions = Shard::new(Section::Functions, "0");
        for (key, name, pages) in [
            (
                "make_5faddress",
                "make_address",
                vec!["address_8hpp.html", "address_8hpp.html"],
            ),
            (
                "make_5faddress_5fv4",
                "make_address_v4",
                vec!["address__v4_8hpp.html"],
            ),
            ("mark", "mark", vec!["classsal_1_1char__array__t.html"]),
        ] {
            let mut record = SearchRecord::new(key, name);
            for (i, page) in pages.iter().enumerate() {
                record.occurrences.push(Occurrence::new(
                    Target::new(*page, format!("a{:032x}", i)),
                    format!("sal::{}() noexcept", name),
                ));
            }
            functions.records.push(record);
        }
        index.shards.push(functions);

        let mut variables = Shard::new(Section::Variables, "0");
        let mut record = SearchRecord::new("mask", "mask");
        record.occurrences.push(Occurrence::new(
            Target::new("structsal_1_1flags.html", format!("a{:032x}", 9)),
            "sal::flags",
        ));
        variables.records.push(record);
        index.shards.push(variables);

        index
    }

    fn names<'a>(matches: &'a [SymbolMatch<'a>]) -> Vec<&'a str> {
        matches.iter().map(|m| m.record.name.as_str()).collect()
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("make_address")).unwrap();

        assert_eq!(names(&matches), vec!["make_address", "make_address_v4"]);
        assert_eq!(matches[0].kind, MatchKind::Exact);
        assert_eq!(matches[1].kind, MatchKind::Prefix);
    }

    #[test]
    fn test_substring_match() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("address")).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.kind == MatchKind::Substring));
    }

    #[test]
    fn test_case_insensitive() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("MAKE_ADDRESS")).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_section_filter() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor
            .execute(&parse_query("section:variables ma"))
            .unwrap();
        assert_eq!(names(&matches), vec!["mask"]);
    }

    #[test]
    fn test_not_term() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("make -v4")).unwrap();
        assert_eq!(names(&matches), vec!["make_address"]);
    }

    #[test]
    fn test_regex_term() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor
            .execute(&parse_query("re:/make_.*_v[46]/"))
            .unwrap();
        assert_eq!(names(&matches), vec!["make_address_v4"]);
    }

    #[test]
    fn test_invalid_regex_errors() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        assert!(executor.execute(&parse_query("re:/(/")).is_err());
    }

    #[test]
    fn test_page_filter_decoded_name() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor
            .execute(&parse_query("page:address_v4.hpp ma"))
            .unwrap();
        assert_eq!(names(&matches), vec!["make_address_v4"]);
    }

    #[test]
    fn test_label_filter() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor
            .execute(&parse_query("label:noexcept ma"))
            .unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_limit() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("top:1 ma")).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_sort_by_name() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("sort:name ma")).unwrap();
        let mut sorted = names(&matches);
        sorted.sort();
        assert_eq!(names(&matches), sorted);
    }

    #[test]
    fn test_exclusion_only_query() {
        let index = sample_index();
        let executor = QueryExecutor::new(&index);
        let matches = executor.execute(&parse_query("-make")).unwrap();
        assert_eq!(names(&matches), vec!["mark", "mask"]);
    }

    #[test]
    fn test_lookup_key() {
        let index = sample_index();
        let (_, record) = lookup_key(&index, Section::Functions, "make_5faddress").unwrap();
        assert_eq!(record.name, "make_address");
        assert!(lookup_key(&index, Section::Variables, "make_5faddress").is_none());
    }
}
