use crate::index::types::{SearchIndex, SearchRecord, Section};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// Result of merging several indexes: the combined records plus any
/// conflicts that had to be resolved.
#[derive(Debug, Default)]
pub struct Merged {
    pub records: Vec<(Section, SearchRecord)>,
    pub warnings: Vec<String>,
}

/// Merge indexes in input order.
///
/// Records merge by (section, key); occurrence lists concatenate and
/// deduplicate by target. When inputs disagree on a display name, the
/// first input wins and the conflict is reported.
pub fn merge_indexes(indexes: &[SearchIndex]) -> Merged {
    // BTreeMap keeps the output deterministic across runs
    let mut merged: BTreeMap<(Section, String), SearchRecord> = BTreeMap::new();
    let mut warnings = Vec::new();

    for index in indexes {
        for (r, record) in index.records() {
            let section = index.shard_of(r).section;
            let slot = (section, record.key.clone());

            match merged.get_mut(&slot) {
                None => {
                    merged.insert(slot, record.clone());
                }
                Some(existing) => {
                    if existing.name != record.name {
                        warnings.push(format!(
                            "{}/{}: display name '{}' conflicts with '{}'; keeping the first",
                            section, record.key, record.name, existing.name
                        ));
                    }

                    let known: FxHashSet<_> =
                        existing.occurrences.iter().map(|o| &o.target).collect();
                    let new: Vec<_> = record
                        .occurrences
                        .iter()
                        .filter(|o| !known.contains(&o.target))
                        .cloned()
                        .collect();
                    existing.occurrences.extend(new);
                }
            }
        }
    }

    Merged {
        records: merged.into_iter().map(|((s, _), r)| (s, r)).collect(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{Occurrence, Shard, Target};

    fn index_of(section: Section, records: Vec<SearchRecord>) -> SearchIndex {
        let mut index = SearchIndex::default();
        let mut shard = Shard::new(section, "0");
        shard.records = records;
        index.shards.push(shard);
        index
    }

    fn record(key: &str, name: &str, anchors: &[&str]) -> SearchRecord {
        let mut r = SearchRecord::new(key, name);
        for anchor in anchors {
            r.occurrences
                .push(Occurrence::new(Target::new("p.html", *anchor), "x"));
        }
        r
    }

    #[test]
    fn test_merge_unions_occurrences() {
        let a = index_of(Section::Functions, vec![record("merge", "merge", &["a1"])]);
        let b = index_of(
            Section::Functions,
            vec![record("merge", "merge", &["a1", "a2"])],
        );

        let merged = merge_indexes(&[a, b]);
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0].1.occurrences.len(), 2);
        assert!(merged.warnings.is_empty());
    }

    #[test]
    fn test_merge_keeps_sections_apart() {
        let a = index_of(Section::Functions, vec![record("merge", "merge", &["a1"])]);
        let b = index_of(Section::Variables, vec![record("merge", "merge", &["a2"])]);

        let merged = merge_indexes(&[a, b]);
        assert_eq!(merged.records.len(), 2);
    }

    #[test]
    fn test_merge_name_conflict_first_wins() {
        let a = index_of(Section::Functions, vec![record("mark", "mark", &["a1"])]);
        let b = index_of(Section::Functions, vec![record("mark", "Mark", &["a2"])]);

        let merged = merge_indexes(&[a, b]);
        assert_eq!(merged.records[0].1.name, "mark");
        assert_eq!(merged.warnings.len(), 1);
        assert_eq!(merged.records[0].1.occurrences.len(), 2);
    }

    #[test]
    fn test_merge_preserves_occurrence_order() {
        let a = index_of(Section::Functions, vec![record("m", "m", &["a2", "a1"])]);
        let b = index_of(Section::Functions, vec![record("m", "m", &["a3"])]);

        let merged = merge_indexes(&[a, b]);
        let anchors: Vec<_> = merged.records[0]
            .1
            .occurrences
            .iter()
            .map(|o| o.target.anchor.as_str())
            .collect();
        assert_eq!(anchors, vec!["a2", "a1", "a3"]);
    }
}
