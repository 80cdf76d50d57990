use crate::index::types::{SearchIndex, SearchRecord, Shard};
use crate::utils::escape::{decode_key, encode_key};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

/// Diagnostic severity; errors make `validate` exit non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding, tied to a shard file and usually a key
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub shard: String,
    pub key: Option<String>,
    pub message: String,
}

/// Collected findings for one index
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    fn error(&mut self, shard: &Shard, key: Option<&str>, message: String) {
        self.push(Severity::Error, shard, key, message);
    }

    fn warning(&mut self, shard: &Shard, key: Option<&str>, message: String) {
        self.push(Severity::Warning, shard, key, message);
    }

    fn push(&mut self, severity: Severity, shard: &Shard, key: Option<&str>, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            shard: shard.file_name(),
            key: key.map(str::to_string),
            message,
        });
    }
}

/// Run the structural checks over a loaded index
pub fn validate_index(index: &SearchIndex) -> ValidationReport {
    let mut report = ValidationReport::default();

    for shard in &index.shards {
        let mut seen_keys: FxHashMap<&str, usize> = FxHashMap::default();
        let mut bucket: Option<(char, &str)> = None;

        for record in &shard.records {
            check_record(&mut report, shard, record);

            *seen_keys.entry(record.key.as_str()).or_insert(0) += 1;

            // All records of one shard share a first-character bucket
            if let Some(first) = record_bucket(record) {
                match bucket {
                    None => bucket = Some((first, record.key.as_str())),
                    Some((expected, _)) if expected == first => {}
                    Some((expected, holder)) => {
                        report.warning(
                            shard,
                            Some(record.key.as_str()),
                            format!(
                                "key buckets under '{}' but shard starts with '{}' (from '{}')",
                                first, expected, holder
                            ),
                        );
                    }
                }
            }
        }

        for (key, count) in seen_keys {
            if count > 1 {
                report.error(
                    shard,
                    Some(key),
                    format!("key appears {} times in shard", count),
                );
            }
        }
    }

    report
}

fn check_record(report: &mut ValidationReport, shard: &Shard, record: &SearchRecord) {
    if record.key.is_empty() {
        report.error(shard, None, "record has empty key".to_string());
        return;
    }
    let key = Some(record.key.as_str());

    if record.name.is_empty() {
        report.error(shard, key, "record has empty display name".to_string());
    }

    if record.occurrences.is_empty() {
        report.error(shard, key, "record has no occurrences".to_string());
    }

    match decode_key(&record.key) {
        None => report.warning(shard, key, "key is not a valid escaped token".to_string()),
        Some(_) => {
            let expected = encode_key(&record.name);
            if expected != record.key {
                report.warning(
                    shard,
                    key,
                    format!("key does not match display name (expected '{}')", expected),
                );
            }
        }
    }

    for occ in &record.occurrences {
        if occ.target.page.is_empty() {
            report.error(shard, key, "occurrence has empty page".to_string());
            continue;
        }
        if !occ.target.page.ends_with(".html") {
            report.error(
                shard,
                key,
                format!("occurrence page '{}' is not an .html page", occ.target.page),
            );
        }
        if occ.target.anchor.is_empty() {
            report.error(
                shard,
                key,
                format!("occurrence URL '../{}' has no anchor", occ.target.page),
            );
        } else if !occ.target.has_canonical_anchor() {
            report.warning(
                shard,
                key,
                format!("anchor '{}' is not in generator shape", occ.target.anchor),
            );
        }
        if occ.label.is_empty() {
            report.error(shard, key, "occurrence has empty label".to_string());
        }
    }
}

fn record_bucket(record: &SearchRecord) -> Option<char> {
    decode_key(&record.key)
        .and_then(|name| name.chars().next())
        .or_else(|| record.key.chars().next())
}

/// Check that every referenced page exists somewhere under the
/// documentation root, appending errors to the report.
pub fn check_pages(index: &SearchIndex, docroot: &Path, report: &mut ValidationReport) -> Result<()> {
    let pages = collect_pages(docroot)?;

    for shard in &index.shards {
        for record in &shard.records {
            for occ in &record.occurrences {
                if !occ.target.page.is_empty() && !pages.contains(occ.target.page.as_str()) {
                    report.error(
                        shard,
                        Some(record.key.as_str()),
                        format!("page '{}' not found under {}", occ.target.page, docroot.display()),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Gather the file names of all HTML pages under the documentation root
fn collect_pages(docroot: &Path) -> Result<FxHashSet<String>> {
    if !docroot.is_dir() {
        anyhow::bail!("documentation root {} is not a directory", docroot.display());
    }

    let mut pages = FxHashSet::default();
    for entry in WalkBuilder::new(docroot).build() {
        let entry = entry.with_context(|| format!("failed to walk {}", docroot.display()))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "html") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                pages.insert(name.to_string());
            }
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{Occurrence, Section, SearchRecord, Target};

    fn index_with(records: Vec<SearchRecord>) -> SearchIndex {
        let mut index = SearchIndex::default();
        let mut shard = Shard::new(Section::Functions, "0");
        shard.records = records;
        index.shards.push(shard);
        index
    }

    fn valid_record() -> SearchRecord {
        let mut r = SearchRecord::new("merge", "merge");
        r.occurrences.push(Occurrence::new(
            Target::new("classa.html", "a50deaf23e3540ce7226668f22aff67db"),
            "a::merge()",
        ));
        r
    }

    #[test]
    fn test_valid_index_is_clean() {
        let report = validate_index(&index_with(vec![valid_record()]));
        assert!(report.is_clean());
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_empty_occurrences_is_error() {
        let report = validate_index(&index_with(vec![SearchRecord::new("merge", "merge")]));
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics[0].message.contains("no occurrences"));
    }

    #[test]
    fn test_missing_anchor_is_error() {
        let mut r = valid_record();
        r.occurrences[0].target.anchor.clear();
        let report = validate_index(&index_with(vec![r]));
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics[0].message.contains("no anchor"));
    }

    #[test]
    fn test_odd_anchor_is_warning() {
        let mut r = valid_record();
        r.occurrences[0].target.anchor = "details".to_string();
        let report = validate_index(&index_with(vec![r]));
        assert!(report.is_clean());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_duplicate_key_is_error() {
        let report = validate_index(&index_with(vec![valid_record(), valid_record()]));
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics[0].message.contains("appears 2 times"));
    }

    #[test]
    fn test_key_name_mismatch_is_warning() {
        let mut r = valid_record();
        r.name = "other".to_string();
        let report = validate_index(&index_with(vec![r]));
        assert!(report.is_clean());
        assert!(
            report
                .diagnostics
                .iter()
                .any(|d| d.message.contains("does not match display name"))
        );
    }

    #[test]
    fn test_bucket_mismatch_is_warning() {
        let mut other = valid_record();
        other.key = "apply".to_string();
        other.name = "apply".to_string();
        let report = validate_index(&index_with(vec![valid_record(), other]));
        assert!(report.is_clean());
        assert!(
            report
                .diagnostics
                .iter()
                .any(|d| d.message.contains("buckets under"))
        );
    }

    #[test]
    fn test_check_pages() {
        let docroot = std::env::temp_dir()
            .join("dxi_validate_tests")
            .join(format!("pages_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&docroot);
        std::fs::create_dir_all(&docroot).unwrap();
        std::fs::write(docroot.join("classa.html"), "<html></html>").unwrap();

        let index = index_with(vec![valid_record()]);
        let mut report = ValidationReport::default();
        check_pages(&index, &docroot, &mut report).unwrap();
        assert!(report.is_clean());

        let mut missing = valid_record();
        missing.occurrences[0].target.page = "gone.html".to_string();
        let index = index_with(vec![missing]);
        let mut report = ValidationReport::default();
        check_pages(&index, &docroot, &mut report).unwrap();
        assert_eq!(report.error_count(), 1);
    }
}
