use crate::index::types::{SearchRecord, Section, Shard};
use crate::utils::entities::encode_entities;
use crate::utils::escape::decode_key;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer that re-shards records and emits them as shard files
pub struct IndexWriter {
    out_dir: PathBuf,
    /// Section -> bucket char -> records, kept sorted for stable output
    buckets: BTreeMap<Section, BTreeMap<char, Vec<SearchRecord>>>,
}

impl IndexWriter {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            buckets: BTreeMap::new(),
        }
    }

    /// Add a record to its section, bucketed by first key character
    pub fn add_record(&mut self, section: Section, record: SearchRecord) {
        let bucket = bucket_char(&record);
        self.buckets
            .entry(section)
            .or_default()
            .entry(bucket)
            .or_default()
            .push(record);
    }

    /// Write all shard files. Shard ids are sequential lowercase hex per
    /// section, in bucket-character order, matching the generator's
    /// `functions_b.js` naming.
    pub fn write(&self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;

        let mut written = Vec::new();

        for (&section, buckets) in &self.buckets {
            for (shard_index, records) in buckets.values().enumerate() {
                let shard = Shard {
                    section,
                    id: format!("{:x}", shard_index),
                    records: records.clone(),
                };

                let path = self.out_dir.join(shard.file_name());
                write_shard_file(&path, &shard)?;
                written.push(path);
            }
        }

        Ok(written)
    }
}

/// Write one shard to disk
pub fn write_shard_file(path: &Path, shard: &Shard) -> Result<()> {
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    file.write_all(serialize_shard(&shard.records).as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Render records in the exact layout the documentation viewer expects
pub fn serialize_shard(records: &[SearchRecord]) -> String {
    let mut out = String::from("var searchData=\n[\n");

    for (i, record) in records.iter().enumerate() {
        out.push_str("  ['");
        push_quoted(&mut out, &record.key);
        out.push_str("',['");
        push_quoted(&mut out, &encode_entities(&record.name));
        out.push('\'');

        for occ in &record.occurrences {
            out.push_str(",['");
            push_quoted(&mut out, &occ.target.to_url());
            out.push_str("',");
            out.push(if occ.main_window { '1' } else { '0' });
            out.push_str(",'");
            push_quoted(&mut out, &encode_entities(&occ.label));
            out.push_str("']");
        }

        out.push_str("]]");
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("];\n");
    out
}

/// Escape backslashes and single quotes for the JS string literal
fn push_quoted(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
}

/// Bucket character for shard assignment: first character of the decoded
/// name, falling back to the raw key for undecodable ones.
fn bucket_char(record: &SearchRecord) -> char {
    decode_key(&record.key)
        .and_then(|name| name.chars().next())
        .or_else(|| record.key.chars().next())
        .unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::parser::parse_shard_source;
    use crate::index::types::{Occurrence, Target};

    fn record(key: &str, name: &str, occurrences: &[(&str, &str)]) -> SearchRecord {
        let mut r = SearchRecord::new(key, name);
        for (url, label) in occurrences {
            r.occurrences
                .push(Occurrence::new(Target::from_url(url), *label));
        }
        r
    }

    #[test]
    fn test_serialize_layout() {
        let records = vec![record(
            "mark",
            "mark",
            &[(
                "../classsal_1_1char__array__t.html#a1eb81cb9d24ddf4027d38bac94895191",
                "sal::char_array_t",
            )],
        )];

        let out = serialize_shard(&records);
        assert_eq!(
            out,
            "var searchData=\n[\n  ['mark',['mark',['../classsal_1_1char__array__t.html#a1eb81cb9d24ddf4027d38bac94895191',1,'sal::char_array_t']]]\n];\n"
        );
    }

    #[test]
    fn test_serialize_encodes_entities() {
        let records = vec![record(
            "make_5faddress",
            "make_address",
            &[(
                "../address_8hpp.html#a3f005dedb5a8205580b09c8382157374",
                "sal::net::ip::make_address(const char *str, std::error_code &ec) noexcept",
            )],
        )];

        let out = serialize_shard(&records);
        assert!(out.contains("std::error_code &amp;ec"));
        assert!(!out.contains("&ec"));
    }

    #[test]
    fn test_serialize_escapes_quotes() {
        let records = vec![record("a", "a", &[("../p.html#a1", "it's")])];
        let out = serialize_shard(&records);
        assert!(out.contains("it\\'s"));
    }

    #[test]
    fn test_serialize_parse_roundtrip() {
        let records = vec![
            record(
                "make_5faddress",
                "make_address",
                &[
                    (
                        "../address_8hpp.html#a3f005dedb5a8205580b09c8382157374",
                        "sal::net::ip::make_address(const char *str, std::error_code &ec) noexcept",
                    ),
                    (
                        "../address_8hpp.html#abd051d336642e7581dcb8b9763ae82be",
                        "sal::net::ip::make_address(const char *str)",
                    ),
                ],
            ),
            record(
                "merge",
                "merge",
                &[(
                    "../classsal_1_1program__options_1_1option__set__t.html#a50deaf23e3540ce7226668f22aff67db",
                    "sal::program_options::option_set_t",
                )],
            ),
        ];

        let parsed = parse_shard_source(&serialize_shard(&records)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_reserialize_is_stable() {
        let source = "var searchData=\n[\n  ['max_5fsize',['max_size',['../classsal_1_1char__array__t.html#a7c3c18bb1c52f8d620f3e86f8f81167a',1,'sal::char_array_t']]]\n];\n";
        let records = parse_shard_source(source).unwrap();
        assert_eq!(serialize_shard(&records), source);
    }

    #[test]
    fn test_writer_reshards_by_first_char() {
        let dir = std::env::temp_dir()
            .join("dxi_writer_tests")
            .join(format!("reshard_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut writer = IndexWriter::new(&dir);
        writer.add_record(
            Section::Functions,
            record("mark", "mark", &[("../p.html#a1", "x")]),
        );
        writer.add_record(
            Section::Functions,
            record("merge", "merge", &[("../p.html#a2", "x")]),
        );
        writer.add_record(
            Section::Functions,
            record("abort", "abort", &[("../p.html#a3", "x")]),
        );

        let written = writer.write().unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        // 'a' bucket first, then 'm'
        assert_eq!(names, vec!["functions_0.js", "functions_1.js"]);

        let m_shard = fs::read_to_string(&written[1]).unwrap();
        let records = parse_shard_source(&m_shard).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_bucket_uses_decoded_name() {
        // '~destructor' keys start with an escape but bucket under '~'
        let r = record("_7ework", "~work", &[("../p.html#a1", "x")]);
        assert_eq!(bucket_char(&r), '~');
    }
}
