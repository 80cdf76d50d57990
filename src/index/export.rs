use crate::index::types::SearchIndex;
use anyhow::Result;

/// Serialize the whole index as pretty-printed JSON
pub fn to_json(index: &SearchIndex) -> Result<String> {
    Ok(serde_json::to_string_pretty(index)?)
}

/// Flatten the index to TSV, one occurrence per row:
/// section, key, name, page, anchor, label
pub fn to_tsv(index: &SearchIndex) -> String {
    let mut out = String::from("section\tkey\tname\tpage\tanchor\tlabel\n");

    for shard in &index.shards {
        for record in &shard.records {
            for occ in &record.occurrences {
                out.push_str(shard.section.as_str());
                out.push('\t');
                push_field(&mut out, &record.key);
                out.push('\t');
                push_field(&mut out, &record.name);
                out.push('\t');
                push_field(&mut out, &occ.target.page);
                out.push('\t');
                push_field(&mut out, &occ.target.anchor);
                out.push('\t');
                push_field(&mut out, &occ.label);
                out.push('\n');
            }
        }
    }

    out
}

/// Tabs and newlines never appear in well-formed index data, but a
/// malformed field must not corrupt the row structure.
fn push_field(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\t' | '\n' | '\r' => out.push(' '),
            _ => out.push(ch),
        }
    }
}
