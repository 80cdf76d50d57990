use crate::index::reader::{index_size, load_index};
use crate::index::types::{SearchIndex, Section};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Display index statistics
pub fn show_stats(dir: &Path) -> Result<()> {
    let index = load_index(dir)?;

    println!("Search Index Statistics");
    println!("=======================");
    println!();
    println!("Source:           {}", dir.display());
    println!("Shard files:      {}", index.shards.len());
    println!("Records:          {}", index.record_count());
    println!("Occurrences:      {}", index.occurrence_count());
    if let Ok(size) = index_size(dir) {
        println!("On-disk size:     {}", format_size(size));
    }

    println!();
    println!("Records by section:");
    for (section, (records, occurrences)) in section_counts(&index) {
        println!(
            "  {:12} {:6} records, {:6} occurrences",
            section.as_str(),
            records,
            occurrences
        );
    }

    let overloaded = most_overloaded(&index, 10);
    if !overloaded.is_empty() {
        println!();
        println!("Most overloaded symbols:");
        for (name, count) in overloaded {
            println!("  {:30} {} sites", name, count);
        }
    }

    let pages = top_pages(&index, 10);
    if !pages.is_empty() {
        println!();
        println!("Most referenced pages:");
        for (page, count) in pages {
            println!("  {:40} {} targets", page, count);
        }
    }

    Ok(())
}

/// Per-section record and occurrence counts
pub fn section_counts(index: &SearchIndex) -> BTreeMap<Section, (usize, usize)> {
    let mut counts: BTreeMap<Section, (usize, usize)> = BTreeMap::new();
    for shard in &index.shards {
        let entry = counts.entry(shard.section).or_default();
        entry.0 += shard.records.len();
        entry.1 += shard.records.iter().map(|r| r.occurrences.len()).sum::<usize>();
    }
    counts
}

/// Symbols with the most definition sites, ignoring the duplicated `all`
/// section so each symbol counts once.
pub fn most_overloaded(index: &SearchIndex, limit: usize) -> Vec<(String, usize)> {
    let has_specific = index.shards.iter().any(|s| s.section != Section::All);
    let mut symbols: Vec<(String, usize)> = index
        .shards
        .iter()
        .filter(|s| !(s.section == Section::All && has_specific))
        .flat_map(|s| &s.records)
        .map(|r| (r.name.clone(), r.occurrences.len()))
        .collect();

    symbols.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    symbols.truncate(limit);
    symbols.retain(|(_, count)| *count > 1);
    symbols
}

/// Pages referenced by the most occurrences, as decoded display names
pub fn top_pages(index: &SearchIndex, limit: usize) -> Vec<(String, usize)> {
    let has_specific = index.shards.iter().any(|s| s.section != Section::All);
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for shard in &index.shards {
        if shard.section == Section::All && has_specific {
            continue;
        }
        for record in &shard.records {
            for occ in &record.occurrences {
                let page = occ.target.page_name();
                *counts
                    .entry(format!("{} ({})", page.name, page.kind.as_str()))
                    .or_default() += 1;
            }
        }
    }

    let mut pages: Vec<_> = counts.into_iter().collect();
    pages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pages.truncate(limit);
    pages
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
