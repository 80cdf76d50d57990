use crate::index::parser::parse_shard_source;
use crate::index::types::{SearchIndex, Section, Shard};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Load every shard of a generated `search/` directory into a [`SearchIndex`].
///
/// Shards parse in parallel; the first parse failure aborts the load with
/// file and position context. Viewer scripts (`search.js`, `searchdata.js`)
/// and non-shard files are skipped.
pub fn load_index(dir: &Path) -> Result<SearchIndex> {
    let mut shard_files = discover_shards(dir)?;
    if shard_files.is_empty() {
        anyhow::bail!(
            "no search index shards found in {} (expected files like functions_0.js)",
            dir.display()
        );
    }

    // Stable order: by section, then shard id
    shard_files.sort_by(|a, b| (a.1, &a.2).cmp(&(b.1, &b.2)));

    let shards: Vec<Shard> = shard_files
        .into_par_iter()
        .map(|(path, section, id)| {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let records = parse_shard_source(&source)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

            Ok(Shard {
                section,
                id,
                records,
            })
        })
        .collect::<Result<_>>()?;

    let mut index = SearchIndex::new(dir);
    index.shards = shards;
    Ok(index)
}

/// Find shard files in a search directory, returning path, section and id
fn discover_shards(dir: &Path) -> Result<Vec<(PathBuf, Section, String)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read search directory {}", dir.display()))?;

    let mut shards = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        if let Some((section, id)) = Shard::parse_file_name(name) {
            shards.push((entry.path(), section, id));
        }
    }

    Ok(shards)
}

/// Total on-disk size of an index's shard files
pub fn index_size(dir: &Path) -> Result<u64> {
    let mut size = 0;
    for (path, _, _) in discover_shards(dir)? {
        size += fs::metadata(&path)?.len();
    }
    Ok(size)
}
