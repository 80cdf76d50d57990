mod index;
mod output;
mod query;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use utils::progress::Progress;

#[derive(Parser)]
#[command(name = "dxi")]
#[command(about = "Terminal-first toolkit for Doxygen HTML search indexes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Path to the generated search directory
    #[arg(short, long, default_value = "search")]
    dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the index for a symbol
    Query {
        /// Query string (terms plus section:/page:/label:/sort:/top: filters)
        query: Vec<String>,

        /// Path to the generated search directory
        #[arg(short, long, default_value = "search")]
        dir: PathBuf,

        /// Plain one-line-per-target output for piping
        #[arg(long)]
        plain: bool,
    },
    /// Check index structure and report errors and warnings
    Validate {
        /// Path to the generated search directory
        #[arg(default_value = "search")]
        dir: PathBuf,

        /// Documentation root; verifies that referenced pages exist
        #[arg(long)]
        pages: Option<PathBuf>,
    },
    /// Show index statistics
    Stats {
        /// Path to the generated search directory
        #[arg(default_value = "search")]
        dir: PathBuf,
    },
    /// Merge several search directories into one shard set
    Merge {
        /// Input search directories
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output directory for the merged shards
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Dump the index as JSON or TSV
    Export {
        /// Path to the generated search directory
        #[arg(default_value = "search")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-serialize an index into a fresh, normalized shard set
    Emit {
        /// Path to the generated search directory
        #[arg(default_value = "search")]
        dir: PathBuf,

        /// Output directory for the rewritten shards
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Tsv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Query { query, dir, plain }) => {
            run_query(&dir, &query.join(" "), plain)?;
        }
        Some(Commands::Validate { dir, pages }) => {
            run_validate(&dir, pages.as_deref())?;
        }
        Some(Commands::Stats { dir }) => {
            index::stats::show_stats(&dir)?;
        }
        Some(Commands::Merge { inputs, output }) => {
            run_merge(&inputs, &output)?;
        }
        Some(Commands::Export {
            dir,
            format,
            output,
        }) => {
            run_export(&dir, format, output.as_deref())?;
        }
        Some(Commands::Emit { dir, output }) => {
            run_emit(&dir, &output)?;
        }
        None => {
            if cli.query.is_empty() {
                anyhow::bail!("no query given; try 'dxi query <symbol>' or 'dxi --help'");
            }
            run_query(&cli.dir, &cli.query.join(" "), false)?;
        }
    }

    Ok(())
}

fn run_query(dir: &Path, input: &str, plain: bool) -> Result<()> {
    let parsed = query::parse_query(input);
    if parsed.is_empty() {
        anyhow::bail!("empty query");
    }

    let index = index::load_index(dir)?;
    let executor = query::QueryExecutor::new(&index);
    let matches = executor.execute(&parsed)?;

    if matches.is_empty() {
        eprintln!("no matches");
        return Ok(());
    }

    if plain {
        output::print_matches_plain(&matches)?;
    } else {
        output::print_matches(&matches, true)?;
    }

    Ok(())
}

fn run_validate(dir: &Path, pages: Option<&Path>) -> Result<()> {
    let index = index::load_index(dir)?;
    let mut report = index::validate_index(&index);

    if let Some(docroot) = pages {
        index::validate::check_pages(&index, docroot, &mut report)?;
    }

    output::print_report(&report, true)?;

    if !report.is_clean() {
        anyhow::bail!("index validation failed");
    }
    Ok(())
}

fn run_merge(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let progress = Progress::bar(inputs.len() as u64, "loading indexes");
    let mut indexes = Vec::with_capacity(inputs.len());
    for input in inputs {
        indexes.push(index::load_index(input)?);
        progress.tick();
    }
    progress.finish();

    let merged = index::merge::merge_indexes(&indexes);
    for warning in &merged.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut writer = index::IndexWriter::new(output);
    let record_count = merged.records.len();
    for (section, record) in merged.records {
        writer.add_record(section, record);
    }
    let written = writer.write()?;

    println!(
        "Merged {} indexes: {} records in {} shards -> {}",
        inputs.len(),
        record_count,
        written.len(),
        output.display()
    );
    Ok(())
}

fn run_export(
    dir: &Path,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let index = index::load_index(dir)?;

    let rendered = match format {
        ExportFormat::Json => index::export::to_json(&index)?,
        ExportFormat::Tsv => index::export::to_tsv(&index),
    };

    match output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn run_emit(dir: &Path, output: &Path) -> Result<()> {
    let index = index::load_index(dir)?;

    let mut writer = index::IndexWriter::new(output);
    for shard in &index.shards {
        for record in &shard.records {
            writer.add_record(shard.section, record.clone());
        }
    }
    let written = writer.write()?;

    println!(
        "Wrote {} records in {} shards -> {}",
        index.record_count(),
        written.len(),
        output.display()
    );
    Ok(())
}
