//! Output formatting for query results and validation reports

use crate::index::validate::{Severity, ValidationReport};
use crate::query::executor::SymbolMatch;
use crate::query::scorer::MatchKind;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print query matches: symbol header plus one line per definition site
pub fn print_matches(matches: &[SymbolMatch<'_>], color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for (i, m) in matches.iter().enumerate() {
        if i > 0 {
            writeln!(stdout)?;
        }

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(stdout, "{}", m.record.name)?;
        stdout.reset()?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "  [{}]", m.section)?;
        stdout.reset()?;

        if m.kind == MatchKind::Exact {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(stdout, " exact")?;
            stdout.reset()?;
        }
        writeln!(stdout)?;

        for occ in &m.record.occurrences {
            let page = occ.target.page_name();

            write!(stdout, "  ")?;
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(stdout, "{}", page.name)?;
            stdout.reset()?;

            if !occ.label.is_empty() && occ.label != page.name {
                write!(stdout, "  {}", occ.label)?;
            }
            writeln!(stdout)?;
        }
    }

    Ok(())
}

/// Print matches as plain `section:name:page#anchor` lines for piping
pub fn print_matches_plain(matches: &[SymbolMatch<'_>]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Never);

    for m in matches {
        for occ in &m.record.occurrences {
            writeln!(
                stdout,
                "{}:{}:{}#{}",
                m.section, m.record.name, occ.target.page, occ.target.anchor
            )?;
        }
    }

    Ok(())
}

/// Print a validation report, one diagnostic per line
pub fn print_report(report: &ValidationReport, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for d in &report.diagnostics {
        match d.severity {
            Severity::Error => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(stdout, "error")?;
            }
            Severity::Warning => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                write!(stdout, "warning")?;
            }
        }
        stdout.reset()?;

        write!(stdout, ": ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", d.shard)?;
        stdout.reset()?;

        if let Some(key) = &d.key {
            write!(stdout, " ['{}']", key)?;
        }
        writeln!(stdout, ": {}", d.message)?;
    }

    if !report.diagnostics.is_empty() {
        writeln!(stdout)?;
    }
    writeln!(
        stdout,
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    )?;

    Ok(())
}
