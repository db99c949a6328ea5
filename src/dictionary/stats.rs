//! Display compile counters on the diagnostic stream.

use crate::dictionary::indexer::CompileStats;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print the `--stats` counter table to stderr.
///
/// Only called after a successful compile; a failed run emits no stats.
pub fn print_stats(stats: &CompileStats) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);

    stderr.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(stderr, "Dictionary statistics")?;
    stderr.reset()?;

    print_counter(&mut stderr, "LAT files", stats.file_count)?;
    print_counter(&mut stderr, "Patterns", stats.pattern_count)?;
    print_counter(&mut stderr, "Rules", stats.rule_count)?;
    print_counter(&mut stderr, "Short rules", stats.short_rule_count)?;
    print_counter(&mut stderr, "Seed words", stats.seed_words)?;
    print_counter(&mut stderr, "Missing words", stats.missing_words)?;
    print_counter(&mut stderr, "Final words", stats.final_words)?;

    Ok(())
}

fn print_counter(out: &mut StandardStream, label: &str, value: usize) -> io::Result<()> {
    write!(out, "  {:14}", format!("{}:", label))?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(out, "{}", value)?;
    out.reset()?;
    Ok(())
}
