use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use latc::dictionary::build::compile_dictionary_with_progress;
use latc::dictionary::indexer::CompileStats;
use latc::dictionary::stats::print_stats;
use latc::dictionary::types::{CompilerConfig, DictionaryIndex};
use latc::output::{write_flat_rules, write_graph_statements, write_json_index};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "latc")]
#[command(about = "Compiles LAT pattern files into a dictionary index for the tagger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the dictionary index as a single JSON document
    Json {
        /// Dictionary root containing LAT files and _wordclasses.txt
        dir: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print vocabulary and rule counters to stderr
        #[arg(long)]
        stats: bool,

        /// Worker threads for ingestion
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Emit a flat list of {LAT, Pat} records
    Flat {
        /// Dictionary root containing LAT files and _wordclasses.txt
        dir: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print vocabulary and rule counters to stderr
        #[arg(long)]
        stats: bool,

        /// Worker threads for ingestion
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Emit the graph-mutation statement stream (JSON lines)
    Graph {
        /// Dictionary root containing LAT files and _wordclasses.txt
        dir: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print vocabulary and rule counters to stderr
        #[arg(long)]
        stats: bool,

        /// Worker threads for ingestion
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Compile and print counters without emitting an index
    Stats {
        /// Dictionary root containing LAT files and _wordclasses.txt
        dir: PathBuf,

        /// Worker threads for ingestion
        #[arg(long)]
        workers: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Json {
            dir,
            output,
            stats,
            workers,
        } => {
            let (index, counters) = compile(&dir, workers)?;
            emit(output.as_deref(), |writer| write_json_index(writer, &index))?;
            finish(stats, &counters)?;
        }
        Commands::Flat {
            dir,
            output,
            stats,
            workers,
        } => {
            let (index, counters) = compile(&dir, workers)?;
            emit(output.as_deref(), |writer| write_flat_rules(writer, &index))?;
            finish(stats, &counters)?;
        }
        Commands::Graph {
            dir,
            output,
            stats,
            workers,
        } => {
            let (index, counters) = compile(&dir, workers)?;
            emit(output.as_deref(), |writer| {
                write_graph_statements(writer, &index)
            })?;
            finish(stats, &counters)?;
        }
        Commands::Stats { dir, workers } => {
            let (_, counters) = compile(&dir, workers)?;
            finish(true, &counters)?;
        }
    }

    Ok(())
}

/// Run the full compile with progress on stderr.
fn compile(dir: &Path, workers: Option<usize>) -> Result<(DictionaryIndex, CompileStats)> {
    let mut config = CompilerConfig::default();
    if let Some(workers) = workers {
        config.workers = workers;
    }
    compile_dictionary_with_progress(dir, &config, true)
}

/// Serialize through `sink` into the chosen destination, flushing before
/// declaring success.
fn emit<F>(output: Option<&Path>, sink: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            sink(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            sink(&mut writer)?;
            writer.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Stats are only emitted on successful completion.
fn finish(stats: bool, counters: &CompileStats) -> Result<()> {
    if stats {
        print_stats(counters).context("Failed to print statistics")?;
    }
    Ok(())
}
