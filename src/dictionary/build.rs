//! Dictionary compilation: file discovery plus the concurrent ingestion
//! pipeline that merges every LAT file into one `DictionaryIndex`.

use crate::dictionary::indexer::{CompileStats, DictionaryBuilder, ScannedFile};
use crate::dictionary::pipeline::{FileTask, map_reduce_files};
use crate::dictionary::types::{Category, CompilerConfig, DictionaryIndex, WordsMap};
use crate::dictionary::vocabulary::load_word_classes;
use crate::utils::tokenize;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Compile the dictionary rooted at `root` without progress output.
pub fn compile_dictionary(
    root: &Path,
    config: &CompilerConfig,
) -> Result<(DictionaryIndex, CompileStats)> {
    compile_dictionary_with_progress(root, config, false)
}

/// Compile the dictionary rooted at `root`, optionally showing discovery
/// and ingestion progress on stderr.
///
/// Fatal conditions (unreadable root, unopenable vocabulary or pattern
/// file) abort the whole run; no partial index is returned.
pub fn compile_dictionary_with_progress(
    root: &Path,
    config: &CompilerConfig,
    show_progress: bool,
) -> Result<(DictionaryIndex, CompileStats)> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Invalid dictionary root {}", root.display()))?;

    // Phase 1: seed vocabulary
    let mut words = WordsMap::new();
    load_word_classes(&mut words, &root.join(&config.wordclasses_file))?;
    let mut builder = DictionaryBuilder::new(words);

    // Phase 2: discover LAT files
    let spinner = if show_progress {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message("Discovering LAT files...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    let tasks = discover_pattern_files(&root, config)?;

    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!("Found {} LAT files", tasks.len()));
    }

    // Phase 3: scan files concurrently, aggregate on this thread
    let progress_bar = if show_progress {
        let pb = ProgressBar::new(tasks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("█▓▒░  "),
        );
        pb.set_message("Scanning LAT files...");
        Some(pb)
    } else {
        None
    };

    map_reduce_files(
        tasks,
        config.effective_workers(),
        config.channel_capacity,
        |task| scan_lat_file(&task.path),
        |outcome| {
            builder.note_file();
            for pattern in &outcome.value.patterns {
                builder.add_pattern(&outcome.value.category, pattern, outcome.rank);
            }
            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(format!(
                    "{} ({} patterns)",
                    outcome.value.category,
                    outcome.value.patterns.len()
                ));
            }
            Ok(())
        },
    )?;

    if let Some(pb) = progress_bar {
        let stats = builder.stats();
        pb.finish_with_message(format!(
            "{} patterns from {} files",
            stats.pattern_count, stats.file_count
        ));
    }

    Ok(builder.finish())
}

/// Walk the root and return every eligible pattern file, sorted by path.
///
/// The sort gives each file a stable rank, which the aggregator uses to
/// keep short-rule conflicts deterministic regardless of worker order.
/// Any filesystem error during the walk is fatal; only extension and
/// reserved-prefix mismatches are skipped.
fn discover_pattern_files(root: &Path, config: &CompilerConfig) -> Result<Vec<FileTask>> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Unable to access an entry under {}", root.display()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if is_pattern_file(entry.path(), config) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(rank, path)| FileTask {
            rank: rank as u32,
            path,
        })
        .collect())
}

/// Pattern sources carry the configured extension and must not start
/// with the reserved auxiliary-file prefix.
fn is_pattern_file(path: &Path, config: &CompilerConfig) -> bool {
    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == config.pattern_extension);
    let base_allowed = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !n.starts_with(config.reserved_prefix));
    extension_matches && base_allowed
}

/// Category id is the file's base name with the extension stripped, case
/// preserved.
fn category_for(path: &Path) -> Category {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Tokenize every line of one LAT file. Empty lines produce no pattern.
fn scan_lat_file(path: &Path) -> Result<ScannedFile> {
    let file =
        File::open(path).with_context(|| format!("Failed to open LAT file {}", path.display()))?;
    let reader = BufReader::new(file);
    let category = category_for(path);

    let mut patterns = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read LAT file {}", path.display()))?;
        let pattern = tokenize(&line);
        if !pattern.is_empty() {
            patterns.push(pattern);
        }
    }

    Ok(ScannedFile { category, patterns })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pattern_file() {
        let config = CompilerConfig::default();
        assert!(is_pattern_file(Path::new("/dict/greeting.txt"), &config));
        assert!(is_pattern_file(Path::new("/dict/sub/Bang.txt"), &config));
        assert!(!is_pattern_file(Path::new("/dict/_wordclasses.txt"), &config));
        assert!(!is_pattern_file(Path::new("/dict/_notes.txt"), &config));
        assert!(!is_pattern_file(Path::new("/dict/readme.md"), &config));
        assert!(!is_pattern_file(Path::new("/dict/noext"), &config));
    }

    #[test]
    fn test_category_preserves_case() {
        assert_eq!(category_for(Path::new("/dict/FirstPerson.txt")), "FirstPerson");
    }
}
