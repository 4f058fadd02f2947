use crate::index::{CommandOptions, build_command};
use crate::view::FileSummary;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tabled::{Table, settings::Style};
use tracing::warn;
use trailscope_core::{IndexOutcome, IntermediateStorage};
use trailscope_runtime::index_command;

/// Indexes every file on the rayon pool. A file that cannot be indexed, or
/// not even turned into a command, only fails its own row. The returned
/// storage merges the facts of all completed runs.
pub fn index_files(
    files: &[PathBuf],
    options: &CommandOptions,
) -> (Vec<FileSummary>, IntermediateStorage) {
    let results: Vec<_> = files
        .par_iter()
        .map(|file| index_one(file, options))
        .collect();

    let mut merged = IntermediateStorage::new();
    let mut summaries = Vec::with_capacity(results.len());
    for (summary, storage) in results {
        summaries.push(summary);
        if let Some(storage) = storage {
            merged.merge(storage);
        }
    }
    (summaries, merged)
}

fn index_one(path: &Path, options: &CommandOptions) -> (FileSummary, Option<IntermediateStorage>) {
    let command = match build_command(path, options) {
        Ok(command) => command,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return (
                FileSummary::without_facts(path, "-", format!("failed: {}", e)),
                None,
            );
        }
    };

    let indexer = command.indexer_command_type().as_str();
    match index_command(command.as_command()) {
        Ok(IndexOutcome::Completed(storage)) => {
            (FileSummary::completed(path, indexer, &storage), Some(storage))
        }
        Ok(IndexOutcome::Interrupted) => {
            (FileSummary::without_facts(path, indexer, "interrupted"), None)
        }
        Err(e) => {
            warn!("Indexing {} failed: {}", path.display(), e);
            (
                FileSummary::without_facts(path, indexer, format!("failed: {}", e)),
                None,
            )
        }
    }
}

pub fn run(files: &[PathBuf], options: &CommandOptions) -> anyhow::Result<()> {
    let (summaries, merged) = index_files(files, options);
    println!("{}", Table::new(&summaries).with(Style::psql()));
    println!(
        "{} of {} files indexed, {} facts in total",
        merged.files().count(),
        files.len(),
        merged.fact_count()
    );
    Ok(())
}
