//! Batch processing of transcript documents.
//!
//! Each document is independent: it is read, turned into a record and
//! written on its own, so a batch runs documents in parallel with rayon and
//! a failure in one never stops the others.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::error::Result;
use crate::extract::{RecordBuilder, RecordOutcome};
use crate::options::{ExtractOptions, OutputFormat};
use crate::render::{
    csv_file_name, json_file_name, numbered_file_name, write_csv_file, write_json_file,
};
use crate::source::{PdfSource, TableDetector};

/// Progress notification sent while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// A document is about to be processed
    Started {
        /// Source document
        source: PathBuf,
    },
    /// A document was exported
    Exported {
        /// Source document
        source: PathBuf,
        /// Written file
        output: PathBuf,
        /// Number of grade rows written
        rows: usize,
    },
    /// A document held no grade rows
    Empty {
        /// Source document
        source: PathBuf,
    },
    /// A document failed
    Failed {
        /// Source document
        source: PathBuf,
        /// Error message
        message: String,
    },
}

impl BatchEvent {
    fn from_outcome(outcome: &RecordOutcome) -> Self {
        match outcome {
            RecordOutcome::Exported {
                source,
                output,
                rows,
            } => BatchEvent::Exported {
                source: source.clone(),
                output: output.clone(),
                rows: *rows,
            },
            RecordOutcome::Empty { source } => BatchEvent::Empty {
                source: source.clone(),
            },
            RecordOutcome::Failed { source, error } => BatchEvent::Failed {
                source: source.clone(),
                message: error.to_string(),
            },
        }
    }

    /// Check if the event closes a document.
    pub fn is_final(&self) -> bool {
        !matches!(self, BatchEvent::Started { .. })
    }
}

/// Output paths handed out during one batch.
///
/// Two documents of a batch can produce the same file name (same student,
/// or unreadable metadata). The first keeps the name, later ones get a
/// numbered variant.
#[derive(Debug, Default)]
struct OutputClaims {
    taken: Mutex<HashSet<PathBuf>>,
}

impl OutputClaims {
    fn claim(&self, dir: &Path, name: &str) -> PathBuf {
        let mut taken = self.taken.lock().unwrap_or_else(PoisonError::into_inner);
        let path = dir.join(name);
        if taken.insert(path.clone()) {
            return path;
        }

        let mut n = 2;
        loop {
            let candidate = dir.join(numbered_file_name(name, n));
            if taken.insert(candidate.clone()) {
                log::warn!(
                    "{} already written in this batch, using {}",
                    path.display(),
                    candidate.display()
                );
                return candidate;
            }
            n += 1;
        }
    }
}

/// Extract one document and write its record into `out_dir`.
///
/// Returns the written path and the number of grade rows. An existing file
/// of the same name is replaced.
pub fn process_document<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
    out_dir: Q,
) -> Result<(PathBuf, usize)> {
    export_document(path.as_ref(), options, out_dir.as_ref(), &OutputClaims::default())
}

fn export_document(
    path: &Path,
    options: &ExtractOptions,
    out_dir: &Path,
    claims: &OutputClaims,
) -> Result<(PathBuf, usize)> {
    let name = path.display().to_string();

    let source = PdfSource::open(path)?
        .with_detector(TableDetector::with_config(options.detector_config()));
    let record = RecordBuilder::new(options.tags.clone()).build_from(&source, &name)?;

    fs::create_dir_all(out_dir)?;

    let output = match options.format {
        OutputFormat::Csv => {
            let output = claims.claim(out_dir, &csv_file_name(&record));
            write_csv_file(&record, &output, options.csv_options())?;
            output
        }
        OutputFormat::Json(format) => {
            let output = claims.claim(out_dir, &json_file_name(&record));
            write_json_file(&record, &output, format)?;
            output
        }
    };

    Ok((output, record.grade_count()))
}

/// Process every input, reporting progress on `events` when given.
///
/// Outcomes come back in input order. Output names are unique within the
/// batch. Send failures (receiver dropped) are ignored.
pub fn run_batch<Q: AsRef<Path> + Sync>(
    inputs: &[PathBuf],
    options: &ExtractOptions,
    out_dir: Q,
    events: Option<&Sender<BatchEvent>>,
) -> Vec<RecordOutcome> {
    log::info!(
        "Processing {} documents ({})",
        inputs.len(),
        if options.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let out_dir = out_dir.as_ref();
    let claims = OutputClaims::default();

    let process = |path: &PathBuf| {
        if let Some(tx) = events {
            let _ = tx.send(BatchEvent::Started {
                source: path.clone(),
            });
        }

        let outcome = RecordOutcome::from_result(
            path.clone(),
            export_document(path, options, out_dir, &claims),
        );
        match &outcome {
            RecordOutcome::Exported { output, rows, .. } => {
                log::info!("{}: {} rows -> {}", path.display(), rows, output.display())
            }
            RecordOutcome::Empty { .. } => {
                log::warn!("No grade table found in {}", path.display())
            }
            RecordOutcome::Failed { error, .. } => {
                log::error!("Failed to process {}: {}", path.display(), error)
            }
        }

        if let Some(tx) = events {
            let _ = tx.send(BatchEvent::from_outcome(&outcome));
        }
        outcome
    };

    if options.parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    }
}
