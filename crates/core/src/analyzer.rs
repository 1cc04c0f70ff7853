//! Per-file PLR analysis: hash, type sniff, archive listing and score.

use crate::archive;
use crate::error::{PlrError, PlrResult};
use crate::models::{AnalysisRecord, FileCategory};
use crate::scanner::modified_time;
use crate::scorer::{self, ScoreInput};
use crate::sniffer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Analyzes one file. Fails only when the file itself cannot be read; a
/// broken archive still yields a record, scored without its listing.
pub fn analyze_file(path: &Path) -> PlrResult<AnalysisRecord> {
    let meta = fs::metadata(path).map_err(|e| PlrError::access(path, e))?;
    if !meta.is_file() {
        return Err(PlrError::NotFound(path.to_path_buf()));
    }
    let hash = sniffer::hash_file(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let category = sniffer::sniff_category(path);

    let (contents, archive_error) = if category == FileCategory::Archive && sniffer::is_zip(path) {
        match archive::list_entries(path) {
            Ok(entries) => (Some(entries), None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "archive listing failed");
                (None, Some(e.to_string()))
            }
        }
    } else {
        (None, None)
    };

    let result = scorer::score(&ScoreInput {
        filename: &filename,
        size: meta.len(),
        category,
        entries: contents.as_deref(),
    });
    debug!(
        path = %path.display(),
        score = result.score,
        license = result.license.label(),
        "analyzed file"
    );

    Ok(AnalysisRecord {
        path: path.to_string_lossy().into_owned(),
        filename,
        size: meta.len(),
        modified: modified_time(&meta),
        hash,
        file_type: category,
        plr_score: result.score,
        confidence: result.band,
        suggested_niche: result.niche,
        suggested_license: result.license,
        contents,
        archive_error,
    })
}

/// Analyzes many files with at most `concurrency` in flight. Output order
/// matches input order; a failure is confined to its own slot.
pub async fn analyze_batch(
    paths: Vec<PathBuf>,
    concurrency: usize,
) -> Vec<PlrResult<AnalysisRecord>> {
    let total = paths.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set: JoinSet<(usize, PlrResult<AnalysisRecord>)> = JoinSet::new();
    let mut results: Vec<Option<PlrResult<AnalysisRecord>>> = (0..total).map(|_| None).collect();

    for (idx, path) in paths.iter().cloned().enumerate() {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };
        join_set.spawn_blocking(move || {
            let _permit = permit;
            (idx, analyze_file(&path))
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, outcome)) => results[idx] = Some(outcome),
            Err(e) => warn!(error = %e, "analysis worker failed"),
        }
    }

    let mut failed = 0usize;
    let results: Vec<PlrResult<AnalysisRecord>> = results
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| {
            let outcome = slot.unwrap_or_else(|| {
                Err(PlrError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("analysis did not complete for {}", path.display()),
                )))
            });
            if outcome.is_err() {
                failed += 1;
            }
            outcome
        })
        .collect();
    info!(total, failed, "analysis batch complete");
    results
}
