//! Executes move/copy plans with per-operation outcomes.

use crate::config::OrganizeConfig;
use crate::error::{PlrError, PlrResult};
use crate::models::{OperationKind, OrganizeOperation, OrganizeProgress, OrganizeResult};
use crate::paths;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Applies one operation. Pre-conditions are checked in order: source
/// exists, safety policy, same-file guard, collision, then the target's
/// parent is created.
pub fn apply_operation(op: &OrganizeOperation, cfg: &OrganizeConfig) -> PlrResult<PathBuf> {
    let source = op.source.as_path();
    let target = op.target.as_path();

    fs::symlink_metadata(source).map_err(|e| PlrError::access(source, e))?;

    for path in [source, target] {
        if !paths::is_allowed(path, &cfg.allow_paths, &cfg.deny_paths) {
            return Err(PlrError::Denied(path.to_path_buf()));
        }
    }

    if target.exists() {
        if same_file(source, target) {
            return Err(PlrError::SameFile(target.to_path_buf()));
        }
        if !cfg.allow_overwrite {
            return Err(PlrError::Collision(target.to_path_buf()));
        }
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| PlrError::access(parent, e))?;
    }

    match op.kind {
        OperationKind::Copy => copy_any(source, target)?,
        OperationKind::Move if cfg.copy_then_delete => copy_then_delete(source, target)?,
        OperationKind::Move => match fs::rename(source, target) {
            Ok(()) => {}
            Err(e) if is_cross_device(&e) => {
                debug!(source = %source.display(), "rename crosses devices, copying instead");
                copy_then_delete(source, target)?;
            }
            Err(e) => return Err(PlrError::access(source, e)),
        },
    }
    Ok(target.to_path_buf())
}

/// Runs a plan and returns one result per operation, in input order.
///
/// Operations that touch a common path, as source or target, run one after
/// another in submission order; unrelated operations run concurrently up to
/// `cfg.concurrency`.
///
/// Progress, when requested, is offered after every operation with
/// `try_send`: a full or closed channel drops the update and never stalls
/// the batch. `completed` is cumulative, so the latest update received is
/// always current.
pub async fn organize(
    operations: Vec<OrganizeOperation>,
    cfg: &OrganizeConfig,
    progress: Option<mpsc::Sender<OrganizeProgress>>,
) -> Vec<OrganizeResult> {
    let total = operations.len();
    let sources: Vec<PathBuf> = operations.iter().map(|op| op.source.clone()).collect();
    let mut results: Vec<Option<OrganizeResult>> = (0..total).map(|_| None).collect();

    let semaphore = Arc::new(Semaphore::new(cfg.concurrency.max(1)));
    let completed = Arc::new(AtomicUsize::new(0));
    let mut join_set: JoinSet<Vec<(usize, OrganizeResult)>> = JoinSet::new();

    for group in group_by_shared_path(operations) {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };
        let cfg = cfg.clone();
        let completed = completed.clone();
        let progress = progress.clone();
        join_set.spawn_blocking(move || {
            let _permit = permit;
            group
                .into_iter()
                .map(|(idx, op)| {
                    let result = run_one(&op, &cfg);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(tx) = &progress {
                        let _ = tx.try_send(OrganizeProgress {
                            completed: done,
                            total,
                            source: op.source.clone(),
                            success: result.success,
                        });
                    }
                    (idx, result)
                })
                .collect()
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(batch) => {
                for (idx, result) in batch {
                    results[idx] = Some(result);
                }
            }
            Err(e) => warn!(error = %e, "organize worker failed"),
        }
    }

    let results: Vec<OrganizeResult> = results
        .into_iter()
        .zip(sources)
        .map(|(slot, source)| {
            slot.unwrap_or_else(|| OrganizeResult::failed(source, "operation was not attempted"))
        })
        .collect();
    let succeeded = results.iter().filter(|r| r.success).count();
    info!(total, succeeded, failed = total - succeeded, "organize batch complete");
    results
}

fn run_one(op: &OrganizeOperation, cfg: &OrganizeConfig) -> OrganizeResult {
    match apply_operation(op, cfg) {
        Ok(target) => {
            debug!(source = %op.source.display(), target = %target.display(), "organized");
            OrganizeResult::ok(op.source.clone(), target)
        }
        Err(e) => {
            warn!(source = %op.source.display(), kind = e.kind(), error = %e, "organize failed");
            OrganizeResult::failed(op.source.clone(), e)
        }
    }
}

/// Joins operations whose normalized source or target paths overlap, so
/// `[A->B, C->A]` runs in order. Groups keep first-occurrence order, and
/// operations inside a group keep submission order.
fn group_by_shared_path(
    operations: Vec<OrganizeOperation>,
) -> Vec<Vec<(usize, OrganizeOperation)>> {
    let mut parent: Vec<usize> = (0..operations.len()).collect();
    let mut owner: HashMap<PathBuf, usize> = HashMap::new();
    for (idx, op) in operations.iter().enumerate() {
        for key in [paths::normalize(&op.source), paths::normalize(&op.target)] {
            match owner.get(&key) {
                Some(&other) => union(&mut parent, idx, other),
                None => {
                    owner.insert(key, idx);
                }
            }
        }
    }

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<(usize, OrganizeOperation)>> = Vec::new();
    for (idx, op) in operations.into_iter().enumerate() {
        let root = find(&mut parent, idx);
        let slot = *slots.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push((idx, op));
    }
    groups
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    const EXDEV: i32 = 18;
    #[cfg(windows)]
    const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
    #[cfg(not(any(unix, windows)))]
    const EXDEV: i32 = -1;
    err.raw_os_error() == Some(EXDEV)
}

fn copy_then_delete(source: &Path, target: &Path) -> PlrResult<()> {
    copy_any(source, target)?;
    let removed = if source.is_dir() {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    };
    removed.map_err(|e| PlrError::access(source, e))
}

fn copy_any(source: &Path, target: &Path) -> PlrResult<()> {
    if source.is_dir() {
        copy_dir_recursive(source, target)
    } else {
        fs::copy(source, target).map_err(|e| PlrError::access(source, e))?;
        Ok(())
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> PlrResult<()> {
    fs::create_dir_all(dest).map_err(|e| PlrError::access(dest, e))?;
    for entry in fs::read_dir(src).map_err(|e| PlrError::access(src, e))? {
        let entry = entry?;
        let dest_child = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dest_child)?;
        } else {
            fs::copy(entry.path(), &dest_child).map_err(|e| PlrError::access(entry.path(), e))?;
        }
    }
    Ok(())
}
