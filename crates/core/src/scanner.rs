//! Walks root folders and collects file records filtered by extension.

use crate::config::ScanConfig;
use crate::models::FileRecord;
use crate::sniffer;
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub paths: Vec<String>,
    #[serde(default)]
    pub include_subfolders: bool,
    #[serde(default)]
    pub file_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootError {
    pub root: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub files: Vec<FileRecord>,
    pub errors: Vec<RootError>,
}

struct Filters {
    extensions: HashSet<String>,
    excludes: GlobSet,
    include_hidden: bool,
    follow_links: bool,
}

impl Filters {
    fn new(request: &ScanRequest, cfg: &ScanConfig) -> anyhow::Result<Self> {
        let extensions = request
            .file_types
            .iter()
            .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(Self {
            extensions,
            excludes: build_globset(&cfg.exclude)?,
            include_hidden: cfg.include_hidden,
            follow_links: cfg.follow_links,
        })
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        sniffer::extension_of(path)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    fn should_descend(&self, entry: &DirEntry) -> bool {
        // the root is always walked, even if it is hidden or excluded
        if entry.depth() == 0 {
            return true;
        }
        if self.excludes.is_match(entry.path()) {
            return false;
        }
        self.include_hidden || !is_hidden(entry.path())
    }
}

/// Blocking scan. Roots are walked in the order given, depth-first, with
/// directory entries sorted by file name, so an unchanged tree always
/// yields the same sequence.
pub fn scan_blocking(request: &ScanRequest, cfg: &ScanConfig) -> anyhow::Result<ScanReport> {
    let filters = Filters::new(request, cfg)?;
    let mut report = ScanReport::default();

    for root in &request.paths {
        let root_path = PathBuf::from(root);
        match fs::metadata(&root_path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(root = %root, "scan root is not a directory");
                report.errors.push(RootError {
                    root: root.clone(),
                    error: "not a directory".to_string(),
                });
                continue;
            }
            Err(e) => {
                warn!(root = %root, error = %e, "scan root is not accessible");
                report.errors.push(RootError {
                    root: root.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        }

        let before = report.files.len();
        walk_root(&root_path, request.include_subfolders, &filters, &mut report.files);
        debug!(root = %root, found = report.files.len() - before, "scanned root");
    }

    info!(
        files = report.files.len(),
        failed_roots = report.errors.len(),
        "scan complete"
    );
    Ok(report)
}

fn walk_root(root: &Path, recursive: bool, filters: &Filters, out: &mut Vec<FileRecord>) {
    let mut walker = WalkDir::new(root)
        .follow_links(filters.follow_links)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    for entry in walker.into_iter().filter_entry(|e| filters.should_descend(e)) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                // unreadable subtree or link cycle: skip it, keep going
                warn!(error = %e, "skipping entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !filters.accepts_extension(path) {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        out.push(FileRecord {
            path: path.to_string_lossy().into_owned(),
            name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: modified_time(&meta),
            file_type: sniffer::category_for_path(path),
        });
    }
}

/// Async wrapper running the walk on the blocking pool.
pub async fn scan(request: ScanRequest, cfg: ScanConfig) -> anyhow::Result<ScanReport> {
    task::spawn_blocking(move || scan_blocking(&request, &cfg)).await?
}

pub(crate) fn modified_time(meta: &fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .unwrap_or(std::time::UNIX_EPOCH)
        .into()
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
