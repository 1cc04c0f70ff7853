//! Request/response contract the UI process talks to.
//!
//! Every call is one request answered by one structured response. Per-item
//! failures travel inside the response (`null` records, `success: false`
//! results); only malformed requests fail the call itself.

use crate::picker::FolderPicker;
use anyhow::Context;
use plr_core::analyzer;
use plr_core::config::AppConfig;
use plr_core::duplicates::{self, DuplicateGroup};
use plr_core::extractor;
use plr_core::models::{
    AnalysisRecord, FileRecord, OrganizeOperation, OrganizeProgress, OrganizeResult,
};
use plr_core::organizer;
use plr_core::scanner::{self, ScanReport, ScanRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectFoldersResponse {
    pub canceled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A request as it arrives over the wire: `{"channel": ..., "args": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "channel", content = "args", rename_all = "kebab-case")]
pub enum BridgeRequest {
    SelectFolders,
    ScanFolders(ScanRequest),
    AnalyzePlrFile(String),
    AnalyzePlrFiles(Vec<String>),
    OrganizeFiles(Vec<OrganizeOperation>),
    ExtractZip(String, String),
    FindDuplicates(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(error: &anyhow::Error) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(format!("{error:#}")),
        }
    }
}

pub struct Bridge {
    config: AppConfig,
    picker: Arc<dyn FolderPicker>,
}

impl Bridge {
    pub fn new(config: AppConfig, picker: Arc<dyn FolderPicker>) -> Self {
        Self { config, picker }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn select_folders(&self) -> SelectFoldersResponse {
        match self.picker.pick().await {
            Some(paths) => SelectFoldersResponse {
                canceled: false,
                paths: Some(paths),
            },
            None => SelectFoldersResponse {
                canceled: true,
                paths: None,
            },
        }
    }

    /// Files plus one error per root that could not be read.
    pub async fn scan_report(&self, request: ScanRequest) -> anyhow::Result<ScanReport> {
        let report = scanner::scan(request, self.config.scan.clone()).await?;
        for failure in &report.errors {
            warn!(root = %failure.root, error = %failure.error, "scan root skipped");
        }
        Ok(report)
    }

    /// Wire shape of `scan-folders`: unreadable roots are logged and left out.
    pub async fn scan_folders(&self, request: ScanRequest) -> anyhow::Result<Vec<FileRecord>> {
        Ok(self.scan_report(request).await?.files)
    }

    /// `None` when the file could not be analyzed at all.
    pub async fn analyze_plr_file(&self, path: &str) -> Option<AnalysisRecord> {
        let path = PathBuf::from(path);
        let outcome = task::spawn_blocking(move || analyzer::analyze_file(&path)).await;
        match outcome {
            Ok(Ok(record)) => Some(record),
            Ok(Err(e)) => {
                warn!(kind = e.kind(), error = %e, "analysis failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "analysis worker failed");
                None
            }
        }
    }

    pub async fn analyze_plr_files(&self, paths: Vec<String>) -> Vec<Option<AnalysisRecord>> {
        let paths = paths.into_iter().map(PathBuf::from).collect();
        analyzer::analyze_batch(paths, self.config.analysis.concurrency)
            .await
            .into_iter()
            .map(|outcome| match outcome {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "analysis failed");
                    None
                }
            })
            .collect()
    }

    pub async fn organize_files(&self, operations: Vec<OrganizeOperation>) -> Vec<OrganizeResult> {
        organizer::organize(operations, &self.config.organize, None).await
    }

    /// Progress updates are dropped while `progress` is full, so a slow
    /// receiver only misses intermediate counts.
    pub async fn organize_files_with_progress(
        &self,
        operations: Vec<OrganizeOperation>,
        progress: mpsc::Sender<OrganizeProgress>,
    ) -> Vec<OrganizeResult> {
        organizer::organize(operations, &self.config.organize, Some(progress)).await
    }

    pub async fn extract_zip(&self, zip_path: &str, target_path: &str) -> ExtractResponse {
        let zip_path = PathBuf::from(zip_path);
        let target = PathBuf::from(target_path);
        let limits = self.config.extract.clone();
        let outcome =
            task::spawn_blocking(move || extractor::extract_zip(&zip_path, &target, &limits)).await;
        match outcome {
            Ok(Ok(_)) => ExtractResponse {
                success: true,
                error: None,
            },
            Ok(Err(e)) => {
                warn!(kind = e.kind(), error = %e, "extraction failed");
                ExtractResponse {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
            Err(e) => ExtractResponse {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Analyzes the given files and groups identical content.
    pub async fn find_duplicates(&self, paths: Vec<String>) -> Vec<DuplicateGroup> {
        let records: Vec<AnalysisRecord> = self
            .analyze_plr_files(paths)
            .await
            .into_iter()
            .flatten()
            .collect();
        duplicates::find_duplicates(&records)
    }

    pub async fn dispatch(&self, request: BridgeRequest) -> anyhow::Result<Value> {
        let value = match request {
            BridgeRequest::SelectFolders => serde_json::to_value(self.select_folders().await)?,
            BridgeRequest::ScanFolders(req) => serde_json::to_value(self.scan_folders(req).await?)?,
            BridgeRequest::AnalyzePlrFile(path) => {
                serde_json::to_value(self.analyze_plr_file(&path).await)?
            }
            BridgeRequest::AnalyzePlrFiles(paths) => {
                serde_json::to_value(self.analyze_plr_files(paths).await)?
            }
            BridgeRequest::OrganizeFiles(ops) => {
                serde_json::to_value(self.organize_files(ops).await)?
            }
            BridgeRequest::ExtractZip(zip_path, target) => {
                serde_json::to_value(self.extract_zip(&zip_path, &target).await)?
            }
            BridgeRequest::FindDuplicates(paths) => {
                serde_json::to_value(self.find_duplicates(paths).await)?
            }
        };
        Ok(value)
    }

    /// Parses and answers one raw request. Never fails: whole-call errors
    /// come back as `ok: false`.
    pub async fn handle_json(&self, raw: &str) -> BridgeResponse {
        let request: anyhow::Result<BridgeRequest> =
            serde_json::from_str(raw).context("malformed bridge request");
        let outcome = match request {
            Ok(request) => {
                debug!(?request, "bridge request");
                self.dispatch(request).await
            }
            Err(e) => Err(e),
        };
        match outcome {
            Ok(value) => BridgeResponse::success(value),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "bridge call failed");
                BridgeResponse::failure(&e)
            }
        }
    }
}
