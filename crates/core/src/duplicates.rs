//! Groups analysis records that share a content hash.

use crate::models::AnalysisRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub hash: String,
    pub size: u64,
    pub paths: Vec<String>,
}

/// Groups in order of first appearance; only hashes seen at least twice.
pub fn find_duplicates(records: &[AnalysisRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for record in records {
        match index.get(record.hash.as_str()) {
            Some(&slot) => groups[slot].paths.push(record.path.clone()),
            None => {
                index.insert(record.hash.as_str(), groups.len());
                groups.push(DuplicateGroup {
                    hash: record.hash.clone(),
                    size: record.size,
                    paths: vec![record.path.clone()],
                });
            }
        }
    }
    groups.retain(|g| g.paths.len() > 1);
    groups
}
