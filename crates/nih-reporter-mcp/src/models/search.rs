//! Upstream response envelope and the normalized result page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProjectRecord, PublicationRecord};

/// Raw response from a RePORTER search endpoint.
///
/// Items are kept as JSON values; the normalizer resolves fields from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Paging metadata.
    #[serde(default)]
    pub meta: ApiMeta,

    /// Result items in upstream order. Required: a body without it is not a
    /// search response.
    pub results: Vec<Value>,
}

/// `meta` block of a RePORTER response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMeta {
    /// Total records matching the criteria.
    #[serde(default)]
    pub total: Option<u64>,
}

/// One normalized page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Records in upstream order.
    pub records: Vec<T>,

    /// Total records matching upstream.
    pub total_count: u64,

    /// Offset this page started at.
    pub offset: u32,

    /// Page size requested.
    pub limit: u32,

    /// True when more records exist past this page.
    pub has_more: bool,
}

impl<T> SearchResult<T> {
    /// Build a page, computing `has_more` as `offset + returned < total`.
    #[must_use]
    pub fn new(records: Vec<T>, total_count: u64, offset: u32, limit: u32) -> Self {
        let has_more = u64::from(offset) + (records.len() as u64) < total_count;
        Self { records, total_count, offset, limit, has_more }
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Projects and their publications from one combined search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedResult {
    pub projects: SearchResult<ProjectRecord>,

    /// `None` when publications were not requested.
    pub publications: Option<SearchResult<PublicationRecord>>,

    /// Publication rows folded into an earlier record with the same PMID.
    pub duplicates_removed: usize,
}

impl CombinedResult {
    /// Merge both pages: publications are deduplicated by identifier (first
    /// occurrence wins, project links are unioned) and each project lists the
    /// PMIDs linked to it. Paging counts stay as reported upstream.
    #[must_use]
    pub fn merge(
        mut projects: SearchResult<ProjectRecord>,
        publications: Option<SearchResult<PublicationRecord>>,
    ) -> Self {
        let Some(mut publications) = publications else {
            return Self { projects, publications: None, duplicates_removed: 0 };
        };

        let mut unique: Vec<PublicationRecord> = Vec::with_capacity(publications.records.len());
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicates_removed = 0;

        for record in publications.records.drain(..) {
            if record.id.is_empty() {
                unique.push(record);
                continue;
            }
            if let Some(&idx) = seen.get(&record.id) {
                unique[idx].merge_links(&record);
                duplicates_removed += 1;
            } else {
                seen.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
        publications.records = unique;

        for project in &mut projects.records {
            let key = project.link_key().to_string();
            project.related_publications = publications
                .records
                .iter()
                .filter(|p| !p.id.is_empty() && p.core_project_nums.iter().any(|n| n == &key))
                .map(|p| p.id.clone())
                .collect();
        }

        Self { projects, publications: Some(publications), duplicates_removed }
    }
}
