//! Normalized publication record.

use serde::{Deserialize, Serialize};

/// A publication linked to NIH-funded projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// PMID as a string; deduplication key.
    pub id: String,

    pub pmid: Option<u64>,

    pub appl_ids: Vec<u64>,

    /// Core project numbers this publication is linked to.
    pub core_project_nums: Vec<String>,

    pub title: Option<String>,

    pub authors: Vec<String>,

    pub journal_title: Option<String>,

    pub publication_year: Option<i32>,

    pub doi: Option<String>,
}

impl PublicationRecord {
    /// Fold another link row for the same PMID into this record.
    pub fn merge_links(&mut self, other: &Self) {
        for num in &other.core_project_nums {
            if !self.core_project_nums.contains(num) {
                self.core_project_nums.push(num.clone());
            }
        }
        for appl in &other.appl_ids {
            if !self.appl_ids.contains(appl) {
                self.appl_ids.push(*appl);
            }
        }
        if self.title.is_none() {
            self.title.clone_from(&other.title);
        }
    }

    /// PubMed page URL.
    #[must_use]
    pub fn pubmed_url(&self) -> Option<String> {
        self.pmid.map(|p| format!("https://pubmed.ncbi.nlm.nih.gov/{p}/"))
    }
}
