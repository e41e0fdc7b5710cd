//! JSON output: the stable, structured shape returned to agents.

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::{CombinedResult, ProjectRecord, PublicationRecord, SearchResult};

/// Project page as `{ projects, total_count, has_more, ... }`.
#[must_use]
pub fn projects_json(page: &SearchResult<ProjectRecord>) -> Value {
    page_json("projects", page)
}

/// Publication page as `{ publications, total_count, has_more, ... }`.
#[must_use]
pub fn publications_json(page: &SearchResult<PublicationRecord>) -> Value {
    page_json("publications", page)
}

/// Combined result with two labeled sub-sequences.
///
/// `total_count` and `has_more` describe the project page; the publication
/// page carries its own counts.
#[must_use]
pub fn combined_json(result: &CombinedResult) -> Value {
    let mut obj = projects_json(&result.projects);

    if let Some(pubs) = &result.publications {
        obj["publications"] = json!(pubs.records);
        obj["publication_total_count"] = json!(pubs.total_count);
        obj["publications_has_more"] = json!(pubs.has_more);
        obj["duplicates_removed"] = json!(result.duplicates_removed);
    }

    obj
}

fn page_json<T: Serialize>(label: &str, page: &SearchResult<T>) -> Value {
    let mut obj = json!({
        "total_count": page.total_count,
        "returned": page.len(),
        "offset": page.offset,
        "limit": page.limit,
        "has_more": page.has_more,
    });
    obj[label] = json!(page.records);

    if let Some(note) = truncation_note(page) {
        obj["note"] = json!(note);
    }

    obj
}

/// Message telling the caller the page is not the whole result.
#[must_use]
pub fn truncation_note<T>(page: &SearchResult<T>) -> Option<String> {
    page.has_more.then(|| {
        format!(
            "Showing {} of {} matching records starting at offset {}; raise limit or offset to see more.",
            page.len(),
            page.total_count,
            page.offset
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_json_shape() {
        let page = SearchResult::new(
            vec![ProjectRecord { id: "R01".into(), title: "Test".into(), ..Default::default() }],
            1000,
            0,
            1,
        );

        let out = projects_json(&page);

        assert_eq!(out["projects"][0]["id"], "R01");
        assert_eq!(out["total_count"], 1000);
        assert_eq!(out["has_more"], true);
        assert!(out["projects"][0]["abstract_text"].is_null());
        assert!(out["note"].as_str().unwrap().contains("1 of 1000"));
    }

    #[test]
    fn test_no_note_on_complete_page() {
        let page = SearchResult::new(vec![PublicationRecord::default()], 1, 0, 10);
        let out = publications_json(&page);
        assert!(out.get("note").is_none());
        assert_eq!(out["returned"], 1);
    }
}
