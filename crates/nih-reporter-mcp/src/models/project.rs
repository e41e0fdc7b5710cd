//! Normalized project record.

use serde::{Deserialize, Serialize};

/// A funded NIH project, in the stable shape returned to callers.
///
/// Optional values serialize as `null` rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Full project number; deduplication key.
    pub id: String,

    pub appl_id: Option<u64>,

    /// Project number without the support-year suffix.
    pub core_project_num: Option<String>,

    pub title: String,

    pub abstract_text: Option<String>,

    /// Public health relevance statement.
    pub phr_text: Option<String>,

    pub pi_names: Vec<String>,

    pub organization: Organization,

    pub award_amount: Option<f64>,

    pub fiscal_year: Option<i32>,

    pub project_start_date: Option<String>,

    pub project_end_date: Option<String>,

    /// True when any COVID-19 response category applies.
    pub is_covid: bool,

    pub covid_response: Vec<String>,

    pub funding_mechanism: Option<String>,

    /// Administering Institute/Center code.
    pub agency_ic_admin: Option<String>,

    pub rcdc_terms: Vec<String>,

    pub study_section: Option<StudySection>,

    pub project_detail_url: Option<String>,

    /// PMIDs linked to this project (filled by combined search).
    pub related_publications: Vec<String>,
}

/// Awardee organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub org_type: Option<String>,
    pub department: Option<String>,
}

impl Organization {
    /// "Name, City, ST" from whichever parts are present.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.name, &self.city, &self.state]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if parts.is_empty() { None } else { Some(parts.join(", ")) }
    }
}

/// Scientific review group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySection {
    pub name: Option<String>,
    pub srg_code: Option<String>,
}

impl ProjectRecord {
    /// Key that links publications to this project.
    #[must_use]
    pub fn link_key(&self) -> &str {
        self.core_project_num.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_abstract_serializes_as_null() {
        let record = ProjectRecord { id: "R01CA1".into(), ..Default::default() };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.as_object().unwrap().contains_key("abstract_text"));
        assert!(json["abstract_text"].is_null());
    }

    #[test]
    fn test_organization_display() {
        let org = Organization {
            name: Some("JOHNS HOPKINS UNIVERSITY".into()),
            state: Some("MD".into()),
            ..Default::default()
        };
        assert_eq!(org.display().as_deref(), Some("JOHNS HOPKINS UNIVERSITY, MD"));
        assert_eq!(Organization::default().display(), None);
    }
}
