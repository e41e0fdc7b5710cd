//! Input models for MCP tool parameters.

use serde::{Deserialize, Serialize};

use super::{CriteriaInput, ResponseFormat, Scalar};

/// Input for project search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchProjectsInput {
    /// Search filters.
    #[serde(flatten)]
    pub criteria: CriteriaInput,

    /// Maximum projects to return (default 10, max 500).
    #[serde(default)]
    pub limit: Option<Scalar>,

    /// Records to skip.
    #[serde(default)]
    pub offset: Option<Scalar>,

    /// Include abstract and public health relevance text.
    #[serde(default = "default_true")]
    pub include_abstracts: bool,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for publication search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPublicationsInput {
    /// Search filters; only PMIDs, project numbers and publication years apply.
    #[serde(flatten)]
    pub criteria: CriteriaInput,

    /// Maximum publications to return (default 10, max 500).
    #[serde(default)]
    pub limit: Option<Scalar>,

    /// Records to skip.
    #[serde(default)]
    pub offset: Option<Scalar>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for combined project + publication search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCombinedInput {
    /// Search filters shared by both domains.
    #[serde(flatten)]
    pub criteria: CriteriaInput,

    /// Maximum projects to return (default 10, max 500).
    #[serde(default)]
    pub limit: Option<Scalar>,

    /// Maximum publications to return (default 100, max 500).
    #[serde(default)]
    pub publication_limit: Option<Scalar>,

    /// Fetch publications at all.
    #[serde(default = "default_true")]
    pub include_publications: bool,

    /// Include project abstracts.
    #[serde(default = "default_true")]
    pub include_abstracts: bool,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl Default for SearchCombinedInput {
    fn default() -> Self {
        Self {
            criteria: CriteriaInput::default(),
            limit: None,
            publication_limit: None,
            include_publications: true,
            include_abstracts: true,
            response_format: ResponseFormat::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projects_input_flattens_criteria() {
        let input: SearchProjectsInput = serde_json::from_value(json!({
            "fiscal_years": "2022,2023",
            "org_state": "ca",
            "limit": 25
        }))
        .unwrap();

        assert_eq!(input.limit, Some(Scalar::Int(25)));
        assert!(input.include_abstracts);
        let criteria = input.criteria.validate().unwrap();
        assert_eq!(criteria.fiscal_years, vec![2022, 2023]);
        assert_eq!(criteria.org_states, vec!["CA"]);
    }

    #[test]
    fn test_combined_defaults() {
        let input: SearchCombinedInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.include_publications);
        assert!(input.publication_limit.is_none());
        assert_eq!(input.response_format, ResponseFormat::Json);
    }
}
