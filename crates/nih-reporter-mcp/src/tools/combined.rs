//! Combined project + publication search tool.

use serde_json::{Value, json};

use super::{McpTool, ToolContext};
use crate::client::ReporterClient;
use crate::config::limits;
use crate::error::{ClientResult, ToolError, ToolResult};
use crate::formatters;
use crate::models::{
    CombinedResult, Pagination, ProjectRecord, PublicationRecord, SearchCombinedInput, SearchCriteria,
    SearchResult,
};

/// Projects plus the publications linked to them, merged into one result.
pub struct SearchCombinedTool;

#[async_trait::async_trait]
impl McpTool for SearchCombinedTool {
    fn name(&self) -> &'static str {
        "search_combined"
    }

    fn description(&self) -> &'static str {
        "Search NIH projects and their related publications in a single query. \
         Publications are deduplicated by PubMed ID and linked to the projects they cite."
    }

    fn input_schema(&self) -> Value {
        let mut props = super::project_properties();
        props.extend(super::publication_properties());
        props.insert("limit".into(), super::limit_schema(limits::DEFAULT_LIMIT));
        props.insert(
            "publication_limit".into(),
            super::limit_schema(limits::DEFAULT_PUBLICATION_LIMIT),
        );
        props.insert(
            "include_publications".into(),
            json!({"type": "boolean", "default": true}),
        );
        props.insert(
            "include_abstracts".into(),
            json!({"type": "boolean", "default": true}),
        );
        props.insert("response_format".into(), super::response_format_schema());

        json!({
            "type": "object",
            "properties": props
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: SearchCombinedInput = super::parse_input(&input)?;
        let criteria = params.criteria.validate()?;
        let project_page = Pagination::new(
            "limit",
            params.limit.as_ref(),
            None,
            limits::DEFAULT_LIMIT,
            limits::MAX_LIMIT,
        )?;
        let publication_page = Pagination::new(
            "publication_limit",
            params.publication_limit.as_ref(),
            None,
            limits::DEFAULT_PUBLICATION_LIMIT,
            limits::MAX_LIMIT,
        )?;

        let client = ctx.client.as_ref();
        let (projects, publications) = if !params.include_publications {
            let projects = client
                .search_projects(&criteria, project_page, params.include_abstracts)
                .await
                .map_err(ToolError::from)?;
            (projects, None)
        } else if criteria.has_publication_selectors() {
            // Caller-supplied selectors make the two calls independent.
            let (projects, publications) = tokio::try_join!(
                client.search_projects(&criteria, project_page, params.include_abstracts),
                client.search_publications(&criteria, publication_page),
            )
            .map_err(ToolError::from)?;
            (projects, Some(publications))
        } else {
            let projects = client
                .search_projects(&criteria, project_page, params.include_abstracts)
                .await
                .map_err(ToolError::from)?;
            let publications = publications_for(client, &projects, &criteria, publication_page)
                .await
                .map_err(ToolError::from)?;
            (projects, Some(publications))
        };

        let result = CombinedResult::merge(projects, publications);

        tracing::info!(
            tool = self.name(),
            criteria = %criteria.summary(),
            projects = result.projects.len(),
            publications = result.publications.as_ref().map_or(0, SearchResult::len),
            duplicates_removed = result.duplicates_removed,
            "Combined search completed"
        );

        if params.response_format.is_markdown() {
            Ok(formatters::format_combined_markdown(&result))
        } else {
            Ok(serde_json::to_string_pretty(&formatters::combined_json(&result))?)
        }
    }
}

/// Publications linked to the core project numbers of `projects`.
///
/// Skips the upstream call when no project carries a usable number, since an
/// unscoped publication search would return unrelated records.
async fn publications_for(
    client: &ReporterClient,
    projects: &SearchResult<ProjectRecord>,
    criteria: &SearchCriteria,
    page: Pagination,
) -> ClientResult<SearchResult<PublicationRecord>> {
    let mut project_nums: Vec<String> = Vec::new();
    for project in &projects.records {
        let key = project.link_key();
        if !key.is_empty() && !project_nums.iter().any(|n| n == key) {
            project_nums.push(key.to_string());
        }
    }

    if project_nums.is_empty() {
        return Ok(SearchResult::new(Vec::new(), 0, page.offset(), page.limit()));
    }

    let scoped = SearchCriteria {
        project_nums,
        publication_years: criteria.publication_years.clone(),
        ..SearchCriteria::default()
    };

    client.search_publications(&scoped, page).await
}
