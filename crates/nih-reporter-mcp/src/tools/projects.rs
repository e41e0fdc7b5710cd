//! Project search tool.

use serde_json::{Value, json};

use super::{McpTool, ToolContext};
use crate::config::limits;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{Pagination, SearchProjectsInput};

/// Filtered search over funded NIH projects.
pub struct SearchProjectsTool;

#[async_trait::async_trait]
impl McpTool for SearchProjectsTool {
    fn name(&self) -> &'static str {
        "search_projects"
    }

    fn description(&self) -> &'static str {
        "Search NIH-funded research projects by fiscal year, investigator, organization, \
         award amount, COVID-19 response, funding mechanism, Institute/Center, RCDC terms, \
         project dates, and free text. All filters are optional and combine with AND."
    }

    fn input_schema(&self) -> Value {
        let mut props = super::project_properties();
        props.insert(
            "project_nums".into(),
            super::list_schema("Project numbers, e.g. \"5R01CA123456-03\""),
        );
        props.insert("limit".into(), super::limit_schema(limits::DEFAULT_LIMIT));
        props.insert("offset".into(), super::offset_schema());
        props.insert(
            "include_abstracts".into(),
            json!({"type": "boolean", "default": true, "description": "Include abstract and public health relevance text"}),
        );
        props.insert("response_format".into(), super::response_format_schema());

        json!({
            "type": "object",
            "properties": props
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: SearchProjectsInput = super::parse_input(&input)?;
        let criteria = params.criteria.validate()?;
        let page = Pagination::new(
            "limit",
            params.limit.as_ref(),
            params.offset.as_ref(),
            limits::DEFAULT_LIMIT,
            limits::MAX_LIMIT,
        )?;

        let result = ctx
            .client
            .search_projects(&criteria, page, params.include_abstracts)
            .await
            .map_err(ToolError::from)?;

        tracing::info!(
            tool = self.name(),
            criteria = %criteria.summary(),
            returned = result.len(),
            total = result.total_count,
            "Project search completed"
        );

        if params.response_format.is_markdown() {
            Ok(formatters::format_projects_markdown(&result))
        } else {
            Ok(serde_json::to_string_pretty(&formatters::projects_json(&result))?)
        }
    }
}
