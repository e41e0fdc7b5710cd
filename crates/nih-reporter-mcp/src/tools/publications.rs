//! Publication-link search tool.

use serde_json::{Value, json};

use super::{McpTool, ToolContext};
use crate::config::limits;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{Pagination, SearchPublicationsInput};

/// Search publications linked to NIH projects.
pub struct SearchPublicationsTool;

#[async_trait::async_trait]
impl McpTool for SearchPublicationsTool {
    fn name(&self) -> &'static str {
        "search_publications"
    }

    fn description(&self) -> &'static str {
        "Search publications linked to NIH projects by PubMed ID, core project number, \
         or publication year."
    }

    fn input_schema(&self) -> Value {
        let mut props = super::publication_properties();
        props.insert("limit".into(), super::limit_schema(limits::DEFAULT_LIMIT));
        props.insert("offset".into(), super::offset_schema());
        props.insert("response_format".into(), super::response_format_schema());

        json!({
            "type": "object",
            "properties": props
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String> {
        let params: SearchPublicationsInput = super::parse_input(&input)?;
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
            .search_publications(&criteria, page)
            .await
            .map_err(ToolError::from)?;

        tracing::info!(
            tool = self.name(),
            criteria = %criteria.summary(),
            returned = result.len(),
            total = result.total_count,
            "Publication search completed"
        );

        if params.response_format.is_markdown() {
            Ok(formatters::format_publications_markdown(&result))
        } else {
            Ok(serde_json::to_string_pretty(&formatters::publications_json(&result))?)
        }
    }
}
