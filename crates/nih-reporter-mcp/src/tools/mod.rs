//! MCP tool implementations.
//!
//! Each tool module provides a unit struct that:
//! 1. Parses and validates input parameters into [`SearchCriteria`](crate::models::SearchCriteria)
//! 2. Calls the NIH RePORTER client
//! 3. Formats results as JSON or Markdown

mod combined;
mod connection;
mod projects;
mod publications;

pub use combined::SearchCombinedTool;
pub use connection::TestConnectionTool;
pub use projects::SearchProjectsTool;
pub use publications::SearchPublicationsTool;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::client::ReporterClient;
use crate::config::limits;
use crate::error::{ToolError, ToolResult};

/// Tool execution context.
pub struct ToolContext {
    /// API client.
    pub client: Arc<ReporterClient>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<ReporterClient>) -> Self {
        Self { client }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_projects").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(SearchProjectsTool),
        Box::new(SearchPublicationsTool),
        Box::new(SearchCombinedTool),
        Box::new(TestConnectionTool),
    ]
}

/// Deserialize tool arguments, naming the offending argument on failure.
///
/// Inputs flatten their criteria, which drops serde's field context, so a
/// failed parse is replayed one argument at a time to find the culprit.
pub fn parse_input<T: DeserializeOwned>(input: &Value) -> ToolResult<T> {
    let Value::Object(args) = input else {
        return Err(ToolError::validation("arguments", "must be a JSON object"));
    };

    serde_json::from_value(input.clone()).map_err(|err| {
        for (key, value) in args {
            let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            if let Err(e) = serde_json::from_value::<T>(single) {
                return ToolError::validation(key.as_str(), e.to_string());
            }
        }
        ToolError::validation("arguments", err.to_string())
    })
}

/// A list filter: JSON array or comma-separated string.
fn list_schema(description: &str) -> Value {
    json!({
        "oneOf": [
            {"type": "string"},
            {"type": "array", "items": {"type": ["string", "integer"]}}
        ],
        "description": description
    })
}

fn limit_schema(default: u32) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": limits::MAX_LIMIT,
        "default": default
    })
}

fn offset_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "maximum": limits::MAX_OFFSET,
        "default": 0
    })
}

fn response_format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["json", "markdown"],
        "default": "json"
    })
}

/// Publication-domain filters.
fn publication_properties() -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("pmids".into(), list_schema("PubMed IDs, e.g. \"33298401,34567890\""));
    props.insert(
        "project_nums".into(),
        list_schema("Core project numbers, e.g. \"R01CA123456\" (alias: core_project_nums)"),
    );
    props.insert("publication_years".into(), list_schema("Publication years, e.g. \"2022,2023\""));
    props
}

/// Project-domain filters.
fn project_properties() -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("fiscal_years".into(), list_schema("Fiscal years, e.g. \"2022,2023\""));
    props.insert("pi_names".into(), list_schema("Principal investigator names"));
    props.insert("organization".into(), list_schema("Organization names"));
    props.insert("org_state".into(), list_schema("Two-letter state codes, e.g. \"CA\""));
    props.insert("org_city".into(), list_schema("Organization cities"));
    props.insert("org_type".into(), list_schema("Organization types, e.g. \"SCHOOLS OF MEDICINE\""));
    props.insert("org_department".into(), list_schema("Department types, e.g. \"BIOCHEMISTRY\""));
    props.insert("min_amount".into(), json!({"type": "number", "minimum": 0, "description": "Minimum award amount"}));
    props.insert("max_amount".into(), json!({"type": "number", "minimum": 0, "description": "Maximum award amount"}));
    props.insert(
        "covid_response".into(),
        list_schema("COVID-19 response categories: Reg-CV, CV, C3, C4, C5, C6"),
    );
    props.insert(
        "funding_mechanism".into(),
        json!({"type": "string", "description": "Activity code, e.g. \"R01\", \"K99\""}),
    );
    props.insert("ic_code".into(), list_schema("Institute/Center codes, e.g. \"NCI\""));
    props.insert("rcdc_terms".into(), list_schema("RCDC spending categories"));
    props.insert("start_date".into(), json!({"type": "string", "format": "date", "description": "Project start on or after (YYYY-MM-DD)"}));
    props.insert("end_date".into(), json!({"type": "string", "format": "date", "description": "Project end on or before (YYYY-MM-DD)"}));
    props.insert(
        "text_search".into(),
        json!({"type": "string", "description": "Terms searched in titles, terms and abstracts"}),
    );
    props.insert(
        "newly_added_only".into(),
        json!({"type": "boolean", "default": false, "description": "Only projects added in the latest weekly update"}),
    );
    props
}
