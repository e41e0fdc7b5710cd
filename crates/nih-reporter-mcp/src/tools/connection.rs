//! Connection probe tool.

use serde_json::{Value, json};

use super::{McpTool, ToolContext};
use crate::error::{ToolError, ToolResult};
use crate::models::{Pagination, SearchCriteria};

/// Liveness check against the projects endpoint.
pub struct TestConnectionTool;

#[async_trait::async_trait]
impl McpTool for TestConnectionTool {
    fn name(&self) -> &'static str {
        "test_connection"
    }

    fn description(&self) -> &'static str {
        "Test the connection to the NIH RePORTER API with a single one-record project query."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, ctx: &ToolContext, _input: Value) -> ToolResult<String> {
        let probe = ctx
            .client
            .search_projects(&SearchCriteria::default(), Pagination::fixed(1, 0), false)
            .await;

        let body = match probe {
            Ok(page) => {
                tracing::info!(tool = self.name(), total = page.total_count, "Connection test succeeded");
                json!({
                    "status": "ok",
                    "detail": format!("Successfully connected to NIH RePORTER API at {}", ctx.client.base_url()),
                    "total_projects": page.total_count,
                })
            }
            Err(e) => {
                tracing::error!(tool = self.name(), error = %e, "Connection test failed");
                let upstream_status = e.status();
                let mut body = json!({
                    "status": "error",
                    "detail": format!("Connection test failed: {}", ToolError::from(e).to_user_message()),
                });
                if let Some(status) = upstream_status {
                    body["upstream_status"] = json!(status);
                }
                body
            }
        };

        Ok(serde_json::to_string_pretty(&body)?)
    }
}
