//! MCP server exposing the string analysis service over the Model Context
//! Protocol.
//!
//! Tools: create_string, get_string, list_strings,
//! filter_by_natural_language, delete_string.

pub mod params;

use params::*;
use crate::api::{AnalysisError, AnalysisService};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ok_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(e) => err_text(format!("failed to encode response: {}", e)),
    }
}

fn err_text(msg: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg)]))
}

/// Error content carrying the status code and message.
fn err_analysis(err: AnalysisError) -> Result<CallToolResult, McpError> {
    err_text(
        serde_json::json!({
            "status": err.status_code(),
            "error": err.to_string(),
        })
        .to_string(),
    )
}

fn respond<T: Serialize>(result: Result<T, AnalysisError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => ok_json(&value),
        Err(e) => err_analysis(e),
    }
}

// ---------------------------------------------------------------------------
// StrandMcpServer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct StrandMcpServer {
    service: AnalysisService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl StrandMcpServer {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Analyze a string and store it with its computed properties")]
    fn create_string(
        &self,
        Parameters(p): Parameters<CreateStringParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(p.validate().and_then(|value| self.service.create(value)))
    }

    #[tool(description = "Get a stored string and its properties by exact value")]
    fn get_string(
        &self,
        Parameters(p): Parameters<StringValueParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.service.get_by_value(&p.value))
    }

    #[tool(description = "List stored strings matching optional structured filters")]
    fn list_strings(
        &self,
        Parameters(p): Parameters<ListStringsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            p.into_criteria()
                .and_then(|criteria| self.service.list_by_filter(criteria)),
        )
    }

    #[tool(description = "List stored strings matching a natural-language query, e.g. 'palindromes longer than 5 characters'")]
    fn filter_by_natural_language(
        &self,
        Parameters(p): Parameters<NaturalLanguageParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            p.validate()
                .and_then(|query| self.service.list_by_natural_language(query)),
        )
    }

    #[tool(description = "Delete a stored string by exact value")]
    fn delete_string(
        &self,
        Parameters(p): Parameters<StringValueParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.delete_by_value(&p.value) {
            Ok(()) => Ok(CallToolResult::success(Vec::new())),
            Err(e) => err_analysis(e),
        }
    }
}

#[tool_handler]
impl ServerHandler for StrandMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Strand MCP server: analyze strings and query them with structured or natural-language filters"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run_mcp_server(service: AnalysisService) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let server = StrandMcpServer::new(service);

        tracing::info!("strand mcp server starting on stdio");

        let service = match server.serve(rmcp::transport::stdio()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("failed to start MCP server: {}", e);
                return 1;
            }
        };

        if let Err(e) = service.waiting().await {
            tracing::error!("MCP server error: {}", e);
            return 1;
        }

        0
    })
}
