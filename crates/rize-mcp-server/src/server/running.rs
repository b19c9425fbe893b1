use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext};

use crate::errors::McpError;
use crate::server::SERVER_NAME;
use crate::tools::Toolbox;

#[derive(Clone)]
pub(super) struct Running {
    toolbox: Toolbox,
}

impl Running {
    pub(super) fn new(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    fn list_tools_impl(&self) -> ListToolsResult {
        ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: self.toolbox.list(),
        }
    }

    /// Every call ends in a successful result; failures are spelled out in the text
    async fn call_tool_impl(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let text = self.toolbox.invoke(name, arguments).await;
        CallToolResult::success(vec![Content::text(text)])
    }
}

impl ServerHandler for Running {
    #[tracing::instrument(
        skip_all,
        fields(
            rize.mcp.tool_name = request.name.as_ref(),
            rize.mcp.request_id = %context.id
        )
    )]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call_tool_impl(&request.name, request.arguments).await)
    }

    #[tracing::instrument(skip_all)]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.list_tools_impl())
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                description: None,
                icons: None,
                title: Some("Rize AI Scheduler".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: Some("https://rize.io".to_string()),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
