use bon::bon;
use rize_client::RizeClient;
use rmcp::{ServiceExt as _, transport::stdio};
use tracing::{error, info};

use crate::errors::ServerError;
use crate::tools::Toolbox;

mod running;

use running::Running;

/// The name reported to MCP clients
pub const SERVER_NAME: &str = "rize-ai-scheduler";

/// A Rize MCP Server, speaking MCP over stdio
pub struct Server {
    client: RizeClient,
}

#[bon]
impl Server {
    #[builder]
    pub fn new(client: RizeClient) -> Self {
        Self { client }
    }

    /// Serve until the client disconnects
    pub async fn start(self) -> Result<(), ServerError> {
        let running = Running::new(Toolbox::new(self.client));

        info!("Starting MCP server in stdio mode");
        let service = running
            .serve(stdio())
            .await
            .inspect_err(|e| {
                error!("serving error: {:?}", e);
            })
            .map_err(Box::new)?;
        let reason = service.waiting().await?;
        info!("MCP server stopped: {reason:?}");

        Ok(())
    }
}
