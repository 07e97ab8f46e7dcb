//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over TCP (localhost by default).

use crate::handler::RpcHandler;
use crate::types::{CommandRequest, InboxRequest, QueueRequest, StatusRequest};
use deployq_core::application::DeployDesk;
use deployq_infra_memory::{InMemoryDirectory, InMemoryMailbox};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9640;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        desk: Arc<DeployDesk>,
        directory: Arc<InMemoryDirectory>,
        mailbox: Arc<InMemoryMailbox>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(desk, directory, mailbox)),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("deploy.command.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CommandRequest = params.parse()?;
                    handler.command(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("deploy.queue.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.queue(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("deploy.inbox.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: InboxRequest = params.parse()?;
                    handler.inbox(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.status.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: StatusRequest = params.parse()?;
                    handler.status(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
