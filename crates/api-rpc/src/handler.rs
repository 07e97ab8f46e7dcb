//! RPC Method Handlers
//!
//! Translates JSON-RPC calls into desk invocations.

use crate::error::{require_non_blank, to_rpc_error};
use crate::types::{
    CommandRequest, CommandResponse, InboxRequest, InboxResponse, QueueRequest, QueueResponse,
    StatusRequest, StatusResponse,
};
use deployq_core::application::{DeployDesk, Invocation};
use deployq_core::domain::HolderId;
use deployq_infra_memory::{InMemoryDirectory, InMemoryMailbox};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::debug;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    desk: Arc<DeployDesk>,
    directory: Arc<InMemoryDirectory>,
    mailbox: Arc<InMemoryMailbox>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(
        desk: Arc<DeployDesk>,
        directory: Arc<InMemoryDirectory>,
        mailbox: Arc<InMemoryMailbox>,
    ) -> Self {
        Self {
            desk,
            directory,
            mailbox,
            start_time: std::time::Instant::now(),
        }
    }

    /// deploy.command.v1
    pub async fn command(
        &self,
        params: CommandRequest,
    ) -> Result<CommandResponse, ErrorObjectOwned> {
        require_non_blank("user_id", &params.user_id)?;

        let holder = HolderId::new(params.user_id.trim());
        if let Some(name) = &params.display_name {
            self.directory.register(&holder, name);
        }

        debug!(holder = %holder, text = %params.text, "deploy.command.v1");
        let messages = self
            .desk
            .handle(&Invocation {
                holder,
                text: params.text,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(CommandResponse { messages })
    }

    /// deploy.queue.v1
    pub async fn queue(&self, _params: QueueRequest) -> Result<QueueResponse, ErrorObjectOwned> {
        let view = self.desk.overview().await;
        Ok(QueueResponse {
            entries: view.entries,
            run_length: view.run_length,
        })
    }

    /// deploy.inbox.v1
    pub async fn inbox(&self, params: InboxRequest) -> Result<InboxResponse, ErrorObjectOwned> {
        require_non_blank("user_id", &params.user_id)?;

        let holder = HolderId::new(params.user_id.trim());
        let messages = self.mailbox.drain(&holder);
        Ok(InboxResponse {
            user_id: holder.to_string(),
            messages,
        })
    }

    /// admin.status.v1
    pub async fn status(&self, _params: StatusRequest) -> Result<StatusResponse, ErrorObjectOwned> {
        let view = self.desk.overview().await;
        let reminder = self.desk.reminder();

        Ok(StatusResponse {
            version: deployq_core::VERSION.to_string(),
            queue_length: view.entries.len(),
            current_holder: view.entries.first().map(|e| e.display_name.clone()),
            reminder_holder: reminder.as_ref().map(|r| r.holder.to_string()),
            reminder_deadline_millis: reminder.map(|r| r.deadline_millis),
            idle_timeout_secs: self.desk.config().idle_timeout.as_secs(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployq_core::application::desk::replies;
    use deployq_core::application::{shared_queue, ChatMessage, DeskConfig, TurnNotifier};
    use deployq_core::port::time_provider::SystemTimeProvider;
    use tokio::sync::mpsc;

    fn handler() -> RpcHandler {
        let queue = shared_queue();
        let (tx, _rx) = mpsc::unbounded_channel();
        let notifier = Arc::new(TurnNotifier::new(
            Arc::clone(&queue),
            tx,
            Arc::new(SystemTimeProvider),
        ));
        let directory = Arc::new(InMemoryDirectory::new());
        let mailbox = Arc::new(InMemoryMailbox::default());
        let desk = Arc::new(DeployDesk::new(
            queue,
            notifier,
            directory.clone(),
            mailbox.clone(),
            DeskConfig::default(),
        ));
        RpcHandler::new(desk, directory, mailbox)
    }

    fn command(user_id: &str, name: &str, text: &str) -> CommandRequest {
        CommandRequest {
            user_id: user_id.to_string(),
            display_name: Some(name.to_string()),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_command_registers_name_and_replies() {
        let handler = handler();

        let response = handler
            .command(command("U1", "alice", "deploy add svcA"))
            .await
            .unwrap();
        assert_eq!(
            response.messages,
            vec![ChatMessage::Reply(replies::GO_FOR_IT.to_string())]
        );

        let queue = handler.queue(QueueRequest {}).await.unwrap();
        assert_eq!(queue.entries.len(), 1);
        assert_eq!(queue.entries[0].display_name, "alice");
        assert_eq!(queue.entries[0].metadata, "svcA");
        assert_eq!(queue.run_length, 1);
    }

    #[tokio::test]
    async fn test_handover_lands_in_inbox() {
        let handler = handler();
        handler.command(command("U1", "alice", "deploy add")).await.unwrap();
        handler.command(command("U2", "bob", "deploy add")).await.unwrap();
        handler.command(command("U1", "alice", "deploy done")).await.unwrap();

        let inbox = handler
            .inbox(InboxRequest {
                user_id: "U2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(inbox.messages, vec![replies::YOUR_TURN]);

        let status = handler.status(StatusRequest {}).await.unwrap();
        assert_eq!(status.queue_length, 1);
        assert_eq!(status.current_holder.as_deref(), Some("bob"));
        assert_eq!(status.reminder_holder.as_deref(), Some("U2"));
    }

    #[tokio::test]
    async fn test_blank_user_is_rejected() {
        let handler = handler();
        let err = handler
            .command(command(" ", "ghost", "deploy add"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error::code::VALIDATION_ERROR);
    }
}
