//! Deploy Desk - chat command adapter over the turn queue
//!
//! Parses chat text, runs the command against the shared queue while holding
//! its lock, keeps the idle notifier in step with whoever holds the turn, and
//! returns the chat messages to post. Direct messages are delivered through
//! the `Messenger` port once the queue lock is released.

pub mod command;
pub mod constants;
pub mod replies;

pub use command::{Command, RemoveTarget};

use super::notifier::{ArmedReminder, TurnEvent, TurnNotifier};
use super::SharedQueue;
use crate::domain::{Entry, HolderId, TurnQueue};
use crate::error::Result;
use crate::port::{IdentityDirectory, Messenger};
use constants::{DEFAULT_COMMAND_PREFIX, DEFAULT_IDLE_TIMEOUT};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Desk configuration
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// How long a holder may keep the turn before being pinged
    pub idle_timeout: Duration,
    /// Keyword every command starts with
    pub command_prefix: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

/// A chat message addressed to the desk
#[derive(Debug, Clone)]
pub struct Invocation {
    pub holder: HolderId,
    pub text: String,
}

impl Invocation {
    pub fn new(holder: impl Into<HolderId>, text: impl Into<String>) -> Self {
        Self {
            holder: holder.into(),
            text: text.into(),
        }
    }
}

/// A message for the channel the command came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ChatMessage {
    /// Addressed to the caller
    Reply(String),
    /// Posted to the room
    Send(String),
}

/// One row of the queue overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub position: usize,
    pub holder: HolderId,
    pub display_name: String,
    pub metadata: String,
}

/// Queue overview for API consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueView {
    pub entries: Vec<EntryView>,
    /// Length of the current holder's leading run
    pub run_length: usize,
}

#[derive(Default)]
struct Outcome {
    messages: Vec<ChatMessage>,
    direct: Vec<(HolderId, &'static str)>,
}

impl Outcome {
    fn reply(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::Reply(text.into()));
    }

    fn send(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::Send(text.into()));
    }
}

/// Deploy Desk with injected dependencies
pub struct DeployDesk {
    queue: SharedQueue,
    notifier: Arc<TurnNotifier>,
    directory: Arc<dyn IdentityDirectory>,
    messenger: Arc<dyn Messenger>,
    config: DeskConfig,
}

impl DeployDesk {
    pub fn new(
        queue: SharedQueue,
        notifier: Arc<TurnNotifier>,
        directory: Arc<dyn IdentityDirectory>,
        messenger: Arc<dyn Messenger>,
        config: DeskConfig,
    ) -> Self {
        Self {
            queue,
            notifier,
            directory,
            messenger,
            config,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// The idle reminder currently pending, if any
    pub fn reminder(&self) -> Option<ArmedReminder> {
        self.notifier.armed()
    }

    /// Parse and run a chat message
    ///
    /// Text that is not a desk command yields no messages.
    pub async fn handle(&self, invocation: &Invocation) -> Result<Vec<ChatMessage>> {
        match Command::parse(&self.config.command_prefix, &invocation.text) {
            Some(command) => self.execute(&invocation.holder, command).await,
            None => {
                debug!(holder = %invocation.holder, "Ignoring non-command text");
                Ok(Vec::new())
            }
        }
    }

    /// Run a parsed command on behalf of `caller`
    pub async fn execute(&self, caller: &HolderId, command: Command) -> Result<Vec<ChatMessage>> {
        debug!(holder = %caller, command = ?command, "Executing desk command");
        let mut outcome = Outcome::default();

        {
            let mut queue = self.queue.lock().await;
            match command {
                Command::Help => outcome.send(replies::help(&self.config.command_prefix)),
                Command::Add { metadata } => self.add(&mut queue, caller, metadata, &mut outcome),
                Command::Done => self.done(&mut queue, caller, &mut outcome)?,
                Command::Current => self.current(&queue, caller, &mut outcome),
                Command::Next => self.next(&queue, caller, &mut outcome),
                Command::Remove {
                    target: RemoveTarget::Me,
                } => self.remove_me(&mut queue, caller, &mut outcome),
                Command::Remove {
                    target: RemoveTarget::Named(name),
                } => self.remove_named(&mut queue, &name, &mut outcome),
                Command::List => self.list(&queue, &mut outcome),
                Command::Dump => outcome.send(serde_json::to_string_pretty(queue.get())?),
                Command::Ping => {
                    outcome.send(replies::PONG);
                    outcome.reply(replies::REPLY_PONG);
                }
            }
        }

        self.deliver(&outcome.direct).await;
        Ok(outcome.messages)
    }

    /// Render notifier events as direct messages until the channel closes
    pub async fn relay(&self, mut events: mpsc::UnboundedReceiver<TurnEvent>) {
        info!("Turn event relay started");
        while let Some(event) = events.recv().await {
            match event {
                TurnEvent::StillWorking { holder } => {
                    self.deliver(&[(holder, replies::STILL_DEPLOYING)]).await;
                }
            }
        }
        info!("Turn event relay stopped");
    }

    /// Snapshot of the queue with display names resolved
    pub async fn overview(&self) -> QueueView {
        let queue = self.queue.lock().await;
        QueueView {
            entries: queue
                .get()
                .iter()
                .enumerate()
                .map(|(position, entry)| EntryView {
                    position,
                    holder: entry.holder.clone(),
                    display_name: self.name_of(&entry.holder),
                    metadata: entry.metadata.clone(),
                })
                .collect(),
            run_length: queue.first_group().len(),
        }
    }

    fn add(&self, queue: &mut TurnQueue, caller: &HolderId, metadata: String, outcome: &mut Outcome) {
        queue.push(caller.clone(), metadata);

        let length = queue.len();
        let is_current = queue.is_current(caller);
        let run_length = queue.first_group().len();
        info!(holder = %caller, length, "Holder joined the queue");

        if length == 1 {
            self.notifier.arm(caller.clone(), self.config.idle_timeout);
            outcome.reply(replies::GO_FOR_IT);
        } else if length == 2 && !is_current {
            outcome.reply(replies::UP_AFTER_CURRENT);
        } else if is_current && length == run_length {
            self.notifier.arm(caller.clone(), self.config.idle_timeout);
            outcome.reply(replies::deploying_in_a_row(run_length));
        } else {
            outcome.reply(replies::ahead_of_you(length - 1));
        }
    }

    fn done(&self, queue: &mut TurnQueue, caller: &HolderId, outcome: &mut Outcome) -> Result<()> {
        if !queue.contains(caller) {
            outcome.reply(replies::NOT_IN_QUEUE);
            return Ok(());
        }
        if !queue.is_current(caller) {
            outcome.reply(replies::NOT_YOUR_TURN);
            return Ok(());
        }

        let finished = queue.advance()?;
        info!(holder = %finished.holder, metadata = %finished.metadata, "Turn finished");

        if queue.is_current(caller) {
            self.notifier.arm(caller.clone(), self.config.idle_timeout);
            outcome.reply(replies::more_to_go(queue.first_group().len()));
        } else {
            outcome.reply(replies::NICE_JOB);
            self.hand_over(queue, outcome);
        }
        Ok(())
    }

    fn current(&self, queue: &TurnQueue, caller: &HolderId, outcome: &mut Outcome) {
        match queue.current() {
            None => outcome.send(replies::NOBODY),
            Some(_) if queue.is_current(caller) => outcome.reply(replies::YOU_ARE_DEPLOYING),
            Some(current) => outcome.send(replies::is_deploying(
                &self.name_of(&current.holder),
                &current.metadata,
                queue.first_group().len(),
            )),
        }
    }

    fn next(&self, queue: &TurnQueue, caller: &HolderId, outcome: &mut Outcome) {
        match queue.next() {
            None => outcome.send(replies::NOBODY),
            Some(_) if queue.is_next(caller) => outcome.reply(replies::YOU_ARE_NEXT),
            Some(next) => outcome.send(replies::is_next(&self.name_of(&next.holder))),
        }
    }

    fn remove_me(&self, queue: &mut TurnQueue, caller: &HolderId, outcome: &mut Outcome) {
        if !queue.contains(caller) {
            outcome.reply(replies::NOT_EVEN_QUEUED);
            return;
        }

        let was_current = queue.is_current(caller);
        let removed = queue.remove(caller);
        info!(holder = %caller, removed, "Holder left the queue");
        outcome.reply(replies::TOOK_YOU_OUT);

        if was_current {
            self.hand_over(queue, outcome);
        }
    }

    fn remove_named(&self, queue: &mut TurnQueue, name: &str, outcome: &mut Outcome) {
        let by_name = |entry: &Entry| self.name_of(&entry.holder) == name;

        let was_current = queue.is_current(by_name);
        let removed = queue.remove(by_name);
        if removed == 0 {
            outcome.send(replies::not_queued(name));
            return;
        }

        info!(name = %name, removed, was_current, "Holder removed from the queue by name");
        outcome.send(replies::removed(name));

        if was_current {
            self.hand_over(queue, outcome);
        }
    }

    fn list(&self, queue: &TurnQueue, outcome: &mut Outcome) {
        if queue.is_empty() {
            outcome.send(replies::NOBODY);
            return;
        }
        let names: Vec<String> = queue
            .get()
            .iter()
            .map(|entry| self.name_of(&entry.holder))
            .collect();
        outcome.send(replies::queue_listing(&names));
    }

    /// The head of the queue changed: tell the new holder, or stop the timer
    fn hand_over(&self, queue: &TurnQueue, outcome: &mut Outcome) {
        match queue.current() {
            Some(current) => {
                info!(holder = %current.holder, "Turn handed over");
                self.notifier
                    .arm(current.holder.clone(), self.config.idle_timeout);
                outcome.direct.push((current.holder.clone(), replies::YOUR_TURN));
            }
            None => {
                debug!("Queue drained, idle reminder cleared");
                self.notifier.cancel();
            }
        }
    }

    fn name_of(&self, holder: &HolderId) -> String {
        self.directory
            .display_name(holder)
            .unwrap_or_else(|| holder.to_string())
    }

    async fn deliver(&self, messages: &[(HolderId, &'static str)]) {
        for (to, text) in messages {
            if let Err(e) = self.messenger.send_direct(to, text).await {
                warn!(holder = %to, error = %e, "Direct message delivery failed");
            }
        }
    }
}
