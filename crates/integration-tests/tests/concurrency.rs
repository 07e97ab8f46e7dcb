//! Concurrency Tests
//!
//! Many callers hitting the desk at once must see a consistent head of queue.

use std::sync::Arc;

use deployq_core::application::desk::replies;
use deployq_core::application::{
    shared_queue, ChatMessage, DeployDesk, DeskConfig, Invocation, TurnEvent, TurnNotifier,
};
use deployq_core::port::time_provider::SystemTimeProvider;
use deployq_infra_memory::{InMemoryDirectory, InMemoryMailbox};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

fn desk() -> (
    Arc<DeployDesk>,
    Arc<InMemoryMailbox>,
    mpsc::UnboundedReceiver<TurnEvent>,
) {
    let queue = shared_queue();
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(TurnNotifier::new(
        queue.clone(),
        tx,
        Arc::new(SystemTimeProvider),
    ));
    let mailbox = Arc::new(InMemoryMailbox::default());
    let desk = Arc::new(DeployDesk::new(
        queue,
        notifier,
        Arc::new(InMemoryDirectory::new()),
        mailbox.clone(),
        DeskConfig::default(),
    ));
    (desk, mailbox, rx)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_keep_a_single_head() {
    let (desk, _mailbox, _events) = desk();

    let mut tasks = JoinSet::new();
    for i in 0..50 {
        let desk = desk.clone();
        tasks.spawn(async move {
            desk.handle(&Invocation::new(format!("U{i}"), "deploy add"))
                .await
                .unwrap()
        });
    }

    let mut go_for_it = 0;
    while let Some(result) = tasks.join_next().await {
        let messages = result.unwrap();
        if messages == vec![ChatMessage::Reply(replies::GO_FOR_IT.to_string())] {
            go_for_it += 1;
        }
    }

    assert_eq!(go_for_it, 1, "exactly one caller should get the empty queue");
    let view = desk.overview().await;
    assert_eq!(view.entries.len(), 50);

    let head = view.entries[0].holder.clone();
    assert_eq!(desk.reminder().map(|r| r.holder), Some(head));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_done_advances_once() {
    let (desk, mailbox, _events) = desk();
    desk.handle(&Invocation::new("U1", "deploy add")).await.unwrap();
    desk.handle(&Invocation::new("U2", "deploy add")).await.unwrap();

    let mut tasks = JoinSet::new();
    for _ in 0..10 {
        let desk = desk.clone();
        tasks.spawn(async move {
            desk.handle(&Invocation::new("U1", "deploy done"))
                .await
                .unwrap()
        });
    }

    let mut finished = 0;
    while let Some(result) = tasks.join_next().await {
        let messages = result.unwrap();
        if messages == vec![ChatMessage::Reply(replies::NICE_JOB.to_string())] {
            finished += 1;
        } else {
            assert_eq!(
                messages,
                vec![ChatMessage::Reply(replies::NOT_IN_QUEUE.to_string())]
            );
        }
    }

    assert_eq!(finished, 1);
    let view = desk.overview().await;
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].holder.as_str(), "U2");
    assert_eq!(mailbox.drain(&"U2".into()), vec![replies::YOUR_TURN]);
}
