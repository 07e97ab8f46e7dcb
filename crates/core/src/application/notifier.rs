//! Turn Notifier - single-slot idle reminder for the current holder
//!
//! At most one reminder is pending at any time. Arming replaces the previous
//! reminder (last arm wins). When a reminder expires it re-checks, under the
//! queue lock, that it is still the live reminder and that its holder still
//! holds the turn before emitting `TurnEvent::StillWorking`.

use super::SharedQueue;
use crate::domain::HolderId;
use crate::port::TimeProvider;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Events emitted by the notifier for the desk to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The holder has had the turn for a full idle period
    StillWorking { holder: HolderId },
}

/// Public view of the pending reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedReminder {
    pub holder: HolderId,
    /// Expiry time in milliseconds since epoch
    pub deadline_millis: i64,
}

/// Handle to a scheduled reminder task
struct ScheduledReminder {
    generation: u64,
    reminder: ArmedReminder,
    abort: AbortHandle,
}

impl ScheduledReminder {
    fn cancel(self) {
        self.abort.abort();
        debug!(
            holder = %self.reminder.holder,
            generation = self.generation,
            "Idle reminder cancelled"
        );
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    pending: Option<ScheduledReminder>,
}

/// Idle-timeout notifier bound to the shared queue
pub struct TurnNotifier {
    queue: SharedQueue,
    events: mpsc::UnboundedSender<TurnEvent>,
    time_provider: Arc<dyn TimeProvider>,
    slot: Arc<Mutex<Slot>>,
}

impl TurnNotifier {
    pub fn new(
        queue: SharedQueue,
        events: mpsc::UnboundedSender<TurnEvent>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            queue,
            events,
            time_provider,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Start a countdown for `holder`, cancelling any pending one
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, holder: HolderId, duration: Duration) {
        let mut slot = lock_slot(&self.slot);
        if let Some(previous) = slot.pending.take() {
            previous.cancel();
        }

        slot.generation += 1;
        let generation = slot.generation;
        let deadline_millis = self
            .time_provider
            .now_millis()
            .saturating_add(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX));

        let task = tokio::spawn(expire(
            Arc::clone(&self.queue),
            Arc::clone(&self.slot),
            self.events.clone(),
            holder.clone(),
            generation,
            duration,
        ));

        info!(
            holder = %holder,
            generation,
            timeout_secs = duration.as_secs(),
            "Idle reminder armed"
        );

        slot.pending = Some(ScheduledReminder {
            generation,
            reminder: ArmedReminder {
                holder,
                deadline_millis,
            },
            abort: task.abort_handle(),
        });
    }

    /// Cancel the pending countdown, if any
    pub fn cancel(&self) {
        if let Some(pending) = lock_slot(&self.slot).pending.take() {
            pending.cancel();
        }
    }

    /// The reminder currently pending, if any
    pub fn armed(&self) -> Option<ArmedReminder> {
        lock_slot(&self.slot)
            .pending
            .as_ref()
            .map(|pending| pending.reminder.clone())
    }
}

impl Drop for TurnNotifier {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock_slot(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    // Slot state stays consistent across a panic, so a poisoned lock is usable
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn expire(
    queue: SharedQueue,
    slot: Arc<Mutex<Slot>>,
    events: mpsc::UnboundedSender<TurnEvent>,
    holder: HolderId,
    generation: u64,
    duration: Duration,
) {
    sleep(duration).await;

    // Same exclusion as queue mutations: nobody can advance or re-arm while
    // we decide whether this reminder is still meaningful.
    let queue = queue.lock().await;

    {
        let mut slot = lock_slot(&slot);
        let live = slot
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation);
        if !live {
            debug!(holder = %holder, generation, "Superseded idle reminder dropped");
            return;
        }
        slot.pending = None;
    }

    if !queue.is_current(&holder) {
        debug!(holder = %holder, generation, "Stale idle reminder dropped");
        return;
    }

    info!(holder = %holder, "Idle timeout reached, asking holder for status");
    if events.send(TurnEvent::StillWorking { holder }).is_err() {
        warn!("Turn event receiver dropped, reminder lost");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TurnQueue;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::sync::Mutex as AsyncMutex;
    use tokio::time::timeout;

    const IDLE: Duration = Duration::from_secs(10);

    fn setup(holders: &[&str]) -> (SharedQueue, TurnNotifier, mpsc::UnboundedReceiver<TurnEvent>) {
        let mut queue = TurnQueue::new();
        for holder in holders {
            queue.push(*holder, "");
        }
        let queue = Arc::new(AsyncMutex::new(queue));
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = TurnNotifier::new(
            Arc::clone(&queue),
            tx,
            Arc::new(FixedTimeProvider::new(1_000)),
        );
        (queue, notifier, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_notifies_current_holder() {
        let (_queue, notifier, mut rx) = setup(&["X"]);

        notifier.arm(HolderId::from("X"), IDLE);

        let event = timeout(IDLE * 2, rx.recv()).await.unwrap();
        assert_eq!(
            event,
            Some(TurnEvent::StillWorking {
                holder: HolderId::from("X")
            })
        );
        assert!(notifier.armed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_keeps_only_latest_countdown() {
        let (_queue, notifier, mut rx) = setup(&["X"]);

        notifier.arm(HolderId::from("X"), IDLE);
        sleep(Duration::from_secs(5)).await;
        notifier.arm(HolderId::from("X"), IDLE);

        // First countdown would have fired at t=10
        sleep(Duration::from_secs(6)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // Second fires at t=15
        sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_ok());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_reminder_after_advance_is_dropped() {
        let (queue, notifier, mut rx) = setup(&["X", "Y"]);

        notifier.arm(HolderId::from("X"), IDLE);
        queue.lock().await.advance().unwrap();

        sleep(IDLE + Duration::from_secs(1)).await;

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(notifier.armed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_notification() {
        let (_queue, notifier, mut rx) = setup(&["X"]);

        notifier.arm(HolderId::from("X"), IDLE);
        notifier.cancel();
        assert!(notifier.armed().is_none());

        sleep(IDLE * 2).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_without_pending_is_noop() {
        let (_queue, notifier, _rx) = setup(&[]);
        notifier.cancel();
        assert!(notifier.armed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_reports_holder_and_deadline() {
        let (_queue, notifier, _rx) = setup(&["X", "Y"]);

        notifier.arm(HolderId::from("X"), Duration::from_secs(30));
        notifier.arm(HolderId::from("Y"), Duration::from_secs(60));

        assert_eq!(
            notifier.armed(),
            Some(ArmedReminder {
                holder: HolderId::from("Y"),
                deadline_millis: 61_000,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_deadline_follows_the_clock() {
        let queue: SharedQueue = Arc::new(AsyncMutex::new(TurnQueue::new()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let clock = Arc::new(FixedTimeProvider::new(1_000));
        let notifier = TurnNotifier::new(queue, tx, clock.clone());

        notifier.arm(HolderId::from("X"), Duration::from_secs(30));
        assert_eq!(notifier.armed().map(|r| r.deadline_millis), Some(31_000));

        clock.set(20_000);
        notifier.arm(HolderId::from("X"), Duration::from_secs(30));
        assert_eq!(notifier.armed().map(|r| r.deadline_millis), Some(50_000));
    }
}
