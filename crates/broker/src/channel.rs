//! Single-stream fan-out channel.

use std::collections::VecDeque;

use tokio::sync::broadcast;
use tokio::sync::Mutex;

/// Ring size of the live broadcast feed per channel.
///
/// A subscriber that falls further behind than this skips the overwritten
/// items (drop-oldest) and continues with the newest signal; publishing
/// never waits for it.
pub const DEFAULT_LIVE_CAPACITY: usize = 256;

struct ChannelState<T> {
    backlog: VecDeque<T>,
    backlog_cap: Option<usize>,
    live: broadcast::Sender<T>,
}

/// One publish/subscribe stream with backlog replay.
///
/// The mutex around the state is the serialization point that makes
/// snapshot-and-attach atomic with respect to publish. The critical
/// sections never await, so the lock is held only briefly.
pub struct Channel<T> {
    state: Mutex<ChannelState<T>>,
}

impl<T: Clone> Channel<T> {
    /// Channel whose backlog keeps only the `cap` most recent items.
    pub fn bounded(cap: usize) -> Self {
        Self::build(Some(cap))
    }

    /// Channel whose backlog keeps every published item.
    pub fn unbounded_backlog() -> Self {
        Self::build(None)
    }

    fn build(backlog_cap: Option<usize>) -> Self {
        let (live, _) = broadcast::channel(DEFAULT_LIVE_CAPACITY);
        Self {
            state: Mutex::new(ChannelState {
                backlog: VecDeque::new(),
                backlog_cap,
                live,
            }),
        }
    }

    /// Pre-populate the backlog without notifying live subscribers.
    ///
    /// Used at startup to seed the anomaly stream with the persisted
    /// history.
    pub async fn seed<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = self.state.lock().await;
        for item in items {
            push_backlog(&mut state, item);
        }
    }

    /// Deliver `item` to the backlog and every current subscriber.
    ///
    /// Never blocks on a subscriber: slow receivers are handled by the
    /// broadcast ring's drop-oldest behavior.
    pub async fn publish(&self, item: T) {
        let mut state = self.state.lock().await;
        push_backlog(&mut state, item.clone());
        // Err here only means no live subscribers right now.
        let _ = state.live.send(item);
    }

    /// Snapshot the backlog and attach a live receiver, atomically with
    /// respect to [`Channel::publish`].
    pub async fn subscribe(&self) -> Subscription<T> {
        let state = self.state.lock().await;
        Subscription {
            backlog: state.backlog.iter().cloned().collect(),
            live: state.live.subscribe(),
        }
    }

    /// Number of items currently replayable to a new subscriber.
    pub async fn backlog_len(&self) -> usize {
        self.state.lock().await.backlog.len()
    }

    /// Number of attached live subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.state.lock().await.live.receiver_count()
    }
}

fn push_backlog<T>(state: &mut ChannelState<T>, item: T) {
    if let Some(cap) = state.backlog_cap {
        while state.backlog.len() >= cap {
            state.backlog.pop_front();
        }
    }
    state.backlog.push_back(item);
}

/// One subscriber's view of a channel: the backlog snapshot taken at
/// subscribe time, then the live feed.
///
/// Dropping the subscription detaches it; nothing further is buffered or
/// delivered for it.
pub struct Subscription<T> {
    backlog: Vec<T>,
    live: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// The items published before this subscription attached, oldest
    /// first. Empties on first call.
    pub fn take_backlog(&mut self) -> Vec<T> {
        std::mem::take(&mut self.backlog)
    }

    /// Await the next live item.
    ///
    /// If this subscriber lagged past the live ring, the overwritten
    /// (oldest) items are skipped with a warning and delivery resumes at
    /// the newest. Returns `None` once the channel itself is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.live.recv().await {
                Ok(item) => return Some(item),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "slow subscriber dropped oldest items");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`]: `None` when no item
    /// is ready right now or the channel is gone.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.live.try_recv() {
                Ok(item) => return Some(item),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "slow subscriber dropped oldest items");
                }
                Err(_) => return None,
            }
        }
    }
}
