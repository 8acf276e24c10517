//! Observer trait and the subscriber broadcast plane.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use border_core::SimTime;

use crate::config::BacklogPolicy;
use crate::snapshot::Snapshot;

/// Callbacks invoked by the orchestrator's tick loop at key points.
///
/// All methods have default no-op implementations, matching the grounding
/// teacher's `SimObserver` — implementors override only what they need.
pub trait Observer {
    fn on_tick_start(&mut self, _sim_time: SimTime) {}
    fn on_tick_end(&mut self, _sim_time: SimTime) {}
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}
    fn on_sim_end(&mut self, _final_time: SimTime) {}
}

/// An [`Observer`] that does nothing.
pub struct NoopObserver;

impl Observer for NoopObserver {}

const DEFAULT_BACKLOG: usize = 8;

/// One subscriber's bounded ring buffer plus the condvar subscribers block
/// on while waiting for a new snapshot.
struct SubscriberSlot {
    backlog: Mutex<std::collections::VecDeque<Arc<Snapshot>>>,
    ready: Condvar,
    closed: Mutex<bool>,
}

/// A handle a subscriber uses to receive published snapshots.
///
/// Wraps a ring buffer rather than `std::sync::mpsc` because the
/// `drop-oldest` policy needs to evict from the *front* of an existing
/// backlog, which `mpsc::Sender` does not expose.
pub struct Subscription {
    slot: Arc<SubscriberSlot>,
}

impl Subscription {
    /// Block until a snapshot is available or the hub closes the
    /// subscription (simulation reached a terminal state). Returns `None`
    /// once closed and drained.
    pub fn recv(&self) -> Option<Arc<Snapshot>> {
        let mut backlog = self.slot.backlog.lock().unwrap();
        loop {
            if let Some(snap) = backlog.pop_front() {
                return Some(snap);
            }
            if *self.slot.closed.lock().unwrap() {
                return None;
            }
            backlog = self.slot.ready.wait(backlog).unwrap();
        }
    }

    /// Non-blocking poll; `None` if nothing is buffered right now.
    pub fn try_recv(&self) -> Option<Arc<Snapshot>> {
        self.slot.backlog.lock().unwrap().pop_front()
    }
}

/// Fan-out point for published snapshots. Owned by the orchestrator; the
/// only cross-thread mutable structure besides the control FIFO.
pub struct BroadcastHub {
    policy: BacklogPolicy,
    max_backlog: usize,
    subscribers: Mutex<Vec<Arc<SubscriberSlot>>>,
}

impl BroadcastHub {
    pub fn new(policy: BacklogPolicy) -> Self {
        Self {
            policy,
            max_backlog: DEFAULT_BACKLOG,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber and return its receiving handle.
    pub fn subscribe(&self) -> Subscription {
        let slot = Arc::new(SubscriberSlot {
            backlog: Mutex::new(std::collections::VecDeque::new()),
            ready: Condvar::new(),
            closed: Mutex::new(false),
        });
        self.subscribers.lock().unwrap().push(slot.clone());
        Subscription { slot }
    }

    /// Publish `snapshot` to every live subscriber.
    ///
    /// Under `DropOldest`, a full ring buffer evicts its oldest entry
    /// before pushing the new one — the publisher never blocks. Under
    /// `BackPressure`, the publisher waits up to one `publish_period` for
    /// room; a subscriber that is still full after the timeout is
    /// disconnected.
    pub fn publish(&self, snapshot: Snapshot, publish_period: Duration) {
        let snapshot = Arc::new(snapshot);
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|slot| {
            let mut backlog = slot.backlog.lock().unwrap();

            if backlog.len() >= self.max_backlog {
                match self.policy {
                    BacklogPolicy::DropOldest => {
                        backlog.pop_front();
                    }
                    BacklogPolicy::BackPressure => {
                        let (guard, timeout) = slot
                            .ready
                            .wait_timeout_while(backlog, publish_period, |b| {
                                b.len() >= self.max_backlog
                            })
                            .unwrap();
                        backlog = guard;
                        if timeout.timed_out() && backlog.len() >= self.max_backlog {
                            *slot.closed.lock().unwrap() = true;
                            slot.ready.notify_all();
                            return false;
                        }
                    }
                }
            }

            backlog.push_back(snapshot.clone());
            slot.ready.notify_all();
            true
        });
    }

    /// Close every subscription (simulation reached a terminal state).
    pub fn close_all(&self) {
        let subscribers = self.subscribers.lock().unwrap();
        for slot in subscribers.iter() {
            *slot.closed.lock().unwrap() = true;
            slot.ready.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SimStatus;
    use border_fleet::Stats;

    fn blank_snapshot(sim_time: SimTime) -> Snapshot {
        Snapshot {
            sim_time,
            status: SimStatus::Running,
            cars: vec![],
            booths: vec![],
            stats: Stats::new(),
            failure_message: None,
        }
    }

    #[test]
    fn subscriber_receives_published_snapshots_in_order() {
        let hub = BroadcastHub::new(BacklogPolicy::DropOldest);
        let sub = hub.subscribe();
        hub.publish(blank_snapshot(1.0), Duration::from_millis(10));
        hub.publish(blank_snapshot(2.0), Duration::from_millis(10));

        assert_eq!(sub.try_recv().unwrap().sim_time, 1.0);
        assert_eq!(sub.try_recv().unwrap().sim_time, 2.0);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn drop_oldest_evicts_front_when_full() {
        let hub = BroadcastHub::new(BacklogPolicy::DropOldest);
        let sub = hub.subscribe();
        for t in 0..(DEFAULT_BACKLOG + 3) {
            hub.publish(blank_snapshot(t as f64), Duration::from_millis(10));
        }
        let first = sub.try_recv().unwrap();
        // The oldest 3 snapshots (t=0,1,2) should have been evicted.
        assert_eq!(first.sim_time, 3.0);
    }

    #[test]
    fn close_all_unblocks_pending_recv() {
        let hub = BroadcastHub::new(BacklogPolicy::DropOldest);
        let sub = hub.subscribe();
        hub.close_all();
        assert!(sub.recv().is_none());
    }

    #[test]
    fn no_subscribers_is_a_cheap_noop() {
        let hub = BroadcastHub::new(BacklogPolicy::DropOldest);
        hub.publish(blank_snapshot(1.0), Duration::from_millis(10));
    }
}
