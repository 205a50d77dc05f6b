//! # Observer Hub
//!
//! Fan-out of [`ActorEvent`]s to local subscribers.
//!
//! Two flavours of subscriber:
//! - callbacks, run inline while the event is published;
//! - channels, for consumers living on another thread or polling later.
//!
//! Both are removed with the [`SubscriptionId`] returned on subscribe. Channel
//! subscribers whose receiver was dropped are pruned on the next publish.

use bastion_shared::ActorEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Handle returned by subscribe calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ActorEvent) + Send>;

enum Subscriber {
    Callback(Callback),
    Channel(Sender<ActorEvent>),
}

/// Local event fan-out.
#[derive(Default)]
pub struct ObserverHub {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl ObserverHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&ActorEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.insert(Subscriber::Callback(Box::new(callback)))
    }

    /// Registers a channel subscriber and returns its receiving end.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<ActorEvent>) {
        let (tx, rx) = unbounded();
        (self.insert(Subscriber::Channel(tx)), rx)
    }

    /// Removes a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Delivers an event to every subscriber, in subscription order.
    pub fn publish(&mut self, event: &ActorEvent) {
        self.subscribers.retain_mut(|(_, subscriber)| match subscriber {
            Subscriber::Callback(callback) => {
                callback(event);
                true
            }
            Subscriber::Channel(tx) => tx.send(*event).is_ok(),
        });
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    fn insert(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_shared::ActorId;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn changed(health: f32) -> ActorEvent {
        ActorEvent::HealthChanged {
            actor: ActorId(1),
            health,
        }
    }

    #[test]
    fn test_callback_fan_out() {
        let mut hub = ObserverHub::new();
        let count = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let count = count.clone();
            hub.subscribe(move |_| {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }

        hub.publish(&changed(50.0));
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let mut hub = ObserverHub::new();
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        let id = hub.subscribe(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));

        hub.publish(&changed(10.0));
        assert_eq!(count.load(Ordering::Relaxed), 0);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_channel_subscriber() {
        let mut hub = ObserverHub::new();
        let (_, rx) = hub.subscribe_channel();

        hub.publish(&changed(75.0));
        hub.publish(&changed(60.0));

        let events: Vec<ActorEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![changed(75.0), changed(60.0)]);
    }

    #[test]
    fn test_dropped_channel_is_pruned() {
        let mut hub = ObserverHub::new();
        let (_, rx) = hub.subscribe_channel();
        assert_eq!(hub.len(), 1);

        drop(rx);
        hub.publish(&changed(1.0));
        assert!(hub.is_empty());
    }
}
