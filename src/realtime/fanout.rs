//! Channel-keyed publish/subscribe fan-out
//!
//! A `Fanout` maps channel names to the callbacks registered on them.
//! `notify` snapshots a channel's subscribers under the lock, releases it and
//! then calls each subscriber that is still active. Callbacks may therefore
//! subscribe, unsubscribe or notify again without deadlocking, and an
//! unsubscribe that lands before a subscriber is reached suppresses that
//! subscriber's delivery.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Callback invoked with each payload published on a channel
pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Subscriber<P> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback<P>,
}

struct Registry<P> {
    channels: HashMap<String, Vec<Arc<Subscriber<P>>>>,
    next_id: u64,
}

impl<P> Registry<P> {
    fn remove(&mut self, channel: &str, id: u64) {
        if let Some(subscribers) = self.channels.get_mut(channel) {
            subscribers.retain(|s| s.id != id);
            if subscribers.is_empty() {
                self.channels.remove(channel);
            }
        }
    }
}

/// Publish/subscribe registry for payloads of type `P`
pub struct Fanout<P> {
    registry: Arc<Mutex<Registry<P>>>,
}

impl<P: 'static> Fanout<P> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                channels: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Register `callback` on `channel`
    ///
    /// Any number of callbacks may share a channel. Delivery order between
    /// them is unspecified.
    pub fn subscribe<F>(&self, channel: &str, callback: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));

        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .channels
                .entry(channel.to_string())
                .or_default()
                .push(Arc::new(Subscriber {
                    id,
                    active: Arc::clone(&active),
                    callback: Arc::new(callback),
                }));
            id
        };

        let registry: Weak<Mutex<Registry<P>>> = Arc::downgrade(&self.registry);
        let owned_channel = channel.to_string();
        let remove = move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().remove(&owned_channel, id);
            }
        };

        tracing::trace!(channel, id, "subscribed");

        Subscription {
            channel: channel.to_string(),
            active,
            remove: Arc::new(remove),
        }
    }

    /// Deliver `payload` to every active subscriber on `channel`
    ///
    /// Returns the number of callbacks that ran to completion. A panicking
    /// callback is logged and skipped; the remaining subscribers still run.
    pub fn notify(&self, channel: &str, payload: &P) -> usize {
        let snapshot: Vec<Arc<Subscriber<P>>> = {
            let registry = self.registry.lock();
            registry.channels.get(channel).cloned().unwrap_or_default()
        };

        let mut delivered = 0;
        for subscriber in snapshot {
            if !subscriber.active.load(Ordering::SeqCst) {
                continue;
            }

            let callback = &subscriber.callback;
            match catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                Ok(()) => delivered += 1,
                Err(panic) => {
                    tracing::warn!(
                        channel,
                        subscriber = subscriber.id,
                        "subscriber panicked: {}",
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Number of subscribers currently registered on `channel`
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.registry
            .lock()
            .channels
            .get(channel)
            .map_or(0, Vec::len)
    }

    /// Drop every subscriber on every channel
    pub fn clear(&self) {
        let drained: Vec<Arc<Subscriber<P>>> = {
            let mut registry = self.registry.lock();
            registry.channels.drain().flat_map(|(_, subs)| subs).collect()
        };
        for subscriber in drained {
            subscriber.active.store(false, Ordering::SeqCst);
        }
    }
}

impl<P: 'static> Default for Fanout<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Fanout<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        let mut channels: Vec<(&String, usize)> = registry
            .channels
            .iter()
            .map(|(name, subs)| (name, subs.len()))
            .collect();
        channels.sort();
        f.debug_struct("Fanout").field("channels", &channels).finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Handle returned by `subscribe`
///
/// `unsubscribe` is idempotent and safe to call from anywhere, including from
/// inside a callback that is currently being notified.
#[derive(Clone)]
pub struct Subscription {
    channel: String,
    active: Arc<AtomicBool>,
    remove: Arc<dyn Fn() + Send + Sync>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            (self.remove)();
            tracing::trace!(channel = %self.channel, "unsubscribed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}
