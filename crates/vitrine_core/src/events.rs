//! Typed event channels
//!
//! An [`EventChannel`] is a publish/subscribe hub for one payload type.
//! Widgets publish state changes on it (an accordion finishing a transition,
//! the window scrolling) and other widgets listen without knowing who
//! published.
//!
//! Every listener is represented by a [`Subscription`] guard. Dropping the
//! guard (or calling [`Subscription::dispose`]) detaches the listener, so a
//! widget that is torn down never leaves a callback behind.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use vitrine_core::events::EventChannel;
//!
//! let channel = EventChannel::<u32>::new();
//! let seen = Arc::new(AtomicU32::new(0));
//!
//! let seen_for_listener = seen.clone();
//! let subscription = channel.subscribe(move |value| {
//!     seen_for_listener.fetch_add(*value, Ordering::Relaxed);
//! });
//!
//! channel.emit(&2);
//! drop(subscription);
//! channel.emit(&40);
//!
//! assert_eq!(seen.load(Ordering::Relaxed), 2);
//! ```

use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

new_key_type! {
    /// Handle to a registered listener
    pub struct SubscriberId;
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ChannelInner<T: 'static> {
    subscribers: RwLock<SlotMap<SubscriberId, Callback<T>>>,
}

/// A publish/subscribe hub for payloads of type `T`
///
/// Cloning the channel yields another handle to the same hub.
pub struct EventChannel<T: 'static> {
    inner: Arc<ChannelInner<T>>,
}

impl<T: 'static> EventChannel<T> {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                subscribers: RwLock::new(SlotMap::with_key()),
            }),
        }
    }

    /// Register a listener
    ///
    /// The listener stays attached for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Arc::new(callback));
        tracing::trace!(?id, "listener attached");

        let weak: Weak<ChannelInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .subscribers
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(id);
                    tracing::trace!(?id, "listener detached");
                }
            })),
        }
    }

    /// Deliver a payload to every listener
    ///
    /// Listeners are snapshotted before delivery, so a listener may drop
    /// its own (or another) subscription while being called. Returns the
    /// number of listeners that received the payload.
    pub fn emit(&self, payload: &T) -> usize {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for callback in &callbacks {
            callback(payload);
        }
        callbacks.len()
    }

    /// Number of attached listeners
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + Send + 'static> EventChannel<T> {
    /// Subscribe with a queue instead of a callback
    ///
    /// Payloads are cloned into the mailbox and picked up later with
    /// [`Mailbox::drain`]. This is how widgets that need `&mut` access to
    /// the document react to events published while they are not running.
    pub fn mailbox(&self) -> Mailbox<T> {
        let queue: Arc<Mutex<Vec<T>>> = Arc::new(Mutex::new(Vec::new()));
        let queue_for_listener = Arc::clone(&queue);
        let subscription = self.subscribe(move |payload: &T| {
            lock(&queue_for_listener).push(payload.clone());
        });
        Mailbox {
            queue,
            _subscription: subscription,
        }
    }
}

impl<T: 'static> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard for an attached listener
///
/// The listener is detached when the guard is dropped.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Detach the listener now
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.unsubscribe.is_some())
            .finish()
    }
}

/// A subscription that queues payloads
pub struct Mailbox<T> {
    queue: Arc<Mutex<Vec<T>>>,
    _subscription: Subscription,
}

impl<T> Mailbox<T> {
    /// Take every queued payload in delivery order
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *lock(&self.queue))
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }

    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }
}

impl<T> fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").field("queued", &self.len()).finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
