//! Topic-tagged message bus
//!
//! Channels are registered per topic. Each subscriber owns one mailbox and
//! decides, per topic, whether it is listening. Messages published while a
//! subscriber is not listening are dropped for that subscriber rather than
//! queued, so an idle subscriber never accumulates backlog.
//!
//! ```
//! use ps2_keyboard::bus::{ChannelMode, Message, MessageBus, Payload};
//!
//! let bus = MessageBus::new();
//! bus.register_channel("status", ChannelMode::Multicast, "example").unwrap();
//!
//! let sub = bus.subscribe("reader");
//! sub.set_listen_status("status", true);
//!
//! bus.send(Message::new("status", Payload::Bytes(vec![1]))).unwrap();
//! let msg = sub.wait_for_message().unwrap();
//! assert_eq!(msg.topic, "status");
//! ```

use crate::keyboard::KeyEvent;
use std::collections::{HashMap, HashSet};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;

/// Topic carrying decoded [`KeyEvent`]s
pub const KEYPRESS_TOPIC: &str = "keypress";

/// Error type for bus operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    /// Nothing has registered a channel for this topic
    #[error("no channel registered for topic {0:?}")]
    UnknownChannel(String),
    /// A channel for this topic already exists
    #[error("channel {0:?} is already registered")]
    AlreadyRegistered(String),
    /// Every bus handle has been dropped and the mailbox is empty
    #[error("message bus disconnected")]
    Disconnected,
}

/// Delivery mode of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Only the first listening subscriber receives each message
    Unicast,
    /// Every listening subscriber receives its own copy
    Multicast,
}

/// Message body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    KeyEvent(KeyEvent),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub topic: String,
    pub payload: Payload,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    pub fn key_event(event: KeyEvent) -> Self {
        Self::new(KEYPRESS_TOPIC, Payload::KeyEvent(event))
    }
}

#[derive(Debug)]
struct Channel {
    mode: ChannelMode,
    owner: String,
}

struct SubscriberEntry {
    name: String,
    inbox: mpsc::Sender<Message>,
    listening: HashSet<String>,
}

#[derive(Default)]
struct BusInner {
    channels: HashMap<String, Channel>,
    /// Ordered by subscription, so unicast delivery is stable
    subscribers: Vec<(u64, SubscriberEntry)>,
    next_id: u64,
}

/// Shared handle to the bus
#[derive(Clone, Default)]
pub struct MessageBus {
    inner: Arc<Mutex<BusInner>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a channel for `topic`, owned by the task named `owner`
    pub fn register_channel(
        &self,
        topic: &str,
        mode: ChannelMode,
        owner: &str,
    ) -> Result<(), BusError> {
        let mut inner = self.lock();
        if inner.channels.contains_key(topic) {
            return Err(BusError::AlreadyRegistered(topic.to_string()));
        }
        log::debug!("registered {mode:?} channel {topic:?} for {owner}");
        inner.channels.insert(
            topic.to_string(),
            Channel {
                mode,
                owner: owner.to_string(),
            },
        );
        Ok(())
    }

    /// Name of the task that registered `topic`
    pub fn channel_owner(&self, topic: &str) -> Option<String> {
        self.lock().channels.get(topic).map(|c| c.owner.clone())
    }

    /// Create a new subscriber. It listens to nothing until told to.
    pub fn subscribe(&self, name: &str) -> Subscriber {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((
            id,
            SubscriberEntry {
                name: name.to_string(),
                inbox: tx,
                listening: HashSet::new(),
            },
        ));
        Subscriber {
            id,
            bus: Arc::downgrade(&self.inner),
            inbox: rx,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Publish `message` to the listening subscribers of its topic.
    ///
    /// Returns how many subscribers received it. Zero is not an error; the
    /// message is simply dropped.
    pub fn send(&self, message: Message) -> Result<usize, BusError> {
        let inner = self.lock();
        let mode = inner
            .channels
            .get(&message.topic)
            .map(|c| c.mode)
            .ok_or_else(|| BusError::UnknownChannel(message.topic.clone()))?;

        let mut delivered = 0;
        for (_, entry) in inner
            .subscribers
            .iter()
            .filter(|(_, e)| e.listening.contains(&message.topic))
        {
            if entry.inbox.send(message.clone()).is_ok() {
                delivered += 1;
                if mode == ChannelMode::Unicast {
                    break;
                }
            } else {
                log::trace!("subscriber {} hung up", entry.name);
            }
        }

        if delivered == 0 {
            log::trace!("no listeners on {:?}, message dropped", message.topic);
        }
        Ok(delivered)
    }
}

/// One consumer's mailbox.
///
/// Dropping the subscriber removes it from the bus.
pub struct Subscriber {
    id: u64,
    bus: Weak<Mutex<BusInner>>,
    inbox: mpsc::Receiver<Message>,
}

impl Subscriber {
    fn with_entry<R>(&self, f: impl FnOnce(&mut SubscriberEntry) -> R) -> Option<R> {
        let bus = self.bus.upgrade()?;
        let mut inner = bus.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .subscribers
            .iter_mut()
            .find(|(id, _)| *id == self.id)
            .map(|(_, entry)| f(entry))
    }

    /// Start or stop accepting messages on `topic`
    pub fn set_listen_status(&self, topic: &str, listening: bool) {
        self.with_entry(|entry| {
            if listening {
                entry.listening.insert(topic.to_string());
            } else {
                entry.listening.remove(topic);
            }
        });
    }

    pub fn is_listening(&self, topic: &str) -> bool {
        self.with_entry(|entry| entry.listening.contains(topic))
            .unwrap_or(false)
    }

    /// Block until a message arrives on any topic this subscriber listens to
    pub fn wait_for_message(&self) -> Result<Message, BusError> {
        self.inbox.recv().map_err(|_| BusError::Disconnected)
    }

    /// Take a queued message without blocking
    pub fn try_message(&self) -> Option<Message> {
        self.inbox.try_recv().ok()
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            let mut inner = bus.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}
