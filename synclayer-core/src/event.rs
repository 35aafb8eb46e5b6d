//! Change notifications emitted by synchronized stores.
//!
//! Stores with synchronization enabled publish a [`StoreEvent`] after each
//! save (unless the save asked for `no_sync`) so that a sync layer can push
//! local changes out. Consumers obtain a
//! [`StoreEvents`] stream from `DataStore::subscribe`; dropping the stream
//! unsubscribes.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

use crate::record::Record;

/// A save observed on a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    /// The name of the store that changed.
    pub store: String,
    /// The visible set after the save.
    pub records: Vec<Record>,
}

/// The receiving half of a store subscription. Implements `futures::Stream`.
pub type StoreEvents = UnboundedReceiver<StoreEvent>;

/// The set of live subscriptions to one store.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<UnboundedSender<StoreEvent>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscription.
    pub fn subscribe(&mut self) -> StoreEvents {
        let (sender, receiver) = unbounded();
        self.senders.push(sender);

        receiver
    }

    /// Sends `event` to every live subscriber, dropping closed ones.
    pub fn notify(&mut self, event: StoreEvent) {
        self.senders
            .retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
