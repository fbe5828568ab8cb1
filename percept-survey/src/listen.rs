use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

use thiserror::Error;

/// What a listener returns; an `Err` is collected and re-raised in
/// aggregate once the whole broadcast has run.
pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

type Handler<E> = Rc<RefCell<dyn FnMut(&E) -> ListenerResult>>;

/// Token returned by [`Listenable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// One failed listener within a broadcast.
#[derive(Debug, Error)]
#[error("listener {id:?} failed: {error}")]
pub struct ListenerFailure {
    pub id: ListenerId,
    pub error: Box<dyn Error + Send + Sync>,
}

/// Aggregate of every listener failure from one or more publishes.
/// Delivery to later listeners is never interrupted by earlier failures.
#[derive(Debug, Error)]
#[error("{} listener(s) failed during publish", .failures.len())]
pub struct BroadcastError {
    pub failures: Vec<ListenerFailure>,
}

impl BroadcastError {
    /// `Ok` when there is nothing to report.
    pub fn from_failures(failures: Vec<ListenerFailure>) -> Result<(), BroadcastError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BroadcastError { failures })
        }
    }
}

/// Minimal single-threaded publish/subscribe primitive.
///
/// Listeners run sequentially in registration order. Each publish works
/// on a snapshot of the listener list, so subscribing or unsubscribing
/// from inside a handler affects later publishes only. A handler may
/// publish re-entrantly; the handler that is currently mid-call is
/// skipped for the nested broadcast rather than re-entered.
pub struct Listenable<E> {
    listeners: RefCell<Vec<(ListenerId, Handler<E>)>>,
    next_id: Cell<u64>,
}

impl<E> Listenable<E> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, handler: impl FnMut(&E) -> ListenerResult + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    /// No-op if the id was never registered or already removed.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invokes every currently registered listener with `event`.
    pub fn publish(&self, event: &E) -> Result<(), BroadcastError> {
        let snapshot: Vec<(ListenerId, Handler<E>)> = self.listeners.borrow().clone();

        let mut failures = Vec::new();
        for (id, handler) in snapshot {
            // A handler still borrowed here is the one that triggered this
            // nested publish; skip it instead of re-entering.
            let Ok(mut handler) = handler.try_borrow_mut() else {
                continue;
            };
            if let Err(error) = (&mut *handler)(event) {
                failures.push(ListenerFailure { id, error });
            }
        }
        BroadcastError::from_failures(failures)
    }
}

impl<E> Default for Listenable<E> {
    fn default() -> Self {
        Self::new()
    }
}
