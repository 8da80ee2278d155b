//! Broadcast relay for drag events
//!
//! Relay fans one event stream out to any number of subscribers using
//! simple unbounded channels. Dropped subscribers are pruned on the next send.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::cell::RefCell;
use std::rc::Rc;

/// Event relay shared by the listeners of one draggable element.
///
/// # Examples
///
/// ```rust,ignore
/// let drag_moved_relay = Relay::new();
/// let mut stream = drag_moved_relay.subscribe();
///
/// drag_moved_relay.send((120.0, 40.0));
///
/// while let Some((x, y)) = stream.next().await {
///     zoon::println!("moved to {x}, {y}");
/// }
/// ```
#[derive(Clone)]
pub struct Relay<T> {
    subscribers: Rc<RefCell<Vec<UnboundedSender<T>>>>,
}

/// Error type for Relay operations
#[derive(Debug, Clone, PartialEq)]
pub enum RelayError {
    /// Nobody is listening (all receivers dropped or none subscribed)
    NoSubscribers,
}

impl<T: Clone + 'static> Relay<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Open a new stream receiving every event sent from now on.
    pub fn subscribe(&self) -> UnboundedReceiver<T> {
        let (sender, receiver) = unbounded();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    /// Send an event to all subscribers.
    ///
    /// Events sent while nobody listens are silently discarded.
    /// Use `try_send()` if you need to know.
    pub fn send(&self, value: T) {
        let _ = self.try_send(value);
    }

    /// Send an event, returning how many subscribers received it.
    pub fn try_send(&self, value: T) -> Result<usize, RelayError> {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|sender| sender.unbounded_send(value.clone()).is_ok());
        match subscribers.len() {
            0 => Err(RelayError::NoSubscribers),
            delivered => Ok(delivered),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: Clone + 'static> Default for Relay<T> {
    fn default() -> Self {
        Self::new()
    }
}
