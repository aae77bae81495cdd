//! Weak publish/subscribe channel.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A subscriber callback.
///
/// The caller keeps the `Rc` alive; an [`EventSource`] only ever stores a
/// `Weak` to it.
pub type Handler<A> = Rc<dyn Fn(&A)>;

/// Wrap a closure as a [`Handler`].
pub fn handler<A, F>(f: F) -> Handler<A>
where
    A: 'static,
    F: Fn(&A) + 'static,
{
    Rc::new(f)
}

/// Event channel that never extends the lifetime of its subscribers.
///
/// Subscribers are called synchronously, in subscription order. Handlers whose
/// `Rc` has been dropped are pruned on the next [`raise`](Self::raise).
/// Handlers may subscribe, unsubscribe or close the source while it is being
/// raised; changes apply from the next raise on.
pub struct EventSource<A: 'static> {
    subscribers: RefCell<Vec<Weak<dyn Fn(&A)>>>,
    closed: Cell<bool>,
}

impl<A: 'static> EventSource<A> {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            closed: Cell::new(false),
        }
    }

    /// Register `handler`. Subscribing to a closed source does nothing.
    pub fn subscribe(&self, handler: &Handler<A>) {
        if self.closed.get() {
            return;
        }
        self.subscribers.borrow_mut().push(Rc::downgrade(handler));
    }

    /// Remove every registration of `handler`. Returns `true` if one was found.
    pub fn unsubscribe(&self, handler: &Handler<A>) -> bool {
        let target = Rc::downgrade(handler);
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|weak| !Weak::ptr_eq(weak, &target));
        subscribers.len() != before
    }

    /// Call every live subscriber with `args`, returning how many were called.
    pub fn raise(&self, args: &A) -> usize {
        if self.closed.get() {
            return 0;
        }

        // Collect strong handles first so no borrow is held while handlers run.
        let live: Vec<Handler<A>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for handler in &live {
            handler(args);
        }
        live.len()
    }

    /// Number of subscribers still alive.
    pub fn len(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscriber and refuse new ones from now on.
    pub fn close(&self) {
        self.closed.set(true);
        self.subscribers.borrow_mut().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl<A: 'static> Default for EventSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.len())
            .field("closed", &self.closed.get())
            .finish()
    }
}
