//! Registry of every machine created on the current thread.
//!
//! Machines are single-threaded (`!Send`), so the registry is per thread: it
//! holds a `Weak` handle to every machine constructed here, plus a count of
//! machines not yet disposed. Membership never keeps a machine alive. When the
//! thread shuts down the registry disposes whatever machines are still alive;
//! hosts may also call [`dispose_all`] explicitly.

use std::cell::RefCell;
use std::rc::Weak;
use tracing::{debug, info, warn};

/// Anything the registry can tear down.
pub trait Disposable {
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}

#[derive(Default)]
struct Registry {
    machines: Vec<Weak<dyn Disposable>>,
    live: usize,
}

impl Registry {
    fn alive(&mut self) -> Vec<std::rc::Rc<dyn Disposable>> {
        self.machines.retain(|machine| machine.strong_count() > 0);
        self.machines.iter().filter_map(Weak::upgrade).collect()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        let alive = self.alive();
        for machine in &alive {
            machine.dispose();
        }
        debug!(
            disposed = alive.len(),
            live = self.live,
            "machine registry torn down"
        );
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

pub(crate) fn register(machine: Weak<dyn Disposable>) {
    let _ = REGISTRY.try_with(|registry| {
        let mut registry = registry.borrow_mut();
        registry.machines.retain(|known| known.strong_count() > 0);
        registry.machines.push(machine);
        registry.live += 1;
    });
}

pub(crate) fn unregister() {
    // During thread teardown the registry may already be gone.
    let _ = REGISTRY.try_with(|registry| {
        let mut registry = registry.borrow_mut();
        match registry.live.checked_sub(1) {
            Some(live) => registry.live = live,
            None => warn!("machine unregistered more often than registered"),
        }
    });
}

/// Machines created on this thread and not yet disposed.
pub fn live_count() -> usize {
    REGISTRY
        .try_with(|registry| registry.borrow().live)
        .unwrap_or(0)
}

/// Dispose every machine on this thread that is still alive.
///
/// Returns how many machines were disposed by this call.
pub fn dispose_all() -> usize {
    let alive = REGISTRY
        .try_with(|registry| registry.borrow_mut().alive())
        .unwrap_or_default();

    let mut disposed = 0;
    for machine in alive {
        if !machine.is_disposed() {
            machine.dispose();
            disposed += 1;
        }
    }
    info!(disposed, "disposed all live state machines");
    disposed
}
