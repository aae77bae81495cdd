//! Entries of the trigger and effect queues.

use crate::core::{State, Trigger};
use crate::events::{EventSource, TransitionEvent};
use std::rc::Rc;

/// Event source raised, one tick after the commit, by a transition's effect.
pub type EffectSource<S> = Rc<EventSource<TransitionEvent<S>>>;

/// One entry of the trigger queue.
pub(crate) enum QueueEntry<S: State> {
    Single(Trigger<S>),
    /// Processed in order until the first trigger that completes a transition.
    Batch(Vec<Trigger<S>>),
}

/// A deferred effect: the source to raise and the transition it belongs to.
pub(crate) struct EffectAction<S: State> {
    source: EffectSource<S>,
    args: TransitionEvent<S>,
}

impl<S: State> EffectAction<S> {
    pub(crate) fn new(source: EffectSource<S>, args: TransitionEvent<S>) -> Self {
        Self { source, args }
    }

    pub(crate) fn fire(&self) -> usize {
        self.source.raise(&self.args)
    }
}
