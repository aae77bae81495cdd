//! The transition engine.

use super::error::MachineError;
use super::host::StateMachineHost;
use super::options::MachineOptions;
use super::queue::{EffectAction, EffectSource, QueueEntry};
use crate::core::{Guard, State, StateHistory, StateNode, StateTransition, Trigger};
use crate::events::{EventSource, PropertyChanged, TransitionEvent};
use crate::graph::StateGraph;
use crate::registry::{self, Disposable};
use crate::schedule::{OneShot, Scheduler};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Everything a builder hands over to construct a machine.
pub(crate) struct MachineParts<S: State> {
    pub(crate) options: MachineOptions,
    pub(crate) graph: StateGraph<S>,
    pub(crate) initial: S,
    pub(crate) host: Option<Weak<dyn StateMachineHost<S>>>,
    pub(crate) scheduler: Rc<dyn Scheduler>,
}

/// Restores the in-guard flag however guard evaluation ends, so a guard
/// evaluated from inside another guard leaves the outer one flagged.
struct InGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl Drop for InGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Event-driven state machine.
///
/// A machine is always handled through an `Rc` owned by its host; nodes,
/// triggers and guards only hold `Weak` handles to it. All mutation happens
/// through `&self` on the single cooperative thread the machine was built on.
///
/// Firing a trigger enqueues it. A scheduler tick later dequeues it and runs
/// the transition algorithm (see [`transition_to_new_state`]). Guards, entry
/// and exit hooks, effects and event handlers are arbitrary code: any of them
/// may dispose the machine, and the engine checks for that after each step.
///
/// [`transition_to_new_state`]: Self::transition_to_new_state
pub struct StateMachine<S: State> {
    id: Uuid,
    options: MachineOptions,
    graph: StateGraph<S>,
    initial: S,
    host: Option<Weak<dyn StateMachineHost<S>>>,
    scheduler: Rc<dyn Scheduler>,
    this: Weak<Self>,

    current: RefCell<Option<Rc<StateNode<S>>>>,
    disposed: Cell<bool>,
    depth: Cell<usize>,
    in_guard: Cell<bool>,
    history: RefCell<StateHistory<S>>,

    queue: RefCell<VecDeque<QueueEntry<S>>>,
    trigger_tick: OneShot,
    effects: RefCell<VecDeque<EffectAction<S>>>,
    effect_tick: OneShot,

    property_changed: EventSource<PropertyChanged>,
    start_transition: EventSource<TransitionEvent<S>>,
    before_exiting_previous_state: EventSource<TransitionEvent<S>>,
    end_transition: EventSource<TransitionEvent<S>>,
}

impl<S: State> StateMachine<S> {
    pub(crate) fn from_parts(parts: MachineParts<S>) -> Rc<Self> {
        let machine = Rc::new_cyclic(|this: &Weak<Self>| {
            let handle: Weak<dyn Disposable> = this.clone();
            registry::register(handle);

            Self {
                id: Uuid::new_v4(),
                options: parts.options,
                graph: parts.graph,
                initial: parts.initial,
                host: parts.host,
                scheduler: parts.scheduler,
                this: this.clone(),
                current: RefCell::new(None),
                disposed: Cell::new(false),
                depth: Cell::new(0),
                in_guard: Cell::new(false),
                history: RefCell::new(StateHistory::new()),
                queue: RefCell::new(VecDeque::new()),
                trigger_tick: OneShot::new(),
                effects: RefCell::new(VecDeque::new()),
                effect_tick: OneShot::new(),
                property_changed: EventSource::new(),
                start_transition: EventSource::new(),
                before_exiting_previous_state: EventSource::new(),
                end_transition: EventSource::new(),
            }
        });
        info!(machine = %machine.id, name = %machine.name(), "state machine created");
        machine
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    pub fn graph(&self) -> &StateGraph<S> {
        &self.graph
    }

    pub fn initial_state(&self) -> &S {
        &self.initial
    }

    /// The host this machine was built for, if it is still alive.
    pub fn host(&self) -> Option<Rc<dyn StateMachineHost<S>>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Started (has a current state) and not disposed.
    pub fn is_working(&self) -> bool {
        !self.is_disposed() && self.current.borrow().is_some()
    }

    /// Current nesting depth of transition attempts. Zero between transitions.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Whether a guard is being evaluated right now.
    pub fn is_in_guard(&self) -> bool {
        self.in_guard.get()
    }

    pub fn pending_triggers(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn pending_effects(&self) -> usize {
        self.effects.borrow().len()
    }

    /// Snapshot of the committed transitions, oldest first.
    pub fn history(&self) -> StateHistory<S> {
        self.history.borrow().clone()
    }

    /// The state the machine is in.
    ///
    /// `None` before the machine is started. Once disposed, always the
    /// sentinel node named [`DISPOSED_STATE_NAME`](crate::core::DISPOSED_STATE_NAME).
    pub fn current_state(&self) -> Option<Rc<StateNode<S>>> {
        if self.is_disposed() {
            return Some(Rc::new(StateNode::disposed(Weak::clone(&self.this))));
        }
        self.current.borrow().clone()
    }

    /// Raised with `"current_state"` whenever the current state is replaced.
    pub fn property_changed(&self) -> &EventSource<PropertyChanged> {
        &self.property_changed
    }

    /// Raised at the start of every transition attempt, before the guard.
    pub fn start_transition(&self) -> &EventSource<TransitionEvent<S>> {
        &self.start_transition
    }

    /// Raised once the guard passed, before the previous state's exit hook.
    pub fn before_exiting_previous_state(&self) -> &EventSource<TransitionEvent<S>> {
        &self.before_exiting_previous_state
    }

    /// Raised after the entry hook of a non-condition target state.
    pub fn end_transition(&self) -> &EventSource<TransitionEvent<S>> {
        &self.end_transition
    }

    /// Enter the initial state.
    pub fn start(&self) -> Result<bool, MachineError> {
        self.transition_to(self.initial.clone())
    }

    /// Move to `new_state` with no trigger, guard or effect.
    pub fn transition_to(&self, new_state: S) -> Result<bool, MachineError> {
        self.transition_to_new_state(new_state, None, None, None)
    }

    /// Attempt a transition into `new_state`.
    ///
    /// Returns `Ok(true)` when the machine ended up in a non-condition state
    /// and is still alive, `Ok(false)` when the guard rejected the transition
    /// or the machine was disposed along the way. Errors are reserved for
    /// defects: a condition state none of whose triggers resolved, or a
    /// corrupted depth counter.
    ///
    /// Steps, in order: raise `start_transition`; evaluate the guard; raise
    /// `before_exiting_previous_state`; run the exit hooks of the current
    /// state; commit; queue the effect; then either resolve the condition
    /// state through its own triggers, or run the entry hooks and raise
    /// `end_transition`. Disposal is checked between every step.
    pub fn transition_to_new_state(
        &self,
        new_state: S,
        why: Option<&Trigger<S>>,
        guard: Option<&Guard<S>>,
        effect: Option<&EffectSource<S>>,
    ) -> Result<bool, MachineError> {
        self.depth.set(self.depth.get() + 1);
        let outcome = self.run_transition(new_state, why, guard, effect);
        self.leave_transition()?;
        outcome
    }

    fn leave_transition(&self) -> Result<(), MachineError> {
        match self.depth.get().checked_sub(1) {
            Some(depth) => {
                self.depth.set(depth);
                Ok(())
            }
            None => {
                error!(machine = %self.id, "transition depth underflow");
                debug_assert!(false, "transition depth underflow");
                Err(MachineError::ReentrancyUnderflow)
            }
        }
    }

    fn run_transition(
        &self,
        new_state: S,
        why: Option<&Trigger<S>>,
        guard: Option<&Guard<S>>,
        effect: Option<&EffectSource<S>>,
    ) -> Result<bool, MachineError> {
        if self.is_disposed() {
            return Ok(false);
        }

        let next = Rc::new(StateNode::new(
            Weak::clone(&self.this),
            &self.graph,
            new_state,
        ));
        let prev = self.current.borrow().clone();
        let event = TransitionEvent::new(prev.clone(), Rc::clone(&next), why.cloned());
        debug!(
            machine = %self.id,
            depth = self.depth(),
            from = prev.as_deref().map(StateNode::name),
            to = next.name(),
            trigger = why.map(Trigger::name),
            "transition started"
        );

        self.start_transition.raise(&event);

        if let Some(guard) = guard {
            if !self.guard_allows(guard) {
                debug!(machine = %self.id, to = next.name(), "transition rejected by guard");
                return Ok(false);
            }
        }

        self.before_exiting_previous_state.raise(&event);

        if let Some(prev) = prev.as_deref() {
            if let Some(state) = prev.state() {
                for hook in self.graph.exit_hooks(state) {
                    if self.is_disposed() {
                        break;
                    }
                    hook(self, why);
                }
            }
        }
        if self.is_disposed() {
            return Ok(false);
        }

        self.commit(prev.as_deref(), &next, why);
        if self.is_disposed() {
            return Ok(false);
        }

        if let Some(source) = effect {
            self.process_effect(EffectAction::new(Rc::clone(source), event.clone()));
        }
        if self.is_disposed() {
            return Ok(false);
        }

        if next.is_condition() {
            for trigger in next.triggers() {
                if self.handle_trigger(trigger)? {
                    return Ok(!self.is_disposed());
                }
                if self.is_disposed() {
                    return Ok(false);
                }
            }
            if self.is_disposed() {
                return Ok(false);
            }
            error!(machine = %self.id, state = next.name(), "condition state blocked");
            return Err(MachineError::ConditionStateBlocked {
                state: next.name().to_string(),
            });
        }

        if let Some(state) = next.state() {
            for hook in self.graph.entry_hooks(state) {
                if self.is_disposed() {
                    break;
                }
                hook(self, why);
            }
        }
        if self.is_disposed() {
            return Ok(false);
        }

        self.end_transition.raise(&event);
        debug!(machine = %self.id, state = next.name(), "transition completed");

        Ok(!self.is_disposed())
    }

    fn guard_allows(&self, guard: &Guard<S>) -> bool {
        let _in_guard = InGuard {
            flag: &self.in_guard,
            previous: self.in_guard.replace(true),
        };
        !self.is_disposed() && guard.execute() && !self.is_disposed()
    }

    fn commit(&self, prev: Option<&StateNode<S>>, next: &Rc<StateNode<S>>, why: Option<&Trigger<S>>) {
        if self.is_disposed() {
            return;
        }
        *self.current.borrow_mut() = Some(Rc::clone(next));

        if let Some(to) = next.state() {
            let record = StateTransition {
                from: prev.and_then(StateNode::state).cloned(),
                to: to.clone(),
                trigger: why.map(|trigger| trigger.name().to_string()),
                timestamp: Utc::now(),
                depth: self.depth(),
            };
            self.history
                .borrow_mut()
                .push_bounded(record, self.options.history_limit);
        }

        self.property_changed.raise(&PropertyChanged {
            property: PropertyChanged::CURRENT_STATE,
        });
    }

    /// Resolve `trigger` against the current state right away, bypassing the
    /// queue.
    ///
    /// Returns `Ok(false)` when the current state has no transition for it.
    pub fn handle_trigger(&self, trigger: &Trigger<S>) -> Result<bool, MachineError> {
        if self.is_disposed() {
            return Ok(false);
        }
        let Some(current) = self.current.borrow().clone() else {
            return Ok(false);
        };
        let Some(state) = current.state() else {
            return Ok(false);
        };
        let Some(route) = self.graph.route(state, trigger.name()) else {
            debug!(
                machine = %self.id,
                state = current.name(),
                trigger = trigger.name(),
                "trigger not handled in current state"
            );
            return Ok(false);
        };

        let guard = route
            .guard
            .as_ref()
            .map(|predicate| Guard::bound(Weak::clone(&self.this), Rc::clone(predicate)));
        self.transition_to_new_state(
            route.to.clone(),
            Some(trigger),
            guard.as_ref(),
            route.effect.as_ref(),
        )
    }

    /// Fire the trigger called `name` on the current state.
    ///
    /// Does nothing once the machine is disposed.
    pub fn fire(&self, name: &str) -> Result<(), MachineError> {
        if self.is_disposed() {
            return Ok(());
        }
        match self.current_state() {
            Some(node) => node.fire(name),
            None => Err(MachineError::UnknownTrigger {
                state: "(none)".to_string(),
                trigger: crate::core::trigger_key(name),
            }),
        }
    }

    /// Queue `trigger` for the next tick. Returns immediately.
    pub fn process_trigger(&self, trigger: Trigger<S>) {
        if self.is_disposed() {
            return;
        }
        self.queue.borrow_mut().push_back(QueueEntry::Single(trigger));
        self.schedule_trigger_tick();
        self.pump_if_configured();
    }

    /// Queue an ordered batch. The tick that consumes it stops at the first
    /// trigger that completes a transition.
    pub fn process_triggers(&self, triggers: Vec<Trigger<S>>) {
        if self.is_disposed() || triggers.is_empty() {
            return;
        }
        self.queue.borrow_mut().push_back(QueueEntry::Batch(triggers));
        self.schedule_trigger_tick();
        self.pump_if_configured();
    }

    fn process_effect(&self, action: EffectAction<S>) {
        if self.is_disposed() {
            return;
        }
        self.effects.borrow_mut().push_back(action);
        self.schedule_effect_tick();
        self.pump_if_configured();
    }

    fn pump_if_configured(&self) {
        if self.options.pump_on_enqueue {
            self.scheduler.pump();
        }
    }

    fn schedule_trigger_tick(&self) {
        let this = Weak::clone(&self.this);
        self.trigger_tick.start(
            &*self.scheduler,
            Box::new(move || match this.upgrade() {
                Some(machine) => {
                    machine.trigger_tick.fired();
                    machine.consume_trigger_queue()
                }
                None => Ok(()),
            }),
        );
    }

    fn schedule_effect_tick(&self) {
        let this = Weak::clone(&self.this);
        self.effect_tick.start(
            &*self.scheduler,
            Box::new(move || match this.upgrade() {
                Some(machine) => {
                    machine.effect_tick.fired();
                    machine.consume_effect_queue()
                }
                None => Ok(()),
            }),
        );
    }

    fn consume_trigger_queue(&self) -> Result<(), MachineError> {
        if self.is_disposed() {
            return Ok(());
        }

        if self.is_in_guard() {
            debug!(
                machine = %self.id,
                pending = self.pending_triggers(),
                "trigger queue deferred during guard evaluation"
            );
        } else {
            let entry = self.queue.borrow_mut().pop_front();
            match entry {
                Some(QueueEntry::Single(trigger)) => {
                    self.handle_trigger(&trigger)?;
                }
                Some(QueueEntry::Batch(triggers)) => {
                    for trigger in &triggers {
                        if self.is_disposed() || self.handle_trigger(trigger)? {
                            break;
                        }
                    }
                }
                None => {}
            }
            if self.is_disposed() {
                return Ok(());
            }
        }

        if self.pending_triggers() > 0 {
            self.schedule_trigger_tick();
        }
        Ok(())
    }

    fn consume_effect_queue(&self) -> Result<(), MachineError> {
        if self.is_disposed() {
            return Ok(());
        }

        let action = self.effects.borrow_mut().pop_front();
        if let Some(action) = action {
            action.fire();
            // The effect may have disposed the machine.
            if self.is_disposed() {
                return Ok(());
            }
        }

        if self.pending_effects() > 0 {
            self.schedule_effect_tick();
        }
        Ok(())
    }

    /// Tear the machine down.
    ///
    /// Idempotent. Closes every event source, stops both ticks, drops pending
    /// triggers and effects and leaves the registry. Safe to call from inside
    /// a guard, a hook, an effect or an event handler of this machine.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }

        self.property_changed.close();
        self.start_transition.close();
        self.before_exiting_previous_state.close();
        self.end_transition.close();
        self.trigger_tick.stop();
        self.effect_tick.stop();

        let dropped_triggers = std::mem::take(&mut *self.queue.borrow_mut());
        let dropped_effects = std::mem::take(&mut *self.effects.borrow_mut());
        let last_state = self.current.borrow_mut().take();

        registry::unregister();
        info!(
            machine = %self.id,
            name = %self.name(),
            state = last_state.as_deref().map(StateNode::name),
            dropped_triggers = dropped_triggers.len(),
            dropped_effects = dropped_effects.len(),
            "state machine disposed"
        );
    }
}

impl<S: State> Disposable for StateMachine<S> {
    fn dispose(&self) {
        StateMachine::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        StateMachine::is_disposed(self)
    }
}

impl<S: State> Drop for StateMachine<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("name", &self.name())
            .field(
                "current",
                &self.current_state().as_deref().map(StateNode::name),
            )
            .field("disposed", &self.is_disposed())
            .field("pending_triggers", &self.pending_triggers())
            .field("pending_effects", &self.pending_effects())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, MachineBuilder, StateGraphBuilder, TransitionBuilder};
    use crate::events::handler;
    use crate::schedule::TickLoop;

    crate::state_enum! {
        enum Flow {
            Idle,
            Decide,
            Busy,
            Done,
        }
        condition: [Decide]
    }

    fn build(graph: StateGraph<Flow>, tick_loop: &Rc<TickLoop>) -> Rc<StateMachine<Flow>> {
        MachineBuilder::new()
            .graph(graph)
            .initial(Flow::Idle)
            .scheduler(Rc::clone(tick_loop))
            .build()
            .unwrap()
    }

    #[test]
    fn start_enters_initial_state() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);

        assert!(machine.current_state().is_none());
        assert!(!machine.is_working());
        assert!(machine.start().unwrap());
        assert_eq!(machine.current_state().unwrap().name(), "Idle");
        assert!(machine.is_working());
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn firing_only_enqueues() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();

        machine.fire("Go").unwrap();
        machine.fire("Go").unwrap();

        assert_eq!(machine.current_state().unwrap().name(), "Idle");
        assert_eq!(machine.pending_triggers(), 2);
        assert_eq!(tick_loop.pending(), 1);

        tick_loop.run_until_idle().unwrap();
        assert_eq!(machine.current_state().unwrap().name(), "Busy");
        assert_eq!(machine.pending_triggers(), 0);
    }

    #[test]
    fn fire_before_start_is_unknown_trigger() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);

        assert!(matches!(
            machine.fire("Go"),
            Err(MachineError::UnknownTrigger { .. })
        ));
    }

    #[test]
    fn condition_state_resolves_recursively() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Decide))
            .transition(
                TransitionBuilder::new()
                    .from(Flow::Decide)
                    .on("Maybe")
                    .to(Flow::Busy)
                    .when(|_| false),
            )
            .unwrap()
            .add_transition(simple_transition(Flow::Decide, "Else", Flow::Done))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();

        let depths = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&depths);
        let weak = Rc::downgrade(&machine);
        let observer = handler(move |_: &TransitionEvent<Flow>| {
            if let Some(machine) = weak.upgrade() {
                sink.borrow_mut().push(machine.depth());
            }
        });
        machine.start_transition().subscribe(&observer);

        machine.fire("Go").unwrap();
        tick_loop.run_until_idle().unwrap();

        assert_eq!(machine.current_state().unwrap().name(), "Done");
        assert_eq!(*depths.borrow(), vec![1, 2, 2]);
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn blocked_condition_state_surfaces_error() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Decide))
            .transition(
                TransitionBuilder::new()
                    .from(Flow::Decide)
                    .on("Never")
                    .to(Flow::Busy)
                    .when(|_| false),
            )
            .unwrap()
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();

        machine.fire("Go").unwrap();

        assert_eq!(
            tick_loop.run_until_idle(),
            Err(MachineError::ConditionStateBlocked {
                state: "Decide".to_string()
            })
        );
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn in_guard_flag_clears_after_rejection() {
        let tick_loop = TickLoop::new();
        let seen_in_guard = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen_in_guard);
        let graph = StateGraphBuilder::new()
            .transition(
                TransitionBuilder::new()
                    .from(Flow::Idle)
                    .on("Go")
                    .to(Flow::Busy)
                    .when(move |m| {
                        flag.set(m.is_in_guard());
                        false
                    }),
            )
            .unwrap()
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();

        machine.fire("Go").unwrap();
        tick_loop.run_until_idle().unwrap();

        assert!(seen_in_guard.get());
        assert!(!machine.is_in_guard());
        assert_eq!(machine.current_state().unwrap().name(), "Idle");
    }

    #[test]
    fn nested_guard_keeps_outer_guard_flagged() {
        let tick_loop = TickLoop::new();
        let inner_flagged = Rc::new(Cell::new(false));
        let outer_flagged_after = Rc::new(Cell::new(false));
        let inner = Rc::clone(&inner_flagged);
        let outer = Rc::clone(&outer_flagged_after);
        let graph = StateGraphBuilder::new()
            .transition(
                TransitionBuilder::new()
                    .from(Flow::Idle)
                    .on("Go")
                    .to(Flow::Done)
                    .when(move |m| {
                        let peek = Trigger::bound(Weak::clone(&m.this), "Peek");
                        assert_eq!(m.handle_trigger(&peek), Ok(true));
                        outer.set(m.is_in_guard());
                        false
                    }),
            )
            .unwrap()
            .transition(
                TransitionBuilder::new()
                    .from(Flow::Idle)
                    .on("Peek")
                    .to(Flow::Busy)
                    .when(move |m| {
                        inner.set(m.is_in_guard());
                        true
                    }),
            )
            .unwrap()
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();

        machine.fire("Go").unwrap();
        tick_loop.run_until_idle().unwrap();

        assert!(inner_flagged.get());
        assert!(outer_flagged_after.get());
        assert!(!machine.is_in_guard());
        assert_eq!(machine.current_state().unwrap().name(), "Busy");
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn dispose_is_idempotent_and_drops_pending_work() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();
        machine.fire("Go").unwrap();

        machine.dispose();
        machine.dispose();

        assert!(machine.is_disposed());
        assert_eq!(machine.pending_triggers(), 0);
        assert!(machine.current_state().unwrap().is_disposed());
        assert_eq!(tick_loop.run_until_idle().unwrap(), 1);
        assert!(!machine.start().unwrap());
    }

    #[test]
    fn history_journals_commits() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .add_transition(simple_transition(Flow::Busy, "Finish", Flow::Done))
            .build()
            .unwrap();
        let machine = build(graph, &tick_loop);
        machine.start().unwrap();
        machine.fire("Go").unwrap();
        tick_loop.run_until_idle().unwrap();
        machine.fire("Finish").unwrap();
        tick_loop.run_until_idle().unwrap();

        let history = machine.history();
        assert_eq!(
            history.get_path(),
            vec![&Flow::Idle, &Flow::Busy, &Flow::Done]
        );
        assert_eq!(history.transitions()[1].trigger.as_deref(), Some("Go"));
        assert!(history.transitions().iter().all(|t| t.depth == 1));
    }

    #[test]
    fn host_journal_outlives_capped_history() {
        let tick_loop = TickLoop::new();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Flow::Idle, "Go", Flow::Busy))
            .add_transition(simple_transition(Flow::Busy, "Back", Flow::Idle))
            .build()
            .unwrap();
        let machine = MachineBuilder::new()
            .graph(graph)
            .initial(Flow::Idle)
            .scheduler(Rc::clone(&tick_loop))
            .history_limit(2)
            .build()
            .unwrap();
        machine.start().unwrap();

        let mut journal = StateHistory::new();
        for name in ["Go", "Back", "Go", "Back"] {
            machine.fire(name).unwrap();
            tick_loop.run_until_idle().unwrap();
            let latest = machine.history().transitions().last().cloned().unwrap();
            journal = journal.record(latest);
        }

        assert_eq!(machine.history().len(), 2);
        assert_eq!(journal.len(), 4);
        assert_eq!(
            journal.get_path(),
            vec![&Flow::Idle, &Flow::Busy, &Flow::Idle, &Flow::Busy, &Flow::Idle]
        );
    }
}
