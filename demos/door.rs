//! Door State Machine
//!
//! This example demonstrates a machine hosted by an object, with a condition
//! state, a guard and an effect.
//!
//! Key concepts:
//! - A host owning its machine
//! - Condition states that resolve immediately on entry
//! - Effects raised one tick after the transition commits
//! - Driving the machine with a deterministic tick loop
//! - Disposing the machine from inside an effect handler
//!
//! Run with: RUST_LOG=debug cargo run --example door

use statehost::builder::{effect_transition, simple_transition, MachineBuilder, StateGraphBuilder};
use statehost::events::{handler, TransitionEvent};
use statehost::machine::{EffectSource, StateMachine, StateMachineHost};
use statehost::schedule::TickLoop;
use statehost::{state_enum, BuildError, TransitionBuilder};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Door {
        Closed,
        CheckLock,
        Open,
        Locked,
        Broken,
    }
    condition: [CheckLock]
}

struct FrontDoor {
    this: Weak<FrontDoor>,
    locked: Cell<bool>,
    tick_loop: Rc<TickLoop>,
    alarm: EffectSource<Door>,
    machine: RefCell<Option<Rc<StateMachine<Door>>>>,
}

impl FrontDoor {
    fn new(tick_loop: Rc<TickLoop>) -> Rc<Self> {
        Rc::new_cyclic(|this| FrontDoor {
            this: this.clone(),
            locked: Cell::new(true),
            tick_loop,
            alarm: Rc::default(),
            machine: RefCell::new(None),
        })
    }

    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl StateMachineHost<Door> for FrontDoor {
    fn new_state_machine(&self) -> Result<Rc<StateMachine<Door>>, BuildError> {
        let door = self.this.clone();
        let graph = StateGraphBuilder::new()
            .add_transition(simple_transition(Door::Closed, "Push", Door::CheckLock))
            .transition(
                TransitionBuilder::new()
                    .from(Door::CheckLock)
                    .on("Unlocked")
                    .to(Door::Open)
                    .when(move |_| door.upgrade().is_some_and(|door| !door.is_locked())),
            )?
            .add_transition(simple_transition(Door::CheckLock, "Otherwise", Door::Locked))
            .add_transition(simple_transition(Door::Locked, "Retry", Door::CheckLock))
            .add_transition(effect_transition(Door::Open, "Kick", Door::Broken, &self.alarm))
            .on_entry(Door::Open, |_, _| println!("  the door swings open"))
            .on_entry(Door::Locked, |_, _| println!("  the door is locked"))
            .on_entry(Door::Broken, |_, _| println!("  the door breaks"))
            .build()?;

        let mut builder = MachineBuilder::new()
            .graph(graph)
            .initial(Door::Closed)
            .scheduler(Rc::clone(&self.tick_loop))
            .name("front-door");
        if let Some(this) = self.this.upgrade() {
            builder = builder.host(&this);
        }
        let machine = builder.build()?;

        *self.machine.borrow_mut() = Some(Rc::clone(&machine));
        Ok(machine)
    }

    fn current_state_machine(&self) -> Option<Rc<StateMachine<Door>>> {
        self.machine.borrow().clone()
    }
}

fn report(machine: &StateMachine<Door>) {
    if let Some(state) = machine.current_state() {
        println!("Current state: {}\n", state.name());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door State Machine ===\n");

    let tick_loop = TickLoop::new();
    let door = FrontDoor::new(Rc::clone(&tick_loop));
    let machine = door.new_state_machine()?;

    let owner = Rc::downgrade(&door);
    let on_alarm = handler(move |event: &TransitionEvent<Door>| {
        println!("  alarm: {event}");
        if let Some(machine) = owner.upgrade().and_then(|door| door.current_state_machine()) {
            machine.dispose();
        }
    });
    door.alarm.subscribe(&on_alarm);

    machine.start()?;
    report(&machine);

    println!("Pushing the locked door:");
    machine.fire("Push")?;
    tick_loop.run_until_idle()?;
    report(&machine);

    println!("Unlocking and retrying:");
    door.locked.set(false);
    machine.fire("Retry")?;
    tick_loop.run_until_idle()?;
    report(&machine);

    println!("Kicking the open door:");
    machine.fire("Kick")?;
    tick_loop.run_until_idle()?;
    report(&machine);

    println!("Path: {:?}", machine.history().get_path());
    println!("\n=== Example Complete ===");
    Ok(())
}
