//! Shared fixtures: a 3-state cycle with observable flags, a state that
//! requests shutdown, and a pair of counting states for loop behavior.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use genfsm::{CANCEL_EVENT, EventId, Fsm, State};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

pub const SELF_LOOP: EventId = 0;
pub const A_TO_B: EventId = 1;
pub const B_TO_C: EventId = 2;
pub const C_TO_A: EventId = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    A,
    B,
    C,
    D,
}

/// Collaborator-side observations, set by the fixture hooks.
#[derive(Debug, Default)]
pub struct Flags {
    pub exit_a: AtomicBool,
    pub changed_to_b: AtomicBool,
    pub changed_to_c: AtomicBool,
}

pub struct StateA {
    flags: Arc<Flags>,
}

impl StateA {
    pub fn new(flags: Arc<Flags>) -> Self {
        Self { flags }
    }
}

#[async_trait]
impl State<Tag> for StateA {
    fn id(&self) -> Tag {
        Tag::A
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        sleep(Duration::from_millis(50)).await;
        A_TO_B
    }

    async fn exit(&self, _token: &CancellationToken) {
        self.flags.exit_a.store(true, Ordering::Relaxed);
    }
}

pub struct StateB {
    flags: Arc<Flags>,
}

impl StateB {
    pub fn new(flags: Arc<Flags>) -> Self {
        Self { flags }
    }
}

#[async_trait]
impl State<Tag> for StateB {
    fn id(&self) -> Tag {
        Tag::B
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        self.flags.changed_to_b.store(true, Ordering::Relaxed);
        sleep(Duration::from_millis(50)).await;
        B_TO_C
    }

    async fn exit(&self, _token: &CancellationToken) {
        sleep(Duration::from_millis(50)).await;
    }
}

pub struct StateC {
    flags: Arc<Flags>,
}

impl StateC {
    pub fn new(flags: Arc<Flags>) -> Self {
        Self { flags }
    }
}

#[async_trait]
impl State<Tag> for StateC {
    fn id(&self) -> Tag {
        Tag::C
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        self.flags.changed_to_c.store(true, Ordering::Relaxed);
        sleep(Duration::from_millis(50)).await;
        C_TO_A
    }

    async fn exit(&self, _token: &CancellationToken) {
        sleep(Duration::from_millis(50)).await;
    }
}

/// Requests machine shutdown from its enter hook.
pub struct StateD;

#[async_trait]
impl State<Tag> for StateD {
    fn id(&self) -> Tag {
        Tag::D
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        sleep(Duration::from_millis(50)).await;
        CANCEL_EVENT
    }
}

/// Counts its enter invocations and always emits [`SELF_LOOP`].
pub struct Looper {
    entered: Arc<AtomicUsize>,
}

impl Looper {
    pub fn new(entered: Arc<AtomicUsize>) -> Self {
        Self { entered }
    }
}

#[async_trait]
impl State<Tag> for Looper {
    fn id(&self) -> Tag {
        Tag::A
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        self.entered.fetch_add(1, Ordering::Relaxed);
        sleep(Duration::from_millis(50)).await;
        SELF_LOOP
    }
}

/// Counts its enter invocations and emits an event id no transition is
/// registered for.
pub struct NoRoute {
    entered: Arc<AtomicUsize>,
}

impl NoRoute {
    pub fn new(entered: Arc<AtomicUsize>) -> Self {
        Self { entered }
    }
}

#[async_trait]
impl State<Tag> for NoRoute {
    fn id(&self) -> Tag {
        Tag::A
    }

    async fn enter(&self, _token: &CancellationToken) -> EventId {
        self.entered.fetch_add(1, Ordering::Relaxed);
        sleep(Duration::from_millis(50)).await;
        42
    }
}

/// The A -> B -> C -> A cycle machine used by most tests.
pub fn cycle_fsm(flags: &Arc<Flags>) -> Fsm<Tag> {
    let states: Vec<Arc<dyn State<Tag>>> = vec![
        Arc::new(StateA::new(flags.clone())),
        Arc::new(StateB::new(flags.clone())),
        Arc::new(StateC::new(flags.clone())),
    ];

    let mut fsm = Fsm::new(states);
    fsm.add_transition(A_TO_B, Tag::A, Tag::B).unwrap();
    fsm.add_transition(B_TO_C, Tag::B, Tag::C).unwrap();
    fsm.add_transition(C_TO_A, Tag::C, Tag::A).unwrap();
    fsm
}
