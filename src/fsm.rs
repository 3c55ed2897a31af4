//! The machine itself: state registry, transition table, and the run loop.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::FsmError;
use crate::state::{CANCEL_EVENT, EventId, State};

/// An event-driven finite state machine with asynchronous lifecycle hooks.
///
/// A machine owns a fixed set of states keyed by the identity tag `I`, a
/// transition table mapping `(event id, source state)` to a destination
/// state, and a single mutable current-state cell. The state set is fixed at
/// construction and the table is populated with [`add_transition`] before
/// the first run; both are read-only afterwards.
///
/// [`run`] drives one *generation*: a cooperative loop that awaits the
/// current state's [`enter`](State::enter) hook, consults the table with the
/// returned event id, awaits the [`exit`](State::exit) hook, and moves on.
/// [`stop`] ends the generation by cancelling its token; every suspension
/// inside the hooks is raced against that token, so an in-flight hook is
/// abandoned immediately and the loop unwinds without running `exit` for the
/// abandoned state. A later [`run`] starts a fresh generation with a fresh
/// token.
///
/// [`add_transition`]: Fsm::add_transition
/// [`run`]: Fsm::run
/// [`stop`]: Fsm::stop
pub struct Fsm<I> {
    states: HashMap<I, Arc<dyn State<I>>>,
    transitions: HashMap<(EventId, I), I>,
    current: Mutex<Option<I>>,
    generation: Mutex<CancellationToken>,
}

impl<I> Fsm<I>
where
    I: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static,
{
    /// Creates a machine from its fixed set of states.
    ///
    /// The transition table starts empty and the machine is not running.
    /// If two states carry the same identity tag, the first one is kept.
    pub fn new(states: impl IntoIterator<Item = Arc<dyn State<I>>>) -> Self {
        let mut set: HashMap<I, Arc<dyn State<I>>> = HashMap::new();
        for state in states {
            set.entry(state.id()).or_insert(state);
        }
        Self {
            states: set,
            transitions: HashMap::new(),
            current: Mutex::new(None),
            generation: Mutex::new(CancellationToken::new()),
        }
    }

    /// Registers a transition from `from` to `to`, triggered when the enter
    /// hook of `from` returns `event`. Call during machine setup, before the
    /// first [`run`](Fsm::run).
    ///
    /// If either endpoint is not a registered state the call is a silent
    /// no-op. Fails if `event` is [`CANCEL_EVENT`] or if a transition for
    /// `(event, from)` already exists.
    pub fn add_transition(&mut self, event: EventId, from: I, to: I) -> Result<(), FsmError<I>> {
        if event == CANCEL_EVENT {
            return Err(FsmError::ReservedEventId(event));
        }

        if !self.states.contains_key(&from) || !self.states.contains_key(&to) {
            return Ok(());
        }

        if self.transitions.contains_key(&(event, from)) {
            return Err(FsmError::DuplicateTransition { event, from, to });
        }

        self.transitions.insert((event, from), to);
        trace!(event, from = ?from, to = ?to, "transition registered");
        Ok(())
    }

    /// Runs the machine starting from the state tagged `start`, until the
    /// generation is cancelled by [`stop`](Fsm::stop) or a state returns
    /// [`CANCEL_EVENT`] from its enter hook.
    ///
    /// Each loop iteration awaits the current state's enter hook, then its
    /// exit hook, then applies the transition for the returned event id. An
    /// event id with no registered transition leaves the current state
    /// unchanged and the loop re-enters it. The loop yields to the runtime
    /// once per iteration so a machine of non-suspending states cannot
    /// monopolize its executor.
    ///
    /// Fails with [`FsmError::StateNotFound`] before suspending if `start`
    /// is not a registered state. Cancellation is not an error: the returned
    /// future resolves to `Ok(())` on any form of shutdown.
    pub async fn run(&self, start: I) -> Result<(), FsmError<I>> {
        if !self.states.contains_key(&start) {
            return Err(FsmError::StateNotFound(start));
        }

        *self.lock_current() = Some(start);
        let token = self.lock_generation().clone();
        debug!(start = ?start, "generation started");

        while !token.is_cancelled() {
            // The cell is shared with stop() and with any newer generation;
            // finding it empty means someone else ended this run.
            let Some(state) = self.current_state() else {
                break;
            };

            let Some(event) = token.run_until_cancelled(state.enter(&token)).await else {
                trace!(state = ?state.id(), "enter hook abandoned");
                break;
            };

            if event == CANCEL_EVENT {
                debug!(state = ?state.id(), "shutdown requested by state");
                self.stop();
                break;
            }

            if token.run_until_cancelled(state.exit(&token)).await.is_none() {
                trace!(state = ?state.id(), "exit hook abandoned");
                break;
            }

            if let Some(next) = self.transitions.get(&(event, state.id())) {
                trace!(event, from = ?state.id(), to = ?next, "transition");
                *self.lock_current() = Some(*next);
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Stops the machine: clears the current state and cancels the active
    /// generation, aborting any suspension in flight inside a hook.
    ///
    /// A fresh cancellation token is installed for the next
    /// [`run`](Fsm::run). Idempotent; stopping a stopped machine is a no-op.
    pub fn stop(&self) {
        self.lock_current().take();

        let mut generation = self.lock_generation();
        generation.cancel();
        *generation = CancellationToken::new();
        debug!("generation stopped");
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered transitions, across all event ids.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Whether a generation is active, i.e. the machine has a current state.
    pub fn is_running(&self) -> bool {
        self.lock_current().is_some()
    }

    fn current_state(&self) -> Option<Arc<dyn State<I>>> {
        let id = (*self.lock_current())?;
        self.states.get(&id).cloned()
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<I>> {
        self.current.lock().expect("current-state lock poisoned")
    }

    fn lock_generation(&self) -> MutexGuard<'_, CancellationToken> {
        self.generation.lock().expect("generation lock poisoned")
    }
}

impl<I> fmt::Display for Fsm<I>
where
    I: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static,
{
    /// Renders a diagnostic dump: the current state's tag, every registered
    /// state's tag, and every transition as `event: from -> to`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = match *self.lock_current() {
            Some(id) => format!("{id:?}"),
            None => "<none>".to_owned(),
        };
        let states = self
            .states
            .keys()
            .map(|id| format!("{id:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let transitions = self
            .transitions
            .iter()
            .map(|((event, from), to)| format!("{event}: {from:?} -> {to:?}"))
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "Current State: {current}, States: {states}, Transitions: {transitions}"
        )
    }
}
