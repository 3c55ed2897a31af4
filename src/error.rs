//! Error types for machine configuration and startup.

use std::fmt::Debug;

use crate::state::EventId;

/// Error type returned by [`Fsm`](crate::Fsm) operations.
///
/// All variants are programmer errors surfaced synchronously to the caller
/// of the triggering operation; none of them occurs once a correctly
/// configured machine is running. Cancellation is not an error and never
/// appears here.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FsmError<I: Debug> {
    /// The event id is reserved for requesting machine shutdown.
    #[error("event id {0} is reserved for cancellation, please use another id")]
    ReservedEventId(EventId),
    /// A transition for this (event id, source state) pair already exists.
    #[error("transition already exists: {from:?} -> {to:?}, event id {event}")]
    DuplicateTransition {
        /// Event id of the offending registration.
        event: EventId,
        /// Source state of the offending registration.
        from: I,
        /// Destination state of the offending registration.
        to: I,
    },
    /// The requested starting state is not registered on this machine.
    #[error("state not found: {0:?}")]
    StateNotFound(I),
}
