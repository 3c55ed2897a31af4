//! The collaborator contract every state of a machine implements.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Event identifier returned by a state's enter hook.
///
/// Any value is valid except [`CANCEL_EVENT`], which is reserved.
pub type EventId = i32;

/// Reserved event id a state may return from [`State::enter`] to request
/// machine shutdown instead of a transition.
pub const CANCEL_EVENT: EventId = -1;

/// A single state of a machine, identified by the tag type `I`.
///
/// Both hooks receive the cancellation token of the generation that invoked
/// them, so that any suspension they perform can be threaded through it. The
/// run loop additionally races every hook against the same token: when
/// [`Fsm::stop`](crate::Fsm::stop) fires, an in-flight hook is abandoned and
/// the loop unwinds without running [`exit`](State::exit) for that state.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use genfsm::{EventId, State};
/// use tokio_util::sync::CancellationToken;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Tag {
///     Idle,
/// }
///
/// struct Idle;
///
/// #[async_trait]
/// impl State<Tag> for Idle {
///     fn id(&self) -> Tag {
///         Tag::Idle
///     }
///
///     async fn enter(&self, _token: &CancellationToken) -> EventId {
///         // Perform some async logic...
///         1
///     }
/// }
/// ```
#[async_trait]
pub trait State<I>: Send + Sync {
    /// The identity tag of this state within its machine.
    fn id(&self) -> I;

    /// Invoked when the machine enters this state.
    ///
    /// Returns the event id selecting the next transition, or
    /// [`CANCEL_EVENT`] to stop the machine.
    async fn enter(&self, token: &CancellationToken) -> EventId;

    /// Invoked when the machine leaves this state, before the transition
    /// lookup. Defaults to a no-op.
    async fn exit(&self, _token: &CancellationToken) {}
}
