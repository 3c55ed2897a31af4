//! # genfsm
//!
//! Generation-based async finite state machine runtime for Tokio.
//!
//! A [`Fsm`] owns a fixed set of states, each implementing the [`State`]
//! contract: an async `enter` hook that resolves to an event id, and an
//! optional async `exit` hook. A transition table built during setup maps
//! `(event id, source state)` to a destination state. [`Fsm::run`] drives
//! one *generation* of the machine (enter, exit, transition, yield, repeat)
//! until [`Fsm::stop`] cancels it or a state returns [`CANCEL_EVENT`].
//! Every suspension inside a hook is raced against the generation's
//! cancellation token, so stopping aborts an in-flight hook immediately and
//! the machine can be restarted at once from any state.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use genfsm::{CANCEL_EVENT, EventId, Fsm, FsmError, State};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Tag {
//!     Boot,
//!     Done,
//! }
//!
//! const BOOTED: EventId = 1;
//!
//! struct Boot;
//!
//! #[async_trait]
//! impl State<Tag> for Boot {
//!     fn id(&self) -> Tag {
//!         Tag::Boot
//!     }
//!
//!     async fn enter(&self, _token: &CancellationToken) -> EventId {
//!         // Perform some async logic...
//!         BOOTED
//!     }
//! }
//!
//! struct Done;
//!
//! #[async_trait]
//! impl State<Tag> for Done {
//!     fn id(&self) -> Tag {
//!         Tag::Done
//!     }
//!
//!     async fn enter(&self, _token: &CancellationToken) -> EventId {
//!         CANCEL_EVENT
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), FsmError<Tag>> {
//! let states: Vec<Arc<dyn State<Tag>>> = vec![Arc::new(Boot), Arc::new(Done)];
//! let mut fsm = Fsm::new(states);
//! fsm.add_transition(BOOTED, Tag::Boot, Tag::Done)?;
//!
//! fsm.run(Tag::Boot).await?;
//! assert!(!fsm.is_running());
//! # Ok(())
//! # }
//! ```

mod error;
mod fsm;
mod state;

pub use crate::error::FsmError;
pub use crate::fsm::Fsm;
pub use crate::state::{CANCEL_EVENT, EventId, State};
