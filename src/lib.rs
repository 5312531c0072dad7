//! # Rewind
//!
//! A time-travel instrumentation layer for unidirectional state stores.
//!
//! Rewind wraps an existing store (anything with `dispatch` / `get_state` /
//! `subscribe` / `replace_reducer`) without touching its implementation. It
//! intercepts every dispatched action, records it, and maintains a navigable
//! history of computed states, so a caller can jump to, disable, re-enable,
//! commit or roll back any point in that history. Recomputation is
//! incremental: each history edit invalidates only the suffix of states it
//! can actually affect.
//!
//! ## Core Concepts
//!
//! - **History state**: the lifted value tracking the action log, skip set,
//!   computed-state cache and cursor
//! - **Lifting engine**: a pure transition function evolving the history in
//!   response to commands (perform, commit, rollback, toggle, sweep, jump,
//!   import)
//! - **Instrument**: the enhancer installing the engine around a store, plus
//!   the facade application code keeps using unchanged
//! - **Snapshots**: lossless export/import of a full history
//!
//! ## Example
//!
//! ```ignore
//! use rewind::{Instrument, InstrumentConfig, LiftedAction, SharedReducer};
//! use std::sync::Arc;
//!
//! let handle = Instrument::new(InstrumentConfig { max_age: Some(50) })?;
//! let create = handle.instrument(|reducer, initial| my_store(reducer, initial));
//!
//! let reducer: SharedReducer<i64, Action> = Arc::new(counter);
//! let store = create(reducer, 0)?;
//!
//! store.dispatch(Action::Increment);
//! handle.dev_store()?.dispatch(LiftedAction::Commit);
//! ```

pub mod error;
pub mod history;
pub mod instrument;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-exports
pub use error::{InstrumentError, Result};
pub use history::{HistoryState, LiftedAction, LiftingEngine};
pub use instrument::{Instrument, InstrumentConfig, LiftedStoreRef};
pub use store::{Listener, Reducer, SharedReducer, Store, StoreRef, SubscriptionId};
pub use types::*;
