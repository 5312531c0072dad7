//! History state and the lifting engine.

pub mod actions;
pub mod engine;
pub mod state;

pub use actions::LiftedAction;
pub use engine::LiftingEngine;
pub use state::HistoryState;
