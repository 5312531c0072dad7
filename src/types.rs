//! Core types for the instrumentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a recorded action.
///
/// Ids are issued monotonically within one history; commit, rollback and
/// reset start a fresh id space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct ActionId(pub u64);

impl ActionId {
    pub fn next(self) -> Self {
        ActionId(self.0 + 1)
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({})", self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_micros() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// What a history entry recorded: the synthetic init marker that opens
/// every history, or an application-level action captured by the facade.
///
/// The engine never inspects an application action; it only hands it back
/// to the wrapped reducer during recomputation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RecordedAction<A> {
    Init,
    App(A),
}

impl<A> RecordedAction<A> {
    pub fn is_init(&self) -> bool {
        matches!(self, RecordedAction::Init)
    }

    /// The application action, if this is not the init marker.
    pub fn as_app(&self) -> Option<&A> {
        match self {
            RecordedAction::Init => None,
            RecordedAction::App(action) => Some(action),
        }
    }
}

/// A single entry in the action log. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord<A> {
    /// Unique identifier (assigned by the engine).
    pub id: ActionId,

    /// The recorded payload.
    pub action: RecordedAction<A>,

    /// When the action was dispatched.
    pub timestamp: Timestamp,
}

impl<A> ActionRecord<A> {
    /// The synthetic init entry staged at the front of every history.
    pub fn init(id: ActionId) -> Self {
        Self {
            id,
            action: RecordedAction::Init,
            timestamp: Timestamp::now(),
        }
    }

    /// An application action captured at `timestamp`.
    pub fn app(id: ActionId, action: A, timestamp: Timestamp) -> Self {
        Self {
            id,
            action: RecordedAction::App(action),
            timestamp,
        }
    }
}
