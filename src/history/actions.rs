//! History-control commands understood by the lifting engine.

use crate::history::state::HistoryState;
use crate::types::{ActionId, Timestamp};
use serde::{Deserialize, Serialize};

/// Commands dispatched to the lifted store.
///
/// `Perform` wraps an ordinary application action; every other variant
/// edits the history itself. The set is closed on purpose: tooling that
/// needs to send auxiliary actions through the lifted store uses
/// [`LiftedAction::Monitor`], which is defined to leave the history
/// untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LiftedAction<S, A> {
    /// Record and apply an application action.
    Perform { action: A, timestamp: Timestamp },

    /// Return to the initial state the store was created with, discarding
    /// all history.
    Reset,

    /// Squash the staged history into the committed baseline.
    Commit,

    /// Discard the staged history, keeping the committed baseline.
    Rollback,

    /// Flip whether the action with the given id is skipped. Skipped
    /// actions are no-ops during recomputation.
    ToggleAction { id: ActionId },

    /// Enable or disable every staged action in the half-open id range
    /// `[start, end)`.
    SetActionsActive {
        start: ActionId,
        end: ActionId,
        active: bool,
    },

    /// Permanently drop all currently skipped actions from the history.
    Sweep,

    /// Move the cursor without recomputing anything. Useful for sliders.
    JumpToState { index: usize },

    /// Replace the entire history with an imported snapshot.
    ImportState { state: HistoryState<S, A> },

    /// Rebuild the history by replaying raw actions from the initial state.
    ImportActions { actions: Vec<A> },

    /// Store-initialization signal: rebuild the canonical history and fully
    /// recompute through the current reducer. Dispatched on cold start and
    /// after a reducer swap.
    Init,

    /// Auxiliary action emitted by monitors/tooling; never touches history.
    Monitor { name: String },
}

impl<S, A> LiftedAction<S, A> {
    /// Wrap an application action, stamping the dispatch time.
    pub fn perform(action: A) -> Self {
        LiftedAction::Perform {
            action,
            timestamp: Timestamp::now(),
        }
    }

    /// Short command name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            LiftedAction::Perform { .. } => "perform",
            LiftedAction::Reset => "reset",
            LiftedAction::Commit => "commit",
            LiftedAction::Rollback => "rollback",
            LiftedAction::ToggleAction { .. } => "toggle_action",
            LiftedAction::SetActionsActive { .. } => "set_actions_active",
            LiftedAction::Sweep => "sweep",
            LiftedAction::JumpToState { .. } => "jump_to_state",
            LiftedAction::ImportState { .. } => "import_state",
            LiftedAction::ImportActions { .. } => "import_actions",
            LiftedAction::Init => "init",
            LiftedAction::Monitor { .. } => "monitor",
        }
    }
}
