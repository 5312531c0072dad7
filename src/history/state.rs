//! The lifted history state.

use crate::types::{ActionId, ActionRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Immutable snapshot of the entire instrumentation state: the action log,
/// its ordering, the skip set, the computed-state cache and the cursor.
///
/// `S` is the wrapped application state, `A` the application action type.
/// Every transition of the lifting engine produces a brand-new value; a
/// `HistoryState` handed out (for example as an exported snapshot) is never
/// mutated afterwards and is safe to share across threads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryState<S, A> {
    /// Every action still referenced by the staged history, keyed by id.
    /// Keys need not be contiguous after auto-commit trimming, but are
    /// always strictly less than `next_action_id`.
    pub actions_by_id: HashMap<ActionId, ActionRecord<A>>,

    /// Id to assign to the next performed action.
    pub next_action_id: ActionId,

    /// Application order of still-tracked actions. Index 0 is always the
    /// synthetic init entry.
    pub staged_action_ids: Vec<ActionId>,

    /// Staged ids whose effect is suppressed during recomputation.
    /// Always a subset of `staged_action_ids`.
    pub skipped_action_ids: HashSet<ActionId>,

    /// Baseline application state immediately before `staged_action_ids[0]`.
    pub committed_state: S,

    /// Index into `computed_states` of the state the facade projects.
    pub current_state_index: usize,

    /// One computed state per staged action, same order. `computed_states[i]`
    /// is the state after applying (or skipping) `staged_action_ids[i]`
    /// starting from `committed_state`.
    pub computed_states: Vec<S>,
}

impl<S, A> HistoryState<S, A> {
    /// Canonical empty history: a single synthetic init entry at id 0,
    /// cursor 0, computed cache left for the engine to fill in.
    pub(crate) fn reset(committed_state: S) -> Self {
        let init_id = ActionId(0);
        Self {
            actions_by_id: HashMap::from([(init_id, ActionRecord::init(init_id))]),
            next_action_id: init_id.next(),
            staged_action_ids: vec![init_id],
            skipped_action_ids: HashSet::new(),
            committed_state,
            current_state_index: 0,
            computed_states: Vec::new(),
        }
    }

    /// The state at the cursor — what the facade's `get_state` returns.
    ///
    /// Panics if the computed cache has not been filled in, which is never
    /// the case for a state returned by the engine.
    pub fn current_state(&self) -> &S {
        &self.computed_states[self.current_state_index]
    }

    /// Number of staged actions, including the init entry.
    pub fn len(&self) -> usize {
        self.staged_action_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged_action_ids.is_empty()
    }
}
