//! The lifting engine: a pure transition function over [`HistoryState`].
//!
//! Each command produces a structurally new history plus a minimal
//! invalidation index; only computed states at or after that index are
//! recomputed through the wrapped reducer. `None` means nothing was
//! invalidated and the computed cache is reused as-is.

use crate::error::{InstrumentError, Result};
use crate::history::actions::LiftedAction;
use crate::history::state::HistoryState;
use crate::store::{Reducer, SharedReducer};
use crate::types::{ActionId, ActionRecord, RecordedAction, Timestamp};
use std::mem;
use tracing::{debug, trace};

/// Lifts a user reducer over [`HistoryState`].
///
/// The engine owns the original initial state (the baseline `Reset`,
/// `Init` and `ImportActions` recompute against) and the optional
/// `max_age` bound that triggers auto-commit compaction.
pub struct LiftingEngine<S, A> {
    reducer: SharedReducer<S, A>,
    initial_state: S,
    max_age: Option<usize>,
}

impl<S, A> std::fmt::Debug for LiftingEngine<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiftingEngine")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl<S, A> LiftingEngine<S, A>
where
    S: Clone,
    A: Clone,
{
    /// Create an engine. `max_age` of `None` means unbounded history;
    /// a bound below 2 is a configuration error.
    pub fn new(
        reducer: SharedReducer<S, A>,
        initial_state: S,
        max_age: Option<usize>,
    ) -> Result<Self> {
        if let Some(n) = max_age {
            if n < 2 {
                return Err(InstrumentError::InvalidMaxAge(n));
            }
        }
        Ok(Self::from_validated(reducer, initial_state, max_age))
    }

    /// Construct without re-validating `max_age`. Callers must have
    /// validated the bound already.
    pub(crate) fn from_validated(
        reducer: SharedReducer<S, A>,
        initial_state: S,
        max_age: Option<usize>,
    ) -> Self {
        Self {
            reducer,
            initial_state,
            max_age,
        }
    }

    /// The canonical starting history: reset semantics, fully computed.
    pub fn initial_history(&self) -> HistoryState<S, A> {
        let mut state = HistoryState::reset(self.initial_state.clone());
        self.recompute(&mut state, 0);
        state
    }

    /// Apply one command, returning the next history state.
    ///
    /// Pure and total: unknown ids and out-of-range indices degrade to
    /// no-ops or clamps, never errors. Reducer panics are not caught.
    pub fn transition(
        &self,
        state: &HistoryState<S, A>,
        action: &LiftedAction<S, A>,
    ) -> HistoryState<S, A> {
        let (mut next, min_invalidated) = match action {
            LiftedAction::Reset => (HistoryState::reset(self.initial_state.clone()), Some(0)),

            LiftedAction::Commit => (Self::commit(state), Some(0)),

            LiftedAction::Rollback => (Self::rollback(state), Some(0)),

            LiftedAction::ToggleAction { id } => {
                // History before the toggled entry is provably unaffected.
                // The init entry is never toggled: sweeping it away would
                // leave a history without its opening entry.
                match state.staged_action_ids.iter().position(|staged| staged == id) {
                    Some(position) if position > 0 => {
                        (Self::toggle_action(state, *id), Some(position))
                    }
                    _ => (state.clone(), None),
                }
            }

            LiftedAction::SetActionsActive { start, end, active } => {
                Self::set_actions_active(state, *start, *end, *active)
            }

            LiftedAction::Sweep => (Self::sweep(state), Some(0)),

            LiftedAction::JumpToState { index } => {
                // The history has not changed; only the cursor moves.
                (Self::jump_to_state(state, *index), None)
            }

            LiftedAction::Perform { action, timestamp } => {
                let next = self.perform(state, action.clone(), *timestamp);
                // Only the newly appended entry needs computing.
                let appended = next.staged_action_ids.len() - 1;
                (next, Some(appended))
            }

            LiftedAction::ImportState { state: snapshot } => {
                // Adopt the snapshot verbatim; it already carries valid
                // computed states.
                (snapshot.clone(), None)
            }

            LiftedAction::ImportActions { actions } => {
                (self.import_actions(actions), Some(0))
            }

            LiftedAction::Init => {
                // Always recompute from the original initial state, so a
                // reducer swap or cold start rebuilds everything.
                (HistoryState::reset(self.initial_state.clone()), Some(0))
            }

            LiftedAction::Monitor { .. } => {
                // A monitor action can't change history.
                (state.clone(), None)
            }
        };

        trace!(
            command = action.kind(),
            staged = next.staged_action_ids.len(),
            invalidated_from = ?min_invalidated,
            "transition"
        );

        if let Some(from) = min_invalidated {
            self.recompute(&mut next, from);
        }
        next
    }

    /// Recompute `computed_states[from..]` by walking the staged ids,
    /// copying the previous state forward for skipped entries and applying
    /// the wrapped reducer otherwise. The prefix below `from` is kept.
    fn recompute(&self, state: &mut HistoryState<S, A>, from: usize) {
        state.computed_states.truncate(from);
        for i in from..state.staged_action_ids.len() {
            let id = state.staged_action_ids[i];
            let entry = {
                let previous = if i == 0 {
                    &state.committed_state
                } else {
                    &state.computed_states[i - 1]
                };
                if state.skipped_action_ids.contains(&id) {
                    previous.clone()
                } else {
                    match &state.actions_by_id[&id].action {
                        // The init marker is identity under recomputation.
                        RecordedAction::Init => previous.clone(),
                        RecordedAction::App(action) => self.reducer.reduce(previous, action),
                    }
                }
            };
            state.computed_states.push(entry);
        }
    }

    /// Record a new application action, auto-committing the oldest staged
    /// action first if the history is at its `max_age` bound.
    fn perform(&self, state: &HistoryState<S, A>, action: A, timestamp: Timestamp) -> HistoryState<S, A> {
        let mut next = match self.max_age {
            Some(bound) if state.staged_action_ids.len() == bound => {
                Self::commit_excess_action(state)
            }
            _ => state.clone(),
        };

        // A cursor parked on the last entry follows new actions; a cursor
        // moved elsewhere by navigation is sticky.
        if next.current_state_index == next.staged_action_ids.len() - 1 {
            next.current_state_index += 1;
        }

        let id = next.next_action_id;
        next.actions_by_id
            .insert(id, ActionRecord::app(id, action, timestamp));
        next.next_action_id = id.next();
        next.staged_action_ids.push(id);
        next
    }

    /// Fold the single oldest non-init staged action into the committed
    /// baseline. Lossy: the folded action is unrecoverable afterwards.
    fn commit_excess_action(state: &HistoryState<S, A>) -> HistoryState<S, A> {
        let mut next = state.clone();
        // staged_action_ids[0] is the init entry; [1] is the oldest
        // application action. The bound is >= 2, so both exist.
        let dropped = next.staged_action_ids.remove(1);
        next.actions_by_id.remove(&dropped);
        next.skipped_action_ids.remove(&dropped);
        next.committed_state = next.computed_states[1].clone();
        next.computed_states.remove(0);
        next.current_state_index = next.current_state_index.saturating_sub(1);
        debug!(dropped = %dropped, "auto-committed oldest staged action");
        next
    }

    /// Squash the staged history: the state at the cursor becomes the new
    /// committed baseline.
    fn commit(state: &HistoryState<S, A>) -> HistoryState<S, A> {
        HistoryState::reset(state.computed_states[state.current_state_index].clone())
    }

    /// Forget the staged history, starting again from the last committed
    /// baseline.
    fn rollback(state: &HistoryState<S, A>) -> HistoryState<S, A> {
        HistoryState::reset(state.committed_state.clone())
    }

    fn toggle_action(state: &HistoryState<S, A>, id: ActionId) -> HistoryState<S, A> {
        let mut next = state.clone();
        if !next.skipped_action_ids.remove(&id) {
            next.skipped_action_ids.insert(id);
        }
        next
    }

    /// Enable or disable every *staged* id in `[start, end)`. Ids in the
    /// range that are not staged are ignored, keeping the skip set a subset
    /// of the staged ids. Returns the candidate state and the position of
    /// the first affected entry.
    fn set_actions_active(
        state: &HistoryState<S, A>,
        start: ActionId,
        end: ActionId,
        active: bool,
    ) -> (HistoryState<S, A>, Option<usize>) {
        let mut next = state.clone();
        let mut first_affected = None;
        for (position, id) in state.staged_action_ids.iter().enumerate().skip(1) {
            if id.0 >= start.0 && id.0 < end.0 {
                if active {
                    next.skipped_action_ids.remove(id);
                } else {
                    next.skipped_action_ids.insert(*id);
                }
                if first_affected.is_none() {
                    first_affected = Some(position);
                }
            }
        }
        (next, first_affected)
    }

    /// Drop every currently skipped action from the history for good. The
    /// init entry at index 0 is always retained.
    fn sweep(state: &HistoryState<S, A>) -> HistoryState<S, A> {
        let mut next = state.clone();
        let skipped = mem::take(&mut next.skipped_action_ids);
        let mut kept = Vec::with_capacity(next.staged_action_ids.len());
        for (position, id) in next.staged_action_ids.iter().enumerate() {
            if position == 0 || !skipped.contains(id) {
                kept.push(*id);
            } else {
                next.actions_by_id.remove(id);
            }
        }
        next.staged_action_ids = kept;
        next.current_state_index = next
            .current_state_index
            .min(next.staged_action_ids.len() - 1);
        next
    }

    /// Move the cursor, clamped into range.
    fn jump_to_state(state: &HistoryState<S, A>, index: usize) -> HistoryState<S, A> {
        let mut next = state.clone();
        next.current_state_index = index.min(state.computed_states.len().saturating_sub(1));
        next
    }

    /// Rebuild the history as init + one perform per supplied action,
    /// cursor on the last entry. Recomputed from the original initial state.
    fn import_actions(&self, actions: &[A]) -> HistoryState<S, A> {
        let imported_at = Timestamp::now();
        let mut next = HistoryState::reset(self.initial_state.clone());
        for action in actions {
            let id = next.next_action_id;
            next.actions_by_id
                .insert(id, ActionRecord::app(id, action.clone(), imported_at));
            next.next_action_id = id.next();
            next.staged_action_ids.push(id);
        }
        next.current_state_index = next.staged_action_ids.len() - 1;
        next
    }
}

impl<S, A> Reducer<HistoryState<S, A>, LiftedAction<S, A>> for LiftingEngine<S, A>
where
    S: Clone,
    A: Clone,
{
    fn reduce(
        &self,
        state: &HistoryState<S, A>,
        action: &LiftedAction<S, A>,
    ) -> HistoryState<S, A> {
        self.transition(state, action)
    }
}
