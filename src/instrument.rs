//! Store adapter: the enhancer that installs the lifting engine around an
//! existing store, the unlifted facade handed back to application code, and
//! the handle tooling uses to observe the lifted store.

use crate::error::{InstrumentError, Result};
use crate::history::{HistoryState, LiftedAction, LiftingEngine};
use crate::store::{Listener, SharedReducer, Store, StoreRef, SubscriptionId};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// The lifted store type observed by tooling.
pub type LiftedStoreRef<S, A> = StoreRef<HistoryState<S, A>, LiftedAction<S, A>>;

/// Instrumentation options.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstrumentConfig {
    /// Auto-commit threshold: once the staged history reaches this length,
    /// recording a new action first folds the oldest one into the committed
    /// baseline. `None` means unbounded. Folded actions are unrecoverable;
    /// choose the bound accordingly. Must be at least 2.
    pub max_age: Option<usize>,
}

/// Handle to one instrumentation installation.
///
/// Created up front, attached to a store creation exactly once, then read
/// by any number of observers: `dev_store()` exposes the lifted store so
/// tooling can dispatch history-control commands and watch the full
/// [`HistoryState`].
pub struct Instrument<S, A> {
    config: InstrumentConfig,
    dev_store: OnceLock<LiftedStoreRef<S, A>>,
}

impl<S, A> Instrument<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    /// Create a handle. Fails immediately if `max_age` is below 2.
    pub fn new(config: InstrumentConfig) -> Result<Arc<Self>> {
        if let Some(n) = config.max_age {
            if n < 2 {
                return Err(InstrumentError::InvalidMaxAge(n));
            }
        }
        Ok(Arc::new(Self {
            config,
            dev_store: OnceLock::new(),
        }))
    }

    /// The lifted store, once a store has been created through
    /// [`Instrument::instrument`].
    pub fn dev_store(&self) -> Result<LiftedStoreRef<S, A>> {
        self.dev_store
            .get()
            .cloned()
            .ok_or(InstrumentError::NotInstrumented)
    }

    /// Enhance a store creator.
    ///
    /// `create` builds the underlying store from a lifted reducer and a
    /// lifted initial state (composing with further enhancers is the
    /// caller's concern, exactly as with any other enhancer). The returned
    /// creator lifts the user reducer and initial state, constructs the
    /// underlying store, publishes it on this handle, and hands back a
    /// facade of the original state type.
    pub fn instrument<C>(
        self: &Arc<Self>,
        create: C,
    ) -> impl Fn(SharedReducer<S, A>, S) -> Result<StoreRef<S, A>>
    where
        C: Fn(
            SharedReducer<HistoryState<S, A>, LiftedAction<S, A>>,
            HistoryState<S, A>,
        ) -> LiftedStoreRef<S, A>,
    {
        let handle = Arc::clone(self);
        move |reducer: SharedReducer<S, A>, initial_state: S| {
            let engine = LiftingEngine::new(
                Arc::clone(&reducer),
                initial_state.clone(),
                handle.config.max_age,
            )?;
            let lifted_initial = engine.initial_history();
            let lifted_reducer: SharedReducer<HistoryState<S, A>, LiftedAction<S, A>> =
                Arc::new(engine);

            let lifted_store = create(lifted_reducer, lifted_initial);
            handle
                .dev_store
                .set(Arc::clone(&lifted_store))
                .map_err(|_| InstrumentError::AlreadyInstrumented)?;

            debug!(max_age = ?handle.config.max_age, "instrumentation attached");
            Ok(Arc::new(UnliftedStore {
                lifted: lifted_store,
                initial_state,
                max_age: handle.config.max_age,
            }) as StoreRef<S, A>)
        }
    }
}

impl<S, A> std::fmt::Debug for Instrument<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrument")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Facade over the lifted store: application code sees a store of the
/// original state type.
struct UnliftedStore<S, A> {
    lifted: LiftedStoreRef<S, A>,
    /// Kept for rebuilding the lifted reducer on `replace_reducer`.
    initial_state: S,
    max_age: Option<usize>,
}

impl<S, A> Store<S, A> for UnliftedStore<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    fn dispatch(&self, action: A) -> A {
        self.lifted.dispatch(LiftedAction::perform(action.clone()));
        action
    }

    fn get_state(&self) -> S {
        self.lifted.get_state().current_state().clone()
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.lifted.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lifted.unsubscribe(id)
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        // The bound was validated when the handle was created.
        let engine = LiftingEngine::from_validated(
            reducer,
            self.initial_state.clone(),
            self.max_age,
        );
        self.lifted.replace_reducer(Arc::new(engine));
    }
}
