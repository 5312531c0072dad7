//! Shared test fixtures: a minimal in-memory host store satisfying the
//! store contract (the wrapped store itself is outside the library's
//! scope), plus the counter reducer the scenarios are written against.

#![allow(dead_code)]

use parking_lot::RwLock;
use rewind::{
    Instrument, InstrumentConfig, Listener, SharedReducer, Store, StoreRef, SubscriptionId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A straightforward single-process store: one state cell, one swappable
/// reducer, listeners called after every dispatch.
pub struct BasicStore<S, A> {
    state: RwLock<S>,
    reducer: RwLock<SharedReducer<S, A>>,
    listeners: RwLock<HashMap<SubscriptionId, Listener>>,
    next_subscription: AtomicU64,
}

impl<S, A> BasicStore<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    pub fn create(reducer: SharedReducer<S, A>, initial_state: S) -> StoreRef<S, A> {
        Arc::new(Self {
            state: RwLock::new(initial_state),
            reducer: RwLock::new(reducer),
            listeners: RwLock::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
        })
    }
}

impl<S, A> Store<S, A> for BasicStore<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    fn dispatch(&self, action: A) -> A {
        {
            let reducer = self.reducer.read();
            let mut state = self.state.write();
            *state = reducer.reduce(&state, &action);
        }
        for listener in self.listeners.read().values() {
            listener();
        }
        action
    }

    fn get_state(&self) -> S {
        self.state.read().clone()
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.listeners.write().insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.write().remove(&id);
    }

    fn replace_reducer(&self, reducer: SharedReducer<S, A>) {
        *self.reducer.write() = reducer;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterAction {
    Increment,
    Decrement,
}

pub fn counter(state: &i64, action: &CounterAction) -> i64 {
    match action {
        CounterAction::Increment => state + 1,
        CounterAction::Decrement => state - 1,
    }
}

/// Same actions, twice the step. Used for reducer-swap tests.
pub fn double_counter(state: &i64, action: &CounterAction) -> i64 {
    match action {
        CounterAction::Increment => state + 2,
        CounterAction::Decrement => state - 2,
    }
}

pub fn counter_reducer() -> SharedReducer<i64, CounterAction> {
    Arc::new(counter)
}

/// Build an instrumented counter store over a `BasicStore` host.
pub fn instrumented(
    max_age: Option<usize>,
) -> (StoreRef<i64, CounterAction>, Arc<Instrument<i64, CounterAction>>) {
    let handle = Instrument::new(InstrumentConfig { max_age }).unwrap();
    let create = handle.instrument(|reducer, initial| BasicStore::create(reducer, initial));
    let store = create(counter_reducer(), 0).unwrap();
    (store, handle)
}
