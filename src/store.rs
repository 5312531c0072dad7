//! The store contract consumed and produced by the instrumentation layer.
//!
//! The layer wraps any store satisfying [`Store`]; the facade it hands back
//! satisfies the same trait, so instrumented and plain stores are
//! interchangeable to application code.

use std::fmt;
use std::sync::Arc;

/// A pure state reducer: `(previous state, action) -> next state`.
pub trait Reducer<S, A> {
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}

/// Shared, swappable reducer handle.
pub type SharedReducer<S, A> = Arc<dyn Reducer<S, A> + Send + Sync>;

/// Change listener registered through [`Store::subscribe`].
pub type Listener = Box<dyn Fn() + Send + Sync>;

/// Identifier for an active subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

/// Contract every wrapped store satisfies.
///
/// Implementations are expected to serialize dispatches: the lifting engine
/// assumes it sees one command at a time, each against the immediately
/// preceding state.
pub trait Store<S, A>: Send + Sync {
    /// Apply an action, returning it for caller convenience.
    fn dispatch(&self, action: A) -> A;

    /// Current state.
    fn get_state(&self) -> S;

    /// Register a change listener, called after every dispatch.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Remove a previously registered listener.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Swap the reducer. Implementations decide whether to re-run anything.
    fn replace_reducer(&self, reducer: SharedReducer<S, A>);
}

impl<S, A> fmt::Debug for dyn Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Store")
    }
}

/// Shared store handle.
pub type StoreRef<S, A> = Arc<dyn Store<S, A>>;
