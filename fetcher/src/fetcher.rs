//! The cancellable fetch primitive.
//!
//! A [`Fetcher`] belongs to one view. Every key change supersedes the attempt
//! in flight and starts a new one under a fresh [`Generation`]; an attempt
//! may only write state while its generation is still current. Superseded
//! attempts keep running (nothing is aborted) but their outcome is dropped.
//!
//! ```text
//! set_key(K1) ──> gen #1 loading ──────────────┐ settles late: dropped
//! set_key(K2) ──> gen #2 loading ──> settle #2 ─┘ state = outcome(K2)
//! ```

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use crate::{
    FetchError, FetchKey, FetchState, Generation, GenerationCounter, Guard,
    Notification, Notifier, Ticket, TracingNotifier,
};

type Listener<T> = Rc<dyn Fn(&FetchState<T>)>;

/// What happened to a fetch attempt when it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome (success or failure) was written to the state.
    Applied,
    /// A newer key or an unmount took over; nothing was written.
    Superseded,
    /// The authorization precondition failed and was notified.
    Unauthorized,
}

struct Inner<K, T> {
    key: Option<K>,
    current: Option<Generation>,
    generations: GenerationCounter,
    state: FetchState<T>,
    unmounted: bool,
    listener: Option<Listener<T>>,
    notifier: Rc<dyn Notifier>,
}

/// Shared handle; clones refer to the same fetcher.
pub struct Fetcher<K, T> {
    inner: Rc<RefCell<Inner<K, T>>>,
}

impl<K, T> Clone for Fetcher<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: FetchKey, T: Clone + 'static> Default for Fetcher<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FetchKey, T: Clone + 'static> Fetcher<K, T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                key: None,
                current: None,
                generations: GenerationCounter::default(),
                state: FetchState::idle(),
                unmounted: false,
                listener: None,
                notifier: Rc::new(TracingNotifier),
            })),
        }
    }

    pub fn with_listener(self, f: impl Fn(&FetchState<T>) + 'static) -> Self {
        self.set_listener(f);
        self
    }

    /// Called with the new state after every change.
    pub fn set_listener(&self, f: impl Fn(&FetchState<T>) + 'static) {
        self.inner.borrow_mut().listener = Some(Rc::new(f));
    }

    pub fn with_notifier(self, notifier: impl Notifier + 'static) -> Self {
        self.inner.borrow_mut().notifier = Rc::new(notifier);
        self
    }

    pub fn state(&self) -> FetchState<T> {
        self.inner.borrow().state.clone()
    }

    pub fn key(&self) -> Option<K> {
        self.inner.borrow().key.clone()
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.borrow().unmounted
    }

    /// Point the fetcher at a new key.
    ///
    /// Returns a ticket when an attempt must be started for the key. Setting
    /// the key it already has does nothing. An absent or unfetchable key
    /// resets the state to idle.
    pub fn set_key(&self, key: Option<K>) -> Option<Ticket<K>> {
        let ticket = {
            let mut inner = self.inner.borrow_mut();
            if inner.unmounted || inner.key == key {
                return None;
            }
            inner.current = None;
            inner.key = key.clone();
            match key.filter(K::is_fetchable) {
                None => {
                    inner.state = FetchState::idle();
                    None
                }
                Some(key) => {
                    let generation = inner.generations.next();
                    inner.current = Some(generation);
                    inner.state.is_loading = true;
                    inner.state.error = None;
                    tracing::debug!(%generation, ?key, "fetch started");
                    Some(Ticket { generation, key })
                }
            }
        };
        self.emit();
        ticket
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.inner.borrow().current == Some(ticket.generation)
    }

    /// Record the outcome of an attempt, unless it has been superseded.
    ///
    /// A failure keeps the previous result and only replaces the error.
    pub fn settle(
        &self,
        ticket: &Ticket<K>,
        outcome: Result<T, FetchError>,
    ) -> Settlement {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.current != Some(ticket.generation) {
                tracing::debug!(
                    generation = %ticket.generation,
                    key = ?ticket.key,
                    "dropping superseded fetch outcome"
                );
                return Settlement::Superseded;
            }
            inner.current = None;
            match outcome {
                Ok(result) => {
                    inner.state.result = Some(result);
                    inner.state.error = None;
                }
                Err(e) => {
                    tracing::error!(key = ?ticket.key, "fetch failed: {e}");
                    inner.state.error = Some(e.to_string());
                }
            }
            inner.state.is_loading = false;
        }
        self.emit();
        Settlement::Applied
    }

    /// Drive one attempt: authorize, call the producer, settle.
    ///
    /// The guard runs for every attempt. A producer is not called at all if
    /// the attempt was superseded while authorizing.
    pub async fn run<G, P, Fut>(
        &self,
        ticket: Ticket<K>,
        guard: &G,
        producer: P,
    ) -> Settlement
    where
        G: Guard,
        P: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        if let Err(e) = guard.ensure_authorized().await {
            return self.reject_unauthorized(&ticket, e);
        }
        if !self.is_current(&ticket) {
            tracing::debug!(
                generation = %ticket.generation,
                "superseded before the producer ran"
            );
            return Settlement::Superseded;
        }
        let outcome = producer(ticket.key.clone()).await;
        self.settle(&ticket, outcome)
    }

    /// [`Self::set_key`] followed by [`Self::run`]. Returns `None` when the
    /// key did not call for a fetch.
    pub async fn fetch<G, P, Fut>(
        &self,
        key: Option<K>,
        guard: &G,
        producer: P,
    ) -> Option<Settlement>
    where
        G: Guard,
        P: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let ticket = self.set_key(key)?;
        Some(self.run(ticket, guard, producer).await)
    }

    /// The owning view went away: supersede whatever is in flight and stop
    /// reacting to keys. Nothing is emitted after this.
    pub fn unmount(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.unmounted = true;
        inner.current = None;
        inner.listener = None;
    }

    fn reject_unauthorized(
        &self,
        ticket: &Ticket<K>,
        error: FetchError,
    ) -> Settlement {
        let notifier = {
            let mut inner = self.inner.borrow_mut();
            if inner.current != Some(ticket.generation) {
                return Settlement::Superseded;
            }
            inner.current = None;
            inner.state.is_loading = false;
            inner.notifier.clone()
        };
        notifier.notify(Notification::failure(error.to_string()));
        self.emit();
        Settlement::Unauthorized
    }

    fn emit(&self) {
        let (listener, state) = {
            let inner = self.inner.borrow();
            match &inner.listener {
                Some(listener) => (listener.clone(), inner.state.clone()),
                None => return,
            }
        };
        listener(&state);
    }
}
