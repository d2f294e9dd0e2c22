//! Keys for views that re-fetch on a timer.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Tick keys for a polling fetcher.
///
/// Every tick would be a new key and supersede the attempt in flight, so a
/// source slower than the poll interval would never settle. A tick therefore
/// only yields the next key once the attempt for the current one has
/// finished; ticks in between are skipped.
///
/// Clones share the same counter. Key `0` is the first attempt, started
/// when the view mounts.
#[derive(Debug, Clone)]
pub struct PollTicks {
    key: Rc<Cell<u64>>,
    outstanding: Rc<Cell<bool>>,
}

impl Default for PollTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl PollTicks {
    pub fn new() -> Self {
        Self {
            key: Rc::new(Cell::new(0)),
            outstanding: Rc::new(Cell::new(true)),
        }
    }

    pub fn key(&self) -> u64 {
        self.key.get()
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding.get()
    }

    /// Called on every timer tick. Returns the key to fetch next, or `None`
    /// while the previous attempt is still running.
    pub fn advance(&self) -> Option<u64> {
        if self.outstanding.get() {
            tracing::debug!(key = self.key.get(), "poll tick skipped");
            return None;
        }
        let key = self.key.get() + 1;
        self.key.set(key);
        self.outstanding.set(true);
        Some(key)
    }

    /// Run one attempt's producer future, releasing the next tick when it
    /// finishes, whether it succeeded or not.
    pub async fn track<F: Future>(&self, attempt: F) -> F::Output {
        let output = attempt.await;
        self.outstanding.set(false);
        output
    }
}
