/// Observable state of one fetcher.
///
/// `result` and `error` both describe the latest settled attempt for the
/// current key, except that a failed attempt leaves the previous `result`
/// in place. `is_loading` is only true while an attempt for the current key
/// is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub result: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> FetchState<T> {
    pub fn idle() -> Self {
        Self {
            result: None,
            error: None,
            is_loading: false,
        }
    }

    /// Nothing fetched, nothing failed, nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.result.is_none() && self.error.is_none() && !self.is_loading
    }

    /// Returns true if this is the initial load (data not yet fetched,
    /// currently loading, and no error).
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && self.result.is_none() && self.error.is_none()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
