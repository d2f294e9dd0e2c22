use payloads::{ProjectId, SpotifyId};
use std::fmt::Debug;

/// A value identifying what to fetch. Fetchers re-run only when the key
/// changes by value, and never fetch for a key that is not fetchable.
pub trait FetchKey: PartialEq + Clone + Debug + 'static {
    fn is_fetchable(&self) -> bool {
        true
    }
}

/// Search text and other free-form keys: empty means "nothing to fetch".
impl FetchKey for String {
    fn is_fetchable(&self) -> bool {
        !self.is_empty()
    }
}

/// Fetch once per mount.
impl FetchKey for () {}

/// Poll ticks.
impl FetchKey for u64 {}

impl FetchKey for ProjectId {
    fn is_fetchable(&self) -> bool {
        self.is_selected()
    }
}

impl FetchKey for SpotifyId {
    fn is_fetchable(&self) -> bool {
        !self.is_empty()
    }
}
