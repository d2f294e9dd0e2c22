use derive_more::Display;

/// Marks one fetch attempt. Only the attempt holding the fetcher's current
/// generation may change its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct Generation(u64);

/// Mints generations for a single fetcher. Never shared between fetchers.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    last: u64,
}

impl GenerationCounter {
    pub fn next(&mut self) -> Generation {
        self.last += 1;
        Generation(self.last)
    }
}

/// Handed out when a fetch attempt starts; presented again to settle it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<K> {
    pub generation: Generation,
    pub key: K,
}
