//! Counter shared by workers racing towards a soft ceiling.

use parking_lot::RwLock;

/// Integer behind a reader/writer lock.
///
/// Reads are cheap and frequent (checking a ceiling), writes are rare.
/// Two workers may both read a value just under the ceiling and both go
/// ahead; callers treat the ceiling as approximate.
#[derive(Debug, Default)]
pub struct ThreadSafeCounter {
    value: RwLock<u64>,
}

impl ThreadSafeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        *self.value.read()
    }

    /// Add `amount` and return the new value.
    pub fn add(&self, amount: u64) -> u64 {
        let mut value = self.value.write();
        *value += amount;
        *value
    }
}
