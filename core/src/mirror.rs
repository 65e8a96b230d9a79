//! Client-side record of the last counter value the service confirmed.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Last-known value per key, written only from validated success responses.
///
/// Entries are never evicted and never set pre-emptively. The lock is held
/// only for the map operation itself, never across a network call.
#[derive(Debug, Default)]
pub struct LocalMirror {
    values: Mutex<HashMap<String, i64>>,
}

impl LocalMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: &str, value: i64) {
        self.values.lock().insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.lock().get(key).copied()
    }

    /// Copy of the whole mirror at this instant.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.values.lock().clone()
    }
}
