use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Memo of rendered infix text keyed by the exact encoded expression
pub struct RenderCache {
    data: Mutex<HashMap<String, String>>,
    capacity: usize,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.get(key).cloned()
    }

    pub fn set(&self, key: String, value: String) {
        if self.capacity == 0 {
            return;
        }
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        if data.len() >= self.capacity && !data.contains_key(&key) {
            // A simple eviction strategy: clear the cache when full.
            log::warn!("Render cache reached {} entries, clearing", self.capacity);
            data.clear();
        }
        data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
