use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

/// Lazily populated cache of engine instances keyed by language.
///
/// A single coarse lock guards the map and is held while a missing instance
/// is created, so concurrent first use of a key builds it exactly once.
/// Entries live for the lifetime of the registry. Each instance sits behind
/// its own lock because native OCR handles are not re-entrant.
pub struct ReaderRegistry<T> {
    name: &'static str,
    readers: std::sync::Mutex<HashMap<String, Arc<Mutex<T>>>>,
}

impl<T> ReaderRegistry<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            readers: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached instance for `key`, creating it with `create` on
    /// first use. A failed creation is not cached.
    ///
    /// Blocking: call from a blocking context.
    pub fn get_or_create<F>(&self, key: &str, create: F) -> Result<Arc<Mutex<T>>, String>
    where
        F: FnOnce() -> Result<T, String>,
    {
        let mut readers = self
            .readers
            .lock()
            .map_err(|_| format!("{} reader registry lock poisoned", self.name))?;

        if let Some(reader) = readers.get(key) {
            return Ok(Arc::clone(reader));
        }

        let reader = Arc::new(Mutex::new(create()?));
        readers.insert(key.to_string(), Arc::clone(&reader));
        info!(registry = self.name, key, "Created reader");
        Ok(reader)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.readers
            .lock()
            .map(|readers| readers.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.readers.lock().map(|readers| readers.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
