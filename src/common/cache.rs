//! One-time initialised, read-only values shared for the process lifetime.

use std::sync::OnceLock;

/// Lazily initialised value that is never mutated once set.
///
/// A failed initialiser leaves the memo empty, so the next call retries from
/// scratch instead of caching a half-built value.
#[derive(Debug)]
pub struct Memo<T> {
    cell: OnceLock<T>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Memo that starts out loaded.
    pub fn with_value(value: T) -> Self {
        Self {
            cell: OnceLock::from(value),
        }
    }

    /// Return the cached value, running `init` only if nothing is cached yet.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = init()?;
        // A concurrent initialiser may have won; its value is kept.
        Ok(self.cell.get_or_init(|| value))
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}
