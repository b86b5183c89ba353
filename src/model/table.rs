//! Shared component table.
//!
//! The table owns its objects. Wrappers created from table entries borrow
//! them through a [`ComponentRef`], which holds a weak reference: dropping
//! such a wrapper never drops the object, and a wrapper that outlives its
//! entry reports [`Error::Detached`](crate::util::Error::Detached) instead of
//! touching freed data.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::binding::{create_wrapper, ObjectHandle, Wrapper};
use crate::core::Object;
use crate::util::{Error, Result};

type Entry = Arc<RwLock<Object>>;

/// Non-owning reference to a table entry.
#[derive(Clone, Debug)]
pub struct ComponentRef {
    index: usize,
    entry: Weak<RwLock<Object>>,
}

impl ComponentRef {
    /// Index of the entry in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// True while the entry is still in its table.
    pub fn is_alive(&self) -> bool {
        self.entry.strong_count() > 0
    }

    pub(crate) fn upgrade(&self) -> Result<Entry> {
        self.entry.upgrade().ok_or(Error::Detached)
    }
}

/// Table of objects with stable indices.
///
/// Removing an entry leaves a hole; indices of other entries do not change.
#[derive(Debug, Default)]
pub struct ComponentTable {
    entries: Vec<Option<Entry>>,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its index.
    pub fn add(&mut self, object: Object) -> usize {
        self.entries.push(Some(Arc::new(RwLock::new(object))));
        self.entries.len() - 1
    }

    fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Reference to a live entry.
    pub fn get(&self, index: usize) -> Option<ComponentRef> {
        self.entry(index).map(|e| ComponentRef {
            index,
            entry: Arc::downgrade(e),
        })
    }

    /// Borrowed wrapper for an entry, typed by the dispatch factory.
    pub fn wrapper(&self, index: usize) -> Option<Wrapper> {
        create_wrapper(self.get(index).map(ObjectHandle::Borrowed))
    }

    /// Borrowed wrappers for every live entry, in index order.
    pub fn wrappers(&self) -> impl Iterator<Item = Wrapper> + '_ {
        (0..self.entries.len()).filter_map(|i| self.wrapper(i))
    }

    /// Run `f` with read access to an entry.
    pub fn with<R>(&self, index: usize, f: impl FnOnce(&Object) -> R) -> Result<R> {
        let entry = self.entry(index).ok_or(Error::ComponentNotFound(index))?;
        let guard = entry.read();
        Ok(f(&guard))
    }

    /// Remove an entry and return its object.
    ///
    /// Borrowed wrappers of the entry become detached.
    pub fn remove(&mut self, index: usize) -> Result<Object> {
        let entry = self
            .entries
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(Error::ComponentNotFound(index))?;
        // a wrapper may hold a temporary strong reference inside `with`
        Ok(match Arc::try_unwrap(entry) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        })
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
