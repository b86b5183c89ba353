//! User strings attached to objects.
//!
//! User strings are ordered key-value pairs of strings. They travel with
//! the object through the archive in a separate user data chunk, so they
//! can be left out of a payload without touching the object's own data.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

use crate::archive::{BufferReader, BufferWriter};
use crate::util::Result;

/// Key-value string storage.
///
/// Uses SmallVec optimization for the common case of few entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserStrings {
    entries: SmallVec<[(String, String); 4]>,
}

impl UserStrings {
    /// Create empty user strings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Returns true when a new key was added.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();

        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return false;
            }
        }
        self.entries.push((key, value));
        true
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove a key and return its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Estimated heap and inline size in bytes.
    pub fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .entries
                .iter()
                .map(|(k, v)| k.len() + v.len() + 8)
                .sum::<usize>()
    }

    pub(crate) fn write(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_count(self.entries.len())?;
        for (k, v) in &self.entries {
            w.write_string(k)?;
            w.write_string(v)?;
        }
        Ok(())
    }

    pub(crate) fn read(r: &mut BufferReader<'_>) -> Result<Self> {
        // each entry holds at least two length prefixes
        let count = r.read_count(8)?;
        let mut entries: SmallVec<[(String, String); 4]> = SmallVec::with_capacity(count);
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(count);
        for _ in 0..count {
            let key = r.read_string()?;
            let value = r.read_string()?;
            // a repeated key keeps its first position and its last value
            match positions.get(&key) {
                Some(&i) => entries[i].1 = value,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        Ok(Self { entries })
    }
}

impl fmt::Debug for UserStrings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl FromIterator<(String, String)> for UserStrings {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut strings = Self::new();
        for (k, v) in iter {
            strings.set(k, v);
        }
        strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_strings_basic() {
        let mut s = UserStrings::new();
        assert!(s.set("key1", "value1"));
        assert!(s.set("key2", "value2"));

        assert_eq!(s.get("key1"), Some("value1"));
        assert_eq!(s.get("key2"), Some("value2"));
        assert_eq!(s.get("key3"), None);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_user_strings_update() {
        let mut s = UserStrings::new();
        s.set("key", "value1");
        assert!(!s.set("key", "value2"));

        assert_eq!(s.get("key"), Some("value2"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_user_strings_remove_keeps_order() {
        let mut s: UserStrings = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(s.remove("b"), Some("2".to_string()));
        assert_eq!(s.remove("b"), None);
        let keys: Vec<&str> = s.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn test_user_strings_archive() {
        let mut s = UserStrings::new();
        s.set("material", "steel");
        s.set("part", "A-7");

        let mut w = BufferWriter::new(0, 60, 0).unwrap();
        s.write(&mut w).unwrap();
        let buf = w.into_buffer().unwrap();

        let mut r = BufferReader::new(&buf, 60, 0);
        assert_eq!(UserStrings::read(&mut r).unwrap(), s);
    }

    #[test]
    fn test_read_many_entries_with_repeated_key() {
        let mut w = BufferWriter::new(0, 70, 0).unwrap();
        w.write_count(5002).unwrap();
        for i in 0..5000 {
            w.write_string(&format!("key{i}")).unwrap();
            w.write_string("x").unwrap();
        }
        w.write_string("key0").unwrap();
        w.write_string("first").unwrap();
        w.write_string("key0").unwrap();
        w.write_string("last").unwrap();
        let buf = w.into_buffer().unwrap();

        let mut r = BufferReader::new(&buf, 70, 0);
        let s = UserStrings::read(&mut r).unwrap();
        assert_eq!(s.len(), 5000);
        assert_eq!(s.get("key0"), Some("last"));
        assert_eq!(s.iter().next(), Some(("key0", "last")));
        assert_eq!(s.iter().last(), Some(("key4999", "x")));
    }
}
