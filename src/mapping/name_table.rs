use core::fmt;

use indexmap::IndexMap;

use crate::error::{ResolveError, Result};

// -----------------------------------------------------------------------------
// NameKey

/// A (namespace, local name) composite key.
///
/// The empty string stands in for "no namespace", so a key always
/// compares and hashes the same way regardless of how the caller spelled
/// absence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey {
    name: String,
    namespace: String,
}

impl NameKey {
    /// Creates a key from a local name and an optional namespace.
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.unwrap_or_default().to_owned(),
        }
    }

    /// Returns the local name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace ("" = none).
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.pad(&self.name)
        } else {
            write!(f, "{}:{}", self.namespace, self.name)
        }
    }
}

// -----------------------------------------------------------------------------
// NameTable

/// A qualified-name → definition map doubling as a collision detector.
///
/// Re-inserting a *structurally identical* definition under an existing
/// key is accepted and resolves to the existing entry, since the same
/// definition can legitimately be reached via multiple reference paths.
/// Inserting a *different* definition under an existing key is a
/// [`DuplicateDefinition`](ResolveError::DuplicateDefinition) error.
///
/// Iteration follows insertion order, so resolving the same graph twice
/// enumerates definitions identically.
///
/// # Examples
///
/// ```
/// use xmlbind::mapping::{NameKey, NameTable};
///
/// let mut table: NameTable<u32> = NameTable::new();
/// let key = NameKey::new("Item", Some("urn:shop"));
///
/// assert!(table.insert(key.clone(), 1).unwrap());   // fresh
/// assert!(!table.insert(key.clone(), 1).unwrap());  // identical, shared
/// assert!(table.insert(key, 2).is_err());           // collision
/// ```
#[derive(Debug, Clone)]
pub struct NameTable<V> {
    entries: IndexMap<NameKey, V>,
}

// Not derived: a derive would demand `V: Default` for an empty map.
impl<V> Default for NameTable<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V: PartialEq> NameTable<V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition. Returns `true` when the key was fresh,
    /// `false` when an identical definition was already present (the
    /// existing entry is kept and shared).
    pub fn insert(&mut self, key: NameKey, value: V) -> Result<bool> {
        match self.entries.get(&key) {
            Some(existing) if *existing == value => Ok(false),
            Some(_) => Err(ResolveError::DuplicateDefinition {
                name: key.name,
                namespace: key.namespace,
            }),
            None => {
                self.entries.insert(key, value);
                Ok(true)
            }
        }
    }

    /// Returns the definition stored under `key`.
    #[inline]
    pub fn get(&self, key: &NameKey) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether a definition exists under `key`.
    #[inline]
    pub fn contains(&self, key: &NameKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of definitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&NameKey, &V)> {
        self.entries.iter()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_reinsertion_shares_the_entry() {
        let mut table: NameTable<&str> = NameTable::new();
        let key = NameKey::new("Price", None);
        assert!(table.insert(key.clone(), "def").unwrap());
        assert!(!table.insert(key.clone(), "def").unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key), Some(&"def"));
    }

    #[test]
    fn different_definition_under_same_key_collides() {
        let mut table: NameTable<&str> = NameTable::new();
        let key = NameKey::new("Price", Some("urn:a"));
        table.insert(key.clone(), "one").unwrap();
        match table.insert(key, "two").unwrap_err() {
            ResolveError::DuplicateDefinition { name, namespace } => {
                assert_eq!(name, "Price");
                assert_eq!(namespace, "urn:a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn namespaces_keep_keys_apart() {
        let mut table: NameTable<u8> = NameTable::new();
        table.insert(NameKey::new("Item", Some("urn:a")), 1).unwrap();
        table.insert(NameKey::new("Item", Some("urn:b")), 2).unwrap();
        table.insert(NameKey::new("Item", None), 3).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut table: NameTable<u8> = NameTable::new();
        table.insert(NameKey::new("b", None), 0).unwrap();
        table.insert(NameKey::new("a", None), 1).unwrap();
        table.insert(NameKey::new("c", None), 2).unwrap();
        let names: Vec<_> = table.iter().map(|(k, _)| k.name().to_owned()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
