//! A dictionary that can hold multiple values per key.
//!
//! Command-line arguments that may be repeated (`--tag a --tag b`) map one
//! key to several values. [`MultiValueDict`] keeps every value in the order
//! it was appended, with keys iterated in sorted order.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// A dictionary that maps keys to lists of values.
///
/// [`first`](MultiValueDict::first) returns the first value appended for a
/// key, [`last`](MultiValueDict::last) the most recent one, and
/// [`get_list`](MultiValueDict::get_list) all of them.
///
/// # Examples
///
/// ```
/// use argforms_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color".to_string(), "red");
/// d.append("color".to_string(), "blue");
///
/// assert_eq!(d.first("color"), Some(&"red"));
/// assert_eq!(d.last("color"), Some(&"blue"));
/// assert_eq!(d.get_list("color"), Some(&["red", "blue"][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K: Ord, V> {
    inner: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub const fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Returns the **first** value associated with the key.
    pub fn first<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key).and_then(|v| v.first())
    }

    /// Returns the **last** value associated with the key.
    pub fn last<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns all values associated with the key.
    pub fn get_list<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Sets the value for a key, replacing any existing values.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Appends every value to the list for the given key.
    ///
    /// The key is created even when `values` is empty.
    pub fn extend(&mut self, key: K, values: impl IntoIterator<Item = V>) {
        self.inner.entry(key).or_default().extend(values);
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> btree_map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over (key, value-list) pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, K, Vec<V>> {
        self.inner.iter()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for MultiValueDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.append(key, value);
        }
        dict
    }
}

impl<K: Ord, V> IntoIterator for MultiValueDict<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = btree_map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = btree_map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
