//! The set of article URLs that have already been notified.
//!
//! Held in memory as a `BTreeSet` so it is sorted and deduplicated by
//! construction; `persist` reads and rewrites it as a JSON array.

mod persist;

pub use persist::KnownSetStore;

use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSet {
    urls: BTreeSet<String>,
}

impl KnownSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns true if the URL was not already known.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// URLs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Entries of `current` that are not known yet, in `current`'s order, each at most once.
    pub fn unseen<'a, I>(&self, current: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut fresh = Vec::new();
        for url in current {
            if !self.contains(url) && emitted.insert(url.as_str()) {
                fresh.push(url.clone());
            }
        }
        fresh
    }
}

impl<S: Into<String>> FromIterator<S> for KnownSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}
