use indexmap::IndexMap;
use std::hash::Hash;

/// Frequency counter that remembers first-seen order.
///
/// Ranking is a stable sort on count, so equal counts keep insertion order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    counts: IndexMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries by descending count, at most `limit` of them
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(&K, usize)> {
        let mut ranked: Vec<(&K, usize)> = self.counts.iter().map(|(k, c)| (k, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

impl<K: Hash + Eq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

impl<K: Hash + Eq + ToString> Tally<K> {
    /// Ranked counts as an ordered string-keyed map
    pub fn to_ranked_map(&self, limit: Option<usize>) -> IndexMap<String, usize> {
        self.most_common(limit)
            .into_iter()
            .map(|(k, c)| (k.to_string(), c))
            .collect()
    }

    /// Ranked keys only
    pub fn top_keys(&self, limit: usize) -> Vec<String> {
        self.most_common(Some(limit))
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect()
    }
}
