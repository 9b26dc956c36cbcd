/**
 * Lookup Join
 *
 * The join primitive behind every recipe. A `Lookup` indexes a secondary set
 * by a foreign key once; primary records are then matched against it by a
 * local key.
 *
 * ```text
 * primary P ──local(p)──▶ index[key] ──▶ { s ∈ S | foreign(s) == local(p) }
 * ```
 *
 * A 1:1 relation collapses the matched set to its first element, so an empty
 * match becomes `None` (serialized as `null`), never an empty list.
 */

use std::collections::HashMap;
use std::hash::Hash;

/// Secondary records grouped by foreign key
#[derive(Debug, Clone)]
pub struct Lookup<K, S> {
    index: HashMap<K, Vec<S>>,
}

impl<K: Eq + Hash, S> Lookup<K, S> {
    /// Index `secondary` by `foreign`. Records sharing a key keep input order.
    pub fn new(secondary: impl IntoIterator<Item = S>, foreign: impl Fn(&S) -> K) -> Self {
        let mut index: HashMap<K, Vec<S>> = HashMap::new();
        for record in secondary {
            index.entry(foreign(&record)).or_default().push(record);
        }
        Self { index }
    }

    /// Every secondary record whose foreign key equals `key`
    pub fn matches(&self, key: &K) -> &[S] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The 1:1 view of `matches`
    pub fn first(&self, key: &K) -> Option<&S> {
        collapse(self.matches(key))
    }

    /// Join each primary record with its matches and project the pair
    pub fn join<P, V>(
        &self,
        primary: impl IntoIterator<Item = P>,
        local: impl Fn(&P) -> K,
        project: impl Fn(P, &[S]) -> V,
    ) -> Vec<V> {
        primary
            .into_iter()
            .map(|record| {
                let key = local(&record);
                project(record, self.matches(&key))
            })
            .collect()
    }
}

/// Collapse a matched set to its first element
pub fn collapse<T>(matches: &[T]) -> Option<&T> {
    matches.first()
}
