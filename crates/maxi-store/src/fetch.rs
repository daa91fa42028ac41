//! Batched parameter reads
//!
//! The store caps how many names one read may carry. [`BatchFetcher`] splits
//! a key list into consecutive chunks within that cap, reads all chunks
//! concurrently, and merges the answers into one [`ParameterTable`].
//!
//! A chunk failure fails the whole fetch. Keys the store does not return are
//! recorded as absent.

use crate::client::ParameterStore;
use crate::error::StoreError;
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Merged result of a batched read
///
/// Holds exactly one entry per requested key; the value is `None` when the
/// store had nothing for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    entries: HashMap<String, Option<String>>,
}

impl ParameterTable {
    /// Value for a key; `None` if absent or never requested
    #[inline]
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Option::as_deref)
    }

    /// Whether the key was part of the request
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of requested keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was requested
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys the store returned a value for
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }
}

/// Reads key lists in store-compliant chunks
#[derive(Debug)]
pub struct BatchFetcher<'a, S: ?Sized> {
    store: &'a S,
    limit: NonZeroUsize,
}

impl<'a, S: ParameterStore + ?Sized> BatchFetcher<'a, S> {
    /// Create fetcher with a per-request name limit
    #[inline]
    #[must_use]
    pub fn new(store: &'a S, limit: NonZeroUsize) -> Self {
        Self { store, limit }
    }

    /// Number of read calls needed for `key_count` distinct keys
    #[inline]
    #[must_use]
    pub fn calls_for(&self, key_count: usize) -> usize {
        key_count.div_ceil(self.limit.get())
    }

    /// Fetch every key
    ///
    /// Duplicate keys are requested once. Issues `ceil(n / limit)` reads for
    /// `n` distinct keys.
    ///
    /// # Errors
    /// Returns the first `StoreError` any chunk reports. No partial table is
    /// returned.
    pub async fn fetch_all(&self, keys: &[String]) -> Result<ParameterTable, StoreError> {
        let mut seen = HashSet::with_capacity(keys.len());
        let distinct: Vec<String> = keys
            .iter()
            .filter(|k| seen.insert(k.as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            "Fetching {} parameters in {} request(s)",
            distinct.len(),
            self.calls_for(distinct.len())
        );

        let chunks = distinct.chunks(self.limit.get());
        let responses = try_join_all(chunks.map(|chunk| self.store.get_parameters(chunk))).await?;

        let mut entries: HashMap<String, Option<String>> =
            distinct.into_iter().map(|k| (k, None)).collect();
        for parameter in responses.into_iter().flatten() {
            match entries.get_mut(&parameter.name) {
                Some(slot) => *slot = parameter.value,
                None => tracing::debug!("Ignoring unrequested parameter {}", parameter.name),
            }
        }

        Ok(ParameterTable { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockParameterStore, Parameter};
    use mockall::predicate::function;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/defichain-maxi/k{i}")).collect()
    }

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// Mock that answers every name with its own name as value, except `missing`
    fn echo_store(calls: Arc<AtomicUsize>, sizes: Arc<Mutex<Vec<usize>>>) -> MockParameterStore {
        let mut mock = MockParameterStore::new();
        mock.expect_get_parameters().returning(move |names| {
            calls.fetch_add(1, Ordering::SeqCst);
            sizes.lock().unwrap().push(names.len());
            Ok(names
                .iter()
                .filter(|n| !n.ends_with("missing"))
                .map(|n| Parameter::new(n.clone(), n.clone()))
                .collect())
        });
        mock
    }

    #[tokio::test]
    async fn sixteen_keys_take_two_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let store = echo_store(calls.clone(), sizes.clone());

        let fetcher = BatchFetcher::new(&store, limit(10));
        let table = fetcher.fetch_all(&keys(16)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let mut sizes = sizes.lock().unwrap().clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![6, 10]);
        assert_eq!(table.len(), 16);
        assert_eq!(table.present_count(), 16);
    }

    #[tokio::test]
    async fn missing_keys_are_absent_entries() {
        let store = echo_store(Arc::default(), Arc::default());
        let mut requested = keys(3);
        requested.push("/defichain-maxi/missing".to_string());

        let table = BatchFetcher::new(&store, limit(10))
            .fetch_all(&requested)
            .await
            .unwrap();

        assert_eq!(table.len(), 4);
        assert!(table.contains("/defichain-maxi/missing"));
        assert_eq!(table.value("/defichain-maxi/missing"), None);
        assert_eq!(table.value("/defichain-maxi/k1"), Some("/defichain-maxi/k1"));
    }

    #[tokio::test]
    async fn duplicates_requested_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let store = echo_store(calls.clone(), sizes.clone());

        let mut requested = keys(2);
        requested.extend(keys(2));
        let table = BatchFetcher::new(&store, limit(3))
            .fetch_all(&requested)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*sizes.lock().unwrap(), vec![2]);
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn empty_key_list_issues_no_calls() {
        let mut mock = MockParameterStore::new();
        mock.expect_get_parameters().never();

        let table = BatchFetcher::new(&mock, limit(10)).fetch_all(&[]).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn unrequested_names_are_ignored() {
        let mut mock = MockParameterStore::new();
        mock.expect_get_parameters()
            .returning(|_| Ok(vec![Parameter::new("/a", "1"), Parameter::new("/stray", "2")]));

        let table = BatchFetcher::new(&mock, limit(10))
            .fetch_all(&["/a".to_string()])
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
        assert!(!table.contains("/stray"));
    }

    #[tokio::test]
    async fn one_failing_chunk_fails_fetch() {
        let mut mock = MockParameterStore::new();
        mock.expect_get_parameters()
            .with(function(|names: &[String]| names.len() == 10))
            .returning(|names| {
                Ok(names
                    .iter()
                    .map(|n| Parameter::new(n.clone(), "v"))
                    .collect())
            });
        mock.expect_get_parameters()
            .with(function(|names: &[String]| names.len() < 10))
            .returning(|_| Err(StoreError::transport("throttled")));

        let result = BatchFetcher::new(&mock, limit(10)).fetch_all(&keys(12)).await;
        assert!(matches!(result, Err(StoreError::Transport(_))));
    }

    proptest! {
        #[test]
        fn prop_reads_are_ceiling_of_keys_over_limit(n in 0usize..40, l in 1usize..=10) {
            let calls = Arc::new(AtomicUsize::new(0));
            let sizes = Arc::new(Mutex::new(Vec::new()));
            let store = echo_store(calls.clone(), sizes.clone());
            let fetcher = BatchFetcher::new(&store, limit(l));

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let table = runtime.block_on(fetcher.fetch_all(&keys(n))).unwrap();

            prop_assert_eq!(calls.load(Ordering::SeqCst), n.div_ceil(l));
            prop_assert_eq!(fetcher.calls_for(n), n.div_ceil(l));
            let sizes = sizes.lock().unwrap().clone();
            prop_assert!(sizes.iter().all(|size| (1..=l).contains(size)));
            prop_assert_eq!(sizes.iter().sum::<usize>(), n);
            prop_assert_eq!(table.len(), n);
            prop_assert_eq!(table.present_count(), n);
        }
    }
}
