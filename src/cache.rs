use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::notion::LoadError;
use crate::record::Table;

/// Key of the memoized load. The loader takes no arguments, so there is
/// exactly one key; keeping the map keyed anyway makes the memoization an
/// explicit collaborator instead of a hidden global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CacheKey;

/// Compute-once table cache with a manual invalidation hook.
///
/// The lock is held across the load future, so concurrent requests agree
/// on at most one construction per key. A failed load is not cached; the
/// next request tries again.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: Mutex<HashMap<CacheKey, Arc<Table>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<Table>, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Table, LoadError>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(table) = entries.get(&CacheKey) {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load().await?);
        entries.insert(CacheKey, Arc::clone(&table));
        Ok(table)
    }

    /// Drops the memoized table; the next get loads again.
    pub async fn invalidate(&self) {
        self.entries.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn table() -> Table {
        Table::from_results(&[]).unwrap()
    }

    #[tokio::test]
    async fn load_runs_once_across_repeated_gets() {
        let cache = TableCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let out = cache
                .get_or_load(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(table())
                })
                .await
                .unwrap();
            assert!(out.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_reload() {
        let cache = TableCache::new();
        let calls = AtomicUsize::new(0);
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(table())
        };

        cache.get_or_load(load).await.unwrap();
        cache.invalidate().await;
        cache.get_or_load(load).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = TableCache::new();
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_load(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LoadError::Shape("missing `results` array".to_string()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Shape(_)));

        cache
            .get_or_load(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(table())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
