//! Tests for memoized search results including hit/miss tracking and sharing

#[cfg(test)]
mod tests {
    use dettile::algorithm::cache::{CacheStats, MatrixCache};
    use dettile::algorithm::search::SearchKey;
    use std::sync::Arc;

    // Verifies new cache starts with 0 hits and 0 misses
    #[test]
    fn test_cache_new() {
        let cache = MatrixCache::new();
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 0 });
        assert!(cache.is_empty());
    }

    // Tests cache miss on first access and hit on second, with a shared result
    // Verified by removing the early return on lookup
    #[test]
    fn test_cache_miss_and_hit() {
        let cache = MatrixCache::new();
        let key = SearchKey::new(3, 0, 1);

        let (Ok(first), Ok(second)) = (cache.extremal(key), cache.extremal(key)) else {
            panic!("search failed");
        };

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(cache.len(), 1);
    }

    // Tests keys differing only in the alphabet are separate entries
    #[test]
    fn test_keys_are_exact() {
        let cache = MatrixCache::new();
        let binary = cache.extremal(SearchKey::new(2, 0, 1));
        let signed = cache.extremal(SearchKey::new(2, -1, 1));

        let (Ok(binary), Ok(signed)) = (binary, signed) else {
            panic!("search failed");
        };
        assert_eq!(binary.max_determinant, 1);
        assert_eq!(signed.max_determinant, 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().misses, 2);
    }

    // Tests ranked pools are memoized per k
    #[test]
    fn test_ranked_memoized_per_k() {
        let cache = MatrixCache::new();
        let key = SearchKey::new(2, 0, 1);

        let (Ok(a), Ok(b), Ok(c)) = (cache.ranked(key, 2), cache.ranked(key, 2), cache.ranked(key, 3))
        else {
            panic!("ranking failed");
        };
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.top.len(), 2);
        assert_eq!(c.top.len(), 3);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
        // Ranked pools are not counted as extremal entries
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = MatrixCache::new();
        assert!(cache.extremal(SearchKey::new(0, 0, 1)).is_err());
        assert!(cache.is_empty());
    }

    // Tests concurrent readers converge on one stored result
    #[test]
    fn test_concurrent_access() {
        let cache = MatrixCache::new();
        let key = SearchKey::new(3, 0, 1);

        let results: Vec<i64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| cache.extremal(key).map(|r| r.max_determinant)))
                .collect();
            handles
                .into_iter()
                .filter_map(|h| h.join().ok())
                .filter_map(Result::ok)
                .collect()
        });

        assert_eq!(results, vec![2, 2, 2, 2]);
        assert_eq!(cache.len(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 4);
    }
}
