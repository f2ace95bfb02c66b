use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

/// Completed analysis results keyed by analysis id.
///
/// Entries carry their insertion sequence so the oldest can be evicted
/// first when the cache is trimmed.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    results: DashMap<String, (u64, String)>,
    next_seq: AtomicU64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        analysis_id: &str,
        result: String,
    ) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.results.insert(analysis_id.to_string(), (seq, result));
    }

    pub fn get(
        &self,
        analysis_id: &str,
    ) -> Option<String> {
        self.results.get(analysis_id).map(|r| r.value().1.clone())
    }

    /// Evicts the oldest entries until at most `limit` remain.
    /// Returns the number evicted.
    pub fn trim_to(
        &self,
        limit: usize,
    ) -> usize {
        let len = self.results.len();
        if len <= limit {
            return 0;
        }
        let mut by_age: Vec<(u64, String)> =
            self.results.iter().map(|e| (e.value().0, e.key().clone())).collect();
        by_age.sort_unstable_by_key(|(seq, _)| *seq);

        by_age
            .into_iter()
            .take(len - limit)
            .filter(|(_, id)| self.results.remove(id).is_some())
            .count()
    }

    pub fn clear(&self) {
        self.results.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
