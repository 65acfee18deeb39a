use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct RenderMetrics {
    pub total_renders: u64,
    pub failed_renders: u64,
    pub skipped_edges: u64,
    pub latencies: VecDeque<u64>, // microseconds
}

#[derive(Clone)]
pub struct MetricsCollector {
    state: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    render_metrics: RenderMetrics,
    max_history: usize,
}

impl MetricsCollector {
    pub fn new(max_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState {
                render_metrics: RenderMetrics::default(),
                max_history,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        // Counters stay usable even if a panicking thread held the lock.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_render(&self, latency_us: u64, skipped_edges: usize) {
        let mut state = self.lock();
        state.render_metrics.total_renders += 1;
        state.render_metrics.skipped_edges += skipped_edges as u64;
        state.render_metrics.latencies.push_back(latency_us);
        if state.render_metrics.latencies.len() > state.max_history {
            state.render_metrics.latencies.pop_front();
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.render_metrics.total_renders += 1;
        state.render_metrics.failed_renders += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock();
        let r = &state.render_metrics;

        let mut sorted_latencies: Vec<u64> = r.latencies.iter().copied().collect();
        sorted_latencies.sort_unstable();

        MetricsSnapshot {
            total_renders: r.total_renders,
            failed_renders: r.failed_renders,
            skipped_edges: r.skipped_edges,
            p50: percentile(&sorted_latencies, 50.0),
            p95: percentile(&sorted_latencies, 95.0),
            p99: percentile(&sorted_latencies, 99.0),
            history_count: r.latencies.len(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1_000)
    }
}

fn percentile(sorted: &[u64], p: f32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f32)).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub total_renders: u64,
    pub failed_renders: u64,
    pub skipped_edges: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub history_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentiles_over_history() {
        let metrics = MetricsCollector::new(100);
        for latency in 1..=100 {
            metrics.record_render(latency, 0);
        }
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_renders, 100);
        assert_eq!(snapshot.p50, 50);
        assert_eq!(snapshot.p95, 95);
        assert_eq!(snapshot.p99, 99);
    }

    #[test]
    fn test_history_is_bounded() {
        let metrics = MetricsCollector::new(3);
        for latency in [10, 20, 30, 40] {
            metrics.record_render(latency, 1);
        }
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.history_count, 3);
        assert_eq!(snapshot.total_renders, 5);
        assert_eq!(snapshot.failed_renders, 1);
        assert_eq!(snapshot.skipped_edges, 4);
        assert_eq!(snapshot.p50, 30);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetricsCollector::default().snapshot();
        assert_eq!(snapshot.p99, 0);
        assert_eq!(snapshot.history_count, 0);
    }
}
