//! Prometheus metrics for prediction serving

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

/// Latency histogram bucket boundaries in seconds
pub const LATENCY_BUCKETS: [f64; 10] = [0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];

/// Request counter and latency histogram
///
/// Both are atomic; concurrent requests never lose an increment.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    predict_requests: IntCounter,
    predict_latency: Histogram,
}

impl Metrics {
    pub fn new() -> crate::Result<Self> {
        let registry = Registry::new();

        let predict_requests = IntCounter::new(
            "predict_requests_total",
            "Total number of prediction requests received.",
        )?;
        let predict_latency = Histogram::with_opts(
            HistogramOpts::new(
                "predict_latency_seconds",
                "Latency of prediction requests in seconds.",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(predict_requests.clone()))?;
        registry.register(Box::new(predict_latency.clone()))?;

        Ok(Self {
            registry,
            predict_requests,
            predict_latency,
        })
    }

    /// Count one attempted prediction
    pub fn record_request(&self) {
        self.predict_requests.inc();
    }

    /// Observe one prediction latency
    pub fn record_latency(&self, seconds: f64) {
        self.predict_latency.observe(seconds);
    }

    pub fn requests_total(&self) -> u64 {
        self.predict_requests.get()
    }

    /// Number of latency observations
    pub fn latency_count(&self) -> u64 {
        self.predict_latency.get_sample_count()
    }

    /// Render all metrics in Prometheus text exposition format
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_counter_and_histogram() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.requests_total(), 0);

        metrics.record_request();
        metrics.record_latency(0.003);
        metrics.record_latency(0.3);

        assert_eq!(metrics.requests_total(), 1);
        assert_eq!(metrics.latency_count(), 2);
    }

    #[test]
    fn test_exposition_format() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request();
        metrics.record_latency(0.015);

        let text = metrics.gather();
        assert!(text.contains("# TYPE predict_requests_total counter"));
        assert!(text.contains("predict_requests_total 1"));
        assert!(text.contains("# TYPE predict_latency_seconds histogram"));
        assert!(text.contains("predict_latency_seconds_bucket{le=\"0.01\"} 0"));
        assert!(text.contains("predict_latency_seconds_bucket{le=\"0.02\"} 1"));
        assert!(text.contains("predict_latency_seconds_bucket{le=\"+Inf\"} 1"));
        assert!(text.contains("predict_latency_seconds_count 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_request();
        assert_eq!(b.requests_total(), 0);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_request();
                        metrics.record_latency(0.001);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(metrics.requests_total(), 16_000);
        assert_eq!(metrics.latency_count(), 16_000);
    }
}
