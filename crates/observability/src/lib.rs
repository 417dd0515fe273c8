use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use scout_core::RiskLevel;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct EngineMetrics {
    requests_total: AtomicU64,
    briefs_total: AtomicU64,
    not_found_total: AtomicU64,
    invalid_total: AtomicU64,
    low_risk_total: AtomicU64,
    medium_risk_total: AtomicU64,
    high_risk_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub briefs_total: u64,
    pub not_found_total: u64,
    pub invalid_total: u64,
    pub low_risk_total: u64,
    pub medium_risk_total: u64,
    pub high_risk_total: u64,
    pub avg_latency_micros: f64,
}

impl EngineMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("scout_requests_total").increment(1);
    }

    pub fn record_brief(&self, tier: RiskLevel) {
        self.briefs_total.fetch_add(1, Ordering::Relaxed);
        let counter = match tier {
            RiskLevel::Low => &self.low_risk_total,
            RiskLevel::Medium => &self.medium_risk_total,
            RiskLevel::High => &self.high_risk_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("scout_briefs_total", "risk" => tier.as_code()).increment(1);
    }

    pub fn inc_not_found(&self) {
        self.not_found_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("scout_not_found_total").increment(1);
    }

    pub fn inc_invalid(&self) {
        self.invalid_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("scout_invalid_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        metrics::histogram!("scout_generate_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            briefs_total: self.briefs_total.load(Ordering::Relaxed),
            not_found_total: self.not_found_total.load(Ordering::Relaxed),
            invalid_total: self.invalid_total.load(Ordering::Relaxed),
            low_risk_total: self.low_risk_total.load(Ordering::Relaxed),
            medium_risk_total: self.medium_risk_total.load(Ordering::Relaxed),
            high_risk_total: self.high_risk_total.load(Ordering::Relaxed),
            avg_latency_micros: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,scout_service=info,scout_api=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_tiers_and_failures() {
        let metrics = EngineMetrics::default();
        metrics.inc_request();
        metrics.record_brief(RiskLevel::High);
        metrics.inc_request();
        metrics.inc_not_found();
        metrics.observe_latency(Duration::from_micros(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_total, 2);
        assert_eq!(snapshot.briefs_total, 1);
        assert_eq!(snapshot.high_risk_total, 1);
        assert_eq!(snapshot.not_found_total, 1);
        assert_eq!(snapshot.avg_latency_micros, 150.0);
    }
}
