use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsCollector {
    registry: Registry,

    // Request metrics
    pub mock_requests_total: CounterVec,
    pub match_misses: Counter,

    // Generation metrics
    pub generation_errors: CounterVec,
    pub generation_duration: Histogram,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let mock_requests_total = CounterVec::new(
            Opts::new("proteus_mock_requests_total", "Total number of mock requests"),
            &["method", "outcome"],
        )?;
        registry.register(Box::new(mock_requests_total.clone()))?;

        let match_misses = Counter::new(
            "proteus_match_misses_total",
            "Requests that matched no registered endpoint",
        )?;
        registry.register(Box::new(match_misses.clone()))?;

        let generation_errors = CounterVec::new(
            Opts::new("proteus_generation_errors_total", "Failed mock generations"),
            &["error_type"],
        )?;
        registry.register(Box::new(generation_errors.clone()))?;

        let generation_duration = Histogram::with_opts(HistogramOpts::new(
            "proteus_generation_duration_seconds",
            "Time spent matching and generating a mock response",
        ))?;
        registry.register(Box::new(generation_duration.clone()))?;

        Ok(Self {
            registry,
            mock_requests_total,
            match_misses,
            generation_errors,
            generation_duration,
        })
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}
