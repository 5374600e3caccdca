//! Prometheus metrics for the agora engine.
//!
//! [`EngineMetrics`] owns a dedicated [`Registry`] that a host can encode
//! into the Prometheus text exposition format.

use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

use crate::EngineError;

pub struct EngineMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Operations whose result was committed (or read-only calls served).
    pub operations_committed: IntCounter,
    /// Operations rejected by a precondition, a transfer or the store.
    pub operations_rejected: IntCounter,
    pub transfers_confirmed: IntCounter,
    pub transfers_failed: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub proposal_count: IntGauge,
    pub loan_count: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, EngineError> {
    let counter = IntCounter::with_opts(Opts::new(name, help)).map_err(metrics_error)?;
    registry
        .register(Box::new(counter.clone()))
        .map_err(metrics_error)?;
    Ok(counter)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, EngineError> {
    let gauge = IntGauge::with_opts(Opts::new(name, help)).map_err(metrics_error)?;
    registry
        .register(Box::new(gauge.clone()))
        .map_err(metrics_error)?;
    Ok(gauge)
}

fn metrics_error(e: prometheus::Error) -> EngineError {
    EngineError::Config(format!("metrics: {e}"))
}

impl EngineMetrics {
    /// Create a fresh set of metrics registered under a new [`Registry`].
    pub fn new() -> Result<Self, EngineError> {
        let registry = Registry::new();
        Ok(Self {
            operations_committed: counter(
                &registry,
                "agora_operations_committed_total",
                "Operations committed by the dispatcher",
            )?,
            operations_rejected: counter(
                &registry,
                "agora_operations_rejected_total",
                "Operations rejected without mutation",
            )?,
            transfers_confirmed: counter(
                &registry,
                "agora_transfers_confirmed_total",
                "Payment-rail transfers confirmed",
            )?,
            transfers_failed: counter(
                &registry,
                "agora_transfers_failed_total",
                "Payment-rail transfers declined",
            )?,
            proposal_count: gauge(&registry, "agora_proposals_total", "Proposals created")?,
            loan_count: gauge(&registry, "agora_loans_total", "Loans created")?,
            registry,
        })
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, EngineError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(metrics_error)?;
        String::from_utf8(buf).map_err(|e| EngineError::Config(format!("metrics: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metrics() {
        let metrics = EngineMetrics::new().unwrap();
        metrics.operations_committed.inc();
        metrics.loan_count.set(3);
        let text = metrics.encode().unwrap();
        assert!(text.contains("agora_operations_committed_total 1"));
        assert!(text.contains("agora_loans_total 3"));
        assert!(text.contains("agora_transfers_failed_total 0"));
    }
}
