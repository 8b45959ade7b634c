//! Reconciliation Service
//!
//! Orchestrates filter construction, subtraction and decoding for one side
//! of a two-party reconciliation. Retry policy (a larger bucket count after
//! `DecodeIncomplete`) is left to the caller.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{Decoded, IbfConfig, InvertibleBloomFilter};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::ReconciliationApi;

/// Reconciliation service bound to one agreed parameter set
pub struct Reconciler {
    config: IbfConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl Reconciler {
    /// Create a service without metrics
    pub fn new(config: IbfConfig) -> Result<Self, FilterError> {
        Self::with_metrics(config, Arc::new(NoOpMetrics))
    }

    /// Create a service reporting to `metrics`
    pub fn with_metrics(
        config: IbfConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self { config, metrics })
    }

    pub fn config(&self) -> &IbfConfig {
        &self.config
    }
}

impl ReconciliationApi for Reconciler {
    fn build_filter<I>(&self, keys: I) -> Result<InvertibleBloomFilter, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut filter = InvertibleBloomFilter::new(&self.config)?;
        let mut inserted = 0usize;
        for key in keys {
            let key = key.as_ref();
            if key.len() != self.config.key_length {
                return Err(FilterError::InvalidParameters(format!(
                    "key of {} bytes, expected {}",
                    key.len(),
                    self.config.key_length
                )));
            }
            filter.add(key);
            inserted += 1;
        }

        debug!(
            inserted,
            num_buckets = self.config.num_buckets,
            "Built reconciliation filter"
        );
        Ok(filter)
    }

    fn reconcile(
        &self,
        local: &InvertibleBloomFilter,
        remote: &InvertibleBloomFilter,
    ) -> Result<Decoded, FilterError> {
        self.metrics.record_attempt();
        let start = Instant::now();

        let mut difference = local.clone();
        if let Err(e) = difference.subtract(remote) {
            self.metrics.record_config_mismatch();
            return Err(e);
        }

        match difference.decode() {
            Ok(decoded) => {
                self.metrics.record_success(start.elapsed(), &decoded);
                info!(
                    remaining = decoded.remaining.len(),
                    missing = decoded.missing.len(),
                    passes = decoded.passes,
                    "Reconciliation complete"
                );
                Ok(decoded)
            }
            Err(e) => {
                if let Some(partial) = e.partial_decode() {
                    self.metrics.record_decode_failure(start.elapsed(), partial);
                }
                Err(e)
            }
        }
    }
}
