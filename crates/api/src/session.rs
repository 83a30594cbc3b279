//! Caller-owned diagnostic session

use feature_engine::RawReading;
use tracing::info;

use crate::client::{ClientError, PredictionClient};
use crate::routes::Diagnosis;

/// Scan history for one dashboard or script
///
/// Every scan attempt counts, successful or not. A failed scan clears
/// `last` so a stale diagnosis is never shown next to a new error.
#[derive(Debug, Default)]
pub struct DiagnosticSession {
    scan_count: u64,
    last: Option<Diagnosis>,
}

impl DiagnosticSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnose one reading through `client` and remember the outcome
    pub async fn run_scan(
        &mut self,
        client: &PredictionClient,
        reading: &RawReading,
    ) -> Result<&Diagnosis, ClientError> {
        self.scan_count += 1;

        match client.diagnose(reading).await {
            Ok(diagnosis) => {
                info!(
                    "Scan #{}: {} ({:.2}%)",
                    self.scan_count,
                    diagnosis.prediction.label.as_str(),
                    diagnosis.prediction.failure_probability
                );
                Ok(self.last.insert(diagnosis))
            }
            Err(e) => {
                self.last = None;
                Err(e)
            }
        }
    }

    /// Scans attempted in this session
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// Most recent successful diagnosis, cleared by a failed scan
    pub fn last(&self) -> Option<&Diagnosis> {
        self.last.as_ref()
    }

    /// Forget history
    pub fn reset(&mut self) {
        self.scan_count = 0;
        self.last = None;
    }
}
