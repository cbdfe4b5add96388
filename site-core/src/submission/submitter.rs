use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::EstimateRequest;

/// How long [`SimulatedSubmitter`] takes to "send" a request.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission endpoint rejected the request: {0}")]
    Rejected(String),

    #[error("submission endpoint unreachable: {0}")]
    Transport(String),
}

/// Delivers an [`EstimateRequest`] to wherever estimates are collected.
#[async_trait]
pub trait EstimateSubmitter: Send + Sync {
    async fn submit(
        &self,
        request: &EstimateRequest,
    ) -> Result<(), SubmissionError>;
}

/// Stand-in endpoint that accepts every request after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl EstimateSubmitter for SimulatedSubmitter {
    async fn submit(
        &self,
        request: &EstimateRequest,
    ) -> Result<(), SubmissionError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "simulating estimate send");
        tokio::time::sleep(self.delay).await;
        info!(
            product = %request.product_id,
            term_days = request.term_days,
            total = %request.total,
            "estimate request sent"
        );
        Ok(())
    }
}
