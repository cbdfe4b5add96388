//! Submission of a completed budget form.
//!
//! [`SubmissionOrchestrator`] checks the form's preconditions, builds the
//! [`crate::EstimateRequest`], and sends it through an [`EstimateSubmitter`].
//! The submitter is the seam where a real network client replaces the
//! simulated one.

mod orchestrator;
mod submitter;

pub use orchestrator::{
    BusyGuard, CONSENT_REQUIRED_MESSAGE, SEND_FAILED_MESSAGE, SubmissionOrchestrator, SubmitError,
};
pub use submitter::{DEFAULT_SUBMIT_DELAY, EstimateSubmitter, SimulatedSubmitter, SubmissionError};
