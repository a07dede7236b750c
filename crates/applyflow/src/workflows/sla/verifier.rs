use super::domain::InterviewVerification;

/// Outcome of an automatic evidence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoVerification {
    Confirmed,
    Inconclusive,
}

/// Automatic verification for e-mail and calendar evidence.
///
/// Called while the submission is being recorded; anything other than
/// `Confirmed` leaves the verification pending for manual review.
pub trait InterviewVerifier: Send + Sync {
    fn attempt(
        &self,
        verification: &InterviewVerification,
        evidence: &str,
    ) -> Result<AutoVerification, VerifierError>;
}

/// Verifier that never confirms anything; every submission waits for a reviewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualReviewOnly;

impl InterviewVerifier for ManualReviewOnly {
    fn attempt(
        &self,
        _verification: &InterviewVerification,
        _evidence: &str,
    ) -> Result<AutoVerification, VerifierError> {
        Ok(AutoVerification::Inconclusive)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("verification provider unavailable: {0}")]
    Unavailable(String),
    #[error("evidence could not be read: {0}")]
    UnreadableEvidence(String),
}
