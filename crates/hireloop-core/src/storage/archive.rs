//! Evaluation archive trait.

use hireloop_types::error::RepositoryError;
use hireloop_types::inbound::ApplicantIdentity;

/// Destination for final evaluation reports.
///
/// A report is written once per concluded interview. Implementations live in
/// hireloop-infra (e.g., `FileEvaluationArchive`).
pub trait EvaluationArchive: Send + Sync {
    /// Persist the report for `applicant`, replacing any earlier one.
    fn save(
        &self,
        applicant: &ApplicantIdentity,
        report: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
