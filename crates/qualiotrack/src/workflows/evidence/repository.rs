use chrono::{DateTime, Utc};

use super::domain::{Evidence, EvidenceId, NewEvidence};
use crate::workflows::{RepositoryError, SessionId, SiteId};

/// Storage abstraction for proof artifacts.
///
/// Implementations own the (session, indicator, title) uniqueness constraint:
/// `insert` returns `Conflict` when an identical triple already exists, which
/// callers treat as "already generated" rather than a failure.
pub trait EvidenceRepository: Send + Sync {
    fn insert(&self, evidence: NewEvidence) -> Result<Evidence, RepositoryError>;
    fn fetch(&self, id: EvidenceId) -> Result<Option<Evidence>, RepositoryError>;
    fn mark_validated(
        &self,
        id: EvidenceId,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Evidence, RepositoryError>;
    fn for_session(&self, session: SessionId) -> Result<Vec<Evidence>, RepositoryError>;
    fn validated_for_session(&self, session: SessionId) -> Result<Vec<Evidence>, RepositoryError>;
    fn validated_for_site(&self, site: &SiteId) -> Result<Vec<Evidence>, RepositoryError>;
}
