use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Evidence, EvidenceId, NewEvidence};
use super::repository::EvidenceRepository;
use crate::workflows::RepositoryError;

/// Error raised by the evidence façade.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Thin façade over the evidence store for manual submission and the human
/// validation step.
pub struct EvidenceService<E> {
    evidence: Arc<E>,
}

impl<E> EvidenceService<E>
where
    E: EvidenceRepository,
{
    pub fn new(evidence: Arc<E>) -> Self {
        Self { evidence }
    }

    /// Manual submission; the record starts unvalidated like generated ones.
    pub fn submit(&self, evidence: NewEvidence) -> Result<Evidence, EvidenceServiceError> {
        let stored = self.evidence.insert(evidence)?;
        info!(
            evidence = stored.id.0,
            indicator = stored.indicator.0,
            session = stored.session.0,
            "preuve enregistrée"
        );
        Ok(stored)
    }

    /// Human confirmation; only validated evidence counts toward conformity.
    pub fn validate(
        &self,
        id: EvidenceId,
        comment: Option<String>,
    ) -> Result<Evidence, EvidenceServiceError> {
        let validated = self.evidence.mark_validated(id, comment, Utc::now())?;
        info!(evidence = id.0, "preuve validée");
        Ok(validated)
    }

    pub fn get(&self, id: EvidenceId) -> Result<Evidence, EvidenceServiceError> {
        let record = self.evidence.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}
