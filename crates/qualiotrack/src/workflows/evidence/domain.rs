use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::IndicatorId;
use crate::workflows::{SessionId, SiteId};

/// Identifier wrapper for proof artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvidenceId(pub u64);

/// Nature of a proof artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceKind {
    Document,
    Photo,
    Other,
}

impl EvidenceKind {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceKind::Document => "document",
            EvidenceKind::Photo => "photo",
            EvidenceKind::Other => "autre",
        }
    }
}

/// A proof artifact linked to exactly one session and one indicator.
///
/// Lifecycle is two-phase: creation (manual or generated) proposes, a human
/// validation confirms. Only validated evidence counts toward conformity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub session: SessionId,
    pub indicator: IndicatorId,
    pub title: String,
    pub description: String,
    pub kind: EvidenceKind,
    /// Opaque reference; storage and retrieval belong to an external
    /// collaborator.
    pub file_path: Option<String>,
    pub site: SiteId,
    pub validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Submission payload; the store assigns the id and the record starts
/// unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEvidence {
    pub session: SessionId,
    pub indicator: IndicatorId,
    pub title: String,
    pub description: String,
    pub kind: EvidenceKind,
    #[serde(default)]
    pub file_path: Option<String>,
    pub site: SiteId,
    pub created_by: String,
}

/// Offering fields the generator inspects; optional fields only produce
/// evidence when populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationSnapshot {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub teaching_methods: Option<String>,
    #[serde(default)]
    pub prerequisites: Option<String>,
}

/// Assigned trainer details at session-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerSnapshot {
    pub full_name: String,
    pub professional_status: String,
    #[serde(default)]
    pub skills: Option<String>,
}

/// Lifecycle trigger: a training offering was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationCreated {
    pub site: SiteId,
    pub formation: FormationSnapshot,
}

/// Lifecycle trigger: a session was scheduled for an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session: SessionId,
    pub site: SiteId,
    pub formation: FormationSnapshot,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub location: String,
    pub max_trainees: u16,
    #[serde(default)]
    pub trainer: Option<TrainerSnapshot>,
}

/// Lifecycle trigger: a trainee was enrolled into a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraineeEnrolled {
    pub session: SessionId,
    pub site: SiteId,
    pub full_name: String,
    pub role: String,
    pub department: String,
    pub enrollment_status: String,
}
