//! Proof artifacts: capture, automatic generation from lifecycle events, and
//! the draft-to-validated confirmation step.

pub mod autoproof;
pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use autoproof::{AutoProofGenerator, GeneratedProofs};
pub use domain::{
    Evidence, EvidenceId, EvidenceKind, FormationCreated, FormationSnapshot, NewEvidence,
    SessionCreated, TraineeEnrolled, TrainerSnapshot,
};
pub use repository::EvidenceRepository;
pub use service::{EvidenceService, EvidenceServiceError};
