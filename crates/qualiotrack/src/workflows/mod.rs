//! Business workflows: feed monitoring (criterion 6), evidence capture, and
//! conformity aggregation.

pub mod conformity;
pub mod evidence;
pub mod monitoring;

use serde::{Deserialize, Serialize};

/// Identifier of an operating site; replicated catalogue rows and monitoring
/// validations are scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub String);

/// Reference to a training session. Sessions themselves are owned by an
/// external collaborator; this core only links records to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Error enumeration shared by the workflow store traits.
///
/// `Conflict` doubles as the uniqueness-constraint signal: stores enforce
/// their dedup keys at insertion, and callers treat a conflict as "already
/// exists" instead of pre-reading.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
