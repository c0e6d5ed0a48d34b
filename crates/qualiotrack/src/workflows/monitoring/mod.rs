//! Regulatory monitoring ("veille") for criterion 6: feed registry, resilient
//! ingestion, keyword classification, and human validation of harvested
//! items.

pub mod bootstrap;
pub mod classifier;
pub mod domain;
pub mod ingest;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use bootstrap::{FeedBootstrapConfig, FeedSeed};
pub use classifier::{IndicatorClassifier, KeywordIndex, Suggestion};
pub use domain::{
    ExternalFeed, ExternalItem, FeedId, ItemId, NewExternalFeed, NewExternalItem, NewValidation,
    Validation, ValidationId,
};
pub use ingest::{FeedFetcher, FeedIngestor, FetchError, HttpFeedFetcher, RefreshOutcome};
pub use repository::{FeedRepository, ItemRepository, ValidationRepository};
pub use router::monitoring_router;
pub use service::{MonitoringService, ValidationRefused};
