use super::domain::{
    ExternalFeed, ExternalItem, FeedId, ItemId, NewExternalFeed, NewExternalItem, NewValidation,
    Validation,
};
use crate::workflows::{RepositoryError, SiteId};

/// Storage abstraction for the feed registry so the ingestion pipeline can be
/// exercised in isolation.
pub trait FeedRepository: Send + Sync {
    fn insert(&self, feed: NewExternalFeed) -> Result<ExternalFeed, RepositoryError>;
    fn list_active(&self) -> Result<Vec<ExternalFeed>, RepositoryError>;
    fn url_exists(&self, url: &str) -> Result<bool, RepositoryError>;
}

/// Storage abstraction for harvested items.
///
/// Implementations own the (feed, external id) uniqueness constraint:
/// `insert_batch` must persist the batch as a unit, silently skipping rows
/// whose key already exists, and return the rows actually inserted.
pub trait ItemRepository: Send + Sync {
    fn exists(&self, feed: FeedId, external_id: &str) -> Result<bool, RepositoryError>;
    fn insert_batch(&self, items: Vec<NewExternalItem>)
        -> Result<Vec<ExternalItem>, RepositoryError>;
    fn fetch(&self, id: ItemId) -> Result<Option<ExternalItem>, RepositoryError>;
}

/// Storage abstraction for human monitoring validations. Duplicate
/// (item, indicator) pairs are allowed: each validation act is an independent
/// audit record.
pub trait ValidationRepository: Send + Sync {
    fn insert(&self, validation: NewValidation) -> Result<Validation, RepositoryError>;
    fn for_site(&self, site: &SiteId) -> Result<Vec<Validation>, RepositoryError>;
}
