use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::IndicatorId;
use crate::workflows::SiteId;

/// Identifier wrapper for registered external feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeedId(pub u64);

/// Identifier wrapper for harvested feed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Identifier wrapper for human validations of harvested items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationId(pub u64);

/// A registered syndication source. Feeds are deactivated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFeed {
    pub id: FeedId,
    pub name: String,
    pub url: String,
    pub default_indicator: Option<IndicatorId>,
    pub site: SiteId,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Feed registration payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExternalFeed {
    pub name: String,
    pub url: String,
    pub default_indicator: Option<IndicatorId>,
    pub site: SiteId,
    pub active: bool,
}

/// A harvested entry, immutable once stored. The (feed, external id) pair is
/// the ingestion dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalItem {
    pub id: ItemId,
    pub feed: FeedId,
    pub external_id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

/// Staged item awaiting batch insertion for one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExternalItem {
    pub feed: FeedId,
    pub external_id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

/// Human confirmation that a harvested item evidences a monitoring indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub id: ValidationId,
    pub item: ItemId,
    pub indicator: IndicatorId,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
    pub site: SiteId,
}

/// Validation payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewValidation {
    pub item: ItemId,
    pub indicator: IndicatorId,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
    pub site: SiteId,
}
