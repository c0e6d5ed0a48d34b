use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::catalog::IndicatorCatalog;
use crate::workflows::monitoring::classifier::KeywordIndex;
use crate::workflows::monitoring::domain::{
    ExternalFeed, ExternalItem, FeedId, ItemId, NewExternalFeed, NewExternalItem, NewValidation,
    Validation, ValidationId,
};
use crate::workflows::monitoring::ingest::{FeedFetcher, FetchError};
use crate::workflows::monitoring::repository::{
    FeedRepository, ItemRepository, ValidationRepository,
};
use crate::workflows::monitoring::service::MonitoringService;
use crate::workflows::{RepositoryError, SiteId};

pub(super) fn site() -> SiteId {
    SiteId("siège".to_string())
}

pub(super) fn catalog() -> Arc<IndicatorCatalog> {
    Arc::new(IndicatorCatalog::standard())
}

#[derive(Default)]
pub(super) struct MemoryFeeds {
    rows: Mutex<Vec<ExternalFeed>>,
}

impl MemoryFeeds {
    pub(super) fn all(&self) -> Vec<ExternalFeed> {
        self.rows.lock().expect("feed mutex poisoned").clone()
    }
}

impl FeedRepository for MemoryFeeds {
    fn insert(&self, feed: NewExternalFeed) -> Result<ExternalFeed, RepositoryError> {
        let mut rows = self.rows.lock().expect("feed mutex poisoned");
        if rows.iter().any(|row| row.url == feed.url) {
            return Err(RepositoryError::Conflict);
        }
        let record = ExternalFeed {
            id: FeedId(rows.len() as u64 + 1),
            name: feed.name,
            url: feed.url,
            default_indicator: feed.default_indicator,
            site: feed.site,
            active: feed.active,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    fn list_active(&self) -> Result<Vec<ExternalFeed>, RepositoryError> {
        let rows = self.rows.lock().expect("feed mutex poisoned");
        Ok(rows.iter().filter(|row| row.active).cloned().collect())
    }

    fn url_exists(&self, url: &str) -> Result<bool, RepositoryError> {
        let rows = self.rows.lock().expect("feed mutex poisoned");
        Ok(rows.iter().any(|row| row.url == url))
    }
}

#[derive(Default)]
pub(super) struct MemoryItems {
    rows: Mutex<Vec<ExternalItem>>,
}

impl MemoryItems {
    pub(super) fn all(&self) -> Vec<ExternalItem> {
        self.rows.lock().expect("item mutex poisoned").clone()
    }
}

impl ItemRepository for MemoryItems {
    fn exists(&self, feed: FeedId, external_id: &str) -> Result<bool, RepositoryError> {
        let rows = self.rows.lock().expect("item mutex poisoned");
        Ok(rows
            .iter()
            .any(|row| row.feed == feed && row.external_id == external_id))
    }

    fn insert_batch(
        &self,
        items: Vec<NewExternalItem>,
    ) -> Result<Vec<ExternalItem>, RepositoryError> {
        let mut rows = self.rows.lock().expect("item mutex poisoned");
        let mut inserted = Vec::new();
        for item in items {
            if rows
                .iter()
                .any(|row| row.feed == item.feed && row.external_id == item.external_id)
            {
                continue;
            }
            let record = ExternalItem {
                id: ItemId(rows.len() as u64 + 1),
                feed: item.feed,
                external_id: item.external_id,
                title: item.title,
                link: item.link,
                description: item.description,
                published: item.published,
                fetched_at: item.fetched_at,
            };
            rows.push(record.clone());
            inserted.push(record);
        }
        Ok(inserted)
    }

    fn fetch(&self, id: ItemId) -> Result<Option<ExternalItem>, RepositoryError> {
        let rows = self.rows.lock().expect("item mutex poisoned");
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryValidations {
    rows: Mutex<Vec<Validation>>,
}

impl MemoryValidations {
    pub(super) fn all(&self) -> Vec<Validation> {
        self.rows.lock().expect("validation mutex poisoned").clone()
    }
}

impl ValidationRepository for MemoryValidations {
    fn insert(&self, validation: NewValidation) -> Result<Validation, RepositoryError> {
        let mut rows = self.rows.lock().expect("validation mutex poisoned");
        let record = Validation {
            id: ValidationId(rows.len() as u64 + 1),
            item: validation.item,
            indicator: validation.indicator,
            validated_by: validation.validated_by,
            validated_at: validation.validated_at,
            site: validation.site,
        };
        rows.push(record.clone());
        Ok(record)
    }

    fn for_site(&self, site: &SiteId) -> Result<Vec<Validation>, RepositoryError> {
        let rows = self.rows.lock().expect("validation mutex poisoned");
        Ok(rows.iter().filter(|row| &row.site == site).cloned().collect())
    }
}

/// Canned transport responses keyed by URL.
pub(super) enum ScriptedResponse {
    Payload(Vec<u8>),
    Status(u16),
    Transport(String),
}

#[derive(Default)]
pub(super) struct ScriptedFetcher {
    responses: HashMap<String, ScriptedResponse>,
}

impl ScriptedFetcher {
    pub(super) fn with(mut self, url: &str, response: ScriptedResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }
}

impl FeedFetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match self.responses.get(url) {
            Some(ScriptedResponse::Payload(bytes)) => Ok(bytes.clone()),
            Some(ScriptedResponse::Status(code)) => Err(FetchError::Status(*code)),
            Some(ScriptedResponse::Transport(cause)) => {
                Err(FetchError::Transport(cause.clone()))
            }
            None => Err(FetchError::Transport(format!("no script for {url}"))),
        }
    }
}

pub(super) type TestService = MonitoringService<MemoryFeeds, MemoryItems, MemoryValidations>;

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) feeds: Arc<MemoryFeeds>,
    pub(super) items: Arc<MemoryItems>,
    pub(super) validations: Arc<MemoryValidations>,
}

pub(super) fn build_service(fetcher: ScriptedFetcher) -> Harness {
    let feeds = Arc::new(MemoryFeeds::default());
    let items = Arc::new(MemoryItems::default());
    let validations = Arc::new(MemoryValidations::default());
    let service = MonitoringService::new(
        Box::new(fetcher),
        feeds.clone(),
        items.clone(),
        validations.clone(),
        catalog(),
        KeywordIndex::standard(),
    );
    Harness {
        service,
        feeds,
        items,
        validations,
    }
}

pub(super) fn register_feed(harness: &Harness, name: &str, url: &str) -> ExternalFeed {
    harness
        .feeds
        .insert(NewExternalFeed {
            name: name.to_string(),
            url: url.to_string(),
            default_indicator: None,
            site: site(),
            active: true,
        })
        .expect("feed registered")
}

pub(super) fn rss_payload(items: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Flux de veille</title>{items}</channel></rss>"#
    )
    .into_bytes()
}

pub(super) fn rss_item(guid: &str, title: &str) -> String {
    format!(
        "<item><guid>{guid}</guid><title>{title}</title><link>https://example.org/{guid}</link><description>{title}</description></item>"
    )
}

pub(super) fn seed_item(harness: &Harness, feed: FeedId, external_id: &str) -> ExternalItem {
    let inserted = harness
        .items
        .insert_batch(vec![NewExternalItem {
            feed,
            external_id: external_id.to_string(),
            title: "Nouvelle réglementation".to_string(),
            link: format!("https://example.org/{external_id}"),
            description: String::new(),
            published: None,
            fetched_at: Utc::now(),
        }])
        .expect("item stored");
    inserted.into_iter().next().expect("one item inserted")
}
