use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::bootstrap::FeedBootstrapConfig;
use super::classifier::{IndicatorClassifier, KeywordIndex, Suggestion};
use super::domain::{ItemId, NewExternalFeed, NewValidation, Validation};
use super::ingest::{FeedFetcher, FeedIngestor, RefreshOutcome};
use super::repository::{FeedRepository, ItemRepository, ValidationRepository};
use crate::catalog::{Criterion, IndicatorCatalog, IndicatorId};
use crate::workflows::{RepositoryError, SiteId};

const VALIDATOR_MAX_CHARS: usize = 200;

/// Error raised when a human validation request cannot be honored. Both
/// conditions are caller-correctable, never process-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ValidationRefused {
    #[error("monitoring item not found")]
    ItemNotFound,
    #[error("indicator not found")]
    IndicatorNotFound,
    #[error("indicator does not belong to the monitoring criterion")]
    NotMonitoringIndicator,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Façade composing the feed registry, the ingestor, the classifier, and the
/// validation store.
pub struct MonitoringService<F, I, V> {
    feeds: Arc<F>,
    items: Arc<I>,
    validations: Arc<V>,
    catalog: Arc<IndicatorCatalog>,
    classifier: IndicatorClassifier,
    ingestor: FeedIngestor<F, I>,
}

impl<F, I, V> MonitoringService<F, I, V>
where
    F: FeedRepository + 'static,
    I: ItemRepository + 'static,
    V: ValidationRepository + 'static,
{
    pub fn new(
        fetcher: Box<dyn FeedFetcher>,
        feeds: Arc<F>,
        items: Arc<I>,
        validations: Arc<V>,
        catalog: Arc<IndicatorCatalog>,
        keywords: KeywordIndex,
    ) -> Self {
        let classifier = IndicatorClassifier::new(catalog.clone(), keywords);
        let ingestor = FeedIngestor::new(fetcher, feeds.clone(), items.clone());
        Self {
            feeds,
            items,
            validations,
            catalog,
            classifier,
            ingestor,
        }
    }

    /// Idempotent registry seeding: entries whose URL is already registered
    /// are skipped, so re-running bootstrap is safe.
    pub fn bootstrap_feeds(
        &self,
        site: &SiteId,
        config: &FeedBootstrapConfig,
    ) -> Result<usize, RepositoryError> {
        let mut added = 0;

        for seed in &config.feeds {
            let url = seed.url.trim();
            if url.is_empty() {
                continue;
            }
            if self.feeds.url_exists(url)? {
                continue;
            }

            let default_indicator = seed
                .default_indicator_code
                .as_deref()
                .and_then(|code| self.catalog.find_monitoring(code.trim()))
                .map(|indicator| indicator.id);

            let name = if seed.name.trim().is_empty() {
                "Flux".to_string()
            } else {
                seed.name.clone()
            };

            self.feeds.insert(NewExternalFeed {
                name,
                url: url.to_string(),
                default_indicator,
                site: site.clone(),
                active: true,
            })?;
            added += 1;
        }

        if added > 0 {
            info!(added, "feed registry bootstrapped");
        }
        Ok(added)
    }

    /// Sequential sweep over active feeds; see [`FeedIngestor::refresh_all`].
    pub fn refresh_all(&self) -> RefreshOutcome {
        self.ingestor.refresh_all()
    }

    pub fn suggest(
        &self,
        title: &str,
        description: &str,
        default_indicator: Option<IndicatorId>,
    ) -> Suggestion {
        self.classifier.suggest(title, description, default_indicator)
    }

    /// Record a human confirmation linking a harvested item to a monitoring
    /// indicator. Duplicate (item, indicator) validations are allowed.
    pub fn create_validation(
        &self,
        item: ItemId,
        indicator: IndicatorId,
        validated_by: &str,
        site: &SiteId,
    ) -> Result<Validation, ValidationRefused> {
        if self.items.fetch(item)?.is_none() {
            return Err(ValidationRefused::ItemNotFound);
        }

        let definition = self
            .catalog
            .get(indicator)
            .ok_or(ValidationRefused::IndicatorNotFound)?;
        if definition.criterion != Criterion::Monitoring {
            return Err(ValidationRefused::NotMonitoringIndicator);
        }

        let validation = self.validations.insert(NewValidation {
            item,
            indicator,
            validated_by: clip(validated_by, VALIDATOR_MAX_CHARS),
            validated_at: Utc::now(),
            site: site.clone(),
        })?;
        Ok(validation)
    }
}

fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        value.chars().take(max_chars).collect()
    }
}
