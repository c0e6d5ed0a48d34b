use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use qualiotrack::workflows::evidence::{Evidence, EvidenceId, EvidenceRepository, NewEvidence};
use qualiotrack::workflows::monitoring::{
    ExternalFeed, ExternalItem, FeedId, FeedRepository, ItemId, ItemRepository, NewExternalFeed,
    NewExternalItem, NewValidation, Validation, ValidationId, ValidationRepository,
};
use qualiotrack::workflows::{RepositoryError, SessionId, SiteId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryFeedRepository {
    rows: Mutex<Vec<ExternalFeed>>,
}

impl FeedRepository for InMemoryFeedRepository {
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
pub(crate) struct InMemoryItemRepository {
    rows: Mutex<Vec<ExternalItem>>,
}

impl ItemRepository for InMemoryItemRepository {
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
pub(crate) struct InMemoryValidationRepository {
    rows: Mutex<Vec<Validation>>,
}

impl ValidationRepository for InMemoryValidationRepository {
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

#[derive(Default)]
pub(crate) struct InMemoryEvidenceRepository {
    rows: Mutex<Vec<Evidence>>,
}

impl EvidenceRepository for InMemoryEvidenceRepository {
    fn insert(&self, evidence: NewEvidence) -> Result<Evidence, RepositoryError> {
        let mut rows = self.rows.lock().expect("evidence mutex poisoned");
        if rows.iter().any(|row| {
            row.session == evidence.session
                && row.indicator == evidence.indicator
                && row.title == evidence.title
        }) {
            return Err(RepositoryError::Conflict);
        }
        let record = Evidence {
            id: EvidenceId(rows.len() as u64 + 1),
            session: evidence.session,
            indicator: evidence.indicator,
            title: evidence.title,
            description: evidence.description,
            kind: evidence.kind,
            file_path: evidence.file_path,
            site: evidence.site,
            validated: false,
            validated_at: None,
            validation_comment: None,
            created_at: Utc::now(),
            created_by: evidence.created_by,
        };
        rows.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: EvidenceId) -> Result<Option<Evidence>, RepositoryError> {
        let rows = self.rows.lock().expect("evidence mutex poisoned");
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    fn mark_validated(
        &self,
        id: EvidenceId,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Evidence, RepositoryError> {
        let mut rows = self.rows.lock().expect("evidence mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.validated = true;
        row.validated_at = Some(at);
        row.validation_comment = comment;
        Ok(row.clone())
    }

    fn for_session(&self, session: SessionId) -> Result<Vec<Evidence>, RepositoryError> {
        let rows = self.rows.lock().expect("evidence mutex poisoned");
        Ok(rows.iter().filter(|row| row.session == session).cloned().collect())
    }

    fn validated_for_session(&self, session: SessionId) -> Result<Vec<Evidence>, RepositoryError> {
        let rows = self.rows.lock().expect("evidence mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| row.session == session && row.validated)
            .cloned()
            .collect())
    }

    fn validated_for_site(&self, site: &SiteId) -> Result<Vec<Evidence>, RepositoryError> {
        let rows = self.rows.lock().expect("evidence mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.site == site && row.validated)
            .cloned()
            .collect())
    }
}
