//! Resilient ingestion of heterogeneous external feeds.
//!
//! Each feed is processed inside its own failure boundary: transport errors,
//! authentication walls, undecodable or non-feed content, and markup errors
//! (after one repair attempt) all turn into a per-feed error string, never a
//! batch failure.

mod decode;
mod fetcher;
mod parser;

pub use fetcher::{FeedFetcher, FetchError, HttpFeedFetcher};

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ExternalFeed, NewExternalItem};
use super::repository::{FeedRepository, ItemRepository};

/// Result of one sweep: count of newly stored items plus every per-feed
/// error, formatted `"<feed>: <cause>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub added: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum FeedRefreshError {
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("Erreur HTTP - {0}")]
    Transport(String),
    #[error("Timeout (délai dépassé)")]
    Timeout,
    #[error("Contenu vide")]
    EmptyBody,
    #[error("Contenu vide après décodage")]
    EmptyText,
    #[error("Le site demande une authentification")]
    RequiresAuthentication,
    #[error("Le contenu n'est pas un flux RSS/Atom valide (pas de balise <rss> ou <feed>)")]
    NotAFeed,
    #[error("Flux vide (aucun item)")]
    EmptyFeed,
    #[error("Erreur de parsing XML - {0} (tentative de correction échouée)")]
    Parse(String),
    #[error("Erreur lors de la sauvegarde - {0}")]
    Persistence(String),
}

impl From<FetchError> for FeedRefreshError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Status(code) => FeedRefreshError::HttpStatus(code),
            FetchError::TimedOut => FeedRefreshError::Timeout,
            FetchError::Transport(cause) => FeedRefreshError::Transport(cause),
        }
    }
}

/// Sweeps the active feeds sequentially and stages new items per feed.
pub struct FeedIngestor<F, I> {
    fetcher: Box<dyn FeedFetcher>,
    feeds: Arc<F>,
    items: Arc<I>,
}

impl<F, I> FeedIngestor<F, I>
where
    F: FeedRepository,
    I: ItemRepository,
{
    pub fn new(fetcher: Box<dyn FeedFetcher>, feeds: Arc<F>, items: Arc<I>) -> Self {
        Self {
            fetcher,
            feeds,
            items,
        }
    }

    /// Never raises to its caller: whatever succeeded is returned together
    /// with the collected error list.
    pub fn refresh_all(&self) -> RefreshOutcome {
        let feeds = match self.feeds.list_active() {
            Ok(feeds) => feeds,
            Err(err) => {
                return RefreshOutcome {
                    added: 0,
                    errors: vec![format!("registre des flux indisponible: {err}")],
                }
            }
        };

        let mut added = 0;
        let mut errors = Vec::new();

        for feed in &feeds {
            match self.refresh_feed(feed) {
                Ok(count) => added += count,
                Err(err) => errors.push(format!("{}: {}", feed.name, err)),
            }
        }

        for error in &errors {
            warn!(%error, "feed refresh failure");
        }
        info!(added, failed = errors.len(), "feed refresh sweep finished");

        RefreshOutcome { added, errors }
    }

    fn refresh_feed(&self, feed: &ExternalFeed) -> Result<usize, FeedRefreshError> {
        let bytes = self.fetcher.fetch(&feed.url)?;
        if bytes.is_empty() {
            return Err(FeedRefreshError::EmptyBody);
        }

        let text = decode::decode_payload(&bytes);
        if text.trim().is_empty() {
            return Err(FeedRefreshError::EmptyText);
        }

        ensure_feed_markup(&text)?;

        let syndication = parser::parse_syndication(&text)?;
        if syndication.entries.is_empty() {
            return Err(FeedRefreshError::EmptyFeed);
        }

        let fetched_at = Utc::now();
        let mut staged = Vec::new();
        let mut staged_keys = HashSet::new();

        for entry in &syndication.entries {
            let normalized = parser::normalize_entry(entry);
            if !staged_keys.insert(normalized.external_id.clone()) {
                continue;
            }
            let known = self
                .items
                .exists(feed.id, &normalized.external_id)
                .map_err(|err| FeedRefreshError::Persistence(err.to_string()))?;
            if known {
                continue;
            }
            staged.push(NewExternalItem {
                feed: feed.id,
                external_id: normalized.external_id,
                title: normalized.title,
                link: normalized.link,
                description: normalized.description,
                published: normalized.published,
                fetched_at,
            });
        }

        if staged.is_empty() {
            return Ok(0);
        }

        let inserted = self
            .items
            .insert_batch(staged)
            .map_err(|err| FeedRefreshError::Persistence(err.to_string()))?;
        Ok(inserted.len())
    }
}

/// Require feed markup before structured parsing; an authentication page is
/// reported distinctly from generic non-feed content.
fn ensure_feed_markup(text: &str) -> Result<(), FeedRefreshError> {
    let lowered = text.trim_start().to_lowercase();
    let looks_like_xml = lowered.starts_with("<?xml") || lowered.starts_with('<');
    let has_feed_marker = lowered.contains("<rss") || lowered.contains("<feed");
    if looks_like_xml && has_feed_marker {
        return Ok(());
    }

    let body = text.to_lowercase();
    if body.contains("login") || body.contains("connexion") || body.contains("authentification") {
        Err(FeedRefreshError::RequiresAuthentication)
    } else {
        Err(FeedRefreshError::NotAFeed)
    }
}
