//! Feed-registry seeding from an explicit configuration value.
//!
//! Loading is a startup step that produces a plain value object; the ingestion
//! core only ever sees the resulting registry, never a file path.

use std::path::Path;

use serde::Deserialize;

/// Static list of syndication sources to register for a site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedBootstrapConfig {
    pub feeds: Vec<FeedSeed>,
}

/// One bootstrap entry. The indicator code is resolved against the
/// monitoring-criterion catalogue rows at seeding time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSeed {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub default_indicator_code: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("unable to read feed configuration at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("feed configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FeedBootstrapConfig {
    pub fn from_path(path: &Path) -> Result<Self, BootstrapError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BootstrapError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Default regulatory sources shipped with the application.
    pub fn builtin() -> Self {
        let seed = |name: &str, url: &str, code: &str| FeedSeed {
            name: name.to_string(),
            url: url.to_string(),
            default_indicator_code: Some(code.to_string()),
            comment: None,
        };

        Self {
            feeds: vec![
                seed(
                    "Légifrance - Journal officiel",
                    "https://www.legifrance.gouv.fr/rss/jo_lois_decrets.xml",
                    "23",
                ),
                seed(
                    "Centre Inffo - Actualités",
                    "https://www.centre-inffo.fr/feed",
                    "23",
                ),
                seed(
                    "France Compétences",
                    "https://www.francecompetences.fr/feed/",
                    "24",
                ),
                seed(
                    "Thot Cursus - Formation et culture numérique",
                    "https://cursus.edu/rss",
                    "25",
                ),
                seed("Agefiph", "https://www.agefiph.fr/rss.xml", "26"),
            ],
        }
    }
}
