//! Keyword-based suggestion of the monitoring indicator a harvested item most
//! likely evidences.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{IndicatorCatalog, IndicatorId};

/// Immutable mapping of indicator code to its domain keyword set, injected so
/// deployments can extend it without recompiling.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordIndex {
    /// Keywords are matched as case-insensitive substrings; they are
    /// lowercased once here.
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(code, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|keyword| keyword.to_lowercase())
                    .collect();
                (code, keywords)
            })
            .collect();
        Self { entries }
    }

    /// Keyword sets for the seven monitoring indicators (codes 23-29).
    pub fn standard() -> Self {
        let entry = |code: &str, keywords: &[&str]| {
            (
                code.to_string(),
                keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            )
        };

        Self::new(vec![
            entry(
                "23",
                &[
                    "loi",
                    "décret",
                    "réglementation",
                    "obligation",
                    "CNEFOP",
                    "France Compétences",
                    "Code du travail",
                    "convention collective",
                    "accord",
                    "qualiopi",
                    "ordonnance",
                    "circulaire",
                ],
            ),
            entry(
                "24",
                &[
                    "métier",
                    "emploi",
                    "OPCO",
                    "certification professionnelle",
                    "référentiel",
                    "branches",
                    "orientations",
                    "compétences",
                    "RNCP",
                ],
            ),
            entry(
                "25",
                &[
                    "pédagogie",
                    "formation",
                    "digital",
                    "numérique",
                    "MOOC",
                    "outil",
                    "innovation",
                    "modalités",
                    "e-learning",
                    "blended",
                    "classe virtuelle",
                ],
            ),
            entry(
                "26",
                &[
                    "handicap",
                    "accessibilité",
                    "PCH",
                    "RQTH",
                    "inclusion",
                    "aménagement",
                    "travailleur handicapé",
                    "Agefiph",
                    "FIPHFP",
                ],
            ),
            entry(
                "27",
                &["sous-traitance", "prestataire", "externalisation", "sous-traitant"],
            ),
            entry(
                "28",
                &[
                    "alternance",
                    "FEST",
                    "entreprise",
                    "tutorat",
                    "terrain",
                    "situation de travail",
                    "apprentissage",
                ],
            ),
            entry(
                "29",
                &[
                    "insertion",
                    "accompagnement",
                    "retour à l'emploi",
                    "évolution",
                    "reconversion",
                    "France Travail",
                    "Pôle emploi",
                ],
            ),
        ])
    }
}

/// Outcome of a classification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub indicator: Option<IndicatorId>,
    pub matched_by_keyword: bool,
}

/// Deterministic, side-effect-free classifier; safe to call concurrently.
#[derive(Debug, Clone)]
pub struct IndicatorClassifier {
    catalog: Arc<IndicatorCatalog>,
    keywords: KeywordIndex,
}

impl IndicatorClassifier {
    pub fn new(catalog: Arc<IndicatorCatalog>, keywords: KeywordIndex) -> Self {
        Self { catalog, keywords }
    }

    /// Scores each indicator by keyword occurrences in title+description and
    /// returns the best nonzero match, ties broken by earliest-registered
    /// code. Falls back to the caller-supplied default otherwise.
    pub fn suggest(
        &self,
        title: &str,
        description: &str,
        default_indicator: Option<IndicatorId>,
    ) -> Suggestion {
        let text = format!("{title} {description}").to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for (code, keywords) in &self.keywords.entries {
            let score = keywords
                .iter()
                .filter(|keyword| text.contains(keyword.as_str()))
                .count();
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((code, score));
            }
        }

        if let Some((code, _)) = best {
            if let Some(indicator) = self.catalog.find_monitoring(code) {
                return Suggestion {
                    indicator: Some(indicator.id),
                    matched_by_keyword: true,
                };
            }
        }

        Suggestion {
            indicator: default_indicator,
            matched_by_keyword: false,
        }
    }
}
