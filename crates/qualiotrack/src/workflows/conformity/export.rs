//! Serializable compliance bundle consumed by external report generators,
//! plus a tabular evidence export.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregator::ConformityAggregator;
use super::views::SessionConformity;
use crate::catalog::{Criterion, IndicatorCatalog};
use crate::workflows::evidence::domain::{Evidence, EvidenceId};
use crate::workflows::evidence::repository::EvidenceRepository;
use crate::workflows::monitoring::repository::{ItemRepository, ValidationRepository};
use crate::workflows::{RepositoryError, SessionId, SiteId};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Full export for one session: indicator definitions, their evidence with
/// validation status, monitoring validations for criterion 6, and the
/// computed conformity block.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceExport {
    pub session: SessionId,
    pub site: SiteId,
    pub indicators: Vec<IndicatorExport>,
    pub conformity: SessionConformity,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorExport {
    pub code: String,
    pub label: String,
    pub criterion: u8,
    pub evidence: Vec<EvidenceExport>,
    pub monitoring_validations: Vec<ValidationExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceExport {
    pub id: EvidenceId,
    pub title: String,
    pub description: String,
    pub kind: &'static str,
    pub validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub validation_comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationExport {
    pub item_title: String,
    pub item_link: String,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
}

pub struct ComplianceExporter<E, V, I> {
    catalog: Arc<IndicatorCatalog>,
    evidence: Arc<E>,
    validations: Arc<V>,
    items: Arc<I>,
}

impl<E, V, I> ComplianceExporter<E, V, I>
where
    E: EvidenceRepository,
    V: ValidationRepository,
    I: ItemRepository,
{
    pub fn new(
        catalog: Arc<IndicatorCatalog>,
        evidence: Arc<E>,
        validations: Arc<V>,
        items: Arc<I>,
    ) -> Self {
        Self {
            catalog,
            evidence,
            validations,
            items,
        }
    }

    pub fn session_bundle(
        &self,
        session: SessionId,
        site: &SiteId,
    ) -> Result<ComplianceExport, RepositoryError> {
        let conformity = ConformityAggregator::new(
            self.catalog.clone(),
            self.evidence.clone(),
            self.validations.clone(),
        )
        .session_conformity(session, site)?;

        let session_evidence = self.evidence.for_session(session)?;
        let site_validations = self.validations.for_site(site)?;

        let mut indicators = Vec::new();
        for indicator in self.catalog.deduped() {
            let evidence: Vec<EvidenceExport> = session_evidence
                .iter()
                .filter(|row| {
                    self.catalog
                        .get(row.indicator)
                        .map(|i| i.code == indicator.code)
                        .unwrap_or(false)
                })
                .map(evidence_export)
                .collect();

            let monitoring_validations = if indicator.criterion == Criterion::Monitoring {
                let mut exports = Vec::new();
                for validation in &site_validations {
                    let matches = self
                        .catalog
                        .get(validation.indicator)
                        .map(|i| i.code == indicator.code)
                        .unwrap_or(false);
                    if !matches {
                        continue;
                    }
                    let item = self.items.fetch(validation.item)?;
                    exports.push(ValidationExport {
                        item_title: item.as_ref().map(|i| i.title.clone()).unwrap_or_default(),
                        item_link: item.as_ref().map(|i| i.link.clone()).unwrap_or_default(),
                        validated_by: validation.validated_by.clone(),
                        validated_at: validation.validated_at,
                    });
                }
                exports
            } else {
                Vec::new()
            };

            indicators.push(IndicatorExport {
                code: indicator.code.clone(),
                label: indicator.label.clone(),
                criterion: indicator.criterion.number(),
                evidence,
                monitoring_validations,
            });
        }

        Ok(ComplianceExport {
            session,
            site: site.clone(),
            indicators,
            conformity,
        })
    }

    /// One CSV row per evidence of the session, catalogue order.
    pub fn write_session_csv<W: Write>(
        &self,
        session: SessionId,
        writer: W,
    ) -> Result<(), ExportError> {
        let session_evidence = self.evidence.for_session(session)?;
        let mut rows: Vec<(&Evidence, u8, String, String)> = session_evidence
            .iter()
            .filter_map(|row| {
                self.catalog.get(row.indicator).map(|indicator| {
                    (
                        row,
                        indicator.criterion.number(),
                        indicator.code.clone(),
                        indicator.label.clone(),
                    )
                })
            })
            .collect();
        rows.sort_by(|a, b| (a.1, numeric(&a.2)).cmp(&(b.1, numeric(&b.2))));

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "critere",
            "code",
            "libelle",
            "titre",
            "type",
            "valide",
            "cree_le",
        ])?;
        for (evidence, criterion, code, label) in rows {
            csv_writer.write_record([
                criterion.to_string().as_str(),
                code.as_str(),
                label.as_str(),
                evidence.title.as_str(),
                evidence.kind.label(),
                if evidence.validated { "oui" } else { "non" },
                evidence.created_at.format("%Y-%m-%d").to_string().as_str(),
            ])?;
        }
        csv_writer.flush().map_err(|err| ExportError::Csv(err.into()))?;
        Ok(())
    }
}

fn evidence_export(row: &Evidence) -> EvidenceExport {
    EvidenceExport {
        id: row.id,
        title: row.title.clone(),
        description: row.description.clone(),
        kind: row.kind.label(),
        validated: row.validated,
        validated_at: row.validated_at,
        validation_comment: row.validation_comment.clone(),
    }
}

fn numeric(code: &str) -> u32 {
    let digits: String = code.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(u32::MAX)
}
