//! Multi-source conformity computation.
//!
//! All reads are pure and non-mutating; any number of callers may aggregate
//! concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use super::views::{CriterionConformity, IndicatorStatus, SessionConformity, SiteDashboard};
use crate::catalog::{Criterion, IndicatorCatalog};
use crate::workflows::evidence::domain::Evidence;
use crate::workflows::evidence::repository::EvidenceRepository;
use crate::workflows::monitoring::repository::ValidationRepository;
use crate::workflows::{RepositoryError, SessionId, SiteId};

pub struct ConformityAggregator<E, V> {
    catalog: Arc<IndicatorCatalog>,
    evidence: Arc<E>,
    validations: Arc<V>,
}

impl<E, V> ConformityAggregator<E, V>
where
    E: EvidenceRepository,
    V: ValidationRepository,
{
    pub fn new(catalog: Arc<IndicatorCatalog>, evidence: Arc<E>, validations: Arc<V>) -> Self {
        Self {
            catalog,
            evidence,
            validations,
        }
    }

    /// Conformity of one session. Sessions are external collaborators, so the
    /// caller supplies the session's site for the monitoring stream.
    pub fn session_conformity(
        &self,
        session: SessionId,
        site: &SiteId,
    ) -> Result<SessionConformity, RepositoryError> {
        let validated = self.evidence.validated_for_session(session)?;
        let satisfied = self.satisfied_codes(&validated, site)?;
        let (per_criterion, total, satisfied_count) = self.tally(&satisfied);

        Ok(SessionConformity {
            session,
            per_criterion,
            total_indicators: total,
            satisfied_indicators: satisfied_count,
            global_rate: rate(satisfied_count, total),
        })
    }

    /// Indicator-level view across every session of a site.
    pub fn site_dashboard(&self, site: &SiteId) -> Result<SiteDashboard, RepositoryError> {
        let validated = self.evidence.validated_for_site(site)?;
        let satisfied = self.satisfied_codes(&validated, site)?;
        let (per_criterion, total, satisfied_count) = self.tally(&satisfied);

        let indicators = self
            .catalog
            .deduped()
            .into_iter()
            .map(|indicator| IndicatorStatus {
                code: indicator.code.clone(),
                label: indicator.label.clone(),
                criterion: indicator.criterion.number(),
                satisfied: satisfied.contains(&indicator.code),
            })
            .collect();

        Ok(SiteDashboard {
            indicators,
            per_criterion,
            total_indicators: total,
            satisfied_indicators: satisfied_count,
            global_rate: rate(satisfied_count, total),
        })
    }

    /// Codes satisfied by validated evidence, plus codes covered by a
    /// site-scoped validation for monitoring indicators only. The
    /// substitution rule is unique to criterion 6.
    fn satisfied_codes(
        &self,
        validated_evidence: &[Evidence],
        site: &SiteId,
    ) -> Result<HashSet<String>, RepositoryError> {
        let mut satisfied: HashSet<String> = validated_evidence
            .iter()
            .filter_map(|row| self.catalog.get(row.indicator))
            .map(|indicator| indicator.code.clone())
            .collect();

        for validation in self.validations.for_site(site)? {
            if let Some(indicator) = self.catalog.get(validation.indicator) {
                if indicator.criterion == Criterion::Monitoring {
                    satisfied.insert(indicator.code.clone());
                }
            }
        }

        Ok(satisfied)
    }

    fn tally(&self, satisfied: &HashSet<String>) -> (Vec<CriterionConformity>, usize, usize) {
        let deduped = self.catalog.deduped();

        let mut per_criterion = Vec::new();
        for criterion in Criterion::ALL {
            let indicators: Vec<_> = deduped
                .iter()
                .filter(|i| i.criterion == criterion)
                .collect();
            if indicators.is_empty() {
                continue;
            }
            let total = indicators.len();
            let count = indicators
                .iter()
                .filter(|i| satisfied.contains(&i.code))
                .count();
            per_criterion.push(CriterionConformity {
                criterion: criterion.number(),
                total_indicators: total,
                satisfied_indicators: count,
                rate: rate(count, total),
                conform: count == total,
            });
        }

        let total = deduped.len();
        let satisfied_count = deduped
            .iter()
            .filter(|i| satisfied.contains(&i.code))
            .count();
        (per_criterion, total, satisfied_count)
    }
}

/// Percentage rounded to one decimal.
pub(crate) fn rate(satisfied: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = satisfied as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}
