//! Draft-evidence generation from business lifecycle events.
//!
//! Each trigger runs a fixed rule table. Rules are independent: a missing
//! indicator or a store failure on one rule never prevents the remaining
//! rules from running. Generated rows start unvalidated; a human must confirm
//! them before they count toward conformity.

use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    Evidence, EvidenceKind, FormationCreated, NewEvidence, SessionCreated, TraineeEnrolled,
};
use super::repository::EvidenceRepository;
use crate::catalog::IndicatorCatalog;
use crate::workflows::{RepositoryError, SessionId, SiteId};

/// Outcome of one trigger: rows created, rules skipped because the identical
/// (session, indicator, title) row already exists, and per-rule errors.
#[derive(Debug, Default)]
pub struct GeneratedProofs {
    pub created: Vec<Evidence>,
    pub skipped: usize,
    pub errors: Vec<String>,
}

pub struct AutoProofGenerator<E> {
    catalog: Arc<IndicatorCatalog>,
    evidence: Arc<E>,
}

impl<E> AutoProofGenerator<E>
where
    E: EvidenceRepository,
{
    pub fn new(catalog: Arc<IndicatorCatalog>, evidence: Arc<E>) -> Self {
        Self { catalog, evidence }
    }

    /// Evidence requires a session reference, so offering creation defers to
    /// the first session.
    pub fn on_formation_created(&self, event: &FormationCreated) -> GeneratedProofs {
        info!(
            formation = %event.formation.title,
            "preuves différées jusqu'à la création de la première session"
        );
        GeneratedProofs::default()
    }

    pub fn on_session_created(&self, event: &SessionCreated) -> GeneratedProofs {
        let mut report = GeneratedProofs::default();
        let formation = &event.formation;

        self.stage(
            &mut report,
            &event.site,
            event.session,
            "1",
            format!("Formation : {}", formation.title),
            format!(
                "Formation '{}' - Description : {}",
                formation.title, formation.description
            ),
        );

        if let Some(prerequisites) = populated(&formation.prerequisites) {
            self.stage(
                &mut report,
                &event.site,
                event.session,
                "4",
                format!("Prérequis : {}", formation.title),
                format!("Prérequis : {prerequisites}"),
            );
        }

        if let Some(program) = populated(&formation.program) {
            self.stage(
                &mut report,
                &event.site,
                event.session,
                "6",
                format!("Programme : {}", formation.title),
                format!("Programme : {program}"),
            );
        }

        if let Some(methods) = populated(&formation.teaching_methods) {
            self.stage(
                &mut report,
                &event.site,
                event.session,
                "6",
                format!("Modalités pédagogiques : {}", formation.title),
                format!("Modalités : {methods}"),
            );
        }

        self.stage(
            &mut report,
            &event.site,
            event.session,
            "5",
            format!("Session programmée : {}", formation.title),
            format!(
                "Session du {} au {} - Lieu : {}",
                event.starts_on.format("%d/%m/%Y"),
                event.ends_on.format("%d/%m/%Y"),
                event.location
            ),
        );

        self.stage(
            &mut report,
            &event.site,
            event.session,
            "9",
            format!("Conditions de déroulement - Session {}", formation.title),
            format!(
                "Dates : {} - {}, Lieu : {}, Max stagiaires : {}",
                event.starts_on.format("%d/%m/%Y"),
                event.ends_on.format("%d/%m/%Y"),
                event.location,
                event.max_trainees
            ),
        );

        if let Some(trainer) = &event.trainer {
            self.stage(
                &mut report,
                &event.site,
                event.session,
                "17",
                format!("Formateur assigné : {}", trainer.full_name),
                format!(
                    "Formateur : {} - Statut : {}",
                    trainer.full_name, trainer.professional_status
                ),
            );

            if let Some(skills) = populated(&trainer.skills) {
                self.stage(
                    &mut report,
                    &event.site,
                    event.session,
                    "21",
                    format!("Compétences du formateur : {}", trainer.full_name),
                    format!("Compétences : {skills}"),
                );
            }
        }

        info!(
            session = event.session.0,
            created = report.created.len(),
            skipped = report.skipped,
            "preuves générées pour la session"
        );
        report
    }

    pub fn on_trainee_enrolled(&self, event: &TraineeEnrolled) -> GeneratedProofs {
        let mut report = GeneratedProofs::default();

        self.stage(
            &mut report,
            &event.site,
            event.session,
            "8",
            format!("Inscription stagiaire : {}", event.full_name),
            format!(
                "Stagiaire inscrit : {} - Poste : {} - Service : {}",
                event.full_name, event.role, event.department
            ),
        );

        self.stage(
            &mut report,
            &event.site,
            event.session,
            "12",
            format!("Inscription validée : {}", event.full_name),
            format!("Stagiaire inscrit avec statut : {}", event.enrollment_status),
        );

        report
    }

    fn stage(
        &self,
        report: &mut GeneratedProofs,
        site: &SiteId,
        session: SessionId,
        code: &str,
        title: String,
        description: String,
    ) {
        let Some(indicator) = self.catalog.find_by_code(code) else {
            warn!(code, "indicateur absent du catalogue");
            report.errors.push(format!("indicateur {code} introuvable"));
            return;
        };

        match self.evidence.insert(NewEvidence {
            session,
            indicator: indicator.id,
            title,
            description,
            kind: EvidenceKind::Document,
            file_path: None,
            site: site.clone(),
            created_by: "system".to_string(),
        }) {
            Ok(evidence) => report.created.push(evidence),
            Err(RepositoryError::Conflict) => report.skipped += 1,
            Err(other) => report.errors.push(format!("indicateur {code}: {other}")),
        }
    }
}

fn populated(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
