use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::IndicatorCatalog;
use crate::workflows::evidence::autoproof::AutoProofGenerator;
use crate::workflows::evidence::domain::{
    Evidence, EvidenceId, FormationSnapshot, NewEvidence, SessionCreated, TraineeEnrolled,
    TrainerSnapshot,
};
use crate::workflows::evidence::repository::EvidenceRepository;
use crate::workflows::{RepositoryError, SessionId, SiteId};

pub(super) fn site() -> SiteId {
    SiteId("siège".to_string())
}

pub(super) fn session() -> SessionId {
    SessionId(11)
}

#[derive(Default)]
pub(super) struct MemoryEvidence {
    rows: Mutex<Vec<Evidence>>,
}

impl MemoryEvidence {
    pub(super) fn all(&self) -> Vec<Evidence> {
        self.rows.lock().expect("evidence mutex poisoned").clone()
    }
}

impl EvidenceRepository for MemoryEvidence {
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

pub(super) fn build_generator() -> (AutoProofGenerator<MemoryEvidence>, Arc<MemoryEvidence>) {
    let evidence = Arc::new(MemoryEvidence::default());
    let generator = AutoProofGenerator::new(Arc::new(IndicatorCatalog::standard()), evidence.clone());
    (generator, evidence)
}

pub(super) fn full_session_event() -> SessionCreated {
    SessionCreated {
        session: session(),
        site: site(),
        formation: FormationSnapshot {
            title: "Gestes et postures".to_string(),
            description: "Prévention des troubles musculo-squelettiques".to_string(),
            program: Some("Jour 1 : théorie, Jour 2 : pratique".to_string()),
            teaching_methods: Some("Ateliers en sous-groupes".to_string()),
            prerequisites: Some("Aucun prérequis".to_string()),
        },
        starts_on: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        ends_on: NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date"),
        location: "Salle Jaurès, Lyon".to_string(),
        max_trainees: 12,
        trainer: Some(TrainerSnapshot {
            full_name: "Claude Marchand".to_string(),
            professional_status: "Salarié".to_string(),
            skills: Some("Ergonomie, prévention des risques".to_string()),
        }),
    }
}

pub(super) fn bare_session_event() -> SessionCreated {
    SessionCreated {
        session: session(),
        site: site(),
        formation: FormationSnapshot {
            title: "Initiation bureautique".to_string(),
            description: "Prise en main des outils".to_string(),
            program: None,
            teaching_methods: None,
            prerequisites: Some("   ".to_string()),
        },
        starts_on: NaiveDate::from_ymd_opt(2026, 4, 7).expect("valid date"),
        ends_on: NaiveDate::from_ymd_opt(2026, 4, 7).expect("valid date"),
        location: "À distance".to_string(),
        max_trainees: 8,
        trainer: None,
    }
}

pub(super) fn enrollment_event() -> TraineeEnrolled {
    TraineeEnrolled {
        session: session(),
        site: site(),
        full_name: "Nadia Benali".to_string(),
        role: "Assistante de gestion".to_string(),
        department: "Comptabilité".to_string(),
        enrollment_status: "Inscrit".to_string(),
    }
}
