//! Read-only registry of the Qualiopi indicator catalogue.
//!
//! The referential is fixed: 32 indicators spread over 7 criteria. Storage may
//! replicate the catalogue per site, so lookups collapse rows by indicator
//! code before any counting.

use serde::{Deserialize, Serialize};

use crate::workflows::SiteId;

/// Identifier wrapper for catalogue indicators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct IndicatorId(pub u64);

/// One of the seven top-level Qualiopi criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Criterion {
    PublicInformation,
    OfferDesign,
    DeliveryAdaptation,
    Resources,
    StaffSkills,
    Monitoring,
    ContinuousImprovement,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::PublicInformation,
        Criterion::OfferDesign,
        Criterion::DeliveryAdaptation,
        Criterion::Resources,
        Criterion::StaffSkills,
        Criterion::Monitoring,
        Criterion::ContinuousImprovement,
    ];

    pub const fn number(self) -> u8 {
        match self {
            Criterion::PublicInformation => 1,
            Criterion::OfferDesign => 2,
            Criterion::DeliveryAdaptation => 3,
            Criterion::Resources => 4,
            Criterion::StaffSkills => 5,
            Criterion::Monitoring => 6,
            Criterion::ContinuousImprovement => 7,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

/// An atomic compliance requirement from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: IndicatorId,
    pub code: String,
    pub label: String,
    pub criterion: Criterion,
    /// Populated when storage replicates the catalogue per site.
    pub site: Option<SiteId>,
}

/// In-memory view of the indicator referential.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
}

impl IndicatorCatalog {
    /// Catalogue seeded with the official 32 indicator definitions.
    pub fn standard() -> Self {
        let indicators = standard_definitions()
            .iter()
            .enumerate()
            .map(|(index, (code, label, criterion))| Indicator {
                id: IndicatorId(index as u64 + 1),
                code: (*code).to_string(),
                label: (*label).to_string(),
                criterion: *criterion,
                site: None,
            })
            .collect();
        Self { indicators }
    }

    pub fn from_indicators(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    pub fn get(&self, id: IndicatorId) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.id == id)
    }

    /// First catalogue row carrying the given code, any criterion.
    pub fn find_by_code(&self, code: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.code == code)
    }

    /// Monitoring-criterion row for the given code, used to resolve keyword
    /// matches and feed defaults.
    pub fn find_monitoring(&self, code: &str) -> Option<&Indicator> {
        self.indicators
            .iter()
            .find(|i| i.criterion == Criterion::Monitoring && i.code == code)
    }

    /// One row per code (first occurrence kept), ordered by criterion then
    /// numeric code. Per-site replication must not inflate totals.
    pub fn deduped(&self) -> Vec<&Indicator> {
        let mut seen = std::collections::HashSet::new();
        let mut unique: Vec<&Indicator> = self
            .indicators
            .iter()
            .filter(|i| seen.insert(i.code.clone()))
            .collect();
        unique.sort_by_key(|i| (i.criterion.number(), numeric_code(&i.code)));
        unique
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

fn numeric_code(code: &str) -> u32 {
    let digits: String = code.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(u32::MAX)
}

fn standard_definitions() -> &'static [(&'static str, &'static str, Criterion)] {
    use Criterion::*;
    &[
        ("1", "Information du public", PublicInformation),
        ("2", "Indicateurs de résultats", PublicInformation),
        ("3", "Taux d'obtention des certifications", PublicInformation),
        ("4", "Analyse du besoin", OfferDesign),
        ("5", "Objectifs de la prestation", OfferDesign),
        ("6", "Contenus et modalités", OfferDesign),
        ("7", "Contenus et exigences", OfferDesign),
        ("8", "Positionnement à l'entrée", OfferDesign),
        ("9", "Conditions de déroulement", DeliveryAdaptation),
        ("10", "Adaptation de la prestation", DeliveryAdaptation),
        ("11", "Atteinte des objectifs", DeliveryAdaptation),
        ("12", "Engagement des bénéficiaires", DeliveryAdaptation),
        ("13", "Coordination des apprentis", DeliveryAdaptation),
        ("14", "Exercice de la citoyenneté", DeliveryAdaptation),
        ("15", "Droits et devoirs de l'apprenti", DeliveryAdaptation),
        ("16", "Présentation à la certification", DeliveryAdaptation),
        ("17", "Moyens humains et techniques", Resources),
        ("18", "Coordination des acteurs", Resources),
        ("19", "Ressources pédagogiques", Resources),
        ("20", "Personnels dédiés", Resources),
        ("21", "Compétences des acteurs", StaffSkills),
        ("22", "Gestion de la compétence", StaffSkills),
        ("23", "Veille légale et réglementaire", Monitoring),
        ("24", "Veille des emplois et métiers", Monitoring),
        ("25", "Veille pédagogique et technologique", Monitoring),
        ("26", "Situation de handicap", Monitoring),
        ("27", "Disposition sous-traitance", Monitoring),
        ("28", "Formation en situation de travail", Monitoring),
        ("29", "Insertion professionnelle", Monitoring),
        ("30", "Recueil des appréciations", ContinuousImprovement),
        ("31", "Traitement des réclamations", ContinuousImprovement),
        ("32", "Amélioration continue", ContinuousImprovement),
    ]
}
