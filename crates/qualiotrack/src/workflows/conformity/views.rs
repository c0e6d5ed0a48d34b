use serde::Serialize;

use crate::workflows::SessionId;

/// Per-criterion slice of a conformity report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionConformity {
    pub criterion: u8,
    pub total_indicators: usize,
    pub satisfied_indicators: usize,
    pub rate: f64,
    /// True iff every indicator of the criterion is satisfied.
    pub conform: bool,
}

/// Conformity of one session, merging validated evidence with monitoring
/// validations for criterion 6.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConformity {
    pub session: SessionId,
    pub per_criterion: Vec<CriterionConformity>,
    pub total_indicators: usize,
    pub satisfied_indicators: usize,
    /// Percentage rounded to one decimal.
    pub global_rate: f64,
}

/// Indicator-level line of the site dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorStatus {
    pub code: String,
    pub label: String,
    pub criterion: u8,
    pub satisfied: bool,
}

/// Site-wide view for dashboards: satisfaction across every session's
/// validated evidence plus the monitoring stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDashboard {
    pub indicators: Vec<IndicatorStatus>,
    pub per_criterion: Vec<CriterionConformity>,
    pub total_indicators: usize,
    pub satisfied_indicators: usize,
    pub global_rate: f64,
}
