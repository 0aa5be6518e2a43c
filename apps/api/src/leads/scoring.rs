use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::company::{PriorityLabel, ProjectPhase, WorkKind};

/// Hard ceiling for every score, whatever the configured `max_score`.
pub const SCORE_CEILING: u32 = 100;

#[derive(Debug, Error)]
pub enum ScoringConfigError {
    #[error("failed to read scoring config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scoring config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scoring config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseBonus {
    pub start: u32,
    pub peak: u32,
    pub completion: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelThresholds {
    pub high: u8,
    pub medium: u8,
}

/// Every tunable of the demand score in one place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub per_project: u32,
    pub vacancy_bonus: u32,
    /// Trades that are chronically short-staffed and earn `bottleneck_bonus`.
    pub bottleneck_trades: Vec<WorkKind>,
    pub bottleneck_bonus: u32,
    pub standard_trade_bonus: u32,
    pub phase_bonus: PhaseBonus,
    pub thresholds: LabelThresholds,
    pub max_score: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_project: 5,
            vacancy_bonus: 20,
            bottleneck_trades: vec![WorkKind::ConcreteShell, WorkKind::Prefab],
            bottleneck_bonus: 15,
            standard_trade_bonus: 0,
            phase_bonus: PhaseBonus {
                start: 10,
                peak: 15,
                completion: 5,
            },
            thresholds: LabelThresholds {
                high: 70,
                medium: 40,
            },
            max_score: SCORE_CEILING,
        }
    }
}

impl ScoringConfig {
    /// Loads a config from a JSON file, or the defaults when no path is given.
    /// Missing keys in the file fall back to their default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ScoringConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.max_score > SCORE_CEILING {
            return Err(ScoringConfigError::Invalid(format!(
                "max_score {} exceeds {SCORE_CEILING}",
                self.max_score
            )));
        }
        if self.thresholds.medium > self.thresholds.high {
            return Err(ScoringConfigError::Invalid(format!(
                "medium threshold {} is above high threshold {}",
                self.thresholds.medium, self.thresholds.high
            )));
        }
        if u32::from(self.thresholds.high) > self.max_score {
            return Err(ScoringConfigError::Invalid(format!(
                "high threshold {} can never be reached with max_score {}",
                self.thresholds.high, self.max_score
            )));
        }
        Ok(())
    }

    fn phase_bonus(&self, phase: ProjectPhase) -> u32 {
        match phase {
            ProjectPhase::Start => self.phase_bonus.start,
            ProjectPhase::Peak => self.phase_bonus.peak,
            ProjectPhase::Completion => self.phase_bonus.completion,
        }
    }
}

/// Demand score: weighted sum of the four drivers, clamped to `max_score`.
///
/// `project_count` must already be within [0, 10]; intake rejects anything else.
pub fn compute_score(
    project_count: u8,
    vacancies_active: bool,
    work_kind: WorkKind,
    project_phase: ProjectPhase,
    config: &ScoringConfig,
) -> u8 {
    let mut score = u32::from(project_count).saturating_mul(config.per_project);

    if vacancies_active {
        score = score.saturating_add(config.vacancy_bonus);
    }

    let trade_bonus = if config.bottleneck_trades.contains(&work_kind) {
        config.bottleneck_bonus
    } else {
        config.standard_trade_bonus
    };
    score = score.saturating_add(trade_bonus);
    score = score.saturating_add(config.phase_bonus(project_phase));

    // max_score is validated to be <= 100, so the cast cannot truncate
    score.min(config.max_score.min(SCORE_CEILING)) as u8
}

pub fn score_label(score: u8, thresholds: &LabelThresholds) -> PriorityLabel {
    if score >= thresholds.high {
        PriorityLabel::High
    } else if score >= thresholds.medium {
        PriorityLabel::Medium
    } else {
        PriorityLabel::Low
    }
}
