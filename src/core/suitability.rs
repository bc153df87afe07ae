//! Suitability heuristic: a hand-tuned rule table, not a model.
//!
//! Each adjustment is its own lookup so the table can be checked entry by
//! entry; `score` only sums and clamps.

use serde::Serialize;

use super::config::{BAND_GREEN_MIN, BAND_YELLOW_MIN, SUITABILITY_RULES};
use super::types::{LegacyGoal, RetirementLifestyle, ScenarioId};

/// Inputs the scorer needs from the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    pub monthly_retirement_expense: f64,
    pub lifestyle: Option<RetirementLifestyle>,
    pub legacy_goal: Option<LegacyGoal>,
}

pub fn income_adequacy_delta(monthly_income: u64, monthly_expense: f64) -> i32 {
    let rules = &SUITABILITY_RULES;
    let ratio = monthly_income as f64 / monthly_expense;
    if ratio >= rules.strong_ratio {
        rules.strong_delta
    } else if ratio >= rules.adequate_ratio {
        rules.adequate_delta
    } else if ratio >= rules.marginal_ratio {
        rules.marginal_delta
    } else {
        rules.shortfall_delta
    }
}

pub fn lifestyle_delta(lifestyle: RetirementLifestyle, scenario: ScenarioId) -> i32 {
    use RetirementLifestyle::*;
    use ScenarioId::*;
    match (lifestyle, scenario) {
        (Minimalistic, Annuity | JointLife) => 20,
        (Minimalistic, LumpSum) => -10,
        (Comfortable, Phased) => 20,
        (Comfortable, Annuity) => 10,
        (Lavish, LumpSum) => 20,
        (Lavish, Phased) => 10,
        (Lavish, Annuity) => -10,
        _ => 0,
    }
}

pub fn legacy_delta(goal: LegacyGoal, scenario: ScenarioId) -> i32 {
    use LegacyGoal::*;
    use ScenarioId::*;
    match (goal, scenario) {
        (MaximizeIncome, Annuity) => 15,
        (SubstantialLegacy, LumpSum) => 20,
        (SubstantialLegacy, Annuity) => -15,
        (ModerateLegacy, Phased) => 15,
        _ => 0,
    }
}

/// Suitability of a scenario paying `monthly_income`, clamped to the
/// published range.
pub fn score(scenario: ScenarioId, monthly_income: u64, context: &ScoringContext) -> u8 {
    let rules = &SUITABILITY_RULES;
    let mut total = rules.base_score
        + income_adequacy_delta(monthly_income, context.monthly_retirement_expense);
    if let Some(lifestyle) = context.lifestyle {
        total += lifestyle_delta(lifestyle, scenario);
    }
    if let Some(goal) = context.legacy_goal {
        total += legacy_delta(goal, scenario);
    }
    total.clamp(rules.min_score, rules.max_score) as u8
}

/// Highlight colour the scenario cards use.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuitabilityBand {
    Green,
    Yellow,
    Red,
}

impl SuitabilityBand {
    pub fn from_score(score: u8) -> Self {
        if score >= BAND_GREEN_MIN {
            SuitabilityBand::Green
        } else if score >= BAND_YELLOW_MIN {
            SuitabilityBand::Yellow
        } else {
            SuitabilityBand::Red
        }
    }
}
