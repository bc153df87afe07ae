use log::debug;
use serde::Serialize;

use super::config::{DEFAULT_LIFE_EXPECTANCY, PAYOUT_ASSUMPTIONS, STRONG_MATCH_MIN};
use super::error::{ProfileError, check_age, out_of_range, require_age, require_amount};
use super::profile::FinancialProfile;
use super::suitability::{self, ScoringContext, SuitabilityBand};
use super::types::{RiskLevel, Scenario, ScenarioId};

struct ScenarioCopy {
    name: &'static str,
    description: &'static str,
    pros: [&'static str; 3],
    cons: [&'static str; 3],
    risk_level: RiskLevel,
}

fn scenario_copy(id: ScenarioId) -> ScenarioCopy {
    match id {
        ScenarioId::LumpSum => ScenarioCopy {
            name: "Lump Sum Withdrawal",
            description: "Take the entire amount now and invest it yourself",
            pros: [
                "Full control over investments",
                "Liquidity for emergencies",
                "Potential for higher returns",
            ],
            cons: [
                "Market risk",
                "High immediate tax burden",
                "Risk of outliving money",
            ],
            risk_level: RiskLevel::High,
        },
        ScenarioId::Annuity => ScenarioCopy {
            name: "Life Annuity",
            description: "Guaranteed monthly income for life",
            pros: [
                "Guaranteed income for life",
                "Protection against longevity risk",
                "Lower tax burden",
            ],
            cons: [
                "No liquidity",
                "Fixed payments (inflation risk)",
                "No inheritance value",
            ],
            risk_level: RiskLevel::Low,
        },
        ScenarioId::Phased => ScenarioCopy {
            name: "Phased Withdrawal",
            description: "Systematic withdrawal over time with remaining invested",
            pros: [
                "Balanced approach",
                "Some liquidity maintained",
                "Potential for growth",
            ],
            cons: [
                "Market risk on remaining amount",
                "Complex management",
                "Sequence of returns risk",
            ],
            risk_level: RiskLevel::Medium,
        },
        ScenarioId::JointLife => ScenarioCopy {
            name: "Joint Life Annuity",
            description: "Guaranteed income for both you and your spouse",
            pros: [
                "Spouse protection",
                "Guaranteed income for both lives",
                "Peace of mind",
            ],
            cons: [
                "Lower monthly payments",
                "No liquidity",
                "Complex survivor benefits",
            ],
            risk_level: RiskLevel::Low,
        },
    }
}

#[derive(Debug, Clone, Copy)]
struct ScenarioPlan {
    pension_balance: f64,
    years_in_retirement: u32,
    married: bool,
    scoring: ScoringContext,
}

impl ScenarioPlan {
    fn from_profile(profile: &FinancialProfile) -> Result<Self, ProfileError> {
        let pension_balance = require_amount(profile.pension_balance, "pensionBalance")?;
        let current_age = require_age(profile.current_age, "currentAge")?;
        let retirement_age = require_age(profile.retirement_age, "retirementAge")?;
        let expense =
            require_amount(profile.monthly_retirement_expense, "monthlyRetirementExpense")?;
        if expense <= 0.0 {
            return Err(out_of_range("monthlyRetirementExpense", "must be > 0"));
        }

        if retirement_age <= current_age {
            return Err(ProfileError::AgeOrder {
                field: "retirementAge",
                value: retirement_age,
                relation: ">",
                other_field: "currentAge",
                other_value: current_age,
            });
        }
        let life_expectancy = check_age(
            profile.life_expectancy.unwrap_or(DEFAULT_LIFE_EXPECTANCY),
            "lifeExpectancy",
        )?;
        if life_expectancy <= retirement_age {
            return Err(ProfileError::NoRetirementYears {
                retirement_age,
                life_expectancy,
            });
        }

        Ok(Self {
            pension_balance,
            years_in_retirement: life_expectancy - retirement_age,
            married: profile.is_married(),
            scoring: ScoringContext {
                monthly_retirement_expense: expense,
                lifestyle: profile.retirement_lifestyle,
                legacy_goal: profile.legacy_goal,
            },
        })
    }

    fn ids(&self) -> Vec<ScenarioId> {
        let mut ids = vec![ScenarioId::LumpSum, ScenarioId::Annuity, ScenarioId::Phased];
        if self.married {
            ids.push(ScenarioId::JointLife);
        }
        ids
    }

    /// Monthly income and total tax impact, both rounded to whole rupees.
    fn payout(&self, id: ScenarioId) -> (u64, u64) {
        let a = &PAYOUT_ASSUMPTIONS;
        let balance = self.pension_balance;
        let months = f64::from(self.years_in_retirement * 12);
        let (monthly, tax_share) = match id {
            ScenarioId::LumpSum => (balance * a.lump_sum_yield / 12.0, a.lump_sum_tax_share),
            ScenarioId::Annuity => (balance / months * a.annuity_loading, a.annuity_tax_share),
            ScenarioId::Phased => (balance * a.phased_draw_rate / 12.0, a.phased_tax_share),
            ScenarioId::JointLife => (
                balance / months * a.joint_life_factor,
                a.joint_life_tax_share,
            ),
        };
        (round_rupees(monthly), round_rupees(balance * tax_share))
    }

    fn build(&self, id: ScenarioId) -> Scenario {
        let copy = scenario_copy(id);
        let (monthly_income, tax_implication) = self.payout(id);
        Scenario {
            id,
            name: copy.name,
            description: copy.description,
            total_value: round_rupees(self.pension_balance),
            monthly_income,
            tax_implication,
            pros: copy.pros.to_vec(),
            cons: copy.cons.to_vec(),
            risk_level: copy.risk_level,
            suitability: suitability::score(id, monthly_income, &self.scoring),
        }
    }
}

fn round_rupees(value: f64) -> u64 {
    value.round() as u64
}

/// Builds the payout scenarios for a profile in fixed order: lump sum,
/// annuity, phased, and joint life when the user is married.
pub fn generate_scenarios(profile: &FinancialProfile) -> Result<Vec<Scenario>, ProfileError> {
    let plan = ScenarioPlan::from_profile(profile)?;
    let scenarios: Vec<Scenario> = plan.ids().into_iter().map(|id| plan.build(id)).collect();
    debug!(
        "generated {} scenarios over {} retirement years",
        scenarios.len(),
        plan.years_in_retirement
    );
    Ok(scenarios)
}

/// Highest-suitability scenario; the earlier one wins a tie.
pub fn recommend(scenarios: &[Scenario]) -> Option<&Scenario> {
    scenarios.iter().reduce(|best, candidate| {
        if candidate.suitability > best.suitability {
            candidate
        } else {
            best
        }
    })
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisTone {
    Success,
    Info,
}

/// Assistant-facing summary of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAnalysis {
    pub id: ScenarioId,
    pub title: String,
    pub headline: String,
    pub tone: AnalysisTone,
    pub band: SuitabilityBand,
    pub summary: &'static str,
    pub monthly_income: u64,
    pub tax_implication: u64,
    pub risk_level: RiskLevel,
}

pub fn analyze(scenarios: &[Scenario], id: ScenarioId) -> Option<ScenarioAnalysis> {
    let scenario = scenarios.iter().find(|s| s.id == id)?;
    Some(ScenarioAnalysis {
        id,
        title: format!("{} Analysis", scenario.name),
        headline: format!("{}% Suitability Match", scenario.suitability),
        tone: if scenario.suitability >= STRONG_MATCH_MIN {
            AnalysisTone::Success
        } else {
            AnalysisTone::Info
        },
        band: SuitabilityBand::from_score(scenario.suitability),
        summary: scenario.description,
        monthly_income: scenario.monthly_income,
        tax_implication: scenario.tax_implication,
        risk_level: scenario.risk_level,
    })
}
