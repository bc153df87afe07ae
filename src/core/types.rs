use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetirementLifestyle {
    Minimalistic,
    Comfortable,
    Lavish,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyGoal {
    MaximizeIncome,
    ModerateLegacy,
    SubstantialLegacy,
    CharitableGiving,
    NoPreference,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulation,
    Withdrawal,
}

/// One simulated year of the corpus trajectory.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusTimePoint {
    pub year: i32,
    pub age: u32,
    pub corpus_value: u64,
    pub phase: Phase,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    LumpSum,
    Annuity,
    Phased,
    JointLife,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: &'static str,
    pub description: &'static str,
    pub total_value: u64,
    pub monthly_income: u64,
    pub tax_implication: u64,
    pub pros: Vec<&'static str>,
    pub cons: Vec<&'static str>,
    pub risk_level: RiskLevel,
    pub suitability: u8,
}
