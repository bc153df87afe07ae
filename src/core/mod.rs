pub mod config;
mod error;
mod profile;
mod projector;
pub mod risk;
mod scenarios;
pub mod suitability;
mod types;

pub use error::{ProfileError, RiskError};
pub use profile::{BasicInfo, FinancialProfile, IncomeStatus, ProfileBuilder, RetirementInfo};
pub use projector::{peak_corpus, project, retirement_marker};
pub use scenarios::{AnalysisTone, ScenarioAnalysis, analyze, generate_scenarios, recommend};
pub use suitability::SuitabilityBand;
pub use types::{
    CorpusTimePoint, LegacyGoal, MaritalStatus, Phase, RetirementLifestyle, RiskLevel, Scenario,
    ScenarioId,
};
