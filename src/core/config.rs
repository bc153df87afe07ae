//! Named defaults and heuristic constants.
//!
//! Every magic number the planner relies on lives here so the projection,
//! scenario and scoring code reads in terms of what a value means.

/// Life expectancy assumed whenever the profile does not state one.
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 80;

pub struct ProjectionDefaults {
    /// Annual pre-retirement return in percent.
    pub growth_rate_pct: f64,
    /// Annual withdrawal as a percent of the corpus at retirement.
    pub withdrawal_rate_pct: f64,
    /// Annual return on the remaining corpus after retirement, in percent.
    pub post_retirement_growth_rate_pct: f64,
}

pub const PROJECTION_DEFAULTS: ProjectionDefaults = ProjectionDefaults {
    growth_rate_pct: 6.0,
    withdrawal_rate_pct: 6.0,
    post_retirement_growth_rate_pct: 4.0,
};

pub struct PayoutAssumptions {
    /// Yield a self-invested lump sum is expected to produce per year.
    pub lump_sum_yield: f64,
    /// Share of the balance drawn per year under phased withdrawal.
    pub phased_draw_rate: f64,
    /// Insurer loading on a single-life annuity relative to a flat drawdown.
    pub annuity_loading: f64,
    /// Reduction applied to cover a second life.
    pub joint_life_factor: f64,
    pub lump_sum_tax_share: f64,
    pub annuity_tax_share: f64,
    pub phased_tax_share: f64,
    pub joint_life_tax_share: f64,
}

pub const PAYOUT_ASSUMPTIONS: PayoutAssumptions = PayoutAssumptions {
    lump_sum_yield: 0.05,
    phased_draw_rate: 0.04,
    annuity_loading: 1.1,
    joint_life_factor: 0.9,
    lump_sum_tax_share: 0.30,
    annuity_tax_share: 0.10,
    phased_tax_share: 0.15,
    joint_life_tax_share: 0.10,
};

pub struct SuitabilityRules {
    pub base_score: i32,
    pub min_score: i32,
    pub max_score: i32,
    /// Income-to-expense ratio thresholds, highest first.
    pub strong_ratio: f64,
    pub adequate_ratio: f64,
    pub marginal_ratio: f64,
    pub strong_delta: i32,
    pub adequate_delta: i32,
    pub marginal_delta: i32,
    pub shortfall_delta: i32,
}

pub const SUITABILITY_RULES: SuitabilityRules = SuitabilityRules {
    base_score: 50,
    min_score: 10,
    max_score: 95,
    strong_ratio: 1.2,
    adequate_ratio: 1.0,
    marginal_ratio: 0.8,
    strong_delta: 25,
    adequate_delta: 15,
    marginal_delta: 5,
    shortfall_delta: -10,
};

/// Suitability at or above which a scenario card is highlighted green.
pub const BAND_GREEN_MIN: u8 = 90;
/// Suitability at or above which a scenario card is highlighted yellow.
pub const BAND_YELLOW_MIN: u8 = 70;
/// Suitability at or above which the assistant presents a scenario as a match.
pub const STRONG_MATCH_MIN: u8 = 80;

pub struct FormLimits {
    pub min_age: u32,
    pub max_age: u32,
    pub max_retirement_age: u32,
    pub max_current_salary: f64,
    pub max_years_of_service: u32,
    pub max_pension_balance: f64,
    /// Per month.
    pub max_employer_contribution: f64,
}

pub const FORM_LIMITS: FormLimits = FormLimits {
    min_age: 18,
    max_age: 100,
    max_retirement_age: 75,
    max_current_salary: 10_000_000.0,
    max_years_of_service: 100,
    max_pension_balance: 10_000_000_000.0,
    max_employer_contribution: 1_000_000.0,
};

pub struct RiskScoring {
    pub large_cap_score: f64,
    pub mid_cap_score: f64,
    pub small_cap_score: f64,
    /// Ranks below this are large caps.
    pub large_cap_ranks: usize,
    /// Ranks below this (and not large) are mid caps.
    pub mid_cap_ranks: usize,
    /// Cap score used when only a stock total is known.
    pub unknown_allocation_score: f64,
    pub mutual_fund_score: f64,
}

pub const RISK_SCORING: RiskScoring = RiskScoring {
    large_cap_score: 1.0,
    mid_cap_score: 2.0,
    small_cap_score: 3.0,
    large_cap_ranks: 100,
    mid_cap_ranks: 250,
    unknown_allocation_score: 2.0,
    mutual_fund_score: 1.8,
};

pub const DEFAULT_PORT: u16 = 8080;
