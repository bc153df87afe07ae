use serde::{Deserialize, Serialize};

use super::config::FORM_LIMITS;
use super::error::{ProfileError, check_amount, out_of_range, require};
use super::types::{LegacyGoal, MaritalStatus, RetirementLifestyle};

/// A possibly incomplete financial profile as collected by the forms.
///
/// Every field is optional; `project` and `generate_scenarios` check the
/// fields they need and reject the profile before computing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialProfile {
    #[serde(alias = "age")]
    pub current_age: Option<u32>,
    #[serde(alias = "plannedRetirementAge")]
    pub retirement_age: Option<u32>,
    pub life_expectancy: Option<u32>,

    pub pension_balance: Option<f64>,
    pub initial_savings: Option<f64>,
    pub monthly_income: Option<f64>,
    /// Annual, as the income form collects it.
    pub current_salary: Option<f64>,
    pub years_of_service: Option<u32>,
    /// Per month.
    pub employer_contribution: Option<f64>,
    pub monthly_retirement_expense: Option<f64>,

    pub annual_contribution: Option<f64>,
    #[serde(alias = "growthRate")]
    pub growth_rate_pct: Option<f64>,
    #[serde(alias = "withdrawalRate")]
    pub withdrawal_rate_pct: Option<f64>,
    #[serde(alias = "postRetirementGrowthRate")]
    pub post_retirement_growth_rate_pct: Option<f64>,

    pub marital_status: Option<MaritalStatus>,
    pub retirement_lifestyle: Option<RetirementLifestyle>,
    pub legacy_goal: Option<LegacyGoal>,
}

impl FinancialProfile {
    /// Overlays `other` onto `self`; fields present in `other` win.
    pub fn merge(&mut self, other: FinancialProfile) {
        self.current_age = other.current_age.or(self.current_age);
        self.retirement_age = other.retirement_age.or(self.retirement_age);
        self.life_expectancy = other.life_expectancy.or(self.life_expectancy);
        self.pension_balance = other.pension_balance.or(self.pension_balance);
        self.initial_savings = other.initial_savings.or(self.initial_savings);
        self.monthly_income = other.monthly_income.or(self.monthly_income);
        self.current_salary = other.current_salary.or(self.current_salary);
        self.years_of_service = other.years_of_service.or(self.years_of_service);
        self.employer_contribution = other.employer_contribution.or(self.employer_contribution);
        self.monthly_retirement_expense = other
            .monthly_retirement_expense
            .or(self.monthly_retirement_expense);
        self.annual_contribution = other.annual_contribution.or(self.annual_contribution);
        self.growth_rate_pct = other.growth_rate_pct.or(self.growth_rate_pct);
        self.withdrawal_rate_pct = other.withdrawal_rate_pct.or(self.withdrawal_rate_pct);
        self.post_retirement_growth_rate_pct = other
            .post_retirement_growth_rate_pct
            .or(self.post_retirement_growth_rate_pct);
        self.marital_status = other.marital_status.or(self.marital_status);
        self.retirement_lifestyle = other.retirement_lifestyle.or(self.retirement_lifestyle);
        self.legacy_goal = other.legacy_goal.or(self.legacy_goal);
    }

    /// Starting corpus for the projection; the pension balance stands in
    /// when no separate savings figure was given.
    pub fn starting_corpus(&self) -> Option<f64> {
        self.initial_savings.or(self.pension_balance)
    }

    /// Explicit annual contribution, else twelve months of employer
    /// contribution, else nothing.
    pub fn derived_annual_contribution(&self) -> f64 {
        self.annual_contribution
            .or(self.employer_contribution.map(|monthly| monthly * 12.0))
            .unwrap_or(0.0)
    }

    pub fn is_married(&self) -> bool {
        self.marital_status == Some(MaritalStatus::Married)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub age: u32,
    pub marital_status: Option<MaritalStatus>,
}

impl BasicInfo {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(FORM_LIMITS.min_age..=FORM_LIMITS.max_age).contains(&self.age) {
            return Err(out_of_range(
                "age",
                format!(
                    "must be between {} and {}",
                    FORM_LIMITS.min_age, FORM_LIMITS.max_age
                ),
            ));
        }
        require(self.marital_status, "maritalStatus")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatus {
    pub current_salary: f64,
    pub years_of_service: u32,
    pub pension_balance: f64,
    pub employer_contribution: Option<f64>,
}

impl IncomeStatus {
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_limit(
            self.current_salary,
            "currentSalary",
            FORM_LIMITS.max_current_salary,
        )?;
        if self.years_of_service > FORM_LIMITS.max_years_of_service {
            return Err(out_of_range(
                "yearsOfService",
                format!("must be at most {}", FORM_LIMITS.max_years_of_service),
            ));
        }
        check_limit(
            self.pension_balance,
            "pensionBalance",
            FORM_LIMITS.max_pension_balance,
        )?;
        if let Some(contribution) = self.employer_contribution {
            check_limit(
                contribution,
                "employerContribution",
                FORM_LIMITS.max_employer_contribution,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInfo {
    pub planned_retirement_age: u32,
    pub retirement_lifestyle: Option<RetirementLifestyle>,
    pub monthly_retirement_expense: f64,
    pub legacy_goal: Option<LegacyGoal>,
}

impl RetirementInfo {
    pub fn validate(&self, current_age: u32) -> Result<(), ProfileError> {
        if self.planned_retirement_age <= current_age
            || self.planned_retirement_age > FORM_LIMITS.max_retirement_age
        {
            return Err(out_of_range(
                "plannedRetirementAge",
                format!(
                    "must be between {} and {}",
                    current_age + 1,
                    FORM_LIMITS.max_retirement_age
                ),
            ));
        }
        require(self.retirement_lifestyle, "retirementLifestyle")?;
        let expense = check_amount(self.monthly_retirement_expense, "monthlyRetirementExpense")?;
        if expense <= 0.0 {
            return Err(out_of_range("monthlyRetirementExpense", "must be > 0"));
        }
        require(self.legacy_goal, "legacyGoal")?;
        Ok(())
    }
}

/// Accumulates a profile stage by stage, validating each form as it lands.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    profile: FinancialProfile,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basic_info(mut self, info: BasicInfo) -> Result<Self, ProfileError> {
        info.validate()?;
        self.profile.current_age = Some(info.age);
        self.profile.marital_status = info.marital_status;
        Ok(self)
    }

    pub fn income_status(mut self, info: IncomeStatus) -> Result<Self, ProfileError> {
        info.validate()?;
        self.profile.current_salary = Some(info.current_salary);
        self.profile.years_of_service = Some(info.years_of_service);
        self.profile.pension_balance = Some(info.pension_balance);
        self.profile.employer_contribution = info.employer_contribution;
        Ok(self)
    }

    pub fn retirement_info(mut self, info: RetirementInfo) -> Result<Self, ProfileError> {
        let current_age = require(self.profile.current_age, "age")?;
        info.validate(current_age)?;
        self.profile.retirement_age = Some(info.planned_retirement_age);
        self.profile.retirement_lifestyle = info.retirement_lifestyle;
        self.profile.monthly_retirement_expense = Some(info.monthly_retirement_expense);
        self.profile.legacy_goal = info.legacy_goal;
        Ok(self)
    }

    /// Applies fields the forms do not collect (rates, life expectancy).
    pub fn with_overrides(mut self, overrides: FinancialProfile) -> Self {
        self.profile.merge(overrides);
        self
    }

    pub fn build(self) -> FinancialProfile {
        self.profile
    }
}

fn check_limit(value: f64, field: &'static str, max: f64) -> Result<f64, ProfileError> {
    let value = check_amount(value, field)?;
    if value > max {
        return Err(out_of_range(field, format!("must be at most {max}")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> BasicInfo {
        BasicInfo {
            age: 58,
            marital_status: Some(MaritalStatus::Married),
        }
    }

    fn income() -> IncomeStatus {
        IncomeStatus {
            current_salary: 150_000.0,
            years_of_service: 30,
            pension_balance: 2_000_000.0,
            employer_contribution: Some(5_000.0),
        }
    }

    fn retirement() -> RetirementInfo {
        RetirementInfo {
            planned_retirement_age: 60,
            retirement_lifestyle: Some(RetirementLifestyle::Comfortable),
            monthly_retirement_expense: 75_000.0,
            legacy_goal: Some(LegacyGoal::ModerateLegacy),
        }
    }

    #[test]
    fn builder_collects_all_three_stages() {
        let profile = ProfileBuilder::new()
            .basic_info(basic())
            .and_then(|b| b.income_status(income()))
            .and_then(|b| b.retirement_info(retirement()))
            .expect("valid stages")
            .build();

        assert_eq!(profile.current_age, Some(58));
        assert_eq!(profile.retirement_age, Some(60));
        assert_eq!(profile.pension_balance, Some(2_000_000.0));
        assert_eq!(profile.current_salary, Some(150_000.0));
        assert_eq!(profile.monthly_income, None);
        assert_eq!(profile.monthly_retirement_expense, Some(75_000.0));
        assert_eq!(profile.legacy_goal, Some(LegacyGoal::ModerateLegacy));
        assert!(profile.is_married());
    }

    #[test]
    fn overrides_fill_fields_the_forms_do_not_collect() {
        let profile = ProfileBuilder::new()
            .basic_info(basic())
            .expect("valid basic info")
            .with_overrides(FinancialProfile {
                life_expectancy: Some(90),
                growth_rate_pct: Some(8.0),
                ..FinancialProfile::default()
            })
            .build();
        assert_eq!(profile.current_age, Some(58));
        assert_eq!(profile.life_expectancy, Some(90));
        assert_eq!(profile.growth_rate_pct, Some(8.0));
    }

    #[test]
    fn retirement_info_needs_basic_info_first() {
        let err = ProfileBuilder::new()
            .retirement_info(retirement())
            .expect_err("age is unknown");
        assert_eq!(err, ProfileError::MissingField { field: "age" });
    }

    #[test]
    fn basic_info_rejects_underage_and_missing_status() {
        let mut info = basic();
        info.age = 17;
        assert_eq!(info.validate().expect_err("too young").field(), "age");

        let mut info = basic();
        info.marital_status = None;
        assert_eq!(
            info.validate().expect_err("status missing").field(),
            "maritalStatus"
        );
    }

    #[test]
    fn retirement_info_rejects_age_not_after_current_or_past_limit() {
        let mut info = retirement();
        info.planned_retirement_age = 58;
        assert_eq!(
            info.validate(58).expect_err("not after current age").field(),
            "plannedRetirementAge"
        );

        info.planned_retirement_age = 76;
        assert!(info.validate(58).is_err());
    }

    #[test]
    fn retirement_info_rejects_zero_expense() {
        let mut info = retirement();
        info.monthly_retirement_expense = 0.0;
        let err = info.validate(40).expect_err("expense must be positive");
        assert_eq!(err.field(), "monthlyRetirementExpense");
    }

    #[test]
    fn income_status_enforces_form_limits() {
        let mut info = income();
        info.pension_balance = -1.0;
        assert_eq!(
            info.validate().expect_err("negative").field(),
            "pensionBalance"
        );

        let mut info = income();
        info.employer_contribution = Some(2_000_000.0);
        assert_eq!(
            info.validate().expect_err("over limit").field(),
            "employerContribution"
        );
    }

    #[test]
    fn merge_prefers_incoming_fields_and_keeps_the_rest() {
        let mut profile = FinancialProfile {
            current_age: Some(40),
            pension_balance: Some(1_000.0),
            ..FinancialProfile::default()
        };
        profile.merge(FinancialProfile {
            pension_balance: Some(2_000.0),
            life_expectancy: Some(85),
            ..FinancialProfile::default()
        });

        assert_eq!(profile.current_age, Some(40));
        assert_eq!(profile.pension_balance, Some(2_000.0));
        assert_eq!(profile.life_expectancy, Some(85));
    }

    #[test]
    fn derived_projection_inputs_fall_back_in_order() {
        let mut profile = FinancialProfile {
            pension_balance: Some(500.0),
            employer_contribution: Some(100.0),
            ..FinancialProfile::default()
        };
        assert_eq!(profile.starting_corpus(), Some(500.0));
        assert_eq!(profile.derived_annual_contribution(), 1_200.0);

        profile.initial_savings = Some(50.0);
        profile.annual_contribution = Some(10.0);
        assert_eq!(profile.starting_corpus(), Some(50.0));
        assert_eq!(profile.derived_annual_contribution(), 10.0);

        assert_eq!(FinancialProfile::default().derived_annual_contribution(), 0.0);
    }

    #[test]
    fn deserializes_form_keys() {
        let json = r#"{
            "age": 45,
            "plannedRetirementAge": 60,
            "pensionBalance": 900000,
            "maritalStatus": "married",
            "retirementLifestyle": "lavish",
            "legacyGoal": "substantial-legacy",
            "growthRate": 7,
            "currentSalary": 1200000
        }"#;
        let profile: FinancialProfile = serde_json::from_str(json).expect("valid json");
        assert_eq!(profile.current_age, Some(45));
        assert_eq!(profile.retirement_age, Some(60));
        assert_eq!(profile.pension_balance, Some(900_000.0));
        assert_eq!(profile.marital_status, Some(MaritalStatus::Married));
        assert_eq!(
            profile.retirement_lifestyle,
            Some(RetirementLifestyle::Lavish)
        );
        assert_eq!(profile.legacy_goal, Some(LegacyGoal::SubstantialLegacy));
        assert_eq!(profile.growth_rate_pct, Some(7.0));
        assert_eq!(profile.current_salary, Some(1_200_000.0));
        assert_eq!(profile.monthly_income, None);
    }
}
