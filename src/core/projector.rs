use log::debug;

use super::config::{DEFAULT_LIFE_EXPECTANCY, PROJECTION_DEFAULTS};
use super::error::{ProfileError, check_age, check_amount, out_of_range, require_age};
use super::profile::FinancialProfile;
use super::types::{CorpusTimePoint, Phase};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ProjectionPlan {
    current_age: u32,
    retirement_age: u32,
    life_expectancy: u32,
    initial_savings: f64,
    annual_contribution: f64,
    growth_rate: f64,
    withdrawal_rate: f64,
    post_retirement_growth_rate: f64,
}

impl ProjectionPlan {
    fn from_profile(profile: &FinancialProfile) -> Result<Self, ProfileError> {
        let current_age = require_age(profile.current_age, "currentAge")?;
        let retirement_age = require_age(profile.retirement_age, "retirementAge")?;
        let life_expectancy = check_age(
            profile.life_expectancy.unwrap_or(DEFAULT_LIFE_EXPECTANCY),
            "lifeExpectancy",
        )?;

        if retirement_age < current_age {
            return Err(ProfileError::AgeOrder {
                field: "retirementAge",
                value: retirement_age,
                relation: ">=",
                other_field: "currentAge",
                other_value: current_age,
            });
        }
        if life_expectancy < retirement_age {
            return Err(ProfileError::AgeOrder {
                field: "lifeExpectancy",
                value: life_expectancy,
                relation: ">=",
                other_field: "retirementAge",
                other_value: retirement_age,
            });
        }

        let initial_savings = profile
            .starting_corpus()
            .ok_or(ProfileError::MissingField {
                field: "initialSavings",
            })?;
        let initial_savings = check_amount(initial_savings, "initialSavings")?;
        let annual_contribution =
            check_amount(profile.derived_annual_contribution(), "annualContribution")?;

        Ok(Self {
            current_age,
            retirement_age,
            life_expectancy,
            initial_savings,
            annual_contribution,
            growth_rate: rate(
                profile.growth_rate_pct,
                PROJECTION_DEFAULTS.growth_rate_pct,
                "growthRatePct",
            )?,
            withdrawal_rate: rate(
                profile.withdrawal_rate_pct,
                PROJECTION_DEFAULTS.withdrawal_rate_pct,
                "withdrawalRatePct",
            )?,
            post_retirement_growth_rate: rate(
                profile.post_retirement_growth_rate_pct,
                PROJECTION_DEFAULTS.post_retirement_growth_rate_pct,
                "postRetirementGrowthRatePct",
            )?,
        })
    }
}

fn rate(pct: Option<f64>, default_pct: f64, field: &'static str) -> Result<f64, ProfileError> {
    let pct = pct.unwrap_or(default_pct);
    if !pct.is_finite() || pct < 0.0 {
        return Err(out_of_range(field, "must be a finite percentage >= 0"));
    }
    Ok(pct / 100.0)
}

/// Simulates the corpus year by year from the current age through life
/// expectancy, both inclusive. `base_year` is the calendar year of the
/// current age.
///
/// Accumulation runs through the retirement-age year, which holds the peak
/// corpus. Every later year withdraws a fixed share of that peak (not of the
/// remaining balance), grows what is left, and floors the result at zero.
pub fn project(
    profile: &FinancialProfile,
    base_year: i32,
) -> Result<Vec<CorpusTimePoint>, ProfileError> {
    let plan = ProjectionPlan::from_profile(profile)?;
    let span = (plan.life_expectancy - plan.current_age) as i32;
    if base_year.checked_add(span).is_none() {
        return Err(out_of_range(
            "baseYear",
            format!("must leave room for {span} projected years"),
        ));
    }
    let points = simulate(&plan, base_year);
    debug!(
        "projected {} years from age {} (retirement at {}, peak {:?})",
        points.len(),
        plan.current_age,
        plan.retirement_age,
        peak_corpus(&points)
    );
    Ok(points)
}

fn simulate(plan: &ProjectionPlan, base_year: i32) -> Vec<CorpusTimePoint> {
    let years = (plan.life_expectancy - plan.current_age + 1) as usize;
    let mut points = Vec::with_capacity(years);
    let point = |age: u32, corpus: f64, phase: Phase| CorpusTimePoint {
        year: base_year + (age - plan.current_age) as i32,
        age,
        corpus_value: corpus.round() as u64,
        phase,
    };

    let mut corpus = plan.initial_savings;
    points.push(point(plan.current_age, corpus, Phase::Accumulation));
    for age in plan.current_age + 1..=plan.retirement_age {
        corpus = corpus * (1.0 + plan.growth_rate) + plan.annual_contribution;
        points.push(point(age, corpus, Phase::Accumulation));
    }

    let annual_withdrawal = corpus * plan.withdrawal_rate;
    for age in plan.retirement_age + 1..=plan.life_expectancy {
        corpus = ((corpus - annual_withdrawal) * (1.0 + plan.post_retirement_growth_rate)).max(0.0);
        points.push(point(age, corpus, Phase::Withdrawal));
    }

    points
}

/// Index of the retirement-year point: the last accumulation point.
pub fn retirement_marker(points: &[CorpusTimePoint]) -> Option<usize> {
    points
        .iter()
        .rposition(|point| point.phase == Phase::Accumulation)
}

pub fn peak_corpus(points: &[CorpusTimePoint]) -> Option<u64> {
    retirement_marker(points).map(|idx| points[idx].corpus_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn sample_profile() -> FinancialProfile {
        FinancialProfile {
            current_age: Some(25),
            retirement_age: Some(60),
            life_expectancy: Some(85),
            initial_savings: Some(200_000.0),
            annual_contribution: Some(10_000.0),
            ..FinancialProfile::default()
        }
    }

    fn flat_profile(current: u32, retirement: u32, life: u32) -> FinancialProfile {
        FinancialProfile {
            current_age: Some(current),
            retirement_age: Some(retirement),
            life_expectancy: Some(life),
            initial_savings: Some(100_000.0),
            annual_contribution: Some(0.0),
            growth_rate_pct: Some(0.0),
            withdrawal_rate_pct: Some(50.0),
            post_retirement_growth_rate_pct: Some(0.0),
            ..FinancialProfile::default()
        }
    }

    #[test]
    fn oracle_half_withdrawals_from_peak_drain_in_two_years() {
        let points = project(&flat_profile(60, 60, 62), 2025).expect("valid profile");

        assert_eq!(
            points,
            vec![
                CorpusTimePoint {
                    year: 2025,
                    age: 60,
                    corpus_value: 100_000,
                    phase: Phase::Accumulation,
                },
                CorpusTimePoint {
                    year: 2026,
                    age: 61,
                    corpus_value: 50_000,
                    phase: Phase::Withdrawal,
                },
                CorpusTimePoint {
                    year: 2027,
                    age: 62,
                    corpus_value: 0,
                    phase: Phase::Withdrawal,
                },
            ]
        );
    }

    #[test]
    fn oracle_compound_growth_matches_hand_calculation() {
        let mut profile = flat_profile(30, 33, 35);
        profile.initial_savings = Some(1_000.0);
        profile.annual_contribution = Some(100.0);
        profile.growth_rate_pct = Some(10.0);
        profile.withdrawal_rate_pct = Some(10.0);
        profile.post_retirement_growth_rate_pct = Some(10.0);

        // Accumulation: 1000 -> 1200 -> 1420 -> 1662
        // Withdrawal of 166.2 per year: (1662-166.2)*1.1 = 1645.38,
        // (1645.38-166.2)*1.1 = 1627.098
        let values: Vec<u64> = project(&profile, 2000)
            .expect("valid profile")
            .iter()
            .map(|p| p.corpus_value)
            .collect();
        assert_eq!(values, vec![1_000, 1_200, 1_420, 1_662, 1_645, 1_627]);
    }

    #[test]
    fn withdrawal_stays_at_zero_once_exhausted() {
        let mut profile = flat_profile(60, 61, 70);
        profile.withdrawal_rate_pct = Some(30.0);
        profile.post_retirement_growth_rate_pct = Some(5.0);

        let points = project(&profile, 2030).expect("valid profile");
        let first_zero = points
            .iter()
            .position(|p| p.corpus_value == 0)
            .expect("corpus is exhausted");
        assert!(points[first_zero..].iter().all(|p| p.corpus_value == 0));
    }

    #[test]
    fn defaults_apply_when_rates_are_missing() {
        let mut profile = sample_profile();
        profile.current_age = Some(59);
        profile.retirement_age = Some(60);
        profile.life_expectancy = None;

        let points = project(&profile, 2024).expect("valid profile");
        assert_eq!(points.len(), (DEFAULT_LIFE_EXPECTANCY - 59 + 1) as usize);
        // 200000 * 1.06 + 10000
        assert_eq!(points[1].corpus_value, 222_000);
        // (222000 - 13320) * 1.04
        assert_eq!(points[2].corpus_value, 217_027);
    }

    #[test]
    fn pension_balance_and_employer_contribution_feed_the_projection() {
        let profile = FinancialProfile {
            current_age: Some(40),
            retirement_age: Some(41),
            life_expectancy: Some(41),
            pension_balance: Some(1_000.0),
            employer_contribution: Some(10.0),
            growth_rate_pct: Some(0.0),
            ..FinancialProfile::default()
        };
        let points = project(&profile, 2020).expect("valid profile");
        assert_eq!(points[1].corpus_value, 1_120);
    }

    #[test]
    fn retirement_at_life_expectancy_has_no_withdrawal_points() {
        let points = project(&flat_profile(50, 55, 55), 2020).expect("valid profile");
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.phase == Phase::Accumulation));
        assert_eq!(retirement_marker(&points), Some(5));
    }

    #[test]
    fn marker_and_peak_point_at_retirement_year() {
        let points = project(&sample_profile(), 2025).expect("valid profile");
        let marker = retirement_marker(&points).expect("has accumulation");
        assert_eq!(points[marker].age, 60);
        assert_eq!(points[marker + 1].phase, Phase::Withdrawal);
        assert_eq!(peak_corpus(&points), Some(points[marker].corpus_value));
        assert_eq!(peak_corpus(&[]), None);
    }

    #[test]
    fn rejects_missing_and_misordered_inputs() {
        let mut profile = sample_profile();
        profile.current_age = None;
        assert_eq!(
            project(&profile, 2025).expect_err("missing age"),
            ProfileError::MissingField {
                field: "currentAge"
            }
        );

        let mut profile = sample_profile();
        profile.retirement_age = Some(20);
        assert_eq!(
            project(&profile, 2025).expect_err("misordered").field(),
            "retirementAge"
        );

        let mut profile = sample_profile();
        profile.life_expectancy = Some(59);
        assert_eq!(
            project(&profile, 2025).expect_err("misordered").field(),
            "lifeExpectancy"
        );

        let mut profile = sample_profile();
        profile.initial_savings = None;
        assert_eq!(
            project(&profile, 2025).expect_err("no savings").field(),
            "initialSavings"
        );

        let mut profile = sample_profile();
        profile.withdrawal_rate_pct = Some(-1.0);
        assert_eq!(
            project(&profile, 2025).expect_err("negative rate").field(),
            "withdrawalRatePct"
        );

        let mut profile = sample_profile();
        profile.growth_rate_pct = Some(f64::NAN);
        assert!(project(&profile, 2025).is_err());
    }

    #[test]
    fn rejects_ages_past_the_form_ceiling() {
        let err = project(&flat_profile(0, 0, u32::MAX), 2025).expect_err("huge life expectancy");
        assert_eq!(err.field(), "lifeExpectancy");

        let err = project(&flat_profile(60, 70, 101), 2025).expect_err("past ceiling");
        assert_eq!(err.field(), "lifeExpectancy");

        let err = project(&flat_profile(101, 101, 101), 2025).expect_err("past ceiling");
        assert_eq!(err.field(), "currentAge");

        let err = project(&flat_profile(60, 400, 400), 2025).expect_err("past ceiling");
        assert_eq!(err.field(), "retirementAge");

        let points = project(&flat_profile(98, 100, 100), 2025).expect("ceiling is inclusive");
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn rejects_base_year_that_overflows_the_calendar() {
        let err = project(&flat_profile(60, 60, 62), i32::MAX).expect_err("year overflow");
        assert_eq!(err.field(), "baseYear");

        let points = project(&flat_profile(60, 60, 62), i32::MAX - 2).expect("last year fits");
        assert_eq!(points[2].year, i32::MAX);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_projection_shape_and_bounds(
            current_age in 18u32..60,
            accumulation_years in 0u32..25,
            withdrawal_years in 0u32..16,
            savings in 0u32..50_000_000,
            contribution in 0u32..2_000_000,
            growth_bp in 0u32..1500,
            withdrawal_bp in 0u32..3000,
            post_growth_bp in 0u32..1200,
            base_year in 1990i32..2100,
        ) {
            let retirement_age = current_age + accumulation_years;
            let life_expectancy = retirement_age + withdrawal_years;
            let profile = FinancialProfile {
                current_age: Some(current_age),
                retirement_age: Some(retirement_age),
                life_expectancy: Some(life_expectancy),
                initial_savings: Some(savings as f64),
                annual_contribution: Some(contribution as f64),
                growth_rate_pct: Some(growth_bp as f64 / 100.0),
                withdrawal_rate_pct: Some(withdrawal_bp as f64 / 100.0),
                post_retirement_growth_rate_pct: Some(post_growth_bp as f64 / 100.0),
                ..FinancialProfile::default()
            };

            let points = project(&profile, base_year).expect("valid profile");
            prop_assert_eq!(points.len(), (life_expectancy - current_age + 1) as usize);
            prop_assert_eq!(points.clone(), project(&profile, base_year).expect("valid profile"));

            let split = (retirement_age - current_age) as usize;
            for (idx, point) in points.iter().enumerate() {
                prop_assert_eq!(point.age, current_age + idx as u32);
                prop_assert_eq!(point.year, base_year + idx as i32);
                let expected = if idx <= split { Phase::Accumulation } else { Phase::Withdrawal };
                prop_assert_eq!(point.phase, expected);
            }
            prop_assert_eq!(retirement_marker(&points), Some(split));

            if let Some(first_zero) = points[split..].iter().position(|p| p.corpus_value == 0) {
                prop_assert!(points[split + first_zero..].iter().all(|p| p.corpus_value == 0));
            }
        }
    }
}
