use serde::Serialize;

use super::engine::{project_invested, resolve_career_profile};
use super::metrics::capital_at_age;
use super::types::ProjectionParameters;

#[derive(Debug, Clone, Copy)]
pub struct RateSolveConfig {
    pub target_capital: f64,
    pub target_age: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl RateSolveConfig {
    pub fn new(target_capital: f64, target_age: u32) -> Self {
        Self {
            target_capital,
            target_age,
            search_min: 0.0,
            search_max: 100.0,
            tolerance: 0.01,
            max_iterations: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_rate: f64,
    pub capital_at_target_age: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredRateResult {
    pub target_capital: f64,
    pub target_age: u32,
    pub solved_rate: Option<f64>,
    pub required_monthly_investment: Option<f64>,
    pub achieved_capital: Option<i64>,
    pub iterations: Vec<RateSolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

/// Smallest investment rate (percent of salary) whose roadmap reaches
/// `target_capital` by `target_age`, found by bisection.
pub fn solve_required_rate(
    params: &ProjectionParameters,
    config: RateSolveConfig,
) -> Result<RequiredRateResult, String> {
    validate_config(params, config)?;

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let low_capital = evaluate_candidate(params, config, config.search_min);
    let high_capital = evaluate_candidate(params, config, config.search_max);

    let mut solved_rate = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_capital as f64 >= config.target_capital {
        solved_rate = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Already meets target at lower rate bound.".to_string();
    } else if (high_capital as f64) < config.target_capital {
        feasible = false;
        message = "No feasible investment rate found within the search bounds.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let capital = evaluate_candidate(params, config, mid);
            iterations.push(RateSolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_rate: mid,
                capital_at_target_age: capital,
            });
            log::debug!("rate solver: iteration {it} rate={mid:.4} capital={capital}");

            if capital as f64 >= config.target_capital {
                hi = mid;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                solved_rate = Some(hi);
                break;
            }
        }
        if solved_rate.is_none() {
            solved_rate = Some(hi);
        }
        feasible = true;
        message = if converged {
            "Solved required investment rate.".to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate."
                .to_string()
        };
    }

    let achieved_capital = solved_rate.map(|rate| evaluate_candidate(params, config, rate));
    let required_monthly_investment =
        solved_rate.map(|rate| first_year_monthly_salary(params) * rate / 100.0);

    Ok(RequiredRateResult {
        target_capital: config.target_capital,
        target_age: config.target_age,
        solved_rate,
        required_monthly_investment,
        achieved_capital,
        iterations,
        converged,
        feasible,
        message,
    })
}

fn evaluate_candidate(params: &ProjectionParameters, config: RateSolveConfig, rate: f64) -> i64 {
    let candidate = ProjectionParameters {
        investment_rate_percent: rate,
        horizon_end_age: config.target_age,
        ..params.clone()
    };
    capital_at_age(&project_invested(&candidate), config.target_age)
}

fn first_year_monthly_salary(params: &ProjectionParameters) -> f64 {
    let profile = resolve_career_profile(params.career_track, params.salary_growth_percent);
    let mut monthly_salary = params.annual_salary / 12.0 * profile.base_multiplier;
    if profile
        .jump_age
        .is_some_and(|jump_age| params.current_age >= jump_age)
    {
        monthly_salary *= profile.jump_multiplier;
    }
    monthly_salary
}

fn validate_config(params: &ProjectionParameters, config: RateSolveConfig) -> Result<(), String> {
    if config.target_age < params.current_age {
        return Err("targetAge must be >= currentAge".to_string());
    }
    if config.target_age > params.horizon_end_age {
        return Err("targetAge must be <= horizonAge".to_string());
    }
    if !config.target_capital.is_finite() || config.target_capital <= 0.0 {
        return Err("targetCapital must be > 0".to_string());
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.search_min < 0.0 || config.search_max > 100.0 {
        return Err("search bounds must be between 0 and 100".to_string());
    }
    if config.search_max <= config.search_min {
        return Err("search_max must be greater than search_min".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 {
        return Err("max_iterations must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CareerTrack, TaxJurisdiction};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_params() -> ProjectionParameters {
        ProjectionParameters {
            current_age: 25,
            annual_salary: 75_000.0,
            salary_growth_percent: 8.0,
            investment_rate_percent: 20.0,
            market_return_percent: 8.0,
            inflation_rate_percent: 3.0,
            career_track: CareerTrack::Global,
            tax_jurisdiction: TaxJurisdiction::Usa,
            horizon_end_age: 35,
        }
    }

    #[test]
    fn solver_finds_rate_that_scales_linearly_with_target() {
        // Capital is linear in the rate: 20% reaches ~347,687 by 30, so 500k needs ~28.76%.
        let params = sample_params();
        let config = RateSolveConfig::new(500_000.0, 30);

        let result = solve_required_rate(&params, config).expect("must solve");
        assert!(result.feasible);
        assert!(result.converged);
        let rate = result.solved_rate.expect("rate expected");
        assert_close(rate, 20.0 * 500_000.0 / 347_687.149, 0.05);
        assert!(result.achieved_capital.expect("capital expected") >= 500_000);
        // Past the global jump at 23: 6250 * 2.5 per month.
        assert_close(
            result.required_monthly_investment.expect("investment expected"),
            15_625.0 * rate / 100.0,
            1e-6,
        );
        assert!(!result.iterations.is_empty());
    }

    #[test]
    fn solver_reports_infeasible_when_bounds_too_low() {
        let params = sample_params();
        let mut config = RateSolveConfig::new(500_000.0, 30);
        config.search_max = 10.0;

        let result = solve_required_rate(&params, config).expect("must return result");
        assert!(!result.feasible);
        assert!(result.solved_rate.is_none());
        assert!(result.required_monthly_investment.is_none());
    }

    #[test]
    fn solver_short_circuits_when_lower_bound_already_meets_target() {
        let params = sample_params();
        let mut config = RateSolveConfig::new(100_000.0, 30);
        config.search_min = 50.0;

        let result = solve_required_rate(&params, config).expect("must return result");
        assert!(result.feasible);
        assert_eq!(result.solved_rate, Some(50.0));
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn solver_rejects_target_age_outside_horizon() {
        let params = sample_params();
        let err = solve_required_rate(&params, RateSolveConfig::new(1.0, 40))
            .expect_err("must reject");
        assert!(err.contains("targetAge"));

        let err = solve_required_rate(&params, RateSolveConfig::new(1.0, 20))
            .expect_err("must reject");
        assert!(err.contains("targetAge"));

        let err = solve_required_rate(&params, RateSolveConfig::new(0.0, 30))
            .expect_err("must reject");
        assert!(err.contains("targetCapital"));
    }
}
