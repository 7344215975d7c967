use super::types::{CareerProfile, CareerTrack, DataPoint, ProjectionParameters};

const MONTHS_PER_YEAR: u32 = 12;

pub fn resolve_career_profile(track: CareerTrack, growth_percent: f64) -> CareerProfile {
    let (base_multiplier, growth_multiplier, jump_age, jump_multiplier, description) = match track
    {
        CareerTrack::Local => (
            1.0,
            1.0,
            None,
            1.0,
            "Traditional career in your home country",
        ),
        CareerTrack::Global => (
            1.0,
            1.0,
            Some(23),
            2.5,
            "Remote work for international companies",
        ),
        CareerTrack::Faang => (1.5, 1.0, Some(23), 4.0, "Top-tier technology companies"),
        CareerTrack::Startup => (
            0.8,
            1.5,
            Some(25),
            3.0,
            "Startups with equity and fast growth",
        ),
        CareerTrack::Consulting => (
            1.3,
            1.2,
            Some(28),
            2.0,
            "Consulting and professional services",
        ),
        CareerTrack::Finance => (
            1.2,
            1.0,
            Some(26),
            2.2,
            "Finance and investment banking",
        ),
        CareerTrack::Healthcare => (1.1, 0.9, Some(30), 1.8, "Medicine and healthcare"),
        CareerTrack::Education => (
            0.9,
            0.7,
            None,
            1.0,
            "Education and academic careers",
        ),
        CareerTrack::Unrecognized => (1.0, 1.0, None, 1.0, "Standard career"),
    };

    CareerProfile {
        track,
        base_multiplier,
        growth_multiplier,
        growth: growth_percent / 100.0 * growth_multiplier,
        jump_age,
        jump_multiplier,
        description,
    }
}

/// Month-by-month compounding projection. Contributions are made at the start of
/// each month and earn that month's return.
pub fn project_invested(params: &ProjectionParameters) -> Vec<DataPoint> {
    let profile = resolve_career_profile(params.career_track, params.salary_growth_percent);
    let monthly_return = params.market_return_percent / 100.0 / 12.0;

    let mut data = Vec::with_capacity(horizon_len(params));
    let mut savings = 0.0;
    let mut total_invested = 0.0;

    for age in params.current_age..=params.horizon_end_age {
        let years_from_start = (age - params.current_age) as f64;

        let mut monthly_salary = params.annual_salary / 12.0 * profile.base_multiplier;
        // Step function: applies every year past the threshold, never compounded.
        if profile.jump_age.is_some_and(|jump_age| age >= jump_age) {
            monthly_salary *= profile.jump_multiplier;
        }
        monthly_salary *= (1.0 + profile.growth).powf(years_from_start);

        let monthly_investment = monthly_salary * (params.investment_rate_percent / 100.0);
        total_invested += monthly_investment * MONTHS_PER_YEAR as f64;

        for _ in 0..MONTHS_PER_YEAR {
            savings = (savings + monthly_investment) * (1.0 + monthly_return);
        }

        let real_capital = deflate(savings, params.inflation_rate_percent, years_from_start);
        let capital = round_money(savings);
        let invested = round_money(total_invested);

        data.push(DataPoint {
            age,
            capital,
            salary: round_money(monthly_salary),
            real_capital: round_money(real_capital),
            invested,
            returns: capital - invested,
        });
    }

    data
}

/// "What if you didn't invest" series: contributions stack linearly without returns.
///
/// Unlike [`project_invested`], the career jump is applied once in the exact jump
/// year and the salary then carries forward with yearly growth. The reported salary
/// is the value after that year's growth step.
///
/// The running "monthly" salary starts from the full annual figure, not a twelfth of
/// it, so the baseline contributes twelve annual-rate slices per year.
pub fn project_baseline(params: &ProjectionParameters) -> Vec<DataPoint> {
    let profile = resolve_career_profile(params.career_track, params.salary_growth_percent);

    let mut data = Vec::with_capacity(horizon_len(params));
    let mut savings = 0.0;
    let mut monthly_salary = params.annual_salary * profile.base_multiplier;

    for age in params.current_age..=params.horizon_end_age {
        if profile.jump_age == Some(age) {
            monthly_salary *= profile.jump_multiplier;
        }

        for _ in 0..MONTHS_PER_YEAR {
            savings += monthly_salary * (params.investment_rate_percent / 100.0);
        }

        monthly_salary *= 1.0 + profile.growth;

        let years_from_start = (age - params.current_age) as f64;
        let real_capital = deflate(savings, params.inflation_rate_percent, years_from_start);
        let capital = round_money(savings);

        data.push(DataPoint {
            age,
            capital,
            salary: round_money(monthly_salary),
            real_capital: round_money(real_capital),
            invested: capital,
            returns: 0,
        });
    }

    data
}

fn horizon_len(params: &ProjectionParameters) -> usize {
    params
        .horizon_end_age
        .checked_sub(params.current_age)
        .map_or(0, |span| span as usize + 1)
}

fn deflate(nominal: f64, inflation_rate_percent: f64, years: f64) -> f64 {
    nominal / (1.0 + inflation_rate_percent / 100.0).powf(years)
}

pub(crate) fn round_money(value: f64) -> i64 {
    value.round() as i64
}
