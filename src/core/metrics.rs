//! Summary figures derived from an already computed roadmap. Nothing in here
//! re-runs the simulation.

use super::engine::round_money;
use super::types::{
    CareerTrack, DataPoint, MilestoneProgress, Motivation, MotivationStage, PeerComparison,
    ProjectionParameters, ProjectionSummary, SummaryOptions,
};

pub const AVERAGE_PEER_SAVINGS: i64 = 65_000;
const PEER_PERCENTILE_SCALE: f64 = 200_000.0;
const MOTIVATION_REFERENCE_AGE: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct Milestone {
    pub age: u32,
    pub name: &'static str,
    pub target: i64,
}

pub const MILESTONES: [Milestone; 4] = [
    Milestone {
        age: 25,
        name: "First home",
        target: 150_000,
    },
    Milestone {
        age: 27,
        name: "Family car",
        target: 80_000,
    },
    Milestone {
        age: 30,
        name: "Financial freedom",
        target: 500_000,
    },
    Milestone {
        age: 35,
        name: "Early retirement",
        target: 2_000_000,
    },
];

pub fn capital_at_age(series: &[DataPoint], age: u32) -> i64 {
    series
        .iter()
        .find(|point| point.age == age)
        .map_or(0, |point| point.capital)
}

pub fn monthly_passive_income(capital: i64, market_return_percent: f64) -> f64 {
    capital as f64 * market_return_percent / 100.0 / 12.0
}

/// Rough number of years until `target` is reached with a constant yearly
/// contribution of `annual_salary * investment_rate_percent / 100`.
///
/// This is a closed-form estimate, not a simulation: it ignores salary growth,
/// career jumps and monthly compounding, so it will not agree with the roadmap.
/// Returns `None` when there is no contribution or the return is not positive.
pub fn years_to_target(
    target: f64,
    annual_salary: f64,
    investment_rate_percent: f64,
    market_return_percent: f64,
) -> Option<u32> {
    let annual_contribution = annual_salary * investment_rate_percent / 100.0;
    if annual_contribution <= 0.0 || market_return_percent <= 0.0 || target <= 0.0 {
        return None;
    }

    let years = ((target / annual_contribution).ln() / (1.0 + market_return_percent / 100.0).ln())
        .ceil()
        .max(0.0);
    years.is_finite().then_some(years as u32)
}

pub fn milestone_progress(series: &[DataPoint]) -> Vec<MilestoneProgress> {
    MILESTONES
        .iter()
        .map(|milestone| {
            let capital = capital_at_age(series, milestone.age);
            MilestoneProgress {
                age: milestone.age,
                name: milestone.name,
                target: milestone.target,
                capital,
                reached: capital >= milestone.target,
                progress_percent: (capital as f64 / milestone.target as f64 * 100.0).min(100.0),
            }
        })
        .collect()
}

fn milestone_reached(series: &[DataPoint], age: u32) -> bool {
    MILESTONES
        .iter()
        .find(|milestone| milestone.age == age)
        .is_some_and(|milestone| capital_at_age(series, age) >= milestone.target)
}

pub fn motivation_for(series: &[DataPoint]) -> Motivation {
    let capital = capital_at_age(series, MOTIVATION_REFERENCE_AGE);

    let stage = if capital < 25_000 {
        MotivationStage::StartBudget
    } else if capital < 75_000 {
        MotivationStage::EmergencyFund
    } else if capital < 150_000 {
        MotivationStage::OptimizeRate
    } else if !milestone_reached(series, 25) {
        MotivationStage::HomeSavings
    } else if !milestone_reached(series, 27) {
        MotivationStage::VehiclePlan
    } else if !milestone_reached(series, 30) {
        MotivationStage::FinancialFreedom
    } else {
        MotivationStage::MaintainWealth
    };

    let (message, action) = match stage {
        MotivationStage::StartBudget => (
            "Every journey starts with a single step. Begin by tracking your expenses and creating a budget.",
            "Start with a budget tracker",
        ),
        MotivationStage::EmergencyFund => (
            "Great progress! Focus on building an emergency fund (3-6 months of expenses) before aggressive investing.",
            "Build emergency savings",
        ),
        MotivationStage::OptimizeRate => (
            "You're building momentum! Consider increasing your investment rate or exploring higher-growth career opportunities.",
            "Optimize investment rate",
        ),
        MotivationStage::HomeSavings => (
            "Major milestone approaching! Your homeownership goal is within reach with consistent saving.",
            "Focus on home savings",
        ),
        MotivationStage::VehiclePlan => (
            "Transportation freedom is next! Keep the momentum going for your vehicle goals.",
            "Plan vehicle purchase",
        ),
        MotivationStage::FinancialFreedom => (
            "Financial independence is closer than you think! Focus on scaling your income and investments.",
            "Pursue financial freedom",
        ),
        MotivationStage::MaintainWealth => (
            "Congratulations! You've achieved significant financial milestones. Now focus on maintaining and growing your wealth.",
            "Maintain & grow wealth",
        ),
    };

    Motivation {
        stage,
        message,
        action,
    }
}

pub fn peer_comparison(projected_capital: i64) -> PeerComparison {
    PeerComparison {
        projected_capital,
        average_peer_savings: AVERAGE_PEER_SAVINGS,
        percentile: (projected_capital as f64 / PEER_PERCENTILE_SCALE * 100.0).clamp(5.0, 95.0),
    }
}

pub fn share_message(
    target_age: u32,
    capital: i64,
    track: CareerTrack,
    investment_rate_percent: f64,
    percentile: f64,
) -> String {
    format!(
        "I just calculated my wealth projection!\n\n\
         Projected wealth at age {target_age}: ${}\n\
         Career track: {}\n\
         Investment rate: {investment_rate_percent}%\n\n\
         I'm in the top {percentile:.0}% of wealth builders in my peer group!",
        group_thousands(capital),
        track.label(),
    )
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn summarize(
    params: &ProjectionParameters,
    roadmap: &[DataPoint],
    options: SummaryOptions,
) -> ProjectionSummary {
    let capital_at_target_age = capital_at_age(roadmap, options.target_age);
    let peer_comparison = peer_comparison(capital_at_target_age);
    let share_message = share_message(
        options.target_age,
        capital_at_target_age,
        params.career_track,
        params.investment_rate_percent,
        peer_comparison.percentile,
    );
    let last = roadmap.last();

    ProjectionSummary {
        target_age: options.target_age,
        capital_at_target_age,
        monthly_passive_income: round_money(monthly_passive_income(
            capital_at_target_age,
            params.market_return_percent,
        )),
        target_amount: options.target_amount,
        years_to_target: years_to_target(
            options.target_amount,
            params.annual_salary,
            params.investment_rate_percent,
            params.market_return_percent,
        ),
        final_capital: last.map_or(0, |point| point.capital),
        final_real_capital: last.map_or(0, |point| point.real_capital),
        milestones: milestone_progress(roadmap),
        motivation: motivation_for(roadmap),
        peer_comparison,
        share_message,
    }
}
