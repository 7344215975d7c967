mod engine;
mod metrics;
mod solver;
mod types;

pub use engine::{project_baseline, project_invested, resolve_career_profile};
pub use metrics::{
    AVERAGE_PEER_SAVINGS, MILESTONES, Milestone, capital_at_age, milestone_progress,
    monthly_passive_income, motivation_for, peer_comparison, share_message, summarize,
    years_to_target,
};
pub use solver::{RateSolveConfig, RateSolveIteration, RequiredRateResult, solve_required_rate};
pub use types::{
    CareerProfile, CareerTrack, DataPoint, MilestoneProgress, Motivation, MotivationStage,
    ParameterField, ParameterViolation, PeerComparison, ProjectionParameters, ProjectionSummary,
    SummaryOptions, TaxJurisdiction,
};
