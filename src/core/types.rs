use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerTrack {
    Local,
    Global,
    Faang,
    Startup,
    Consulting,
    Finance,
    Healthcare,
    Education,
    /// Any track name outside the table. Resolves to the neutral profile.
    #[serde(other)]
    Unrecognized,
}

impl CareerTrack {
    pub const ALL: [CareerTrack; 8] = [
        CareerTrack::Local,
        CareerTrack::Global,
        CareerTrack::Faang,
        CareerTrack::Startup,
        CareerTrack::Consulting,
        CareerTrack::Finance,
        CareerTrack::Healthcare,
        CareerTrack::Education,
    ];

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "local" => CareerTrack::Local,
            "global" => CareerTrack::Global,
            "faang" => CareerTrack::Faang,
            "startup" => CareerTrack::Startup,
            "consulting" => CareerTrack::Consulting,
            "finance" => CareerTrack::Finance,
            "healthcare" => CareerTrack::Healthcare,
            "education" => CareerTrack::Education,
            _ => CareerTrack::Unrecognized,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CareerTrack::Local => "local",
            CareerTrack::Global => "global",
            CareerTrack::Faang => "faang",
            CareerTrack::Startup => "startup",
            CareerTrack::Consulting => "consulting",
            CareerTrack::Finance => "finance",
            CareerTrack::Healthcare => "healthcare",
            CareerTrack::Education => "education",
            CareerTrack::Unrecognized => "standard",
        }
    }

    /// Display label with the first letter capitalised, e.g. `Faang`.
    pub fn label(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxJurisdiction {
    Usa,
    Uk,
    Germany,
    Canada,
    Australia,
    Singapore,
    Uae,
    Switzerland,
}

/// Salary model for one career track, with the user's growth rate already folded in.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerProfile {
    pub track: CareerTrack,
    pub base_multiplier: f64,
    pub growth_multiplier: f64,
    /// Absolute annual salary growth as a fraction (0.08 == 8%).
    pub growth: f64,
    pub jump_age: Option<u32>,
    pub jump_multiplier: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParameters {
    pub current_age: u32,
    pub annual_salary: f64,
    pub salary_growth_percent: f64,
    pub investment_rate_percent: f64,
    pub market_return_percent: f64,
    pub inflation_rate_percent: f64,
    pub career_track: CareerTrack,
    pub tax_jurisdiction: TaxJurisdiction,
    pub horizon_end_age: u32,
}

const MIN_CURRENT_AGE: u32 = 18;
const MAX_CURRENT_AGE: u32 = 65;
const MAX_HORIZON_AGE: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParameterField {
    CurrentAge,
    AnnualSalary,
    SalaryGrowth,
    InvestmentRate,
    MarketReturn,
    InflationRate,
    HorizonEndAge,
}

impl ParameterField {
    /// Key in the serialized form of [`ProjectionParameters`].
    pub fn key(self) -> &'static str {
        match self {
            ParameterField::CurrentAge => "currentAge",
            ParameterField::AnnualSalary => "annualSalary",
            ParameterField::SalaryGrowth => "salaryGrowthPercent",
            ParameterField::InvestmentRate => "investmentRatePercent",
            ParameterField::MarketReturn => "marketReturnPercent",
            ParameterField::InflationRate => "inflationRatePercent",
            ParameterField::HorizonEndAge => "horizonEndAge",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            ParameterField::CurrentAge => "--current-age",
            ParameterField::AnnualSalary => "--annual-salary",
            ParameterField::SalaryGrowth => "--salary-growth",
            ParameterField::InvestmentRate => "--investment-rate",
            ParameterField::MarketReturn => "--market-return",
            ParameterField::InflationRate => "--inflation-rate",
            ParameterField::HorizonEndAge => "--horizon-age",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParameterViolation {
    pub field: ParameterField,
    pub rule: &'static str,
}

impl ParameterViolation {
    /// Renders the violation with the field named by `name` (a key or a CLI flag).
    pub fn describe(&self, name: fn(ParameterField) -> &'static str) -> String {
        format!("{} {}", name(self.field), self.rule)
    }
}

impl ProjectionParameters {
    /// Range checks for user-supplied parameters. Reports the first violation.
    pub fn validate(&self) -> Result<(), ParameterViolation> {
        if !(MIN_CURRENT_AGE..=MAX_CURRENT_AGE).contains(&self.current_age) {
            return violation(ParameterField::CurrentAge, "must be between 18 and 65");
        }
        if !self.annual_salary.is_finite() || self.annual_salary <= 0.0 {
            return violation(ParameterField::AnnualSalary, "must be > 0");
        }
        if !self.salary_growth_percent.is_finite() || self.salary_growth_percent < 0.0 {
            return violation(ParameterField::SalaryGrowth, "must be >= 0");
        }
        if !(0.0..=100.0).contains(&self.investment_rate_percent) {
            return violation(ParameterField::InvestmentRate, "must be between 0 and 100");
        }
        if !self.market_return_percent.is_finite() || self.market_return_percent <= -100.0 {
            return violation(ParameterField::MarketReturn, "must be > -100");
        }
        if !self.inflation_rate_percent.is_finite() || self.inflation_rate_percent <= -100.0 {
            return violation(ParameterField::InflationRate, "must be > -100");
        }
        if self.horizon_end_age < self.current_age {
            return violation(ParameterField::HorizonEndAge, "must be >= the current age");
        }
        if self.horizon_end_age > MAX_HORIZON_AGE {
            return violation(ParameterField::HorizonEndAge, "must be <= 120");
        }
        Ok(())
    }
}

fn violation(field: ParameterField, rule: &'static str) -> Result<(), ParameterViolation> {
    Err(ParameterViolation { field, rule })
}

/// One simulated year. All money fields are rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub age: u32,
    pub capital: i64,
    /// Monthly salary for the year.
    pub salary: i64,
    pub real_capital: i64,
    pub invested: i64,
    pub returns: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    pub target_age: u32,
    pub target_amount: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            target_age: 30,
            target_amount: 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    pub age: u32,
    pub name: &'static str,
    pub target: i64,
    pub capital: i64,
    pub reached: bool,
    pub progress_percent: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotivationStage {
    StartBudget,
    EmergencyFund,
    OptimizeRate,
    HomeSavings,
    VehiclePlan,
    FinancialFreedom,
    MaintainWealth,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Motivation {
    pub stage: MotivationStage,
    pub message: &'static str,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerComparison {
    pub projected_capital: i64,
    pub average_peer_savings: i64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub target_age: u32,
    pub capital_at_target_age: i64,
    pub monthly_passive_income: i64,
    pub target_amount: f64,
    pub years_to_target: Option<u32>,
    pub final_capital: i64,
    pub final_real_capital: i64,
    pub milestones: Vec<MilestoneProgress>,
    pub motivation: Motivation,
    pub peer_comparison: PeerComparison,
    pub share_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn validate_accepts_form_defaults_and_reports_first_violation() {
        assert_eq!(sample_params().validate(), Ok(()));

        let mut params = sample_params();
        params.current_age = 500;
        params.horizon_end_age = 100_000;
        let err = params.validate().expect_err("age out of range");
        assert_eq!(err.field, ParameterField::CurrentAge);
        assert_eq!(err.describe(ParameterField::key), "currentAge must be between 18 and 65");
        assert_eq!(
            err.describe(ParameterField::flag),
            "--current-age must be between 18 and 65"
        );

        let mut params = sample_params();
        params.horizon_end_age = 100_000;
        let err = params.validate().expect_err("horizon out of range");
        assert_eq!(err.field, ParameterField::HorizonEndAge);

        let mut params = sample_params();
        params.investment_rate_percent = f64::NAN;
        let err = params.validate().expect_err("rate must be a number");
        assert_eq!(err.field, ParameterField::InvestmentRate);
    }

    #[test]
    fn unknown_track_names_serialize_as_unrecognized() {
        let track: CareerTrack = serde_json::from_str("\"astronaut\"").expect("fail-soft");
        assert_eq!(track, CareerTrack::Unrecognized);
        assert_eq!(
            serde_json::to_string(&track).expect("serialize"),
            "\"unrecognized\""
        );
        // A normalized name reads back to the same variant.
        let again: CareerTrack = serde_json::from_str("\"unrecognized\"").expect("fail-soft");
        assert_eq!(again, CareerTrack::Unrecognized);
    }
}
