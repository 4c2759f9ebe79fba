//! The engine's output record and its status vocabularies.

use crate::types::{Dollars, Hours, ScenarioId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStatus {
    #[serde(rename = "OK")]
    Ok,
    Overloaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
    /// Baseline relabel of Non-Compliant.
    #[serde(rename = "High Risk")]
    HighRisk,
    /// Baseline relabel of OK.
    #[serde(rename = "At Capacity")]
    AtCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "High Turnover Risk")]
    HighTurnoverRisk,
    /// Required supervision hours exceed (lead FTE + peers) x monthly FTE hours.
    /// Capacity counts every peer's full month as supervision time, so this
    /// only fires for very large teams or heavy per-staff hour settings.
    #[serde(rename = "Capacity Shortfall")]
    CapacityShortfall,
    #[serde(rename = "Credentialing Lag")]
    CredentialingLag,
    #[serde(rename = "Recruiting Ramp")]
    RecruitingRamp,
}

impl RiskFactor {
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::HighTurnoverRisk => "High Turnover Risk",
            RiskFactor::CapacityShortfall => "Capacity Shortfall",
            RiskFactor::CredentialingLag => "Credentialing Lag",
            RiskFactor::RecruitingRamp => "Recruiting Ramp",
        }
    }
}

/// Everything derived for one scenario. All money is monthly unless
/// the field says annual or one-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    pub scenario_id: ScenarioId,
    pub total_fte: f64,

    // Payroll
    pub payroll_base: Dollars,
    pub payroll_loaded: Dollars,
    pub payroll_delta_loaded: Dollars,

    // Capacity
    pub baseline_load_hours: Hours,
    pub scenario_load_hours: Hours,
    pub freed_lead_hours: Hours,

    // Revenue & offsets
    pub lead_revenue: Dollars,
    pub peer_revenue: Dollars,
    pub realized_revenue: Dollars,
    pub grant_savings: Dollars,
    pub grant_fte_used: u32,

    // Efficiency & retention
    pub labor_efficiency_savings: Dollars,
    /// Arbitrage counted as cash. Zero whenever revenue is realized.
    pub hard_labor_savings: Dollars,
    /// Arbitrage carried as non-cash value when revenue already monetizes the hours.
    pub soft_efficiency_value: Dollars,
    pub retention_savings: Dollars,

    // Monthly nets
    pub hard_monthly_cash_flow: Dollars,
    pub net_monthly_hard: Dollars,
    pub net_monthly_soft: Dollars,
    pub net_monthly_total: Dollars,
    pub opportunity_cost_monthly: Dollars,
    pub net_monthly_hard_with_opportunity: Dollars,

    // Horizon
    pub net_annual_steady_state: Dollars,
    pub onboarding_cost: Dollars,
    pub transition_cost: Dollars,
    pub one_time_cost: Dollars,
    pub net_year_one: Dollars,
    pub break_even_months: f64,

    // Compliance & risk
    pub required_hours: Hours,
    pub actual_supervision_hours: Hours,
    pub effective_ratio: f64,
    pub compliance_status: ComplianceStatus,
    pub safety_status: SafetyStatus,
    pub risk_factors: Vec<RiskFactor>,
}
