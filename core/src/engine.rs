//! The scenario engine — aggregates every subsystem into one
//! `ComputedMetrics` record per scenario.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Compliance subsystem   (freed hours, ratio, safety)
//!   2. Payroll subsystem      (scenario vs. precomputed baseline)
//!   3. Revenue subsystem      (lead, peer, grant offset)
//!   4. Onboarding subsystem   (net new hires vs. baseline)
//!
//! RULES:
//!   - Subsystems are pure. The engine owns every cross-cutting policy:
//!     sensitivity toggles, the hard/soft split, risk flags.
//!   - Revenue and hard labor savings are never both non-zero. Freed
//!     hours are either billed or counted as cost avoidance, not both.
//!   - The engine keeps no state between calls.

use crate::{
    compliance_subsystem::{evaluate_compliance, ComplianceReport},
    config::{ModelConfig, Scenario, ScenarioSet, SensitivityToggles},
    error::ModelResult,
    metrics::{ComputedMetrics, RiskFactor, SafetyStatus},
    onboarding_subsystem::{calculate_onboarding, transition_cost, OnboardingCost},
    payroll_subsystem::calculate_payroll,
    rates::RateCard,
    revenue_subsystem::{realize_revenue, RevenueBreakdown},
    types::{Dollars, ScenarioId},
};
use std::collections::BTreeMap;

/// Share of departures avoided once a peer tier exists.
pub const RETENTION_REDUCTION_RATE: f64 = 0.10;
pub const MONTHS_PER_YEAR: f64 = 12.0;

pub struct ScenarioEngine<'a> {
    config: &'a ModelConfig,
    toggles: SensitivityToggles,
}

impl<'a> ScenarioEngine<'a> {
    pub fn new(config: &'a ModelConfig, toggles: SensitivityToggles) -> Self {
        Self { config, toggles }
    }

    /// Evaluate every scenario in the config's own scenario set.
    pub fn evaluate_all(&self) -> ModelResult<BTreeMap<ScenarioId, ComputedMetrics>> {
        self.evaluate_set(&self.config.scenario_set)
    }

    /// Evaluate every scenario in `set` against its designated baseline.
    pub fn evaluate_set(
        &self,
        set: &ScenarioSet,
    ) -> ModelResult<BTreeMap<ScenarioId, ComputedMetrics>> {
        let baseline = set.baseline_scenario()?;
        let baseline_payroll_loaded = calculate_payroll(baseline, &self.config.global).loaded;

        let mut result = BTreeMap::new();
        for (id, scenario) in &set.scenarios {
            let metrics = self.evaluate_against(scenario, baseline, baseline_payroll_loaded);
            log::info!(
                "{}: Hard=${:.0}/mo Soft=${:.0}/mo YearOne=${:.0} Freed={:.1}h Ratio={:.1} {:?}",
                id,
                metrics.net_monthly_hard,
                metrics.net_monthly_soft,
                metrics.net_year_one,
                metrics.freed_lead_hours,
                metrics.effective_ratio,
                metrics.compliance_status
            );
            result.insert(id.clone(), metrics);
        }
        Ok(result)
    }

    /// Evaluate one scenario, computing the baseline payroll on the spot.
    pub fn evaluate(&self, scenario: &Scenario, baseline: &Scenario) -> ComputedMetrics {
        let baseline_payroll_loaded = calculate_payroll(baseline, &self.config.global).loaded;
        self.evaluate_against(scenario, baseline, baseline_payroll_loaded)
    }

    pub fn evaluate_against(
        &self,
        scenario: &Scenario,
        baseline: &Scenario,
        baseline_payroll_loaded: Dollars,
    ) -> ComputedMetrics {
        let global = &self.config.global;
        let rules = &self.config.rules;
        let hr = &self.config.hr;
        let toggles = self.toggles;
        let is_baseline = scenario.id == baseline.id;

        // ── 1. Compliance ──────────────────────────────────────
        let compliance = evaluate_compliance(scenario, rules, global, is_baseline);
        let freed = compliance.freed_hours;
        if compliance.safety == SafetyStatus::Overloaded {
            log::warn!(
                "{}: ratio {:.1} exceeds max {:.1}",
                scenario.id,
                compliance.effective_ratio,
                rules.max_ratio
            );
        }

        // ── 2. Payroll ─────────────────────────────────────────
        let payroll = calculate_payroll(scenario, global);
        let payroll_delta_loaded = payroll.loaded - baseline_payroll_loaded;

        // ── 3. Revenue & grant offset ──────────────────────────
        let raw_revenue = realize_revenue(scenario, global, freed);
        let mut revenue = raw_revenue;
        if !toggles.include_revenue {
            revenue.lead_revenue = 0.0;
            revenue.peer_revenue = 0.0;
        }
        let realized_revenue = revenue.realized_revenue();
        let grant_savings = revenue.grant.savings;

        // ── Labor efficiency (arbitrage) ───────────────────────
        let rates = RateCard::for_scenario(scenario, global);
        let arbitrage_per_hour = (rates.loaded_lead() - rates.loaded_peer()).max(0.0);
        let labor_efficiency_savings = freed * arbitrage_per_hour;

        let (hard_labor_savings, soft_efficiency_value) =
            split_efficiency(realized_revenue, labor_efficiency_savings);
        debug_assert!(
            realized_revenue <= 0.0 || hard_labor_savings == 0.0,
            "revenue and hard labor savings both counted for {}",
            scenario.id
        );

        let hard_monthly_cash_flow = realized_revenue + grant_savings - payroll_delta_loaded;
        let net_monthly_hard = hard_monthly_cash_flow + hard_labor_savings;

        // ── Retention (soft) ───────────────────────────────────
        let retention_savings = if is_baseline || !toggles.include_retention {
            0.0
        } else {
            let staff = (scenario.frontline_count + scenario.peer_count) as f64;
            staff * RETENTION_REDUCTION_RATE * hr.turnover_cost_per_departure / MONTHS_PER_YEAR
        };

        let net_monthly_soft = retention_savings + soft_efficiency_value;
        let net_monthly_total = net_monthly_hard + net_monthly_soft;

        // ── Opportunity cost overlay ───────────────────────────
        let opportunity_cost_monthly = if toggles.include_opportunity_cost {
            let lead_capacity = scenario.lead_fte * global.fte_hours_per_month;
            let still_supervising = (lead_capacity - freed).max(0.0);
            still_supervising * rates.lead_utilization * rates.lead_billable_rate
        } else {
            0.0
        };
        let net_monthly_hard_with_opportunity = net_monthly_hard - opportunity_cost_monthly;

        // ── 4. One-time costs & horizon ────────────────────────
        let onboarding = calculate_onboarding(scenario, baseline, hr);
        let transition_cost = if toggles.include_transition_cost {
            transition_cost(scenario, global)
        } else {
            0.0
        };
        let one_time_cost = onboarding.cost + transition_cost;

        let net_annual_steady_state = net_monthly_hard * MONTHS_PER_YEAR;
        let net_year_one = net_annual_steady_state - one_time_cost;
        let break_even_months = if net_monthly_hard > 0.0 {
            one_time_cost / net_monthly_hard
        } else {
            0.0
        };

        let risk_factors = self.risk_factors(scenario, &compliance, &raw_revenue, &onboarding);

        log::debug!(
            "{}: payroll Δ=${:.2} revenue=${:.2} grant=${:.2} arbitrage=${:.2} (hard ${:.2})",
            scenario.id,
            payroll_delta_loaded,
            realized_revenue,
            grant_savings,
            labor_efficiency_savings,
            hard_labor_savings
        );

        ComputedMetrics {
            scenario_id: scenario.id.clone(),
            total_fte: scenario.total_fte(),
            payroll_base: payroll.base,
            payroll_loaded: payroll.loaded,
            payroll_delta_loaded,
            baseline_load_hours: compliance.baseline_load,
            scenario_load_hours: compliance.scenario_load,
            freed_lead_hours: freed,
            lead_revenue: revenue.lead_revenue,
            peer_revenue: revenue.peer_revenue,
            realized_revenue,
            grant_savings,
            grant_fte_used: revenue.grant.fte_used,
            labor_efficiency_savings,
            hard_labor_savings,
            soft_efficiency_value,
            retention_savings,
            hard_monthly_cash_flow,
            net_monthly_hard,
            net_monthly_soft,
            net_monthly_total,
            opportunity_cost_monthly,
            net_monthly_hard_with_opportunity,
            net_annual_steady_state,
            onboarding_cost: onboarding.cost,
            transition_cost,
            one_time_cost,
            net_year_one,
            break_even_months,
            required_hours: compliance.required_hours,
            actual_supervision_hours: compliance.actual_hours,
            effective_ratio: compliance.effective_ratio,
            compliance_status: compliance.status,
            safety_status: compliance.safety,
            risk_factors,
        }
    }

    fn risk_factors(
        &self,
        scenario: &Scenario,
        compliance: &ComplianceReport,
        revenue: &RevenueBreakdown,
        onboarding: &OnboardingCost,
    ) -> Vec<RiskFactor> {
        let hr = &self.config.hr;
        let mut factors = Vec::new();

        let above_turnover_threshold =
            scenario.peer_count > 0 && compliance.effective_ratio > hr.turnover_risk_threshold;
        if compliance.safety == SafetyStatus::Overloaded || above_turnover_threshold {
            factors.push(RiskFactor::HighTurnoverRisk);
        }

        if compliance.required_hours > compliance.actual_hours {
            factors.push(RiskFactor::CapacityShortfall);
        }

        if scenario.is_internal_promotion
            && revenue.peer_revenue > 0.0
            && hr.credentialing_months > 0.0
        {
            factors.push(RiskFactor::CredentialingLag);
        }

        let external_peers = if scenario.is_internal_promotion {
            0
        } else {
            onboarding.net_new_peers
        };
        if (onboarding.net_new_frontline > 0 && hr.recruit_ramp_months_frontline > 0.0)
            || (external_peers > 0 && hr.recruit_ramp_months_peer > 0.0)
        {
            factors.push(RiskFactor::RecruitingRamp);
        }

        factors
    }
}

/// Anti-double-counting split of the arbitrage figure into (hard, soft).
///
/// With revenue realized the freed hours are already monetized, so the
/// arbitrage is soft value only. Without revenue it is cost avoidance.
pub fn split_efficiency(realized_revenue: Dollars, arbitrage: Dollars) -> (Dollars, Dollars) {
    if realized_revenue > 0.0 {
        (0.0, arbitrage)
    } else {
        (arbitrage, 0.0)
    }
}
