//! Capacity & compliance subsystem.
//!
//! Derives freed lead hours, total demand, capacity, the frontline:peer
//! ratio, and safety/compliance status from the load model.
//!
//! RULE: the ratio is 0 (never NaN) when there are no peers, and a
//! zero-peer scenario is always safe.

use crate::{
    config::{GlobalAssumptions, Scenario, SupervisionRules},
    load_subsystem::{baseline_load, supervisor_load, total_demand},
    metrics::{ComplianceStatus, SafetyStatus},
    types::Hours,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceReport {
    pub baseline_load: Hours,
    pub scenario_load: Hours,
    pub freed_hours: Hours,
    pub required_hours: Hours,
    pub actual_hours: Hours,
    pub effective_ratio: f64,
    pub safety: SafetyStatus,
    pub status: ComplianceStatus,
}

/// `is_baseline` marks the status-quo scenario, whose status is
/// reported as High Risk / At Capacity instead of Non-Compliant / OK.
pub fn evaluate_compliance(
    scenario: &Scenario,
    rules: &SupervisionRules,
    global: &GlobalAssumptions,
    is_baseline: bool,
) -> ComplianceReport {
    let baseline_load = baseline_load(scenario, rules);
    let scenario_load = supervisor_load(scenario, rules);
    let freed_hours = (baseline_load - scenario_load).max(0.0);

    let required_hours = total_demand(scenario, rules);

    // One monthly FTE block per lead FTE and per peer.
    let capacity_hours = global.fte_hours_per_month;
    let actual_hours = (scenario.lead_fte + scenario.peer_count as f64) * capacity_hours;

    let effective_ratio = effective_ratio(scenario);
    let safety = if scenario.peer_count > 0 && effective_ratio > rules.max_ratio {
        SafetyStatus::Overloaded
    } else {
        SafetyStatus::Ok
    };

    let status = match (safety, is_baseline) {
        (SafetyStatus::Overloaded, false) => ComplianceStatus::NonCompliant,
        (SafetyStatus::Ok, false) => ComplianceStatus::Ok,
        (SafetyStatus::Overloaded, true) => ComplianceStatus::HighRisk,
        (SafetyStatus::Ok, true) => ComplianceStatus::AtCapacity,
    };

    ComplianceReport {
        baseline_load,
        scenario_load,
        freed_hours,
        required_hours,
        actual_hours,
        effective_ratio,
        safety,
        status,
    }
}

/// Frontline staff per peer-supervisor, 0 with no peers.
pub fn effective_ratio(scenario: &Scenario) -> f64 {
    if scenario.peer_count > 0 {
        scenario.frontline_count as f64 / scenario.peer_count as f64
    } else {
        0.0
    }
}
