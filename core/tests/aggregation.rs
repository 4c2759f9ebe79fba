//! Metrics aggregator tests — hard/soft split, toggles, horizon, risk.

use staffing_core::{
    config::{
        GlobalAssumptions, ModelConfig, Scenario, ScenarioSet, SensitivityToggles,
        SupervisionModel,
    },
    engine::{split_efficiency, ScenarioEngine},
    error::ModelError,
    metrics::{ComplianceStatus, RiskFactor, SafetyStatus},
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected:.4}, got {actual:.4}"
    );
}

fn baseline() -> Scenario {
    Scenario::new("A", "Baseline", 10, 0, 1.0, SupervisionModel::Baseline)
}

/// 10 frontline + 1 external peer under configuration B.
fn external_peer() -> Scenario {
    Scenario::new("B", "Add peer", 10, 1, 1.0, SupervisionModel::ConfigurationB)
}

fn all_on() -> SensitivityToggles {
    SensitivityToggles {
        include_opportunity_cost: true,
        ..Default::default()
    }
}

#[test]
fn external_peer_scenario_end_to_end() {
    let config = ModelConfig::default();
    let engine = ScenarioEngine::new(&config, SensitivityToggles::default());

    let m = engine.evaluate(&external_peer(), &baseline());

    assert_close(m.payroll_delta_loaded, 6_156.0);
    assert_close(m.freed_lead_hours, 11.0);
    assert_close(m.lead_revenue, 11.0 * 0.65 * 135.0);
    assert_eq!(m.peer_revenue, 0.0);
    assert_close(m.labor_efficiency_savings, 11.0 * (60.75 - 38.475));

    // Revenue realized, so arbitrage is soft only.
    assert_eq!(m.hard_labor_savings, 0.0);
    assert_close(m.soft_efficiency_value, m.labor_efficiency_savings);

    assert_close(m.net_monthly_hard, 965.25 - 6_156.0);
    assert_close(m.retention_savings, 11.0 * 0.10 * 5_000.0 / 12.0);
    assert_close(m.net_monthly_soft, m.retention_savings + m.soft_efficiency_value);
    assert_close(m.net_monthly_total, m.net_monthly_hard + m.net_monthly_soft);

    assert_eq!(m.onboarding_cost, 5_000.0);
    assert_eq!(m.transition_cost, 0.0);
    assert_close(m.net_annual_steady_state, m.net_monthly_hard * 12.0);
    assert_close(m.net_year_one, m.net_annual_steady_state - 5_000.0);
    assert_eq!(m.break_even_months, 0.0);

    assert_eq!(m.effective_ratio, 10.0);
    assert_eq!(m.safety_status, SafetyStatus::Overloaded);
    assert_eq!(m.compliance_status, ComplianceStatus::NonCompliant);
    assert_eq!(
        m.risk_factors,
        vec![RiskFactor::HighTurnoverRisk, RiskFactor::RecruitingRamp]
    );
}

#[test]
fn without_revenue_arbitrage_becomes_hard_savings() {
    let config = ModelConfig::default();
    let toggles = SensitivityToggles {
        include_revenue: false,
        ..Default::default()
    };
    let engine = ScenarioEngine::new(&config, toggles);

    let m = engine.evaluate(&external_peer(), &baseline());

    assert_eq!(m.realized_revenue, 0.0);
    assert_close(m.hard_labor_savings, m.labor_efficiency_savings);
    assert_eq!(m.soft_efficiency_value, 0.0);
    assert_close(m.net_monthly_hard, -6_156.0 + m.labor_efficiency_savings);
}

#[test]
fn split_efficiency_never_double_counts() {
    assert_eq!(split_efficiency(100.0, 40.0), (0.0, 40.0));
    assert_eq!(split_efficiency(0.0, 40.0), (40.0, 0.0));
}

#[test]
fn grant_offsets_cost_and_improves_hard_net_exactly() {
    let plain = ModelConfig::default();
    let granted = ModelConfig {
        global: GlobalAssumptions {
            grant_peer_slots: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let toggles = SensitivityToggles::default();

    let without = ScenarioEngine::new(&plain, toggles).evaluate(&external_peer(), &baseline());
    let with = ScenarioEngine::new(&granted, toggles).evaluate(&external_peer(), &baseline());

    assert_close(with.realized_revenue, without.realized_revenue);
    assert_close(with.grant_savings, 6_156.0);
    assert_eq!(with.grant_fte_used, 1);
    assert_close(with.net_monthly_hard - without.net_monthly_hard, with.grant_savings);
}

#[test]
fn positive_hard_net_gives_break_even_months() {
    let granted = ModelConfig {
        global: GlobalAssumptions {
            grant_peer_slots: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let engine = ScenarioEngine::new(&granted, SensitivityToggles::default());

    let m = engine.evaluate(&external_peer(), &baseline());

    assert_close(m.net_monthly_hard, 965.25);
    assert_close(m.break_even_months, 5_000.0 / 965.25);
}

#[test]
fn baseline_against_itself_is_neutral() {
    let config = ModelConfig::default();
    let engine = ScenarioEngine::new(&config, SensitivityToggles::default());

    let m = engine.evaluate(&baseline(), &baseline());

    assert_eq!(m.payroll_delta_loaded, 0.0);
    assert_eq!(m.freed_lead_hours, 0.0);
    assert_eq!(m.retention_savings, 0.0);
    assert_eq!(m.net_monthly_hard, 0.0);
    assert_eq!(m.one_time_cost, 0.0);
    assert_eq!(m.compliance_status, ComplianceStatus::AtCapacity);
    assert!(m.risk_factors.is_empty());
}

#[test]
fn opportunity_cost_only_moves_the_overlay_net() {
    let config = ModelConfig::default();
    let off = ScenarioEngine::new(&config, SensitivityToggles::default())
        .evaluate(&baseline(), &baseline());
    let on = ScenarioEngine::new(&config, all_on()).evaluate(&baseline(), &baseline());

    assert_eq!(off.opportunity_cost_monthly, 0.0);
    assert_eq!(off.net_monthly_hard_with_opportunity, off.net_monthly_hard);

    assert_close(on.opportunity_cost_monthly, 160.0 * 0.65 * 135.0);
    assert_close(on.net_monthly_hard_with_opportunity, -on.opportunity_cost_monthly);
    assert_eq!(on.net_monthly_hard, off.net_monthly_hard);
}

#[test]
fn opportunity_cost_shrinks_with_freed_hours() {
    let config = ModelConfig::default();
    let m = ScenarioEngine::new(&config, all_on()).evaluate(&external_peer(), &baseline());

    assert_close(m.opportunity_cost_monthly, (160.0 - 11.0) * 0.65 * 135.0);
    assert_close(
        m.net_monthly_hard_with_opportunity,
        m.net_monthly_hard - m.opportunity_cost_monthly,
    );
}

#[test]
fn toggling_retention_changes_soft_net_by_exactly_retention() {
    let config = ModelConfig::default();
    let on = ScenarioEngine::new(&config, SensitivityToggles::default())
        .evaluate(&external_peer(), &baseline());
    let off = ScenarioEngine::new(
        &config,
        SensitivityToggles {
            include_retention: false,
            ..Default::default()
        },
    )
    .evaluate(&external_peer(), &baseline());

    assert!(on.retention_savings > 0.0);
    assert_eq!(off.retention_savings, 0.0);
    assert_close(on.net_monthly_soft - off.net_monthly_soft, on.retention_savings);
    assert_eq!(on.net_monthly_hard, off.net_monthly_hard);
    assert_eq!(on.net_year_one, off.net_year_one);
    assert_eq!(on.one_time_cost, off.one_time_cost);
}

#[test]
fn toggling_transition_cost_changes_one_time_cost_by_exactly_transition() {
    let config = ModelConfig::default();
    let promotion =
        Scenario::new("P", "Promote", 9, 1, 1.0, SupervisionModel::ConfigurationB).promotion();

    let on = ScenarioEngine::new(&config, SensitivityToggles::default())
        .evaluate(&promotion, &baseline());
    let off = ScenarioEngine::new(
        &config,
        SensitivityToggles {
            include_transition_cost: false,
            ..Default::default()
        },
    )
    .evaluate(&promotion, &baseline());

    assert_eq!(on.transition_cost, 5_760.0);
    assert_eq!(off.transition_cost, 0.0);
    assert_eq!(on.onboarding_cost, 0.0);
    assert_close(off.one_time_cost - on.one_time_cost, -5_760.0);
    assert_close(off.net_year_one - on.net_year_one, 5_760.0);
    assert_eq!(on.net_monthly_hard, off.net_monthly_hard);
    assert_eq!(on.net_monthly_soft, off.net_monthly_soft);
}

#[test]
fn toggling_revenue_leaves_grant_untouched() {
    let granted = ModelConfig {
        global: GlobalAssumptions {
            grant_peer_slots: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let m = ScenarioEngine::new(
        &granted,
        SensitivityToggles {
            include_revenue: false,
            ..Default::default()
        },
    )
    .evaluate(&external_peer(), &baseline());

    assert_eq!(m.lead_revenue, 0.0);
    assert_eq!(m.peer_revenue, 0.0);
    assert_close(m.grant_savings, 6_156.0);
}

#[test]
fn credentialing_lag_flagged_for_billing_promotions() {
    let config = ModelConfig {
        global: GlobalAssumptions {
            peer_utilization: 0.4,
            ..Default::default()
        },
        ..Default::default()
    };
    let promotion =
        Scenario::new("P", "Promote", 4, 1, 1.0, SupervisionModel::ConfigurationB).promotion();

    let m = ScenarioEngine::new(&config, SensitivityToggles::default())
        .evaluate(&promotion, &baseline());

    assert_close(m.peer_revenue, 160.0 * 0.4 * 55.0);
    assert!(m.risk_factors.contains(&RiskFactor::CredentialingLag));
    assert!(!m.risk_factors.contains(&RiskFactor::RecruitingRamp));
}

#[test]
fn turnover_threshold_flags_risk_below_safety_limit() {
    let mut config = ModelConfig::default();
    config.rules.max_ratio = 8.0;
    config.hr.turnover_risk_threshold = 6.0;
    let scenario = Scenario::new("C", "Hire", 7, 1, 1.0, SupervisionModel::ConfigurationC);

    let m = ScenarioEngine::new(&config, SensitivityToggles::default())
        .evaluate(&scenario, &Scenario::new("A", "Baseline", 7, 0, 1.0, SupervisionModel::Baseline));

    assert_eq!(m.safety_status, SafetyStatus::Ok);
    assert!(m.risk_factors.contains(&RiskFactor::HighTurnoverRisk));
}

#[test]
fn demand_beyond_capacity_is_flagged() {
    let mut config = ModelConfig::default();
    config.rules.baseline_indiv_hours_per_staff = 20.0;
    let big = Scenario::new("A", "Baseline", 10, 0, 1.0, SupervisionModel::Baseline);

    let m = ScenarioEngine::new(&config, SensitivityToggles::default()).evaluate(&big, &big);

    assert!(m.required_hours > m.actual_supervision_hours);
    assert_eq!(m.risk_factors, vec![RiskFactor::CapacityShortfall]);
}

#[test]
fn evaluate_all_covers_every_scenario_against_the_baseline() {
    let config = ModelConfig::default();
    let engine = ScenarioEngine::new(&config, SensitivityToggles::default());

    let metrics = engine.evaluate_all().unwrap();

    assert_eq!(metrics.keys().cloned().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(metrics["A"].payroll_delta_loaded, 0.0);
    assert_eq!(metrics["A"].compliance_status, ComplianceStatus::AtCapacity);
    // B swaps one frontline for one peer; C adds one peer.
    assert_close(metrics["B"].payroll_delta_loaded, (28.5 - 24.0) * 160.0 * 1.35);
    assert_close(metrics["C"].payroll_delta_loaded, 28.5 * 160.0 * 1.35);
    assert_eq!(metrics["B"].transition_cost, 5_760.0);
    assert_eq!(metrics["C"].onboarding_cost, 5_000.0);
}

#[test]
fn evaluate_set_requires_a_known_baseline() {
    let config = ModelConfig::default();
    let engine = ScenarioEngine::new(&config, SensitivityToggles::default());
    let set = ScenarioSet {
        baseline: "Z".into(),
        ..Default::default()
    };

    match engine.evaluate_set(&set) {
        Err(ModelError::BaselineNotFound { id }) => assert_eq!(id, "Z"),
        other => panic!("expected BaselineNotFound, got {other:?}"),
    }
}
