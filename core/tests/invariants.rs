//! Property tests: invariants that must hold for every computed record.

use proptest::prelude::*;
use staffing_core::{
    config::{
        GlobalAssumptions, ModelConfig, Scenario, SensitivityToggles, SupervisionModel,
        SupervisionRules, TieredConfiguration,
    },
    engine::ScenarioEngine,
    metrics::SafetyStatus,
    payroll_subsystem::calculate_payroll,
};

fn model() -> impl Strategy<Value = SupervisionModel> {
    prop_oneof![
        Just(SupervisionModel::Baseline),
        Just(SupervisionModel::ConfigurationB),
        Just(SupervisionModel::ConfigurationC),
    ]
}

fn scenario(id: &'static str) -> impl Strategy<Value = Scenario> {
    (0u32..40, 0u32..8, 0.5f64..2.0, any::<bool>(), model()).prop_map(
        move |(frontline, peers, lead, promotion, model)| {
            let mut s = Scenario::new(id, id, frontline, peers, lead, model);
            s.is_internal_promotion = promotion;
            s
        },
    )
}

fn tier() -> impl Strategy<Value = TieredConfiguration> {
    (0.0f64..3.0, 0.0f64..3.0, 0.0f64..4.0, 0.0f64..4.0, 0.0f64..4.0, 0.0f64..3.0).prop_map(
        |(lead, peer, lead_group, peer_group, co, oversight)| TieredConfiguration {
            lead_indiv_per_staff: lead,
            peer_indiv_per_staff: peer,
            lead_group_hours: lead_group,
            peer_group_hours: peer_group,
            co_facilitated_group_hours: co,
            oversight_hours_per_peer: oversight,
        },
    )
}

fn config() -> impl Strategy<Value = ModelConfig> {
    (
        (15.0f64..40.0, 20.0f64..50.0, 35.0f64..90.0, 0.0f64..0.6),
        (0.0f64..1.0, 0.0f64..1.0, any::<bool>()),
        (0u32..5, 0u32..5),
        (tier(), tier(), 1.0f64..10.0),
    )
        .prop_map(
            |(
                (frontline_wage, peer_wage, lead_wage, load),
                (lead_util, peer_util, peer_billing),
                (peer_slots, frontline_slots),
                (b, c, max_ratio),
            )| ModelConfig {
                global: GlobalAssumptions {
                    frontline_base_hourly: frontline_wage,
                    peer_base_hourly: peer_wage,
                    lead_base_hourly: lead_wage,
                    benefit_load: load,
                    lead_utilization: lead_util,
                    peer_utilization: peer_util,
                    peer_billing_enabled: peer_billing,
                    grant_peer_slots: peer_slots,
                    grant_frontline_slots: frontline_slots,
                    ..Default::default()
                },
                rules: SupervisionRules {
                    configuration_b: b,
                    configuration_c: c,
                    max_ratio,
                    ..Default::default()
                },
                ..Default::default()
            },
        )
}

fn toggles() -> impl Strategy<Value = SensitivityToggles> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(r, k, t, o)| {
        SensitivityToggles {
            include_revenue: r,
            include_retention: k,
            include_transition_cost: t,
            include_opportunity_cost: o,
        }
    })
}

proptest! {
    #[test]
    fn freed_hours_never_negative(
        config in config(), toggles in toggles(), s in scenario("S"), base in scenario("A"),
    ) {
        let m = ScenarioEngine::new(&config, toggles).evaluate(&s, &base);
        prop_assert!(m.freed_lead_hours >= 0.0);
    }

    #[test]
    fn revenue_and_hard_savings_never_both_counted(
        config in config(), toggles in toggles(), s in scenario("S"), base in scenario("A"),
    ) {
        let m = ScenarioEngine::new(&config, toggles).evaluate(&s, &base);
        if m.realized_revenue > 0.0 {
            prop_assert_eq!(m.hard_labor_savings, 0.0);
            prop_assert_eq!(m.soft_efficiency_value, m.labor_efficiency_savings);
        } else {
            prop_assert_eq!(m.hard_labor_savings, m.labor_efficiency_savings);
            prop_assert_eq!(m.soft_efficiency_value, 0.0);
        }
    }

    #[test]
    fn grant_savings_respect_slot_ceiling(
        config in config(), s in scenario("S"), base in scenario("A"),
    ) {
        let m = ScenarioEngine::new(&config, SensitivityToggles::default()).evaluate(&s, &base);
        let g = &config.global;
        let loaded = 1.0 + g.benefit_load;
        let ceiling = g.grant_peer_slots as f64 * g.peer_base_hourly * loaded * g.fte_hours_per_month
            + g.grant_frontline_slots as f64 * g.frontline_base_hourly * loaded * g.fte_hours_per_month;
        prop_assert!(m.grant_savings <= ceiling + 1e-6);
        prop_assert!(m.grant_fte_used <= g.grant_peer_slots + g.grant_frontline_slots);
    }

    #[test]
    fn no_peers_means_zero_ratio_and_safe(
        config in config(), s in scenario("S"), base in scenario("A"),
    ) {
        let mut s = s;
        s.peer_count = 0;
        let m = ScenarioEngine::new(&config, SensitivityToggles::default()).evaluate(&s, &base);
        prop_assert_eq!(m.effective_ratio, 0.0);
        prop_assert_eq!(m.safety_status, SafetyStatus::Ok);
    }

    #[test]
    fn overloaded_iff_peers_and_ratio_above_max(
        config in config(), s in scenario("S"), base in scenario("A"),
    ) {
        let m = ScenarioEngine::new(&config, SensitivityToggles::default()).evaluate(&s, &base);
        let expected = s.peer_count > 0 && m.effective_ratio > config.rules.max_ratio;
        prop_assert_eq!(m.safety_status == SafetyStatus::Overloaded, expected);
    }

    #[test]
    fn payroll_delta_vanishes_against_itself(config in config(), s in scenario("S")) {
        let m = ScenarioEngine::new(&config, SensitivityToggles::default()).evaluate(&s, &s);
        prop_assert_eq!(m.payroll_delta_loaded, 0.0);
        prop_assert_eq!(m.payroll_loaded, calculate_payroll(&s, &config.global).loaded);
    }

    #[test]
    fn nets_are_consistent(
        config in config(), toggles in toggles(), s in scenario("S"), base in scenario("A"),
    ) {
        let m = ScenarioEngine::new(&config, toggles).evaluate(&s, &base);
        let hard = m.realized_revenue + m.grant_savings - m.payroll_delta_loaded + m.hard_labor_savings;
        prop_assert!((m.net_monthly_hard - hard).abs() < 1e-6);
        prop_assert!((m.net_monthly_total - (m.net_monthly_hard + m.net_monthly_soft)).abs() < 1e-6);
        prop_assert!((m.net_year_one - (m.net_monthly_hard * 12.0 - m.one_time_cost)).abs() < 1e-6);
        prop_assert!(m.break_even_months.is_finite());
        prop_assert!(m.break_even_months >= 0.0);
    }
}
