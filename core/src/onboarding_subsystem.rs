//! Onboarding & transition cost subsystem — one-time costs of moving
//! from the baseline headcount to a scenario's headcount.

use crate::{
    config::{GlobalAssumptions, HRRiskAssumptions, Scenario},
    rates::RateCard,
    types::Dollars,
};

/// Overtime premium on the frontline wage while a promoted seat is backfilled.
pub const TRANSITION_OVERTIME_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnboardingCost {
    pub net_new_frontline: u32,
    pub net_new_peers: u32,
    pub cost: Dollars,
}

pub fn calculate_onboarding(
    scenario: &Scenario,
    baseline: &Scenario,
    hr: &HRRiskAssumptions,
) -> OnboardingCost {
    let net_new_frontline = scenario.frontline_count.saturating_sub(baseline.frontline_count);
    let net_new_peers = scenario.peer_count.saturating_sub(baseline.peer_count);

    let mut cost = net_new_frontline as f64 * hr.onboarding_cost_frontline;
    // Promoted peers were already on staff.
    if !scenario.is_internal_promotion {
        cost += net_new_peers as f64 * hr.onboarding_cost_peer;
    }

    OnboardingCost {
        net_new_frontline,
        net_new_peers,
        cost,
    }
}

/// One month of frontline hours at the overtime premium, for promotions only.
pub fn transition_cost(scenario: &Scenario, global: &GlobalAssumptions) -> Dollars {
    if !scenario.is_internal_promotion {
        return 0.0;
    }
    let rates = RateCard::for_scenario(scenario, global);
    rates.frontline_wage * TRANSITION_OVERTIME_MULTIPLIER * global.fte_hours_per_month
}
