//! Supervisory load subsystem — hours the lead clinician personally
//! delivers each month.
//!
//! The variant set is closed: baseline, or one of the two tiered
//! configurations named on `SupervisionRules`.

use crate::{
    config::{Scenario, SupervisionModel, SupervisionRules, TieredConfiguration},
    types::Hours,
};

/// Lead load under the scenario's own supervision model.
pub fn supervisor_load(scenario: &Scenario, rules: &SupervisionRules) -> Hours {
    load_under(scenario.supervision_model, scenario, rules)
}

/// Lead load for this headcount if nothing were delegated.
pub fn baseline_load(scenario: &Scenario, rules: &SupervisionRules) -> Hours {
    load_under(SupervisionModel::Baseline, scenario, rules)
}

pub fn load_under(model: SupervisionModel, scenario: &Scenario, rules: &SupervisionRules) -> Hours {
    match rules.tiered(model) {
        None => {
            scenario.frontline_count as f64 * rules.baseline_indiv_hours_per_staff
                + rules.baseline_group_hours_per_team
        }
        Some(tier) => tiered_lead_load(scenario, tier),
    }
}

fn tiered_lead_load(scenario: &Scenario, tier: &TieredConfiguration) -> Hours {
    let direct = scenario.frontline_count as f64 * tier.lead_indiv_per_staff;
    let group = tier.lead_group_hours + tier.co_facilitated_group_hours;
    let oversight = scenario.peer_count as f64 * tier.oversight_hours_per_peer;
    direct + group + oversight
}

/// All supervision work that has to happen, whoever delivers it.
pub fn total_demand(scenario: &Scenario, rules: &SupervisionRules) -> Hours {
    match rules.tiered(scenario.supervision_model) {
        None => baseline_load(scenario, rules),
        Some(tier) => {
            scenario.frontline_count as f64
                * (tier.lead_indiv_per_staff + tier.peer_indiv_per_staff)
                + tier.lead_group_hours
                + tier.peer_group_hours
                + tier.co_facilitated_group_hours
        }
    }
}
