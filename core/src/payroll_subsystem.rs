//! Payroll subsystem — monthly base and benefit-loaded payroll.

use crate::{
    config::{GlobalAssumptions, Scenario},
    rates::RateCard,
    types::Dollars,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    pub base: Dollars,
    pub loaded: Dollars,
}

/// `base = Σ count × rate × fte_hours_per_month`, `loaded = base × (1 + load)`.
pub fn calculate_payroll(scenario: &Scenario, global: &GlobalAssumptions) -> Payroll {
    let rates = RateCard::for_scenario(scenario, global);
    let hours = global.fte_hours_per_month;

    let frontline = scenario.frontline_count as f64 * rates.frontline_wage * hours;
    let peer = scenario.peer_count as f64 * rates.peer_wage * hours;
    let lead = scenario.lead_fte * rates.lead_wage * hours;

    let base = frontline + peer + lead;
    Payroll {
        base,
        loaded: base * (1.0 + rates.benefit_load),
    }
}
