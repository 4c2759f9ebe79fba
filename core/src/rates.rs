//! Override resolution.
//!
//! RULE: every per-scenario rate is read through `RateCard`.
//! Precedence is scenario override, then global default. Nothing else
//! in the crate reads `ScenarioOverrides` directly.

use crate::{
    config::{GlobalAssumptions, Scenario},
    types::Dollars,
};

/// Scenario override if present, else the global default.
pub fn resolve(override_value: Option<f64>, default: f64) -> f64 {
    override_value.unwrap_or(default)
}

/// All rates a scenario is evaluated with, resolved once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCard {
    pub frontline_wage: Dollars,
    pub peer_wage: Dollars,
    pub lead_wage: Dollars,
    pub benefit_load: f64,
    pub lead_billable_rate: Dollars,
    pub lead_utilization: f64,
}

impl RateCard {
    pub fn for_scenario(scenario: &Scenario, global: &GlobalAssumptions) -> Self {
        let o = &scenario.overrides;
        Self {
            frontline_wage: resolve(o.frontline_wage, global.frontline_base_hourly),
            peer_wage: resolve(o.peer_wage, global.peer_base_hourly),
            lead_wage: resolve(o.lead_wage, global.lead_base_hourly),
            benefit_load: resolve(o.benefit_load, global.benefit_load),
            lead_billable_rate: resolve(o.billable_rate, global.lead_billable_rate),
            lead_utilization: resolve(o.utilization, global.lead_utilization),
        }
    }

    /// Hourly rate with benefits applied.
    pub fn loaded(&self, hourly: Dollars) -> Dollars {
        hourly * (1.0 + self.benefit_load)
    }

    pub fn loaded_frontline(&self) -> Dollars {
        self.loaded(self.frontline_wage)
    }

    pub fn loaded_peer(&self) -> Dollars {
        self.loaded(self.peer_wage)
    }

    pub fn loaded_lead(&self) -> Dollars {
        self.loaded(self.lead_wage)
    }
}
