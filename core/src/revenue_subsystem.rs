//! Revenue realization subsystem.
//!
//! Three independent figures feed the aggregator:
//!   1. Lead revenue     — freed lead hours billed at the lead rate
//!   2. Grant offset     — first N staffed units per role are grant-funded
//!   3. Peer gap-fill    — non-grant peers billing directly
//!
//! RULE: grant money is a cost offset. It never appears in revenue.

use crate::{
    config::{GlobalAssumptions, Scenario},
    rates::RateCard,
    types::{Dollars, Hours},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrantOffset {
    pub savings: Dollars,
    /// Staffed units the grant covers, across both roles.
    pub fte_used: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueBreakdown {
    pub lead_revenue: Dollars,
    pub peer_revenue: Dollars,
    pub grant: GrantOffset,
}

impl RevenueBreakdown {
    pub fn realized_revenue(&self) -> Dollars {
        self.lead_revenue + self.peer_revenue
    }
}

pub fn realize_revenue(
    scenario: &Scenario,
    global: &GlobalAssumptions,
    freed_hours: Hours,
) -> RevenueBreakdown {
    let rates = RateCard::for_scenario(scenario, global);
    RevenueBreakdown {
        lead_revenue: lead_revenue(freed_hours, &rates),
        peer_revenue: peer_revenue(scenario, global),
        grant: grant_offset(scenario, global, &rates),
    }
}

pub fn lead_revenue(freed_hours: Hours, rates: &RateCard) -> Dollars {
    freed_hours * rates.lead_utilization * rates.lead_billable_rate
}

/// First-in priority: `min(staffed, slots)` units per role are free.
pub fn grant_offset(scenario: &Scenario, global: &GlobalAssumptions, rates: &RateCard) -> GrantOffset {
    let hours = global.fte_hours_per_month;
    let peers_covered = scenario.peer_count.min(global.grant_peer_slots);
    let frontline_covered = scenario.frontline_count.min(global.grant_frontline_slots);

    let savings = peers_covered as f64 * rates.loaded_peer() * hours
        + frontline_covered as f64 * rates.loaded_frontline() * hours;

    GrantOffset {
        savings,
        fte_used: peers_covered + frontline_covered,
    }
}

/// Peers that may bill: not grant-funded, and within the credentialed cap.
pub fn billable_peer_count(scenario: &Scenario, global: &GlobalAssumptions) -> u32 {
    let uncovered = scenario.peer_count.saturating_sub(global.grant_peer_slots);
    match global.credentialed_peer_cap {
        Some(cap) => uncovered.min(cap),
        None => uncovered,
    }
}

pub fn peer_revenue(scenario: &Scenario, global: &GlobalAssumptions) -> Dollars {
    if !global.peer_billing_enabled {
        return 0.0;
    }
    billable_peer_count(scenario, global) as f64
        * global.fte_hours_per_month
        * global.peer_utilization
        * global.peer_billable_rate
}
