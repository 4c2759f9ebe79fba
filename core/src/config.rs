//! Assumption and scenario records — the engine's only inputs.
//!
//! Every record has built-in defaults. `ModelConfig::load` reads the
//! JSON files in a data directory and deep-merges each one over its
//! default, so files written before a field existed still load.

use crate::{
    error::{ModelError, ModelResult},
    merge::merge_over_default,
    types::{Dollars, Hours, ScenarioId},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const GLOBAL_ASSUMPTIONS_FILE: &str = "global_assumptions.json";
pub const SUPERVISION_RULES_FILE: &str = "supervision_rules.json";
pub const HR_RISK_FILE: &str = "hr_risk.json";
pub const SCENARIOS_FILE: &str = "scenarios.json";

// ── Global assumptions ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAssumptions {
    // Wages & costs
    pub frontline_base_hourly: Dollars,
    pub peer_base_hourly: Dollars,
    pub lead_base_hourly: Dollars,
    /// Fraction added on top of every wage, e.g. 0.35 for 35%.
    pub benefit_load: f64,
    pub fte_hours_per_month: Hours,

    // Lead clinician reinvestment
    pub lead_billable_rate: Dollars,
    /// 0.0 to 1.0
    pub lead_utilization: f64,

    // Peer-delivered billing
    pub peer_billable_rate: Dollars,
    /// 0.0 to 1.0
    pub peer_utilization: f64,
    pub peer_billing_enabled: bool,
    /// Ceiling on billable peer headcount when only some peers are credentialed.
    pub credentialed_peer_cap: Option<u32>,

    // Grant funding
    pub grant_peer_slots: u32,
    pub grant_frontline_slots: u32,

    /// Clinical task reclaimed lead time is reinvested into.
    pub reinvestment_task: String,
}

impl Default for GlobalAssumptions {
    fn default() -> Self {
        Self {
            frontline_base_hourly: 24.00,
            peer_base_hourly: 28.50,
            lead_base_hourly: 45.00,
            benefit_load: 0.35,
            fte_hours_per_month: 160.0,
            lead_billable_rate: 135.0,
            lead_utilization: 0.65,
            peer_billable_rate: 55.0,
            peer_utilization: 0.0,
            peer_billing_enabled: true,
            credentialed_peer_cap: None,
            grant_peer_slots: 0,
            grant_frontline_slots: 0,
            reinvestment_task: "Outpatient Counseling".into(),
        }
    }
}

// ── Supervision rules ──────────────────────────────────────────────

/// How supervision work is split once a peer-supervisor tier exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredConfiguration {
    /// Individual hours per frontline staff the lead keeps.
    pub lead_indiv_per_staff: Hours,
    /// Individual hours per frontline staff delegated to peers.
    pub peer_indiv_per_staff: Hours,
    pub lead_group_hours: Hours,
    pub peer_group_hours: Hours,
    pub co_facilitated_group_hours: Hours,
    /// Lead oversight hours per peer-supervisor.
    pub oversight_hours_per_peer: Hours,
}

impl Default for TieredConfiguration {
    fn default() -> Self {
        Self {
            lead_indiv_per_staff: 1.0,
            peer_indiv_per_staff: 1.0,
            lead_group_hours: 0.0,
            peer_group_hours: 2.0,
            co_facilitated_group_hours: 0.0,
            oversight_hours_per_peer: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionRules {
    pub baseline_indiv_hours_per_staff: Hours,
    pub baseline_group_hours_per_team: Hours,
    pub configuration_b: TieredConfiguration,
    pub configuration_c: TieredConfiguration,
    /// Maximum safe frontline:peer ratio.
    pub max_ratio: f64,
}

impl SupervisionRules {
    /// The tiered record a model delegates under, or None for the baseline.
    pub fn tiered(&self, model: SupervisionModel) -> Option<&TieredConfiguration> {
        match model {
            SupervisionModel::Baseline => None,
            SupervisionModel::ConfigurationB => Some(&self.configuration_b),
            SupervisionModel::ConfigurationC => Some(&self.configuration_c),
        }
    }
}

impl Default for SupervisionRules {
    fn default() -> Self {
        Self {
            baseline_indiv_hours_per_staff: 2.0,
            baseline_group_hours_per_team: 2.0,
            configuration_b: TieredConfiguration::default(),
            configuration_c: TieredConfiguration::default(),
            max_ratio: 5.0,
        }
    }
}

// ── HR risk ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HRRiskAssumptions {
    pub promotion_raise_per_hour: Dollars,
    pub credentialing_months: f64,
    pub recruit_ramp_months_frontline: f64,
    pub recruit_ramp_months_peer: f64,
    pub onboarding_cost_frontline: Dollars,
    pub onboarding_cost_peer: Dollars,
    pub turnover_cost_per_departure: Dollars,
    /// Frontline:peer ratio above which turnover risk is flagged.
    pub turnover_risk_threshold: f64,
}

impl Default for HRRiskAssumptions {
    fn default() -> Self {
        Self {
            promotion_raise_per_hour: 2.0,
            credentialing_months: 3.0,
            recruit_ramp_months_frontline: 1.0,
            recruit_ramp_months_peer: 3.0,
            onboarding_cost_frontline: 2_500.0,
            onboarding_cost_peer: 5_000.0,
            turnover_cost_per_departure: 5_000.0,
            turnover_risk_threshold: 6.0,
        }
    }
}

// ── Scenarios ──────────────────────────────────────────────────────

/// Which supervision split a scenario runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisionModel {
    /// Lead clinician delivers all supervision.
    Baseline,
    ConfigurationB,
    ConfigurationC,
}

impl SupervisionModel {
    pub fn is_tiered(self) -> bool {
        !matches!(self, SupervisionModel::Baseline)
    }
}

/// Scenario-local values that win over the global defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOverrides {
    #[serde(default)]
    pub frontline_wage: Option<Dollars>,
    #[serde(default)]
    pub peer_wage: Option<Dollars>,
    #[serde(default)]
    pub lead_wage: Option<Dollars>,
    #[serde(default)]
    pub billable_rate: Option<Dollars>,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub benefit_load: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub frontline_count: u32,
    pub peer_count: u32,
    pub lead_fte: f64,
    /// Peer growth comes from promoting frontline staff (raise) rather
    /// than hiring externally (premium + onboarding).
    pub is_internal_promotion: bool,
    pub supervision_model: SupervisionModel,
    #[serde(default)]
    pub overrides: ScenarioOverrides,
}

impl Scenario {
    pub fn new(
        id: &str,
        name: &str,
        frontline_count: u32,
        peer_count: u32,
        lead_fte: f64,
        supervision_model: SupervisionModel,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: String::new(),
            description: String::new(),
            frontline_count,
            peer_count,
            lead_fte,
            is_internal_promotion: false,
            supervision_model,
            overrides: ScenarioOverrides::default(),
        }
    }

    /// Empty baseline-mode scenario that persisted fields are laid over.
    pub fn template(id: &str) -> Self {
        Self::new(id, id, 0, 0, 1.0, SupervisionModel::Baseline)
    }

    pub fn promotion(mut self) -> Self {
        self.is_internal_promotion = true;
        self
    }

    pub fn with_overrides(mut self, overrides: ScenarioOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn total_fte(&self) -> f64 {
        self.frontline_count as f64 + self.peer_count as f64 + self.lead_fte
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    /// Id of the scenario every other scenario is differenced against.
    pub baseline: ScenarioId,
    pub scenarios: BTreeMap<ScenarioId, Scenario>,
}

impl ScenarioSet {
    pub fn baseline_scenario(&self) -> ModelResult<&Scenario> {
        self.scenarios
            .get(&self.baseline)
            .ok_or_else(|| ModelError::BaselineNotFound {
                id: self.baseline.clone(),
            })
    }

    pub fn get(&self, id: &str) -> ModelResult<&Scenario> {
        self.scenarios
            .get(id)
            .ok_or_else(|| ModelError::ScenarioNotFound { id: id.into() })
    }

    pub fn insert(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.id.clone(), scenario);
    }

    /// Deep-merge a persisted set over `self`, one scenario at a time.
    ///
    /// Scenarios with no entry in `self` merge over a blank template, so a
    /// user-added scenario missing newer fields still loads. An entry that
    /// does not decode even then is dropped on its own; siblings survive.
    pub fn merge_persisted(&self, persisted: Value) -> ScenarioSet {
        let Value::Object(mut fields) = persisted else {
            log::warn!("Persisted scenario set is not an object; using defaults");
            return self.clone();
        };

        let mut scenarios = self.scenarios.clone();
        match fields.remove("scenarios") {
            Some(Value::Object(entries)) => {
                for (id, entry) in entries {
                    let template = self
                        .scenarios
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| Scenario::template(&id));
                    match merge_over_default(&template, entry) {
                        Ok(mut scenario) => {
                            scenario.id = id.clone();
                            scenarios.insert(id, scenario);
                        }
                        Err(e) => log::warn!("Dropping persisted scenario '{id}': {e}"),
                    }
                }
            }
            Some(other) => log::warn!("Persisted scenarios are not a map: {other}"),
            None => {}
        }

        let baseline = match fields.remove("baseline") {
            Some(Value::String(id)) if scenarios.contains_key(&id) => id,
            Some(other) => {
                log::warn!("Persisted baseline {other} is unusable; keeping '{}'", self.baseline);
                self.baseline.clone()
            }
            None => self.baseline.clone(),
        };

        ScenarioSet { baseline, scenarios }
    }
}

impl Default for ScenarioSet {
    fn default() -> Self {
        let mut a = Scenario::new("A", "Baseline", 3, 0, 1.0, SupervisionModel::Baseline);
        a.label = "Current State".into();
        a.description =
            "Current staffing model with the lead clinician providing all supervision.".into();

        let mut b = Scenario::new(
            "B",
            "Internal Promotion",
            2,
            1,
            1.0,
            SupervisionModel::ConfigurationB,
        )
        .promotion();
        b.label = "Headcount Neutral".into();
        b.description =
            "Promote 1 frontline worker to peer-supervisor. Total staff count remains constant."
                .into();

        let mut c = Scenario::new(
            "C",
            "External Hire",
            3,
            1,
            1.0,
            SupervisionModel::ConfigurationC,
        );
        c.label = "Growth Model".into();
        c.description = "Hire 1 peer-supervisor externally. Total staff count increases.".into();

        Self {
            baseline: "A".into(),
            scenarios: [a, b, c].into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }
}

// ── Sensitivity toggles ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityToggles {
    pub include_revenue: bool,
    pub include_retention: bool,
    pub include_transition_cost: bool,
    pub include_opportunity_cost: bool,
}

impl Default for SensitivityToggles {
    fn default() -> Self {
        Self {
            include_revenue: true,
            include_retention: true,
            include_transition_cost: true,
            include_opportunity_cost: false,
        }
    }
}

// ── Full input set ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    pub global: GlobalAssumptions,
    pub rules: SupervisionRules,
    pub hr: HRRiskAssumptions,
    pub scenario_set: ScenarioSet,
}

impl ModelConfig {
    /// Load from the data/ directory.
    /// In tests, use ModelConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let dir = Path::new(data_dir);
        Ok(Self {
            global: load_file(&dir.join(GLOBAL_ASSUMPTIONS_FILE), &GlobalAssumptions::default())?,
            rules: load_file(&dir.join(SUPERVISION_RULES_FILE), &SupervisionRules::default())?,
            hr: load_file(&dir.join(HR_RISK_FILE), &HRRiskAssumptions::default())?,
            scenario_set: load_file(&dir.join(SCENARIOS_FILE), &ScenarioSet::default())?,
        })
    }
}

fn load_file<T>(path: &Path, default: &T) -> anyhow::Result<T>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    let persisted: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
    let merged = merge_over_default(default, persisted)
        .map_err(|e| anyhow::anyhow!("Invalid values in {}: {e}", path.display()))?;
    Ok(merged)
}
