use crate::{
    config::{ModelConfig, Scenario, SensitivityToggles},
    error::{ModelError, ModelResult},
    merge::merge_over_default,
    store::{ModelStore, GLOBAL_KEY, HR_KEY, RULES_KEY, SCENARIOS_KEY, TOGGLES_KEY},
    types::ScenarioId,
};
use serde::{Deserialize, Serialize};

/// Every edit an outer UI can make to the engine's inputs.
/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum EditCommand {
    // ── Scenarios ─────────────────────────────────
    UpdateScenario { scenario: Scenario },
    SetBaseline { scenario_id: ScenarioId },

    // ── Assumptions (partial JSON, deep-merged) ───
    PatchGlobal { patch: serde_json::Value },
    PatchRules { patch: serde_json::Value },
    PatchHr { patch: serde_json::Value },

    // ── Sensitivity ───────────────────────────────
    SetToggles { toggles: SensitivityToggles },

    ResetDefaults,
}

/// The full mutable input set a UI session edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub config: ModelConfig,
    pub toggles: SensitivityToggles,
}

impl Workspace {
    pub fn new(config: ModelConfig, toggles: SensitivityToggles) -> Self {
        Self { config, toggles }
    }

    pub fn apply(&mut self, command: EditCommand) -> ModelResult<()> {
        match command {
            EditCommand::UpdateScenario { scenario } => {
                log::debug!("Scenario {} updated", scenario.id);
                self.config.scenario_set.insert(scenario);
            }
            EditCommand::SetBaseline { scenario_id } => {
                if !self.config.scenario_set.scenarios.contains_key(&scenario_id) {
                    return Err(ModelError::ScenarioNotFound { id: scenario_id });
                }
                self.config.scenario_set.baseline = scenario_id;
            }
            EditCommand::PatchGlobal { patch } => {
                self.config.global = merge_over_default(&self.config.global, patch)?;
            }
            EditCommand::PatchRules { patch } => {
                self.config.rules = merge_over_default(&self.config.rules, patch)?;
            }
            EditCommand::PatchHr { patch } => {
                self.config.hr = merge_over_default(&self.config.hr, patch)?;
            }
            EditCommand::SetToggles { toggles } => {
                self.toggles = toggles;
            }
            EditCommand::ResetDefaults => {
                log::info!("Workspace reset to defaults");
                *self = Self::default();
            }
        }
        Ok(())
    }

    /// Write every record under its versioned key.
    pub fn persist(&self, store: &ModelStore) -> ModelResult<()> {
        store.put(GLOBAL_KEY, &self.config.global)?;
        store.put(RULES_KEY, &self.config.rules)?;
        store.put(HR_KEY, &self.config.hr)?;
        store.put(SCENARIOS_KEY, &self.config.scenario_set)?;
        store.put(TOGGLES_KEY, &self.toggles)?;
        Ok(())
    }

    /// Load every record, filling gaps from `defaults`.
    pub fn restore(store: &ModelStore, defaults: &Workspace) -> ModelResult<Self> {
        Ok(Self {
            config: ModelConfig {
                global: store.load_or_default(GLOBAL_KEY, &defaults.config.global)?,
                rules: store.load_or_default(RULES_KEY, &defaults.config.rules)?,
                hr: store.load_or_default(HR_KEY, &defaults.config.hr)?,
                scenario_set: store
                    .load_scenario_set(SCENARIOS_KEY, &defaults.config.scenario_set)?,
            },
            toggles: store.load_or_default(TOGGLES_KEY, &defaults.toggles)?,
        })
    }
}
