//! scenario-runner: headless driver for the staffing scenario engine.
//!
//! Usage:
//!   scenario-runner --data-dir ./data
//!   scenario-runner --db workspace.db --no-revenue --opportunity-cost
//!   scenario-runner --db workspace.db --ipc-mode

use anyhow::Result;
use staffing_core::{
    command::{EditCommand, Workspace},
    config::{ModelConfig, SensitivityToggles},
    engine::ScenarioEngine,
    metrics::ComputedMetrics,
    store::ModelStore,
    types::ScenarioId,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    GetMetrics,
    Command { command: EditCommand },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    baseline: &'a str,
    reinvestment_task: &'a str,
    toggles: SensitivityToggles,
    metrics: BTreeMap<ScenarioId, ComputedMetrics>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir");

    let config = match data_dir {
        Some(dir) => ModelConfig::load(dir)?,
        None => ModelConfig::default(),
    };
    let toggles = SensitivityToggles {
        include_revenue: !has_flag(&args, "--no-revenue"),
        include_retention: !has_flag(&args, "--no-retention"),
        include_transition_cost: !has_flag(&args, "--no-transition"),
        include_opportunity_cost: has_flag(&args, "--opportunity-cost"),
    };
    let defaults = Workspace::new(config, toggles);

    let store = ModelStore::open(db)?;
    store.migrate()?;

    // A file-backed db carries the user's previous edits; :memory: starts clean.
    let mut workspace = if db == ":memory:" {
        defaults
    } else {
        let mut restored = Workspace::restore(&store, &defaults)?;
        // Flags given on this invocation win over persisted toggles.
        if args.iter().any(|a| is_toggle_flag(a)) {
            restored.toggles = toggles;
        }
        restored
    };

    if ipc_mode {
        run_ipc_loop(&mut workspace, &store)?;
    } else {
        println!("Staffing scenario engine — scenario-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in defaults)"));
        println!();
        let metrics = ScenarioEngine::new(&workspace.config, workspace.toggles).evaluate_all()?;
        let run_id = ModelStore::new_run_id();
        store.record_evaluation(&run_id, &metrics)?;
        print_summary(&workspace, &metrics, &run_id);
    }

    Ok(())
}

fn run_ipc_loop(workspace: &mut Workspace, store: &ModelStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match request {
            IpcRequest::Quit => break,
            IpcRequest::GetMetrics => write_state(&mut stdout, workspace)?,
            IpcRequest::Command { command } => match workspace.apply(command) {
                Ok(()) => {
                    workspace.persist(store)?;
                    write_state(&mut stdout, workspace)?;
                }
                Err(e) => write_error(&mut stdout, &e.to_string())?,
            },
        }
    }
    Ok(())
}

fn write_state(out: &mut impl Write, workspace: &Workspace) -> Result<()> {
    let state = build_ui_state(workspace)?;
    writeln!(out, "{}", serde_json::to_string(&state)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    log::warn!("IPC request rejected: {message}");
    writeln!(out, "{}", serde_json::json!({ "error": message }))?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(workspace: &Workspace) -> Result<UiState<'_>> {
    let metrics = ScenarioEngine::new(&workspace.config, workspace.toggles).evaluate_all()?;
    Ok(UiState {
        baseline: &workspace.config.scenario_set.baseline,
        reinvestment_task: &workspace.config.global.reinvestment_task,
        toggles: workspace.toggles,
        metrics,
    })
}

fn print_summary(workspace: &Workspace, metrics: &BTreeMap<ScenarioId, ComputedMetrics>, run_id: &str) {
    let set = &workspace.config.scenario_set;

    println!("=== SCENARIO COMPARISON ===");
    println!("  run_id:       {run_id}");
    println!("  baseline:     {}", set.baseline);
    println!("  reinvest in:  {}", workspace.config.global.reinvestment_task);
    println!();

    for (id, m) in metrics {
        let name = set.scenarios.get(id).map(|s| s.name.as_str()).unwrap_or("?");
        println!("--- {id}: {name} ---");
        println!(
            "  payroll (loaded): ${:.2}  Δ vs baseline: ${:.2}",
            m.payroll_loaded, m.payroll_delta_loaded
        );
        println!(
            "  freed lead hrs:   {:.1}  revenue: ${:.2} (lead ${:.2}, peer ${:.2})",
            m.freed_lead_hours, m.realized_revenue, m.lead_revenue, m.peer_revenue
        );
        println!(
            "  grant offset:     ${:.2} ({} FTE)  arbitrage: ${:.2} (hard ${:.2})",
            m.grant_savings, m.grant_fte_used, m.labor_efficiency_savings, m.hard_labor_savings
        );
        println!(
            "  net monthly:      hard ${:.2}  soft ${:.2}  total ${:.2}",
            m.net_monthly_hard, m.net_monthly_soft, m.net_monthly_total
        );
        if workspace.toggles.include_opportunity_cost {
            println!(
                "  with opp. cost:   ${:.2} (opportunity ${:.2})",
                m.net_monthly_hard_with_opportunity, m.opportunity_cost_monthly
            );
        }
        println!(
            "  annual: ${:.2}  one-time: ${:.2}  year one: ${:.2}  break-even: {:.1} mo",
            m.net_annual_steady_state, m.one_time_cost, m.net_year_one, m.break_even_months
        );
        println!(
            "  supervision: {:.1}h required / {:.1}h capacity  ratio {:.1}  {:?} / {:?}",
            m.required_hours,
            m.actual_supervision_hours,
            m.effective_ratio,
            m.compliance_status,
            m.safety_status
        );
        if !m.risk_factors.is_empty() {
            let labels: Vec<&str> = m.risk_factors.iter().map(|r| r.label()).collect();
            println!("  risks: {}", labels.join(", "));
        }
        println!();
    }
}

fn is_toggle_flag(arg: &str) -> bool {
    matches!(
        arg,
        "--no-revenue" | "--no-retention" | "--no-transition" | "--opportunity-cost"
    )
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
