//! Staffing scenario engine: payroll, supervisory load, compliance,
//! revenue and one-time cost derivations for clinical-supervision
//! restructuring scenarios, plus the config and cache plumbing around it.

pub mod command;
pub mod compliance_subsystem;
pub mod config;
pub mod engine;
pub mod error;
pub mod load_subsystem;
pub mod merge;
pub mod metrics;
pub mod onboarding_subsystem;
pub mod payroll_subsystem;
pub mod rates;
pub mod revenue_subsystem;
pub mod store;
pub mod types;
