//! Headless scenario runner for the Bulwark gameplay core.
//!
//! Runs the grid/queue/combat simulation without graphics, driven by a
//! RON scenario file. This enables:
//!
//! - **CI verification**: automated checks of queue and combat logic
//! - **Balancing runs**: quick DPS/ammo-lifetime experiments
//! - **Manual inspection**: event logs via `tracing` on stderr
//!
//! # Example
//!
//! ```bash
//! # Run the built-in skirmish
//! cargo run -p bulwark_headless
//!
//! # Run a scenario file with verbose event logs
//! cargo run -p bulwark_headless -- --scenario scenarios/rush.ron --verbose
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
pub mod scenario;

pub use runner::{run_scenario, CountingRig, RunSummary, TargetField};
pub use scenario::{Action, Scenario, ScenarioError, ScriptStep};
