//! Scenario loading and configuration.
//!
//! Scenarios define a battlefield layout, the unit record to spawn,
//! and a timed script of player clicks and enemy activity. They are
//! written in RON with plain decimal numbers; values are converted to
//! fixed-point once at load time, so identical files always produce
//! identical simulations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bulwark_core::collaborators::LayerMask;
use bulwark_core::data::{ProjectileSpec, UnitClass, UnitData, WeaponData};
use bulwark_core::grid::GridConfig;
use bulwark_core::math::{Fixed, Vec3Fixed};
use bulwark_core::simulation::SimConfig;
use bulwark_core::tasks::TimingConfig;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The scenario produced an invalid simulation config.
    #[error("Invalid scenario: {0}")]
    InvalidConfig(#[from] bulwark_core::error::CoreError),
}

/// One zone's grid layout in plain numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSpec {
    /// Rows, front to back.
    pub rows: usize,
    /// Columns, left to right.
    pub cols: usize,
    /// Zone center in world space.
    pub center: (f64, f64, f64),
}

impl GridSpec {
    fn to_config(self) -> GridConfig {
        GridConfig {
            rows: self.rows,
            cols: self.cols,
            center: Vec3Fixed::new(
                Fixed::from_num(self.center.0),
                Fixed::from_num(self.center.1),
                Fixed::from_num(self.center.2),
            ),
        }
    }
}

/// Weapon record in plain numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Weapon display name.
    pub name: String,
    /// Damage per shot.
    pub damage_per_shot: u32,
    /// Ammo consumed per shot.
    pub ammo_per_shot: u32,
}

/// Unit record in plain numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Unit display name.
    pub name: String,
    /// Maximum health.
    pub max_health: u32,
    /// Starting health.
    pub start_health: u32,
    /// Whether ammo is unlimited.
    #[serde(default)]
    pub unlimited_ammo: bool,
    /// Starting ammo pool.
    pub start_ammo: i32,
    /// Low-ammo warning threshold.
    pub low_ammo_threshold: i32,
    /// Detection range in meters.
    pub detection_range: f64,
    /// Seconds between target scans.
    pub target_search_interval: f64,
    /// Shots per second.
    pub fire_rate: f64,
    /// Weapon carried by the unit.
    pub weapon: WeaponSpec,
}

impl UnitSpec {
    fn to_unit_data(&self) -> UnitData {
        UnitData {
            name: self.name.clone(),
            class: UnitClass::Ranged,
            icon: String::new(),
            description: String::new(),
            max_health: self.max_health,
            start_health: self.start_health,
            unlimited_ammo: self.unlimited_ammo,
            start_ammo: self.start_ammo,
            low_ammo_threshold: self.low_ammo_threshold,
            detection_range: Fixed::from_num(self.detection_range),
            target_search_interval: Fixed::from_num(self.target_search_interval),
            fire_rate: Fixed::from_num(self.fire_rate),
            target_layer_mask: LayerMask::new(1),
            obstacle_layer_mask: LayerMask::NONE,
            weapon: WeaponData {
                name: self.weapon.name.clone(),
                kind: Default::default(),
                description: String::new(),
                damage_per_shot: self.weapon.damage_per_shot,
                damage_kind: Default::default(),
                ammo_per_shot: self.weapon.ammo_per_shot,
                projectile: ProjectileSpec::default(),
            },
        }
    }
}

/// A scripted action at a point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Action {
    /// Click the unit standing in the Active row of this lane.
    ClickLane {
        /// Column index to deploy from.
        lane: usize,
    },
    /// Spawn an enemy target.
    SpawnTarget {
        /// Stable target id for later script steps.
        id: u64,
        /// World position (x, y, z).
        at: (f64, f64, f64),
    },
    /// Destroy a previously spawned target.
    KillTarget {
        /// Target id from an earlier `SpawnTarget`.
        id: u64,
    },
    /// Damage the unit standing in a Firing-zone cell.
    DamageFiringUnit {
        /// Firing-zone row.
        row: usize,
        /// Firing-zone column.
        col: usize,
        /// Damage amount.
        amount: u32,
    },
}

/// One timed step of the scenario script.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Simulation time in seconds at which the action fires.
    pub at: f64,
    /// The action to perform.
    pub action: Action,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Passive zone layout.
    pub passive: GridSpec,
    /// Active zone layout.
    pub active: GridSpec,
    /// Firing zone layout.
    pub firing: GridSpec,
    /// Cell width/depth.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Gap between cells.
    #[serde(default = "default_cell_spacing")]
    pub cell_spacing: f64,
    /// Pause before a lane shift starts.
    #[serde(default = "default_animation_delay")]
    pub animation_delay: f64,
    /// Duration of the shift movement.
    #[serde(default = "default_animation_duration")]
    pub animation_duration: f64,
    /// Delay between a terminal event and slot release.
    #[serde(default = "default_removal_delay")]
    pub removal_delay: f64,
    /// Simulation frames per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// How long to run, in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// The record used for every spawned unit.
    pub unit: UnitSpec,
    /// Timed script of clicks and enemy activity.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

const fn default_tick_rate() -> u32 {
    60
}

const fn default_duration() -> f64 {
    10.0
}

const fn default_cell_size() -> f64 {
    1.5
}

const fn default_cell_spacing() -> f64 {
    0.3
}

const fn default_animation_delay() -> f64 {
    0.2
}

const fn default_animation_duration() -> f64 {
    0.3
}

const fn default_removal_delay() -> f64 {
    1.0
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "Default Skirmish".to_string(),
            description: "Three deployments against a pair of pushing enemies".to_string(),
            passive: GridSpec {
                rows: 3,
                cols: 3,
                center: (0.0, 0.0, -6.0),
            },
            active: GridSpec {
                rows: 1,
                cols: 3,
                center: (0.0, 0.0, -3.0),
            },
            firing: GridSpec {
                rows: 2,
                cols: 3,
                center: (0.0, 0.0, 0.0),
            },
            cell_size: default_cell_size(),
            cell_spacing: default_cell_spacing(),
            animation_delay: default_animation_delay(),
            animation_duration: default_animation_duration(),
            removal_delay: default_removal_delay(),
            tick_rate: default_tick_rate(),
            duration: default_duration(),
            unit: UnitSpec {
                name: "Vanguard".to_string(),
                max_health: 100,
                start_health: 100,
                unlimited_ammo: false,
                start_ammo: 30,
                low_ammo_threshold: 10,
                detection_range: 20.0,
                target_search_interval: 0.5,
                fire_rate: 2.0,
                weapon: WeaponSpec {
                    name: "Trusty Rifle".to_string(),
                    damage_per_shot: 10,
                    ammo_per_shot: 1,
                },
            },
            script: vec![
                ScriptStep {
                    at: 0.5,
                    action: Action::SpawnTarget {
                        id: 1,
                        at: (0.0, 0.0, 6.0),
                    },
                },
                ScriptStep {
                    at: 0.5,
                    action: Action::SpawnTarget {
                        id: 2,
                        at: (2.0, 0.0, 7.0),
                    },
                },
                ScriptStep {
                    at: 1.0,
                    action: Action::ClickLane { lane: 1 },
                },
                ScriptStep {
                    at: 2.0,
                    action: Action::ClickLane { lane: 0 },
                },
                ScriptStep {
                    at: 4.0,
                    action: Action::KillTarget { id: 1 },
                },
                ScriptStep {
                    at: 5.0,
                    action: Action::ClickLane { lane: 2 },
                },
            ],
        }
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] on a missing file or parse failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ParseError`] on malformed RON.
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Build the simulation config this scenario describes.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidConfig`] when the grids or the
    /// unit record fail core validation.
    pub fn to_sim_config(&self) -> Result<SimConfig, ScenarioError> {
        let config = SimConfig {
            passive: self.passive.to_config(),
            active: self.active.to_config(),
            firing: self.firing.to_config(),
            cell_size: Fixed::from_num(self.cell_size),
            cell_spacing: Fixed::from_num(self.cell_spacing),
            timing: TimingConfig {
                animation_delay: Fixed::from_num(self.animation_delay),
                animation_duration: Fixed::from_num(self.animation_duration),
                removal_delay: Fixed::from_num(self.removal_delay),
            },
            auto_spawn: true,
            destroy_on_removal: true,
            unit_data: self.unit.to_unit_data().validated()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Script steps sorted by firing time.
    #[must_use]
    pub fn sorted_script(&self) -> Vec<ScriptStep> {
        let mut steps = self.script.clone();
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        steps
    }
}
