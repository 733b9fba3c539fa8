//! # Bulwark Core
//!
//! Deterministic gameplay core for the Bulwark tower-defense layer.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO (beyond explicit data-record loaders)
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! Deployable units occupy cells across three zones (Passive, Active,
//! Firing), advance through a lane-based upward queue, and - once in
//! the Firing zone - autonomously acquire targets and fire, subject to
//! ammunition, health and fire-rate constraints. Rendering, input
//! routing, physics and projectile effects live behind the
//! [`collaborators`] seams.
//!
//! ## Crate Structure
//!
//! - [`grid`] - three-zone slot registry and occupancy invariants
//! - [`queue`] - deployment coordination and the lane-shift planner
//! - [`unit`] - unit state, health and ammunition accounting
//! - [`combat`] - per-tick target acquisition, aiming and fire gating
//! - [`tasks`] - cooperative animation and removal tasks
//! - [`simulation`] - the owning service and frame loop
//! - [`data`] - RON-loaded unit and weapon records
//! - [`events`] - observable event bus for UI layers
//! - [`math`] - fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod collaborators;
pub mod combat;
pub mod data;
pub mod error;
pub mod events;
pub mod grid;
pub mod math;
pub mod queue;
pub mod simulation;
pub mod tasks;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::collaborators::{
        AiBrain, LayerMask, TargetDiscovery, TargetId, TargetInfo, WeaponRig, WeaponState,
    };
    pub use crate::data::{UnitClass, UnitData, WeaponData};
    pub use crate::error::{CoreError, Result};
    pub use crate::events::{CoreEvent, EventBus, RemovalReason, SubscriptionId};
    pub use crate::grid::{GridConfig, GridRegistry, Slot, SlotCoord, Zone};
    pub use crate::math::{Fixed, Vec3Fixed};
    pub use crate::queue::QueueCoordinator;
    pub use crate::simulation::{SimConfig, Simulation};
    pub use crate::tasks::TimingConfig;
    pub use crate::unit::{CombatState, Unit, UnitId, UnitStorage};
}
