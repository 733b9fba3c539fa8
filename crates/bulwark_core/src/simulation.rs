//! Core simulation loop.
//!
//! The [`Simulation`] owns every service of the gameplay core - grid
//! registry, unit storage, queue coordinator, event bus, clock and the
//! collaborator seams - and advances them in a fixed order each frame.
//!
//! # Determinism
//!
//! All operations are fully deterministic:
//! - No floating-point math (uses fixed-point via [`Fixed`])
//! - No system randomness
//! - Consistent iteration order (sorted unit IDs)
//! - Same inputs always produce same outputs
//!
//! # Frame Order
//!
//! Each call to [`Simulation::tick`] runs:
//! 1. **Clock** - advance simulation time
//! 2. **Shot stops** - close out shots started one frame earlier
//! 3. **Shift tasks** - lane animations, clearing `animating` when done
//! 4. **Combat** - state refresh, scans, aiming, fire gates
//! 5. **Lifecycle** - schedule removals for dead/dry units
//! 6. **Removals** - release slots whose delay elapsed

use crate::collaborators::{AiBrain, InertBrain, InertRig, InertTargets, TargetDiscovery, WeaponRig};
use crate::combat;
use crate::data::UnitData;
use crate::error::Result;
use crate::events::{CoreEvent, EventBus, RemovalReason};
use crate::grid::{GridConfig, GridRegistry, Zone};
use crate::math::{Fixed, Vec3Fixed};
use crate::queue::QueueCoordinator;
use crate::tasks::{step_shift, RemovalTask, ShiftTask, TimingConfig};
use crate::unit::{AmmoEvent, UnitId, UnitStorage};

/// Monotonic simulation clock in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: Fixed,
}

impl SimClock {
    /// A clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds.
    #[must_use]
    pub fn now(&self) -> Fixed {
        self.now
    }

    /// Advance by a frame delta.
    pub fn advance(&mut self, dt: Fixed) {
        self.now += dt;
    }
}

/// Full configuration for a simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Passive (rear queue) grid.
    pub passive: GridConfig,
    /// Active (ready row) grid.
    pub active: GridConfig,
    /// Firing (combat) grid.
    pub firing: GridConfig,
    /// Width/depth of each cell.
    pub cell_size: Fixed,
    /// Gap between cells.
    pub cell_spacing: Fixed,
    /// Animation and removal pacing.
    pub timing: TimingConfig,
    /// Fill Passive and Active with units at construction.
    pub auto_spawn: bool,
    /// Despawn removed units entirely (false merely disables them).
    pub destroy_on_removal: bool,
    /// Record used for every spawned unit.
    pub unit_data: UnitData,
}

impl SimConfig {
    /// Standard battlefield: Passive 3×3 behind Active 1×3 behind
    /// Firing 2×3, with default cell metrics and timing.
    #[must_use]
    pub fn standard(unit_data: UnitData) -> Self {
        Self {
            passive: GridConfig {
                rows: 3,
                cols: 3,
                center: Vec3Fixed::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_num(-6)),
            },
            active: GridConfig {
                rows: 1,
                cols: 3,
                center: Vec3Fixed::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_num(-3)),
            },
            firing: GridConfig {
                rows: 2,
                cols: 3,
                center: Vec3Fixed::ZERO,
            },
            cell_size: Fixed::from_num(1.5),
            cell_spacing: Fixed::from_num(0.3),
            timing: TimingConfig::default(),
            auto_spawn: true,
            destroy_on_removal: true,
            unit_data,
        }
    }

    /// Validate grid bounds, cell metrics, timing and the unit record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CoreError`] describing the first
    /// violation found.
    pub fn validate(&self) -> Result<()> {
        self.passive.validate(Zone::Passive)?;
        self.active.validate(Zone::Active)?;
        self.firing.validate(Zone::Firing)?;
        if self.cell_size <= Fixed::ZERO {
            return Err(crate::error::CoreError::InvalidConfig(
                "cell_size must be positive".to_string(),
            ));
        }
        if self.cell_spacing < Fixed::ZERO
            || self.timing.animation_delay < Fixed::ZERO
            || self.timing.animation_duration < Fixed::ZERO
            || self.timing.removal_delay < Fixed::ZERO
        {
            return Err(crate::error::CoreError::InvalidConfig(
                "spacing and timing values must not be negative".to_string(),
            ));
        }
        self.unit_data.clone().validated()?;
        Ok(())
    }
}

/// The core game simulation.
///
/// Owns all gameplay state and advances it deterministically. The
/// whole core is single-threaded cooperative: long-running animations
/// and delayed removals are tasks polled once per frame, and between
/// polls all work is synchronous.
pub struct Simulation {
    config: SimConfig,
    clock: SimClock,
    grid: GridRegistry,
    units: UnitStorage,
    coordinator: QueueCoordinator,
    events: EventBus,
    targets: Box<dyn TargetDiscovery>,
    rig: Box<dyn WeaponRig>,
    brain: Box<dyn AiBrain>,
    shifts: Vec<ShiftTask>,
    removals: Vec<RemovalTask>,
    pending_shot_stops: Vec<UnitId>,
}

impl Simulation {
    /// Create a simulation with inert collaborators.
    ///
    /// Combat will be a no-op: scans find nothing and shots go
    /// nowhere. Useful for queue-only setups and tests.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid.
    pub fn new(config: SimConfig) -> Result<Self> {
        tracing::error!(
            "no target discovery or weapon rig attached; combat will be inert"
        );
        Self::with_collaborators(
            config,
            Box::new(InertTargets),
            Box::new(InertRig),
            None,
        )
    }

    /// Create a simulation with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid.
    pub fn with_collaborators(
        config: SimConfig,
        targets: Box<dyn TargetDiscovery>,
        rig: Box<dyn WeaponRig>,
        brain: Option<Box<dyn AiBrain>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut grid = GridRegistry::new(config.cell_size, config.cell_spacing);
        grid.init(&config.passive, &config.active, &config.firing);

        let mut sim = Self {
            config,
            clock: SimClock::new(),
            grid,
            units: UnitStorage::new(),
            coordinator: QueueCoordinator::new(),
            events: EventBus::new(),
            targets,
            rig,
            brain: brain.unwrap_or_else(|| Box::new(InertBrain)),
            shifts: Vec::new(),
            removals: Vec::new(),
            pending_shot_stops: Vec::new(),
        };

        if sim.config.auto_spawn {
            sim.spawn_initial();
        }
        Ok(sim)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current simulation time in seconds.
    #[must_use]
    pub fn now(&self) -> Fixed {
        self.clock.now()
    }

    /// The grid registry.
    #[must_use]
    pub fn grid(&self) -> &GridRegistry {
        &self.grid
    }

    /// The unit storage.
    #[must_use]
    pub fn units(&self) -> &UnitStorage {
        &self.units
    }

    /// The queue coordinator state.
    #[must_use]
    pub fn coordinator(&self) -> &QueueCoordinator {
        &self.coordinator
    }

    /// Whether a lane shift is animating (input is blocked).
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.coordinator.is_animating()
    }

    /// Event bus for subscribing UI callbacks.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // ========================================================================
    // Spawning and teardown
    // ========================================================================

    /// Fill every empty Passive and Active slot with a fresh unit.
    ///
    /// Units are never auto-created in the Firing zone.
    pub fn spawn_initial(&mut self) {
        for zone in [Zone::Passive, Zone::Active] {
            let coords: Vec<_> = self
                .grid
                .empty_slots(zone)
                .into_iter()
                .map(|slot| slot.coord())
                .collect();
            for coord in coords {
                let position = self
                    .grid
                    .grid_to_world(coord.zone, coord.row, coord.col)
                    .unwrap_or(Vec3Fixed::ZERO);
                let id = self.units.spawn(self.config.unit_data.clone(), position);
                if self
                    .grid
                    .place(&mut self.units, &mut self.events, id, coord.zone, coord.row, coord.col)
                {
                    self.coordinator.track(id);
                } else {
                    tracing::warn!(%id, slot = %coord.label(), "failed to place spawned unit");
                    self.units.remove(id);
                }
            }
        }
        tracing::debug!(
            spawned = self.coordinator.roster().len(),
            "initial units spawned in Passive and Active zones"
        );
    }

    /// Remove and despawn every tracked unit.
    pub fn clear_all(&mut self) {
        let roster: Vec<_> = self.coordinator.roster().to_vec();
        let count = roster.len();
        for unit in roster {
            if self.units.get(unit).and_then(|u| u.slot).is_some() {
                self.grid.remove(&mut self.units, &mut self.events, unit);
            }
            self.units.remove(unit);
            self.coordinator.untrack(unit);
            self.events.publish(&CoreEvent::UnitRemoved {
                unit,
                reason: RemovalReason::Cleared,
            });
        }
        self.coordinator.set_selected(None);
        self.events.publish(&CoreEvent::RosterCleared { count });
        tracing::debug!(count, "cleared all units");
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Route a click on a unit.
    ///
    /// Ignored while animating and for units outside the Active zone.
    /// A valid click selects the unit and immediately deploys it to
    /// the leftmost empty Firing slot.
    pub fn handle_click(&mut self, unit: UnitId) {
        if self.coordinator.is_animating() {
            tracing::debug!(%unit, "click ignored: animation in progress");
            return;
        }
        if !self.units.get(unit).is_some_and(|u| u.in_active_zone()) {
            tracing::debug!(%unit, "click ignored: unit not in Active zone");
            return;
        }

        if let Some(previous) = self.coordinator.selected() {
            if previous != unit {
                self.events
                    .publish(&CoreEvent::UnitDeselected { unit: previous });
            }
        }
        self.coordinator.set_selected(Some(unit));
        self.events.publish(&CoreEvent::UnitSelected { unit });

        self.deploy();
    }

    /// Deploy the selected unit to the Firing zone and start the lane
    /// shift for the column it vacated.
    fn deploy(&mut self) {
        let Some(unit) = self.coordinator.selected() else {
            tracing::debug!("no unit selected for deployment");
            return;
        };

        let Some(firing_coord) = self.grid.leftmost_empty(Zone::Firing) else {
            tracing::debug!(%unit, "no empty slots in Firing zone, deployment cancelled");
            self.drop_selection(unit);
            return;
        };

        // Capture the lane and origin before unbinding.
        let lane = self.grid.unit_lane(&self.units, unit);
        let Some(old_coord) = self.units.get(unit).and_then(|u| u.slot) else {
            tracing::debug!(%unit, "selected unit lost its slot, deployment cancelled");
            self.drop_selection(unit);
            return;
        };

        if !self.grid.remove(&mut self.units, &mut self.events, unit) {
            tracing::error!(%unit, "failed to remove unit from Active zone");
            self.drop_selection(unit);
            return;
        }

        let placed = self.grid.place(
            &mut self.units,
            &mut self.events,
            unit,
            firing_coord.zone,
            firing_coord.row,
            firing_coord.col,
        );
        if !placed {
            tracing::error!(%unit, "failed to place unit in Firing zone, restoring");
            self.grid.place(
                &mut self.units,
                &mut self.events,
                unit,
                old_coord.zone,
                old_coord.row,
                old_coord.col,
            );
            self.drop_selection(unit);
            return;
        }

        let lane = lane.unwrap_or(old_coord.col);
        self.events.publish(&CoreEvent::UnitDeployed {
            unit,
            from: old_coord,
            to: firing_coord,
            lane,
        });
        self.drop_selection(unit);

        self.coordinator.set_animating(true);
        self.shifts
            .push(ShiftTask::new(lane, &self.config.timing));
        self.events.publish(&CoreEvent::LaneShiftStarted { lane });
        tracing::debug!(
            %unit,
            from = %old_coord.label(),
            to = %firing_coord.label(),
            lane,
            "unit deployed"
        );
    }

    fn drop_selection(&mut self, unit: UnitId) {
        self.events.publish(&CoreEvent::UnitDeselected { unit });
        self.coordinator.set_selected(None);
    }

    // ========================================================================
    // External health/ammo surface
    // ========================================================================

    /// Apply damage to a unit (the health collaborator's inbound
    /// surface). A unit whose health reaches zero dies; the lifecycle
    /// arbiter schedules its removal on the next tick.
    pub fn damage_unit(&mut self, unit: UnitId, amount: u32) -> bool {
        let Some(state) = self.units.get_mut(unit) else {
            tracing::warn!(%unit, "cannot damage unknown unit");
            return false;
        };
        state.health.apply_damage(amount);
        if state.health.is_dead() && !state.dead {
            state.dead = true;
            tracing::debug!(%unit, "unit died");
        }
        true
    }

    /// Heal a unit. Healing a dead unit above zero health revives it.
    pub fn heal_unit(&mut self, unit: UnitId, amount: u32) -> bool {
        let Some(state) = self.units.get_mut(unit) else {
            tracing::warn!(%unit, "cannot heal unknown unit");
            return false;
        };
        state.health.heal(amount);
        if state.dead && state.health.current > 0 {
            state.dead = false;
            tracing::debug!(%unit, "unit revived");
        }
        true
    }

    /// Grant ammo to a unit. Replenishing a dry pool lets the unit
    /// re-enter the Firing state immediately if it stands in the
    /// Firing zone.
    pub fn add_ammo(&mut self, unit: UnitId, amount: u32) -> bool {
        let Some(state) = self.units.get_mut(unit) else {
            tracing::warn!(%unit, "cannot add ammo to unknown unit");
            return false;
        };
        let mut raised = Vec::new();
        state.add_ammo(amount, &mut raised);
        combat::refresh_state(state, &mut *self.rig, &mut *self.brain);
        self.publish_ammo_events(unit, &raised);
        true
    }

    // ========================================================================
    // Frame advance
    // ========================================================================

    /// Advance the simulation by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: Fixed) {
        self.clock.advance(dt);
        let now = self.clock.now();

        // 1. Close out shots started last frame (single-shot mode).
        for unit in std::mem::take(&mut self.pending_shot_stops) {
            self.rig.shoot_stop(unit);
        }

        // 2. Lane shift tasks.
        self.step_shifts(dt);

        // 3. Combat.
        self.run_combat(now, dt);

        // 4. Lifecycle arbiter.
        self.arbitrate_lifecycle();

        // 5. Delayed removals.
        self.step_removals(dt);
    }

    fn step_shifts(&mut self, dt: Fixed) {
        if self.shifts.is_empty() {
            return;
        }
        let timing = self.config.timing;
        let grid = &mut self.grid;
        let units = &mut self.units;
        let events = &mut self.events;
        self.shifts
            .retain_mut(|task| !step_shift(task, dt, &timing, grid, units, events));
        if self.shifts.is_empty() {
            self.coordinator.set_animating(false);
        }
    }

    fn run_combat(&mut self, now: Fixed, dt: Fixed) {
        for id in self.units.sorted_ids() {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };

            combat::refresh_state(unit, &mut *self.rig, &mut *self.brain);

            let mut raised = Vec::new();
            let outcome = combat::combat_tick(
                unit,
                now,
                dt,
                &*self.targets,
                &mut *self.rig,
                &mut *self.brain,
                &mut raised,
            );
            if outcome.shot_started {
                self.pending_shot_stops.push(id);
            }
            self.publish_ammo_events(id, &raised);
        }
    }

    /// React to the first of death or ammo depletion per unit by
    /// scheduling a delayed removal. Further terminal events on a unit
    /// already pending removal are ignored.
    fn arbitrate_lifecycle(&mut self) {
        let timing = self.config.timing;
        for id in self.units.sorted_ids() {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            if unit.health.is_dead() {
                unit.dead = true;
            }
            if unit.being_removed || !unit.active || unit.functional() {
                continue;
            }

            unit.being_removed = true;
            combat::exit_firing(unit, &mut *self.rig, &mut *self.brain);
            let reason = if unit.dead {
                RemovalReason::Died
            } else {
                RemovalReason::OutOfAmmo
            };
            self.removals.push(RemovalTask::new(id, reason, &timing));
            tracing::debug!(unit = %id, %reason, "removal scheduled");
        }
    }

    fn step_removals(&mut self, dt: Fixed) {
        let mut finished = Vec::new();
        self.removals.retain_mut(|task| {
            if task.tick(dt) {
                finished.push(*task);
                false
            } else {
                true
            }
        });
        for task in finished {
            self.finalize_removal(task.unit, task.reason);
        }
    }

    fn finalize_removal(&mut self, unit: UnitId, reason: RemovalReason) {
        if let Some(state) = self.units.get_mut(unit) {
            combat::exit_firing(state, &mut *self.rig, &mut *self.brain);
        }
        if self.units.get(unit).and_then(|u| u.slot).is_some() {
            self.grid.remove(&mut self.units, &mut self.events, unit);
        }
        self.coordinator.untrack(unit);

        if self.config.destroy_on_removal {
            self.units.remove(unit);
        } else if let Some(state) = self.units.get_mut(unit) {
            state.active = false;
        }

        self.events.publish(&CoreEvent::UnitRemoved { unit, reason });
        tracing::debug!(%unit, %reason, "unit removed");
    }

    fn publish_ammo_events(&mut self, unit: UnitId, raised: &[AmmoEvent]) {
        for event in raised {
            match event {
                AmmoEvent::Low(remaining) => {
                    self.events.publish(&CoreEvent::AmmoLow {
                        unit,
                        remaining: *remaining,
                    });
                }
                AmmoEvent::Depleted => {
                    self.events.publish(&CoreEvent::AmmoDepleted { unit });
                }
                AmmoEvent::Replenished(remaining) => {
                    tracing::debug!(%unit, remaining, "ammo replenished");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_test_utils::fixtures::{fixed_f, sample_unit_data};

    fn standard_sim() -> Simulation {
        Simulation::new(SimConfig::standard(sample_unit_data())).unwrap()
    }

    #[test]
    fn test_auto_spawn_fills_passive_and_active() {
        let sim = standard_sim();
        assert_eq!(sim.grid().occupied_count(Zone::Passive), 9);
        assert_eq!(sim.grid().occupied_count(Zone::Active), 3);
        assert_eq!(sim.grid().occupied_count(Zone::Firing), 0);
        assert_eq!(sim.coordinator().roster().len(), 12);
    }

    #[test]
    fn test_spawn_initial_is_guarded_by_occupancy() {
        let mut sim = standard_sim();
        let before = sim.units().len();
        // All slots already taken: nothing new appears
        sim.spawn_initial();
        assert_eq!(sim.units().len(), before);
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let mut config = SimConfig::standard(sample_unit_data());
        config.passive.rows = 9;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_click_outside_active_zone_ignored() {
        let mut sim = standard_sim();
        let passive_unit = sim.grid().units_in(Zone::Passive)[0];

        sim.handle_click(passive_unit);
        assert_eq!(sim.grid().occupied_count(Zone::Firing), 0);
        assert!(!sim.is_animating());
    }

    #[test]
    fn test_click_deploys_to_leftmost_firing_slot() {
        let mut sim = standard_sim();
        let active_unit = sim.grid().units_in(Zone::Active)[1];

        sim.handle_click(active_unit);
        assert_eq!(
            sim.grid().slot(Zone::Firing, 0, 0).unwrap().occupant(),
            Some(active_unit)
        );
        assert!(sim.is_animating());
        assert_eq!(sim.coordinator().selected(), None);
    }

    #[test]
    fn test_damage_to_death_schedules_removal() {
        let mut sim = standard_sim();
        let victim = sim.grid().units_in(Zone::Active)[0];

        sim.damage_unit(victim, 10_000);
        let dt = fixed_f(0.1);
        sim.tick(dt); // lifecycle schedules removal

        // Still present through the removal delay (default 1s)
        sim.tick(dt);
        assert!(sim.units().contains(victim));

        for _ in 0..10 {
            sim.tick(dt);
        }
        assert!(!sim.units().contains(victim));
        assert!(!sim.coordinator().roster().contains(&victim));
    }

    #[test]
    fn test_disabled_unit_survives_removal_when_not_destroying() {
        let mut config = SimConfig::standard(sample_unit_data());
        config.destroy_on_removal = false;
        let mut sim = Simulation::new(config).unwrap();
        let victim = sim.grid().units_in(Zone::Active)[0];

        sim.damage_unit(victim, 10_000);
        for _ in 0..15 {
            sim.tick(fixed_f(0.1));
        }

        let unit = sim.units().get(victim).unwrap();
        assert!(!unit.active);
        assert_eq!(unit.slot, None);
        assert!(unit.being_removed);
    }

    #[test]
    fn test_heal_revives_dead_unit() {
        let mut sim = standard_sim();
        let victim = sim.grid().units_in(Zone::Passive)[0];

        sim.damage_unit(victim, 10_000);
        assert!(sim.units().get(victim).unwrap().dead);

        sim.heal_unit(victim, 50);
        assert!(!sim.units().get(victim).unwrap().dead);
    }

    #[test]
    fn test_clear_all_empties_roster() {
        let mut sim = standard_sim();
        sim.clear_all();

        assert_eq!(sim.units().len(), 0);
        assert!(sim.coordinator().roster().is_empty());
        for zone in Zone::ALL {
            assert_eq!(sim.grid().occupied_count(zone), 0);
        }
    }
}
