//! Scenario runner: drives a simulation through a scripted timeline
//! and collects a summary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bulwark_core::collaborators::{
    LayerMask, TargetDiscovery, TargetId, TargetInfo, WeaponRig,
};
use bulwark_core::data::WeaponData;
use bulwark_core::events::CoreEvent;
use bulwark_core::grid::Zone;
use bulwark_core::math::{Fixed, Vec3Fixed};
use bulwark_core::simulation::Simulation;
use bulwark_core::unit::UnitId;

use crate::scenario::{Action, Scenario, ScenarioError};

/// Scripted enemy field: targets appear and disappear on schedule.
#[derive(Debug, Clone, Default)]
pub struct TargetField {
    targets: Rc<RefCell<BTreeMap<u64, Vec3Fixed>>>,
}

impl TargetField {
    /// Create an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(&self, id: u64, position: Vec3Fixed) {
        self.targets.borrow_mut().insert(id, position);
    }

    fn kill(&self, id: u64) {
        self.targets.borrow_mut().remove(&id);
    }

    /// Number of targets still standing.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.targets.borrow().len()
    }
}

impl TargetDiscovery for TargetField {
    fn overlap_sphere(
        &self,
        center: Vec3Fixed,
        radius: Fixed,
        _mask: LayerMask,
    ) -> Vec<TargetInfo> {
        let radius_sq = radius * radius;
        self.targets
            .borrow()
            .iter()
            .filter(|(_, &pos)| center.distance_squared(pos) <= radius_sq)
            .map(|(&id, &pos)| TargetInfo {
                id: TargetId(id),
                position: pos,
            })
            .collect()
    }

    fn position_of(&self, target: TargetId) -> Option<Vec3Fixed> {
        self.targets.borrow().get(&target.0).copied()
    }
}

/// Weapon rig that counts shots per unit.
#[derive(Debug, Clone, Default)]
pub struct CountingRig {
    shots: Rc<RefCell<BTreeMap<u64, u64>>>,
}

impl CountingRig {
    /// Create a rig with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shots fired by all units.
    #[must_use]
    pub fn total_shots(&self) -> u64 {
        self.shots.borrow().values().sum()
    }
}

impl WeaponRig for CountingRig {
    fn attach(&mut self, unit: UnitId, weapon: &WeaponData) {
        tracing::debug!(%unit, weapon = %weapon.name, "weapon attached");
    }

    fn detach(&mut self, unit: UnitId) {
        tracing::debug!(%unit, "weapon detached");
    }

    fn shoot_start(&mut self, unit: UnitId, target: TargetId) {
        *self.shots.borrow_mut().entry(unit.0).or_insert(0) += 1;
        tracing::debug!(%unit, target = target.0, "shot fired");
    }

    fn shoot_stop(&mut self, _unit: UnitId) {}

    fn state(&self, _unit: UnitId) -> bulwark_core::collaborators::WeaponState {
        bulwark_core::collaborators::WeaponState::Idle
    }
}

/// Counters accumulated from the event stream.
#[derive(Debug, Clone, Copy, Default)]
struct EventCounters {
    deployed: u64,
    shifts_completed: u64,
    ammo_low: u64,
    ammo_depleted: u64,
    removed: u64,
}

/// Result of a scenario run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Scenario name.
    pub name: String,
    /// Frames simulated.
    pub ticks: u64,
    /// Simulated seconds.
    pub seconds: f64,
    /// Total shots fired.
    pub shots: u64,
    /// Deployments performed.
    pub deployed: u64,
    /// Lane shifts completed.
    pub shifts_completed: u64,
    /// Low-ammo warnings raised.
    pub ammo_low: u64,
    /// Ammo pools emptied.
    pub ammo_depleted: u64,
    /// Units removed.
    pub removed: u64,
    /// Enemy targets still standing at the end.
    pub targets_left: usize,
    /// Final occupancy per zone (Passive, Active, Firing).
    pub occupancy: (usize, usize, usize),
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario: {}", self.name)?;
        writeln!(f, "  simulated: {} frames ({:.2}s)", self.ticks, self.seconds)?;
        writeln!(f, "  deployments: {}", self.deployed)?;
        writeln!(f, "  lane shifts: {}", self.shifts_completed)?;
        writeln!(f, "  shots fired: {}", self.shots)?;
        writeln!(
            f,
            "  ammo: {} low warnings, {} depleted",
            self.ammo_low, self.ammo_depleted
        )?;
        writeln!(f, "  units removed: {}", self.removed)?;
        writeln!(f, "  targets left: {}", self.targets_left)?;
        write!(
            f,
            "  occupancy: passive {}, active {}, firing {}",
            self.occupancy.0, self.occupancy.1, self.occupancy.2
        )
    }
}

/// Run a scenario to completion.
///
/// # Errors
///
/// Returns [`ScenarioError`] when the scenario fails validation.
pub fn run_scenario(scenario: &Scenario) -> Result<RunSummary, ScenarioError> {
    let config = scenario.to_sim_config()?;

    let field = TargetField::new();
    let rig = CountingRig::new();
    let mut sim = Simulation::with_collaborators(
        config,
        Box::new(field.clone()),
        Box::new(rig.clone()),
        None,
    )?;

    let counters = Rc::new(RefCell::new(EventCounters::default()));
    let sink = Rc::clone(&counters);
    sim.events_mut().subscribe(move |event| {
        log_event(event);
        let mut counters = sink.borrow_mut();
        match event {
            CoreEvent::UnitDeployed { .. } => counters.deployed += 1,
            CoreEvent::LaneShiftCompleted { .. } => counters.shifts_completed += 1,
            CoreEvent::AmmoLow { .. } => counters.ammo_low += 1,
            CoreEvent::AmmoDepleted { .. } => counters.ammo_depleted += 1,
            CoreEvent::UnitRemoved { .. } => counters.removed += 1,
            _ => {}
        }
    });

    let dt = Fixed::from_num(1) / Fixed::from_num(scenario.tick_rate.max(1));
    let script = scenario.sorted_script();
    let mut next_step = 0;
    let total_ticks = (scenario.duration * f64::from(scenario.tick_rate.max(1))).ceil() as u64;

    for tick in 0..total_ticks {
        let now = f64::from(u32::try_from(tick).unwrap_or(u32::MAX))
            / f64::from(scenario.tick_rate.max(1));
        while next_step < script.len() && script[next_step].at <= now {
            apply_action(&mut sim, &field, script[next_step].action);
            next_step += 1;
        }
        sim.tick(dt);
    }

    let counters = *counters.borrow();
    Ok(RunSummary {
        name: scenario.name.clone(),
        ticks: total_ticks,
        seconds: scenario.duration,
        shots: rig.total_shots(),
        deployed: counters.deployed,
        shifts_completed: counters.shifts_completed,
        ammo_low: counters.ammo_low,
        ammo_depleted: counters.ammo_depleted,
        removed: counters.removed,
        targets_left: field.live_count(),
        occupancy: (
            sim.grid().occupied_count(Zone::Passive),
            sim.grid().occupied_count(Zone::Active),
            sim.grid().occupied_count(Zone::Firing),
        ),
    })
}

fn apply_action(sim: &mut Simulation, field: &TargetField, action: Action) {
    match action {
        Action::ClickLane { lane } => {
            let occupant = sim
                .grid()
                .slot(Zone::Active, 0, lane)
                .and_then(|slot| slot.occupant());
            match occupant {
                Some(unit) => sim.handle_click(unit),
                None => tracing::warn!(lane, "scripted click on an empty Active slot"),
            }
        }
        Action::SpawnTarget { id, at } => {
            field.spawn(
                id,
                Vec3Fixed::new(
                    Fixed::from_num(at.0),
                    Fixed::from_num(at.1),
                    Fixed::from_num(at.2),
                ),
            );
            tracing::info!(id, "target spawned");
        }
        Action::KillTarget { id } => {
            field.kill(id);
            tracing::info!(id, "target killed");
        }
        Action::DamageFiringUnit { row, col, amount } => {
            let occupant = sim
                .grid()
                .slot(Zone::Firing, row, col)
                .and_then(|slot| slot.occupant());
            match occupant {
                Some(unit) => {
                    sim.damage_unit(unit, amount);
                }
                None => tracing::warn!(row, col, "scripted damage on an empty Firing slot"),
            }
        }
    }
}

fn log_event(event: &CoreEvent) {
    match event {
        CoreEvent::UnitDeployed { unit, to, lane, .. } => {
            tracing::info!(%unit, to = %to.label(), lane, "deployed");
        }
        CoreEvent::LaneShiftCompleted { lane, moved } => {
            tracing::info!(lane, moved, "lane shift complete");
        }
        CoreEvent::AmmoLow { unit, remaining } => {
            tracing::info!(%unit, remaining, "ammo low");
        }
        CoreEvent::AmmoDepleted { unit } => {
            tracing::info!(%unit, "ammo depleted");
        }
        CoreEvent::UnitRemoved { unit, reason } => {
            tracing::info!(%unit, %reason, "unit removed");
        }
        _ => tracing::debug!(?event, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_runs() {
        let scenario = Scenario::default();
        let summary = run_scenario(&scenario).unwrap();

        assert_eq!(summary.ticks, 600);
        assert_eq!(summary.deployed, 3);
        assert!(summary.shots > 0, "deployed units should have fired");
        // One target is scripted to die, one survives
        assert_eq!(summary.targets_left, 1);
        // Three deployments leave three units in the Firing zone
        assert_eq!(summary.occupancy.2, 3);
    }

    #[test]
    fn test_second_click_mid_animation_is_ignored() {
        let mut scenario = Scenario::default();
        scenario.script = vec![crate::scenario::ScriptStep {
            at: 0.1,
            action: Action::ClickLane { lane: 0 },
        }];
        // Clicking twice in a row: the second click lands mid-animation
        scenario.script.push(crate::scenario::ScriptStep {
            at: 0.11,
            action: Action::ClickLane { lane: 0 },
        });

        let summary = run_scenario(&scenario).unwrap();
        assert_eq!(summary.deployed, 1);
    }
}
