//! Per-unit combat controller.
//!
//! While a unit stands in the Firing zone and is functional it scans
//! for targets on an interval, tracks its aim toward the current
//! target, and fires single shots gated by its fire rate. Ammunition
//! is debited here; projectiles, damage and effects belong to the
//! weapon collaborator.

use crate::collaborators::{AiBrain, TargetDiscovery, TargetInfo, WeaponRig};
use crate::math::{Fixed, Vec3Fixed};
use crate::unit::{AmmoEvent, CombatState, Unit};

/// Aim tracking gain: the aim direction closes the angle to the
/// target at `AIM_GAIN × Δt` per frame (sub-second convergence).
const AIM_GAIN: i64 = 10;

/// What a combat tick did, for the caller to follow up on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    /// A single shot was started; the caller owes a one-frame-later
    /// `shoot_stop`.
    pub shot_started: bool,
    /// The unit dropped out of the Firing state this tick.
    pub left_firing: bool,
}

/// Move a unit into or out of the Firing combat state based on where
/// it stands and whether it is functional.
///
/// Enter effects: attach the weapon instance (once), activate the
/// brain, reset the scan and fire clocks. Exit effects: stop and
/// destroy the weapon instance, deactivate the brain, drop the target.
pub fn refresh_state(unit: &mut Unit, rig: &mut dyn WeaponRig, brain: &mut dyn AiBrain) {
    // A pending removal does not bar re-entry: a unit replenished
    // during its removal delay fires until the delay expires.
    let should_fire = unit.active && unit.in_firing_zone() && unit.functional();

    match (unit.combat_state, should_fire) {
        (CombatState::Idle, true) => enter_firing(unit, rig, brain),
        (CombatState::Firing, false) => exit_firing(unit, rig, brain),
        _ => {}
    }
}

fn enter_firing(unit: &mut Unit, rig: &mut dyn WeaponRig, brain: &mut dyn AiBrain) {
    if !unit.weapon_attached {
        rig.attach(unit.id, &unit.data.weapon);
        unit.weapon_attached = true;
    }
    brain.activate(unit.id);
    unit.last_scan = None;
    unit.last_fire = None;
    unit.combat_state = CombatState::Firing;
    tracing::debug!(unit = %unit.id, "entered firing state");
}

/// Drop a unit out of combat, releasing its weapon instance.
///
/// Also used by the lifecycle arbiter when a removal is scheduled.
pub fn exit_firing(unit: &mut Unit, rig: &mut dyn WeaponRig, brain: &mut dyn AiBrain) {
    if unit.combat_state != CombatState::Firing {
        return;
    }
    rig.shoot_stop(unit.id);
    if unit.weapon_attached {
        rig.detach(unit.id);
        unit.weapon_attached = false;
    }
    brain.deactivate(unit.id);
    unit.target = None;
    unit.combat_state = CombatState::Idle;
    tracing::debug!(unit = %unit.id, "left firing state");
}

/// Run one combat frame for a unit in the Firing state.
///
/// `now` is the clock reading for this frame, `dt` the frame delta.
/// Raised ammo events are appended to `ammo_events` for the caller to
/// publish.
pub fn combat_tick(
    unit: &mut Unit,
    now: Fixed,
    dt: Fixed,
    targets: &dyn TargetDiscovery,
    rig: &mut dyn WeaponRig,
    brain: &mut dyn AiBrain,
    ammo_events: &mut Vec<AmmoEvent>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    if unit.combat_state != CombatState::Firing {
        return outcome;
    }

    scan_for_target(unit, now, targets);
    aim_at_target(unit, dt, targets);

    // A target that vanished since the last scan must never receive a
    // shot; clear it and wait for the next scan.
    if let Some(target) = unit.target {
        if targets.position_of(target).is_none() {
            unit.target = None;
        }
    }

    let Some(target) = unit.target else {
        return outcome;
    };

    let shot_period = Fixed::from_num(1) / unit.data.fire_rate;
    let gate_open = unit
        .last_fire
        .map_or(true, |last| now - last >= shot_period);
    if !gate_open {
        return outcome;
    }

    if unit.consume_ammo(unit.data.weapon.ammo_per_shot, ammo_events) {
        rig.shoot_start(unit.id, target);
        unit.last_fire = Some(now);
        outcome.shot_started = true;
    } else {
        // Dry pool: the depletion event is already raised, drop out of
        // combat immediately.
        exit_firing(unit, rig, brain);
        outcome.left_firing = true;
    }

    outcome
}

/// Scan for hostiles if the search interval elapsed.
///
/// Keeps the current target while it is still among the results;
/// otherwise picks the nearest candidate (ties break on result
/// order). An empty result clears the target.
fn scan_for_target(unit: &mut Unit, now: Fixed, targets: &dyn TargetDiscovery) {
    let due = unit
        .last_scan
        .map_or(true, |last| now - last >= unit.data.target_search_interval);
    if !due {
        return;
    }
    unit.last_scan = Some(now);

    let hits = targets.overlap_sphere(
        unit.position,
        unit.data.detection_range,
        unit.data.target_layer_mask,
    );
    let visible: Vec<&TargetInfo> = hits
        .iter()
        .filter(|hit| {
            targets.line_of_sight(unit.position, hit.position, unit.data.obstacle_layer_mask)
        })
        .collect();

    if visible.is_empty() {
        unit.target = None;
        return;
    }

    if let Some(current) = unit.target {
        if visible.iter().any(|hit| hit.id == current) {
            return;
        }
    }

    let mut best: Option<(&TargetInfo, Fixed)> = None;
    for hit in visible {
        let dist_sq = unit.position.distance_squared(hit.position);
        let closer = best.map_or(true, |(_, d)| dist_sq < d);
        if closer {
            best = Some((hit, dist_sq));
        }
    }
    unit.target = best.map(|(hit, _)| hit.id);
}

/// Rotate the aim direction toward the current target at a fixed
/// angular gain, converging well inside a second.
fn aim_at_target(unit: &mut Unit, dt: Fixed, targets: &dyn TargetDiscovery) {
    let Some(target) = unit.target else {
        return;
    };
    let Some(target_pos) = targets.position_of(target) else {
        return;
    };

    let desired = (target_pos - unit.position).normalize();
    if desired == Vec3Fixed::ZERO {
        return;
    }

    if unit.aim_dir == Vec3Fixed::ZERO {
        unit.aim_dir = desired;
        return;
    }

    let factor = (Fixed::from_num(AIM_GAIN) * dt).min(Fixed::from_num(1));
    unit.aim_dir = unit.aim_dir.lerp(desired, factor).normalize();
}
