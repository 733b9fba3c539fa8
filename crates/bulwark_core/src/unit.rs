//! Deployable combat units and their storage.
//!
//! A unit owns its ammunition and combat pacing state; the grid owns
//! where it stands, and collaborators own how its shots look. The
//! slot↔unit binding is bidirectional: the slot stores a [`UnitId`]
//! and the unit stores an optional [`SlotCoord`] - only the grid
//! registry updates the two together.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::collaborators::TargetId;
use crate::data::UnitData;
use crate::grid::{SlotCoord, Zone};
use crate::math::{Fixed, Vec3Fixed};

/// Unique identifier for spawned units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u64);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Combat state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatState {
    /// Not engaging: queued, out of the Firing zone, or non-functional.
    #[default]
    Idle,
    /// In the Firing zone, scanning and shooting.
    Firing,
}

/// Health component for damageable units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: u32,
    /// Maximum health points.
    pub max: u32,
}

impl Health {
    /// Create a health component with an explicit starting value.
    #[must_use]
    pub fn with_start(max: u32, start: u32) -> Self {
        Self {
            current: start.min(max),
            max,
        }
    }

    /// Check if the unit is dead (health == 0).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Apply damage, returning actual damage dealt.
    /// Uses saturating subtraction to prevent underflow.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current = self.current.saturating_sub(actual);
        actual
    }

    /// Heal the unit, returning actual amount healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let headroom = self.max.saturating_sub(self.current);
        let actual = amount.min(headroom);
        self.current = self.current.saturating_add(actual);
        actual
    }
}

/// Ammo bookkeeping events raised by [`Unit::consume_ammo`] and
/// [`Unit::add_ammo`]; the simulation maps them onto the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoEvent {
    /// Ammo landed exactly on the low-ammo threshold.
    Low(i32),
    /// Ammo reached zero.
    Depleted,
    /// A depleted pool was refilled above zero.
    Replenished(i32),
}

/// Sentinel stored in `current_ammo` for unlimited pools.
pub const UNLIMITED_AMMO: i32 = -1;

/// A spawned, stateful combat unit.
#[derive(Debug, Clone)]
pub struct Unit {
    /// Identifier assigned by the storage.
    pub id: UnitId,
    /// The static record this unit was spawned from.
    pub data: UnitData,
    /// Back-reference to the slot this unit occupies, if any.
    pub slot: Option<SlotCoord>,
    /// World position; follows the slot except mid-animation.
    pub position: Vec3Fixed,
    /// Health component.
    pub health: Health,
    /// Live ammo counter ([`UNLIMITED_AMMO`] when unlimited).
    pub current_ammo: i32,
    /// Latched once the pool empties; cleared only by replenishment.
    pub out_of_ammo: bool,
    /// Set when health reached zero.
    pub dead: bool,
    /// Latched once a removal is scheduled; never clears.
    pub being_removed: bool,
    /// Whether the unit is live in the world (false once disabled).
    pub active: bool,
    /// Current combat state.
    pub combat_state: CombatState,
    /// Target currently tracked by the combat controller.
    pub target: Option<TargetId>,
    /// Aim direction, normalized (combat controller state).
    pub aim_dir: Vec3Fixed,
    /// Clock time of the last target scan, if any since entering combat.
    pub last_scan: Option<Fixed>,
    /// Clock time of the last shot, if any since entering combat.
    pub last_fire: Option<Fixed>,
    /// Whether a weapon instance is attached via the rig.
    pub weapon_attached: bool,
}

impl Unit {
    /// Create a unit from a validated record at a world position.
    #[must_use]
    pub fn new(id: UnitId, data: UnitData, position: Vec3Fixed) -> Self {
        let current_ammo = if data.unlimited_ammo {
            UNLIMITED_AMMO
        } else {
            data.start_ammo
        };
        let health = Health::with_start(data.max_health, data.start_health);
        Self {
            id,
            data,
            slot: None,
            position,
            health,
            current_ammo,
            out_of_ammo: false,
            dead: false,
            being_removed: false,
            active: true,
            combat_state: CombatState::Idle,
            target: None,
            aim_dir: Vec3Fixed::ZERO,
            last_scan: None,
            last_fire: None,
            weapon_attached: false,
        }
    }

    /// Whether the unit currently occupies a slot in the given zone.
    #[must_use]
    pub fn is_in_zone(&self, zone: Zone) -> bool {
        self.slot.is_some_and(|coord| coord.zone == zone)
    }

    /// Whether this unit can attack (occupies a Firing slot).
    #[must_use]
    pub fn in_firing_zone(&self) -> bool {
        self.is_in_zone(Zone::Firing)
    }

    /// Whether this unit is ready for deployment.
    #[must_use]
    pub fn in_active_zone(&self) -> bool {
        self.is_in_zone(Zone::Active)
    }

    /// Whether this unit waits in the rear queue.
    #[must_use]
    pub fn in_passive_zone(&self) -> bool {
        self.is_in_zone(Zone::Passive)
    }

    /// Alive and not out of ammo.
    #[must_use]
    pub const fn functional(&self) -> bool {
        !self.dead && !self.out_of_ammo
    }

    /// Consume `n` rounds for one shot.
    ///
    /// Returns true when the shot may proceed. Threshold detection is
    /// an equality check: consuming past the threshold in one chunk
    /// does not raise the low-ammo event.
    pub fn consume_ammo(&mut self, n: u32, raised: &mut Vec<AmmoEvent>) -> bool {
        if self.data.unlimited_ammo {
            return true;
        }
        if self.out_of_ammo {
            return false;
        }

        let n = n as i32;
        if self.current_ammo < n {
            self.current_ammo = 0;
            self.out_of_ammo = true;
            raised.push(AmmoEvent::Depleted);
            return false;
        }

        self.current_ammo -= n;
        if self.current_ammo == self.data.low_ammo_threshold {
            raised.push(AmmoEvent::Low(self.current_ammo));
        }
        if self.current_ammo == 0 {
            self.out_of_ammo = true;
            raised.push(AmmoEvent::Depleted);
        }
        true
    }

    /// Add rounds to the pool, clamped to the starting amount.
    ///
    /// Ignored for unlimited pools. Refilling a depleted pool above
    /// zero clears the `out_of_ammo` latch.
    pub fn add_ammo(&mut self, n: u32, raised: &mut Vec<AmmoEvent>) {
        if self.data.unlimited_ammo {
            return;
        }

        self.current_ammo = (self.current_ammo + n as i32).min(self.data.start_ammo);
        if self.out_of_ammo && self.current_ammo > 0 {
            self.out_of_ammo = false;
            raised.push(AmmoEvent::Replenished(self.current_ammo));
        }
    }
}

/// Storage for all spawned units.
///
/// Uses a `HashMap` for O(1) lookup by ID, with deterministic
/// iteration via sorted keys when ticking systems.
#[derive(Debug, Clone, Default)]
pub struct UnitStorage {
    units: HashMap<UnitId, Unit>,
    next_id: u64,
}

impl UnitStorage {
    /// Create empty unit storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: HashMap::new(),
            next_id: 1,
        }
    }

    /// Spawn a unit from a record at a position and return its ID.
    pub fn spawn(&mut self, data: UnitData, position: Vec3Fixed) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.insert(id, Unit::new(id, data, position));
        id
    }

    /// Remove a unit by ID.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// Get a unit by ID.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Get a mutable reference to a unit by ID.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Check if a unit exists.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Get the number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Get sorted unit IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<_> = self.units.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all units (not in deterministic order).
    pub fn iter(&self) -> impl Iterator<Item = (&UnitId, &Unit)> {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_test_utils::fixtures::sample_unit_data;

    fn spawn_test_unit() -> Unit {
        Unit::new(UnitId(1), sample_unit_data(), Vec3Fixed::ZERO)
    }

    #[test]
    fn test_health_with_start_clamps() {
        let health = Health::with_start(100, 120);
        assert_eq!(health.current, 100);

        let health = Health::with_start(100, 60);
        assert_eq!(health.current, 60);
    }

    #[test]
    fn test_apply_damage_saturates() {
        let mut health = Health::with_start(50, 50);
        assert_eq!(health.apply_damage(30), 30);
        assert_eq!(health.apply_damage(100), 20);
        assert!(health.is_dead());
    }

    #[test]
    fn test_consume_ammo_decrements() {
        let mut unit = spawn_test_unit();
        let mut raised = Vec::new();

        let start = unit.current_ammo;
        assert!(unit.consume_ammo(1, &mut raised));
        assert_eq!(unit.current_ammo, start - 1);
        assert!(raised.is_empty());
    }

    #[test]
    fn test_low_ammo_edge_trigger() {
        let mut unit = spawn_test_unit();
        unit.current_ammo = unit.data.low_ammo_threshold + 1;

        let mut raised = Vec::new();
        assert!(unit.consume_ammo(1, &mut raised));
        assert_eq!(
            raised,
            vec![AmmoEvent::Low(unit.data.low_ammo_threshold)]
        );

        // Only fires on the exact transition
        raised.clear();
        assert!(unit.consume_ammo(1, &mut raised));
        assert!(raised.is_empty());
    }

    #[test]
    fn test_chunked_consumption_skips_threshold() {
        let mut unit = spawn_test_unit();
        unit.current_ammo = unit.data.low_ammo_threshold + 1;

        // Jumping over the threshold in one chunk must not raise Low
        let mut raised = Vec::new();
        assert!(unit.consume_ammo(2, &mut raised));
        assert!(raised.is_empty());
    }

    #[test]
    fn test_depletion_latches() {
        let mut unit = spawn_test_unit();
        unit.current_ammo = 1;

        let mut raised = Vec::new();
        assert!(unit.consume_ammo(1, &mut raised));
        assert!(unit.out_of_ammo);
        assert_eq!(raised, vec![AmmoEvent::Depleted]);

        // Further consumption is refused without more events
        raised.clear();
        assert!(!unit.consume_ammo(1, &mut raised));
        assert!(raised.is_empty());
    }

    #[test]
    fn test_insufficient_ammo_zeroes_and_depletes() {
        let mut unit = spawn_test_unit();
        unit.current_ammo = 1;

        let mut raised = Vec::new();
        assert!(!unit.consume_ammo(3, &mut raised));
        assert_eq!(unit.current_ammo, 0);
        assert!(unit.out_of_ammo);
        assert_eq!(raised, vec![AmmoEvent::Depleted]);
    }

    #[test]
    fn test_add_ammo_clamps_and_replenishes() {
        let mut unit = spawn_test_unit();
        unit.current_ammo = 0;
        unit.out_of_ammo = true;

        let mut raised = Vec::new();
        unit.add_ammo(10_000, &mut raised);
        assert_eq!(unit.current_ammo, unit.data.start_ammo);
        assert!(!unit.out_of_ammo);
        assert_eq!(raised, vec![AmmoEvent::Replenished(unit.data.start_ammo)]);
    }

    #[test]
    fn test_unlimited_ammo_never_consumes() {
        let mut data = sample_unit_data();
        data.unlimited_ammo = true;
        let mut unit = Unit::new(UnitId(7), data, Vec3Fixed::ZERO);

        let mut raised = Vec::new();
        for _ in 0..1000 {
            assert!(unit.consume_ammo(5, &mut raised));
        }
        assert_eq!(unit.current_ammo, UNLIMITED_AMMO);
        assert!(raised.is_empty());

        unit.add_ammo(10, &mut raised);
        assert_eq!(unit.current_ammo, UNLIMITED_AMMO);
    }

    #[test]
    fn test_storage_assigns_sequential_ids() {
        let mut storage = UnitStorage::new();
        let a = storage.spawn(sample_unit_data(), Vec3Fixed::ZERO);
        let b = storage.spawn(sample_unit_data(), Vec3Fixed::ZERO);

        assert_ne!(a, b);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.sorted_ids(), vec![a, b]);
    }

    #[test]
    fn test_storage_remove() {
        let mut storage = UnitStorage::new();
        let id = storage.spawn(sample_unit_data(), Vec3Fixed::ZERO);

        assert!(storage.remove(id).is_some());
        assert!(storage.remove(id).is_none());
        assert!(!storage.contains(id));
    }
}
