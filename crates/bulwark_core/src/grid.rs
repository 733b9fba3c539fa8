//! Three-zone battlefield grid and slot occupancy registry.
//!
//! The registry is the only place that mutates slot↔unit bindings.
//! Every operation is total: invalid input is logged and reported as
//! failure, never panicked on.
//!
//! Coordinate system: row 0 is the front (closest to enemies), column
//! 0 is leftmost. Columns run along x, rows along z around each
//! zone's center.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::events::{CoreEvent, EventBus};
use crate::math::{Fixed, Vec3Fixed};
use crate::unit::{UnitId, UnitStorage};

/// The three grid zones. Units progress Passive → Active → Firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Rear queue; auto-shifts units upward toward the Active row.
    Passive,
    /// Ready row; the player deploys units from here.
    Active,
    /// Combat area; units here auto-fire at enemies.
    Firing,
}

impl Zone {
    /// All zones, in progression order.
    pub const ALL: [Zone; 3] = [Zone::Passive, Zone::Active, Zone::Firing];

    /// Single-letter prefix used in coordinate labels.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Zone::Passive => 'P',
            Zone::Active => 'A',
            Zone::Firing => 'F',
        }
    }
}

/// Dimensions and placement of one zone's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows (front to back).
    pub rows: usize,
    /// Number of columns (left to right).
    pub cols: usize,
    /// Center of the zone in world space.
    pub center: Vec3Fixed,
}

impl GridConfig {
    /// Check the dimension bounds (1..=5 rows and columns).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] when a dimension is out of
    /// bounds.
    pub fn validate(&self, zone: Zone) -> Result<()> {
        if !(1..=5).contains(&self.rows) || !(1..=5).contains(&self.cols) {
            return Err(CoreError::InvalidConfig(format!(
                "{:?} grid must be 1..=5 x 1..=5, got {}x{}",
                zone, self.rows, self.cols
            )));
        }
        Ok(())
    }
}

/// Address of a slot: zone plus row/column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotCoord {
    /// Which zone the slot belongs to.
    pub zone: Zone,
    /// Row index (0 = front).
    pub row: usize,
    /// Column index (0 = left).
    pub col: usize,
}

impl SlotCoord {
    /// Create a coordinate triple.
    #[must_use]
    pub const fn new(zone: Zone, row: usize, col: usize) -> Self {
        Self { zone, row, col }
    }

    /// Coordinate label for diagnostics, e.g. `F[0,1]`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}[{},{}]", self.zone.prefix(), self.row, self.col)
    }
}

/// A fixed cell in a zone with a stable world position and an
/// optional occupant. Coordinates and position never change after
/// construction; only the occupant reference mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    coord: SlotCoord,
    world_pos: Vec3Fixed,
    occupant: Option<UnitId>,
}

impl Slot {
    fn new(coord: SlotCoord, world_pos: Vec3Fixed) -> Self {
        Self {
            coord,
            world_pos,
            occupant: None,
        }
    }

    /// The slot's address.
    #[must_use]
    pub const fn coord(&self) -> SlotCoord {
        self.coord
    }

    /// World-space center of this slot.
    #[must_use]
    pub const fn world_pos(&self) -> Vec3Fixed {
        self.world_pos
    }

    /// Unit currently occupying this slot, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Whether a unit stands here.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Whether this slot is free.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Row-major slot array for one zone.
#[derive(Debug, Clone)]
struct ZoneGrid {
    rows: usize,
    cols: usize,
    slots: Vec<Slot>,
}

impl ZoneGrid {
    fn build(zone: Zone, config: &GridConfig, step: Fixed) -> Self {
        let mut slots = Vec::with_capacity(config.rows * config.cols);
        for row in 0..config.rows {
            for col in 0..config.cols {
                let coord = SlotCoord::new(zone, row, col);
                let pos = slot_world_position(row, col, config, step);
                slots.push(Slot::new(coord, pos));
            }
        }
        Self {
            rows: config.rows,
            cols: config.cols,
            slots,
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    fn slot(&self, row: usize, col: usize) -> Option<&Slot> {
        self.index(row, col).map(|i| &self.slots[i])
    }

    fn slot_mut(&mut self, row: usize, col: usize) -> Option<&mut Slot> {
        self.index(row, col).map(move |i| &mut self.slots[i])
    }
}

/// Compute the world position of a cell.
///
/// Row 0 sits at the front (largest z offset); column 0 at the left
/// (smallest x offset). `step` is cell size plus spacing.
fn slot_world_position(row: usize, col: usize, config: &GridConfig, step: Fixed) -> Vec3Fixed {
    let half = Fixed::from_num(2);
    let col_offset =
        (Fixed::from_num(col as i64) - Fixed::from_num(config.cols as i64 - 1) / half) * step;
    let row_offset =
        (Fixed::from_num(config.rows as i64 - 1) / half - Fixed::from_num(row as i64)) * step;
    Vec3Fixed::new(
        config.center.x + col_offset,
        config.center.y,
        config.center.z + row_offset,
    )
}

/// Authoritative store of slot occupancy across the three zones.
#[derive(Debug, Clone)]
pub struct GridRegistry {
    cell_size: Fixed,
    cell_spacing: Fixed,
    grids: Option<[ZoneGrid; 3]>,
}

impl GridRegistry {
    /// Create an uninitialized registry with the given cell metrics.
    #[must_use]
    pub fn new(cell_size: Fixed, cell_spacing: Fixed) -> Self {
        Self {
            cell_size,
            cell_spacing,
            grids: None,
        }
    }

    /// Whether the three zone grids have been built.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.grids.is_some()
    }

    /// Build the three zone grids. A second call is a silent no-op.
    pub fn init(&mut self, passive: &GridConfig, active: &GridConfig, firing: &GridConfig) {
        if self.grids.is_some() {
            tracing::debug!("grid registry already initialized, ignoring init");
            return;
        }
        let step = self.cell_size + self.cell_spacing;
        self.grids = Some([
            ZoneGrid::build(Zone::Passive, passive, step),
            ZoneGrid::build(Zone::Active, active, step),
            ZoneGrid::build(Zone::Firing, firing, step),
        ]);
        tracing::debug!(
            passive = ?(passive.rows, passive.cols),
            active = ?(active.rows, active.cols),
            firing = ?(firing.rows, firing.cols),
            "grid registry initialized"
        );
    }

    fn zone_grid(&self, zone: Zone) -> Option<&ZoneGrid> {
        self.grids.as_ref().map(|grids| match zone {
            Zone::Passive => &grids[0],
            Zone::Active => &grids[1],
            Zone::Firing => &grids[2],
        })
    }

    fn zone_grid_mut(&mut self, zone: Zone) -> Option<&mut ZoneGrid> {
        self.grids.as_mut().map(|grids| match zone {
            Zone::Passive => &mut grids[0],
            Zone::Active => &mut grids[1],
            Zone::Firing => &mut grids[2],
        })
    }

    /// Row count for a zone (0 when uninitialized).
    #[must_use]
    pub fn rows(&self, zone: Zone) -> usize {
        self.zone_grid(zone).map_or(0, |g| g.rows)
    }

    /// Column count for a zone (0 when uninitialized).
    #[must_use]
    pub fn cols(&self, zone: Zone) -> usize {
        self.zone_grid(zone).map_or(0, |g| g.cols)
    }

    /// Whether row/col addresses a real cell in the zone.
    #[must_use]
    pub fn is_valid(&self, zone: Zone, row: usize, col: usize) -> bool {
        self.zone_grid(zone)
            .is_some_and(|g| row < g.rows && col < g.cols)
    }

    /// Bounds-checked slot lookup.
    #[must_use]
    pub fn slot(&self, zone: Zone, row: usize, col: usize) -> Option<&Slot> {
        let Some(grid) = self.zone_grid(zone) else {
            tracing::warn!(?zone, "grid not initialized");
            return None;
        };
        let slot = grid.slot(row, col);
        if slot.is_none() {
            tracing::warn!(?zone, row, col, "invalid slot position");
        }
        slot
    }

    /// World position of a cell, if it exists.
    #[must_use]
    pub fn grid_to_world(&self, zone: Zone, row: usize, col: usize) -> Option<Vec3Fixed> {
        self.slot(zone, row, col).map(Slot::world_pos)
    }

    /// Row/column of the slot nearest to a world point, or `None` when
    /// the zone is uninitialized.
    #[must_use]
    pub fn world_to_grid(&self, zone: Zone, point: Vec3Fixed) -> Option<(usize, usize)> {
        let grid = self.zone_grid(zone)?;
        let mut best: Option<((usize, usize), Fixed)> = None;
        for slot in &grid.slots {
            let dist_sq = point.distance_squared(slot.world_pos);
            let closer = best.map_or(true, |(_, d)| dist_sq < d);
            if closer {
                best = Some(((slot.coord.row, slot.coord.col), dist_sq));
            }
        }
        best.map(|(coord, _)| coord)
    }

    /// Place a unit in a specific cell.
    ///
    /// Rejects unknown units, invalid cells and occupied cells. A unit
    /// already standing elsewhere is unbound from its previous slot
    /// first; on success the unit is teleported onto the cell.
    pub fn place(
        &mut self,
        units: &mut UnitStorage,
        events: &mut EventBus,
        unit: UnitId,
        zone: Zone,
        row: usize,
        col: usize,
    ) -> bool {
        if !units.contains(unit) {
            tracing::warn!(%unit, "cannot place unknown unit");
            return false;
        }
        let Some(slot) = self.slot(zone, row, col) else {
            return false;
        };
        let coord = slot.coord();
        if let Some(occupant) = slot.occupant() {
            tracing::warn!(
                slot = %coord.label(),
                %occupant,
                "slot already occupied"
            );
            return false;
        }

        // Unbind from the previous slot, if any.
        if let Some(prev) = units.get(unit).and_then(|u| u.slot) {
            if let Some(prev_slot) = self
                .zone_grid_mut(prev.zone)
                .and_then(|g| g.slot_mut(prev.row, prev.col))
            {
                prev_slot.occupant = None;
                events.publish(&CoreEvent::SlotCleared { coord: prev, unit });
            }
        }

        let world_pos = {
            // Slot existence was checked above.
            let slot = self
                .zone_grid_mut(zone)
                .and_then(|g| g.slot_mut(row, col))
                .expect("slot bounds already validated");
            slot.occupant = Some(unit);
            slot.world_pos
        };

        if let Some(unit_state) = units.get_mut(unit) {
            unit_state.slot = Some(coord);
            unit_state.position = world_pos;
        }

        events.publish(&CoreEvent::SlotOccupied { coord, unit });
        tracing::debug!(%unit, slot = %coord.label(), "placed unit");
        true
    }

    /// Place a unit in the first empty slot of a zone, scanning
    /// row-major from the front-left.
    pub fn try_place_in_zone(
        &mut self,
        units: &mut UnitStorage,
        events: &mut EventBus,
        unit: UnitId,
        zone: Zone,
    ) -> bool {
        let Some(coord) = self.leftmost_empty(zone) else {
            tracing::warn!(?zone, "no empty slots in zone");
            return false;
        };
        self.place(units, events, unit, coord.zone, coord.row, coord.col)
    }

    /// Unbind a unit from its current slot.
    ///
    /// Does not despawn or move the unit.
    pub fn remove(&mut self, units: &mut UnitStorage, events: &mut EventBus, unit: UnitId) -> bool {
        let Some(coord) = units.get(unit).and_then(|u| u.slot) else {
            tracing::warn!(%unit, "unit is not in any slot");
            return false;
        };

        if let Some(slot) = self
            .zone_grid_mut(coord.zone)
            .and_then(|g| g.slot_mut(coord.row, coord.col))
        {
            slot.occupant = None;
        }
        if let Some(unit_state) = units.get_mut(unit) {
            unit_state.slot = None;
        }

        events.publish(&CoreEvent::SlotCleared { coord, unit });
        tracing::debug!(%unit, slot = %coord.label(), "removed unit");
        true
    }

    /// Unbind whichever unit occupies the given cell.
    pub fn remove_at(
        &mut self,
        units: &mut UnitStorage,
        events: &mut EventBus,
        zone: Zone,
        row: usize,
        col: usize,
    ) -> bool {
        let Some(occupant) = self.slot(zone, row, col).and_then(Slot::occupant) else {
            tracing::warn!(?zone, row, col, "no unit to remove at cell");
            return false;
        };
        self.remove(units, events, occupant)
    }

    /// All slots of a zone in row-major order (empty when uninitialized).
    #[must_use]
    pub fn all_slots(&self, zone: Zone) -> Vec<&Slot> {
        self.zone_grid(zone)
            .map_or_else(Vec::new, |g| g.slots.iter().collect())
    }

    /// All occupied slots of a zone in row-major order.
    #[must_use]
    pub fn occupied_slots(&self, zone: Zone) -> Vec<&Slot> {
        self.all_slots(zone)
            .into_iter()
            .filter(|s| s.is_occupied())
            .collect()
    }

    /// All empty slots of a zone in row-major order.
    #[must_use]
    pub fn empty_slots(&self, zone: Zone) -> Vec<&Slot> {
        self.all_slots(zone)
            .into_iter()
            .filter(|s| s.is_empty())
            .collect()
    }

    /// Units currently standing in a zone, in row-major slot order.
    #[must_use]
    pub fn units_in(&self, zone: Zone) -> Vec<UnitId> {
        self.occupied_slots(zone)
            .into_iter()
            .filter_map(Slot::occupant)
            .collect()
    }

    /// Number of occupied slots in a zone.
    #[must_use]
    pub fn occupied_count(&self, zone: Zone) -> usize {
        self.occupied_slots(zone).len()
    }

    /// Number of empty slots in a zone.
    #[must_use]
    pub fn empty_count(&self, zone: Zone) -> usize {
        self.empty_slots(zone).len()
    }

    /// Empty slot nearest to a world point. Ties break on row-major
    /// scan order.
    #[must_use]
    pub fn nearest_empty(&self, zone: Zone, point: Vec3Fixed) -> Option<SlotCoord> {
        let mut best: Option<(SlotCoord, Fixed)> = None;
        for slot in self.empty_slots(zone) {
            let dist_sq = point.distance_squared(slot.world_pos);
            let closer = best.map_or(true, |(_, d)| dist_sq < d);
            if closer {
                best = Some((slot.coord, dist_sq));
            }
        }
        best.map(|(coord, _)| coord)
    }

    /// First empty slot in row-major order (front row first, left to
    /// right).
    #[must_use]
    pub fn leftmost_empty(&self, zone: Zone) -> Option<SlotCoord> {
        self.empty_slots(zone).first().map(|s| s.coord)
    }

    /// Units occupying the given column of a zone, front row first.
    #[must_use]
    pub fn lane_units(&self, zone: Zone, col: usize) -> Vec<UnitId> {
        let Some(grid) = self.zone_grid(zone) else {
            return Vec::new();
        };
        if col >= grid.cols {
            tracing::warn!(?zone, col, "lane index out of bounds");
            return Vec::new();
        }
        (0..grid.rows)
            .filter_map(|row| grid.slot(row, col).and_then(Slot::occupant))
            .collect()
    }

    /// Column of the slot a unit occupies, if any.
    #[must_use]
    pub fn unit_lane(&self, units: &UnitStorage, unit: UnitId) -> Option<usize> {
        units.get(unit).and_then(|u| u.slot).map(|coord| coord.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_test_utils::fixtures::{fixed, sample_unit_data};

    fn test_configs() -> (GridConfig, GridConfig, GridConfig) {
        (
            GridConfig {
                rows: 3,
                cols: 3,
                center: Vec3Fixed::new(fixed(0), fixed(0), fixed(-6)),
            },
            GridConfig {
                rows: 1,
                cols: 3,
                center: Vec3Fixed::new(fixed(0), fixed(0), fixed(-3)),
            },
            GridConfig {
                rows: 2,
                cols: 3,
                center: Vec3Fixed::new(fixed(0), fixed(0), fixed(0)),
            },
        )
    }

    fn build_registry() -> GridRegistry {
        let (passive, active, firing) = test_configs();
        let mut registry = GridRegistry::new(Fixed::from_num(1.5), Fixed::from_num(0.3));
        registry.init(&passive, &active, &firing);
        registry
    }

    fn spawn(units: &mut UnitStorage) -> UnitId {
        units.spawn(sample_unit_data(), Vec3Fixed::ZERO)
    }

    #[test]
    fn test_init_is_idempotent() {
        let (passive, active, firing) = test_configs();
        let mut registry = build_registry();

        let before = registry.slot(Zone::Passive, 0, 0).copied();
        registry.init(&passive, &active, &firing);
        assert_eq!(registry.slot(Zone::Passive, 0, 0).copied(), before);
        assert_eq!(registry.rows(Zone::Firing), 2);
    }

    #[test]
    fn test_slot_positions_follow_grid_formula() {
        let registry = build_registry();
        let step = Fixed::from_num(1.5) + Fixed::from_num(0.3);

        // Passive is 3x3 centered at z = -6: the middle cell sits on
        // the center, the front-left cell one step forward-left.
        let center = registry.slot(Zone::Passive, 1, 1).unwrap().world_pos();
        assert_eq!(center, Vec3Fixed::new(fixed(0), fixed(0), fixed(-6)));

        let front_left = registry.slot(Zone::Passive, 0, 0).unwrap().world_pos();
        assert_eq!(front_left.x, fixed(0) - step);
        assert_eq!(front_left.z, fixed(-6) + step);
    }

    #[test]
    fn test_world_to_grid_round_trip() {
        let registry = build_registry();
        for zone in Zone::ALL {
            for row in 0..registry.rows(zone) {
                for col in 0..registry.cols(zone) {
                    let pos = registry.grid_to_world(zone, row, col).unwrap();
                    assert_eq!(registry.world_to_grid(zone, pos), Some((row, col)));
                }
            }
        }
    }

    #[test]
    fn test_world_to_grid_uninitialized() {
        let registry = GridRegistry::new(Fixed::from_num(1.5), Fixed::from_num(0.3));
        assert_eq!(registry.world_to_grid(Zone::Active, Vec3Fixed::ZERO), None);
    }

    #[test]
    fn test_place_binds_both_directions() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let id = spawn(&mut units);

        assert!(registry.place(&mut units, &mut events, id, Zone::Active, 0, 1));

        let slot = registry.slot(Zone::Active, 0, 1).unwrap();
        assert_eq!(slot.occupant(), Some(id));
        let unit = units.get(id).unwrap();
        assert_eq!(unit.slot, Some(SlotCoord::new(Zone::Active, 0, 1)));
        assert_eq!(unit.position, slot.world_pos());
    }

    #[test]
    fn test_place_rejects_occupied_slot() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let first = spawn(&mut units);
        let second = spawn(&mut units);

        assert!(registry.place(&mut units, &mut events, first, Zone::Firing, 0, 0));
        assert!(!registry.place(&mut units, &mut events, second, Zone::Firing, 0, 0));
        assert_eq!(
            registry.slot(Zone::Firing, 0, 0).unwrap().occupant(),
            Some(first)
        );
        assert_eq!(units.get(second).unwrap().slot, None);
    }

    #[test]
    fn test_place_clears_previous_slot() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let id = spawn(&mut units);

        assert!(registry.place(&mut units, &mut events, id, Zone::Passive, 2, 0));
        assert!(registry.place(&mut units, &mut events, id, Zone::Passive, 1, 0));

        assert!(registry.slot(Zone::Passive, 2, 0).unwrap().is_empty());
        assert_eq!(
            registry.slot(Zone::Passive, 1, 0).unwrap().occupant(),
            Some(id)
        );
    }

    #[test]
    fn test_place_rejects_out_of_bounds() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let id = spawn(&mut units);

        assert!(!registry.place(&mut units, &mut events, id, Zone::Active, 1, 0));
        assert!(!registry.place(&mut units, &mut events, id, Zone::Active, 0, 3));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let id = spawn(&mut units);

        registry.place(&mut units, &mut events, id, Zone::Active, 0, 0);
        assert!(registry.remove(&mut units, &mut events, id));
        // Second removal finds no slot and leaves the registry unchanged
        assert!(!registry.remove(&mut units, &mut events, id));
        assert_eq!(registry.occupied_count(Zone::Active), 0);
        assert_eq!(units.get(id).unwrap().slot, None);
    }

    #[test]
    fn test_remove_at_resolves_occupant() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();
        let id = spawn(&mut units);

        registry.place(&mut units, &mut events, id, Zone::Passive, 1, 2);
        assert!(registry.remove_at(&mut units, &mut events, Zone::Passive, 1, 2));
        assert!(!registry.remove_at(&mut units, &mut events, Zone::Passive, 1, 2));
    }

    #[test]
    fn test_leftmost_empty_row_major() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();

        assert_eq!(
            registry.leftmost_empty(Zone::Firing),
            Some(SlotCoord::new(Zone::Firing, 0, 0))
        );

        let id = spawn(&mut units);
        registry.place(&mut units, &mut events, id, Zone::Firing, 0, 0);
        assert_eq!(
            registry.leftmost_empty(Zone::Firing),
            Some(SlotCoord::new(Zone::Firing, 0, 1))
        );
    }

    #[test]
    fn test_nearest_empty_prefers_closest() {
        let registry = build_registry();
        let probe = registry.grid_to_world(Zone::Passive, 2, 2).unwrap();
        assert_eq!(
            registry.nearest_empty(Zone::Passive, probe),
            Some(SlotCoord::new(Zone::Passive, 2, 2))
        );
    }

    #[test]
    fn test_units_in_zone_matches_bindings() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();

        let a = spawn(&mut units);
        let b = spawn(&mut units);
        registry.place(&mut units, &mut events, a, Zone::Passive, 0, 0);
        registry.place(&mut units, &mut events, b, Zone::Passive, 2, 1);

        let in_zone = registry.units_in(Zone::Passive);
        assert_eq!(in_zone, vec![a, b]);
        assert_eq!(registry.occupied_count(Zone::Passive), 2);
        assert_eq!(registry.empty_count(Zone::Passive), 7);
    }

    #[test]
    fn test_lane_units_front_first() {
        let mut registry = build_registry();
        let mut units = UnitStorage::new();
        let mut events = EventBus::new();

        let back = spawn(&mut units);
        let front = spawn(&mut units);
        registry.place(&mut units, &mut events, back, Zone::Passive, 2, 1);
        registry.place(&mut units, &mut events, front, Zone::Passive, 0, 1);

        assert_eq!(registry.lane_units(Zone::Passive, 1), vec![front, back]);
        assert_eq!(registry.lane_units(Zone::Passive, 0), Vec::new());
        assert_eq!(registry.unit_lane(&units, front), Some(1));
    }

    #[test]
    fn test_grid_config_bounds() {
        let config = GridConfig {
            rows: 6,
            cols: 3,
            center: Vec3Fixed::ZERO,
        };
        assert!(config.validate(Zone::Passive).is_err());

        let config = GridConfig {
            rows: 0,
            cols: 3,
            center: Vec3Fixed::ZERO,
        };
        assert!(config.validate(Zone::Passive).is_err());
    }
}
