//! Deployment queue coordination.
//!
//! The coordinator owns the pieces of global state that gate player
//! input: the animating flag, the pending selection and the roster of
//! spawned units. The lane-shift planner lives here too; executing a
//! plan is the job of [`crate::tasks`].

use crate::grid::{GridRegistry, SlotCoord, Zone};
use crate::math::Vec3Fixed;
use crate::unit::{UnitId, UnitStorage};

/// One planned move of a lane shift: a unit, where it leaves, where it
/// lands, and the world positions to interpolate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveStep {
    /// The unit to move.
    pub unit: UnitId,
    /// Slot the unit leaves.
    pub from: SlotCoord,
    /// Slot the unit lands in.
    pub to: SlotCoord,
    /// World position at plan time.
    pub start_pos: Vec3Fixed,
    /// World position of the target slot.
    pub end_pos: Vec3Fixed,
}

/// Global queue state: animating flag, selection, roster.
///
/// While `animating` is true no click, deployment or new shift may
/// begin; the flag is owned here and toggled only by shift tasks.
#[derive(Debug, Clone, Default)]
pub struct QueueCoordinator {
    animating: bool,
    selected: Option<UnitId>,
    roster: Vec<UnitId>,
}

impl QueueCoordinator {
    /// Create an idle coordinator with an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a lane shift is currently animating (input is blocked).
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub(crate) fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// The unit currently selected for deployment, if any.
    #[must_use]
    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, unit: Option<UnitId>) {
        self.selected = unit;
    }

    /// Every unit the coordinator has spawned and still tracks.
    #[must_use]
    pub fn roster(&self) -> &[UnitId] {
        &self.roster
    }

    /// Start tracking a spawned unit.
    pub(crate) fn track(&mut self, unit: UnitId) {
        self.roster.push(unit);
    }

    /// Notification hook: drop a removed unit from the roster.
    pub(crate) fn untrack(&mut self, unit: UnitId) {
        self.roster.retain(|&id| id != unit);
        if self.selected == Some(unit) {
            self.selected = None;
        }
    }

    /// Roster units currently standing in a zone.
    #[must_use]
    pub fn roster_in_zone(&self, units: &UnitStorage, zone: Zone) -> Vec<UnitId> {
        self.roster
            .iter()
            .copied()
            .filter(|&id| units.get(id).is_some_and(|u| u.is_in_zone(zone)))
            .collect()
    }
}

/// Build the upward shift plan for a lane.
///
/// Returns an empty plan when the lane's Active slot is occupied or
/// missing. Rows are processed bottom-to-top, so by the time a unit
/// vacates its source slot, its target has already been claimed by a
/// move earlier in the plan or was empty to begin with; plan execution
/// relies on removal preceding placement within each move.
#[must_use]
pub fn build_lane_shift_plan(
    grid: &GridRegistry,
    units: &UnitStorage,
    lane: usize,
) -> Vec<MoveStep> {
    let mut plan = Vec::new();

    let Some(active_slot) = grid.slot(Zone::Active, 0, lane) else {
        return plan;
    };
    if active_slot.is_occupied() {
        // Nothing vacated this lane; no shift needed.
        return plan;
    }
    let active_coord = active_slot.coord();

    let passive_rows = grid.rows(Zone::Passive);
    for row in (0..passive_rows).rev() {
        let Some(slot) = grid.slot(Zone::Passive, row, lane) else {
            continue;
        };
        let Some(unit) = slot.occupant() else {
            continue;
        };
        let from = slot.coord();
        let to = if row == 0 {
            active_coord
        } else {
            SlotCoord::new(Zone::Passive, row - 1, lane)
        };
        let Some(end_pos) = grid.grid_to_world(to.zone, to.row, to.col) else {
            continue;
        };
        let Some(start_pos) = units.get(unit).map(|u| u.position) else {
            continue;
        };

        plan.push(MoveStep {
            unit,
            from,
            to,
            start_pos,
            end_pos,
        });
    }

    plan
}
