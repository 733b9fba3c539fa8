//! Cooperative tasks driven by the simulation clock.
//!
//! Lane-shift animation and delayed removals are state machines over
//! (elapsed, duration), polled once per frame on the simulation
//! thread. They never observe state racing with other tasks: between
//! polls all work is synchronous.

use crate::events::{CoreEvent, EventBus, RemovalReason};
use crate::grid::GridRegistry;
use crate::math::Fixed;
use crate::queue::{build_lane_shift_plan, MoveStep};
use crate::unit::{UnitId, UnitStorage};

/// Durations for the animated parts of the queue flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Pause between a deployment and the start of its lane shift.
    pub animation_delay: Fixed,
    /// Duration of each unit's movement interpolation.
    pub animation_duration: Fixed,
    /// Pause between a terminal event and the slot release.
    pub removal_delay: Fixed,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            animation_delay: Fixed::from_num(0.2),
            animation_duration: Fixed::from_num(0.3),
            removal_delay: Fixed::from_num(1),
        }
    }
}

/// One move under execution, with its abort flag.
#[derive(Debug, Clone)]
struct PlannedMove {
    step: MoveStep,
    aborted: bool,
}

#[derive(Debug, Clone)]
enum ShiftPhase {
    /// Waiting out the pre-shift delay; the plan is built when it ends.
    Delay { remaining: Fixed },
    /// All moves animating simultaneously.
    Animating {
        elapsed: Fixed,
        moves: Vec<PlannedMove>,
    },
}

/// A lane shift in progress.
///
/// The plan is deliberately built only after the delay elapses, against
/// the occupancy at that moment.
#[derive(Debug, Clone)]
pub struct ShiftTask {
    lane: usize,
    phase: ShiftPhase,
}

impl ShiftTask {
    /// Start a shift for a lane, beginning with the pre-shift delay.
    #[must_use]
    pub fn new(lane: usize, timing: &TimingConfig) -> Self {
        Self {
            lane,
            phase: ShiftPhase::Delay {
                remaining: timing.animation_delay,
            },
        }
    }

    /// The lane this task shifts.
    #[must_use]
    pub fn lane(&self) -> usize {
        self.lane
    }
}

/// Advance a shift task by one frame. Returns true when the task is
/// finished and the animating flag may clear.
pub fn step_shift(
    task: &mut ShiftTask,
    dt: Fixed,
    timing: &TimingConfig,
    grid: &mut GridRegistry,
    units: &mut UnitStorage,
    events: &mut EventBus,
) -> bool {
    match &mut task.phase {
        ShiftPhase::Delay { remaining } => {
            *remaining -= dt;
            if *remaining > Fixed::ZERO {
                return false;
            }

            let plan = build_lane_shift_plan(grid, units, task.lane);
            if plan.is_empty() {
                tracing::debug!(lane = task.lane, "lane has no units to shift");
                events.publish(&CoreEvent::LaneShiftCompleted {
                    lane: task.lane,
                    moved: 0,
                });
                return true;
            }

            tracing::debug!(lane = task.lane, moves = plan.len(), "lane shift begins");
            let mut moves = Vec::with_capacity(plan.len());
            for step in plan {
                // Each move vacates its source before anyone interpolates.
                let removed = grid.remove(units, events, step.unit);
                if !removed {
                    tracing::error!(
                        unit = %step.unit,
                        from = %step.from.label(),
                        "failed to vacate slot during shift, aborting move"
                    );
                }
                moves.push(PlannedMove {
                    step,
                    aborted: !removed,
                });
            }
            task.phase = ShiftPhase::Animating {
                elapsed: Fixed::ZERO,
                moves,
            };
            false
        }
        ShiftPhase::Animating { elapsed, moves } => {
            *elapsed += dt;
            let duration = timing.animation_duration;

            if duration > Fixed::ZERO && *elapsed < duration {
                let t = *elapsed / duration;
                for planned in moves.iter().filter(|m| !m.aborted) {
                    if let Some(unit) = units.get_mut(planned.step.unit) {
                        unit.position = planned.step.start_pos.lerp(planned.step.end_pos, t);
                    }
                }
                return false;
            }

            // Snap to the end position and claim the target slots.
            let mut moved = 0;
            for planned in moves.iter().filter(|m| !m.aborted) {
                let step = planned.step;
                if let Some(unit) = units.get_mut(step.unit) {
                    unit.position = step.end_pos;
                }
                let placed = grid.place(units, events, step.unit, step.to.zone, step.to.row, step.to.col);
                if placed {
                    moved += 1;
                } else {
                    tracing::error!(
                        unit = %step.unit,
                        to = %step.to.label(),
                        "failed to claim slot at end of shift"
                    );
                }
            }

            events.publish(&CoreEvent::LaneShiftCompleted {
                lane: task.lane,
                moved,
            });
            tracing::debug!(lane = task.lane, moved, "lane shift complete");
            true
        }
    }
}

/// A scheduled unit removal counting down its delay.
#[derive(Debug, Clone, Copy)]
pub struct RemovalTask {
    /// The unit pending removal.
    pub unit: UnitId,
    /// Why the unit is being removed.
    pub reason: RemovalReason,
    remaining: Fixed,
}

impl RemovalTask {
    /// Schedule a removal after the configured delay.
    #[must_use]
    pub fn new(unit: UnitId, reason: RemovalReason, timing: &TimingConfig) -> Self {
        Self {
            unit,
            reason,
            remaining: timing.removal_delay,
        }
    }

    /// Count down; returns true once the delay has fully elapsed.
    pub fn tick(&mut self, dt: Fixed) -> bool {
        self.remaining -= dt;
        self.remaining <= Fixed::ZERO
    }
}
