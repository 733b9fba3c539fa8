//! Observable events emitted by the core.
//!
//! UI and feedback layers subscribe callbacks to the [`EventBus`];
//! subscriptions are explicit and must be released on teardown via
//! [`EventBus::unsubscribe`]. The bus itself carries no game logic -
//! it only fans published events out to whoever registered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{SlotCoord, Zone};
use crate::unit::UnitId;

/// Why a unit was removed from the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Health reached zero.
    Died,
    /// Ammunition ran dry.
    OutOfAmmo,
    /// Roster teardown removed every unit.
    Cleared,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Died => write!(f, "died"),
            RemovalReason::OutOfAmmo => write!(f, "out of ammo"),
            RemovalReason::Cleared => write!(f, "cleared"),
        }
    }
}

/// Events published by the core for UI/feedback layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreEvent {
    /// A slot received an occupant.
    SlotOccupied {
        /// The slot that was filled.
        coord: SlotCoord,
        /// The unit now occupying it.
        unit: UnitId,
    },
    /// A slot lost its occupant.
    SlotCleared {
        /// The slot that was emptied.
        coord: SlotCoord,
        /// The unit that previously occupied it.
        unit: UnitId,
    },
    /// A unit was selected for deployment (highlight it).
    UnitSelected {
        /// The selected unit.
        unit: UnitId,
    },
    /// A unit lost its selection (remove highlight).
    UnitDeselected {
        /// The deselected unit.
        unit: UnitId,
    },
    /// A unit moved from the Active row into the Firing zone.
    UnitDeployed {
        /// The deployed unit.
        unit: UnitId,
        /// The Active slot it left.
        from: SlotCoord,
        /// The Firing slot it entered.
        to: SlotCoord,
        /// The lane the deployment vacated.
        lane: usize,
    },
    /// A lane began shifting its queue upward.
    LaneShiftStarted {
        /// Column index of the shifting lane.
        lane: usize,
    },
    /// A lane finished shifting.
    LaneShiftCompleted {
        /// Column index of the lane that shifted.
        lane: usize,
        /// How many units moved.
        moved: usize,
    },
    /// A unit's ammo crossed its low-ammo threshold.
    AmmoLow {
        /// The unit running low.
        unit: UnitId,
        /// Rounds remaining.
        remaining: i32,
    },
    /// A unit's ammo reached zero.
    AmmoDepleted {
        /// The unit that ran dry.
        unit: UnitId,
    },
    /// A unit left the battlefield for good.
    UnitRemoved {
        /// The removed unit.
        unit: UnitId,
        /// Why it was removed.
        reason: RemovalReason,
    },
    /// The whole roster was torn down.
    ///
    /// Emitted once per `clear_all` call, after the individual
    /// `UnitRemoved` events.
    RosterCleared {
        /// How many units were flushed.
        count: usize,
    },
}

impl CoreEvent {
    /// The zone a slot event refers to, if this is a slot event.
    #[must_use]
    pub fn slot_zone(&self) -> Option<Zone> {
        match self {
            CoreEvent::SlotOccupied { coord, .. } | CoreEvent::SlotCleared { coord, .. } => {
                Some(coord.zone)
            }
            _ => None,
        }
    }
}

/// Handle to a registered subscriber; pass back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&CoreEvent)>;

/// Publish/subscribe fan-out for [`CoreEvent`]s.
///
/// Single-threaded by design: callbacks run synchronously inside
/// `publish`, on the simulation thread.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; returns the id needed to unsubscribe.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered callback.
    ///
    /// Returns false if the id was unknown (already unsubscribed).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber, in registration order.
    pub fn publish(&mut self, event: &CoreEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_subscribe_receives_events() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        bus.publish(&CoreEvent::UnitSelected { unit: UnitId(1) });
        bus.publish(&CoreEvent::UnitDeselected { unit: UnitId(1) });

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(
            seen.borrow()[0],
            CoreEvent::UnitSelected { unit: UnitId(1) }
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&seen);
        let id = bus.subscribe(move |_| *sink.borrow_mut() += 1);

        bus.publish(&CoreEvent::LaneShiftStarted { lane: 0 });
        assert!(bus.unsubscribe(id));
        bus.publish(&CoreEvent::LaneShiftStarted { lane: 1 });

        assert_eq!(*seen.borrow(), 1);
        // Second unsubscribe is a no-op
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_removal_reason_display() {
        assert_eq!(RemovalReason::Died.to_string(), "died");
        assert_eq!(RemovalReason::OutOfAmmo.to_string(), "out of ammo");
    }
}
