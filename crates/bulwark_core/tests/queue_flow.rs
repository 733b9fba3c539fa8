//! End-to-end tests for the deployment queue: click routing, atomic
//! deploys, lane shifts and the animating input gate.

use std::cell::RefCell;
use std::rc::Rc;

use bulwark_core::events::CoreEvent;
use bulwark_core::grid::Zone;
use bulwark_core::math::Fixed;
use bulwark_core::simulation::{SimConfig, Simulation};
use bulwark_core::unit::UnitId;
use bulwark_test_utils::fixtures::{fixed_f, sample_unit_data};

const DT: f64 = 0.1;

fn standard_sim() -> Simulation {
    Simulation::new(SimConfig::standard(sample_unit_data())).unwrap()
}

fn tick(sim: &mut Simulation, frames: usize) {
    for _ in 0..frames {
        sim.tick(fixed_f(DT));
    }
}

fn occupant(sim: &Simulation, zone: Zone, row: usize, col: usize) -> Option<UnitId> {
    sim.grid().slot(zone, row, col).and_then(|s| s.occupant())
}

fn run_until_idle(sim: &mut Simulation) {
    let mut frames = 0;
    while sim.is_animating() {
        sim.tick(fixed_f(DT));
        frames += 1;
        assert!(frames < 1000, "animation never finished");
    }
}

/// Every slot↔unit binding must be consistent in both directions.
fn assert_bindings_consistent(sim: &Simulation) {
    for zone in Zone::ALL {
        for slot in sim.grid().all_slots(zone) {
            if let Some(unit) = slot.occupant() {
                let state = sim
                    .units()
                    .get(unit)
                    .unwrap_or_else(|| panic!("{unit} occupies a slot but does not exist"));
                assert_eq!(
                    state.slot,
                    Some(slot.coord()),
                    "slot {} points at {unit} but the unit points elsewhere",
                    slot.coord().label()
                );
            }
        }
    }
    for (&id, unit) in sim.units().iter() {
        if let Some(coord) = unit.slot {
            let occupant = sim
                .grid()
                .slot(coord.zone, coord.row, coord.col)
                .and_then(|s| s.occupant());
            assert_eq!(occupant, Some(id), "unit {id} claims an unbound slot");
        }
    }
}

#[test]
fn deployment_shifts_the_vacated_lane() {
    let mut sim = standard_sim();

    let clicked = occupant(&sim, Zone::Active, 0, 1).unwrap();
    let passive_front = occupant(&sim, Zone::Passive, 0, 1).unwrap();
    let passive_mid = occupant(&sim, Zone::Passive, 1, 1).unwrap();
    let passive_back = occupant(&sim, Zone::Passive, 2, 1).unwrap();

    sim.handle_click(clicked);

    // Deployed instantly into the leftmost empty Firing slot
    assert_eq!(occupant(&sim, Zone::Firing, 0, 0), Some(clicked));
    assert!(sim.is_animating());

    run_until_idle(&mut sim);

    // The whole lane advanced one step
    assert_eq!(occupant(&sim, Zone::Active, 0, 1), Some(passive_front));
    assert_eq!(occupant(&sim, Zone::Passive, 0, 1), Some(passive_mid));
    assert_eq!(occupant(&sim, Zone::Passive, 1, 1), Some(passive_back));
    assert_eq!(occupant(&sim, Zone::Passive, 2, 1), None);

    assert_bindings_consistent(&sim);
}

#[test]
fn animating_window_spans_delay_plus_duration() {
    let mut sim = standard_sim();
    let clicked = occupant(&sim, Zone::Active, 0, 0).unwrap();

    sim.handle_click(clicked);
    assert!(sim.is_animating());

    // delay 0.2 + duration 0.3 at dt 0.1: animating through four
    // frames, clear on the fifth
    for _ in 0..4 {
        sim.tick(fixed_f(DT));
        assert!(sim.is_animating());
    }
    sim.tick(fixed_f(DT));
    assert!(!sim.is_animating());
}

#[test]
fn lane_conservation_across_shift() {
    let mut sim = standard_sim();
    let clicked = occupant(&sim, Zone::Active, 0, 2).unwrap();

    let lane_before: Vec<UnitId> = [
        occupant(&sim, Zone::Passive, 0, 2),
        occupant(&sim, Zone::Passive, 1, 2),
        occupant(&sim, Zone::Passive, 2, 2),
    ]
    .into_iter()
    .flatten()
    .collect();

    sim.handle_click(clicked);
    run_until_idle(&mut sim);

    let lane_after: Vec<UnitId> = [
        occupant(&sim, Zone::Active, 0, 2),
        occupant(&sim, Zone::Passive, 0, 2),
        occupant(&sim, Zone::Passive, 1, 2),
        occupant(&sim, Zone::Passive, 2, 2),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Same units, each one row closer to the front
    assert_eq!(lane_before, lane_after);
}

#[test]
fn full_firing_zone_cancels_deployment() {
    let mut sim = standard_sim();

    // Fill all six Firing slots by repeated deployment
    for _ in 0..6 {
        let next = sim.grid().units_in(Zone::Active)[0];
        sim.handle_click(next);
        run_until_idle(&mut sim);
    }
    assert_eq!(sim.grid().occupied_count(Zone::Firing), 6);

    // The seventh click finds no slot: stasis
    let stuck = sim.grid().units_in(Zone::Active)[0];
    let coord = sim.units().get(stuck).unwrap().slot;

    sim.handle_click(stuck);
    assert_eq!(sim.grid().occupied_count(Zone::Firing), 6);
    assert_eq!(sim.units().get(stuck).unwrap().slot, coord);
    assert_eq!(sim.coordinator().selected(), None);
    assert!(!sim.is_animating());
    assert_bindings_consistent(&sim);
}

#[test]
fn clicks_during_animation_are_ignored() {
    let mut sim = standard_sim();
    let first = occupant(&sim, Zone::Active, 0, 0).unwrap();
    let second = occupant(&sim, Zone::Active, 0, 2).unwrap();

    sim.handle_click(first);
    assert!(sim.is_animating());

    // Mid-animation click must not deploy or select anything
    sim.tick(fixed_f(DT));
    sim.handle_click(second);

    assert_eq!(sim.grid().occupied_count(Zone::Firing), 1);
    assert_eq!(sim.coordinator().selected(), None);
    assert_eq!(occupant(&sim, Zone::Active, 0, 2), Some(second));

    run_until_idle(&mut sim);
    // Still exactly one deployed unit afterwards
    assert_eq!(sim.grid().occupied_count(Zone::Firing), 1);
}

#[test]
fn deployment_emits_the_expected_events() {
    let mut sim = standard_sim();
    let clicked = occupant(&sim, Zone::Active, 0, 1).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    sim.events_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));

    sim.handle_click(clicked);
    run_until_idle(&mut sim);

    let events = seen.borrow();
    assert!(events.contains(&CoreEvent::UnitSelected { unit: clicked }));
    assert!(events.contains(&CoreEvent::UnitDeselected { unit: clicked }));
    assert!(events.contains(&CoreEvent::LaneShiftStarted { lane: 1 }));
    assert!(events.contains(&CoreEvent::LaneShiftCompleted { lane: 1, moved: 3 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, CoreEvent::UnitDeployed { unit, lane: 1, .. } if *unit == clicked)));
}

#[test]
fn shifted_lane_keeps_bindings_consistent_every_frame() {
    let mut sim = standard_sim();
    let clicked = occupant(&sim, Zone::Active, 0, 0).unwrap();

    sim.handle_click(clicked);
    let mut frames = 0;
    while sim.is_animating() {
        // Mid-animation units may be slotless, but every binding that
        // exists must be consistent both ways.
        assert_bindings_consistent(&sim);
        sim.tick(fixed_f(DT));
        frames += 1;
        assert!(frames < 1000);
    }
    assert_bindings_consistent(&sim);
}

#[test]
fn deployments_drain_the_queue_in_lane_order() {
    let mut sim = standard_sim();

    // Lane 0 holds four units; four deployments empty it
    for _ in 0..4 {
        let next = occupant(&sim, Zone::Active, 0, 0);
        let Some(next) = next else { break };
        sim.handle_click(next);
        run_until_idle(&mut sim);
    }

    assert_eq!(occupant(&sim, Zone::Active, 0, 0), None);
    for row in 0..3 {
        assert_eq!(occupant(&sim, Zone::Passive, row, 0), None);
    }
    assert_eq!(sim.grid().occupied_count(Zone::Firing), 4);

    // A click on an empty lane's former occupant id does nothing
    let remaining = sim.grid().occupied_count(Zone::Firing);
    sim.tick(Fixed::from_num(1));
    assert_eq!(sim.grid().occupied_count(Zone::Firing), remaining);
}
