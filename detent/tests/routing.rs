mod support;

use detent::prelude::*;
use support::*;

#[test]
fn noise_pulses_change_nothing() {
    let mut registry = ControlRegistry::new();
    let (knob_id, knob) = support::knob(&mut registry, "knob", 45.0);
    let (stepper_id, stepper) = support::stepper(&mut registry, "stepper");
    let mut router = Router::default();

    router.record_selection(knob_id, "knob");
    router.value_from_pulses("Port 0", 1.0, &mut registry).unwrap();
    router.record_selection(stepper_id, "stepper");
    router.value_from_pulses("Port 1", 2.0, &mut registry).unwrap();

    let writes = knob.borrow().writes;
    let angle = knob.borrow().angle;

    for noise in [0.0, 0.05, -0.05, 0.099, -0.099] {
        router.value_from_pulses("Port 0", noise, &mut registry).unwrap();
        router.value_from_pulses("Port 1", noise, &mut registry).unwrap();
    }

    assert_eq!(knob.borrow().writes, writes);
    assert_eq!(knob.borrow().angle, angle);
    assert!(stepper.borrow().is_empty());
    assert_eq!(router.port("Port 0").unwrap().pulses_since_binding(), 1.0);
    assert_eq!(router.port("Port 1").unwrap().pulses_since_binding(), 2.0);
    assert_eq!(router.port("Port 1").unwrap().undelivered_pulses(), 0.5);
}

#[test]
fn selection_is_claimed_exactly_once() {
    let mut registry = ControlRegistry::new();
    let (knob_id, _) = support::knob(&mut registry, "knob", 0.0);
    let mut router = Router::default();

    router.record_selection(knob_id, "knob");
    for port in router.ports().names() {
        router.value_from_pulses(&port, 1.0, &mut registry).unwrap();
    }

    let bound: Vec<String> = router
        .ports()
        .iter()
        .map(|p| p.bound_control(&registry))
        .collect();
    assert_eq!(bound, vec!["knob", "", "", ""]);
    assert_eq!(router.try_claim(), None);
}

#[test]
fn newer_selection_rebinds_the_claiming_port() {
    let mut registry = ControlRegistry::new();
    let (a_id, a) = support::knob(&mut registry, "a", 0.0);
    let (b_id, b) = support::knob(&mut registry, "b", 0.0);
    let mut router = Router::default();

    router.record_selection(a_id, "a");
    router.value_from_pulses("Port 0", 72.0, &mut registry).unwrap();
    router.record_selection(b_id, "b");
    router.value_from_pulses("Port 0", 36.0, &mut registry).unwrap();

    assert_eq!(a.borrow().angle, 360.0);
    assert_eq!(b.borrow().angle, 180.0);
    assert_eq!(router.bound_control("Port 0", &registry).unwrap(), "b");
    assert_eq!(router.port("Port 0").unwrap().pulses_since_binding(), 36.0);
}

#[test]
fn relative_angle_derives_from_baseline() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 10.0);
    let mut router = Router::default();

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.25);
    assert_eq!(knob.borrow().angle, 10.0);

    let port = router.port("Port 0").unwrap();
    assert_eq!(port.initial_angle(), 10.0);
    assert_eq!(port.initial_input_value(), Some(0.25));

    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 100.0);

    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 100.0);
}

#[test]
fn value_at_zero_degrees_offsets_the_baseline() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 10.0);
    let mut router = Router::default();
    router
        .port_mut("Port 0")
        .unwrap()
        .set_value_at_zero_degrees(0.1);

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.25);
    assert!((knob.borrow().angle - -26.0).abs() < 1e-9);
    assert_eq!(router.port("Port 0").unwrap().initial_angle(), 10.0);

    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();
    assert!((knob.borrow().angle - 64.0).abs() < 1e-9);
}

#[test]
fn external_move_rebases_without_applying() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 10.0);
    let mut router = Router::default();

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.25);
    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();

    knob.borrow_mut().angle = 150.0;
    let writes = knob.borrow().writes;

    router.relative_angle("Port 0", 0.75, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 150.0);
    assert_eq!(knob.borrow().writes, writes);

    let port = router.port("Port 0").unwrap();
    assert_eq!(port.initial_angle(), 150.0);
    assert_eq!(port.last_angle(), 150.0);
    assert_eq!(port.initial_input_value(), Some(0.75));

    router.relative_angle("Port 0", 1.0, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 240.0);
}

#[test]
fn movement_within_tolerance_is_not_drift() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 0.0);
    let mut router = Router::default();

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.0);
    knob.borrow_mut().angle = 0.05;

    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 180.0);
}

#[test]
fn clamped_target_is_read_back() {
    let mut registry = ControlRegistry::new();
    let state = probe::<KnobState>();
    let id = registry.insert(
        "course",
        ClampedKnob {
            state: state.clone(),
            min: 0.0,
            max: 90.0,
        },
    );
    let mut router = Router::default();

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.0);
    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();

    assert_eq!(state.borrow().angle, 90.0);
    assert_eq!(router.port("Port 0").unwrap().last_angle(), 90.0);

    // Still inside tolerance of what we read back, so no re-base
    router.relative_angle("Port 0", 0.125, &mut registry).unwrap();
    assert_eq!(state.borrow().angle, 45.0);
}

#[test]
fn value_per_revolution_scales_input() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 0.0);
    let mut router = Router::default();
    router
        .port_mut("Port 0")
        .unwrap()
        .set_value_per_revolution(10.0);

    bind_with_angle(&mut router, &mut registry, "Port 0", id, 0.0);
    router.relative_angle("Port 0", 2.5, &mut registry).unwrap();

    assert_eq!(knob.borrow().angle, 90.0);
}

#[test]
fn fractional_pulses_accumulate_to_one_detent() {
    let mut registry = ControlRegistry::new();
    let (id, pulses) = support::stepper(&mut registry, "stepper");
    let mut router = Router::default();

    router.record_selection(id, "stepper");
    for i in 0..4 {
        router.value_from_pulses("Port 0", 1.0, &mut registry).unwrap();
        if i < 3 {
            assert!(pulses.borrow().is_empty());
        }
    }

    assert_eq!(*pulses.borrow(), vec![1]);
    assert_eq!(router.port("Port 0").unwrap().undelivered_pulses(), 0.0);
}

#[test]
fn single_pulse_detents_truncate() {
    let mut registry = ControlRegistry::new();
    let (id, pulses) = support::stepper(&mut registry, "stepper");
    let mut router = Router::default();
    router.port_mut("Port 0").unwrap().set_pulses_per_detent(1.0);

    router.record_selection(id, "stepper");
    router.value_from_pulses("Port 0", 3.7, &mut registry).unwrap();
    router.value_from_pulses("Port 0", -1.2, &mut registry).unwrap();

    assert_eq!(*pulses.borrow(), vec![3, -1]);
    assert_eq!(router.port("Port 0").unwrap().undelivered_pulses(), 0.0);
}

#[test]
fn rotary_switch_rotates_unless_pulse_switches() {
    let mut registry = ControlRegistry::new();
    let (id, switch) = support::switch(&mut registry, "switch");
    let mut router = Router::default();

    router.record_selection(id, "switch");
    router.value_from_pulses("Port 0", 4.0, &mut registry).unwrap();
    assert!(!router.port("Port 0").unwrap().pulse_mode());
    assert_eq!(switch.borrow().position, 1);
    assert!(switch.borrow().pulses.is_empty());

    router.port_mut("Port 1").unwrap().set_pulse_switches(true);
    router.record_selection(id, "switch");
    router.value_from_pulses("Port 1", 8.0, &mut registry).unwrap();

    assert!(router.port("Port 1").unwrap().pulse_mode());
    assert_eq!(switch.borrow().pulses, vec![2]);
    assert_eq!(switch.borrow().position, 3);
}

#[test]
fn pulse_all_leaves_rotary_only_controls_alone() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 20.0);
    let mut router = Router::default();
    router.port_mut("Port 0").unwrap().set_pulse_all(true);

    router.record_selection(id, "knob");
    router.value_from_pulses("Port 0", 8.0, &mut registry).unwrap();

    assert!(router.port("Port 0").unwrap().pulse_mode());
    assert_eq!(knob.borrow().angle, 20.0);
    assert_eq!(knob.borrow().writes, 0);
}

#[test]
fn control_without_capabilities_stays_bound() {
    let mut registry = ControlRegistry::new();
    let id = registry.insert("light", Inert);
    let mut router = Router::default();

    router.record_selection(id, "light");
    router.value_from_pulses("Port 0", 4.0, &mut registry).unwrap();
    router.relative_angle("Port 0", 0.5, &mut registry).unwrap();

    let port = router.port("Port 0").unwrap();
    assert_eq!(port.capabilities(), Capabilities::None);
    assert_eq!(port.bound_control(&registry), "light");
}

#[test]
fn reset_requires_a_fresh_claim() {
    let mut registry = ControlRegistry::new();
    let (id, knob) = support::knob(&mut registry, "knob", 0.0);
    let mut router = Router::default();

    router.record_selection(id, "knob");
    router.value_from_pulses("Port 0", 1.0, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 5.0);

    router.reset();
    assert_eq!(router.bound_control("Port 0", &registry).unwrap(), "");

    router.value_from_pulses("Port 0", 1.0, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 5.0);

    router.record_selection(id, "knob");
    router.value_from_pulses("Port 0", 1.0, &mut registry).unwrap();
    assert_eq!(knob.borrow().angle, 10.0);
}

#[test]
fn reset_forgets_pending_selection() {
    let mut registry = ControlRegistry::new();
    let (id, _) = support::knob(&mut registry, "knob", 0.0);
    let mut router = Router::default();

    router.record_selection(id, "knob");
    router.reset();

    assert_eq!(router.try_claim(), None);
    assert_eq!(router.unclaimed_control(), "");
    assert_eq!(router.most_recent_control(), "knob");
}

#[test]
fn removed_control_reads_as_unbound() {
    let mut registry = ControlRegistry::new();
    let (id, _) = support::stepper(&mut registry, "stepper");
    let mut router = Router::default();

    router.record_selection(id, "stepper");
    router.value_from_pulses("Port 0", 4.0, &mut registry).unwrap();
    registry.remove(id);

    assert_eq!(router.bound_control("Port 0", &registry).unwrap(), "");
    router.value_from_pulses("Port 0", 4.0, &mut registry).unwrap();
    assert_eq!(router.port("Port 0").unwrap().bound_target(), None);
}
