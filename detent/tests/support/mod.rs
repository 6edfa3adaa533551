#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use detent::prelude::*;

/// Shared view into a test control so assertions can run after the control
/// has been moved into the registry
pub type Probe<T> = Rc<RefCell<T>>;

#[derive(Debug, Default)]
pub struct KnobState {
    pub angle: f64,
    pub writes: usize,
}

/// Rotary control that accepts any angle
pub struct Knob(pub Probe<KnobState>);

impl RotaryControl for Knob {
    fn angle(&self) -> f64 {
        self.0.borrow().angle
    }

    fn set_angle(&mut self, degrees: f64) {
        let mut state = self.0.borrow_mut();
        state.angle = degrees;
        state.writes += 1;
    }
}

impl RoutableControl for Knob {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }
}

/// Rotary control with hard stops
pub struct ClampedKnob {
    pub state: Probe<KnobState>,
    pub min: f64,
    pub max: f64,
}

impl RotaryControl for ClampedKnob {
    fn angle(&self) -> f64 {
        self.state.borrow().angle
    }

    fn set_angle(&mut self, degrees: f64) {
        let mut state = self.state.borrow_mut();
        state.angle = degrees.clamp(self.min, self.max);
        state.writes += 1;
    }
}

impl RoutableControl for ClampedKnob {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }
}

#[derive(Debug, Default)]
pub struct SwitchState {
    pub position: i32,
    pub pulses: Vec<i32>,
}

/// Detented rotary switch that also takes pulses
pub struct RotarySwitch {
    pub state: Probe<SwitchState>,
    pub degrees_per_position: f64,
}

impl RotaryControl for RotarySwitch {
    fn angle(&self) -> f64 {
        self.state.borrow().position as f64 * self.degrees_per_position
    }

    fn set_angle(&mut self, degrees: f64) {
        self.state.borrow_mut().position =
            (degrees / self.degrees_per_position).round() as i32;
    }

    fn is_rotary_switch(&self) -> bool {
        true
    }
}

impl PulsedControl for RotarySwitch {
    fn pulse(&mut self, count: i32) {
        let mut state = self.state.borrow_mut();
        state.position += count;
        state.pulses.push(count);
    }
}

impl RoutableControl for RotarySwitch {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        Some(self)
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        Some(self)
    }

    fn as_pulsed_mut(&mut self) -> Option<&mut dyn PulsedControl> {
        Some(self)
    }

    fn as_pulsed(&self) -> Option<&dyn PulsedControl> {
        Some(self)
    }
}

/// Pulse-only control recording every delivery
pub struct Stepper(pub Probe<Vec<i32>>);

impl PulsedControl for Stepper {
    fn pulse(&mut self, count: i32) {
        self.0.borrow_mut().push(count);
    }
}

impl RoutableControl for Stepper {
    fn as_pulsed_mut(&mut self) -> Option<&mut dyn PulsedControl> {
        Some(self)
    }

    fn as_pulsed(&self) -> Option<&dyn PulsedControl> {
        Some(self)
    }
}

/// Control with no capability a port can use
pub struct Inert;

impl RoutableControl for Inert {}

pub fn probe<T: Default>() -> Probe<T> {
    Rc::new(RefCell::new(T::default()))
}

pub fn knob(
    registry: &mut ControlRegistry,
    name: &str,
    angle: f64,
) -> (ControlId, Probe<KnobState>) {
    let state = probe::<KnobState>();
    state.borrow_mut().angle = angle;
    let id = registry.insert(name, Knob(state.clone()));
    (id, state)
}

pub fn stepper(
    registry: &mut ControlRegistry,
    name: &str,
) -> (ControlId, Probe<Vec<i32>>) {
    let pulses = probe::<Vec<i32>>();
    let id = registry.insert(name, Stepper(pulses.clone()));
    (id, pulses)
}

pub fn switch(
    registry: &mut ControlRegistry,
    name: &str,
) -> (ControlId, Probe<SwitchState>) {
    let state = probe::<SwitchState>();
    let id = registry.insert(
        name,
        RotarySwitch {
            state: state.clone(),
            degrees_per_position: 30.0,
        },
    );
    (id, state)
}

/// Selects `control` and lets `port` claim it with a first relative angle
/// input of `value`
pub fn bind_with_angle(
    router: &mut Router,
    registry: &mut ControlRegistry,
    port: &str,
    control: ControlId,
    value: f64,
) {
    let name = registry.name(control).unwrap().to_string();
    router.record_selection(control, &name);
    router.relative_angle(port, value, registry).unwrap();
}
