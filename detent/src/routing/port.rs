//! A single routing endpoint that turns encoder motion into control motion.
//!
//! A [`Port`] is fed by one physical input (an encoder emitting pulses or an
//! absolute-position source) and drives whichever control it most recently
//! claimed from the [`Router`]. Every action takes the result of the router's
//! claim attempt; when that carries a control, the port drops its previous
//! binding and captures a fresh baseline before handling the event.
//!
//! [`Router`]: super::Router

use crate::control::{
    Capabilities, ControlId, ControlRegistry, PulsedControl, RoutableControl,
};
use crate::core::prelude::*;

/// Pulse deltas smaller than this are encoder noise
pub const NOISE_THRESHOLD: f64 = 0.1;

/// Degrees a bound control may wander from the last angle we wrote before we
/// assume someone else moved it
pub const CONTROL_ANGLE_TOLERANCE: f64 = 0.1;

/// Smallest magnitude accepted for `value_per_revolution` and
/// `pulses_per_revolution` when used as divisors
pub const MIN_SCALE: f64 = 0.00001;

pub const DEFAULT_PULSES_PER_REVOLUTION: f64 = 72.0;
pub const DEFAULT_PULSES_PER_DETENT: f64 = 4.0;
pub const DEFAULT_VALUE_AT_ZERO_DEGREES: f64 = 0.0;
pub const DEFAULT_VALUE_PER_REVOLUTION: f64 = 1.0;

/// User-editable conversion constants. This is the persisted part of a port.
#[derive(Clone, Debug, PartialEq)]
pub struct PortConfig {
    pub pulses_per_revolution: f64,
    pub pulses_per_detent: f64,
    /// Deliver raw pulses to rotary switches instead of rotating them
    pub pulse_switches: bool,
    /// Deliver raw pulses to every pulsed control, rotary or not
    pub pulse_all: bool,
    pub value_at_zero_degrees: f64,
    pub value_per_revolution: f64,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            pulses_per_revolution: DEFAULT_PULSES_PER_REVOLUTION,
            pulses_per_detent: DEFAULT_PULSES_PER_DETENT,
            pulse_switches: false,
            pulse_all: false,
            value_at_zero_degrees: DEFAULT_VALUE_AT_ZERO_DEGREES,
            value_per_revolution: DEFAULT_VALUE_PER_REVOLUTION,
        }
    }
}

/// The two motion representations a host can feed into a port
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PortAction {
    /// Signed pulse delta from an incremental encoder
    ValueFromPulses(f64),
    /// Absolute input value in the source's own units
    RelativeAngle(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Binding {
    target: ControlId,
    capabilities: Capabilities,
}

#[derive(Clone, Debug)]
pub struct Port {
    name: String,
    config: PortConfig,
    bound: Option<Binding>,
    initial_angle: f64,
    last_angle: f64,
    initial_input_value: Option<f64>,
    undelivered_pulses: f64,
    pulses_since_binding: f64,
    pulse_mode: bool,
    changed: bool,
}

impl Port {
    pub fn new(name: &str) -> Self {
        Self::with_config(name, PortConfig::default())
    }

    pub fn with_config(name: &str, config: PortConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            bound: None,
            initial_angle: 0.0,
            last_angle: 0.0,
            initial_input_value: None,
            undelivered_pulses: 0.0,
            pulses_since_binding: 0.0,
            pulse_mode: false,
            changed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Only [`super::Ports::rename_port`] may rename so that uniqueness
    /// within the collection is checked first
    pub(super) fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.changed = true;
        }
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    pub fn pulses_per_revolution(&self) -> f64 {
        self.config.pulses_per_revolution
    }

    pub fn set_pulses_per_revolution(&mut self, value: f64) -> bool {
        Self::update(
            &mut self.config.pulses_per_revolution,
            value,
            &mut self.changed,
        )
    }

    pub fn pulses_per_detent(&self) -> f64 {
        self.config.pulses_per_detent
    }

    pub fn set_pulses_per_detent(&mut self, value: f64) -> bool {
        Self::update(
            &mut self.config.pulses_per_detent,
            value,
            &mut self.changed,
        )
    }

    pub fn pulse_switches(&self) -> bool {
        self.config.pulse_switches
    }

    pub fn set_pulse_switches(&mut self, value: bool) -> bool {
        Self::update(&mut self.config.pulse_switches, value, &mut self.changed)
    }

    pub fn pulse_all(&self) -> bool {
        self.config.pulse_all
    }

    pub fn set_pulse_all(&mut self, value: bool) -> bool {
        Self::update(&mut self.config.pulse_all, value, &mut self.changed)
    }

    pub fn value_at_zero_degrees(&self) -> f64 {
        self.config.value_at_zero_degrees
    }

    pub fn set_value_at_zero_degrees(&mut self, value: f64) -> bool {
        Self::update(
            &mut self.config.value_at_zero_degrees,
            value,
            &mut self.changed,
        )
    }

    pub fn value_per_revolution(&self) -> f64 {
        self.config.value_per_revolution
    }

    pub fn set_value_per_revolution(&mut self, value: f64) -> bool {
        Self::update(
            &mut self.config.value_per_revolution,
            value,
            &mut self.changed,
        )
    }

    fn update<T: PartialEq>(
        field: &mut T,
        value: T,
        changed: &mut bool,
    ) -> bool {
        if *field == value {
            return false;
        }
        *field = value;
        *changed = true;
        true
    }

    /// True if any configuration changed since the last
    /// [`Port::mark_unchanged`]
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn mark_unchanged(&mut self) {
        self.changed = false;
    }

    pub fn bound_target(&self) -> Option<ControlId> {
        self.bound.map(|b| b.target)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.bound.map(|b| b.capabilities).unwrap_or_default()
    }

    /// Display name of the bound control, empty when unbound or when the
    /// control has since been removed from the registry
    pub fn bound_control(&self, registry: &ControlRegistry) -> String {
        self.bound
            .and_then(|b| registry.name(b.target))
            .map(ToOwned::to_owned)
            .unwrap_or_default()
    }

    pub fn pulse_mode(&self) -> bool {
        self.pulse_mode
    }

    pub fn pulses_since_binding(&self) -> f64 {
        self.pulses_since_binding
    }

    pub fn undelivered_pulses(&self) -> f64 {
        self.undelivered_pulses
    }

    pub fn initial_angle(&self) -> f64 {
        self.initial_angle
    }

    pub fn last_angle(&self) -> f64 {
        self.last_angle
    }

    pub fn initial_input_value(&self) -> Option<f64> {
        self.initial_input_value
    }

    pub fn apply(
        &mut self,
        action: PortAction,
        claimed: Option<ControlId>,
        registry: &mut ControlRegistry,
    ) {
        match action {
            PortAction::ValueFromPulses(pulses) => {
                self.value_from_pulses(claimed, pulses, registry)
            }
            PortAction::RelativeAngle(value) => {
                self.relative_angle(claimed, value, registry)
            }
        }
    }

    pub fn value_from_pulses(
        &mut self,
        claimed: Option<ControlId>,
        pulses: f64,
        registry: &mut ControlRegistry,
    ) {
        if let Some(target) = claimed {
            self.bind(target, pulses, registry);
        }

        if pulses.abs() < NOISE_THRESHOLD {
            return;
        }

        self.pulses_since_binding += pulses;

        let Some((binding, control)) = self.resolve(registry) else {
            return;
        };

        if binding.capabilities.rotary() && !self.pulse_mode {
            if let Some(rotary) = control.as_rotary_mut() {
                let per_revolution = min_magnitude(
                    self.config.pulses_per_revolution,
                    MIN_SCALE,
                );
                let angle = rotary.angle() + pulses * 360.0 / per_revolution;
                rotary.set_angle(angle);
            }
            return;
        }

        if binding.capabilities.pulsed() {
            if let Some(pulsed) = control.as_pulsed_mut() {
                self.deliver_pulses(pulsed, pulses);
            }
            return;
        }

        debug!(
            "{}: bound control {} is neither rotary nor pulsed; dropping {} pulses",
            self.name, binding.target, pulses
        );
    }

    pub fn relative_angle(
        &mut self,
        claimed: Option<ControlId>,
        value: f64,
        registry: &mut ControlRegistry,
    ) {
        if let Some(target) = claimed {
            self.bind(target, value, registry);
        }

        let Some((binding, control)) = self.resolve(registry) else {
            return;
        };

        let Some(rotary) = control
            .as_rotary_mut()
            .filter(|_| binding.capabilities.rotary())
        else {
            debug!(
                "{}: bound control {} is not rotary; ignoring angle input",
                self.name, binding.target
            );
            return;
        };

        let current = rotary.angle();
        let initial_input = match self.initial_input_value {
            Some(initial)
                if !differs_by_more_than(
                    current,
                    self.last_angle,
                    CONTROL_ANGLE_TOLERANCE,
                ) =>
            {
                initial
            }
            _ => {
                debug!(
                    "{}: control moved to {:.3} (expected {:.3}); rebasing",
                    self.name, current, self.last_angle
                );
                self.initial_angle = current;
                self.last_angle = current;
                self.initial_input_value = Some(value);
                return;
            }
        };

        let scale =
            min_magnitude(self.config.value_per_revolution, MIN_SCALE);
        let offset =
            value - (self.config.value_at_zero_degrees + initial_input);
        rotary.set_angle(self.initial_angle + offset * 360.0 / scale);

        self.last_angle = rotary.angle();
    }

    /// Drops the binding and all runtime bookkeeping. Configuration is kept.
    pub fn reset(&mut self) {
        self.bound = None;
        self.pulses_since_binding = 0.0;
        self.undelivered_pulses = 0.0;
        self.last_angle = 0.0;
        self.initial_input_value = None;
    }

    fn bind(
        &mut self,
        target: ControlId,
        input_value: f64,
        registry: &ControlRegistry,
    ) {
        let Some(entry) = registry.get(target) else {
            debug!(
                "{}: claimed control {} no longer exists; unbinding",
                self.name, target
            );
            self.bound = None;
            return;
        };

        let control = entry.control.as_ref();
        let capabilities = Capabilities::of(control);

        self.initial_angle = control.as_rotary().map_or(0.0, |r| r.angle());
        self.last_angle = self.initial_angle;
        self.initial_input_value = Some(input_value);
        self.pulses_since_binding = 0.0;
        self.undelivered_pulses = 0.0;
        self.pulse_mode = self.config.pulse_all
            || (self.config.pulse_switches && capabilities.rotary_switch());
        self.bound = Some(Binding {
            target,
            capabilities,
        });

        debug!(
            "{}: bound to `{}` ({:?}, pulse mode: {})",
            self.name, entry.name, capabilities, self.pulse_mode
        );
    }

    /// Looks the bound control up. A miss means the host removed it, in which
    /// case the binding is dropped.
    fn resolve<'r>(
        &mut self,
        registry: &'r mut ControlRegistry,
    ) -> Option<(Binding, &'r mut dyn RoutableControl)> {
        let binding = self.bound?;
        match registry.control_mut(binding.target) {
            Some(control) => Some((binding, control)),
            None => {
                debug!(
                    "{}: bound control {} was removed; unbinding",
                    self.name, binding.target
                );
                self.bound = None;
                None
            }
        }
    }

    fn deliver_pulses(&mut self, target: &mut dyn PulsedControl, pulses: f64) {
        let count = self.discrete_pulses(pulses);
        if count != 0 {
            target.pulse(count);
        }
    }

    /// Converts raw encoder pulses into whole detent steps, carrying any
    /// fraction over to the next call
    fn discrete_pulses(&mut self, pulses: f64) -> i32 {
        let per_detent = self.config.pulses_per_detent;

        if per_detent <= 1.0 {
            return pulses.trunc() as i32;
        }

        self.undelivered_pulses += pulses / per_detent;

        if self.undelivered_pulses.abs() < 1.0 {
            return 0;
        }

        let whole = self.undelivered_pulses.trunc();
        self.undelivered_pulses %= 1.0;
        whole as i32
    }
}
