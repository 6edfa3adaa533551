//! Capability contracts a cockpit control can offer to a [`Port`].
//!
//! [`Port`]: crate::routing::Port

/// A control with a continuous rotary position measured in degrees
pub trait RotaryControl {
    fn angle(&self) -> f64;

    /// Implementations are free to clamp or snap the requested angle; callers
    /// must read [`RotaryControl::angle`] back to learn what was applied.
    fn set_angle(&mut self, degrees: f64);

    /// Marks a rotary control whose positions are discrete detents
    fn is_rotary_switch(&self) -> bool {
        false
    }
}

/// A control that advances in discrete signed steps
pub trait PulsedControl {
    fn pulse(&mut self, count: i32);
}

/// Parent trait for anything the host is willing to let a port bind to.
///
/// Controls expose each capability they implement through the `as_*`
/// accessors; the defaults declare no capability at all. A control that
/// overrides one accessor of a pair must override the other to match.
pub trait RoutableControl {
    fn as_rotary(&self) -> Option<&dyn RotaryControl> {
        None
    }

    fn as_rotary_mut(&mut self) -> Option<&mut dyn RotaryControl> {
        None
    }

    fn as_pulsed(&self) -> Option<&dyn PulsedControl> {
        None
    }

    fn as_pulsed_mut(&mut self) -> Option<&mut dyn PulsedControl> {
        None
    }
}

/// The capability set of a control, resolved once when a port claims it
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Capabilities {
    #[default]
    None,
    Rotary {
        switch: bool,
    },
    Pulsed,
    Both {
        switch: bool,
    },
}

impl Capabilities {
    pub fn of(control: &dyn RoutableControl) -> Self {
        let rotary = control.as_rotary();
        let switch = rotary.is_some_and(|r| r.is_rotary_switch());
        match (rotary.is_some(), control.as_pulsed().is_some()) {
            (true, true) => Self::Both { switch },
            (true, false) => Self::Rotary { switch },
            (false, true) => Self::Pulsed,
            (false, false) => Self::None,
        }
    }

    pub fn rotary(&self) -> bool {
        matches!(self, Self::Rotary { .. } | Self::Both { .. })
    }

    pub fn pulsed(&self) -> bool {
        matches!(self, Self::Pulsed | Self::Both { .. })
    }

    pub fn rotary_switch(&self) -> bool {
        matches!(
            self,
            Self::Rotary { switch: true } | Self::Both { switch: true }
        )
    }
}
