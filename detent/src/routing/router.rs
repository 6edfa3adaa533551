//! Runtime assignment of ports to whichever control the operator touched
//! last, AKA "claim on demand".
//!
//! The host reports every selection with [`Router::record_selection`]. The
//! next action arriving on any port claims that selection and the port
//! rebinds to it; later actions on other ports find nothing to claim and keep
//! driving whatever they were already bound to.
//!
//! All of this runs on the host's dispatch thread. The claim slot is a plain
//! take-and-clear and is only exactly-once under that sequential dispatch.

use std::error::Error;
use std::fmt;

use super::events::{RouterEvent, RouterEventSender};
use super::port::{Port, PortAction};
use super::ports::Ports;
use crate::control::{ControlId, ControlRegistry};
use crate::core::prelude::*;

#[derive(Debug, Default)]
struct ClaimSlot {
    selected: Option<ControlId>,
    most_recent: String,
    unclaimed: String,
}

#[derive(Debug, Default)]
struct Publisher {
    sender: Option<RouterEventSender>,
}

impl Publisher {
    fn publish(&self, event: RouterEvent) {
        if let Some(sender) = &self.sender {
            if let Err(err) = sender.send(event) {
                trace!("Dropping router event; receiver is gone: {:?}", err.0);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Router {
    ports: Ports,
    slot: ClaimSlot,
    publisher: Publisher,
}

impl Router {
    pub fn new(ports: Ports) -> Self {
        Self {
            ports,
            ..Default::default()
        }
    }

    /// Publishes status changes to `sender` from now on
    pub fn with_events(mut self, sender: RouterEventSender) -> Self {
        self.publisher.sender = Some(sender);
        self
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub fn port_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.get_mut(name)
    }

    /// Records `control` as the most recently selected routable control. An
    /// earlier selection nobody claimed is overwritten.
    pub fn record_selection(&mut self, control: ControlId, name: &str) {
        debug!("Selected `{}` ({})", name, control);

        self.slot.selected = Some(control);
        self.slot.most_recent = name.to_string();
        self.slot.unclaimed = name.to_string();

        self.publisher
            .publish(RouterEvent::MostRecentControl(name.to_string()));
        self.publisher
            .publish(RouterEvent::UnclaimedControl(name.to_string()));
    }

    /// Takes the pending selection, if any. Only the first call after a
    /// selection gets it.
    pub fn try_claim(&mut self) -> Option<ControlId> {
        Self::claim(&mut self.slot, &self.publisher)
    }

    fn claim(slot: &mut ClaimSlot, publisher: &Publisher) -> Option<ControlId> {
        let control = slot.selected.take()?;
        slot.unclaimed.clear();
        publisher.publish(RouterEvent::UnclaimedControl(String::new()));
        Some(control)
    }

    pub fn most_recent_control(&self) -> &str {
        &self.slot.most_recent
    }

    pub fn unclaimed_control(&self) -> &str {
        &self.slot.unclaimed
    }

    pub fn bound_control(
        &self,
        port: &str,
        registry: &ControlRegistry,
    ) -> Result<String, RouterError> {
        self.ports
            .get(port)
            .map(|p| p.bound_control(registry))
            .ok_or_else(|| RouterError::UnknownPort(port.to_string()))
    }

    /// Delivers `action` to the named port, letting it claim the pending
    /// selection first
    pub fn dispatch(
        &mut self,
        port: &str,
        action: PortAction,
        registry: &mut ControlRegistry,
    ) -> Result<(), RouterError> {
        let target = self
            .ports
            .get_mut(port)
            .ok_or_else(|| RouterError::UnknownPort(port.to_string()))?;

        let previous = target.bound_target();
        let claimed = Self::claim(&mut self.slot, &self.publisher);
        target.apply(action, claimed, registry);

        if claimed.is_some() || target.bound_target() != previous {
            self.publisher.publish(RouterEvent::BoundControl {
                port: port.to_string(),
                control: target.bound_control(registry),
            });
        }

        Ok(())
    }

    pub fn value_from_pulses(
        &mut self,
        port: &str,
        pulses: f64,
        registry: &mut ControlRegistry,
    ) -> Result<(), RouterError> {
        self.dispatch(port, PortAction::ValueFromPulses(pulses), registry)
    }

    pub fn relative_angle(
        &mut self,
        port: &str,
        value: f64,
        registry: &mut ControlRegistry,
    ) -> Result<(), RouterError> {
        self.dispatch(port, PortAction::RelativeAngle(value), registry)
    }

    /// Forgets the pending selection and every port binding
    pub fn reset(&mut self) {
        self.slot.selected = None;
        self.slot.unclaimed.clear();
        self.publisher
            .publish(RouterEvent::UnclaimedControl(String::new()));

        for port in self.ports.iter_mut() {
            if port.bound_target().is_some() {
                self.publisher.publish(RouterEvent::BoundControl {
                    port: port.name().to_string(),
                    control: String::new(),
                });
            }
            port.reset();
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum RouterError {
    UnknownPort(String),
    DuplicatePortName(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPort(name) => write!(f, "No port named `{}`", name),
            Self::DuplicatePortName(name) => {
                write!(f, "A port named `{}` already exists", name)
            }
        }
    }
}

impl Error for RouterError {}
