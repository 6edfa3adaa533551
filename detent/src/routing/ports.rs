//! The ordered, persisted collection of ports a profile carries.

use indexmap::IndexMap;

use super::port::Port;
use super::router::RouterError;
use crate::core::prelude::*;

pub const DEFAULT_PORT_COUNT: usize = 4;

/// Ports keyed by their unique name. Uses [`IndexMap`] so that the order
/// ports were declared in survives saving and reloading.
#[derive(Clone, Debug)]
pub struct Ports {
    ports: IndexMap<String, Port>,
    /// Tracks structural changes (add, remove, rename). Configuration changes
    /// are tracked by each port.
    changed: bool,
}

impl Default for Ports {
    fn default() -> Self {
        Self::with_count(DEFAULT_PORT_COUNT)
    }
}

impl Ports {
    pub fn with_count(count: usize) -> Self {
        let ports = (0..count)
            .map(|i| {
                let name = Self::default_name(i);
                (name.clone(), Port::new(&name))
            })
            .collect();

        Self {
            ports,
            changed: false,
        }
    }

    /// Builds a collection from deserialized ports. An empty list is the
    /// first-run case and yields the default ports instead.
    pub fn from_ports(ports: Vec<Port>) -> Result<Self, RouterError> {
        if ports.is_empty() {
            info!("No ports configured; creating {}", DEFAULT_PORT_COUNT);
            let mut defaults = Self::default();
            defaults.changed = true;
            return Ok(defaults);
        }

        let mut map = IndexMap::with_capacity(ports.len());
        for port in ports {
            let name = port.name().to_string();
            if map.contains_key(&name) {
                return Err(RouterError::DuplicatePortName(name));
            }
            map.insert(name, port);
        }

        Ok(Self {
            ports: map,
            changed: false,
        })
    }

    pub fn default_name(index: usize) -> String {
        format!("Port {}", index)
    }

    /// Appends a port named with the first free `Port N`
    pub fn add_port(&mut self) -> &mut Port {
        let mut index = self.ports.len();
        while self.ports.contains_key(&Self::default_name(index)) {
            index += 1;
        }

        let name = Self::default_name(index);
        self.changed = true;
        self.ports
            .entry(name.clone())
            .or_insert_with(|| Port::new(&name))
    }

    pub fn remove_port(&mut self, name: &str) -> Result<Port, RouterError> {
        let port = self
            .ports
            .shift_remove(name)
            .ok_or_else(|| RouterError::UnknownPort(name.to_string()))?;
        self.changed = true;
        Ok(port)
    }

    /// Renames a port in place, keeping its position in the collection
    pub fn rename_port(
        &mut self,
        name: &str,
        new_name: &str,
    ) -> Result<(), RouterError> {
        if name == new_name {
            return if self.ports.contains_key(name) {
                Ok(())
            } else {
                Err(RouterError::UnknownPort(name.to_string()))
            };
        }

        if self.ports.contains_key(new_name) {
            return Err(RouterError::DuplicatePortName(new_name.to_string()));
        }

        let (index, _, mut port) = self
            .ports
            .shift_remove_full(name)
            .ok_or_else(|| RouterError::UnknownPort(name.to_string()))?;

        port.set_name(new_name);
        self.ports.shift_insert(index, new_name.to_string(), port);
        self.changed = true;

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Port> {
        self.ports.values_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.ports.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// True if the collection needs saving
    pub fn changed(&self) -> bool {
        self.changed || self.ports.values().any(Port::changed)
    }

    pub fn mark_unchanged(&mut self) {
        self.changed = false;
        for port in self.ports.values_mut() {
            port.mark_unchanged();
        }
    }
}
