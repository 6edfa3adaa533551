//! Host-side storage for routable controls.
//!
//! Ports never own the controls they drive. They hold a [`ControlId`] and
//! resolve it here on every event; once a control is removed its id stops
//! resolving, even if the slot is later reused.

use std::fmt;

use super::control_traits::{Capabilities, RoutableControl};
use crate::core::prelude::*;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ControlId {
    index: usize,
    generation: u32,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

pub struct ControlEntry {
    pub name: String,
    pub control: Box<dyn RoutableControl>,
}

impl fmt::Debug for ControlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlEntry")
            .field("name", &self.name)
            .field("capabilities", &Capabilities::of(self.control.as_ref()))
            .finish()
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<ControlEntry>,
}

#[derive(Debug, Default)]
pub struct ControlRegistry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    /// Latest control inserted under each name
    names: HashMap<String, ControlId>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<C>(&mut self, name: &str, control: C) -> ControlId
    where
        C: RoutableControl + 'static,
    {
        let entry = ControlEntry {
            name: name.to_string(),
            control: Box::new(control),
        };

        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.entry = Some(entry);
            ControlId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            ControlId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };

        self.names.insert(name.to_string(), id);
        id
    }

    pub fn remove(&mut self, id: ControlId) -> Option<ControlEntry> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.names.get(&entry.name) == Some(&id) {
            self.names.remove(&entry.name);
        }
        Some(entry)
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlEntry> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut ControlEntry> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub fn control_mut(
        &mut self,
        id: ControlId,
    ) -> Option<&mut dyn RoutableControl> {
        match self.get_mut(id) {
            Some(entry) => Some(entry.control.as_mut()),
            None => None,
        }
    }

    pub fn name(&self, id: ControlId) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    /// Looks a control up by display name. When several share a name the
    /// most recently inserted one wins.
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
