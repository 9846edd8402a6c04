use crate::metrics::DispatchMetrics;
use crate::noop::NOOP;
use crate::types::{Button, RemoteSnapshot, SlotView};
use crate::{Action, RegistryError, Result};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Slot count of a remote built without an explicit capacity.
pub const DEFAULT_CAPACITY: usize = 7;

/// Largest slot count a remote descriptor may ask for.
pub const MAX_CAPACITY: usize = 64;

/// What a slot entry (or the undo register) points at.
#[derive(Clone, Default)]
pub enum Binding {
    /// The shared no-op action.
    #[default]
    Empty,
    Action(Rc<dyn Action>),
}

impl Binding {
    pub fn action(&self) -> &dyn Action {
        match self {
            Binding::Empty => &NOOP,
            Binding::Action(a) => a.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Binding::Empty)
    }
}

impl From<Rc<dyn Action>> for Binding {
    fn from(action: Rc<dyn Action>) -> Self {
        Binding::Action(action)
    }
}

impl From<Option<Rc<dyn Action>>> for Binding {
    fn from(action: Option<Rc<dyn Action>>) -> Self {
        action.map_or(Binding::Empty, Binding::Action)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({})", self.action().label())
    }
}

#[derive(Clone, Default, Debug)]
struct Slot {
    on: Binding,
    off: Binding,
}

impl Slot {
    fn entry(&self, button: Button) -> &Binding {
        match button {
            Button::On => &self.on,
            Button::Off => &self.off,
        }
    }
}

/// Fixed-size bank of on/off slots with a single-step undo register.
pub struct CommandRegistry {
    slots: Vec<Slot>,
    last: Binding,
    metrics: Option<DispatchMetrics>,
}

impl CommandRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::default(); capacity],
            last: Binding::Empty,
            metrics: None,
        }
    }

    /// Count presses and rejections into the given metrics.
    pub fn with_metrics(mut self, metrics: DispatchMetrics) -> Self {
        metrics.bound_slots.set(self.bound_slots() as i64);
        self.metrics = Some(metrics);
        self
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn last_invoked(&self) -> &dyn Action {
        self.last.action()
    }

    /// Replace both entries of `slot`.
    pub fn bind(
        &mut self,
        slot: usize,
        on: impl Into<Binding>,
        off: impl Into<Binding>,
    ) -> Result<()> {
        self.check(slot)?;
        let entry = Slot {
            on: on.into(),
            off: off.into(),
        };
        debug!(
            slot,
            on = entry.on.action().label(),
            off = entry.off.action().label(),
            "bound slot"
        );
        self.slots[slot] = entry;
        self.refresh_bound_gauge();
        Ok(())
    }

    /// Reset `slot` to the no-op pair.
    pub fn clear(&mut self, slot: usize) -> Result<()> {
        self.bind(slot, Binding::Empty, Binding::Empty)
    }

    pub fn activate(&mut self, slot: usize) -> Result<()> {
        self.press(slot, Button::On)
    }

    pub fn deactivate(&mut self, slot: usize) -> Result<()> {
        self.press(slot, Button::Off)
    }

    /// Reverse whatever was pressed last. The undo register is left as is,
    /// so pressing undo twice reverses twice.
    pub fn undo_last(&mut self) {
        info!(action = self.last.action().label(), "undo");
        if let Some(m) = &self.metrics {
            m.undos.inc();
        }
        self.last.action().reverse();
    }

    pub fn slot(&self, slot: usize) -> Result<SlotView> {
        self.check(slot)?;
        Ok(self.view(slot))
    }

    pub fn snapshot(&self) -> RemoteSnapshot {
        RemoteSnapshot {
            capacity: self.capacity(),
            slots: (0..self.slots.len()).map(|i| self.view(i)).collect(),
            last_invoked: self.last_invoked().label().to_string(),
        }
    }

    fn press(&mut self, slot: usize, button: Button) -> Result<()> {
        self.check(slot)?;
        let entry = self.slots[slot].entry(button).clone();
        info!(slot, %button, action = entry.action().label(), "button pressed");
        if let Some(m) = &self.metrics {
            match button {
                Button::On => m.activations.inc(),
                Button::Off => m.deactivations.inc(),
            }
        }
        self.last = entry;
        self.last.action().perform();
        Ok(())
    }

    fn check(&self, slot: usize) -> Result<()> {
        if slot < self.slots.len() {
            return Ok(());
        }
        warn!(slot, capacity = self.slots.len(), "slot out of range");
        if let Some(m) = &self.metrics {
            m.rejected.inc();
        }
        Err(RegistryError::SlotOutOfRange {
            slot,
            capacity: self.slots.len(),
        })
    }

    fn view(&self, slot: usize) -> SlotView {
        let s = &self.slots[slot];
        SlotView {
            slot,
            on: s.on.action().label().to_string(),
            off: s.off.action().label().to_string(),
        }
    }

    fn bound_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| !s.on.is_empty() || !s.off.is_empty())
            .count()
    }

    fn refresh_bound_gauge(&self) {
        if let Some(m) = &self.metrics {
            m.bound_slots.set(self.bound_slots() as i64);
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot().fmt(f)
    }
}
