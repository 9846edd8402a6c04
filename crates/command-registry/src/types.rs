use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels bound to one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub slot: usize,
    pub on: String,
    pub off: String,
}

/// Point-in-time view of a whole remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub capacity: usize,
    pub slots: Vec<SlotView>,
    pub last_invoked: String,
}

impl RemoteSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RemoteSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "--------- Remote Control --------")?;
        for s in &self.slots {
            writeln!(f, "[slot {}] {}\t{}", s.slot, s.on, s.off)?;
        }
        write!(f, "LastCommand = {}", self.last_invoked)
    }
}

/// Which button of a slot was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    On,
    Off,
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::On => f.write_str("on"),
            Button::Off => f.write_str("off"),
        }
    }
}
