use thiserror::Error;

pub type Result<T, E = RegistryError> = core::result::Result<T, E>;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("slot {slot} out of range (capacity {capacity})")]
    SlotOutOfRange { slot: usize, capacity: usize },
}

/// Failures while turning a remote descriptor into a live registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capacity {capacity} exceeds the maximum of {max} slots")]
    CapacityTooLarge { capacity: usize, max: usize },
    #[error("unknown device: {0}")]
    UnknownDevice(String),
    #[error("duplicate device id: {0}")]
    DuplicateDevice(String),
    #[error("device {device} is a {found}, expected a {expected}")]
    DeviceKindMismatch {
        device: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("sequence '{0}' has no steps")]
    EmptySequence(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
