//! command-registry: slot-based remote control with single-step undo
//!
//! A [`CommandRegistry`] holds a fixed number of slots, each bound to an
//! activate/deactivate pair of [`Action`]s. Pressing a button runs the bound
//! action and remembers it so [`CommandRegistry::undo_last`] can reverse it.
//! Unset entries point at the shared [`NOOP`] action.

mod error;
pub use error::{ConfigError, RegistryError, Result};

mod traits;
pub use traits::Action;

mod noop;
pub use noop::{NoopAction, NOOP};

pub mod devices;
pub use devices::{CeilingFan, Device, DeviceKind, FanSpeed, Light, LivingRoom};

pub mod actions;
pub use actions::{FanSpeedAction, LightOff, LightOn, RoomOff, RoomOn, Sequence, FALLBACK_SPEED};

mod types;
pub use types::{Button, RemoteSnapshot, SlotView};

mod registry;
pub use registry::{Binding, CommandRegistry, DEFAULT_CAPACITY, MAX_CAPACITY};

mod metrics;
pub use metrics::{DispatchMetrics, MetricsHub};

mod config;
pub use config::{
    load_remote_file, ActionSpec, DeviceSet, DeviceSpec, Remote, RemoteConfig, SlotSpec,
    DEMO_REMOTE_YAML,
};
