use crate::actions::{FanSpeedAction, LightOff, LightOn, RoomOff, RoomOn, Sequence};
use crate::devices::{CeilingFan, Device, DeviceKind, FanSpeed, Light, LivingRoom};
use crate::registry::{CommandRegistry, DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::{Action, ConfigError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Descriptor bundled with the crate: the classic five-slot walkthrough.
pub const DEMO_REMOTE_YAML: &str = include_str!("../../../configs/remote/demo.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub id: String,
    pub kind: DeviceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSpec {
    pub slot: usize,
    #[serde(default)]
    pub on: Option<ActionSpec>,
    #[serde(default)]
    pub off: Option<ActionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionSpec {
    LightOn { device: String },
    LightOff { device: String },
    RoomOn { device: String },
    RoomOff { device: String },
    FanSpeed { device: String, speed: FanSpeed },
    FanOff { device: String },
    Sequence { label: String, steps: Vec<ActionSpec> },
}

impl ActionSpec {
    pub fn build(&self, devices: &DeviceSet) -> Result<Rc<dyn Action>, ConfigError> {
        let action: Rc<dyn Action> = match self {
            ActionSpec::LightOn { device } => Rc::new(LightOn::new(devices.light(device)?)),
            ActionSpec::LightOff { device } => Rc::new(LightOff::new(devices.light(device)?)),
            ActionSpec::RoomOn { device } => Rc::new(RoomOn::new(devices.room(device)?)),
            ActionSpec::RoomOff { device } => Rc::new(RoomOff::new(devices.room(device)?)),
            ActionSpec::FanSpeed { device, speed } => {
                Rc::new(FanSpeedAction::new(devices.fan(device)?, *speed))
            }
            ActionSpec::FanOff { device } => Rc::new(FanSpeedAction::off(devices.fan(device)?)),
            ActionSpec::Sequence { label, steps } => {
                if steps.is_empty() {
                    return Err(ConfigError::EmptySequence(label.clone()));
                }
                let steps = steps
                    .iter()
                    .map(|s| s.build(devices))
                    .collect::<Result<Vec<_>, _>>()?;
                Rc::new(Sequence::new(label.clone(), steps))
            }
        };
        Ok(action)
    }
}

/// Devices of one remote, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct DeviceSet {
    pub devices: BTreeMap<String, Device>,
}

impl DeviceSet {
    pub fn insert(&mut self, id: impl Into<String>, device: Device) -> Result<(), ConfigError> {
        let id = id.into();
        if self.devices.contains_key(&id) {
            return Err(ConfigError::DuplicateDevice(id));
        }
        self.devices.insert(id, device);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Device, ConfigError> {
        self.devices
            .get(id)
            .ok_or_else(|| ConfigError::UnknownDevice(id.to_string()))
    }

    pub fn light(&self, id: &str) -> Result<Rc<Light>, ConfigError> {
        match self.get(id)? {
            Device::Light(d) => Ok(d.clone()),
            other => Err(mismatch(id, DeviceKind::Light, other)),
        }
    }

    pub fn room(&self, id: &str) -> Result<Rc<LivingRoom>, ConfigError> {
        match self.get(id)? {
            Device::LivingRoom(d) => Ok(d.clone()),
            other => Err(mismatch(id, DeviceKind::LivingRoom, other)),
        }
    }

    pub fn fan(&self, id: &str) -> Result<Rc<CeilingFan>, ConfigError> {
        match self.get(id)? {
            Device::CeilingFan(d) => Ok(d.clone()),
            other => Err(mismatch(id, DeviceKind::CeilingFan, other)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Device)> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

fn mismatch(id: &str, expected: DeviceKind, found: &Device) -> ConfigError {
    ConfigError::DeviceKindMismatch {
        device: id.to_string(),
        expected: expected.as_str(),
        found: found.kind().as_str(),
    }
}

/// A registry together with the devices its actions drive.
pub struct Remote {
    pub registry: CommandRegistry,
    pub devices: DeviceSet,
}

impl RemoteConfig {
    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(raw).context("parsing remote descriptor")
    }

    /// The bundled walkthrough descriptor.
    pub fn demo() -> anyhow::Result<Self> {
        Self::from_yaml_str(DEMO_REMOTE_YAML)
    }

    pub fn build(&self) -> Result<Remote, ConfigError> {
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        let mut devices = DeviceSet::default();
        for d in &self.devices {
            devices.insert(d.id.clone(), Device::new(d.kind, d.id.clone()))?;
        }
        let mut registry = CommandRegistry::new(self.capacity);
        for s in &self.slots {
            let on = s.on.as_ref().map(|a| a.build(&devices)).transpose()?;
            let off = s.off.as_ref().map(|a| a.build(&devices)).transpose()?;
            registry.bind(s.slot, on, off)?;
        }
        tracing::info!(
            capacity = self.capacity,
            devices = devices.len(),
            slots = self.slots.len(),
            "remote built"
        );
        Ok(Remote { registry, devices })
    }
}

pub fn load_remote_file(path: impl AsRef<Path>) -> anyhow::Result<RemoteConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading remote descriptor: {}", path.display()))?;
    let cfg: RemoteConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing yaml: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_descriptor_builds() {
        let cfg = RemoteConfig::demo().unwrap();
        let remote = cfg.build().unwrap();
        assert_eq!(remote.registry.capacity(), 7);
        assert_eq!(remote.devices.len(), 3);

        let slot0 = remote.registry.slot(0).unwrap();
        assert_eq!(slot0.on, "LivingRoomOnCommand");
        assert_eq!(slot0.off, "LivingRoomOffCommand");
        let slot4 = remote.registry.slot(4).unwrap();
        assert_eq!(slot4.on, "CeilingFanHighCommand");
        assert_eq!(slot4.off, "CeilingFanOffCommand");
        assert_eq!(remote.registry.slot(6).unwrap().on, "NoCommand");
    }

    #[test]
    fn test_demo_walkthrough() {
        let mut remote = RemoteConfig::demo().unwrap().build().unwrap();
        remote.registry.activate(2).unwrap();
        remote.registry.activate(4).unwrap();
        remote.registry.deactivate(2).unwrap();
        remote.registry.undo_last();

        let light = remote.devices.light("light").unwrap();
        let fan = remote.devices.fan("ceiling_fan").unwrap();
        assert!(light.is_on());
        assert_eq!(fan.speed(), FanSpeed::High);
        assert_eq!(remote.registry.last_invoked().label(), "LightOffCommand");
    }

    #[test]
    fn test_capacity_defaults_and_missing_entries() {
        let cfg = RemoteConfig::from_yaml_str(
            r#"
devices:
  - { id: porch, kind: light }
slots:
  - slot: 1
    on: { kind: light_on, device: porch }
"#,
        )
        .unwrap();
        assert_eq!(cfg.capacity, DEFAULT_CAPACITY);
        let remote = cfg.build().unwrap();
        let view = remote.registry.slot(1).unwrap();
        assert_eq!(view.on, "LightOnCommand");
        assert_eq!(view.off, "NoCommand");
    }

    #[test]
    fn test_sequence_spec() {
        let cfg = RemoteConfig::from_yaml_str(
            r#"
capacity: 2
devices:
  - { id: porch, kind: light }
  - { id: fan, kind: ceiling_fan }
slots:
  - slot: 0
    on:
      kind: sequence
      label: party
      steps:
        - { kind: light_on, device: porch }
        - { kind: fan_speed, device: fan, speed: high }
"#,
        )
        .unwrap();
        let mut remote = cfg.build().unwrap();
        remote.registry.activate(0).unwrap();
        let porch = remote.devices.light("porch").unwrap();
        let fan = remote.devices.fan("fan").unwrap();
        assert!(porch.is_on());
        assert_eq!(fan.speed(), FanSpeed::High);

        remote.registry.undo_last();
        assert!(!porch.is_on());
        assert_eq!(fan.speed(), FanSpeed::Off);
    }

    #[test]
    fn test_slot_beyond_capacity_rejected() {
        let cfg = RemoteConfig::from_yaml_str(
            r#"
capacity: 5
devices:
  - { id: porch, kind: light }
slots:
  - slot: 7
    on: { kind: light_on, device: porch }
"#,
        )
        .unwrap();
        assert!(matches!(
            cfg.build(),
            Err(ConfigError::Registry(crate::RegistryError::SlotOutOfRange {
                slot: 7,
                capacity: 5
            }))
        ));
    }

    #[test]
    fn test_capacity_too_large_rejected() {
        let huge = RemoteConfig::from_yaml_str("capacity: 18446744073709551615\n").unwrap();
        assert!(matches!(
            huge.build(),
            Err(ConfigError::CapacityTooLarge {
                capacity: usize::MAX,
                max: MAX_CAPACITY
            })
        ));

        let over = RemoteConfig::from_yaml_str("capacity: 65\n").unwrap();
        assert!(matches!(
            over.build(),
            Err(ConfigError::CapacityTooLarge { capacity: 65, .. })
        ));

        let at_limit = RemoteConfig::from_yaml_str("capacity: 64\n").unwrap();
        assert_eq!(at_limit.build().unwrap().registry.capacity(), MAX_CAPACITY);
    }

    #[test]
    fn test_device_errors() {
        let unknown = RemoteConfig::from_yaml_str(
            "slots:\n  - slot: 0\n    on: { kind: light_on, device: ghost }\n",
        )
        .unwrap();
        assert!(matches!(unknown.build(), Err(ConfigError::UnknownDevice(id)) if id == "ghost"));

        let wrong_kind = RemoteConfig::from_yaml_str(
            "devices:\n  - { id: fan, kind: ceiling_fan }\nslots:\n  - slot: 0\n    on: { kind: light_on, device: fan }\n",
        )
        .unwrap();
        match wrong_kind.build() {
            Err(ConfigError::DeviceKindMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "light");
                assert_eq!(found, "ceiling_fan");
            }
            other => panic!("unexpected: {:?}", other.err()),
        }

        let dup = RemoteConfig::from_yaml_str(
            "devices:\n  - { id: a, kind: light }\n  - { id: a, kind: light }\n",
        )
        .unwrap();
        assert!(matches!(dup.build(), Err(ConfigError::DuplicateDevice(_))));
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let cfg = RemoteConfig::from_yaml_str(
            "slots:\n  - slot: 0\n    on: { kind: sequence, label: nothing, steps: [] }\n",
        )
        .unwrap();
        assert!(matches!(cfg.build(), Err(ConfigError::EmptySequence(_))));
    }

    #[test]
    fn test_unknown_action_kind_fails_to_parse() {
        let err = RemoteConfig::from_yaml_str(
            "slots:\n  - slot: 0\n    on: { kind: teleport, device: x }\n",
        );
        assert!(err.is_err());
    }
}
