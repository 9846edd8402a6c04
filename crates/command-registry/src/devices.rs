use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::info;

#[derive(Debug)]
pub struct Light {
    name: String,
    on: Cell<bool>,
}

impl Light {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on(&self) {
        self.on.set(true);
        info!(device = %self.name, "light is turned on");
    }

    pub fn off(&self) {
        self.on.set(false);
        info!(device = %self.name, "light is turned off");
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }
}

/// A room with a main light and a separately switched accent ("fancy") light.
#[derive(Debug)]
pub struct LivingRoom {
    name: String,
    on: Cell<bool>,
    fancy_on: Cell<bool>,
}

impl LivingRoom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: Cell::new(false),
            fancy_on: Cell::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on(&self) {
        self.on.set(true);
        info!(device = %self.name, "living room light is turned on");
    }

    pub fn off(&self) {
        self.on.set(false);
        info!(device = %self.name, "living room light is turned off");
    }

    pub fn fancy_light_on(&self) {
        self.fancy_on.set(true);
        info!(device = %self.name, "living room fancy light is turned on");
    }

    pub fn fancy_light_off(&self) {
        self.fancy_on.set(false);
        info!(device = %self.name, "living room fancy light is turned off");
    }

    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    pub fn is_fancy_on(&self) -> bool {
        self.fancy_on.get()
    }
}

/// Ceiling fan speeds, ordered from stopped to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanSpeed {
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl FanSpeed {
    pub fn as_str(self) -> &'static str {
        match self {
            FanSpeed::Off => "off",
            FanSpeed::Low => "low",
            FanSpeed::Medium => "medium",
            FanSpeed::High => "high",
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct CeilingFan {
    name: String,
    speed: Cell<FanSpeed>,
}

impl CeilingFan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: Cell::new(FanSpeed::Off),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> FanSpeed {
        self.speed.get()
    }

    pub fn set_speed(&self, speed: FanSpeed) {
        self.speed.set(speed);
        match speed {
            FanSpeed::Off => info!(device = %self.name, "ceiling fan is turned off"),
            _ => info!(device = %self.name, speed = %speed, "ceiling fan speed set"),
        }
    }

    pub fn off(&self) {
        self.set_speed(FanSpeed::Off);
    }

    pub fn low(&self) {
        self.set_speed(FanSpeed::Low);
    }

    pub fn medium(&self) {
        self.set_speed(FanSpeed::Medium);
    }

    pub fn high(&self) {
        self.set_speed(FanSpeed::High);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Light,
    LivingRoom,
    CeilingFan,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Light => "light",
            DeviceKind::LivingRoom => "living_room",
            DeviceKind::CeilingFan => "ceiling_fan",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to any controllable device.
#[derive(Debug, Clone)]
pub enum Device {
    Light(Rc<Light>),
    LivingRoom(Rc<LivingRoom>),
    CeilingFan(Rc<CeilingFan>),
}

impl Device {
    pub fn new(kind: DeviceKind, name: impl Into<String>) -> Self {
        match kind {
            DeviceKind::Light => Device::Light(Rc::new(Light::new(name))),
            DeviceKind::LivingRoom => Device::LivingRoom(Rc::new(LivingRoom::new(name))),
            DeviceKind::CeilingFan => Device::CeilingFan(Rc::new(CeilingFan::new(name))),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Device::Light(_) => DeviceKind::Light,
            Device::LivingRoom(_) => DeviceKind::LivingRoom,
            Device::CeilingFan(_) => DeviceKind::CeilingFan,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Device::Light(d) => d.name(),
            Device::LivingRoom(d) => d.name(),
            Device::CeilingFan(d) => d.name(),
        }
    }

    /// Short status string, e.g. `on`, `on (fancy off)`, `speed=high`.
    pub fn state(&self) -> String {
        let onoff = |b: bool| if b { "on" } else { "off" };
        match self {
            Device::Light(d) => onoff(d.is_on()).to_string(),
            Device::LivingRoom(d) => {
                format!("{} (fancy {})", onoff(d.is_on()), onoff(d.is_fancy_on()))
            }
            Device::CeilingFan(d) => format!("speed={}", d.speed()),
        }
    }
}
