use crate::devices::{CeilingFan, FanSpeed, Light, LivingRoom};
use crate::Action;
use std::cell::Cell;
use std::rc::Rc;

/// Speed restored by an undo whose captured prior speed has no reverse mapping.
pub const FALLBACK_SPEED: FanSpeed = FanSpeed::Low;

pub struct LightOn {
    light: Rc<Light>,
}

impl LightOn {
    pub fn new(light: Rc<Light>) -> Self {
        Self { light }
    }
}

impl Action for LightOn {
    fn perform(&self) {
        self.light.on();
    }

    fn reverse(&self) {
        self.light.off();
    }

    fn label(&self) -> &str {
        "LightOnCommand"
    }
}

pub struct LightOff {
    light: Rc<Light>,
}

impl LightOff {
    pub fn new(light: Rc<Light>) -> Self {
        Self { light }
    }
}

impl Action for LightOff {
    fn perform(&self) {
        self.light.off();
    }

    fn reverse(&self) {
        self.light.on();
    }

    fn label(&self) -> &str {
        "LightOffCommand"
    }
}

/// Main light first, then the fancy light.
pub struct RoomOn {
    room: Rc<LivingRoom>,
}

impl RoomOn {
    pub fn new(room: Rc<LivingRoom>) -> Self {
        Self { room }
    }
}

impl Action for RoomOn {
    fn perform(&self) {
        self.room.on();
        self.room.fancy_light_on();
    }

    fn reverse(&self) {
        self.room.fancy_light_off();
        self.room.off();
    }

    fn label(&self) -> &str {
        "LivingRoomOnCommand"
    }
}

pub struct RoomOff {
    room: Rc<LivingRoom>,
}

impl RoomOff {
    pub fn new(room: Rc<LivingRoom>) -> Self {
        Self { room }
    }
}

impl Action for RoomOff {
    fn perform(&self) {
        self.room.fancy_light_off();
        self.room.off();
    }

    fn reverse(&self) {
        self.room.on();
        self.room.fancy_light_on();
    }

    fn label(&self) -> &str {
        "LivingRoomOffCommand"
    }
}

/// Drive a fan to a fixed speed, remembering the speed it replaced.
///
/// `reverse` restores the remembered speed, except when that speed is the
/// target itself: there is nothing distinct to go back to, so the fan drops
/// to [`FALLBACK_SPEED`]. The remembered speed starts as `Off`.
pub struct FanSpeedAction {
    fan: Rc<CeilingFan>,
    target: FanSpeed,
    prior: Cell<FanSpeed>,
}

impl FanSpeedAction {
    pub fn new(fan: Rc<CeilingFan>, target: FanSpeed) -> Self {
        Self {
            fan,
            target,
            prior: Cell::new(FanSpeed::Off),
        }
    }

    pub fn off(fan: Rc<CeilingFan>) -> Self {
        Self::new(fan, FanSpeed::Off)
    }

    pub fn target(&self) -> FanSpeed {
        self.target
    }

    /// Speed captured by the most recent `perform`.
    pub fn prior(&self) -> FanSpeed {
        self.prior.get()
    }

    fn undo_speed(&self) -> FanSpeed {
        let prior = self.prior.get();
        if prior == self.target {
            FALLBACK_SPEED
        } else {
            prior
        }
    }
}

impl Action for FanSpeedAction {
    fn perform(&self) {
        self.prior.set(self.fan.speed());
        self.fan.set_speed(self.target);
    }

    fn reverse(&self) {
        self.fan.set_speed(self.undo_speed());
    }

    fn label(&self) -> &str {
        match self.target {
            FanSpeed::Off => "CeilingFanOffCommand",
            FanSpeed::Low => "CeilingFanLowCommand",
            FanSpeed::Medium => "CeilingFanMediumCommand",
            FanSpeed::High => "CeilingFanHighCommand",
        }
    }
}

/// Several actions fired as one button press.
pub struct Sequence {
    label: String,
    steps: Vec<Rc<dyn Action>>,
}

impl Sequence {
    pub fn new(label: impl Into<String>, steps: Vec<Rc<dyn Action>>) -> Self {
        Self {
            label: label.into(),
            steps,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Action for Sequence {
    fn perform(&self) {
        for step in &self.steps {
            step.perform();
        }
    }

    fn reverse(&self) {
        for step in self.steps.iter().rev() {
            step.reverse();
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}
