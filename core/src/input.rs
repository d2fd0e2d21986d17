//! Controller input abstraction
//!
//! The runner samples every controller port once per frame into an
//! [`InputFrame`]. Levels query it for edge-triggered presses, held buttons,
//! analog sticks and an 8-way direction used for menu navigation.

use glam::Vec2;

use partybox_shared::CONTROLLER_PORTS;

use crate::config::InputConfig;
use crate::console::RawInput;

/// Full-scale deflection of the analog stick in raw units.
pub const STICK_RANGE: f32 = 85.0;

bitflags::bitflags! {
    /// Digital buttons of one controller
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u16 {
        const A = 1 << 0;
        const B = 1 << 1;
        const Z = 1 << 2;
        const START = 1 << 3;
        const D_UP = 1 << 4;
        const D_DOWN = 1 << 5;
        const D_LEFT = 1 << 6;
        const D_RIGHT = 1 << 7;
        const C_UP = 1 << 8;
        const C_DOWN = 1 << 9;
        const C_LEFT = 1 << 10;
        const C_RIGHT = 1 << 11;
        const L = 1 << 12;
        const R = 1 << 13;
    }
}

/// Snapshot of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadState {
    pub buttons: Buttons,
    /// Raw stick X, positive right
    pub stick_x: i8,
    /// Raw stick Y, positive up
    pub stick_y: i8,
}

impl PadState {
    pub fn from_raw(raw: &RawInput) -> Self {
        let mut buttons = Buttons::empty();
        let pairs = [
            (raw.button_a, Buttons::A),
            (raw.button_b, Buttons::B),
            (raw.button_z, Buttons::Z),
            (raw.start, Buttons::START),
            (raw.dpad_up, Buttons::D_UP),
            (raw.dpad_down, Buttons::D_DOWN),
            (raw.dpad_left, Buttons::D_LEFT),
            (raw.dpad_right, Buttons::D_RIGHT),
            (raw.c_up, Buttons::C_UP),
            (raw.c_down, Buttons::C_DOWN),
            (raw.c_left, Buttons::C_LEFT),
            (raw.c_right, Buttons::C_RIGHT),
            (raw.left_trigger, Buttons::L),
            (raw.right_trigger, Buttons::R),
        ];
        for (down, flag) in pairs {
            buttons.set(flag, down);
        }
        Self {
            buttons,
            stick_x: raw.stick_x,
            stick_y: raw.stick_y,
        }
    }

    pub fn with_buttons(buttons: Buttons) -> Self {
        Self {
            buttons,
            ..Default::default()
        }
    }
}

/// Eight-way direction (plus neutral) used for menu navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction8 {
    #[default]
    None,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction8 {
    /// Classify a stick vector (already deadzoned) into one of eight sectors.
    pub fn from_vector(v: Vec2) -> Self {
        if v == Vec2::ZERO {
            return Direction8::None;
        }
        // Sectors are 45 degrees wide, centered on the compass points.
        let angle = v.y.atan2(v.x).to_degrees();
        let sector = (((angle + 360.0 + 22.5) % 360.0) / 45.0) as u32;
        match sector {
            0 => Direction8::Right,
            1 => Direction8::UpRight,
            2 => Direction8::Up,
            3 => Direction8::UpLeft,
            4 => Direction8::Left,
            5 => Direction8::DownLeft,
            6 => Direction8::Down,
            _ => Direction8::DownRight,
        }
    }

    fn from_digital(up: bool, down: bool, left: bool, right: bool) -> Self {
        let y = (up as i8) - (down as i8);
        let x = (right as i8) - (left as i8);
        Self::from_vector(Vec2::new(x as f32, y as f32))
    }

    /// Vertical list offset for a menu cursor.
    ///
    /// Up and left move the cursor back, down and right move it forward.
    pub fn selection_offset(self) -> i32 {
        match self {
            Direction8::UpRight | Direction8::Up | Direction8::UpLeft | Direction8::Left => -1,
            Direction8::DownLeft | Direction8::Down | Direction8::DownRight | Direction8::Right => {
                1
            }
            Direction8::None => 0,
        }
    }
}

/// Per-frame input for every controller port.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    current: [PadState; CONTROLLER_PORTS],
    previous: [PadState; CONTROLLER_PORTS],
    config: InputConfig,
}

impl InputFrame {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance to a new frame: current becomes previous, `pads` becomes current.
    pub fn advance(&mut self, pads: [PadState; CONTROLLER_PORTS]) {
        self.previous = self.current;
        self.current = pads;
    }

    pub fn pad(&self, port: usize) -> PadState {
        self.current.get(port).copied().unwrap_or_default()
    }

    /// Buttons that went down this frame.
    pub fn pressed(&self, port: usize) -> Buttons {
        if port >= CONTROLLER_PORTS {
            return Buttons::empty();
        }
        self.current[port].buttons & !self.previous[port].buttons
    }

    /// Buttons currently down.
    pub fn held(&self, port: usize) -> Buttons {
        self.pad(port).buttons
    }

    /// Whether `button` went down on any port this frame.
    pub fn any_pressed(&self, button: Buttons) -> bool {
        (0..CONTROLLER_PORTS).any(|port| self.pressed(port).intersects(button))
    }

    /// Whether `button` is held on any port.
    pub fn any_held(&self, button: Buttons) -> bool {
        (0..CONTROLLER_PORTS).any(|port| self.held(port).intersects(button))
    }

    /// Normalized analog stick with the deadzone applied.
    ///
    /// Values inside the deadzone clamp to zero; the rest is rescaled to
    /// the full `-1.0..=1.0` range.
    pub fn stick(&self, port: usize) -> Vec2 {
        let pad = self.pad(port);
        Vec2::new(
            self.apply_stick_deadzone(pad.stick_x as f32 / STICK_RANGE),
            self.apply_stick_deadzone(pad.stick_y as f32 / STICK_RANGE),
        )
    }

    fn apply_stick_deadzone(&self, value: f32) -> f32 {
        let deadzone = self.config.stick_deadzone;
        if value.abs() < deadzone {
            0.0
        } else {
            let sign = value.signum();
            let magnitude = (value.abs() - deadzone) / (1.0 - deadzone);
            sign * magnitude.clamp(0.0, 1.0)
        }
    }

    /// Held direction of a port, D-pad and C buttons taking priority over
    /// the stick.
    pub fn direction(&self, port: usize) -> Direction8 {
        let held = self.held(port);
        let digital = Direction8::from_digital(
            held.intersects(Buttons::D_UP | Buttons::C_UP),
            held.intersects(Buttons::D_DOWN | Buttons::C_DOWN),
            held.intersects(Buttons::D_LEFT | Buttons::C_LEFT),
            held.intersects(Buttons::D_RIGHT | Buttons::C_RIGHT),
        );
        if digital != Direction8::None {
            return digital;
        }
        Direction8::from_vector(self.stick(port))
    }

    /// Stick X edge: -1 or 1 on the frame the stick crosses the axis
    /// threshold, 0 otherwise.
    pub fn axis_pressed_x(&self, port: usize) -> i8 {
        self.axis_edge(port, |pad| pad.stick_x)
    }

    /// Stick Y edge, positive up.
    pub fn axis_pressed_y(&self, port: usize) -> i8 {
        self.axis_edge(port, |pad| pad.stick_y)
    }

    fn axis_edge(&self, port: usize, axis: impl Fn(&PadState) -> i8) -> i8 {
        if port >= CONTROLLER_PORTS {
            return 0;
        }
        let threshold = self.config.axis_threshold * STICK_RANGE;
        let side = |raw: i8| -> i8 {
            let v = raw as f32;
            if v <= -threshold {
                -1
            } else if v >= threshold {
                1
            } else {
                0
            }
        };
        let now = side(axis(&self.current[port]));
        if now != side(axis(&self.previous[port])) {
            now
        } else {
            0
        }
    }

    /// "Left" on any port: C-left, D-left or a fresh stick flick.
    pub fn any_left(&self) -> bool {
        (0..CONTROLLER_PORTS).any(|port| {
            self.pressed(port).intersects(Buttons::C_LEFT | Buttons::D_LEFT)
                || self.axis_pressed_x(port) == -1
        })
    }

    /// "Right" on any port: C-right, D-right or a fresh stick flick.
    pub fn any_right(&self) -> bool {
        (0..CONTROLLER_PORTS).any(|port| {
            self.pressed(port).intersects(Buttons::C_RIGHT | Buttons::D_RIGHT)
                || self.axis_pressed_x(port) == 1
        })
    }

    /// "Up" on any port: C-up, D-up or a fresh stick flick.
    pub fn any_up(&self) -> bool {
        (0..CONTROLLER_PORTS).any(|port| {
            self.pressed(port).intersects(Buttons::C_UP | Buttons::D_UP)
                || self.axis_pressed_y(port) == 1
        })
    }

    /// "Down" on any port: C-down, D-down or a fresh stick flick.
    pub fn any_down(&self) -> bool {
        (0..CONTROLLER_PORTS).any(|port| {
            self.pressed(port).intersects(Buttons::C_DOWN | Buttons::D_DOWN)
                || self.axis_pressed_y(port) == -1
        })
    }
}
