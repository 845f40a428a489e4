//! Input aggregation
//!
//! Keyboard, touch pads and a polled gamepad are sampled once per frame and
//! OR-combined into a single [`TickInput`]. Platform listeners only record held
//! state; press edges are derived here against the previous sample.

use glam::Vec2;

use crate::sim::TickInput;
use crate::ui::{self, ButtonId};

/// Analog stick values inside this magnitude are ignored
pub const GAMEPAD_DEADZONE: f32 = 0.2;
/// Standard mapping "A" / cross
pub const GAMEPAD_FIRE_BUTTON: usize = 0;
/// Standard mapping "start"
pub const GAMEPAD_START_BUTTON: usize = 9;

/// Keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub confirm: bool,
    pub back: bool,
    pub pause: bool,
}

impl KeyState {
    /// Map a `KeyboardEvent.key` value to its slot; returns false for unbound keys
    pub fn set_key(&mut self, key: &str, down: bool) -> bool {
        let slot = match key {
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            " " => &mut self.fire,
            "Enter" => &mut self.confirm,
            "Escape" => &mut self.back,
            "p" | "P" => &mut self.pause,
            _ => return false,
        };
        *slot = down;
        true
    }
}

/// One polled gamepad
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl GamepadState {
    /// Horizontal stick with the deadzone applied
    pub fn axis_x(&self) -> f32 {
        let x = self.axes.first().copied().unwrap_or(0.0);
        if x.abs() > GAMEPAD_DEADZONE { x } else { 0.0 }
    }

    pub fn pressed(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }
}

/// Everything the platform collected for one frame
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub keys: KeyState,
    /// Active touch points in logical canvas coordinates
    pub touches: Vec<Vec2>,
    pub gamepad: Option<GamepadState>,
    /// Pointer presses since the last frame, oldest first
    pub clicks: Vec<Vec2>,
}

/// Turns held state into per-tick commands
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    prev_fire: bool,
    prev_confirm: bool,
    prev_back: bool,
    prev_pause: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample all channels. Touch pads only count when `touch_enabled`.
    pub fn sample(&mut self, raw: &RawInput, touch_enabled: bool) -> TickInput {
        let keys = raw.keys;
        let mut left = keys.left;
        let mut right = keys.right;
        let mut fire = keys.fire;
        let mut confirm = keys.confirm;

        if touch_enabled {
            for &touch in &raw.touches {
                match ui::touch_pad_at(touch) {
                    Some(ButtonId::TouchLeft) => left = true,
                    Some(ButtonId::TouchRight) => right = true,
                    Some(ButtonId::TouchFire) => fire = true,
                    _ => {}
                }
            }
        }

        if let Some(pad) = &raw.gamepad {
            let x = pad.axis_x();
            left |= x < 0.0;
            right |= x > 0.0;
            fire |= pad.pressed(GAMEPAD_FIRE_BUTTON);
            confirm |= pad.pressed(GAMEPAD_START_BUTTON);
        }

        let input = TickInput {
            move_left: left,
            move_right: right,
            fire_held: fire,
            fire_pressed: fire && !self.prev_fire,
            confirm: confirm && !self.prev_confirm,
            back: keys.back && !self.prev_back,
            pause: keys.pause && !self.prev_pause,
            click: raw.clicks.last().copied(),
        };

        self.prev_fire = fire;
        self.prev_confirm = confirm;
        self.prev_back = keys.back;
        self.prev_pause = keys.pause;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_keys(keys: KeyState) -> RawInput {
        RawInput {
            keys,
            ..Default::default()
        }
    }

    #[test]
    fn test_fire_edge_only_on_press() {
        let mut agg = InputAggregator::new();
        let held = with_keys(KeyState {
            fire: true,
            ..Default::default()
        });

        let first = agg.sample(&held, false);
        assert!(first.fire_held && first.fire_pressed);

        let second = agg.sample(&held, false);
        assert!(second.fire_held && !second.fire_pressed);

        agg.sample(&RawInput::default(), false);
        assert!(agg.sample(&held, false).fire_pressed);
    }

    #[test]
    fn test_key_mapping() {
        let mut keys = KeyState::default();
        assert!(keys.set_key("ArrowLeft", true));
        assert!(keys.set_key("P", true));
        assert!(!keys.set_key("q", true));
        assert!(keys.left && keys.pause);
        keys.set_key("ArrowLeft", false);
        assert!(!keys.left);
    }

    #[test]
    fn test_touch_pads_respect_setting() {
        let mut agg = InputAggregator::new();
        let raw = RawInput {
            touches: vec![Vec2::new(50.0, 560.0), Vec2::new(740.0, 560.0)],
            ..Default::default()
        };

        let off = agg.sample(&raw, false);
        assert!(!off.move_left && !off.fire_held);

        let on = agg.sample(&raw, true);
        assert!(on.move_left && !on.move_right);
        assert!(on.fire_held && on.fire_pressed);
    }

    #[test]
    fn test_gamepad_deadzone() {
        let mut agg = InputAggregator::new();
        let mut pad = GamepadState {
            axes: vec![0.15, 0.0],
            buttons: vec![false; 16],
        };
        let drift = agg.sample(
            &RawInput {
                gamepad: Some(pad.clone()),
                ..Default::default()
            },
            false,
        );
        assert!(!drift.move_left && !drift.move_right);

        pad.axes[0] = -0.8;
        pad.buttons[GAMEPAD_FIRE_BUTTON] = true;
        let push = agg.sample(
            &RawInput {
                gamepad: Some(pad),
                ..Default::default()
            },
            false,
        );
        assert!(push.move_left);
        assert!(push.fire_pressed);
    }

    #[test]
    fn test_channels_are_or_combined() {
        let mut agg = InputAggregator::new();
        let raw = RawInput {
            keys: KeyState {
                right: true,
                ..Default::default()
            },
            gamepad: Some(GamepadState {
                axes: vec![-1.0],
                buttons: vec![],
            }),
            ..Default::default()
        };
        let input = agg.sample(&raw, false);
        assert!(input.move_left && input.move_right);
    }

    #[test]
    fn test_latest_click_wins() {
        let mut agg = InputAggregator::new();
        let raw = RawInput {
            clicks: vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)],
            ..Default::default()
        };
        assert_eq!(agg.sample(&raw, false).click, Some(Vec2::new(2.0, 2.0)));
        assert_eq!(agg.sample(&RawInput::default(), false).click, None);
    }
}
