//! On-screen button regions
//!
//! Menu buttons per screen and the touch control pads, all in logical canvas
//! coordinates. Hit testing tolerates a missing button (reports "not inside").

use glam::Vec2;

use crate::settings::Setting;
use crate::sim::GamePhase;
use crate::sim::rect::Rect;

/// What a button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    OpenSettings,
    Toggle(Setting),
    Back,
    Resume,
    Continue,
    ToTitle,
    NextWave,
    TouchLeft,
    TouchRight,
    TouchFire,
}

/// A clickable rectangle with a caption
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    const fn new(id: ButtonId, x: f32, y: f32, w: f32, h: f32, label: &'static str) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, w, h),
            label,
        }
    }
}

static TITLE_BUTTONS: [Button; 2] = [
    Button::new(ButtonId::Start, 300.0, 300.0, 200.0, 50.0, "START"),
    Button::new(ButtonId::OpenSettings, 300.0, 370.0, 200.0, 50.0, "SETTINGS"),
];

static SETTINGS_BUTTONS: [Button; 5] = [
    Button::new(ButtonId::Toggle(Setting::Particles), 250.0, 170.0, 300.0, 44.0, "PARTICLES"),
    Button::new(ButtonId::Toggle(Setting::ScreenShake), 250.0, 230.0, 300.0, 44.0, "SCREEN SHAKE"),
    Button::new(ButtonId::Toggle(Setting::TouchControls), 250.0, 290.0, 300.0, 44.0, "TOUCH CONTROLS"),
    Button::new(ButtonId::Toggle(Setting::ShowFps), 250.0, 350.0, 300.0, 44.0, "SHOW FPS"),
    Button::new(ButtonId::Back, 300.0, 450.0, 200.0, 50.0, "BACK"),
];

static PAUSED_BUTTONS: [Button; 1] = [Button::new(ButtonId::Resume, 300.0, 330.0, 200.0, 50.0, "RESUME")];

static GAME_OVER_BUTTONS: [Button; 2] = [
    Button::new(ButtonId::Continue, 300.0, 330.0, 200.0, 50.0, "CONTINUE"),
    Button::new(ButtonId::ToTitle, 300.0, 400.0, 200.0, 50.0, "TITLE"),
];

static LEVEL_COMPLETE_BUTTONS: [Button; 1] = [Button::new(ButtonId::NextWave, 300.0, 330.0, 200.0, 50.0, "NEXT WAVE")];

/// Touch pads shown along the bottom edge during play
pub static TOUCH_PADS: [Button; 3] = [
    Button::new(ButtonId::TouchLeft, 10.0, 530.0, 90.0, 60.0, "<"),
    Button::new(ButtonId::TouchRight, 110.0, 530.0, 90.0, 60.0, ">"),
    Button::new(ButtonId::TouchFire, 700.0, 530.0, 90.0, 60.0, "FIRE"),
];

/// Menu buttons on a screen (empty while playing)
pub fn buttons(phase: GamePhase) -> &'static [Button] {
    match phase {
        GamePhase::Title => &TITLE_BUTTONS,
        GamePhase::Settings => &SETTINGS_BUTTONS,
        GamePhase::Paused => &PAUSED_BUTTONS,
        GamePhase::GameOver => &GAME_OVER_BUTTONS,
        GamePhase::LevelComplete => &LEVEL_COMPLETE_BUTTONS,
        GamePhase::Countdown { .. } | GamePhase::Playing | GamePhase::FreezeFrame { .. } => &[],
    }
}

/// Guarded hit test: a missing button is never hit
pub fn is_inside(point: Vec2, button: Option<&Button>) -> bool {
    button.is_some_and(|b| b.rect.contains(point))
}

/// Which button on the current screen a click landed on
pub fn clicked(phase: GamePhase, click: Option<Vec2>) -> Option<ButtonId> {
    let point = click?;
    buttons(phase)
        .iter()
        .find(|b| is_inside(point, Some(*b)))
        .map(|b| b.id)
}

/// Touch pad under a point, if any
pub fn touch_pad_at(point: Vec2) -> Option<ButtonId> {
    TOUCH_PADS
        .iter()
        .find(|b| b.rect.contains(point))
        .map(|b| b.id)
}
