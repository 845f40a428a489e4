//! Draw commands for 2D rendering
//!
//! The scene is described as a flat list of primitives in logical canvas
//! coordinates; the platform layer replays it on whatever surface it has.

use glam::Vec2;

use crate::sim::{EnemyKind, FallingKind, Rect, Tint};

/// RGBA, each channel 0-1
pub type Color = [f32; 4];

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect { rect: Rect, color: Color },
    /// Outline only
    StrokeRect { rect: Rect, color: Color, width: f32 },
    Circle { center: Vec2, radius: f32, color: Color },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: Align,
    },
}

/// Ordered draw commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub clear: Color,
    pub commands: Vec<DrawCmd>,
    /// Shake offset applied to everything
    pub offset: Vec2,
}

impl DrawList {
    pub fn new(clear: Color) -> Self {
        Self {
            clear,
            commands: Vec::new(),
            offset: Vec2::ZERO,
        }
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Rect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCmd::StrokeRect { rect, color, width });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color, align: Align) {
        self.commands.push(DrawCmd::Text {
            pos,
            text: text.into(),
            size,
            color,
            align,
        });
    }

    /// Centered text, the common case for menus
    pub fn label(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color) {
        self.text(pos, text, size, color, Align::Center);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text strings, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Same color with a new alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for canvas fill styles
pub fn css(color: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.02, 0.02, 0.05, 1.0];
    pub const PLAYER: Color = [0.2, 0.8, 0.4, 1.0];
    pub const SHIELD: Color = [0.4, 0.7, 1.0, 0.35];
    pub const PLAYER_BULLET: Color = [1.0, 1.0, 1.0, 1.0];
    pub const ENEMY_BULLET: Color = [1.0, 0.4, 0.2, 1.0];
    pub const SQUID: Color = [0.9, 0.4, 0.9, 1.0];
    pub const CRAB: Color = [0.4, 0.9, 0.9, 1.0];
    pub const OCTOPUS: Color = [0.9, 0.85, 0.3, 1.0]; // Gold/yellow
    pub const BLOCK: Color = [0.2, 0.9, 0.3, 1.0];
    pub const BOMB: Color = [0.9, 0.2, 0.2, 1.0];
    pub const SHIELD_CAPSULE: Color = [0.4, 0.7, 1.0, 1.0];
    pub const AUTO_FIRE: Color = [1.0, 0.6, 0.1, 1.0];
    pub const DUAL_BARREL: Color = [0.6, 0.2, 0.8, 1.0];
    pub const EXPLOSIVE: Color = [1.0, 0.4, 0.2, 1.0];
    pub const SPARK: Color = [1.0, 0.95, 0.7, 1.0];
    pub const TEXT: Color = [0.95, 0.95, 0.95, 1.0];
    pub const TEXT_DIM: Color = [0.6, 0.6, 0.7, 1.0];
    pub const ACCENT: Color = [0.2, 0.8, 0.4, 1.0];
    pub const BUTTON: Color = [0.12, 0.12, 0.2, 1.0];
    pub const BUTTON_BORDER: Color = [0.3, 0.3, 0.4, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];
    pub const TOUCH_PAD: Color = [1.0, 1.0, 1.0, 0.15];
}

/// Palette lookup for a simulation tint
pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Player => colors::PLAYER,
        Tint::PlayerBullet => colors::PLAYER_BULLET,
        Tint::EnemyBullet => colors::ENEMY_BULLET,
        Tint::Enemy(EnemyKind::Squid) => colors::SQUID,
        Tint::Enemy(EnemyKind::Crab) => colors::CRAB,
        Tint::Enemy(EnemyKind::Octopus) => colors::OCTOPUS,
        Tint::Block => colors::BLOCK,
        Tint::Falling(kind) => falling_color(kind),
        Tint::Spark => colors::SPARK,
    }
}

pub fn falling_color(kind: FallingKind) -> Color {
    match kind {
        FallingKind::Bomb => colors::BOMB,
        FallingKind::Shield => colors::SHIELD_CAPSULE,
        FallingKind::AutoFire => colors::AUTO_FIRE,
        FallingKind::DualBarrel => colors::DUAL_BARREL,
        FallingKind::Explosive => colors::EXPLOSIVE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_conversion() {
        assert_eq!(css([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1)");
        assert_eq!(css([2.0, -1.0, 0.0, 0.25]), "rgba(255, 0, 0, 0.25)");
    }

    #[test]
    fn test_power_ups_have_distinct_colors() {
        let mut seen: Vec<Color> = Vec::new();
        for kind in FallingKind::POWER_UPS {
            let c = falling_color(kind);
            assert!(!seen.contains(&c), "{kind:?} shares a color");
            seen.push(c);
        }
    }
}
