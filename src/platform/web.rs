//! Browser platform glue
//!
//! LocalStorage-backed key-value store, draw list replay on a 2D canvas
//! context, and gamepad polling.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Gamepad, GamepadButton, HtmlCanvasElement, Storage};

use super::storage::{KeyValueStore, StorageError};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::input::GamepadState;
use crate::renderer::draw::css;
use crate::renderer::{Align, DrawCmd, DrawList};

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::Unavailable)
    }
}

/// Replays draw lists on a canvas, scaled from logical to backing pixels
pub struct CanvasPresenter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPresenter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Size the backing store to the element's CSS size times the pixel ratio
    pub fn resize(&self, device_pixel_ratio: f64) {
        let w = (self.canvas.client_width() as f64 * device_pixel_ratio) as u32;
        let h = (self.canvas.client_height() as f64 * device_pixel_ratio) as u32;
        if w > 0 && h > 0 && (w != self.canvas.width() || h != self.canvas.height()) {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::info!("Canvas resized to {}x{}", w, h);
        }
    }

    /// Map a client-space point (event coordinates) into logical canvas space
    pub fn to_logical(&self, client_x: f64, client_y: f64) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        let w = rect.width().max(1.0);
        let h = rect.height().max(1.0);
        Vec2::new(
            ((client_x - rect.left()) / w) as f32 * CANVAS_WIDTH,
            ((client_y - rect.top()) / h) as f32 * CANVAS_HEIGHT,
        )
    }

    pub fn present(&self, list: &DrawList) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let sx = self.canvas.width() as f64 / CANVAS_WIDTH as f64;
        let sy = self.canvas.height() as f64 / CANVAS_HEIGHT as f64;

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_fill_style_str(&css(list.clear));
        ctx.fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);

        ctx.set_transform(
            sx,
            0.0,
            0.0,
            sy,
            list.offset.x as f64 * sx,
            list.offset.y as f64 * sy,
        )?;

        for cmd in &list.commands {
            match cmd {
                DrawCmd::Rect { rect, color } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.fill_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(&css(*color));
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(
                        rect.pos.x as f64,
                        rect.pos.y as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    ctx.fill();
                }
                DrawCmd::Text {
                    pos,
                    text,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_fill_style_str(&css(*color));
                    ctx.set_font(&format!("bold {}px monospace", size));
                    ctx.set_text_align(match align {
                        Align::Left => "left",
                        Align::Center => "center",
                        Align::Right => "right",
                    });
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }
}

/// First connected gamepad, if any
pub fn poll_gamepad() -> Option<GamepadState> {
    let pads = web_sys::window()?.navigator().get_gamepads().ok()?;
    pads.iter()
        .filter_map(|pad| pad.dyn_into::<Gamepad>().ok())
        .find(|pad| pad.connected())
        .map(|pad| GamepadState {
            axes: pad
                .axes()
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect(),
            buttons: pad
                .buttons()
                .iter()
                .map(|b| b.dyn_into::<GamepadButton>().is_ok_and(|b| b.pressed()))
                .collect(),
        })
}
