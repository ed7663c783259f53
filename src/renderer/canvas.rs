//! Canvas2D backend (WASM only)
//!
//! Loads the sprite images and replays [`DrawCommand`] lists onto a
//! `CanvasRenderingContext2d`.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::draw::{AssetStatus, Color, DrawCommand, Sprite};

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

/// Executes draw commands on a 2D canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: (f64, f64),
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasRenderer {
    /// Grab the 2D context and start loading sprites. Missing sprites are
    /// logged and replaced by fallback shapes.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            match load_image(sprite) {
                Ok(img) => {
                    images.insert(sprite, img);
                }
                Err(e) => log::error!("Could not create image for {}: {:?}", sprite.file_name(), e),
            }
        }

        Ok(Self {
            ctx,
            size: (canvas.width() as f64, canvas.height() as f64),
            images,
        })
    }

    /// Which sprites have finished decoding
    pub fn asset_status(&self) -> AssetStatus {
        let ready = |sprite| self.ready_image(sprite).is_some();
        AssetStatus {
            background: self
                .ready_image(Sprite::Background)
                .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32)),
            player: ready(Sprite::Player),
            fire: ready(Sprite::Fire),
            coin: ready(Sprite::Coin),
        }
    }

    fn ready_image(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        self.images
            .get(&sprite)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    /// Replay one frame
    pub fn execute(&self, commands: &[DrawCommand]) {
        let ctx = &self.ctx;
        for cmd in commands {
            match cmd {
                DrawCommand::Clear => ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1),
                DrawCommand::FillRect { rect, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(
                        rect.left() as f64,
                        rect.top() as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCommand::FillGradient { rect, top, bottom } => {
                    let gradient = ctx.create_linear_gradient(
                        0.0,
                        rect.top() as f64,
                        0.0,
                        rect.bottom() as f64,
                    );
                    gradient.add_color_stop(0.0, &css_color(*top)).ok();
                    gradient.add_color_stop(1.0, &css_color(*bottom)).ok();
                    ctx.set_fill_style_canvas_gradient(&gradient);
                    ctx.fill_rect(
                        rect.left() as f64,
                        rect.top() as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    );
                }
                DrawCommand::FillTriangle { points, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    ctx.line_to(points[1].x as f64, points[1].y as f64);
                    ctx.line_to(points[2].x as f64, points[2].y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )
                    .ok();
                    ctx.fill();
                }
                DrawCommand::StrokeCircle {
                    center,
                    radius,
                    color,
                    line_width,
                } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(*line_width as f64);
                    ctx.begin_path();
                    ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    )
                    .ok();
                    ctx.stroke();
                }
                DrawCommand::DrawImage { sprite, rect } => {
                    // Status can change between render and execute; skip quietly
                    let Some(img) = self.ready_image(*sprite) else {
                        continue;
                    };
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        rect.left() as f64,
                        rect.top() as f64,
                        rect.size.x as f64,
                        rect.size.y as f64,
                    )
                    .ok();
                }
            }
        }
    }
}

/// Start loading one sprite, logging the outcome
fn load_image(sprite: Sprite) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    let name = sprite.file_name();

    let onload = Closure::<dyn FnMut()>::new(move || {
        log::info!("Loaded {}", name);
    });
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let onerror = Closure::<dyn FnMut()>::new(move || {
        log::error!("Failed to load {}, using fallback shapes", name);
    });
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    img.set_src(name);
    Ok(img)
}
