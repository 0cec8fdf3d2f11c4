//! Canvas2D backend
//!
//! Replays a display list onto a `CanvasRenderingContext2d` sized to the
//! device pixel ratio.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{Blend, Color, DrawCmd, ImageId, SpriteAvailability};
use crate::platform::PlatformError;

/// Loaded images, all optional
#[derive(Default)]
pub struct SpriteImages {
    pub ship: Option<HtmlImageElement>,
    pub enemy: Option<HtmlImageElement>,
    pub tile: Option<HtmlImageElement>,
}

impl SpriteImages {
    pub fn availability(&self) -> SpriteAvailability {
        SpriteAvailability {
            ship: self.ship.is_some(),
            enemy: self.enemy.is_some(),
        }
    }

    fn get(&self, id: ImageId) -> Option<&HtmlImageElement> {
        match id {
            ImageId::Ship => self.ship.as_ref(),
            ImageId::Enemy => self.enemy.as_ref(),
            ImageId::Tile => self.tile.as_ref(),
        }
    }
}

/// Canvas render state
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub images: SpriteImages,
    /// CSS pixel size
    pub size: (f32, f32),
    dpr: f64,
}

impl CanvasRenderer {
    /// Acquire an opaque 2D context on `canvas`
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, PlatformError> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"alpha".into(), &false.into())?;
        let ctx = canvas
            .get_context_with_context_options("2d", &options)?
            .ok_or(PlatformError::MissingElement("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PlatformError::MissingElement("2d context"))?;

        Ok(Self {
            canvas,
            ctx,
            images: SpriteImages::default(),
            size: (1.0, 1.0),
            dpr: 1.0,
        })
    }

    /// Match the backing store to `width`×`height` CSS pixels at `dpr`
    pub fn resize(&mut self, width: f32, height: f32, dpr: f64) {
        let dpr = dpr.max(1.0);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
        self.canvas.set_width((width as f64 * dpr).floor() as u32);
        self.canvas.set_height((height as f64 * dpr).floor() as u32);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.size = (width, height);
        self.dpr = dpr;
        log::debug!("Canvas resized to {}x{} @{}x", width, height, dpr);
    }

    /// Replay a display list
    pub fn draw(&self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            if let Err(e) = self.draw_one(cmd) {
                // A single bad primitive must not stop the frame
                log::debug!("Draw command failed: {:?}", e);
            }
        }
    }

    fn draw_one(&self, cmd: &DrawCmd) -> Result<(), wasm_bindgen::JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear { .. } => {
                ctx.save();
                ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
                ctx.clear_rect(
                    0.0,
                    0.0,
                    self.canvas.width() as f64,
                    self.canvas.height() as f64,
                );
                ctx.restore();
            }
            DrawCmd::VerticalGradient { size, stops } => {
                let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, size.y as f64);
                for (offset, color) in stops {
                    gradient.add_color_stop(*offset, &color.to_css())?;
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
            }
            DrawCmd::Image {
                image,
                center,
                size,
                rotation,
            } => {
                let Some(img) = self.images.get(*image) else {
                    return Ok(());
                };
                ctx.save();
                ctx.translate(center.x as f64, center.y as f64)?;
                if *rotation != 0.0 {
                    ctx.rotate(*rotation as f64)?;
                }
                let half = *size / 2.0;
                let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    -half.x as f64,
                    -half.y as f64,
                    size.x as f64,
                    size.y as f64,
                );
                ctx.restore();
                drawn?;
            }
            DrawCmd::Tile {
                image,
                origin,
                size,
            } => {
                if let Some(img) = self.images.get(*image) {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        origin.x as f64,
                        origin.y as f64,
                        size.x as f64,
                        size.y as f64,
                    )?;
                }
            }
            DrawCmd::Ellipse {
                center,
                radii,
                fill,
                outline,
                blend,
            } => {
                ctx.save();
                if *blend == Blend::Additive {
                    ctx.set_global_composite_operation("lighter")?;
                }
                ctx.begin_path();
                ellipse_path(ctx, *center, *radii)?;
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
                if let Some((color, width)) = outline {
                    ctx.set_line_width(*width as f64);
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.stroke();
                }
                ctx.restore();
            }
            DrawCmd::RadialGlow {
                center,
                inner,
                outer,
                stops,
            } => {
                let (x, y) = (center.x as f64, center.y as f64);
                let gradient =
                    ctx.create_radial_gradient(x, y, *inner as f64, x, y, *outer as f64)?;
                for (offset, color) in stops {
                    gradient.add_color_stop(*offset, &color.to_css())?;
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(x, y, *outer as f64, 0.0, std::f64::consts::TAU)?;
                ctx.fill();
            }
            DrawCmd::Arc {
                center,
                radius,
                start,
                end,
                width,
                color,
            } => {
                ctx.begin_path();
                ctx.set_line_cap("round");
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&color.to_css());
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    *start as f64,
                    *end as f64,
                )?;
                ctx.stroke();
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.set_line_cap("butt");
                ctx.set_line_width(*width as f64);
                stroke_line(ctx, *from, *to, *color);
            }
        }
        Ok(())
    }
}

fn ellipse_path(
    ctx: &CanvasRenderingContext2d,
    center: Vec2,
    radii: Vec2,
) -> Result<(), wasm_bindgen::JsValue> {
    ctx.ellipse(
        center.x as f64,
        center.y as f64,
        radii.x as f64,
        radii.y as f64,
        0.0,
        0.0,
        std::f64::consts::TAU,
    )
}

fn stroke_line(ctx: &CanvasRenderingContext2d, from: Vec2, to: Vec2, color: Color) {
    ctx.set_stroke_style_str(&color.to_css());
    ctx.begin_path();
    ctx.move_to(from.x as f64, from.y as f64);
    ctx.line_to(to.x as f64, to.y as f64);
    ctx.stroke();
}
