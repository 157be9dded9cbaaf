//! Canvas painter - replays a display list onto the overlay canvas
//!
//! Every op is painted independently: a failing op is logged and
//! skipped, and a gradient that cannot be built falls back to a flat
//! color. Nothing here returns an error to the render loop.

use wasm_bindgen::prelude::*;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

use super::shapes::{DrawOp, MagnifierView, Paint, TextAlign};
use crate::error::{describe_js_error, AnalysisError};
use crate::geometry::{CanvasSize, Point};

const GRID_DIVISIONS: u32 = 6;

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    video: HtmlVideoElement,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement, video: HtmlVideoElement) -> Result<Self, AnalysisError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| AnalysisError::Canvas(describe_js_error(&e)))?
            .ok_or_else(|| AnalysisError::Canvas("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AnalysisError::Canvas("context is not a CanvasRenderingContext2d".into()))?;

        Ok(Self { canvas, ctx, video })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    /// Match the canvas backing store to the native video size
    pub fn resize(&self, width: u32, height: u32) {
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }

    /// Clear, then paint `ops` in order
    pub fn paint(&self, ops: &[DrawOp]) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);

        for op in ops {
            // ctx state must not leak between ops even on failure
            self.ctx.save();
            if let Err(err) = self.paint_op(op) {
                log::warn!("draw op failed, skipping: {}", describe_js_error(&err));
            }
            self.ctx.restore();
        }
    }

    fn paint_op(&self, op: &DrawOp) -> Result<(), JsValue> {
        match op {
            DrawOp::Circle { center, radius, fill } => {
                self.ctx.begin_path();
                self.ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)?;
                self.apply_fill(fill, *center, *radius);
                self.ctx.fill();
            }
            DrawOp::Ring { center, radius, color, width } => {
                self.ctx.begin_path();
                self.ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU)?;
                self.ctx.set_stroke_style_str(color);
                self.ctx.set_line_width(*width);
                self.ctx.stroke();
            }
            DrawOp::Line { from, to, stroke, width } => {
                self.ctx.begin_path();
                self.ctx.move_to(from.x, from.y);
                self.ctx.line_to(to.x, to.y);
                self.apply_stroke(stroke, *width);
                self.ctx.stroke();
            }
            DrawOp::Polyline { points, stroke, width } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                self.ctx.begin_path();
                self.ctx.move_to(first.x, first.y);
                for p in rest {
                    self.ctx.line_to(p.x, p.y);
                }
                self.ctx.set_line_join("round");
                self.apply_stroke(stroke, *width);
                self.ctx.stroke();
            }
            DrawOp::Arc { center, radius, start, end, color, width } => {
                self.ctx.begin_path();
                self.ctx.arc(center.x, center.y, *radius, *start, *end)?;
                self.ctx.set_stroke_style_str(color);
                self.ctx.set_line_width(*width);
                self.ctx.stroke();
            }
            DrawOp::Text { at, text, color, font, align } => {
                self.ctx.set_font(font);
                self.ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_text(text, at.x, at.y)?;
            }
            DrawOp::Label { at, text, color, background, font } => {
                self.ctx.set_font(font);
                self.ctx.set_text_align("left");
                self.ctx.set_text_baseline("middle");
                let width = self.ctx.measure_text(text)?.width();
                let height = font_height(font);

                self.ctx.set_fill_style_str(background);
                self.ctx.fill_rect(at.x - 4.0, at.y - height / 2.0 - 3.0, width + 8.0, height + 6.0);
                self.ctx.set_fill_style_str(color);
                self.ctx.fill_text(text, at.x, at.y)?;
            }
            DrawOp::Magnifier(view) => self.paint_magnifier(view)?,
        }
        Ok(())
    }

    fn apply_fill(&self, paint: &Paint, center: Point, radius: f64) {
        match self.gradient(paint, center, radius) {
            Some(gradient) => self.ctx.set_fill_style_canvas_gradient(&gradient),
            None => self.ctx.set_fill_style_str(paint.fallback_color()),
        }
    }

    fn apply_stroke(&self, paint: &Paint, width: f64) {
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        match self.gradient(paint, Point::default(), 0.0) {
            Some(gradient) => self.ctx.set_stroke_style_canvas_gradient(&gradient),
            None => self.ctx.set_stroke_style_str(paint.fallback_color()),
        }
    }

    /// `None` for solid paints and for gradients the browser rejects
    fn gradient(&self, paint: &Paint, center: Point, radius: f64) -> Option<CanvasGradient> {
        let result: Result<CanvasGradient, JsValue> = match paint {
            Paint::Solid(_) => return None,
            Paint::Radial { inner, outer } => self
                .ctx
                .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
                .and_then(|g| {
                    g.add_color_stop(0.0, inner)?;
                    g.add_color_stop(1.0, outer)?;
                    Ok(g)
                }),
            Paint::Linear { from, to, stops } => {
                let g = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
                stops
                    .iter()
                    .try_for_each(|(offset, color)| g.add_color_stop(*offset as f32, color))
                    .map(|_| g)
            }
        };

        match result {
            Ok(g) => Some(g),
            Err(err) => {
                log::warn!("gradient rejected, using flat color: {}", describe_js_error(&err));
                None
            }
        }
    }

    /// Circular inset sampling the video and the overlay already painted
    /// this tick
    fn paint_magnifier(&self, view: &MagnifierView) -> Result<(), JsValue> {
        let r = view.size / 2.0;
        let (dx, dy) = (view.center.x - r, view.center.y - r);
        let src = view.source;
        if src.width <= 0.0 || src.height <= 0.0 {
            return Ok(());
        }

        self.ctx.begin_path();
        self.ctx.arc(view.center.x, view.center.y, r, 0.0, std::f64::consts::TAU)?;
        self.ctx.clip();

        self.ctx.set_fill_style_str("#000000");
        self.ctx.fill_rect(dx, dy, view.size, view.size);

        if self.video.video_width() > 0 {
            self.ctx
                .draw_image_with_html_video_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &self.video, src.x, src.y, src.width, src.height, dx, dy, view.size, view.size,
                )?;
        }
        self.ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.canvas, src.x, src.y, src.width, src.height, dx, dy, view.size, view.size,
            )?;

        if view.grid {
            self.ctx.set_stroke_style_str("rgba(255, 255, 255, 0.25)");
            self.ctx.set_line_width(1.0);
            let step = view.size / GRID_DIVISIONS as f64;
            self.ctx.begin_path();
            for i in 1..GRID_DIVISIONS {
                let offset = step * i as f64;
                self.ctx.move_to(dx + offset, dy);
                self.ctx.line_to(dx + offset, dy + view.size);
                self.ctx.move_to(dx, dy + offset);
                self.ctx.line_to(dx + view.size, dy + offset);
            }
            self.ctx.stroke();
        }

        if view.crosshair {
            self.ctx.set_stroke_style_str("rgba(255, 60, 60, 0.9)");
            self.ctx.set_line_width(1.5);
            self.ctx.begin_path();
            self.ctx.move_to(view.center.x - 10.0, view.center.y);
            self.ctx.line_to(view.center.x + 10.0, view.center.y);
            self.ctx.move_to(view.center.x, view.center.y - 10.0);
            self.ctx.line_to(view.center.x, view.center.y + 10.0);
            self.ctx.stroke();
        }

        self.ctx.begin_path();
        self.ctx.arc(view.center.x, view.center.y, r - 1.0, 0.0, std::f64::consts::TAU)?;
        self.ctx.set_stroke_style_str("#ffffff");
        self.ctx.set_line_width(2.0);
        self.ctx.stroke();
        Ok(())
    }
}

/// Pixel size from a CSS font shorthand like "bold 13px sans-serif"
fn font_height(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px")?.parse::<f64>().ok())
        .unwrap_or(12.0)
}
