//! Canvas 2D renderer (browser only)
//!
//! Flat-color pixel art: ground line with scrolling dashes, Granny, trash
//! cans and flying cats.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::RenderHook;
use crate::sim::{Obstacle, ObstacleKind, Player, RunState};
use crate::tuning::Tuning;

const GROUND_COLOR: &str = "#555";
const HAIR_COLOR: &str = "#cccccc";
const SKIN_COLOR: &str = "#ffdbac";
const DRESS_COLOR: &str = "#9b59b6";
const CAN_BODY: &str = "#7f8c8d";
const CAN_RIBS: &str = "#95a5a6";
const DARK: &str = "#2c3e50";

/// Spacing of the ground dashes
const DASH_SPACING: f64 = 50.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    ground_y: f64,
    /// Freeze idle animations (legs, tails)
    reduced_motion: bool,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, tuning: &Tuning) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        canvas.set_width(tuning.field_width as u32);
        canvas.set_height(tuning.field_height as u32);
        Ok(Self {
            ctx,
            width: tuning.field_width as f64,
            height: tuning.field_height as f64,
            ground_y: tuning.ground_y as f64,
            reduced_motion: false,
        })
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Title screen backdrop: ground and a standing Granny
    pub fn render_idle(&mut self, state: &RunState) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.draw_ground(0.0, state.speed);
        self.draw_granny(&state.player, 0.0);
    }

    fn draw_ground(&self, time_ms: f64, speed: f32) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(GROUND_COLOR);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, self.ground_y);
        ctx.line_to(self.width, self.ground_y);
        ctx.stroke();

        let offset = (time_ms * speed as f64 / 10.0) % DASH_SPACING;
        let dash_y = self.ground_y + 5.0;
        ctx.begin_path();
        let mut x = -DASH_SPACING;
        while x < self.width {
            ctx.move_to(x + DASH_SPACING - offset, dash_y);
            ctx.line_to(x + DASH_SPACING - 10.0 - offset, dash_y);
            x += DASH_SPACING;
        }
        ctx.stroke();
    }

    fn draw_granny(&self, player: &Player, time_ms: f64) {
        let ctx = &self.ctx;
        let x = player.pos.x as f64;
        let y = player.pos.y as f64;
        ctx.save();

        if player.is_ducking {
            ctx.set_fill_style_str(HAIR_COLOR);
            ctx.fill_rect(x + 25.0, y + 5.0, 12.0, 12.0);
            ctx.set_fill_style_str(SKIN_COLOR);
            ctx.fill_rect(x + 15.0, y + 10.0, 18.0, 15.0);

            ctx.set_stroke_style_str("#000");
            ctx.set_line_width(1.5);
            ctx.stroke_rect(x + 18.0, y + 15.0, 6.0, 4.0);
            ctx.stroke_rect(x + 26.0, y + 15.0, 6.0, 4.0);

            ctx.set_fill_style_str(DRESS_COLOR);
            ctx.fill_rect(x + 5.0, y + 20.0, 35.0, 10.0);

            ctx.set_fill_style_str("#000");
            ctx.fill_rect(x + 10.0, y + 28.0, 6.0, 4.0);
            ctx.fill_rect(x + 24.0, y + 28.0, 6.0, 4.0);
        } else {
            ctx.set_fill_style_str(HAIR_COLOR);
            ctx.fill_rect(x + 20.0, y - 5.0, 15.0, 15.0);
            ctx.set_fill_style_str(SKIN_COLOR);
            ctx.fill_rect(x + 10.0, y + 5.0, 20.0, 20.0);

            ctx.set_stroke_style_str("#000");
            ctx.set_line_width(1.5);
            ctx.stroke_rect(x + 12.0, y + 10.0, 8.0, 5.0);
            ctx.stroke_rect(x + 22.0, y + 10.0, 8.0, 5.0);

            ctx.set_fill_style_str(DRESS_COLOR);
            ctx.fill_rect(x + 5.0, y + 25.0, 30.0, 15.0);

            // Legs pump while running on the ground
            let stride = if player.is_jumping || self.reduced_motion {
                0.0
            } else {
                (time_ms / 50.0).sin() * 5.0
            };
            ctx.set_fill_style_str("#000");
            ctx.fill_rect(x + 10.0, y + 40.0, 6.0, 7.0 + stride);
            ctx.fill_rect(x + 24.0, y + 40.0, 6.0, 7.0 - stride);
        }

        ctx.restore();
    }

    fn draw_trash_can(&self, obstacle: &Obstacle) {
        let ctx = &self.ctx;
        let (x, y) = (obstacle.pos.x as f64, obstacle.pos.y as f64);
        let (w, h) = (obstacle.size.x as f64, obstacle.size.y as f64);

        ctx.set_fill_style_str(CAN_BODY);
        ctx.fill_rect(x, y, w, h);
        ctx.set_fill_style_str(CAN_RIBS);
        for i in 1..4 {
            ctx.fill_rect(x + i as f64 * 5.0, y + 5.0, 2.0, h - 10.0);
        }
        // Lid
        ctx.set_fill_style_str(DARK);
        ctx.fill_rect(x - 2.0, y, w + 4.0, 8.0);
    }

    fn draw_cat(&self, obstacle: &Obstacle, time_ms: f64) {
        let ctx = &self.ctx;
        let x = obstacle.pos.x as f64;
        let w = obstacle.size.x as f64;
        // The cat dangles at the bottom of its hitbox
        let bottom = (obstacle.pos.y + obstacle.size.y) as f64;

        // Fading rope/shadow column from the top
        let gradient = ctx.create_linear_gradient(x, 0.0, x, bottom);
        let _ = gradient.add_color_stop(0.0, "rgba(52, 73, 94, 0.1)");
        let _ = gradient.add_color_stop(0.8, "rgba(52, 73, 94, 0.4)");
        let _ = gradient.add_color_stop(1.0, "rgba(52, 73, 94, 0.8)");
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(x, obstacle.pos.y as f64, w, obstacle.size.y as f64);

        ctx.set_fill_style_str(DARK);
        // Body and head
        ctx.fill_rect(x + 5.0, bottom - 25.0, w - 10.0, 20.0);
        ctx.fill_rect(x + w - 15.0, bottom - 35.0, 15.0, 15.0);

        // Ears
        ctx.begin_path();
        ctx.move_to(x + w - 15.0, bottom - 35.0);
        ctx.line_to(x + w - 20.0, bottom - 45.0);
        ctx.line_to(x + w - 8.0, bottom - 35.0);
        ctx.fill();
        ctx.begin_path();
        ctx.move_to(x + w - 5.0, bottom - 35.0);
        ctx.line_to(x + w + 2.0, bottom - 45.0);
        ctx.line_to(x + w, bottom - 35.0);
        ctx.fill();

        // Tail
        let wiggle = if self.reduced_motion {
            0.0
        } else {
            (time_ms / 20.0).sin() * 8.0
        };
        ctx.set_stroke_style_str(DARK);
        ctx.set_line_width(4.0);
        ctx.begin_path();
        ctx.move_to(x + 5.0, bottom - 15.0);
        ctx.quadratic_curve_to(x - 15.0, bottom - 15.0 + wiggle, x - 10.0, bottom - 40.0);
        ctx.stroke();
    }
}

impl RenderHook for CanvasRenderer {
    fn render(&mut self, state: &RunState, time_ms: f64) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.draw_ground(time_ms, state.speed);

        for obstacle in &state.obstacles {
            self.ctx.save();
            match obstacle.kind {
                ObstacleKind::GroundHazard => self.draw_trash_can(obstacle),
                ObstacleKind::AerialHazard => self.draw_cat(obstacle, time_ms),
            }
            self.ctx.restore();
        }

        self.draw_granny(&state.player, time_ms);
    }
}
