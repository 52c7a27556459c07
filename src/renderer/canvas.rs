//! Board drawing: food with a pulsing glow, gradient snake, grid lines

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::GRID_SIZE;
use crate::settings::Settings;
use crate::sim::{Cell, GameState};

const FOOD_COLOR: &str = "#ff0066";
const SNAKE_GLOW: &str = "#4a00e0";
const HEAD_COLORS: (&str, &str) = ("#8a2be2", "#4a00e0");
const BODY_COLORS: (&str, &str) = ("#4a00e0", "#3300cc");
const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Returns `None` if the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// Side length of one cell in canvas pixels
    fn cell_size(&self) -> (f64, f64) {
        (
            self.canvas.width() as f64 / GRID_SIZE as f64,
            self.canvas.height() as f64 / GRID_SIZE as f64,
        )
    }

    /// Draw a full frame. `time` is the animation timestamp in ms.
    pub fn render(&self, state: &GameState, settings: &Settings, time: f64) {
        let ctx = &self.ctx;
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        ctx.clear_rect(0.0, 0.0, w, h);

        self.draw_food(state.food, time);
        self.draw_snake(state);
        if settings.show_grid {
            self.draw_grid(w, h);
        }
    }

    fn draw_food(&self, food: Cell, time: f64) {
        let ctx = &self.ctx;
        let (cw, ch) = self.cell_size();
        let pulse = (time / 200.0).sin() * 0.5 + 0.5;

        ctx.set_shadow_blur(15.0 + pulse * 5.0);
        ctx.set_shadow_color(FOOD_COLOR);
        ctx.set_fill_style_str(FOOD_COLOR);
        ctx.begin_path();
        let _ = ctx.arc(
            (food.x as f64 + 0.5) * cw,
            (food.y as f64 + 0.5) * ch,
            cw * 0.4,
            0.0,
            TAU,
        );
        ctx.fill();
    }

    fn draw_snake(&self, state: &GameState) {
        let ctx = &self.ctx;
        let (cw, ch) = self.cell_size();

        ctx.set_shadow_blur(10.0);
        ctx.set_shadow_color(SNAKE_GLOW);

        for (index, segment) in state.snake.iter().enumerate() {
            let x = segment.x as f64 * cw;
            let y = segment.y as f64 * ch;
            let (from, to) = if index == 0 { HEAD_COLORS } else { BODY_COLORS };

            let gradient = ctx.create_linear_gradient(x, y, x + cw, y + ch);
            let _ = gradient.add_color_stop(0.0, from);
            let _ = gradient.add_color_stop(1.0, to);
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(x, y, cw - 1.0, ch - 1.0);
        }
    }

    fn draw_grid(&self, w: f64, h: f64) {
        let ctx = &self.ctx;
        let (cw, ch) = self.cell_size();

        ctx.set_shadow_blur(0.0);
        ctx.set_stroke_style_str(GRID_COLOR);
        ctx.set_line_width(0.5);

        for i in 0..=GRID_SIZE {
            let i = i as f64;
            ctx.begin_path();
            ctx.move_to(i * cw, 0.0);
            ctx.line_to(i * cw, h);
            ctx.stroke();

            ctx.begin_path();
            ctx.move_to(0.0, i * ch);
            ctx.line_to(w, i * ch);
            ctx.stroke();
        }
    }
}
