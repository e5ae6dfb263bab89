//! Canvas 2D backend
//!
//! Sprites load in the background. Until an image has decoded (or if it
//! never does) the renderer draws a flat rectangle in its place.

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{RenderFrame, Renderer, ROAD_COLOR, fire_color, obstacle_fallback_color};
use crate::consts::ROAD_HEIGHT;
use crate::sim::{ObstacleKind, Rect};

const BIKE_SPRITE: &str = "images/bike.png";
const CAR_SPRITE: &str = "assets/car.png";
const STONE_SPRITE: &str = "images/box.png";
const RIDER_FALLBACK_COLOR: &str = "#ffb300";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    bike: Option<HtmlImageElement>,
    car: Option<HtmlImageElement>,
    stone: Option<HtmlImageElement>,
}

fn load_sprite(src: &str) -> Option<HtmlImageElement> {
    match HtmlImageElement::new() {
        Ok(img) => {
            img.set_src(src);
            Some(img)
        }
        Err(e) => {
            log::warn!("Could not create image for {}: {:?}", src, e);
            None
        }
    }
}

/// Decoded and usable
fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref().filter(|i| i.complete() && i.natural_width() > 0)
}

impl CanvasRenderer {
    /// Size the canvas to the play field and start loading sprites
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        Ok(Self {
            ctx,
            bike: load_sprite(BIKE_SPRITE),
            car: load_sprite(CAR_SPRITE),
            stone: load_sprite(STONE_SPRITE),
        })
    }

    fn draw_sprite(&self, img: Option<&HtmlImageElement>, rect: &Rect, fallback: &str) {
        let (x, y) = (rect.left() as f64, rect.top() as f64);
        let (w, h) = (rect.size.x as f64, rect.size.y as f64);
        let drawn = img
            .map(|img| {
                self.ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
                    .is_ok()
            })
            .unwrap_or(false);
        if !drawn {
            self.ctx.set_fill_style_str(fallback);
            self.ctx.fill_rect(x, y, w, h);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_>) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, frame.field_width as f64, frame.field_height as f64);

        ctx.set_fill_style_str(ROAD_COLOR);
        ctx.fill_rect(
            0.0,
            frame.ground_y as f64,
            frame.field_width as f64,
            ROAD_HEIGHT as f64,
        );

        self.draw_sprite(ready(&self.bike), &frame.rider, RIDER_FALLBACK_COLOR);

        for p in frame.particles {
            ctx.set_fill_style_str(&fire_color(p.alpha));
            ctx.begin_path();
            if ctx
                .arc(
                    p.pos.x as f64,
                    p.pos.y as f64,
                    p.radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                )
                .is_ok()
            {
                ctx.fill();
            }
        }

        for obstacle in frame.obstacles {
            let sprite = match obstacle.kind {
                ObstacleKind::Car => ready(&self.car),
                ObstacleKind::Stone => ready(&self.stone),
            };
            self.draw_sprite(sprite, &obstacle.bounds(), obstacle_fallback_color(obstacle.kind));
        }
    }
}
