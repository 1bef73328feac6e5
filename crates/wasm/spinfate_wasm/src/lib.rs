//! Wheel engine for the browser.
//!
//! JavaScript owns the canvas and the animation frame loop; this crate owns
//! the spin state. Randomness comes from the caller (`Math.random()`), so the
//! engine stays deterministic for a given set of rolls.

use wasm_bindgen::prelude::*;

use spinfate_core::segments::{SEGMENTS, Segment};
use spinfate_core::wheel::{self, SpinRolls, Wheel};

/// Returns the version of the spinfate_wasm package.
#[wasm_bindgen]
pub fn version() -> String {
    spinfate_core::version().to_string()
}

/// A wheel bound to one canvas.
#[wasm_bindgen]
#[derive(Default)]
pub struct WheelHandle {
    wheel: Wheel,
    landed: Option<Segment>,
}

#[wasm_bindgen]
impl WheelHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WheelHandle {
        WheelHandle::default()
    }

    /// Start a spin. `turns`, `offset` and `duration` are uniform rolls in
    /// `[0, 1)`. Returns `false` (and does nothing) while already spinning or
    /// when `remaining` is zero.
    pub fn start(
        &mut self,
        remaining: i32,
        now_ms: f64,
        turns: f64,
        offset: f64,
        duration: f64,
    ) -> bool {
        let started = self.wheel.start(
            i64::from(remaining),
            now_ms,
            SpinRolls {
                turns,
                offset,
                duration,
            },
        );
        if started {
            self.landed = None;
        }
        started
    }

    /// Advance to `now_ms` and return the angle to draw.
    ///
    /// On the final frame the landed segment becomes available through
    /// [`WheelHandle::landed`].
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if let Some(frame) = self.wheel.tick(now_ms) {
            if frame.landed.is_some() {
                self.landed = frame.landed;
            }
            frame.angle
        } else {
            self.wheel.angle()
        }
    }

    /// Label of the segment the last spin landed on, once it has finished.
    pub fn landed(&self) -> Option<String> {
        self.landed.map(|s| s.label().to_string())
    }

    pub fn angle(&self) -> f64 {
        self.wheel.angle()
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    pub fn segment_count(&self) -> usize {
        SEGMENTS.len()
    }

    /// Label of segment `index` in drawing order.
    pub fn segment_label(&self, index: usize) -> Option<String> {
        Segment::from_index(index).map(|s| s.label().to_string())
    }

    /// Fill colour of segment `index` as `0xRRGGBB`.
    pub fn segment_color(&self, index: usize) -> Option<u32> {
        Segment::from_index(index).map(Segment::color)
    }

    /// Angle at which segment `index` starts at the current rotation.
    pub fn segment_start_angle(&self, index: usize) -> f64 {
        wheel::segment_start_angle(self.wheel.angle(), index, SEGMENTS.len())
    }
}
