//! Wheel engine: angle → segment mapping and the spin animation state machine.
//!
//! Segment `i` is drawn from `rotation + i·w` to `rotation + (i+1)·w` where
//! `w = 2π/N`, clockwise on a canvas (y axis pointing down). The pointer is
//! fixed at the top of the wheel, angle `-π/2`. The engine is driven by the
//! caller once per animation frame through [`Wheel::tick`]; it never sleeps
//! and has no mid-spin cancellation.

use std::f64::consts::{PI, TAU};
use std::num::NonZeroUsize;

#[cfg(feature = "native")]
use rand::Rng;

use crate::segments::{SEGMENTS, Segment};

/// Canvas angle of the fixed pointer.
pub const POINTER_ANGLE: f64 = -PI / 2.0;

/// Fewest full turns in a spin.
pub const MIN_TURNS: u32 = 5;

/// Most full turns in a spin.
pub const MAX_TURNS: u32 = 9;

/// Shortest spin animation.
pub const MIN_DURATION_MS: f64 = 4000.0;

/// Random extra animation time, `[0, DURATION_SPREAD_MS)`.
pub const DURATION_SPREAD_MS: f64 = 1000.0;

/// Map any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if r >= TAU { 0.0 } else { r }
}

/// Angular width of one of `count` equal segments.
pub fn segment_width(count: usize) -> f64 {
    TAU / count as f64
}

const SEGMENT_COUNT: NonZeroUsize = match NonZeroUsize::new(SEGMENTS.len()) {
    Some(n) => n,
    None => panic!("segment table is empty"),
};

fn index_under_pointer(angle: f64, count: NonZeroUsize) -> usize {
    let count = count.get();
    let relative = normalize_angle(POINTER_ANGLE - angle);
    (relative / segment_width(count)).floor() as usize % count
}

/// Index of the segment under the pointer for wheel rotation `angle`.
/// `None` for an empty wheel.
pub fn segment_index(angle: f64, count: usize) -> Option<usize> {
    NonZeroUsize::new(count).map(|n| index_under_pointer(angle, n))
}

/// Segment of [`SEGMENTS`] under the pointer.
pub fn segment_at(angle: f64) -> Segment {
    SEGMENTS[index_under_pointer(angle, SEGMENT_COUNT)]
}

/// Start angle at which segment `index` is drawn for wheel rotation `rotation`.
pub fn segment_start_angle(rotation: f64, index: usize, count: usize) -> f64 {
    rotation + index as f64 * segment_width(count)
}

/// Quartic ease-out, `1 - (1 - t)^4`, with `t` clamped to `[0, 1]`.
pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

fn unit(roll: f64) -> f64 {
    if roll.is_finite() {
        roll.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}

/// Uniform random inputs for one spin, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRolls {
    pub turns: f64,
    pub offset: f64,
    pub duration: f64,
}

impl SpinRolls {
    /// Draw rolls from `rng`.
    #[cfg(feature = "native")]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            turns: rng.random(),
            offset: rng.random(),
            duration: rng.random(),
        }
    }
}

/// Where a spin starts, where it stops and how long it takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub start_angle: f64,
    /// Whole turns before the sub-turn offset.
    pub full_turns: u32,
    pub target_angle: f64,
    pub duration_ms: f64,
}

impl SpinPlan {
    /// Plan a spin from `current`: 5–9 whole turns plus a sub-turn offset,
    /// lasting 4–5 seconds. Out-of-range rolls are clamped.
    pub fn new(current: f64, rolls: SpinRolls) -> Self {
        let spread = f64::from(MAX_TURNS - MIN_TURNS + 1);
        let extra = (unit(rolls.turns) * spread).floor() as u32;
        let turns = (MIN_TURNS + extra).min(MAX_TURNS);
        Self {
            start_angle: current,
            full_turns: turns,
            target_angle: current + f64::from(turns) * TAU + unit(rolls.offset) * TAU,
            duration_ms: MIN_DURATION_MS + unit(rolls.duration) * DURATION_SPREAD_MS,
        }
    }

    /// Animation progress in `[0, 1]` after `elapsed_ms`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Interpolated wheel angle after `elapsed_ms`.
    pub fn angle_at(&self, elapsed_ms: f64) -> f64 {
        let t = self.progress(elapsed_ms);
        if t >= 1.0 {
            return self.target_angle;
        }
        self.start_angle + (self.target_angle - self.start_angle) * ease_out_quart(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WheelState {
    Idle,
    Spinning { plan: SpinPlan, started_at_ms: f64 },
}

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Angle to draw the wheel at.
    pub angle: f64,
    /// Set on the final frame of a spin.
    pub landed: Option<Segment>,
}

/// The wheel: current rotation plus `Idle → Spinning → Idle` state.
#[derive(Debug, Clone)]
pub struct Wheel {
    angle: f64,
    state: WheelState,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

impl Wheel {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            state: WheelState::Idle,
        }
    }

    /// Current rotation.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, WheelState::Spinning { .. })
    }

    /// Start a spin at `now_ms`.
    ///
    /// No-op returning `false` while already spinning or when `remaining`
    /// allowance is zero.
    pub fn start(&mut self, remaining: i64, now_ms: f64, rolls: SpinRolls) -> bool {
        if self.is_spinning() || remaining <= 0 {
            return false;
        }
        self.state = WheelState::Spinning {
            plan: SpinPlan::new(self.angle, rolls),
            started_at_ms: now_ms,
        };
        true
    }

    /// Advance the animation to `now_ms`. `None` while idle.
    pub fn tick(&mut self, now_ms: f64) -> Option<Frame> {
        let WheelState::Spinning {
            plan,
            started_at_ms,
        } = self.state
        else {
            return None;
        };
        let elapsed = now_ms - started_at_ms;
        self.angle = plan.angle_at(elapsed);
        if plan.progress(elapsed) < 1.0 {
            return Some(Frame {
                angle: self.angle,
                landed: None,
            });
        }
        // Keep the angle small so repeated spins don't lose precision.
        self.angle = normalize_angle(self.angle);
        self.state = WheelState::Idle;
        Some(Frame {
            angle: self.angle,
            landed: Some(segment_at(self.angle)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rolls(turns: f64, offset: f64, duration: f64) -> SpinRolls {
        SpinRolls {
            turns,
            offset,
            duration,
        }
    }

    #[test]
    fn normalize_maps_into_range() {
        for a in [-10.0 * TAU - 0.3, -PI, -1e-18, 0.0, PI, TAU, 7.5 * TAU] {
            let n = normalize_angle(a);
            assert!((0.0..TAU).contains(&n), "{a} -> {n}");
        }
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < EPS);
    }

    #[test]
    fn zero_rotation_lands_on_index_four() {
        // normalize(-π/2) = 3π/2, width π/3 → floor(4.5) = 4
        assert_eq!(segment_index(0.0, 6), Some(4));
        assert_eq!(segment_at(0.0), SEGMENTS[4]);
        assert_eq!(segment_at(0.0), Segment::Genius);
    }

    #[test]
    fn empty_wheel_has_no_index() {
        assert_eq!(segment_index(1.0, 0), None);
    }

    #[test]
    fn pointer_lands_on_the_drawn_segment() {
        let n = SEGMENTS.len();
        let w = segment_width(n);
        for (i, expected) in SEGMENTS.iter().enumerate() {
            // Rotate so the middle of segment i sits under the pointer.
            let rotation = POINTER_ANGLE - (i as f64 + 0.5) * w;
            assert_eq!(segment_at(rotation), *expected);
            for turns in [-3.0, 1.0, 9.0] {
                assert_eq!(segment_at(rotation + turns * TAU), *expected);
            }
            let start = normalize_angle(segment_start_angle(rotation, i, n));
            let end = start + w;
            let pointer = normalize_angle(POINTER_ANGLE);
            let pointer = if pointer < start { pointer + TAU } else { pointer };
            assert!(start <= pointer && pointer < end);
        }
    }

    #[test]
    fn easing_endpoints_and_monotonicity() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(-2.0), 0.0);
        assert_eq!(ease_out_quart(3.0), 1.0);
        assert!((ease_out_quart(0.5) - 0.9375).abs() < EPS);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_quart(f64::from(i) / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn plan_bounds() {
        let low = SpinPlan::new(1.0, rolls(0.0, 0.0, 0.0));
        assert_eq!(low.full_turns, MIN_TURNS);
        assert!((low.target_angle - (1.0 + 5.0 * TAU)).abs() < EPS);
        assert_eq!(low.duration_ms, MIN_DURATION_MS);

        let high = SpinPlan::new(0.0, rolls(0.999_999, 0.999_999, 0.999_999));
        assert_eq!(high.full_turns, MAX_TURNS);
        assert!(high.target_angle < 10.0 * TAU);
        assert!(high.duration_ms < MIN_DURATION_MS + DURATION_SPREAD_MS);
    }

    #[test]
    fn out_of_range_rolls_are_clamped() {
        let plan = SpinPlan::new(0.0, rolls(5.0, f64::NAN, -1.0));
        assert_eq!(plan.full_turns, MAX_TURNS);
        assert_eq!(plan.duration_ms, MIN_DURATION_MS);
        assert!(plan.target_angle.is_finite());
    }

    #[cfg(feature = "native")]
    #[test]
    fn random_rolls_stay_in_bounds() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let plan = SpinPlan::new(0.0, SpinRolls::random(&mut rng));
            assert!((MIN_TURNS..=MAX_TURNS).contains(&plan.full_turns));
            assert!(plan.duration_ms >= MIN_DURATION_MS);
            assert!(plan.duration_ms < MIN_DURATION_MS + DURATION_SPREAD_MS);
        }
    }

    #[test]
    fn angle_interpolates_with_easing() {
        let plan = SpinPlan::new(0.0, rolls(0.0, 0.5, 0.0));
        assert_eq!(plan.angle_at(0.0), 0.0);
        assert_eq!(plan.angle_at(-50.0), 0.0);
        let half = plan.angle_at(plan.duration_ms / 2.0);
        assert!((half - plan.target_angle * 0.9375).abs() < 1e-6);
        assert_eq!(plan.angle_at(plan.duration_ms), plan.target_angle);
        assert_eq!(plan.angle_at(plan.duration_ms * 10.0), plan.target_angle);
    }

    #[test]
    fn wheel_spins_and_lands() {
        let mut wheel = Wheel::new();
        assert!(wheel.tick(0.0).is_none());
        assert!(wheel.start(3, 1000.0, rolls(0.0, 0.25, 0.0)));
        assert!(wheel.is_spinning());

        let mid = wheel.tick(3000.0).unwrap();
        assert!(mid.landed.is_none());
        assert!(mid.angle > 0.0);

        let last = wheel.tick(5000.0).unwrap();
        let landed = last.landed.unwrap();
        assert!(!wheel.is_spinning());
        assert_eq!(landed, segment_at(wheel.angle()));
        // 5 turns + a quarter turn.
        assert!((wheel.angle() - TAU * 0.25).abs() < 1e-6);
        assert!(wheel.tick(6000.0).is_none());
    }

    #[test]
    fn start_is_a_no_op_while_spinning() {
        let mut wheel = Wheel::new();
        assert!(wheel.start(3, 0.0, rolls(0.0, 0.0, 0.0)));
        let before = wheel.clone();
        assert!(!wheel.start(3, 10.0, rolls(0.9, 0.9, 0.9)));
        assert_eq!(wheel.state, before.state);
    }

    #[test]
    fn no_allowance_means_no_spin() {
        let mut wheel = Wheel::new();
        assert!(!wheel.start(0, 0.0, rolls(0.0, 0.0, 0.0)));
        assert!(!wheel.start(-1, 0.0, rolls(0.0, 0.0, 0.0)));
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn next_spin_starts_from_landed_angle() {
        let mut wheel = Wheel::new();
        wheel.start(2, 0.0, rolls(0.0, 0.5, 0.0));
        wheel.tick(10_000.0);
        let landed_at = wheel.angle();
        wheel.start(1, 20_000.0, rolls(0.0, 0.0, 0.0));
        let frame = wheel.tick(20_000.0).unwrap();
        assert!((frame.angle - landed_at).abs() < EPS);
    }
}
