//! Spin controller: the wheel's session state machine.
//!
//! Segments are drawn without replacement. A spin picks uniformly from the ids
//! still in the pool, turns the wheel forward so the chosen segment stops under
//! the pointer, and after [`SPIN_DURATION_MS`] the segment becomes active. A
//! correct answer retires it; a wrong one puts it back in play.
//!
//! Time is passed in explicitly (milliseconds, `performance.now()` in the
//! browser) and the pending landing is resolved by [`SpinController::tick`], so
//! the controller is a plain value with no timers or callbacks of its own.

use std::collections::BTreeSet;

use rand::Rng;

mod app;
pub mod card;
pub mod geometry;
mod render;

pub use app::start_wheel;
pub(crate) use app::{Action, dispatch};
#[cfg(feature = "serde_json")]
pub(crate) use app::snapshot;

// --- Rotation constants -----------------------------------------------------

/// Pointer position (top of the wheel) with 0 degrees at 3 o'clock, clockwise.
pub const POINTER_ANGLE: f64 = 270.0;
/// Minimum forward travel per spin: five full turns.
pub const MIN_SPIN_DEGREES: f64 = 5.0 * 360.0;
/// Wheel animation length; the landed segment activates once it has elapsed.
pub const SPIN_DURATION_MS: f64 = 3500.0;
/// Tolerance for float residue when comparing wheel angles.
pub const ANGLE_EPSILON: f64 = 1e-6;

/// Width of one segment in degrees.
pub fn segment_span(segments: u32) -> f64 {
    360.0 / segments as f64
}

/// Center angle of 1-indexed segment `id`.
pub fn segment_center(id: u32, segments: u32) -> f64 {
    let span = segment_span(segments);
    (id - 1) as f64 * span + span / 2.0
}

/// Wheel orientation in `[0, 360)` that puts segment `id` under the pointer.
pub fn landing_angle(id: u32, segments: u32) -> f64 {
    (POINTER_ANGLE - segment_center(id, segments)).rem_euclid(360.0)
}

/// Absolute rotation after spinning from `current` to land on `id`.
///
/// Always moves forward by at least [`MIN_SPIN_DEGREES`], even when the same
/// segment is drawn twice in a row.
pub fn next_rotation(current: f64, id: u32, segments: u32) -> f64 {
    current + MIN_SPIN_DEGREES + forward_adjustment(current, id, segments)
}

/// Shortest forward turn in `[0, 360)` from `current` to the landing angle of `id`.
///
/// Spans that do not divide 360 leave rounding residue, so a difference a hair
/// below zero would wrap to a full extra turn; anything within
/// [`ANGLE_EPSILON`] of 360 counts as already aligned.
pub fn forward_adjustment(current: f64, id: u32, segments: u32) -> f64 {
    let diff = (landing_angle(id, segments) - current.rem_euclid(360.0)).rem_euclid(360.0);
    if diff >= 360.0 - ANGLE_EPSILON { 0.0 } else { diff }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

// --- Session state ----------------------------------------------------------

/// Coarse session state. The active id only exists while awaiting an answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Spinning {
        target: u32,
        started_ms: f64,
        from_rotation: f64,
    },
    AwaitingAnswer {
        active: u32,
    },
    Complete,
}

/// Payload-free view of [`Phase`] for the render boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PhaseKind {
    Idle,
    Spinning,
    AwaitingAnswer,
    Complete,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Spinning { .. } => PhaseKind::Spinning,
            Phase::AwaitingAnswer { .. } => PhaseKind::AwaitingAnswer,
            Phase::Complete => PhaseKind::Complete,
        }
    }
}

/// Self-graded answer to the active riddle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Read-only copy of the controller state handed to renderers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub segments: u32,
    pub pool: Vec<u32>,
    pub active: Option<u32>,
    pub rotation: f64,
    pub phase: PhaseKind,
}

impl Snapshot {
    pub fn is_available(&self, id: u32) -> bool {
        self.pool.binary_search(&id).is_ok()
    }
}

#[derive(Clone, Debug)]
pub struct SpinController {
    segments: u32,
    pool: BTreeSet<u32>,
    rotation: f64,
    phase: Phase,
}

impl SpinController {
    /// A fresh session over segments `1..=segments`.
    pub fn new(segments: u32) -> Self {
        assert!(segments > 0, "wheel needs at least one segment");
        Self {
            segments,
            pool: (1..=segments).collect(),
            rotation: 0.0,
            phase: Phase::Idle,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn pool(&self) -> &BTreeSet<u32> {
        &self.pool
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<u32> {
        match self.phase {
            Phase::AwaitingAnswer { active } => Some(active),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.segments,
            pool: self.pool.iter().copied().collect(),
            active: self.active(),
            rotation: self.rotation,
            phase: self.phase.kind(),
        }
    }

    /// Starts a spin at `now_ms` and returns the segment it will land on.
    ///
    /// Ignored (returns `None`) unless the session is idle with ids left.
    pub fn spin<R: Rng>(&mut self, rng: &mut R, now_ms: f64) -> Option<u32> {
        if self.phase != Phase::Idle || self.pool.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.pool.len());
        let target = *self.pool.iter().nth(idx)?;
        let from_rotation = self.rotation;
        self.rotation = next_rotation(from_rotation, target, self.segments);
        self.phase = Phase::Spinning {
            target,
            started_ms: now_ms,
            from_rotation,
        };
        log::info!(
            "spin: target={} rotation {:.1} -> {:.1} ({} left)",
            target,
            from_rotation,
            self.rotation,
            self.pool.len()
        );
        Some(target)
    }

    /// Completes a pending spin once its animation has fully elapsed.
    ///
    /// Returns the newly active segment on the single tick that lands it.
    pub fn tick(&mut self, now_ms: f64) -> Option<u32> {
        match self.phase {
            Phase::Spinning {
                target, started_ms, ..
            } if now_ms - started_ms >= SPIN_DURATION_MS => {
                self.phase = Phase::AwaitingAnswer { active: target };
                log::info!("landed on segment {}", target);
                Some(target)
            }
            _ => None,
        }
    }

    /// Applies the player's verdict on the active riddle. Returns whether the
    /// command was accepted.
    pub fn resolve(&mut self, outcome: Outcome) -> bool {
        let Phase::AwaitingAnswer { active } = self.phase else {
            return false;
        };
        match outcome {
            Outcome::Correct => {
                self.pool.remove(&active);
                self.phase = if self.pool.is_empty() {
                    Phase::Complete
                } else {
                    Phase::Idle
                };
            }
            Outcome::Incorrect => self.phase = Phase::Idle,
        }
        log::info!(
            "resolved segment {} as {:?}; {} left",
            active,
            outcome,
            self.pool.len()
        );
        true
    }

    /// Restores the full pool and rewinds the wheel. Drops any pending landing.
    pub fn reset(&mut self) {
        self.pool = (1..=self.segments).collect();
        self.rotation = 0.0;
        self.phase = Phase::Idle;
        log::info!("session reset ({} segments)", self.segments);
    }

    /// Rotation to draw at `now_ms`, easing toward the target while spinning.
    pub fn displayed_rotation(&self, now_ms: f64) -> f64 {
        match self.phase {
            Phase::Spinning {
                started_ms,
                from_rotation,
                ..
            } => {
                let t = ((now_ms - started_ms) / SPIN_DURATION_MS).clamp(0.0, 1.0);
                from_rotation + (self.rotation - from_rotation) * ease_out_cubic(t)
            }
            _ => self.rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Spins and lets the animation run out, returning the landed id.
    fn spin_and_land(ctl: &mut SpinController, rng: &mut StdRng, now: &mut f64) -> u32 {
        let target = ctl.spin(rng, *now).expect("spin accepted");
        *now += SPIN_DURATION_MS;
        assert_eq!(ctl.tick(*now), Some(target));
        target
    }

    #[test]
    fn test_rotation_math_for_segment_seven_of_ten() {
        assert!((segment_center(7, 10) - 234.0).abs() < 1e-9);
        assert!((landing_angle(7, 10) - 36.0).abs() < 1e-9);
        assert!((next_rotation(0.0, 7, 10) - 1836.0).abs() < 1e-9);
    }

    #[test]
    fn test_landing_angle_wraps_negative_targets() {
        // segment 9 of 10 is centered at 306, so 270 - 306 = -36 -> 324
        assert!((landing_angle(9, 10) - 324.0).abs() < 1e-9);
        for id in 1..=10 {
            let a = landing_angle(id, 10);
            assert!((0.0..360.0).contains(&a), "angle {a} for {id}");
        }
    }

    #[test]
    fn test_same_segment_twice_still_turns_five_times() {
        let first = next_rotation(0.0, 3, 10);
        let second = next_rotation(first, 3, 10);
        assert!((second - first - MIN_SPIN_DEGREES).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_draws_turn_exactly_five_times_for_any_size() {
        for segments in 1..=40 {
            for id in 1..=segments {
                let mut rotation = 0.0;
                for _ in 0..50 {
                    let diff = forward_adjustment(rotation, id, segments);
                    assert!((0.0..360.0).contains(&diff), "n={segments} id={id} diff={diff}");
                    let next = next_rotation(rotation, id, segments);
                    let step = next - rotation;
                    // subtraction at large rotations carries its own ulp of error
                    assert!(
                        step > MIN_SPIN_DEGREES - 1e-6 && step < MIN_SPIN_DEGREES + 360.0,
                        "n={segments} id={id} step={step}"
                    );
                    if rotation > 0.0 {
                        // already aligned: exactly five turns, no sixth
                        assert!(step - MIN_SPIN_DEGREES < 1e-3, "n={segments} id={id} step={step}");
                    }
                    rotation = next;
                }
            }
        }
    }

    #[test]
    fn test_landing_puts_center_under_pointer() {
        let mut rotation = 123.0;
        for id in [1, 5, 10, 2] {
            rotation = next_rotation(rotation, id, 10);
            let at_pointer = (segment_center(id, 10) + rotation).rem_euclid(360.0);
            assert!((at_pointer - POINTER_ANGLE).abs() < 1e-6, "id {id} at {at_pointer}");
        }
    }

    #[test]
    fn test_spin_waits_full_duration_before_landing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ctl = SpinController::new(10);
        let target = ctl.spin(&mut rng, 1_000.0).unwrap();
        assert_eq!(ctl.phase().kind(), PhaseKind::Spinning);
        assert_eq!(ctl.active(), None);
        assert_eq!(ctl.tick(1_000.0 + SPIN_DURATION_MS - 1.0), None);
        assert_eq!(ctl.phase().kind(), PhaseKind::Spinning);
        assert_eq!(ctl.tick(1_000.0 + SPIN_DURATION_MS), Some(target));
        assert_eq!(ctl.active(), Some(target));
        // fires once
        assert_eq!(ctl.tick(1_000.0 + 2.0 * SPIN_DURATION_MS), None);
        assert_eq!(ctl.active(), Some(target));
    }

    #[test]
    fn test_spin_is_ignored_outside_idle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctl = SpinController::new(4);
        ctl.spin(&mut rng, 0.0).unwrap();
        let before = ctl.snapshot();
        assert_eq!(ctl.spin(&mut rng, 10.0), None);
        assert_eq!(ctl.snapshot(), before);

        ctl.tick(SPIN_DURATION_MS);
        let before = ctl.snapshot();
        assert_eq!(ctl.spin(&mut rng, SPIN_DURATION_MS + 1.0), None);
        assert_eq!(ctl.snapshot(), before);
    }

    #[test]
    fn test_resolve_is_ignored_unless_awaiting_answer() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ctl = SpinController::new(3);
        assert!(!ctl.resolve(Outcome::Correct));
        ctl.spin(&mut rng, 0.0);
        assert!(!ctl.resolve(Outcome::Correct));
        assert_eq!(ctl.pool().len(), 3);
    }

    #[test]
    fn test_incorrect_keeps_segment_in_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut now = 0.0;
        let mut ctl = SpinController::new(10);
        let id = spin_and_land(&mut ctl, &mut rng, &mut now);
        assert!(ctl.resolve(Outcome::Incorrect));
        assert!(ctl.pool().contains(&id));
        assert_eq!(ctl.pool().len(), 10);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.active(), None);
    }

    #[test]
    fn test_single_segment_pool_always_selected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut now = 0.0;
        let mut ctl = SpinController::new(5);
        for _ in 0..4 {
            spin_and_land(&mut ctl, &mut rng, &mut now);
            ctl.resolve(Outcome::Correct);
        }
        let last = *ctl.pool().iter().next().unwrap();
        for _ in 0..3 {
            assert_eq!(spin_and_land(&mut ctl, &mut rng, &mut now), last);
            ctl.resolve(Outcome::Incorrect);
        }
    }

    #[test]
    fn test_reset_mid_spin_discards_landing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctl = SpinController::new(6);
        ctl.spin(&mut rng, 0.0);
        ctl.reset();
        assert_eq!(ctl.tick(SPIN_DURATION_MS * 2.0), None);
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.rotation(), 0.0);
        assert_eq!(ctl.pool().len(), 6);
    }

    #[test]
    fn test_displayed_rotation_eases_to_target() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut ctl = SpinController::new(10);
        ctl.spin(&mut rng, 100.0);
        let target = ctl.rotation();
        assert_eq!(ctl.displayed_rotation(100.0), 0.0);
        let mid = ctl.displayed_rotation(100.0 + SPIN_DURATION_MS / 2.0);
        assert!(mid > target / 2.0 && mid < target, "ease-out runs ahead: {mid}");
        assert!((ctl.displayed_rotation(100.0 + SPIN_DURATION_MS) - target).abs() < 1e-9);
        assert!((ctl.displayed_rotation(1e9) - target).abs() < 1e-9);
    }
}
