//! Blink state machine.
//!
//! The eye cycles `Open → Closing → Opening → Open`. While open, the pupil
//! sweeps left and right. `Closing` and `Opening` move the eyelid by a fixed
//! step per frame; leaving `Open` is triggered externally by a
//! [`CloseSchedule`] deadline.
//!
//! # Pupil boundary policy
//!
//! The pupil is clamped first and flipped second: a step that would carry
//! the offset past ±[`PUPIL_LIMIT`] lands exactly on the limit and reverses
//! the direction in the same step. The offset therefore never leaves the
//! bound, not even for a single rendered frame.

use std::fmt;
use std::time::Duration;

/// Eye height when fully closed.
pub const EYE_HEIGHT_MIN: f32 = 2.0;
/// Eye height when fully open.
pub const EYE_HEIGHT_MAX: f32 = 14.0;
/// Eyelid movement per frame.
pub const BLINK_SPEED: f32 = 2.0;
/// Largest pupil displacement from the eye center.
pub const PUPIL_LIMIT: f32 = 5.0;
/// Pupil movement per frame.
pub const PUPIL_STEP: f32 = 0.5;
/// The pupil is drawn only while the eye is taller than this.
pub const PUPIL_VISIBLE_ABOVE: f32 = 4.0;
/// Delay before the very first blink.
pub const FIRST_BLINK: Duration = Duration::from_millis(2000);

/// Eyelid motion phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Resting; the pupil sweeps.
    #[default]
    Open,
    /// Eyelid moving down.
    Closing,
    /// Eyelid moving up.
    Opening,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Open => "OPEN",
            Phase::Closing => "CLOSING",
            Phase::Opening => "OPENING",
        })
    }
}

/// Phase change produced by a single [`BlinkState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Phase unchanged.
    None,
    /// The eye hit the bottom and started opening.
    Closed,
    /// The eye is fully open again; the next close must be scheduled.
    Reopened,
}

/// Mutable animation state of the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    phase: Phase,
    eye_height: f32,
    blink_speed: f32,
    pupil_offset: f32,
    pupil_direction: f32,
}

impl Default for BlinkState {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkState {
    /// Fully open eye, pupil centered and moving right.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Open,
            eye_height: EYE_HEIGHT_MAX,
            blink_speed: BLINK_SPEED,
            pupil_offset: 0.0,
            pupil_direction: PUPIL_STEP,
        }
    }

    /// Build a state from explicit parts.
    ///
    /// Values are clamped into their bounds and the direction is reduced to
    /// its sign, so the result always satisfies the state invariants.
    #[must_use]
    pub fn from_parts(phase: Phase, eye_height: f32, pupil_offset: f32, pupil_direction: f32) -> Self {
        Self {
            phase,
            eye_height: clamp_finite(eye_height, EYE_HEIGHT_MIN, EYE_HEIGHT_MAX),
            blink_speed: BLINK_SPEED,
            pupil_offset: clamp_finite(pupil_offset, -PUPIL_LIMIT, PUPIL_LIMIT),
            pupil_direction: if pupil_direction < 0.0 {
                -PUPIL_STEP
            } else {
                PUPIL_STEP
            },
        }
    }

    /// Override the eyelid step per frame. Non-positive or non-finite values
    /// keep the default.
    #[must_use]
    pub fn with_blink_speed(mut self, speed: f32) -> Self {
        if speed.is_finite() && speed > 0.0 {
            self.blink_speed = speed;
        }
        self
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Vertical radius of the eye ellipse.
    #[must_use]
    pub const fn eye_height(&self) -> f32 {
        self.eye_height
    }

    /// Eyelid step per frame.
    #[must_use]
    pub const fn blink_speed(&self) -> f32 {
        self.blink_speed
    }

    /// Horizontal pupil displacement.
    #[must_use]
    pub const fn pupil_offset(&self) -> f32 {
        self.pupil_offset
    }

    /// Pupil movement per frame, signed.
    #[must_use]
    pub const fn pupil_direction(&self) -> f32 {
        self.pupil_direction
    }

    /// Whether the eye is open wide enough to show the pupil.
    #[must_use]
    pub fn pupil_visible(&self) -> bool {
        self.eye_height > PUPIL_VISIBLE_ABOVE
    }

    /// Begin a blink. Only an open eye can start closing; returns whether the
    /// phase changed.
    pub fn start_closing(&mut self) -> bool {
        if self.phase == Phase::Open {
            self.phase = Phase::Closing;
            true
        } else {
            false
        }
    }

    /// Advance one frame.
    ///
    /// The eyelid moves first. An eye that reopens on this step also moves
    /// its pupil on this step.
    pub fn step(&mut self) -> Transition {
        let transition = match self.phase {
            Phase::Closing => {
                self.eye_height -= self.blink_speed;
                if self.eye_height <= EYE_HEIGHT_MIN {
                    self.eye_height = EYE_HEIGHT_MIN;
                    self.phase = Phase::Opening;
                    Transition::Closed
                } else {
                    Transition::None
                }
            }
            Phase::Opening => {
                self.eye_height += self.blink_speed;
                if self.eye_height >= EYE_HEIGHT_MAX {
                    self.eye_height = EYE_HEIGHT_MAX;
                    self.phase = Phase::Open;
                    Transition::Reopened
                } else {
                    Transition::None
                }
            }
            Phase::Open => Transition::None,
        };

        if self.phase == Phase::Open {
            self.sweep_pupil();
        }

        transition
    }

    fn sweep_pupil(&mut self) {
        let next = self.pupil_offset + self.pupil_direction;
        if next >= PUPIL_LIMIT {
            self.pupil_offset = PUPIL_LIMIT;
            self.pupil_direction = -PUPIL_STEP;
        } else if next <= -PUPIL_LIMIT {
            self.pupil_offset = -PUPIL_LIMIT;
            self.pupil_direction = PUPIL_STEP;
        } else {
            self.pupil_offset = next;
        }
    }
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        max
    } else {
        value.clamp(min, max)
    }
}

/// The single outstanding "start closing" deadline.
///
/// Deadlines are measured from animator start. Scheduling replaces any
/// pending deadline, so at most one close is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseSchedule {
    deadline: Option<Duration>,
}

impl CloseSchedule {
    /// Schedule with the startup blink at `first`.
    #[must_use]
    pub const fn starting_at(first: Duration) -> Self {
        Self {
            deadline: Some(first),
        }
    }

    /// Set the next close deadline.
    pub fn schedule(&mut self, at: Duration) {
        self.deadline = Some(at);
    }

    /// The pending deadline, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<Duration> {
        self.deadline
    }

    /// Consume the deadline if it has been reached.
    pub fn fire_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = BlinkState::new();
        assert_eq!(s.phase(), Phase::Open);
        assert_eq!(s.eye_height(), 14.0);
        assert_eq!(s.pupil_offset(), 0.0);
        assert_eq!(s.pupil_direction(), 0.5);
        assert_eq!(s.blink_speed(), 2.0);
    }

    #[test]
    fn test_closing_sequence() {
        let mut s = BlinkState::new();
        assert!(s.start_closing());

        let mut heights = Vec::new();
        let mut transitions = Vec::new();
        for _ in 0..6 {
            transitions.push(s.step());
            heights.push(s.eye_height());
        }

        assert_eq!(heights, vec![12.0, 10.0, 8.0, 6.0, 4.0, 2.0]);
        assert_eq!(transitions[..5], [Transition::None; 5]);
        assert_eq!(transitions[5], Transition::Closed);
        assert_eq!(s.phase(), Phase::Opening);
    }

    #[test]
    fn test_pupil_frozen_while_blinking() {
        let mut s = BlinkState::new();
        s.start_closing();
        for _ in 0..6 {
            s.step();
            assert_eq!(s.pupil_offset(), 0.0);
        }
    }

    #[test]
    fn test_opening_reaches_open() {
        let mut s = BlinkState::from_parts(Phase::Opening, 12.0, 0.0, 0.5);
        assert_eq!(s.step(), Transition::Reopened);
        assert_eq!(s.eye_height(), 14.0);
        assert_eq!(s.phase(), Phase::Open);
    }

    #[test]
    fn test_full_blink_round_trip() {
        let mut s = BlinkState::new();
        s.start_closing();
        let mut frames = 0;
        loop {
            frames += 1;
            if s.step() == Transition::Reopened {
                break;
            }
        }
        // 6 frames down, 6 frames up
        assert_eq!(frames, 12);
        assert_eq!(s.eye_height(), EYE_HEIGHT_MAX);
    }

    #[test]
    fn test_pupil_clamps_then_flips_at_upper_bound() {
        let mut s = BlinkState::from_parts(Phase::Open, 14.0, 5.0, 0.5);
        s.step();
        assert_eq!(s.pupil_offset(), 5.0);
        assert_eq!(s.pupil_direction(), -0.5);
        s.step();
        assert_eq!(s.pupil_offset(), 4.5);
    }

    #[test]
    fn test_pupil_flips_exactly_on_reaching_bound() {
        let mut s = BlinkState::new();
        for _ in 0..10 {
            s.step();
        }
        assert_eq!(s.pupil_offset(), 5.0);
        assert_eq!(s.pupil_direction(), -0.5);
    }

    #[test]
    fn test_pupil_lower_bound() {
        let mut s = BlinkState::from_parts(Phase::Open, 14.0, -4.5, -0.5);
        s.step();
        assert_eq!(s.pupil_offset(), -5.0);
        assert_eq!(s.pupil_direction(), 0.5);
    }

    #[test]
    fn test_start_closing_only_from_open() {
        let mut s = BlinkState::from_parts(Phase::Opening, 8.0, 0.0, 0.5);
        assert!(!s.start_closing());
        assert_eq!(s.phase(), Phase::Opening);
    }

    #[test]
    fn test_pupil_visibility_threshold() {
        assert!(BlinkState::from_parts(Phase::Open, 6.0, 0.0, 0.5).pupil_visible());
        assert!(!BlinkState::from_parts(Phase::Closing, 4.0, 0.0, 0.5).pupil_visible());
        assert!(!BlinkState::from_parts(Phase::Opening, 2.0, 0.0, 0.5).pupil_visible());
    }

    #[test]
    fn test_from_parts_clamps() {
        let s = BlinkState::from_parts(Phase::Open, 100.0, -9.0, -3.0);
        assert_eq!(s.eye_height(), 14.0);
        assert_eq!(s.pupil_offset(), -5.0);
        assert_eq!(s.pupil_direction(), -0.5);

        let nan = BlinkState::from_parts(Phase::Open, f32::NAN, f32::NAN, 0.0);
        assert_eq!(nan.eye_height(), 14.0);
        assert_eq!(nan.pupil_offset(), 5.0);
    }

    #[test]
    fn test_custom_blink_speed() {
        let mut s = BlinkState::new().with_blink_speed(5.0);
        s.start_closing();
        s.step();
        assert_eq!(s.eye_height(), 9.0);
        s.step();
        s.step();
        assert_eq!(s.eye_height(), 2.0);
        assert_eq!(s.phase(), Phase::Opening);

        assert_eq!(BlinkState::new().with_blink_speed(-1.0).blink_speed(), 2.0);
    }

    #[test]
    fn test_fractional_blink_speed() {
        let mut s = BlinkState::new().with_blink_speed(0.3);
        s.start_closing();
        for _ in 0..10 {
            s.step();
        }
        approx::assert_relative_eq!(s.eye_height(), 11.0, epsilon = 1e-4);
        assert_eq!(s.phase(), Phase::Closing);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Open.to_string(), "OPEN");
        assert_eq!(Phase::Closing.to_string(), "CLOSING");
        assert_eq!(Phase::Opening.to_string(), "OPENING");
    }

    #[test]
    fn test_close_schedule_fires_once() {
        let mut sched = CloseSchedule::starting_at(FIRST_BLINK);
        assert!(!sched.fire_due(Duration::from_millis(1999)));
        assert!(sched.fire_due(Duration::from_millis(2000)));
        assert_eq!(sched.pending(), None);
        assert!(!sched.fire_due(Duration::from_millis(9000)));
    }

    #[test]
    fn test_close_schedule_replaces() {
        let mut sched = CloseSchedule::default();
        sched.schedule(Duration::from_secs(5));
        sched.schedule(Duration::from_secs(3));
        assert_eq!(sched.pending(), Some(Duration::from_secs(3)));
    }
}
