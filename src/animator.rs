//! The favicon animator.
//!
//! Owns the blink state, the close schedule, the delay source and the
//! offscreen surface. Each call to [`FaviconAnimator::frame`] advances the
//! eye by one step, redraws it and encodes the result.
//!
//! Time is passed in explicitly as the elapsed duration since the animator
//! started, so the same sequence of timestamps always yields the same frames.

use crate::blink::{BlinkState, CloseSchedule, Transition, FIRST_BLINK};
use crate::color::Rgba;
use crate::config::Config;
use crate::delay::{DelaySource, UniformDelay};
use crate::error::{Error, Result};
use crate::output::EncodedIcon;
use crate::render::{Circle, Drawable, Ellipse};
use crate::sink::IconSink;
use crate::surface::Surface;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, trace};

/// Edge length of the design grid all eye geometry is expressed in.
pub const DESIGN_SIZE: u32 = 32;
/// Horizontal radius of the eye.
pub const EYE_RADIUS_X: f32 = 14.0;
/// Radius of the pupil.
pub const PUPIL_RADIUS: f32 = 3.0;
/// Default outline width.
pub const LINE_WIDTH: f32 = 2.0;
/// Largest icon edge length the animator accepts.
pub const MAX_ICON_SIZE: u32 = 512;

/// Colors the eye is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill behind the eye.
    pub background: Rgba,
    /// Outline and pupil.
    pub accent: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::BACKGROUND,
            accent: Rgba::ACCENT,
        }
    }
}

/// Draw `state` onto `surface`, replacing its previous content.
///
/// Geometry is laid out on a 32×32 grid and scaled to the surface width.
/// The result depends only on the arguments.
pub fn draw_eye(surface: &mut Surface, state: &BlinkState, palette: Palette, line_width: f32) {
    let scale = surface.width() as f32 / DESIGN_SIZE as f32;
    let cx = surface.width() as f32 / 2.0;
    let cy = surface.height() as f32 / 2.0;

    surface.clear(palette.background);

    Ellipse::new(
        cx,
        cy,
        EYE_RADIUS_X * scale,
        state.eye_height() * scale,
        line_width * scale,
    )
    .draw(surface, palette.accent);

    if state.pupil_visible() {
        Circle::new(cx + state.pupil_offset() * scale, cy, PUPIL_RADIUS * scale)
            .draw(surface, palette.accent);
    }
}

/// Builder for [`FaviconAnimator`].
#[derive(Debug, Clone)]
pub struct AnimatorBuilder<D> {
    size: u32,
    palette: Palette,
    line_width: f32,
    blink_speed: Option<f32>,
    first_blink: Duration,
    delay: D,
}

impl<D: DelaySource> AnimatorBuilder<D> {
    /// Icon edge length in pixels.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Background and accent colors.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Outline width in design units.
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Eyelid step per frame.
    #[must_use]
    pub fn blink_speed(mut self, speed: f32) -> Self {
        self.blink_speed = Some(speed);
        self
    }

    /// When the startup blink fires, measured from the first frame.
    #[must_use]
    pub fn first_blink(mut self, at: Duration) -> Self {
        self.first_blink = at;
        self
    }

    /// Replace the delay source.
    #[must_use]
    pub fn delay<E: DelaySource>(self, delay: E) -> AnimatorBuilder<E> {
        AnimatorBuilder {
            size: self.size,
            palette: self.palette,
            line_width: self.line_width,
            blink_speed: self.blink_speed,
            first_blink: self.first_blink,
            delay,
        }
    }

    /// Build the animator.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is zero or above [`MAX_ICON_SIZE`].
    pub fn build(self) -> Result<FaviconAnimator<D>> {
        if self.size > MAX_ICON_SIZE {
            return Err(Error::InvalidDimensions {
                width: self.size,
                height: self.size,
            });
        }
        let surface = Surface::new(self.size, self.size)?;
        let mut state = BlinkState::new();
        if let Some(speed) = self.blink_speed {
            state = state.with_blink_speed(speed);
        }

        let mut animator = FaviconAnimator {
            state,
            schedule: CloseSchedule::starting_at(self.first_blink),
            delay: self.delay,
            surface,
            palette: self.palette,
            line_width: self.line_width,
            frames: 0,
            blinks: 0,
            clock: Duration::ZERO,
        };
        animator.redraw();
        Ok(animator)
    }
}

/// Animated blinking-eye favicon.
#[derive(Debug, Clone)]
pub struct FaviconAnimator<D = UniformDelay> {
    state: BlinkState,
    schedule: CloseSchedule,
    delay: D,
    surface: Surface,
    palette: Palette,
    line_width: f32,
    frames: u64,
    blinks: u64,
    clock: Duration,
}

impl FaviconAnimator<UniformDelay> {
    /// Builder with the default 32×32 icon and entropy-seeded delays.
    #[must_use]
    pub fn builder() -> AnimatorBuilder<UniformDelay> {
        AnimatorBuilder {
            size: DESIGN_SIZE,
            palette: Palette::default(),
            line_width: LINE_WIDTH,
            blink_speed: None,
            first_blink: FIRST_BLINK,
            delay: UniformDelay::from_entropy(),
        }
    }

    /// Default animator.
    ///
    /// # Example
    ///
    /// ```
    /// use blink_favicon::animator::FaviconAnimator;
    /// use std::time::Duration;
    ///
    /// let mut animator = FaviconAnimator::new().unwrap();
    /// let icon = animator.frame(Duration::ZERO).unwrap();
    /// assert!(icon.data_uri().starts_with("data:image/png;base64,"));
    /// ```
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Animator configured from a [`Config`]. A configured seed makes the
    /// blink timing reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let delay = match config.seed {
            Some(seed) => UniformDelay::new(
                ChaCha8Rng::seed_from_u64(seed),
                config.delay_range_ms(),
            )?,
            None => UniformDelay::new(
                ChaCha8Rng::from_entropy(),
                config.delay_range_ms(),
            )?,
        };

        Self::builder()
            .size(config.size)
            .palette(config.palette()?)
            .line_width(config.line_width)
            .blink_speed(config.blink_speed)
            .first_blink(Duration::from_millis(config.first_blink_ms))
            .delay(delay)
            .build()
    }
}

impl<D: DelaySource> FaviconAnimator<D> {
    /// Current blink state.
    #[must_use]
    pub const fn state(&self) -> &BlinkState {
        &self.state
    }

    /// Pending close deadline.
    #[must_use]
    pub const fn schedule(&self) -> &CloseSchedule {
        &self.schedule
    }

    /// The most recently drawn surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Colors in use.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Frames rendered so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Blinks started so far.
    #[must_use]
    pub const fn blinks(&self) -> u64 {
        self.blinks
    }

    /// Timestamp of the latest step, zero before the first one. Close
    /// deadlines share this time base.
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// Advance the eye by one frame at time `now`.
    ///
    /// A due close fires before the step, so the eye moves on the same frame
    /// the deadline is reached.
    pub fn step(&mut self, now: Duration) -> Transition {
        self.clock = now;
        if self.schedule.fire_due(now) && self.state.start_closing() {
            self.blinks += 1;
            debug!(at_ms = now.as_millis() as u64, blink = self.blinks, "eye closing");
        }

        let transition = self.state.step();
        match transition {
            Transition::Closed => {
                debug!(at_ms = now.as_millis() as u64, "eye closed, opening");
            }
            Transition::Reopened => {
                let next = now.saturating_add(self.delay.next_delay());
                self.schedule.schedule(next);
                debug!(
                    at_ms = now.as_millis() as u64,
                    next_close_ms = next.as_millis() as u64,
                    "eye open, next blink scheduled"
                );
            }
            Transition::None => {}
        }
        transition
    }

    /// Step, redraw and encode one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn frame(&mut self, now: Duration) -> Result<EncodedIcon> {
        self.step(now);
        self.redraw();
        self.frames += 1;

        trace!(
            frame = self.frames,
            phase = %self.state.phase(),
            eye_height = self.state.eye_height(),
            pupil_offset = self.state.pupil_offset(),
            "frame rendered"
        );

        EncodedIcon::from_surface(&self.surface)
    }

    /// Render one frame and publish it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or publishing fails.
    pub fn frame_into<S: IconSink + ?Sized>(&mut self, now: Duration, sink: &mut S) -> Result<()> {
        let icon = self.frame(now)?;
        sink.publish(&icon)
    }

    fn redraw(&mut self) {
        draw_eye(&mut self.surface, &self.state, self.palette, self.line_width);
    }
}
