//! Native frame loop.
//!
//! Drives a [`FaviconAnimator`] from a tokio interval until a frame limit is
//! reached or a [`Shutdown`] is triggered. Frames that fall behind are
//! skipped, never queued.

use crate::animator::FaviconAnimator;
use crate::config::Config;
use crate::delay::DelaySource;
use crate::error::Result;
use crate::sink::IconSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Default frame period (about 60 frames per second).
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Cloneable cancellation handle for a running [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// Untriggered token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask every loop holding this token to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`Shutdown::trigger`] has been called.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the token is triggered.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|stop| *stop).await;
    }
}

/// Counters returned when a loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered and published.
    pub rendered: u64,
    /// Frames whose encoding or publishing failed.
    pub failed: u64,
    /// Loop run time.
    pub elapsed: Duration,
}

impl FrameStats {
    /// Frames attempted.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.rendered + self.failed
    }
}

/// Interval-driven frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    period: Duration,
    max_frames: Option<u64>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_PERIOD)
    }
}

impl FrameLoop {
    /// Loop rendering one frame per `period`. Periods under a millisecond are
    /// raised to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            max_frames: None,
        }
    }

    /// Loop using the configured frame period.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.frame_interval())
    }

    /// Stop after `frames` frames.
    #[must_use]
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Frame period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Run until the frame limit or `shutdown`.
    ///
    /// Timestamps continue from [`FaviconAnimator::clock`], so running the
    /// same animator again keeps its pending blink on schedule. A failed
    /// frame is logged and counted; the loop keeps going.
    ///
    /// # Errors
    ///
    /// Per-frame errors never end the loop; this returns `Ok` once it stops.
    pub async fn run<D, S>(
        &self,
        animator: &mut FaviconAnimator<D>,
        sink: &mut S,
        shutdown: &Shutdown,
    ) -> Result<FrameStats>
    where
        D: DelaySource,
        S: IconSink + ?Sized,
    {
        let start = Instant::now();
        let resume_at = animator.clock();
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = FrameStats::default();
        debug!(
            period_ms = self.period.as_millis() as u64,
            resume_at_ms = resume_at.as_millis() as u64,
            "frame loop started"
        );

        loop {
            if self.max_frames.is_some_and(|max| stats.total() >= max) {
                break;
            }

            tokio::select! {
                biased;
                () = shutdown.triggered() => break,
                _ = ticker.tick() => {}
            }

            match animator.frame_into(resume_at + start.elapsed(), sink) {
                Ok(()) => stats.rendered += 1,
                Err(e) => {
                    stats.failed += 1;
                    warn!(error = %e, frame = stats.total(), "frame failed");
                }
            }
        }

        stats.elapsed = start.elapsed();
        debug!(
            rendered = stats.rendered,
            failed = stats.failed,
            blinks = animator.blinks(),
            "frame loop stopped"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelay;
    use crate::error::Error;
    use crate::output::EncodedIcon;
    use crate::sink::IconLink;

    fn animator() -> FaviconAnimator<FixedDelay> {
        FaviconAnimator::builder()
            .delay(FixedDelay(Duration::from_secs(3)))
            .build()
            .unwrap()
    }

    struct BrokenSink;

    impl IconSink for BrokenSink {
        fn publish(&mut self, _icon: &EncodedIcon) -> crate::error::Result<()> {
            Err(Error::Io(std::io::Error::other("element detached")))
        }
    }

    #[test]
    fn test_period_floor() {
        assert_eq!(FrameLoop::new(Duration::ZERO).period(), Duration::from_millis(1));
        assert_eq!(FrameLoop::default().period(), DEFAULT_FRAME_PERIOD);
    }

    #[test]
    fn test_shutdown_flag() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();
        assert!(!clone.is_triggered());
        shutdown.trigger();
        assert!(clone.is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_limit() {
        let mut a = animator();
        let mut link = IconLink::new(IconLink::DEFAULT_ID);

        let stats = FrameLoop::default()
            .with_max_frames(10)
            .run(&mut a, &mut link, &Shutdown::new())
            .await
            .unwrap();

        assert_eq!(stats.rendered, 10);
        assert_eq!(link.updates(), 10);
        assert_eq!(a.frames(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_blink_happens_in_loop() {
        let mut a = animator();
        let mut link = IconLink::new(IconLink::DEFAULT_ID);

        // 200 frames at 16ms cover a bit over 3 seconds
        FrameLoop::default()
            .with_max_frames(200)
            .run(&mut a, &mut link, &Shutdown::new())
            .await
            .unwrap();

        assert_eq!(a.blinks(), 1);
        let next = a.schedule().pending().expect("next blink scheduled");
        assert!(next >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_continues_the_clock() {
        let mut a = animator();
        let mut link = IconLink::new(IconLink::DEFAULT_ID);

        // First blink at 2000ms, eye open again by ~2176ms, next close ~5176ms
        FrameLoop::default()
            .with_max_frames(150)
            .run(&mut a, &mut link, &Shutdown::new())
            .await
            .unwrap();
        assert_eq!(a.blinks(), 1);
        let paused_at = a.clock();
        assert!(paused_at >= Duration::from_millis(2300), "{paused_at:?}");

        // 200 more frames reach past 5176ms only if time carries over
        FrameLoop::default()
            .with_max_frames(200)
            .run(&mut a, &mut link, &Shutdown::new())
            .await
            .unwrap();
        assert!(a.clock() > paused_at + Duration::from_secs(3));
        assert_eq!(a.blinks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_triggered_shutdown_renders_nothing() {
        let mut a = animator();
        let mut link = IconLink::new(IconLink::DEFAULT_ID);
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let stats = FrameLoop::default()
            .run(&mut a, &mut link, &shutdown)
            .await
            .unwrap();

        assert_eq!(stats.total(), 0);
        assert_eq!(link.href(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_unbounded_loop() {
        let mut a = animator();
        let mut link = IconLink::new(IconLink::DEFAULT_ID);
        let shutdown = Shutdown::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(100)).await;
            trigger.trigger();
        });

        let stats = FrameLoop::default()
            .run(&mut a, &mut link, &shutdown)
            .await
            .unwrap();

        assert!(stats.rendered > 0);
        assert!(stats.rendered < 20, "rendered {}", stats.rendered);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_frames_are_counted() {
        let mut a = animator();

        let stats = FrameLoop::default()
            .with_max_frames(5)
            .run(&mut a, &mut BrokenSink, &Shutdown::new())
            .await
            .unwrap();

        assert_eq!(stats.failed, 5);
        assert_eq!(stats.rendered, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_is_silent() {
        let mut a = animator();
        let mut absent: Option<IconLink> = None;

        let stats = FrameLoop::default()
            .with_max_frames(3)
            .run(&mut a, &mut absent, &Shutdown::new())
            .await
            .unwrap();

        assert_eq!(stats.rendered, 3);
    }
}
