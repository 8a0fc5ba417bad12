//! Frame scheduling for the animation loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared flag that stops the animation loop once set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Decides when the next frame is due and owns the loop's cancellation token.
#[derive(Debug)]
pub struct AnimationController {
    token: CancelToken,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    frames: u64,
}

impl AnimationController {
    /// Create a controller capped at `fps` frames per second (at least 1).
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            token: CancelToken::new(),
            frame_interval: Duration::from_secs(1) / fps,
            last_frame: None,
            frames: 0,
        }
    }

    /// A handle that can stop this controller's loop.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop the loop. No frame is due afterwards.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Frames produced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether a frame should be produced at `now`.
    pub fn frame_due(&self, now: Instant) -> bool {
        self.is_running() && self.time_until_next_frame(now).is_zero()
    }

    /// How long the loop may wait for input before the next frame.
    pub fn time_until_next_frame(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => (last + self.frame_interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Record that a frame was produced at `now`.
    pub fn mark_frame(&mut self, now: Instant) {
        self.last_frame = Some(now);
        self.frames += 1;
    }
}
