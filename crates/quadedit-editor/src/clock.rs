//! Time-driven rotation + pulse animation.
//!
//! The clock is a two-state machine (`Idle`/`Running`). While running it owns
//! exactly one pending [`FrameRequest`]; each fired request produces one tick
//! and schedules the next. Timestamps are passed in, so tests drive it with a
//! fake clock.

use std::time::Duration;

use crate::config::AnimationConfig;
use crate::mapper::Transform;

/// Id of a scheduled animation frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

/// "Call me back on the next frame" capability.
///
/// Implementations hand out unique request ids. Cancelling a request that
/// already fired, was already cancelled, or is unknown must be harmless.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Change produced by one tick, relative to the previous tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameDelta {
    /// Degrees.
    pub angle_delta: f32,
    /// `new_size / old_size`.
    pub scale_ratio: f32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClockState {
    Idle,
    Running,
}

#[derive(Debug, Clone)]
pub struct TransformClock {
    config: AnimationConfig,
    state: ClockState,
    last: Duration,
    transform: Transform,
    size: f32,
    /// +1 growing, -1 shrinking.
    direction: f32,
    pending: Option<FrameRequest>,
}

impl TransformClock {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            state: ClockState::Idle,
            last: Duration::ZERO,
            transform: Transform::IDENTITY,
            size: config.max_size,
            direction: -1.0,
            pending: None,
        }
    }

    #[inline]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Transform accumulated since `start`. Its scale is the current size
    /// relative to `max_size`, the size every run starts at.
    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Idle → Running. Returns `false` (and changes nothing) if already
    /// running.
    pub fn start(&mut self, now: Duration, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = ClockState::Running;
        self.last = now;
        self.transform = Transform::IDENTITY;
        self.size = self.config.max_size;
        self.direction = -1.0;
        self.pending = Some(scheduler.request_frame());
        true
    }

    /// Running → Idle, cancelling the pending tick. Returns the accumulated
    /// transform (for baking) and resets it to identity; `None` when idle.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) -> Option<Transform> {
        if !self.is_running() {
            return None;
        }
        if let Some(req) = self.pending.take() {
            scheduler.cancel_frame(req);
        }
        self.state = ClockState::Idle;
        Some(std::mem::replace(&mut self.transform, Transform::IDENTITY))
    }

    /// Advances the animation to `now`.
    pub fn tick(&mut self, now: Duration) -> FrameDelta {
        let elapsed = now.saturating_sub(self.last).as_secs_f32();
        self.last = now;

        let angle_delta = self.config.angle_step * elapsed;
        self.transform.angle_deg = (self.transform.angle_deg + angle_delta).rem_euclid(360.0);

        let old_size = self.size;
        let new_size = self.advance_size(old_size, self.config.size_step * elapsed);
        self.size = new_size;
        self.transform.scale = new_size / self.config.max_size;

        FrameDelta { angle_delta, scale_ratio: new_size / old_size }
    }

    /// Runs a tick if `request` is the one this clock is waiting for, then
    /// schedules the next. Stale and cancelled requests yield `None`.
    pub fn fire(
        &mut self,
        request: FrameRequest,
        now: Duration,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<FrameDelta> {
        if !self.is_running() || self.pending != Some(request) {
            log::trace!("ignoring stale frame request {request:?}");
            return None;
        }
        let delta = self.tick(now);
        self.pending = Some(scheduler.request_frame());
        Some(delta)
    }

    /// Moves `size` by `distance` in the current direction, reflecting off
    /// `[min_size, max_size]` as often as needed.
    fn advance_size(&mut self, size: f32, distance: f32) -> f32 {
        let (min, max) = (self.config.min_size, self.config.max_size);
        let next = size + self.direction * distance;
        if (min..=max).contains(&next) {
            return next;
        }

        // Unfold the bounce into a straight line measured from `min`, then
        // fold it back; every whole range crossed is one reflection.
        let range = max - min;
        let travelled = next - min;
        let crossings = (travelled / range).floor();
        let within = travelled - crossings * range;

        if (crossings as i64).rem_euclid(2) == 0 {
            min + within
        } else {
            self.direction = -self.direction;
            max - within
        }
    }
}
