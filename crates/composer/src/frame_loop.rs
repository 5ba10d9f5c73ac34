use crate::animate::on_frame;
use crate::state::SceneState;
use skyscroll_render::Renderer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag for a frame loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host hook that arranges for the next frame callback.
pub trait FrameScheduler {
    fn schedule_next(&mut self);
}

/// Counts frame requests; a driver drains them one at a time.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Consume one pending request. False if none is queued.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) {
        self.pending += 1;
    }
}

#[derive(Debug)]
pub enum FrameOutcome<O> {
    Rendered(O),
    Stopped,
}

impl<O> FrameOutcome<O> {
    pub fn is_stopped(&self) -> bool {
        matches!(self, FrameOutcome::Stopped)
    }
}

/// Self-rescheduling animation loop.
///
/// Each frame first asks the scheduler for the next one, then advances the
/// animation and renders. The only way out is the cancellation token.
#[derive(Debug)]
pub struct FrameLoop {
    token: CancellationToken,
    frames: u64,
    budget: Option<u64>,
}

impl FrameLoop {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            frames: 0,
            budget: None,
        }
    }

    /// A loop that cancels its own token after `frames` rendered frames.
    pub fn with_budget(token: CancellationToken, frames: u64) -> Self {
        Self {
            budget: Some(frames),
            ..Self::new(token)
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame callback.
    pub fn run_frame<S, R>(
        &mut self,
        state: &mut SceneState,
        scheduler: &mut S,
        renderer: &mut R,
    ) -> FrameOutcome<R::Output>
    where
        S: FrameScheduler + ?Sized,
        R: Renderer + ?Sized,
    {
        if self.token.is_cancelled() {
            return FrameOutcome::Stopped;
        }
        if self.budget.is_some_and(|b| self.frames >= b) {
            self.token.cancel();
            return FrameOutcome::Stopped;
        }
        scheduler.schedule_next();

        on_frame(state);
        let output = renderer.render(&state.scene, &state.camera);
        self.frames += 1;
        tracing::trace!(frame = self.frames, "frame rendered");

        if let Some(budget) = self.budget {
            if self.frames >= budget {
                tracing::debug!(frames = self.frames, "frame budget reached");
                self.token.cancel();
            }
        }
        FrameOutcome::Rendered(output)
    }

    /// Kick off the loop and run frames while requests are pending and the
    /// token is live. Returns the frames rendered by this call.
    pub fn run_until_cancelled<R>(
        &mut self,
        state: &mut SceneState,
        scheduler: &mut ManualScheduler,
        renderer: &mut R,
    ) -> u64
    where
        R: Renderer + ?Sized,
    {
        let start = self.frames;
        scheduler.schedule_next();
        while scheduler.take() {
            if self.run_frame(state, scheduler, renderer).is_stopped() {
                break;
            }
        }
        self.frames - start
    }
}
