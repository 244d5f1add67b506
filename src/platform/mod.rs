//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (`requestAnimationFrame` on web, a fixed-rate timer natively)
//! - Asset loading (web only; native runs use the placeholder or in-memory sprites)

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Opaque id of one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Something that can call us back once per display frame
pub trait FrameScheduler {
    /// Ask for exactly one callback
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a callback that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Running flag and pending callback of a frame loop
///
/// Keeps at most one frame in flight. `stop` cancels it, so a stale callback
/// can never keep a stopped loop alive.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    pending: Option<FrameHandle>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Begin requesting frames; no-op if already running
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(scheduler.request_frame());
        log::trace!("Frame loop started");
    }

    /// Stop and cancel the pending frame; safe to call any number of times
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        if self.running {
            self.running = false;
            log::trace!("Frame loop stopped");
        }
    }

    /// Accept a fired callback; false means the callback is stale and must do nothing
    pub fn begin_frame(&mut self) -> bool {
        self.running && self.pending.take().is_some()
    }

    /// Request the next frame after a step, unless the step stopped the loop
    pub fn rearm(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.running && self.pending.is_none() {
            self.pending = Some(scheduler.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records requests and cancellations
    #[derive(Default)]
    struct Recorder {
        next: u64,
        live: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for Recorder {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.live.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.live.retain(|h| *h != handle);
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn test_start_requests_one_frame() {
        let mut sched = Recorder::default();
        let mut frames = FrameLoop::new();
        frames.start(&mut sched);
        frames.start(&mut sched);
        assert!(frames.is_running());
        assert_eq!(sched.live, vec![FrameHandle(1)]);
    }

    #[test]
    fn test_frame_cycle() {
        let mut sched = Recorder::default();
        let mut frames = FrameLoop::new();
        frames.start(&mut sched);

        assert!(frames.begin_frame());
        assert_eq!(frames.pending(), None);
        frames.rearm(&mut sched);
        assert_eq!(frames.pending(), Some(FrameHandle(2)));
    }

    #[test]
    fn test_stop_cancels_and_is_idempotent() {
        let mut sched = Recorder::default();
        let mut frames = FrameLoop::new();
        frames.start(&mut sched);

        frames.stop(&mut sched);
        frames.stop(&mut sched);
        assert!(!frames.is_running());
        assert!(sched.live.is_empty());
        assert_eq!(sched.cancelled, vec![FrameHandle(1)]);
    }

    #[test]
    fn test_stale_callback_after_stop() {
        let mut sched = Recorder::default();
        let mut frames = FrameLoop::new();
        frames.start(&mut sched);
        frames.stop(&mut sched);

        assert!(!frames.begin_frame());
        frames.rearm(&mut sched);
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn test_stop_during_frame_prevents_rearm() {
        let mut sched = Recorder::default();
        let mut frames = FrameLoop::new();
        frames.start(&mut sched);
        assert!(frames.begin_frame());
        frames.stop(&mut sched);
        frames.rearm(&mut sched);
        // Nothing requested after the first frame, nothing left to cancel
        assert_eq!(sched.next, 1);
        assert!(sched.cancelled.is_empty());
    }
}
