//! Native frame timing

use std::time::{Duration, Instant};

use super::{FrameHandle, FrameScheduler};

/// Fixed-rate scheduler for headless runs
///
/// The caller drives it by calling [`FixedRateScheduler::wait_next`], which
/// sleeps until the next deadline and hands back the pending frame.
#[derive(Debug)]
pub struct FixedRateScheduler {
    period: Duration,
    next_deadline: Option<Instant>,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FixedRateScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
            next_id: 0,
            pending: None,
        }
    }

    pub fn with_rate(hz: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1))
    }

    /// Block until the pending frame is due; `None` when nothing is scheduled
    pub fn wait_next(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        if !self.period.is_zero() {
            let now = Instant::now();
            let deadline = self.next_deadline.unwrap_or(now);
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            // Do not try to catch up after a stall
            self.next_deadline = Some(deadline.max(now) + self.period);
        }
        Some(handle)
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
