use model::{FrameScheduler, RenderSurface, Session};

use crate::speed::SpeedSetting;

/// Stands in for a display's refresh callback. Frames are dispatched back-to-back, but the
/// timestamps handed to the session advance as if a real display refreshed every
/// `frame_interval_ms`, sped up by the speed setting.
pub struct VirtualDisplay {
    pending: bool,
    now: f64,
    step: f64,
}

impl VirtualDisplay {
    pub fn new(frame_interval_ms: f64, speed: SpeedSetting) -> Self {
        Self {
            pending: false,
            now: 0.0,
            step: frame_interval_ms * speed.multiplier(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Keeps dispatching until the session stops requesting frames, or `max_frames` have run.
    /// Returns the number of frames dispatched.
    pub fn run(
        &mut self,
        session: &mut Session,
        surface: &mut dyn RenderSurface,
        max_frames: Option<usize>,
    ) -> usize {
        let mut dispatched = 0;
        while self.pending && max_frames.map(|max| dispatched < max).unwrap_or(true) {
            self.pending = false;
            let now = self.now;
            session.on_frame(now, surface, self);
            self.now += self.step;
            dispatched += 1;
        }
        dispatched
    }
}

impl FrameScheduler for VirtualDisplay {
    fn request_frame(&mut self) {
        self.pending = true;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}
