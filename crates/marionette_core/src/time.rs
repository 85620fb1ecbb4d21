use std::time::{Duration, Instant};

/// One fixed simulation step handed out by [`FrameClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Zero-based index of this frame.
    pub frame: u64,
    /// Simulation time at the start of this frame, in seconds.
    pub time: f32,
    /// Step length in seconds.
    pub dt: f32,
}

/// Fixed-rate frame clock for headless rig loops.
///
/// Simulation time advances by exactly one step per tick, independent of how
/// long a frame took. Wall time is tracked separately for reporting.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    step: Duration,
    frames: u64,
}

impl FrameClock {
    /// Clock stepping `hz` times per simulated second. Zero is treated as 1.
    #[must_use]
    pub fn fixed(hz: u32) -> Self {
        Self {
            started: Instant::now(),
            step: Duration::from_secs(1) / hz.max(1),
            frames: 0,
        }
    }

    /// Hands out the next step.
    pub fn tick(&mut self) -> FrameTick {
        let frame = self.frames;
        self.frames += 1;
        FrameTick {
            frame,
            time: (self.step * u32::try_from(frame).unwrap_or(u32::MAX)).as_secs_f32(),
            dt: self.step.as_secs_f32(),
        }
    }

    /// Number of steps handed out so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Simulated seconds covered by the steps handed out so far.
    #[must_use]
    pub fn simulated_seconds(&self) -> f32 {
        self.frames as f32 * self.step_seconds()
    }

    /// Real time since the clock was created.
    #[must_use]
    pub fn wall_seconds(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::fixed(60)
    }
}
