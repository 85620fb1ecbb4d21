use crate::config::GaitConfig;
use crate::state::{FrameInput, JointAngles};

/// Periodic hip/knee/ankle angles for a walking limb.
///
/// The hip swings sinusoidally, the knee only flexes during half of the
/// cycle, and the ankle counter-rotates against the knee with a small wobble.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaitDriver {
    config: GaitConfig,
}

impl GaitDriver {
    #[must_use]
    pub fn new(config: GaitConfig) -> Self {
        Self { config }
    }

    /// `[hip, knee, ankle]` in radians at `t` seconds.
    #[must_use]
    pub fn angles_at(&self, t: f32) -> JointAngles {
        let c = &self.config;
        let phase = t * c.frequency;

        let hip = phase.sin() * c.hip_amplitude.to_radians();
        let knee = (phase + std::f32::consts::FRAC_PI_2).sin().max(0.0) * c.knee_amplitude.to_radians();
        let ankle = c.ankle_follow * knee + (t * c.ankle_frequency).sin() * c.ankle_amplitude.to_radians();

        JointAngles::from_slice(&[hip, knee, ankle])
    }

    /// Adds this frame's angles for `chain` to `input`.
    #[must_use]
    pub fn drive(&self, input: FrameInput, chain: &str, t: f32) -> FrameInput {
        input.with_angles(chain, self.angles_at(t))
    }
}
