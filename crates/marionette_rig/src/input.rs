use glam::Vec3;

use crate::config::InputConfig;
use crate::state::TargetCommand;

/// Discrete target controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    Reset,
}

impl TargetKey {
    /// Arrow keys move horizontally, PageUp/PageDown vertically, `R` resets.
    #[cfg(feature = "winit")]
    #[must_use]
    pub fn from_key_code(code: winit::keyboard::KeyCode) -> Option<Self> {
        use winit::keyboard::KeyCode;
        match code {
            KeyCode::ArrowUp => Some(Self::Forward),
            KeyCode::ArrowDown => Some(Self::Back),
            KeyCode::ArrowLeft => Some(Self::Left),
            KeyCode::ArrowRight => Some(Self::Right),
            KeyCode::PageUp => Some(Self::Up),
            KeyCode::PageDown => Some(Self::Down),
            KeyCode::KeyR => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Maps key presses to fixed-size target displacements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetController {
    config: InputConfig,
}

impl TargetController {
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// `fast` selects the larger step (the Shift modifier).
    #[must_use]
    pub fn command(&self, key: TargetKey, fast: bool) -> TargetCommand {
        let step = if fast { self.config.fast_step } else { self.config.step };
        let direction = match key {
            TargetKey::Forward => Vec3::NEG_Z,
            TargetKey::Back => Vec3::Z,
            TargetKey::Left => Vec3::NEG_X,
            TargetKey::Right => Vec3::X,
            TargetKey::Up => Vec3::Y,
            TargetKey::Down => Vec3::NEG_Y,
            TargetKey::Reset => return TargetCommand::Reset,
        };
        TargetCommand::Nudge(direction * step)
    }
}
