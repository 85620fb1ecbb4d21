//! Foundational types shared by every Marionette crate.
//!
//! - [`errors`]: the [`RigError`] taxonomy and crate-wide [`Result`] alias
//! - [`bounds`]: axis-aligned [`BoundingBox`]
//! - [`time`]: fixed-rate [`FrameClock`] used by frame loops

pub mod bounds;
pub mod errors;
pub mod time;

pub use bounds::BoundingBox;
pub use errors::{Result, RigError};
pub use time::{FrameClock, FrameTick};
