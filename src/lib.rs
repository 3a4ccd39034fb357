//! Frosted sliding panels for a software compositor.
//!
//! The pieces: pixel buffers and two blur kernels, a screen capture over a
//! list of surfaces, a background blur worker, and the sliding panel
//! controller with its easing curves and saved-property hook.

pub mod animator;
pub mod backdrop;
pub mod blur;
pub mod capture;
pub mod config;
pub mod draw;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod scene;
pub mod serialize;
pub mod sideboard;
pub mod snapshot;
pub mod types;

pub use error::{Error, Result};
pub use geometry::{Position, HANDLE_WIDTH};
pub use sideboard::SideBoard;
pub use types::{PixelBuffer, Point, Size};
