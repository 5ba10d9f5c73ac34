//! Scene Composer & Animator.
//!
//! Builds the fixed scene once ([`compose`]), then mutates it from two
//! callbacks: [`on_scroll`] for page scroll events and [`on_frame`] for each
//! display refresh, driven by a [`FrameLoop`].
//!
//! # Invariants
//! - All mutable scene state lives in one [`SceneState`] passed by `&mut`.
//! - Scroll sets the camera absolutely but adds to mesh rotations.
//! - Star positions are drawn once and never reassigned.
//! - The frame loop re-schedules before doing any work and stops only through
//!   its cancellation token.

mod animate;
mod config;
mod frame_loop;
mod layout;
mod rng;
mod state;

pub use animate::{
    AVATAR_SCROLL_SPIN, CAMERA_SCROLL_DOLLY, CAMERA_SCROLL_DRIFT, CAMERA_SCROLL_YAW,
    MOON_FRAME_SPIN, MOON_SCROLL_SPIN, TORUS_FRAME_SPIN, on_frame, on_scroll,
};
pub use config::{AssetConfig, ConfigError, SceneConfig, StarConfig, WindowConfig};
pub use frame_loop::{
    CancellationToken, FrameLoop, FrameOutcome, FrameScheduler, ManualScheduler,
};
pub use layout::{
    AVATAR_POSITION, CAMERA_FAR, CAMERA_FOV, CAMERA_NEAR, CAMERA_START, MOON_POSITION,
    POINT_LIGHT_POSITION, TORUS_COLOR, Viewport, compose,
};
pub use rng::SceneRng;
pub use state::SceneState;

pub fn crate_info() -> &'static str {
    "skyscroll-composer v0.1.0"
}
