//! Office Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `renderer`: Draw command generation and the Canvas2D backend
//! - `platform`: Browser/native platform abstraction
//! - `profile`: Registered player profile
//! - `leaderboard`: Remote spreadsheet-backed leaderboard
//! - `session`: Screen flow and input dispatch
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod leaderboard;
pub mod platform;
pub mod profile;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::{LeaderboardEntry, ScoreSubmission, SubmissionTracker};
pub use profile::PlayerProfile;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. One tick is one frame of movement.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport dimensions (canvas pixels)
    pub const VIEWPORT_WIDTH: f32 = 1100.0;
    pub const VIEWPORT_HEIGHT: f32 = 490.0;

    /// Distance from the bottom of the viewport to the player's resting top edge
    pub const GROUND_OFFSET: f32 = 190.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_WIDTH: f32 = 130.0;
    pub const PLAYER_HEIGHT: f32 = 150.0;

    /// Obstacle (fire) defaults
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    pub const OBSTACLE_HEIGHT: f32 = 90.0;
    pub const OBSTACLE_HITBOX_INSET: f32 = 20.0;

    /// Coin defaults
    pub const COIN_SIZE: f32 = 55.0;
    pub const COIN_VALUE: u64 = 10;

    /// Background parallax factor relative to scroll speed
    pub const BACKGROUND_PARALLAX: f32 = 0.3;

    /// Number of leaderboard rows shown
    pub const LEADERBOARD_ROWS: usize = 10;
}

/// Resting y of the player's top edge for a viewport of the given height
#[inline]
pub fn ground_y_for(viewport_height: f32) -> f32 {
    viewport_height - consts::GROUND_OFFSET
}
