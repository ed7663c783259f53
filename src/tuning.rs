//! Data-driven game balance
//!
//! Every gameplay constant that shapes the feel of a run lives here so it can
//! be tweaked (or loaded from JSON) without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::{
    COIN_SIZE, OBSTACLE_HEIGHT, OBSTACLE_HITBOX_INSET, OBSTACLE_WIDTH, PLAYER_WIDTH,
};

/// Gameplay tuning values. All rates are per simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added to the player's velocity each tick
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_power: f32,

    /// Scroll speed at the start of a round (pixels/tick)
    pub initial_scroll_speed: f32,
    /// Added to scroll speed every `speed_ramp_period` ticks
    pub speed_increment: f32,
    pub speed_ramp_period: u64,
    /// Optional ceiling on scroll speed (`None` keeps growing forever)
    pub max_scroll_speed: Option<f32>,

    /// Obstacles spawn when `frame % obstacle_period == 0`
    pub obstacle_period: u64,
    /// Coins become eligible when `frame % coin_period == 0`
    pub coin_period: u64,
    /// Probability an eligible coin actually spawns
    pub coin_chance: f32,
    /// Height bands for coins: `(draw upper bound, offset from ground_y)`.
    /// The last band catches every remaining draw.
    pub coin_bands: Vec<CoinBand>,

    /// Score at which the background switches to its night palette
    pub night_score_threshold: Option<u64>,
}

/// One coin height band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinBand {
    /// Draws strictly below this value select the band
    pub below: f32,
    /// Coin y relative to the player's ground y
    pub offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            jump_power: -22.0,

            initial_scroll_speed: 4.5,
            speed_increment: 0.3,
            speed_ramp_period: 500,
            max_scroll_speed: None,

            obstacle_period: 180,
            coin_period: 50,
            coin_chance: 0.9,
            coin_bands: vec![
                CoinBand { below: 0.4, offset: 30.0 },
                CoinBand { below: 0.7, offset: -50.0 },
                CoinBand { below: 1.0, offset: -100.0 },
            ],

            night_score_threshold: Some(500),
        }
    }
}

/// Tuning that would make a round unplayable
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("malformed tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("gravity must be positive (got {0})")]
    Gravity(f32),
    #[error("jump power must be negative (got {0})")]
    JumpPower(f32),
    #[error("initial scroll speed must be positive (got {0})")]
    ScrollSpeed(f32),
    #[error("coin chance must be within [0, 1] (got {0})")]
    CoinChance(f32),
    #[error("at least one coin band is required")]
    NoCoinBands,
    #[error("jump apex {apex:.1}px does not clear the {required}px fire hitbox")]
    ObstacleTooHigh { apex: f32, required: f32 },
    #[error("jump covers {covered:.1}px of ground, {required}px needed to pass the fire")]
    ObstacleTooWide { covered: f32, required: f32 },
    #[error("coin band at offset {offset} is out of jump reach")]
    CoinOutOfReach { offset: f32 },
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults.
    /// The result is validated.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that make the fire unclearable or the physics degenerate
    pub fn validate(&self) -> Result<(), TuningError> {
        self.validate_physics()?;
        if self.initial_scroll_speed.is_nan() || self.initial_scroll_speed <= 0.0 {
            return Err(TuningError::ScrollSpeed(self.initial_scroll_speed));
        }
        if !(0.0..=1.0).contains(&self.coin_chance) {
            return Err(TuningError::CoinChance(self.coin_chance));
        }
        if self.coin_bands.is_empty() {
            return Err(TuningError::NoCoinBands);
        }

        // The player's bottom edge must rise above the fire hitbox top
        let apex = self.jump_apex();
        let required = OBSTACLE_HEIGHT - OBSTACLE_HITBOX_INSET;
        if apex <= required {
            return Err(TuningError::ObstacleTooHigh { apex, required });
        }

        // ...and stay up while the hitbox slides under the player
        let covered = self.hang_ticks() as f32 * self.initial_scroll_speed;
        let required = PLAYER_WIDTH + OBSTACLE_WIDTH - 2.0 * OBSTACLE_HITBOX_INSET;
        if covered <= required {
            return Err(TuningError::ObstacleTooWide { covered, required });
        }

        if let Some(band) = self
            .coin_bands
            .iter()
            .find(|band| -(band.offset + COIN_SIZE) >= apex)
        {
            return Err(TuningError::CoinOutOfReach {
                offset: band.offset,
            });
        }
        Ok(())
    }

    fn validate_physics(&self) -> Result<(), TuningError> {
        if self.gravity.is_nan() || self.gravity <= 0.0 {
            return Err(TuningError::Gravity(self.gravity));
        }
        if self.jump_power.is_nan() || self.jump_power >= 0.0 {
            return Err(TuningError::JumpPower(self.jump_power));
        }
        Ok(())
    }

    /// Peak height of a jump above the take-off point (pixels).
    ///
    /// Closed form of the per-tick integration: after `n` ticks the player
    /// has risen `-(n * p + g * n * (n + 1) / 2)`, which peaks at the last
    /// tick whose velocity is still negative.
    pub fn jump_apex(&self) -> f32 {
        if self.validate_physics().is_err() {
            return 0.0;
        }
        let (p, g) = (self.jump_power as f64, self.gravity as f64);
        let n = ((-p / g).ceil() - 1.0).max(0.0);
        (-(n * p + g * n * (n + 1.0) / 2.0)) as f32
    }

    /// Ticks spent airborne for a jump from flat ground
    pub fn hang_ticks(&self) -> u32 {
        if self.validate_physics().is_err() {
            return 0;
        }
        let (p, g) = (self.jump_power as f64, self.gravity as f64);
        // First n with n * p + g * n * (n + 1) / 2 >= 0
        (-2.0 * p / g - 1.0).ceil().max(1.0) as u32
    }

    /// Scroll speed after `frame` ticks of a round
    pub fn scroll_speed_at(&self, frame: u64) -> f32 {
        if self.speed_ramp_period == 0 {
            return self.cap_speed(self.initial_scroll_speed);
        }
        let steps = (frame / self.speed_ramp_period) as f32;
        self.cap_speed(self.initial_scroll_speed + steps * self.speed_increment)
    }

    /// Apply the optional speed cap
    pub fn cap_speed(&self, speed: f32) -> f32 {
        match self.max_scroll_speed {
            Some(max) => speed.min(max),
            None => speed,
        }
    }
}
