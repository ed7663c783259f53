//! Game state and core simulation types
//!
//! Everything one round needs lives in [`GameState`]; the tick functions take
//! it by `&mut` and nothing else is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::ground_y_for;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing has been started yet (registration / legend screens)
    NotStarted,
    /// Active gameplay
    Running,
    /// Round ended; the simulation is frozen until restart
    GameOver,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    CoinCollected { score: u64 },
    /// Emitted exactly once per round
    GameOver { round: u32, score: u64 },
}

/// The runner. Only `y` moves; the world scrolls past a fixed `x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    /// Resting y of the top edge
    pub ground_y: f32,
    pub airborne: bool,
}

impl Player {
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0.0,
            ground_y,
            airborne: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Put the player back on the ground at rest
    pub fn reset(&mut self) {
        self.pos.y = self.ground_y;
        self.vel_y = 0.0;
        self.airborne = false;
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ends the round on contact with its inset hitbox
    Obstacle { hitbox_inset: f32 },
    /// Worth [`COIN_VALUE`] once
    Coin { collected: bool },
}

/// A scrolling world entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Entity {
    /// Fire obstacle standing on the ground line at the right viewport edge
    pub fn obstacle(viewport_width: f32, ground_y: f32) -> Self {
        Self {
            kind: EntityKind::Obstacle {
                hitbox_inset: OBSTACLE_HITBOX_INSET,
            },
            pos: Vec2::new(viewport_width, ground_y + PLAYER_HEIGHT - OBSTACLE_HEIGHT),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
        }
    }

    /// Coin at the right viewport edge at the given y
    pub fn coin(viewport_width: f32, y: f32) -> Self {
        Self {
            kind: EntityKind::Coin { collected: false },
            pos: Vec2::new(viewport_width, y),
            size: Vec2::splat(COIN_SIZE),
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle { .. })
    }

    pub fn is_coin(&self) -> bool {
        matches!(self.kind, EntityKind::Coin { .. })
    }

    /// Visual rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Collision rectangle (inset for obstacles, full rect for coins)
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            EntityKind::Obstacle { hitbox_inset } => self.rect().inset(hitbox_inset),
            EntityKind::Coin { .. } => self.rect(),
        }
    }

    /// Move left by the current scroll speed
    pub fn scroll(&mut self, speed: f32) {
        self.pos.x -= speed;
    }
}

/// Complete state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Increments on every restart; tags leaderboard submissions
    pub round: u32,
    pub score: u64,
    /// Current leftward speed of the world (pixels/tick)
    pub scroll_speed: f32,
    /// Ticks since the round started
    pub frame: u64,
    pub viewport: Vec2,
    pub player: Player,
    /// Obstacles and coins in no particular order
    pub entities: Vec<Entity>,
    /// Total background scroll distance this round (visual only). Kept in f64
    /// so long rounds do not lose sub-pixel precision.
    #[serde(skip)]
    pub background_scroll: f64,
    /// Events produced since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state for the default viewport that has not started a round
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_viewport(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT), tuning)
    }

    pub fn with_viewport(viewport: Vec2, tuning: &Tuning) -> Self {
        let ground_y = ground_y_for(viewport.y);
        Self {
            phase: GamePhase::NotStarted,
            round: 0,
            score: 0,
            scroll_speed: tuning.scroll_speed_at(0),
            frame: 0,
            viewport,
            player: Player::new(ground_y),
            entities: Vec::new(),
            background_scroll: 0.0,
            events: Vec::new(),
        }
    }

    /// Enter `Running` with a clean round, whatever the previous phase was
    pub fn restart(&mut self, tuning: &Tuning) {
        self.phase = GamePhase::Running;
        self.round += 1;
        self.score = 0;
        self.scroll_speed = tuning.scroll_speed_at(0);
        self.frame = 0;
        self.entities.clear();
        self.player.reset();
        self.background_scroll = 0.0;
        self.events.clear();
        log::info!("Round {} started", self.round);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_obstacle())
    }

    pub fn coins(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_coin())
    }

    /// Transition to `GameOver` and emit the event, once per round
    pub(crate) fn end_round(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            round: self.round,
            score: self.score,
        });
        log::info!(
            "Game over: round {} score {} after {} frames",
            self.round,
            self.score,
            self.frame
        );
    }
}
