//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Injected RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use physics::{jump, step_player};
pub use spawn::{RandomSource, coin_band_offset, spawn_due};
pub use state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
