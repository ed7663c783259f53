//! Frame-count driven spawning of obstacles and coins

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Entity, GameState};
use crate::tuning::Tuning;

/// Source of uniform draws in `[0, 1)`.
///
/// The simulation only ever asks for unit floats, so tests can script exact
/// draws instead of hunting for seeds.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Spawn whatever is due on the current frame.
///
/// Obstacles follow a fixed cadence. Coins follow their own cadence behind a
/// probability gate, and a second draw picks the height band. Both can fire
/// on the same frame.
pub fn spawn_due(state: &mut GameState, tuning: &Tuning, rng: &mut impl RandomSource) {
    let frame = state.frame;
    let edge = state.viewport.x;
    let ground_y = state.player.ground_y;

    if is_due(frame, tuning.obstacle_period) {
        state.entities.push(Entity::obstacle(edge, ground_y));
    }

    if is_due(frame, tuning.coin_period) && rng.next_unit() < tuning.coin_chance {
        let y = ground_y + coin_band_offset(tuning, rng.next_unit());
        state.entities.push(Entity::coin(edge, y));
    }
}

/// `period == 0` disables the spawn
fn is_due(frame: u64, period: u64) -> bool {
    period > 0 && frame % period == 0
}

/// Height offset (relative to ground y) for a band draw
pub fn coin_band_offset(tuning: &Tuning, draw: f32) -> f32 {
    tuning
        .coin_bands
        .iter()
        .find(|band| draw < band.below)
        .or(tuning.coin_bands.last())
        .map(|band| band.offset)
        .unwrap_or(0.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::state::EntityKind;
    use rand::SeedableRng;

    /// Replays a fixed list of draws, then repeats the last one
    pub(crate) struct ScriptedDraws {
        draws: Vec<f32>,
        next: usize,
    }

    impl ScriptedDraws {
        pub(crate) fn new(draws: &[f32]) -> Self {
            Self {
                draws: draws.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for ScriptedDraws {
        fn next_unit(&mut self) -> f32 {
            let i = self.next.min(self.draws.len() - 1);
            self.next += 1;
            self.draws[i]
        }
    }

    fn running_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.restart(tuning);
        state
    }

    #[test]
    fn test_obstacle_cadence_is_deterministic() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        let mut rng = ScriptedDraws::new(&[0.99]);

        let mut spawned_at = Vec::new();
        for frame in 1..=600 {
            state.frame = frame;
            let before = state.obstacles().count();
            spawn_due(&mut state, &tuning, &mut rng);
            if state.obstacles().count() > before {
                spawned_at.push(frame);
            }
        }
        assert_eq!(spawned_at, vec![180, 360, 540]);
        let obstacle = state.obstacles().next().unwrap();
        assert_eq!(obstacle.pos.x, state.viewport.x);
    }

    #[test]
    fn test_coin_gate_and_bands() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        state.frame = 50;

        // Gate fails: no coin, and the band draw is never taken
        let mut rng = ScriptedDraws::new(&[0.95]);
        spawn_due(&mut state, &tuning, &mut rng);
        assert_eq!(state.coins().count(), 0);

        // Gate passes, low band
        let mut rng = ScriptedDraws::new(&[0.1, 0.2]);
        spawn_due(&mut state, &tuning, &mut rng);
        // Gate passes, middle band
        let mut rng = ScriptedDraws::new(&[0.1, 0.5]);
        spawn_due(&mut state, &tuning, &mut rng);
        // Gate passes, high band
        let mut rng = ScriptedDraws::new(&[0.1, 0.9]);
        spawn_due(&mut state, &tuning, &mut rng);

        let ys: Vec<f32> = state.coins().map(|c| c.pos.y).collect();
        assert_eq!(ys, vec![330.0, 250.0, 200.0]);
        assert!(state.coins().all(|c| c.kind == EntityKind::Coin { collected: false }));
    }

    #[test]
    fn test_obstacle_and_coin_same_frame() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        // 900 is a multiple of both 180 and 50
        state.frame = 900;
        let mut rng = ScriptedDraws::new(&[0.0, 0.0]);
        spawn_due(&mut state, &tuning, &mut rng);
        assert_eq!(state.obstacles().count(), 1);
        assert_eq!(state.coins().count(), 1);
    }

    #[test]
    fn test_off_cadence_frames_spawn_nothing() {
        let tuning = Tuning::default();
        let mut state = running_state(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        for frame in [1, 49, 51, 179, 181] {
            state.frame = frame;
            spawn_due(&mut state, &tuning, &mut rng);
        }
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_seeded_spawns_reproduce() {
        let tuning = Tuning::default();
        let run = |seed| {
            let mut state = running_state(&tuning);
            let mut rng = Pcg32::seed_from_u64(seed);
            for frame in 1..=2000 {
                state.frame = frame;
                spawn_due(&mut state, &tuning, &mut rng);
            }
            state.entities
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_band_lookup_falls_back_to_last() {
        let tuning = Tuning::default();
        assert_eq!(coin_band_offset(&tuning, 0.0), 30.0);
        assert_eq!(coin_band_offset(&tuning, 0.4), -50.0);
        assert_eq!(coin_band_offset(&tuning, 0.7), -100.0);
        assert_eq!(coin_band_offset(&tuning, 1.5), -100.0);
    }
}
