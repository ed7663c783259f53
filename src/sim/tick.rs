//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::physics::{jump, step_player};
use super::spawn::{RandomSource, spawn_due};
use super::state::{EntityKind, GameEvent, GameState};
use crate::consts::{BACKGROUND_PARALLAX, COIN_VALUE};
use crate::tuning::Tuning;

/// How many ticks ahead of an obstacle the demo autopilot takes off
const AUTOPILOT_LEAD_TICKS: f32 = 5.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space)
    pub jump: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame.
///
/// A no-op unless the round is running, so a frozen game-over screen can keep
/// ticking harmlessly.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) {
    if !state.is_running() {
        return;
    }

    state.frame += 1;

    // Difficulty ramp
    if tuning.speed_ramp_period > 0 && state.frame % tuning.speed_ramp_period == 0 {
        state.scroll_speed = tuning.scroll_speed_at(state.frame);
        log::debug!(
            "Scroll speed {:.2} at frame {}",
            state.scroll_speed,
            state.frame
        );
    }

    let wants_jump = input.jump || (input.idle_mode && autopilot_wants_jump(state));
    if wants_jump && jump(&mut state.player, tuning) {
        state.events.push(GameEvent::Jumped);
    }
    step_player(&mut state.player, tuning);

    spawn_due(state, tuning, rng);

    let speed = state.scroll_speed;
    state.background_scroll += f64::from(speed * BACKGROUND_PARALLAX);

    let player_rect = state.player.rect();
    let mut hit_obstacle = false;
    let mut score = state.score;
    let mut collected_scores = Vec::new();

    state.entities.retain_mut(|entity| {
        entity.scroll(speed);
        let touching = entity.hitbox().overlaps(&player_rect);

        match &mut entity.kind {
            EntityKind::Obstacle { .. } if touching => {
                hit_obstacle = true;
                return false;
            }
            EntityKind::Coin { collected } if touching && !*collected => {
                *collected = true;
                score += COIN_VALUE;
                collected_scores.push(score);
            }
            _ => {}
        }

        match entity.kind {
            EntityKind::Coin { collected: true } => false,
            _ => !entity.rect().is_off_left(),
        }
    });

    state.score = score;
    state
        .events
        .extend(collected_scores.into_iter().map(|score| GameEvent::CoinCollected { score }));

    if hit_obstacle {
        state.end_round();
    }
}

/// Demo autopilot: take off when the nearest obstacle ahead is about to reach
/// the player. Ignores coins.
fn autopilot_wants_jump(state: &GameState) -> bool {
    if state.player.airborne {
        return false;
    }
    let player_right = state.player.rect().right();
    let lead = state.scroll_speed * AUTOPILOT_LEAD_TICKS;

    state
        .obstacles()
        .map(|o| o.hitbox().left() - player_right)
        .filter(|gap| *gap >= 0.0)
        .fold(None, |nearest: Option<f32>, gap| {
            Some(nearest.map_or(gap, |n| n.min(gap)))
        })
        .is_some_and(|gap| gap <= lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::tests::ScriptedDraws;
    use crate::sim::state::{Entity, GamePhase};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// No spawns at all: tests place entities by hand
    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_period: 0,
            coin_period: 0,
            ..Tuning::default()
        }
    }

    fn running(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(tuning);
        state.restart(tuning);
        state
    }

    fn no_draws() -> ScriptedDraws {
        ScriptedDraws::new(&[0.99])
    }

    #[test]
    fn test_not_started_does_not_tick() {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning);
        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.frame, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_scroll_speed_after_1000_frames() {
        let tuning = Tuning {
            initial_scroll_speed: 4.5,
            speed_increment: 0.3,
            speed_ramp_period: 500,
            ..quiet_tuning()
        };
        let mut state = running(&tuning);
        for _ in 0..1000 {
            tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        }
        assert_eq!(state.frame, 1000);
        assert!((state.scroll_speed - 5.1).abs() < 1e-5);
    }

    #[test]
    fn test_ramp_follows_tuning_formula_and_cap() {
        let tuning = Tuning {
            speed_ramp_period: 100,
            max_scroll_speed: Some(5.5),
            ..quiet_tuning()
        };
        let mut state = running(&tuning);
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
            assert_eq!(state.scroll_speed, tuning.scroll_speed_at(state.frame));
        }
        assert_eq!(state.scroll_speed, 5.5);
    }

    #[test]
    fn test_entities_move_by_scroll_speed() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        state.entities.push(Entity::coin(900.0, 0.0));
        state.entities.push(Entity::obstacle(700.0, state.player.ground_y));

        for _ in 0..3 {
            let before: Vec<f32> = state.entities.iter().map(|e| e.pos.x).collect();
            tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
            for (e, x) in state.entities.iter().zip(before) {
                assert_eq!(e.pos.x, x - state.scroll_speed);
            }
        }
    }

    #[test]
    fn test_obstacle_collision_ends_round_once() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        let ground_y = state.player.ground_y;
        // Two obstacles overlapping the player on the same frame
        state.entities.push(Entity::obstacle(130.0, ground_y));
        state.entities.push(Entity::obstacle(150.0, ground_y));
        state.entities.push(Entity::coin(900.0, 0.0));

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles().count(), 0);
        let game_overs: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_overs, vec![GameEvent::GameOver { round: 1, score: 0 }]);

        // Frozen: further ticks change nothing
        let frame = state.frame;
        let coin_x = state.coins().next().unwrap().pos.x;
        tick(&mut state, &TickInput { jump: true, ..Default::default() }, &tuning, &mut no_draws());
        assert_eq!(state.frame, frame);
        assert_eq!(state.coins().next().unwrap().pos.x, coin_x);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_visual_overlap_outside_hitbox_is_safe() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        // Visual rect starts 5px inside the player's right edge; the hitbox does not
        let x = state.player.rect().right() - 5.0 + state.scroll_speed;
        state.entities.push(Entity::obstacle(x, state.player.ground_y));
        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.obstacles().count(), 1);
    }

    #[test]
    fn test_coins_score_once_each() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        let y = state.player.ground_y + 30.0;
        for x in [130.0, 160.0, 190.0] {
            state.entities.push(Entity::coin(x, y));
        }

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.score, 30);
        assert_eq!(state.coins().count(), 0);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::CoinCollected { score: 10 },
                GameEvent::CoinCollected { score: 20 },
                GameEvent::CoinCollected { score: 30 },
            ]
        );

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_already_collected_coin_never_scores() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        let mut coin = Entity::coin(150.0, state.player.ground_y);
        coin.kind = EntityKind::Coin { collected: true };
        state.entities.push(coin);

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_offscreen_entities_evicted_next_update() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        // Right edge lands at 0.5 after one tick, then past 0 after the second
        state.entities.push(Entity::coin(-50.0, 0.0));
        // Already gone after one tick
        state.entities.push(Entity::obstacle(-66.0, state.player.ground_y));

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert_eq!(state.entities.len(), 1);
        assert!(state.entities[0].is_coin());

        tick(&mut state, &TickInput::default(), &tuning, &mut no_draws());
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_jump_input_emits_event_once() {
        let tuning = quiet_tuning();
        let mut state = running(&tuning);
        let press = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &press, &tuning, &mut no_draws());
        tick(&mut state, &press, &tuning, &mut no_draws());
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        assert!(state.player.airborne);
        assert!(state.player.pos.y < state.player.ground_y);
    }

    #[test]
    fn test_restart_after_game_over_resets_round() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        // No jumping: the first obstacle ends the round
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), &tuning, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.frame > 0);

        state.restart(&tuning);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.round, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.scroll_speed, tuning.initial_scroll_speed);
        assert!(state.entities.is_empty());
        assert_eq!(state.player.pos.y, state.player.ground_y);
        assert_eq!(state.player.vel_y, 0.0);
        assert!(!state.player.airborne);
    }

    #[test]
    fn test_autopilot_clears_obstacles() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        let mut rng = Pcg32::seed_from_u64(2024);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state, &input, &tuning, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.frame, 3000);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let tuning = Tuning::default();
        let mut state1 = running(&tuning);
        let mut state2 = running(&tuning);
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);

        let inputs = [
            TickInput::default(),
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for i in 0..900 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, &tuning, &mut rng1);
            tick(&mut state2, input, &tuning, &mut rng2);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.entities, state2.entities);
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    proptest! {
        #[test]
        fn prop_score_moves_in_coin_steps(
            seed in any::<u64>(),
            presses in proptest::collection::vec(any::<bool>(), 100..600),
        ) {
            let tuning = Tuning::default();
            let mut state = running(&tuning);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut last = 0;
            for jump in presses {
                tick(&mut state, &TickInput { jump, idle_mode: true }, &tuning, &mut rng);
                prop_assert!(state.score >= last);
                prop_assert_eq!(state.score % COIN_VALUE, 0);
                prop_assert!(state.player.pos.y >= 0.0);
                prop_assert!(state.player.pos.y <= state.player.ground_y);
                last = state.score;
            }
        }
    }
}
