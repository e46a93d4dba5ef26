//! Per-tick simulation update
//!
//! Input intents are applied as they arrive; `tick` advances one frame of
//! gameplay. Entity motion is per tick, timers and the game clock use the
//! frame's wall-clock delta.

use serde::{Deserialize, Serialize};

use super::collision::{player_collision, resolve_bullet_hits};
use super::entity::Direction;
use super::state::{EndReason, GameEvent, GamePhase, GameState};

/// Decoded player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Movement key pressed (`held = true`) or released
    Move { direction: Direction, held: bool },
    Shoot,
    TogglePause,
    Resume,
    Restart,
}

/// Apply one input intent. Returns true if it changed anything.
pub fn apply_input(state: &mut GameState, input: InputEvent) -> bool {
    // A finished game only listens for restart
    if state.phase == GamePhase::GameOver && input != InputEvent::Restart {
        return false;
    }

    match input {
        InputEvent::Move { direction, held } => {
            // Held keys are tracked while paused too, so a release is never lost
            state.player.intent.set(direction, held);
            true
        }
        InputEvent::Shoot => state.shoot().is_some(),
        InputEvent::TogglePause => state.toggle_pause(),
        InputEvent::Resume => state.resume(),
        InputEvent::Restart => {
            let restarted = state.restart();
            if restarted {
                log::info!("Run restarted");
            }
            restarted
        }
    }
}

/// Advance gameplay by one frame of `dt_ms` milliseconds (no-op unless Running)
pub fn tick(state: &mut GameState, dt_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    let arena = state.arena();

    // Entities
    state.player.update(arena);
    state.scroll_stars();

    for bullet in state.bullets.iter_mut() {
        bullet.update();
    }
    state.bullets.retain(|b| !b.is_off_screen());

    for enemy in state.enemies.iter_mut() {
        enemy.update(arena.x);
    }
    state.enemies.retain(|e| !e.is_off_screen(arena.y));

    // Bullets vs enemies
    let kills = resolve_bullet_hits(&mut state.bullets, &mut state.enemies);
    for kill in kills {
        state.score += state.config.score_per_kill as u64;
        state.push_event(GameEvent::EnemyDestroyed {
            enemy_id: kill.enemy_id,
            at: kill.at,
            score: state.score,
        });
    }

    // Player vs enemies: the run ends immediately, nothing else moves this tick
    if let Some(enemy_id) = player_collision(&state.player, &state.enemies).map(|e| e.id) {
        state.push_event(GameEvent::PlayerHit { enemy_id });
        state.end(EndReason::Destroyed);
        log::info!("Player destroyed, final score {}", state.score);
        return;
    }

    // Clock and the win condition
    state.clock.advance(dt_ms);
    let elapsed = state.clock.elapsed_secs();
    if elapsed >= state.config.game_duration_secs {
        state.push_event(GameEvent::TimeElapsed { secs: elapsed });
        state.end(EndReason::Survived);
        log::info!(
            "Survived {} seconds, final score {}",
            state.config.game_duration_secs,
            state.score
        );
        return;
    }

    // Difficulty and spawning
    let step = state.difficulty.advance(dt_ms, &state.config);
    if let Some(spawn_interval_ms) = step.tightened_to {
        log::debug!("Difficulty increased: spawning every {spawn_interval_ms}ms");
        state.push_event(GameEvent::DifficultyIncreased { spawn_interval_ms });
    }
    for _ in 0..step.spawns {
        state.spawn_enemy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, TimerResume};
    use crate::sim::entity::{Bullet, Enemy};
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1000.0 / 60.0;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 12345)
    }

    fn still_enemy(state: &mut GameState, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(40.0),
            speed: 2.0,
            drift: 0.0,
            direction: 1.0,
        });
        id
    }

    fn bullet(state: &mut GameState, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(x, y),
            radius: 5.0,
            speed: 7.0,
        });
        id
    }

    #[test]
    fn test_enemy_descends_by_speed() {
        let mut state = state();
        let id = still_enemy(&mut state, 100.0, -40.0);
        tick(&mut state, DT);
        let enemy = state.enemies.iter().find(|e| e.id == id).unwrap();
        assert_eq!(enemy.pos, Vec2::new(100.0, -38.0));
    }

    #[test]
    fn test_off_screen_entities_removed_in_same_tick() {
        let mut state = state();
        let bullet_id = bullet(&mut state, 200.0, 3.0);
        let enemy_id = still_enemy(&mut state, 100.0, 599.5);
        tick(&mut state, DT);

        assert!(!state.bullets.iter().any(|b| b.id == bullet_id));
        assert!(!state.enemies.iter().any(|e| e.id == enemy_id));
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyDestroyed { .. })));
    }

    #[test]
    fn test_bullet_scenario_miss_then_hit() {
        let mut state = state();
        // After this tick the enemy box is [100,60]-[140,100]
        still_enemy(&mut state, 100.0, 58.0);
        // Ends the tick at (100,50): outside the box
        bullet(&mut state, 100.0, 57.0);
        tick(&mut state, DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.bullets.len(), 1);

        let mut state = self::state();
        still_enemy(&mut state, 100.0, 58.0);
        // Ends the tick at (110,70): inside the box
        bullet(&mut state, 110.0, 77.0);
        tick(&mut state, DT);
        assert_eq!(state.score, 10);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_double_hit_scores_once() {
        let mut state = state();
        let enemy_id = still_enemy(&mut state, 100.0, 58.0);
        bullet(&mut state, 110.0, 77.0);
        bullet(&mut state, 130.0, 97.0);
        tick(&mut state, DT);
        assert_eq!(state.score, 10);
        let destroyed: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .collect();
        assert_eq!(destroyed.len(), 1);
        assert!(matches!(
            destroyed[0],
            GameEvent::EnemyDestroyed { enemy_id: id, score: 10, .. } if id == enemy_id
        ));
    }

    #[test]
    fn test_player_collision_ends_run_same_tick() {
        let mut state = state();
        let player_pos = state.player.pos;
        still_enemy(&mut state, player_pos.x, player_pos.y - 30.0);
        let far = still_enemy(&mut state, 10.0, 10.0);
        tick(&mut state, DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::Destroyed));
        // No clock or spawn work happened after the transition
        assert_eq!(state.clock.elapsed_secs(), 0.0);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::EnemySpawned { .. })));

        // Frozen afterwards
        let y = state.enemies.iter().find(|e| e.id == far).unwrap().pos.y;
        tick(&mut state, DT);
        assert_eq!(state.enemies.iter().find(|e| e.id == far).unwrap().pos.y, y);
    }

    #[test]
    fn test_time_up_ends_run_as_survived() {
        let config = GameConfig {
            game_duration_secs: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(config, 1);
        state.player.pos = Vec2::new(0.0, 560.0);
        for _ in 0..59 {
            tick(&mut state, DT);
        }
        assert_eq!(state.phase, GamePhase::Running);
        tick(&mut state, DT + 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::Survived));
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::TimeElapsed { .. })));
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = state();
        still_enemy(&mut state, 100.0, 0.0);
        apply_input(&mut state, InputEvent::TogglePause);
        for _ in 0..100 {
            tick(&mut state, DT);
        }
        assert_eq!(state.enemies[0].pos.y, 0.0);
        assert_eq!(state.clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_input_ignored_when_game_over_except_restart() {
        let mut state = state();
        state.end(EndReason::Destroyed);
        let left = InputEvent::Move {
            direction: Direction::Left,
            held: true,
        };
        assert!(!apply_input(&mut state, left));
        assert!(!apply_input(&mut state, InputEvent::Shoot));
        assert!(!apply_input(&mut state, InputEvent::TogglePause));
        assert!(!state.player.intent.left);
        assert!(apply_input(&mut state, InputEvent::Restart));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_release_while_paused_is_kept() {
        let mut state = state();
        let right = |held| InputEvent::Move {
            direction: Direction::Right,
            held,
        };
        apply_input(&mut state, right(true));
        apply_input(&mut state, InputEvent::TogglePause);
        apply_input(&mut state, right(false));
        apply_input(&mut state, InputEvent::Resume);
        let x = state.player.pos.x;
        tick(&mut state, DT);
        assert_eq!(state.player.pos.x, x);
    }

    #[test]
    fn test_first_spawn_after_initial_interval() {
        let mut state = state();
        // 89 frames at 16.67ms = 1483ms
        for _ in 0..89 {
            tick(&mut state, DT);
        }
        assert!(state.enemies.is_empty());
        tick(&mut state, DT);
        tick(&mut state, DT);
        assert_eq!(state.enemies.len(), 1);
        // Spawned just above the top edge on one of the last two ticks
        assert!(state.enemies[0].pos.y <= -38.0);
    }

    #[test]
    fn test_restart_resets_difficulty_and_clock() {
        let mut state = state();
        state.player.pos = Vec2::new(0.0, 560.0);
        for _ in 0..(16 * 60) {
            tick(&mut state, DT);
            state.enemies.clear();
        }
        assert_eq!(state.difficulty.spawn_interval_ms, 1400.0);
        state.end(EndReason::Destroyed);
        apply_input(&mut state, InputEvent::Restart);
        assert_eq!(state.difficulty.spawn_interval_ms, 1500.0);
        assert_eq!(state.clock.elapsed_secs(), 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_restart_from_pause() {
        let mut state = state();
        state.score = 50;
        apply_input(&mut state, InputEvent::TogglePause);
        assert!(apply_input(&mut state, InputEvent::Restart));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
    }

    fn run_with_pause(pause_frames: usize, policy: TimerResume) -> (f32, usize) {
        let config = GameConfig {
            timer_resume: policy,
            ..Default::default()
        };
        let mut state = GameState::new(config, 99);
        state.player.pos = Vec2::new(0.0, 560.0);
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        apply_input(&mut state, InputEvent::TogglePause);
        for _ in 0..pause_frames {
            tick(&mut state, DT);
        }
        apply_input(&mut state, InputEvent::TogglePause);
        for _ in 0..60 {
            tick(&mut state, DT);
        }
        let spawned = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count();
        (state.clock.elapsed_secs(), spawned)
    }

    #[test]
    fn test_preserved_timer_phase_survives_pause() {
        let (_, spawned_restart) = run_with_pause(10, TimerResume::Restart);
        let (_, spawned_preserve) = run_with_pause(10, TimerResume::Preserve);
        // 1s before the pause and 1s after: only a preserved phase reaches the 1.5s interval
        assert_eq!(spawned_restart, 0);
        assert_eq!(spawned_preserve, 1);
    }

    proptest! {
        #[test]
        fn prop_pause_length_does_not_affect_clock(pause_frames in 0usize..600) {
            let (elapsed, _) = run_with_pause(pause_frames, TimerResume::Restart);
            let (baseline, _) = run_with_pause(0, TimerResume::Restart);
            prop_assert!((elapsed - baseline).abs() < 1e-3);
            prop_assert!((elapsed - 2.0).abs() < 0.01);
        }
    }
}
