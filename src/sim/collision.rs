//! Collision detection and scoring
//!
//! Bullets are tested as points (their centre) strictly inside an enemy box;
//! the player and enemies are tested box against box with touching edges
//! counting as contact. Removals are collected first and applied afterwards,
//! keyed by entity id, so an enemy struck by several bullets in one tick is
//! destroyed (and scored) exactly once.

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{Bullet, Enemy, Player};

/// An enemy destroyed by a bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub enemy_id: u32,
    pub bullet_id: u32,
    /// Centre of the destroyed enemy
    pub at: Vec2,
}

/// Find bullet-enemy hits without touching either collection.
///
/// Each bullet destroys at most one enemy (the first live one it is inside, in
/// collection order) and each enemy is destroyed at most once. A bullet whose
/// only target was already claimed this tick keeps flying.
pub fn find_kills(bullets: &[Bullet], enemies: &[Enemy]) -> Vec<Kill> {
    let mut claimed: HashSet<u32> = HashSet::new();
    let mut kills = Vec::new();

    for bullet in bullets {
        let target = enemies
            .iter()
            .find(|e| !claimed.contains(&e.id) && e.bounds().contains_strict(bullet.pos));
        if let Some(enemy) = target {
            claimed.insert(enemy.id);
            kills.push(Kill {
                enemy_id: enemy.id,
                bullet_id: bullet.id,
                at: enemy.bounds().center(),
            });
        }
    }

    kills
}

/// Remove every entity named in `kills` from both collections
pub fn apply_kills(kills: &[Kill], bullets: &mut Vec<Bullet>, enemies: &mut Vec<Enemy>) {
    if kills.is_empty() {
        return;
    }
    let dead_bullets: HashSet<u32> = kills.iter().map(|k| k.bullet_id).collect();
    let dead_enemies: HashSet<u32> = kills.iter().map(|k| k.enemy_id).collect();
    bullets.retain(|b| !dead_bullets.contains(&b.id));
    enemies.retain(|e| !dead_enemies.contains(&e.id));
}

/// Resolve all bullet-enemy hits for this tick, returning the kills applied
pub fn resolve_bullet_hits(bullets: &mut Vec<Bullet>, enemies: &mut Vec<Enemy>) -> Vec<Kill> {
    let kills = find_kills(bullets, enemies);
    apply_kills(&kills, bullets, enemies);
    kills
}

/// First enemy touching the player, if any
pub fn player_collision<'a>(player: &Player, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    let bounds = player.bounds();
    enemies.iter().find(|e| bounds.overlaps_inclusive(&e.bounds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn enemy(id: u32, x: f32, y: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(40.0),
            speed: 2.0,
            drift: 0.0,
            direction: 1.0,
        }
    }

    fn bullet(id: u32, x: f32, y: f32) -> Bullet {
        Bullet {
            id,
            pos: Vec2::new(x, y),
            radius: 5.0,
            speed: 7.0,
        }
    }

    #[test]
    fn test_bullet_outside_box_misses() {
        // Enemy box [100,60]-[140,100]
        let mut enemies = vec![enemy(1, 100.0, 60.0)];
        let mut bullets = vec![bullet(2, 100.0, 50.0)];
        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);
        assert!(kills.is_empty());
        assert_eq!(bullets.len(), 1);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_bullet_inside_box_hits() {
        let mut enemies = vec![enemy(1, 100.0, 60.0)];
        let mut bullets = vec![bullet(2, 110.0, 70.0)];
        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].enemy_id, 1);
        assert_eq!(kills[0].at, Vec2::new(120.0, 80.0));
        assert!(bullets.is_empty());
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_bullet_on_edge_misses() {
        let mut enemies = vec![enemy(1, 100.0, 60.0)];
        let mut bullets = vec![bullet(2, 100.0, 70.0), bullet(3, 120.0, 100.0)];
        assert!(resolve_bullet_hits(&mut bullets, &mut enemies).is_empty());
    }

    #[test]
    fn test_two_bullets_one_enemy_scores_once() {
        let mut enemies = vec![enemy(1, 100.0, 60.0)];
        let mut bullets = vec![bullet(2, 110.0, 70.0), bullet(3, 130.0, 90.0)];
        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(kills.len(), 1);
        assert!(enemies.is_empty());
        // The second bullet was not spent
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].id, 3);
    }

    #[test]
    fn test_adjacent_hits_in_one_tick_are_all_resolved() {
        // Removing during iteration would skip the second pair
        let mut enemies = vec![enemy(1, 100.0, 60.0), enemy(2, 200.0, 60.0), enemy(3, 300.0, 60.0)];
        let mut bullets = vec![
            bullet(10, 110.0, 70.0),
            bullet(11, 210.0, 70.0),
            bullet(12, 310.0, 70.0),
        ];
        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(kills.len(), 3);
        assert!(bullets.is_empty());
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_overlapping_enemies_one_bullet_kills_one() {
        let mut enemies = vec![enemy(1, 100.0, 60.0), enemy(2, 105.0, 60.0)];
        let mut bullets = vec![bullet(9, 120.0, 80.0)];
        let kills = resolve_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(kills.len(), 1);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
    }

    #[test]
    fn test_player_touching_enemy_edge_collides() {
        let mut player = crate::sim::entity::Player::spawn(&GameConfig::default());
        player.pos = Vec2::new(100.0, 100.0);
        // Enemy bottom edge exactly on the player's top edge
        let enemies = vec![enemy(1, 120.0, 60.0)];
        assert_eq!(player_collision(&player, &enemies).map(|e| e.id), Some(1));
    }

    #[test]
    fn test_player_clear_of_enemy() {
        let mut player = crate::sim::entity::Player::spawn(&GameConfig::default());
        player.pos = Vec2::new(100.0, 100.0);
        let enemies = vec![enemy(1, 141.0, 100.0)];
        assert!(player_collision(&player, &enemies).is_none());
    }
}
