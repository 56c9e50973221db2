//! Real-time projectile and particle advancement.
//!
//! This runs on the host's frame clock, between discrete turns. It only
//! ever mutates kinematic state and the pending-hit queue; health, status
//! effects, and everything else discrete are untouched until the resolver
//! drains the queue at the next turn boundary.

use crate::env::GameEnv;
use crate::puzzle::Puzzle;
use crate::state::{GameState, Particle, PendingHit, Vec2};

use super::events::GameEvent;

/// Largest distance a projectile covers per collision check, in tiles.
const SUBSTEP: f32 = 0.25;

pub(super) fn advance(
    state: &mut GameState,
    puzzle: &Puzzle,
    env: &GameEnv<'_>,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let tables = super::engine_tables(env);

    for particle in &mut state.continuous.particles {
        particle.remaining -= dt;
    }
    state.continuous.particles.retain(|p| p.remaining > 0.0);

    let mut hits: Vec<PendingHit> = Vec::new();
    let mut impacts: Vec<Vec2> = Vec::new();

    for index in 0..state.continuous.projectiles.len() {
        let mut projectile = state.continuous.projectiles[index].clone();
        if !projectile.active {
            continue;
        }

        let (dx, dy) = projectile.facing.delta();
        let length = ((dx * dx + dy * dy) as f32).sqrt();
        let distance = tables.projectile_speed * dt;
        let steps = (distance / SUBSTEP).ceil().max(1.0) as u32;
        let step_length = distance / steps as f32;

        for _ in 0..steps {
            projectile.position.x += dx as f32 / length * step_length;
            projectile.position.y += dy as f32 / length * step_length;
            projectile.traveled += step_length;

            let cell = projectile.position.cell();
            if !puzzle.contains(cell) || state.is_wall_like(puzzle, cell) {
                projectile.active = false;
                impacts.push(projectile.position);
                break;
            }

            let target = state
                .entities
                .all()
                .find(|e| {
                    e.alive && !e.ghost && e.id != projectile.payload.source && e.position == cell
                })
                .map(|e| e.id);
            if let Some(target) = target {
                hits.push(PendingHit {
                    target,
                    payload: projectile.payload,
                });
                events.push(GameEvent::ProjectileHit {
                    target,
                    damage: projectile.payload.damage,
                });
                projectile.active = false;
                impacts.push(projectile.position);
                break;
            }

            if projectile.traveled >= projectile.max_range {
                projectile.active = false;
                break;
            }
        }

        state.continuous.projectiles[index] = projectile;
    }

    state.continuous.projectiles.retain(|p| p.active);
    for hit in hits {
        state.continuous.pending_hits.push_back(hit);
    }
    for position in impacts {
        state
            .continuous
            .particles
            .push(Particle::new(position, tables.particle_duration));
    }
}
